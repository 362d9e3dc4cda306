use std::collections::VecDeque;

const LONGEST_WORD: usize = 7;

/// Watches the letters typed while the game is paused for secret words
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EasterEggs {
    typed: VecDeque<char>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Egg {
    /// Draw the snake in cycling colors
    Rainbow,
    /// Draw everything with plain ASCII glyphs
    Retro,
}

impl Egg {
    const ALL: [Egg; 2] = [Egg::Rainbow, Egg::Retro];

    fn word(self) -> &'static str {
        match self {
            Egg::Rainbow => "rainbow",
            Egg::Retro => "retro",
        }
    }
}

impl EasterEggs {
    pub(crate) fn new() -> EasterEggs {
        EasterEggs::default()
    }

    /// Record a typed character.  Returns the egg whose word has just been
    /// completed, if any.
    pub(crate) fn feed(&mut self, ch: char) -> Option<Egg> {
        if !ch.is_ascii_alphabetic() {
            self.typed.clear();
            return None;
        }
        self.typed.push_back(ch.to_ascii_lowercase());
        while self.typed.len() > LONGEST_WORD {
            let _ = self.typed.pop_front();
        }
        let found = Egg::ALL.into_iter().find(|egg| self.ends_with(egg.word()));
        if found.is_some() {
            self.typed.clear();
        }
        found
    }

    fn ends_with(&self, word: &str) -> bool {
        let n = word.len();
        self.typed.len() >= n
            && self
                .typed
                .iter()
                .skip(self.typed.len() - n)
                .copied()
                .eq(word.chars())
    }
}

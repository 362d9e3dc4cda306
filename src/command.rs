use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Esc,
    Backspace,
    Home,
    End,
    PageUp,
    PageDown,
    Next,
    Prev,
    I,
    M,
    O,
    P,
    Q,
    R,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Command> {
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Command::Quit),
            (KeyModifiers::NONE, KeyCode::Char('w' | 'k') | KeyCode::Up) => Some(Command::Up),
            (KeyModifiers::NONE, KeyCode::Char('s' | 'j') | KeyCode::Down) => Some(Command::Down),
            (KeyModifiers::NONE, KeyCode::Char('a' | 'h') | KeyCode::Left) => Some(Command::Left),
            (KeyModifiers::NONE, KeyCode::Char('d' | 'l') | KeyCode::Right) => Some(Command::Right),
            (_, KeyCode::Enter) => Some(Command::Enter),
            (KeyModifiers::NONE, KeyCode::Char(' ')) => Some(Command::Space),
            (_, KeyCode::Esc) => Some(Command::Esc),
            (_, KeyCode::Backspace) => Some(Command::Backspace),
            (_, KeyCode::Home) => Some(Command::Home),
            (_, KeyCode::End) => Some(Command::End),
            (_, KeyCode::PageUp) => Some(Command::PageUp),
            (_, KeyCode::PageDown) => Some(Command::PageDown),
            (_, KeyCode::Tab) => Some(Command::Next),
            (_, KeyCode::BackTab) => Some(Command::Prev),
            (KeyModifiers::NONE, KeyCode::Char('i')) => Some(Command::I),
            (KeyModifiers::NONE, KeyCode::Char('m')) => Some(Command::M),
            (KeyModifiers::NONE, KeyCode::Char('o')) => Some(Command::O),
            (KeyModifiers::NONE, KeyCode::Char('p')) => Some(Command::P),
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Command::Q),
            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Command::R),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Some(Command::Quit))]
    #[case(KeyEvent::from(KeyCode::Up), Some(Command::Up))]
    #[case(KeyEvent::from(KeyCode::Char('j')), Some(Command::Down))]
    #[case(KeyEvent::from(KeyCode::Char('a')), Some(Command::Left))]
    #[case(KeyEvent::from(KeyCode::Char('`')), None)]
    #[case(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT), Some(Command::Enter))]
    #[case(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL), None)]
    #[case(KeyEvent::from(KeyCode::Char('z')), None)]
    fn test_from_key_event(#[case] ev: KeyEvent, #[case] cmd: Option<Command>) {
        assert_eq!(Command::from_key_event(ev), cmd);
    }
}

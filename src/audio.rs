use crate::settings::Volume;

/// A sound the game wants played
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Cue {
    /// The mouse moved onto a different menu item
    Hover,
    /// A menu item was activated
    Select,
    /// The snake ate some food
    Eat,
    /// The snake crashed
    GameOver,
    /// A screen transition began
    Whoosh,
}

/// Background music loop
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Track {
    /// Played on the menus, instructions & settings
    Menu,
    /// Played during a round
    Game,
}

/// Queue of sound cues for the playback backend, plus the music that should
/// currently be looping.
///
/// Cues requested at zero volume are dropped on the spot.  The application
/// drains the queue once per frame.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Audio {
    queue: Vec<(Cue, Volume)>,
    music: Option<(Track, Volume)>,
}

impl Audio {
    pub(crate) fn new() -> Audio {
        Audio::default()
    }

    pub(crate) fn play(&mut self, cue: Cue, volume: Volume) {
        if !volume.is_muted() {
            self.queue.push((cue, volume));
        }
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, (Cue, Volume)> {
        self.queue.drain(..)
    }

    /// Set the music to loop.  A muted volume stops the music.  Returns
    /// `true` if this changed what is playing or how loud.
    pub(crate) fn set_music(&mut self, track: Track, volume: Volume) -> bool {
        let music = (!volume.is_muted()).then_some((track, volume));
        if music == self.music {
            return false;
        }
        self.music = music;
        true
    }

    #[cfg(test)]
    pub(crate) fn music(&self) -> Option<(Track, Volume)> {
        self.music
    }

    #[cfg(test)]
    pub(crate) fn queued(&self) -> &[(Cue, Volume)] {
        &self.queue
    }
}

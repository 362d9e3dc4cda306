use crate::audio::Audio;
use crate::effects::Effects;
use crate::settings::SettingsStore;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{buffer::Buffer, layout::Rect};
use std::time::Duration;

/// Identifies one of the top-level screens
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ScreenId {
    Menu,
    Playing,
    Instructions,
    Settings,
}

/// What a screen handler asks the application to do next
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Request {
    /// Go to the main menu
    Menu,
    /// Start a fresh game
    Play,
    Instructions,
    Settings,
    /// Exit the application immediately
    Quit,
}

impl Request {
    /// The screen that becomes active once this request is carried out, or
    /// `None` for [`Request::Quit`]
    pub(crate) fn target(self) -> Option<ScreenId> {
        match self {
            Request::Menu => Some(ScreenId::Menu),
            Request::Play => Some(ScreenId::Playing),
            Request::Instructions => Some(ScreenId::Instructions),
            Request::Settings => Some(ScreenId::Settings),
            Request::Quit => None,
        }
    }
}

/// The collaborators a screen handler may use, lent out by the application
/// for the duration of one call
#[derive(Debug)]
pub(crate) struct Context<'a> {
    pub(crate) settings: &'a mut SettingsStore,
    pub(crate) effects: &'a mut Effects,
    pub(crate) audio: &'a mut Audio,
    /// Whether the console overlay is open
    pub(crate) overlay_open: bool,
}

/// The set of hooks every top-level screen implements.  Any hook may return
/// a [`Request`] to leave the screen.
pub(crate) trait Screen {
    fn update(&mut self, _dt: Duration, _ctx: &mut Context<'_>) -> Option<Request> {
        None
    }

    /// `area` is the whole drawing area of the terminal.
    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &Context<'_>);

    fn on_key(&mut self, key: KeyEvent, ctx: &mut Context<'_>) -> Option<Request>;

    /// `area` is the drawing area used for the most recent `render()`.
    fn on_mouse(
        &mut self,
        _mouse: MouseEvent,
        _area: Rect,
        _ctx: &mut Context<'_>,
    ) -> Option<Request> {
        None
    }

    /// Called when the terminal window loses focus
    fn on_focus_lost(&mut self) {}
}

/// Owns a set of collaborators for building a [`Context`] in tests
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct TestContext {
    pub(crate) settings: SettingsStore,
    pub(crate) effects: Effects,
    pub(crate) audio: Audio,
}

#[cfg(test)]
impl TestContext {
    pub(crate) fn new() -> TestContext {
        use rand::SeedableRng;
        TestContext {
            settings: SettingsStore::in_memory(crate::settings::Settings::default()),
            effects: Effects::new(rand::rngs::StdRng::seed_from_u64(0x0123456789ABCDEF)),
            audio: Audio::new(),
        }
    }

    pub(crate) fn ctx(&mut self) -> Context<'_> {
        Context {
            settings: &mut self.settings,
            effects: &mut self.effects,
            audio: &mut self.audio,
            overlay_open: false,
        }
    }
}

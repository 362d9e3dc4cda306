use crate::audio::{Audio, Cue, Track};
use crate::backdrop::Backdrop;
use crate::console::Console;
use crate::consts;
use crate::effects::Effects;
use crate::game::Game;
use crate::instructions::Instructions;
use crate::menu::MainMenu;
use crate::screen::{Context, Request, Screen, ScreenId};
use crate::settings::SettingsStore;
use crate::settings_menu::SettingsMenu;
use crate::transition::Transition;
use crate::util::get_display_area;
use crossterm::event::{poll, read, Event, KeyEvent, KeyEventKind, MouseEvent};
use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::Widget,
    Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// The whole application: every screen, plus the collaborators they share
#[derive(Debug)]
pub(crate) struct App {
    menu: MainMenu,
    game: Game,
    instructions: Instructions,
    settings_menu: SettingsMenu,
    /// The screen that receives input and is drawn.  Only changed by
    /// [`App::apply`] when the transition hands back a [`Swap`].
    current: ScreenId,
    transition: Transition<Swap>,
    console: Console,
    settings: SettingsStore,
    effects: Effects,
    backdrop: Backdrop,
    audio: Audio,
    rng: StdRng,
    frame_period: Duration,
    fps: FpsCounter,
    /// The terminal area as of the most recent draw
    area: Rect,
    quitting: bool,
}

/// The screen change carried by the transition from `start()` to the moment
/// the screen is covered
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Swap {
    from: ScreenId,
    to: ScreenId,
}

impl App {
    pub(crate) fn new<R: Rng>(settings: SettingsStore, frame_period: Duration, mut rng: R) -> App {
        let mut rng = StdRng::from_rng(&mut rng);
        App {
            menu: MainMenu::new(settings.sound_volume()),
            game: Game::new_with_rng(StdRng::from_rng(&mut rng)),
            instructions: Instructions::new(),
            settings_menu: SettingsMenu::new(),
            current: ScreenId::Menu,
            transition: Transition::new(),
            console: Console::new(),
            settings,
            effects: Effects::new(StdRng::from_rng(&mut rng)),
            backdrop: Backdrop::new(StdRng::from_rng(&mut rng)),
            audio: Audio::new(),
            rng,
            frame_period,
            fps: FpsCounter::default(),
            area: Rect::default(),
            quitting: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        tracing::info!("Starting");
        let mut last_frame = Instant::now();
        while !self.quitting {
            let frame_start = Instant::now();
            let dt = frame_start.saturating_duration_since(last_frame);
            last_frame = frame_start;
            self.fps.record(dt);
            self.advance_transition(dt);
            while !self.quitting && poll(Duration::ZERO)? {
                self.handle_event(read()?);
            }
            if self.quitting {
                break;
            }
            self.update(dt);
            terminal.draw(|frame| {
                let area = frame.area();
                self.render(area, frame.buffer_mut());
            })?;
            let wait = (frame_start + self.frame_period).saturating_duration_since(Instant::now());
            if !wait.is_zero() {
                // Wake early for input; the next frame picks it up.
                let _ = poll(wait)?;
            }
        }
        tracing::info!("Exiting");
        Ok(())
    }

    /// Run `f` on the current screen with a [`Context`] lent from `self`
    fn with_screen<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut dyn Screen, &mut Context<'_>) -> T,
    {
        let mut ctx = Context {
            settings: &mut self.settings,
            effects: &mut self.effects,
            audio: &mut self.audio,
            overlay_open: self.console.is_open(),
        };
        let screen: &mut dyn Screen = match self.current {
            ScreenId::Menu => &mut self.menu,
            ScreenId::Playing => &mut self.game,
            ScreenId::Instructions => &mut self.instructions,
            ScreenId::Settings => &mut self.settings_menu,
        };
        f(screen, &mut ctx)
    }

    fn advance_transition(&mut self, dt: Duration) {
        if let Some(swap) = self.transition.update(dt) {
            self.apply(swap);
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.on_key(key),
            Event::Mouse(mouse) => self.on_mouse(mouse),
            Event::FocusLost => self.on_focus_lost(),
            _ => (),
        }
    }

    fn on_focus_lost(&mut self) {
        if self.console.is_open() || self.transition.active() {
            return;
        }
        self.with_screen(|screen, _| screen.on_focus_lost());
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.console.on_key(key, &mut self.backdrop) || self.transition.active() {
            return;
        }
        if let Some(req) = self.with_screen(|screen, ctx| screen.on_key(key, ctx)) {
            self.request(req);
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if self.console.on_mouse(mouse) || self.transition.active() {
            return;
        }
        let area = self.area;
        if let Some(req) = self.with_screen(|screen, ctx| screen.on_mouse(mouse, area, ctx)) {
            self.request(req);
        }
    }

    /// Carry out a screen's request: quit right away, or start a transition
    /// to the requested screen
    fn request(&mut self, req: Request) {
        let Some(to) = req.target() else {
            tracing::info!(screen = ?self.current, "Quit requested");
            self.quitting = true;
            return;
        };
        let swap = Swap {
            from: self.current,
            to,
        };
        if self.transition.start(swap) {
            self.audio.play(Cue::Whoosh, self.settings.sound_volume());
            tracing::debug!(from = ?swap.from, to = ?swap.to, "Transition started");
        }
    }

    fn apply(&mut self, swap: Swap) {
        match swap.from {
            ScreenId::Playing => tracing::info!(score = self.game.score(), "Left game"),
            ScreenId::Settings => self.menu.set_hover_volume(self.settings.sound_volume()),
            ScreenId::Menu | ScreenId::Instructions => (),
        }
        if swap.to == ScreenId::Playing {
            self.game = Game::new_with_rng(StdRng::from_rng(&mut self.rng));
            self.effects.clear();
        }
        self.current = swap.to;
        tracing::info!(from = ?swap.from, to = ?swap.to, "Screen changed");
    }

    fn update(&mut self, dt: Duration) {
        if !self.console.is_open() && !self.transition.active() {
            if let Some(req) = self.with_screen(|screen, ctx| screen.update(dt, ctx)) {
                self.request(req);
            }
        }
        self.effects.update(dt);
        self.backdrop.update(dt);
        let track = match self.current {
            ScreenId::Playing => Track::Game,
            ScreenId::Menu | ScreenId::Instructions | ScreenId::Settings => Track::Menu,
        };
        let volume = self.settings.music_volume();
        if self.audio.set_music(track, volume) {
            tracing::debug!(?track, volume = volume.get(), "Music changed");
        }
        for (cue, volume) in self.audio.drain() {
            tracing::trace!(?cue, volume = volume.get(), "Sound cue");
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.area = area;
        self.backdrop.render_leaves(area, buf);
        self.backdrop.render_border(area, buf);
        let ctx = Context {
            settings: &mut self.settings,
            effects: &mut self.effects,
            audio: &mut self.audio,
            overlay_open: self.console.is_open(),
        };
        let screen: &dyn Screen = match self.current {
            ScreenId::Menu => &self.menu,
            ScreenId::Playing => &self.game,
            ScreenId::Instructions => &self.instructions,
            ScreenId::Settings => &self.settings_menu,
        };
        screen.render(area, buf, &ctx);
        self.transition.render(area, buf);
        self.console.render(area, buf);
        if self.console.show_fps() {
            let display = get_display_area(area);
            Line::styled(format!("{} FPS", self.fps.get()), consts::FPS_STYLE)
                .right_aligned()
                .render(Rect { height: 1, ..display }, buf);
        }
    }
}

/// Frames per second, recounted once every second
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct FpsCounter {
    frames: u32,
    elapsed: Duration,
    fps: u32,
}

impl FpsCounter {
    fn record(&mut self, dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= Duration::from_secs(1) {
            self.fps = self.frames;
            self.frames = 0;
            self.elapsed = Duration::ZERO;
        }
    }

    fn get(&self) -> u32 {
        self.fps
    }
}

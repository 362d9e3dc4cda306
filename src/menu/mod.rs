mod widgets;
pub(crate) use self::widgets::Button;
use self::widgets::Logo;
use crate::audio::Cue;
use crate::command::Command;
use crate::consts;
use crate::screen::{Context, Request, Screen};
use crate::settings::Volume;
use crate::util::{get_display_area, EnumExt};
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use enum_map::{Enum, EnumMap};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Position, Rect},
    text::{Line, Span},
    widgets::Widget,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MainMenu {
    selection: MenuItem,
    /// Volume at which hover cues are played.  This is a snapshot of the
    /// sound volume setting, refreshed whenever the settings screen is left.
    hover_volume: Volume,
}

impl MainMenu {
    pub(crate) fn new(hover_volume: Volume) -> Self {
        MainMenu {
            selection: MenuItem::min(),
            hover_volume,
        }
    }

    pub(crate) fn set_hover_volume(&mut self, volume: Volume) {
        self.hover_volume = volume;
    }

    fn activate(&self, item: MenuItem, ctx: &mut Context<'_>) -> Request {
        ctx.audio.play(Cue::Select, ctx.settings.sound_volume());
        item.request()
    }

    /// The rectangles occupied by the menu's buttons when the menu is drawn
    /// in `area`
    fn button_areas(&self, area: Rect) -> EnumMap<MenuItem, Rect> {
        let display = get_display_area(area);
        let [_, buttons_area, _] = Layout::vertical([
            Constraint::Length(Logo::HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .spacing(1)
        .areas(display);
        let rows = Layout::vertical([1u16; MenuItem::LENGTH])
            .flex(Flex::Start)
            .spacing(1)
            .split(buttons_area);
        EnumMap::from_fn(|item: MenuItem| item.button(false).area_within(rows[item.into_usize()]))
    }

    fn item_at(&self, area: Rect, pos: Position) -> Option<MenuItem> {
        self.button_areas(area)
            .into_iter()
            .find_map(|(item, r)| r.contains(pos).then_some(item))
    }
}

impl Screen for MainMenu {
    fn render(&self, area: Rect, buf: &mut Buffer, _ctx: &Context<'_>) {
        let display = get_display_area(area);
        let [logo_area, _, hint_area] = Layout::vertical([
            Constraint::Length(Logo::HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .spacing(1)
        .areas(display);
        Logo.render(logo_area, buf);
        for (item, button_area) in self.button_areas(area) {
            item.button(item == self.selection).render(button_area, buf);
        }
        Line::from_iter([
            Span::raw("Press "),
            Span::styled("`", consts::KEY_STYLE),
            Span::raw(" to open the console"),
        ])
        .centered()
        .render(hint_area, buf);
    }

    fn on_key(&mut self, key: KeyEvent, ctx: &mut Context<'_>) -> Option<Request> {
        match Command::from_key_event(key)? {
            Command::Quit => return Some(Request::Quit),
            Command::Up => self.selection = self.selection.prev()?,
            Command::Down => self.selection = self.selection.next()?,
            Command::Next => self.selection = self.selection.next().unwrap_or_else(MenuItem::min),
            Command::Prev => self.selection = self.selection.prev().unwrap_or_else(MenuItem::max),
            Command::Home => self.selection = MenuItem::min(),
            Command::End => self.selection = MenuItem::max(),
            Command::Enter | Command::Space => return Some(self.activate(self.selection, ctx)),
            Command::P => return Some(self.activate(MenuItem::Play, ctx)),
            Command::I => return Some(self.activate(MenuItem::Instructions, ctx)),
            Command::O => return Some(self.activate(MenuItem::Settings, ctx)),
            Command::Q => return Some(Request::Quit),
            _ => (),
        }
        None
    }

    fn on_mouse(
        &mut self,
        mouse: MouseEvent,
        area: Rect,
        ctx: &mut Context<'_>,
    ) -> Option<Request> {
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                let item = self.item_at(area, pos)?;
                if item != self.selection {
                    self.selection = item;
                    ctx.audio.play(Cue::Hover, self.hover_volume);
                }
                None
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let item = self.item_at(area, pos)?;
                self.selection = item;
                Some(self.activate(item, ctx))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
enum MenuItem {
    Play,
    Instructions,
    Settings,
    Quit,
}

impl MenuItem {
    fn request(self) -> Request {
        match self {
            MenuItem::Play => Request::Play,
            MenuItem::Instructions => Request::Instructions,
            MenuItem::Settings => Request::Settings,
            MenuItem::Quit => Request::Quit,
        }
    }

    fn button(self, selected: bool) -> Button {
        let (label, key) = match self {
            MenuItem::Play => ("Play", "p"),
            MenuItem::Instructions => ("Instructions", "i"),
            MenuItem::Settings => ("Settings", "o"),
            MenuItem::Quit => ("Quit", "q"),
        };
        Button {
            label,
            key: Some(key),
            selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::TestContext;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::style::Modifier;
    use rstest::rstest;

    fn menu() -> MainMenu {
        MainMenu::new(Volume::saturating(30))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    const AREA: Rect = Rect::new(0, 0, 80, 24);

    #[test]
    fn draw_initial() {
        let menu = menu();
        let mut tc = TestContext::new();
        let mut buffer = Buffer::empty(AREA);
        menu.render(AREA, &mut buffer, &tc.ctx());
        let row = |y: u16| -> String { (0..80u16).map(|x| buffer[(x, y)].symbol()).collect() };
        assert_eq!(row(8).trim(), "[Play (p)]");
        assert_eq!(row(10).trim(), "[Instructions (i)]");
        assert_eq!(row(12).trim(), "[Settings (o)]");
        assert_eq!(row(14).trim(), "[Quit (q)]");
        assert_eq!(row(23).trim(), "Press ` to open the console");
        assert_eq!(buffer[(35, 8)].modifier, Modifier::UNDERLINED);
        assert!(buffer[(35, 14)].modifier.is_empty());
    }

    #[rstest]
    #[case(KeyCode::Char('p'), Request::Play)]
    #[case(KeyCode::Char('i'), Request::Instructions)]
    #[case(KeyCode::Char('o'), Request::Settings)]
    #[case(KeyCode::Char('q'), Request::Quit)]
    fn shortcuts(#[case] code: KeyCode, #[case] req: Request) {
        let mut menu = menu();
        let mut tc = TestContext::new();
        assert_eq!(menu.on_key(KeyEvent::from(code), &mut tc.ctx()), Some(req));
    }

    #[test]
    fn navigate_and_activate() {
        let mut menu = menu();
        let mut tc = TestContext::new();
        let mut press = |menu: &mut MainMenu, code: KeyCode| {
            menu.on_key(KeyEvent::from(code), &mut tc.ctx())
        };
        assert_eq!(press(&mut menu, KeyCode::Up), None);
        assert_eq!(menu.selection, MenuItem::Play);
        assert_eq!(press(&mut menu, KeyCode::Down), None);
        assert_eq!(press(&mut menu, KeyCode::Down), None);
        assert_eq!(menu.selection, MenuItem::Settings);
        assert_eq!(press(&mut menu, KeyCode::Tab), None);
        assert_eq!(press(&mut menu, KeyCode::Tab), None);
        assert_eq!(menu.selection, MenuItem::Play);
        assert_eq!(press(&mut menu, KeyCode::End), None);
        assert_eq!(menu.selection, MenuItem::Quit);
        assert_eq!(press(&mut menu, KeyCode::BackTab), None);
        assert_eq!(press(&mut menu, KeyCode::Enter), Some(Request::Settings));
        assert_eq!(
            tc.audio.queued(),
            [(Cue::Select, tc.settings.sound_volume())]
        );
    }

    #[test]
    fn hover_plays_at_cached_volume() {
        let mut menu = menu();
        let mut tc = TestContext::new();
        let over_quit = mouse(MouseEventKind::Moved, 37, 14);
        assert_eq!(menu.on_mouse(over_quit, AREA, &mut tc.ctx()), None);
        assert_eq!(menu.selection, MenuItem::Quit);
        assert_eq!(tc.audio.queued(), [(Cue::Hover, Volume::saturating(30))]);
        // No new cue while staying on the same item
        assert_eq!(menu.on_mouse(over_quit, AREA, &mut tc.ctx()), None);
        assert_eq!(tc.audio.queued().len(), 1);
        // Moving off every button leaves the selection alone
        let nowhere = mouse(MouseEventKind::Moved, 0, 14);
        assert_eq!(menu.on_mouse(nowhere, AREA, &mut tc.ctx()), None);
        assert_eq!(menu.selection, MenuItem::Quit);

        menu.set_hover_volume(Volume::saturating(0));
        let over_play = mouse(MouseEventKind::Moved, 37, 8);
        assert_eq!(menu.on_mouse(over_play, AREA, &mut tc.ctx()), None);
        assert_eq!(menu.selection, MenuItem::Play);
        assert_eq!(tc.audio.queued().len(), 1);
    }

    #[test]
    fn click_activates() {
        let mut menu = menu();
        let mut tc = TestContext::new();
        let click = mouse(MouseEventKind::Down(MouseButton::Left), 32, 10);
        assert_eq!(
            menu.on_mouse(click, AREA, &mut tc.ctx()),
            Some(Request::Instructions)
        );
        let miss = mouse(MouseEventKind::Down(MouseButton::Left), 30, 10);
        assert_eq!(menu.on_mouse(miss, AREA, &mut tc.ctx()), None);
    }
}

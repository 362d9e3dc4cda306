use crate::audio::Cue;
use crate::command::Command;
use crate::consts;
use crate::menu::Button;
use crate::screen::{Context, Request, Screen};
use crate::settings::{Adjustable, SettingKey, SettingValue, Volume};
use crate::util::{center_rect, get_display_area, EnumExt};
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use enum_map::{Enum, EnumMap};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Widget,
    },
};

/// The settings screen: one row per setting plus a "Back" button
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SettingsMenu {
    selection: Row,
    /// The volume slider being dragged with the mouse, if any
    dragging: Option<SettingKey>,
}

impl SettingsMenu {
    const POINTER_WIDTH: u16 = 2;
    const LABEL_VALUE_GUTTER: u16 = 2;
    /// Number of cells in a volume slider; each cell is one volume step
    #[allow(clippy::cast_possible_truncation)]
    const SLIDER_CELLS: u16 = (Volume::MAX / consts::VOLUME_STEP) as u16 + 1;
    /// The slider plus its brackets and a right-aligned percentage
    const CONTROL_WIDTH: u16 = Self::SLIDER_CELLS + 2 + 5;
    const WIDTH: u16 = 2 /* for border */ + 2 /* for padding */ + Self::POINTER_WIDTH + SettingKey::DISPLAY_WIDTH + Self::LABEL_VALUE_GUTTER + Self::CONTROL_WIDTH;
    #[allow(clippy::cast_possible_truncation)]
    const HEIGHT: u16 = 2 /* for border */ + 2 /* for padding */ + (Row::LENGTH as u16) * 2 - 1;

    pub(crate) fn new() -> SettingsMenu {
        SettingsMenu {
            selection: Row::min(),
            dragging: None,
        }
    }

    /// Where each row is drawn when the screen is rendered in `area`
    fn row_areas(area: Rect) -> EnumMap<Row, Rect> {
        let block_area = center_rect(
            get_display_area(area),
            Size {
                width: Self::WIDTH,
                height: Self::HEIGHT,
            },
        );
        let rows = Layout::vertical([1u16; Row::LENGTH])
            .flex(Flex::Start)
            .spacing(1)
            .split(Self::block().inner(block_area));
        EnumMap::from_fn(|row: Row| rows[row.into_usize()])
    }

    /// The cells of the slider drawn in the row `row_area`
    fn track_area(row_area: Rect) -> Rect {
        let x = row_area
            .x
            .saturating_add(Self::POINTER_WIDTH)
            .saturating_add(SettingKey::DISPLAY_WIDTH)
            .saturating_add(Self::LABEL_VALUE_GUTTER)
            .saturating_add(1);
        Rect::new(x, row_area.y, Self::SLIDER_CELLS, 1).intersection(row_area)
    }

    fn block() -> Block<'static> {
        Block::bordered()
            .title(" SETTINGS ")
            .title_alignment(Alignment::Center)
            .padding(Padding::uniform(1))
    }

    fn adjust<F: FnOnce(&mut SettingValue)>(key: SettingKey, ctx: &mut Context<'_>, f: F) {
        let mut value = ctx.settings.get(key);
        f(&mut value);
        Self::store(key, value, ctx);
    }

    fn store(key: SettingKey, value: SettingValue, ctx: &mut Context<'_>) {
        if ctx.settings.get(key) == value {
            return;
        }
        ctx.settings.set(key, value);
        tracing::debug!(%key, ?value, "Setting changed");
        if key == SettingKey::SoundVolume {
            // Let the player hear the new level
            ctx.audio.play(Cue::Select, ctx.settings.sound_volume());
        }
    }

    /// Set the volume `key` from a mouse position over its slider
    fn drag_to(key: SettingKey, track: Rect, column: u16, ctx: &mut Context<'_>) {
        let cell = column
            .clamp(track.left(), track.right().saturating_sub(1))
            .saturating_sub(track.left());
        let level = u8::try_from(cell)
            .unwrap_or(u8::MAX)
            .saturating_mul(consts::VOLUME_STEP);
        Self::store(key, Volume::saturating(level).into(), ctx);
    }
}

impl Screen for SettingsMenu {
    fn render(&self, area: Rect, buf: &mut Buffer, ctx: &Context<'_>) {
        let block_area = center_rect(
            get_display_area(area),
            Size {
                width: Self::WIDTH,
                height: Self::HEIGHT,
            },
        );
        Self::block().render(block_area, buf);
        for (row, row_area) in Self::row_areas(area) {
            let selected = row == self.selection;
            let Some(key) = row.key() else {
                Button {
                    label: "Back",
                    key: Some("Esc"),
                    selected,
                }
                .render(row_area, buf);
                continue;
            };
            let style = if selected {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            };
            let label = format!(
                "{pointer:pwidth$}{key:lwidth$}{space:gutter$}",
                pointer = if selected { "»" } else { "" },
                pwidth = usize::from(Self::POINTER_WIDTH),
                lwidth = usize::from(SettingKey::DISPLAY_WIDTH),
                space = "",
                gutter = usize::from(Self::LABEL_VALUE_GUTTER),
            );
            let mut line = Line::from(Span::styled(label, style));
            match ctx.settings.get(key) {
                SettingValue::Volume(v) => {
                    let knob = usize::from(v.get() / consts::VOLUME_STEP);
                    line.push_span("[");
                    line.push_span(Span::styled("━".repeat(knob), consts::SLIDER_FILL_STYLE));
                    line.push_span(Span::styled("█", consts::SLIDER_FILL_STYLE));
                    line.push_span(
                        "─".repeat(usize::from(Self::SLIDER_CELLS).saturating_sub(knob + 1)),
                    );
                    line.push_span("]");
                    line.push_span(format!("{v:>5}"));
                }
                SettingValue::Bool(b) => line.push_span(if b { "[✓]" } else { "[ ]" }),
            }
            line.render(row_area, buf);
        }
    }

    fn on_key(&mut self, key: KeyEvent, ctx: &mut Context<'_>) -> Option<Request> {
        let cmd = Command::from_key_event(key)?;
        match (self.selection.key(), cmd) {
            (_, Command::Quit) => return Some(Request::Quit),
            (_, Command::Esc | Command::Backspace) | (None, Command::Enter | Command::Space) => {
                return Some(Request::Menu)
            }
            (_, Command::Up) => self.selection = self.selection.prev()?,
            (_, Command::Down) => self.selection = self.selection.next()?,
            (_, Command::Next) => self.selection = self.selection.next().unwrap_or_else(Row::min),
            (_, Command::Prev) => self.selection = self.selection.prev().unwrap_or_else(Row::max),
            (_, Command::Home) => self.selection = Row::min(),
            (_, Command::End) => self.selection = Row::max(),
            (Some(key), Command::Left) => Self::adjust(key, ctx, |v| v.decrease()),
            (Some(key), Command::Right) => Self::adjust(key, ctx, |v| v.increase()),
            (Some(key), Command::Enter | Command::Space) => {
                Self::adjust(key, ctx, |v| v.toggle());
            }
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
            MouseEventKind::Drag(MouseButton::Left) => {
                let key = self.dragging?;
                let row_area = Self::row_areas(area)[Row::from_key(key)];
                Self::drag_to(key, Self::track_area(row_area), mouse.column, ctx);
            }
            MouseEventKind::Up(MouseButton::Left) => self.dragging = None,
            MouseEventKind::Moved | MouseEventKind::Down(MouseButton::Left) => {
                let (row, row_area) = Self::row_areas(area)
                    .into_iter()
                    .find(|(_, r)| r.contains(pos))?;
                self.selection = row;
                if mouse.kind == MouseEventKind::Moved {
                    return None;
                }
                let Some(key) = row.key() else {
                    return Some(Request::Menu);
                };
                match ctx.settings.get(key) {
                    SettingValue::Volume(_) => {
                        let track = Self::track_area(row_area);
                        if track.contains(pos) {
                            self.dragging = Some(key);
                            Self::drag_to(key, track, mouse.column, ctx);
                        }
                    }
                    SettingValue::Bool(_) => Self::adjust(key, ctx, |v| v.toggle()),
                }
            }
            _ => (),
        }
        None
    }

    fn on_focus_lost(&mut self) {
        self.dragging = None;
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
enum Row {
    SoundVolume,
    MusicVolume,
    ScreenShake,
    Back,
}

impl Row {
    fn key(self) -> Option<SettingKey> {
        match self {
            Row::SoundVolume => Some(SettingKey::SoundVolume),
            Row::MusicVolume => Some(SettingKey::MusicVolume),
            Row::ScreenShake => Some(SettingKey::ScreenShake),
            Row::Back => None,
        }
    }

    fn from_key(key: SettingKey) -> Row {
        match key {
            SettingKey::SoundVolume => Row::SoundVolume,
            SettingKey::MusicVolume => Row::MusicVolume,
            SettingKey::ScreenShake => Row::ScreenShake,
        }
    }
}

use crate::command::Command;
use crate::screen::{Context, Request, Screen};
use crate::util::{center_rect, get_display_area};
use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect, Size},
    text::{Line, Text},
    widgets::{
        block::{Block, Padding},
        Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use std::borrow::Cow;

const PARAGRAPHS: [&str; 8] = [
    "Guide the snake around the board with the arrow keys, WASD, or HJKL. \
     The snake waits for your first move before it sets off.",
    "Each piece of food you eat makes the snake one segment longer and earns \
     a point. Every five points the snake speeds up a little, until it \
     reaches its top speed.",
    "The game ends when the snake runs into a wall or into its own body. If \
     you manage to fill the entire board, you win!",
    "The snake can't turn back on itself: asking it to reverse direction does \
     nothing. Only the last turn you ask for before the snake next moves \
     counts.",
    "Press Esc or P to pause. From the pause menu you can resume, start over, \
     or return to the main menu. The game also pauses when the terminal \
     loses focus.",
    "The Settings screen adjusts the sound & music volume and turns screen \
     shake on or off. Settings are saved automatically.",
    "Press ` (backtick) at any time to open the console. Type \"help\" there \
     for a list of commands.",
    "Rumor has it that typing the right word while paused changes how the \
     snake looks.",
];

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Instructions {
    lines: Vec<String>,
    scroll_offset: usize,
}

impl Instructions {
    const TEXT_WIDTH: u16 = 56;
    const WIDTH: u16 = Self::TEXT_WIDTH + 6;
    const HEIGHT: u16 = 20;
    /// Number of text lines visible at once: the height minus the border,
    /// the footer, and the gap above it
    const VISIBLE_LINES: u16 = Self::HEIGHT - 4;

    pub(crate) fn new() -> Instructions {
        let opts = textwrap::Options::new(usize::from(Self::TEXT_WIDTH));
        let mut lines = Vec::new();
        for (i, para) in PARAGRAPHS.into_iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.extend(
                textwrap::wrap(para, &opts)
                    .into_iter()
                    .map(Cow::into_owned),
            );
        }
        Instructions {
            lines,
            scroll_offset: 0,
        }
    }

    fn max_scroll(&self) -> usize {
        self.lines
            .len()
            .saturating_sub(usize::from(Self::VISIBLE_LINES))
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(n).min(self.max_scroll());
    }
}

impl Screen for Instructions {
    fn render(&self, area: Rect, buf: &mut Buffer, _ctx: &Context<'_>) {
        let block_area = center_rect(
            get_display_area(area),
            Size {
                width: Self::WIDTH,
                height: Self::HEIGHT,
            },
        );
        let block = Block::bordered()
            .title(" HOW TO PLAY ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let [text_area, back_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
                .flex(Flex::Start)
                .spacing(1)
                .areas(block.inner(block_area));
        block.render(block_area, buf);
        let [text_area, scrollbar_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(1)])
                .flex(Flex::Start)
                .spacing(1)
                .areas(text_area);
        Text::from_iter(
            self.lines
                .iter()
                .skip(self.scroll_offset)
                .take(usize::from(Self::VISIBLE_LINES))
                .map(String::as_str),
        )
        .render(text_area, buf);
        if self.max_scroll() > 0 {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .track_symbol(Some(ratatui::symbols::shade::MEDIUM));
            let mut scroll_state =
                ScrollbarState::new(self.max_scroll()).position(self.scroll_offset);
            scrollbar.render(scrollbar_area, buf, &mut scroll_state);
        }
        Line::from("[Back (Esc)]").centered().render(back_area, buf);
    }

    fn on_key(&mut self, key: KeyEvent, _ctx: &mut Context<'_>) -> Option<Request> {
        match Command::from_key_event(key)? {
            Command::Quit => return Some(Request::Quit),
            Command::Esc | Command::Enter | Command::Backspace => return Some(Request::Menu),
            Command::Up => self.scroll_up(1),
            Command::Down => self.scroll_down(1),
            Command::PageUp => self.scroll_up(usize::from(Self::VISIBLE_LINES)),
            Command::PageDown => self.scroll_down(usize::from(Self::VISIBLE_LINES)),
            Command::Home => self.scroll_offset = 0,
            Command::End => self.scroll_offset = self.max_scroll(),
            _ => (),
        }
        None
    }

    fn on_mouse(
        &mut self,
        mouse: MouseEvent,
        _area: Rect,
        _ctx: &mut Context<'_>,
    ) -> Option<Request> {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_up(1),
            MouseEventKind::ScrollDown => self.scroll_down(1),
            _ => (),
        }
        None
    }
}

use crate::consts;
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Logo;

impl Logo {
    const TEXT_HEIGHT: u16 = 5;
    const BODY_LENGTH: usize = 5;
    pub(crate) const HEIGHT: u16 = Self::TEXT_HEIGHT + 2;
    pub(crate) const WIDTH: u16 = 28;

    #[rustfmt::skip]
    const WORD: [&'static str; Self::TEXT_HEIGHT as usize] = [
         " ____              _        ",
         "/ ___| _ __   __ _| | _____ ",
        r"\___ \| '_ \ / _` | |/ / _ \",
         " ___) | | | | (_| |   <  __/",
        r"|____/|_| |_|\__,_|_|\_\___|",
    ];
}

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([Self::WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [words_area, diagram_area] = Layout::vertical([Self::TEXT_HEIGHT, 1])
            .flex(Flex::Start)
            .spacing(1)
            .areas(area);
        Text::from_iter(Self::WORD)
            .style(consts::SNAKE_STYLE)
            .render(words_area, buf);
        Line::from_iter([
            Span::styled(
                consts::SNAKE_BODY_SYMBOL.repeat(Self::BODY_LENGTH),
                consts::SNAKE_STYLE,
            ),
            Span::styled(consts::SNAKE_HEAD_SYMBOL, consts::SNAKE_STYLE),
            Span::raw("  "),
            Span::styled(consts::FOOD_SYMBOL, consts::FOOD_STYLE),
        ])
        .centered()
        .render(diagram_area, buf);
    }
}

/// A single-line `[Label (k)]` button
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Button {
    pub(crate) label: &'static str,
    /// Keyboard shortcut shown in the button, if any
    pub(crate) key: Option<&'static str>,
    pub(crate) selected: bool,
}

impl Button {
    pub(crate) fn width(&self) -> u16 {
        let mut width = self.label.width() + 2;
        if let Some(key) = self.key {
            width += key.width() + 3;
        }
        u16::try_from(width).unwrap_or(u16::MAX)
    }

    /// The rectangle the button occupies when centered in the row `area`
    pub(crate) fn area_within(&self, area: Rect) -> Rect {
        let [button] = Layout::horizontal([self.width()])
            .flex(Flex::Center)
            .areas(area);
        button
    }
}

impl Widget for Button {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.selected {
            consts::MENU_SELECTION_STYLE
        } else {
            Style::new()
        };
        let mut line = Line::default();
        line.push_span(Span::styled("[", style));
        line.push_span(Span::styled(self.label, style));
        if let Some(key) = self.key {
            line.push_span(Span::styled(" (", style));
            line.push_span(Span::styled(key, consts::KEY_STYLE.patch(style)));
            line.push_span(Span::styled(")", style));
        }
        line.push_span(Span::styled("]", style));
        line.render(self.area_within(area), buf);
    }
}

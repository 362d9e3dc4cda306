//! The drop-down command console
use crate::backdrop::Backdrop;
use crate::consts;
use crate::util::{get_display_area, EnumExt};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Clear, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use std::collections::VecDeque;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Width at which console output is wrapped: the display width minus the
/// border and the scrollbar
const TEXT_WIDTH: u16 = consts::DISPLAY_SIZE.width - 3;

/// Output rows visible at once: the console height minus the border and
/// the input line
const VISIBLE_ROWS: usize = (consts::CONSOLE_HEIGHT - 3) as usize;

/// Lines scrolled per mouse wheel notch
const WHEEL_STEP: usize = 3;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Console {
    open: bool,
    /// Discard the next backtick typed after opening, so that a repeated
    /// toggle keystroke doesn't immediately close the console again
    ignore_next_char: bool,
    input: String,
    /// Byte offset into `input`, always on a grapheme boundary
    cursor: usize,
    history: VecDeque<String>,
    /// Index into `history` of the entry currently recalled into `input`
    recall: Option<usize>,
    output: VecDeque<Entry>,
    /// Number of lines scrolled up from the bottom of the output
    scroll: usize,
    show_fps: bool,
}

/// An executed line and what it printed
#[derive(Clone, Debug, Eq, PartialEq)]
struct Entry {
    input: String,
    output: Vec<String>,
}

impl Console {
    pub(crate) fn new() -> Console {
        Console::default()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn show_fps(&self) -> bool {
        self.show_fps
    }

    pub(crate) fn toggle(&mut self) {
        self.open = !self.open;
        if self.open {
            self.ignore_next_char = true;
        } else {
            self.input.clear();
            self.cursor = 0;
            self.recall = None;
        }
        tracing::debug!(open = self.open, "Console toggled");
    }

    /// Handle a key press.  Returns `true` if the console consumed it, which
    /// is always the case while the console is open except for Ctrl-C, which
    /// is left for the screen so that it still quits.
    pub(crate) fn on_key(&mut self, key: KeyEvent, backdrop: &mut Backdrop) -> bool {
        let toggle_key = key.code == KeyCode::Char('`');
        if !self.open {
            if toggle_key {
                self.toggle();
            }
            return toggle_key;
        }
        if std::mem::take(&mut self.ignore_next_char) && toggle_key {
            return true;
        }
        match (key.modifiers, key.code) {
            (_, KeyCode::Char('`') | KeyCode::Esc) => self.toggle(),
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return false,
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(ch)) => self.insert(ch),
            (_, KeyCode::Enter) => self.submit(backdrop),
            (_, KeyCode::Backspace) => {
                if let Some(start) = self.prev_boundary() {
                    self.input.replace_range(start..self.cursor, "");
                    self.cursor = start;
                }
            }
            (_, KeyCode::Delete) => {
                if let Some(end) = self.next_boundary() {
                    self.input.replace_range(self.cursor..end, "");
                }
            }
            (_, KeyCode::Left) => {
                if let Some(i) = self.prev_boundary() {
                    self.cursor = i;
                }
            }
            (_, KeyCode::Right) => {
                if let Some(i) = self.next_boundary() {
                    self.cursor = i;
                }
            }
            (_, KeyCode::Home) => self.cursor = 0,
            (_, KeyCode::End) => self.cursor = self.input.len(),
            (_, KeyCode::Up) => self.recall_older(),
            (_, KeyCode::Down) => self.recall_newer(),
            (_, KeyCode::PageUp) => self.scroll_up(VISIBLE_ROWS),
            (_, KeyCode::PageDown) => self.scroll_down(VISIBLE_ROWS),
            _ => (),
        }
        true
    }

    /// Handle a mouse event.  Returns `true` if the console consumed it.
    pub(crate) fn on_mouse(&mut self, mouse: MouseEvent) -> bool {
        if !self.open {
            return false;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_up(WHEEL_STEP),
            MouseEventKind::ScrollDown => self.scroll_down(WHEEL_STEP),
            _ => (),
        }
        true
    }

    fn insert(&mut self, ch: char) {
        if ch.general_category_group() == GeneralCategoryGroup::Other {
            return;
        }
        self.input.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.input[..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.input[self.cursor..]
            .graphemes(true)
            .next()
            .map(|g| self.cursor + g.len())
    }

    fn recall_older(&mut self) {
        let i = match self.recall {
            Some(0) => return,
            Some(i) => i - 1,
            None => match self.history.len().checked_sub(1) {
                Some(i) => i,
                None => return,
            },
        };
        self.recall_entry(Some(i));
    }

    fn recall_newer(&mut self) {
        if let Some(i) = self.recall {
            let next = i + 1;
            self.recall_entry((next < self.history.len()).then_some(next));
        }
    }

    fn recall_entry(&mut self, i: Option<usize>) {
        self.recall = i;
        self.input = i
            .and_then(|i| self.history.get(i))
            .cloned()
            .unwrap_or_default();
        self.cursor = self.input.len();
    }

    fn max_scroll(&self) -> usize {
        self.lines().len().saturating_sub(VISIBLE_ROWS)
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_add(n).min(self.max_scroll());
    }

    fn scroll_down(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    fn submit(&mut self, backdrop: &mut Backdrop) {
        let line = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.recall = None;
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if self.history.len() >= consts::CONSOLE_HISTORY_CAP {
            let _ = self.history.pop_front();
        }
        self.history.push_back(line.to_owned());
        self.execute(line, backdrop);
    }

    /// Run a command line and record its output
    pub(crate) fn execute(&mut self, line: &str, backdrop: &mut Backdrop) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        tracing::info!(command = line, "Console command");
        let output = match Builtin::parse(line) {
            Some(Builtin::Clear) => {
                self.output.clear();
                self.scroll = 0;
                return;
            }
            Some(Builtin::Help) => {
                let mut out = vec![String::from("Available commands:")];
                out.extend(
                    Builtin::iter().map(|b| format!("  {:<12} {}", b.name(), b.about())),
                );
                out
            }
            Some(Builtin::Exit) => {
                self.toggle();
                Vec::new()
            }
            Some(Builtin::ShowFps) => {
                self.show_fps = !self.show_fps;
                vec![format!("FPS display {}", on_off(self.show_fps))]
            }
            Some(Builtin::ShowBorder) => {
                let shown = backdrop.toggle_border();
                vec![format!("Border {}", on_off(shown))]
            }
            Some(Builtin::Whoami) => vec![user_name()],
            None => vec![format!("Command not found: {line}")],
        };
        if self.output.len() >= consts::CONSOLE_OUTPUT_CAP {
            let _ = self.output.pop_front();
        }
        self.output.push_back(Entry {
            input: line.to_owned(),
            output,
        });
        self.scroll = 0;
    }

    /// The output, wrapped and styled for display
    fn lines(&self) -> Vec<Line<'static>> {
        let opts = textwrap::Options::new(usize::from(TEXT_WIDTH)).break_words(true);
        let mut lines = Vec::new();
        for entry in &self.output {
            lines.push(Line::styled(
                format!("> {}", entry.input),
                consts::CONSOLE_PROMPT_STYLE,
            ));
            for out in &entry.output {
                lines.extend(
                    textwrap::wrap(out, &opts)
                        .into_iter()
                        .map(|s| Line::raw(s.into_owned())),
                );
            }
        }
        lines
    }

    /// Draw the console, if open, across the top of the display area within
    /// `area`
    pub(crate) fn render(&self, area: Rect, buf: &mut Buffer) {
        if !self.open {
            return;
        }
        let [console_area, _] = Layout::vertical([
            Constraint::Length(consts::CONSOLE_HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(get_display_area(area));
        let block = Block::bordered().title(" Console ").style(Style::reset());
        let inner = block.inner(console_area);
        Clear.render(console_area, buf);
        block.render(console_area, buf);
        let [output_area, input_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);

        let lines = self.lines();
        let max_scroll = lines.len().saturating_sub(VISIBLE_ROWS);
        let end = lines.len().saturating_sub(self.scroll);
        let start = end.saturating_sub(usize::from(output_area.height));
        for (line, row) in lines[start..end].iter().zip(output_area.rows()) {
            line.render(row, buf);
        }
        if max_scroll > 0 {
            let mut state = ScrollbarState::new(max_scroll).position(max_scroll - self.scroll);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None)
                .render(output_area, buf, &mut state);
        }

        Line::from_iter([
            Span::styled("> ", consts::CONSOLE_PROMPT_STYLE),
            Span::raw(self.input.as_str()),
        ])
        .render(input_area, buf);
        let Ok(offset) = u16::try_from(self.input[..self.cursor].width()) else {
            return;
        };
        let cursor = Position::new(
            input_area.x.saturating_add(2).saturating_add(offset),
            input_area.y,
        );
        if input_area.contains(cursor) {
            buf[cursor].set_style(Style::new().add_modifier(Modifier::REVERSED));
        }
    }
}

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
enum Builtin {
    Help,
    Clear,
    Exit,
    ShowFps,
    ShowBorder,
    Whoami,
}

impl Builtin {
    fn parse(s: &str) -> Option<Builtin> {
        Builtin::iter().find(|b| b.name().eq_ignore_ascii_case(s))
    }

    fn name(self) -> &'static str {
        match self {
            Builtin::Help => "help",
            Builtin::Clear => "clear",
            Builtin::Exit => "exit",
            Builtin::ShowFps => "show_fps",
            Builtin::ShowBorder => "show_border",
            Builtin::Whoami => "whoami",
        }
    }

    fn about(self) -> &'static str {
        match self {
            Builtin::Help => "List the available commands",
            Builtin::Clear => "Clear the console output",
            Builtin::Exit => "Close the console",
            Builtin::ShowFps => "Toggle the frame rate display",
            Builtin::ShowBorder => "Toggle the screen border",
            Builtin::Whoami => "Print the current user's name",
        }
    }
}

fn on_off(b: bool) -> &'static str {
    if b {
        "on"
    } else {
        "off"
    }
}

fn user_name() -> String {
    ["USER", "USERNAME"]
        .into_iter()
        .find_map(|var| std::env::var(var).ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| String::from("player"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn backdrop() -> Backdrop {
        Backdrop::new(StdRng::seed_from_u64(0x0123456789ABCDEF))
    }

    fn open_console() -> Console {
        let mut console = Console::new();
        console.toggle();
        console
    }

    fn type_line(console: &mut Console, backdrop: &mut Backdrop, s: &str) {
        for ch in s.chars() {
            assert!(console.on_key(KeyEvent::from(KeyCode::Char(ch)), backdrop));
        }
        assert!(console.on_key(KeyEvent::from(KeyCode::Enter), backdrop));
    }

    fn last_entry(console: &Console) -> &Entry {
        console.output.back().unwrap()
    }

    #[test]
    fn toggle_with_backtick() {
        let mut console = Console::new();
        let mut bd = backdrop();
        assert!(!console.on_key(KeyEvent::from(KeyCode::Char('x')), &mut bd));
        assert!(console.on_key(KeyEvent::from(KeyCode::Char('`')), &mut bd));
        assert!(console.is_open());
        // Swallowed as a repeat of the opening keystroke
        assert!(console.on_key(KeyEvent::from(KeyCode::Char('`')), &mut bd));
        assert!(console.is_open());
        assert_eq!(console.input, "");
        assert!(console.on_key(KeyEvent::from(KeyCode::Char('`')), &mut bd));
        assert!(!console.is_open());
    }

    #[test]
    fn ignore_flag_only_covers_next_key() {
        let mut console = open_console();
        let mut bd = backdrop();
        assert!(console.on_key(KeyEvent::from(KeyCode::Char('a')), &mut bd));
        assert!(console.on_key(KeyEvent::from(KeyCode::Char('`')), &mut bd));
        assert!(!console.is_open());
    }

    #[test]
    fn ctrl_c_passes_through() {
        let mut console = open_console();
        let mut bd = backdrop();
        assert!(console.on_key(KeyEvent::from(KeyCode::Char('a')), &mut bd));
        assert!(!console.on_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut bd
        ));
        assert!(console.is_open());
        assert_eq!(console.input, "a");
        assert!(console.on_key(
            KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
            &mut bd
        ));
    }

    #[test]
    fn close_discards_input() {
        let mut console = open_console();
        let mut bd = backdrop();
        console.ignore_next_char = false;
        for ch in "hel".chars() {
            let _ = console.on_key(KeyEvent::from(KeyCode::Char(ch)), &mut bd);
        }
        assert!(console.on_key(KeyEvent::from(KeyCode::Esc), &mut bd));
        assert!(!console.is_open());
        console.toggle();
        assert_eq!(console.input, "");
        assert_eq!(console.cursor, 0);
    }

    #[test]
    fn unknown_command() {
        let mut console = open_console();
        let mut bd = backdrop();
        type_line(&mut console, &mut bd, "  dance ");
        assert_eq!(
            last_entry(&console),
            &Entry {
                input: "dance".into(),
                output: vec!["Command not found: dance".into()],
            }
        );
    }

    #[test]
    fn help_lists_commands() {
        let mut console = open_console();
        let mut bd = backdrop();
        type_line(&mut console, &mut bd, "HELP");
        let entry = last_entry(&console);
        assert_eq!(entry.input, "HELP");
        assert_eq!(entry.output.len(), Builtin::LENGTH + 1);
        for b in Builtin::iter() {
            assert!(entry.output.iter().any(|l| l.contains(b.name())));
        }
    }

    #[test]
    fn clear_without_echo() {
        let mut console = open_console();
        let mut bd = backdrop();
        for _ in 0..5 {
            type_line(&mut console, &mut bd, "help");
        }
        console.scroll_up(4);
        assert_eq!(console.scroll, 4);
        type_line(&mut console, &mut bd, "clear");
        assert!(console.output.is_empty());
        assert_eq!(console.scroll, 0);
        assert_eq!(console.history.back().map(String::as_str), Some("clear"));
    }

    #[test]
    fn exit_closes() {
        let mut console = open_console();
        let mut bd = backdrop();
        type_line(&mut console, &mut bd, "exit");
        assert!(!console.is_open());
        assert_eq!(last_entry(&console).input, "exit");
    }

    #[test]
    fn toggles() {
        let mut console = open_console();
        let mut bd = backdrop();
        type_line(&mut console, &mut bd, "show_fps");
        assert!(console.show_fps());
        assert_eq!(last_entry(&console).output, ["FPS display on"]);
        type_line(&mut console, &mut bd, "show_border");
        assert!(bd.show_border());
        type_line(&mut console, &mut bd, "Show_Border");
        assert!(!bd.show_border());
        assert_eq!(last_entry(&console).output, ["Border off"]);
    }

    #[test]
    fn whoami() {
        let mut console = open_console();
        let mut bd = backdrop();
        type_line(&mut console, &mut bd, "whoami");
        let entry = last_entry(&console);
        assert_eq!(entry.output.len(), 1);
        assert!(!entry.output[0].is_empty());
    }

    #[test]
    fn empty_input_ignored() {
        let mut console = open_console();
        let mut bd = backdrop();
        type_line(&mut console, &mut bd, "   ");
        assert!(console.output.is_empty());
        assert!(console.history.is_empty());
    }

    #[test]
    fn history_capped_and_recalled() {
        let mut console = open_console();
        let mut bd = backdrop();
        for i in 0..(consts::CONSOLE_HISTORY_CAP + 5) {
            type_line(&mut console, &mut bd, &format!("cmd{i}"));
        }
        assert_eq!(console.history.len(), consts::CONSOLE_HISTORY_CAP);
        assert_eq!(console.history.front().map(String::as_str), Some("cmd5"));
        let _ = console.on_key(KeyEvent::from(KeyCode::Up), &mut bd);
        assert_eq!(console.input, "cmd54");
        let _ = console.on_key(KeyEvent::from(KeyCode::Up), &mut bd);
        assert_eq!(console.input, "cmd53");
        let _ = console.on_key(KeyEvent::from(KeyCode::Down), &mut bd);
        assert_eq!(console.input, "cmd54");
        let _ = console.on_key(KeyEvent::from(KeyCode::Down), &mut bd);
        assert_eq!(console.input, "");
    }

    #[test]
    fn output_capped() {
        let mut console = open_console();
        let mut bd = backdrop();
        for i in 0..(consts::CONSOLE_OUTPUT_CAP + 10) {
            console.execute(&format!("x{i}"), &mut bd);
        }
        assert_eq!(console.output.len(), consts::CONSOLE_OUTPUT_CAP);
        assert_eq!(console.output[0].input, "x10");
    }

    #[test]
    fn scrolling_bounded() {
        let mut console = open_console();
        let mut bd = backdrop();
        console.scroll_up(10);
        assert_eq!(console.scroll, 0);
        for _ in 0..4 {
            console.execute("nope", &mut bd);
        }
        // 8 lines of output, 9 visible rows
        assert_eq!(console.max_scroll(), 0);
        console.execute("help", &mut bd);
        assert_eq!(console.lines().len(), 8 + 1 + Builtin::LENGTH + 1);
        let _ = console.on_key(KeyEvent::from(KeyCode::PageUp), &mut bd);
        assert_eq!(console.scroll, console.max_scroll());
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert!(console.on_mouse(wheel));
        assert_eq!(console.scroll, console.max_scroll() - WHEEL_STEP);
    }

    #[test]
    fn cursor_editing() {
        let mut console = open_console();
        let mut bd = backdrop();
        console.ignore_next_char = false;
        for code in [
            KeyCode::Char('a'),
            KeyCode::Char('é'),
            KeyCode::Char('b'),
            KeyCode::Left,
            KeyCode::Left,
            KeyCode::Char('x'),
            KeyCode::End,
            KeyCode::Backspace,
            KeyCode::Home,
            KeyCode::Delete,
            KeyCode::Char('\u{7}'),
        ] {
            assert!(console.on_key(KeyEvent::from(code), &mut bd));
        }
        assert_eq!(console.input, "xé");
        assert_eq!(console.cursor, 0);
    }

    #[test]
    fn render_closed_and_open() {
        let mut console = Console::new();
        let mut bd = backdrop();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        console.render(area, &mut buf);
        assert!(buf.content().iter().all(|c| c.symbol() == " "));
        console.toggle();
        console.execute("whoami", &mut bd);
        console.render(area, &mut buf);
        let row = |y: u16| -> String { (0..80u16).map(|x| buf[(x, y)].symbol()).collect() };
        assert!(row(0).contains(" Console "));
        assert!(row(1).starts_with("│> whoami"));
        assert!(row(10).starts_with("│> "));
        assert_eq!(buf[(3, 10)].modifier, Modifier::REVERSED);
        assert!(row(11).starts_with("└"));
        assert!(row(12).trim().is_empty());
    }
}

use crate::command::Command;
use crate::consts;
use crate::util::EnumExt;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};

/// A widget for displaying a pause menu pop-up
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PauseMenu {
    /// The currently-selected item in the pause menu
    selection: PauseOpt,
}

impl PauseMenu {
    /// The height that should be used for the `Rect` passed to
    /// `PauseMenu::render()`
    pub(crate) const HEIGHT: u16 = 6;

    /// The width that should be used for the `Rect` passed to
    /// `PauseMenu::render()`
    pub(crate) const WIDTH: u16 = 20;

    pub(crate) fn new() -> PauseMenu {
        PauseMenu {
            selection: PauseOpt::min(),
        }
    }

    #[cfg(test)]
    pub(crate) fn selection(&self) -> PauseOpt {
        self.selection
    }

    /// Handle a command.  Returns `Some` if the user made a choice.
    pub(crate) fn handle_command(&mut self, cmd: Command) -> Option<PauseOpt> {
        match cmd {
            Command::Esc => return Some(PauseOpt::Resume),
            Command::Quit => return Some(PauseOpt::Quit),
            Command::Enter | Command::Space => return Some(self.selection),
            Command::Up => {
                if let Some(opt) = self.selection.prev() {
                    self.selection = opt;
                }
            }
            Command::Down => {
                if let Some(opt) = self.selection.next() {
                    self.selection = opt;
                }
            }
            Command::Next => self.selection = self.selection.next().unwrap_or_else(PauseOpt::min),
            Command::Prev => self.selection = self.selection.prev().unwrap_or_else(PauseOpt::max),
            Command::Home => self.selection = PauseOpt::min(),
            Command::End => self.selection = PauseOpt::max(),
            _ => (),
        }
        None
    }

    /// Return the option drawn at `pos` when the menu is rendered in `area`
    pub(crate) fn option_at(area: Rect, pos: Position) -> Option<PauseOpt> {
        PauseOpt::iter()
            .zip(Self::block().inner(area).rows())
            .find_map(|(opt, row)| row.contains(pos).then_some(opt))
    }

    /// Select the option under the mouse pointer.  Returns `Some` if the
    /// user clicked on it.
    pub(crate) fn handle_pointer(
        &mut self,
        area: Rect,
        pos: Position,
        clicked: bool,
    ) -> Option<PauseOpt> {
        let opt = PauseMenu::option_at(area, pos)?;
        self.selection = opt;
        clicked.then_some(opt)
    }

    fn block() -> Block<'static> {
        Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset())
    }
}

/// The choices in the pause menu
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(crate) enum PauseOpt {
    /// Unpause/resume the game
    Resume,

    /// Start the game over
    Restart,

    /// Return to the main menu
    MainMenu,

    /// Quit the application
    Quit,
}

impl PauseOpt {
    /// Render the option as a `Line` for display in the pause menu.  If
    /// `selected` is `true`, this option is the currently-selected/active one.
    fn to_line(self, selected: bool) -> Line<'static> {
        let mut line = Line::default();
        if selected {
            line.push_span("» ");
        } else {
            line.push_span("  ");
        }
        match self {
            PauseOpt::Resume => {
                line.push_span("Resume (");
                line.push_span(Span::styled("Esc", consts::KEY_STYLE));
                line.push_span(")");
            }
            PauseOpt::Restart => line.push_span("Restart"),
            PauseOpt::MainMenu => line.push_span("Main Menu"),
            PauseOpt::Quit => line.push_span("Quit"),
        }
        if selected {
            line = line.style(consts::MENU_SELECTION_STYLE);
        }
        line
    }
}

impl Widget for PauseMenu {
    /*
     * ┌───── PAUSED ─────┐
     * │ » Resume (Esc)   │
     * │   Restart        │
     * │   Main Menu      │
     * │   Quit           │
     * └──────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = PauseMenu::block();
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        for (opt, row) in PauseOpt::iter().zip(inner.rows()) {
            opt.to_line(self.selection == opt).render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_and_choose() {
        let mut menu = PauseMenu::new();
        assert_eq!(menu.selection(), PauseOpt::Resume);
        assert_eq!(menu.handle_command(Command::Up), None);
        assert_eq!(menu.selection(), PauseOpt::Resume);
        assert_eq!(menu.handle_command(Command::Down), None);
        assert_eq!(menu.handle_command(Command::Down), None);
        assert_eq!(menu.handle_command(Command::Enter), Some(PauseOpt::MainMenu));
        assert_eq!(menu.handle_command(Command::End), None);
        assert_eq!(menu.handle_command(Command::Next), None);
        assert_eq!(menu.selection(), PauseOpt::Resume);
        assert_eq!(menu.handle_command(Command::Prev), None);
        assert_eq!(menu.selection(), PauseOpt::Quit);
    }

    #[test]
    fn escape_resumes() {
        let mut menu = PauseMenu::new();
        let _ = menu.handle_command(Command::End);
        assert_eq!(menu.handle_command(Command::Esc), Some(PauseOpt::Resume));
    }

    #[test]
    fn pointer() {
        let area = Rect::new(10, 5, PauseMenu::WIDTH, PauseMenu::HEIGHT);
        let mut menu = PauseMenu::new();
        assert_eq!(PauseMenu::option_at(area, Position::new(10, 5)), None);
        assert_eq!(
            menu.handle_pointer(area, Position::new(14, 7), false),
            None
        );
        assert_eq!(menu.selection(), PauseOpt::Restart);
        assert_eq!(
            menu.handle_pointer(area, Position::new(14, 9), true),
            Some(PauseOpt::Quit)
        );
    }

    #[test]
    fn render() {
        let area = Rect::new(0, 0, PauseMenu::WIDTH, PauseMenu::HEIGHT);
        let mut buffer = Buffer::empty(area);
        PauseMenu::new().render(area, &mut buffer);
        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buffer[(x, y)].symbol().to_owned())
                .collect()
        };
        assert!(row(0).contains("PAUSED"));
        assert!(row(1).contains("» Resume (Esc)"));
        assert!(row(2).contains("  Restart"));
        assert!(row(4).contains("  Quit"));
    }
}

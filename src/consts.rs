//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Size of the playing field in logical cells
pub(crate) const GRID_SIZE: Size = Size {
    width: 17,
    height: 17,
};

/// Number of terminal columns used to draw one logical cell
pub(crate) const CELL_WIDTH: u16 = 2;

/// Milliseconds between snake movements before any food has been eaten
pub(crate) const BASE_TICK_MS: u64 = 150;

/// The snake never moves faster than one cell per this many milliseconds
pub(crate) const MIN_TICK_MS: u64 = 60;

/// How much the tick interval shrinks at each step of the speed staircase
pub(crate) const SPEED_STEP_MS: u64 = 10;

/// The tick interval shrinks once per this many points
pub(crate) const SCORE_THRESHOLD: u32 = 5;

/// Points awarded per food eaten
pub(crate) const SCORE_PER_FOOD: u32 = 1;

/// Target snake length at the start of a game
pub(crate) const INITIAL_SNAKE_LENGTH: usize = 1;

/// Length of the outward half of a screen transition
pub(crate) const TRANSITION_DURATION: Duration = Duration::from_millis(400);

/// Columns & rows of the transition's cell grid
pub(crate) const TRANSITION_GRID: Size = Size {
    width: 20,
    height: 8,
};

/// Default number of frames drawn per second
pub(crate) const DEFAULT_FRAME_RATE: u32 = 60;

/// Maximum number of entered lines kept for recall in the console
pub(crate) const CONSOLE_HISTORY_CAP: usize = 50;

/// Maximum number of prompt/output pairs kept in the console
pub(crate) const CONSOLE_OUTPUT_CAP: usize = 100;

/// Height of the console overlay, including its border
pub(crate) const CONSOLE_HEIGHT: u16 = 12;

/// Amount by which the arrow keys change a volume setting
pub(crate) const VOLUME_STEP: u8 = 5;

/// How long the screen shakes after the snake crashes
pub(crate) const SHAKE_DURATION: Duration = Duration::from_millis(350);

/// Number of particles in the burst drawn when food is eaten
pub(crate) const BURST_PARTICLES: usize = 10;

/// How long an eat-burst particle lives
pub(crate) const PARTICLE_LIFETIME: Duration = Duration::from_millis(500);

/// Number of leaves drifting across the background
pub(crate) const LEAF_COUNT: usize = 12;

/// Glyph for the snake's head
pub(crate) const SNAKE_HEAD_SYMBOL: &str = "██";

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: &str = "▓▓";

/// Glyph for the food
pub(crate) const FOOD_SYMBOL: &str = "●";

/// Glyph for the snake's head when it's crashed
pub(crate) const COLLISION_SYMBOL: &str = "××";

/// Retro-mode glyph for the snake's head
pub(crate) const RETRO_HEAD_SYMBOL: &str = "@@";

/// Retro-mode glyph for the snake's body
pub(crate) const RETRO_BODY_SYMBOL: &str = "[]";

/// Retro-mode glyph for the food
pub(crate) const RETRO_FOOD_SYMBOL: &str = "()";

/// Glyph for a drifting background leaf
pub(crate) const LEAF_SYMBOL: char = '❧';

/// Glyphs for eat-burst particles, from freshest to most faded
pub(crate) const PARTICLE_SYMBOLS: [char; 3] = ['*', '+', '·'];

/// Glyphs for transition cells, from faintest to opaque
pub(crate) const TRANSITION_SHADES: [char; 4] = ['░', '▒', '▓', '█'];

/// Colors cycled through along the snake in rainbow mode
pub(crate) const RAINBOW: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for the food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for the crashed head
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

/// Style for background leaves
pub(crate) const LEAF_STYLE: Style = Style::new().fg(Color::DarkGray);

/// Style for eat-burst particles
pub(crate) const PARTICLE_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for transition cells
pub(crate) const TRANSITION_STYLE: Style = Style::new().fg(Color::Green);

/// Style for the filled part of a volume slider
pub(crate) const SLIDER_FILL_STYLE: Style = Style::new().fg(Color::Green);

/// Style for prompt lines echoed in the console
pub(crate) const CONSOLE_PROMPT_STYLE: Style = Style::new().fg(Color::Cyan);

/// Style for the FPS readout
pub(crate) const FPS_STYLE: Style = Style::new().fg(Color::DarkGray);

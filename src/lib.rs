//! Hydro Hero - catch falling rain in a bucket and empty it into the tanks
//!
//! Core modules:
//! - `sim`: Round simulation (spawning, movement, catches, deposits, timer, phases)
//! - `tuning`: Gameplay numbers as data
//! - `settings`: Key bindings and visual preferences
//! - `highscores`: Session leaderboard
//! - `renderer`: Canvas2D drawing (wasm only)

pub mod highscores;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, RoundRecord};
pub use settings::{KeyAction, Settings};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Play area dimensions (canvas pixels)
    pub const BOARD_WIDTH: f32 = 800.0;
    pub const BOARD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Flat per-frame displacement, not time-scaled
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Player's top edge sits this far above the bottom of the board
    pub const PLAYER_FLOOR_OFFSET: f32 = 80.0;
    pub const BUCKET_MAX: u32 = 5;

    /// Raindrop defaults
    pub const DROP_RADIUS: f32 = 4.0;
    pub const DROP_SPAWN_Y: f32 = -10.0;
    pub const DROP_SPAWN_MARGIN: f32 = 5.0;
    pub const DROP_MIN_SPEED: f32 = 3.0;
    pub const DROP_MAX_SPEED: f32 = 4.5;
    /// Chance per frame that a new drop appears
    pub const SPAWN_CHANCE: f32 = 0.035;
    /// How far below the board a drop may fall before it counts as missed
    pub const OFFSCREEN_TOLERANCE: f32 = 10.0;

    /// Score per caught drop
    pub const POINTS_PER_DROP: u32 = 10;

    /// Round length in seconds
    pub const ROUND_SECONDS: u32 = 60;

    /// Tanks sit in the bottom corners
    pub const TANK_WIDTH: f32 = 40.0;
    pub const TANK_HEIGHT: f32 = 60.0;
    pub const TANK_INSET: f32 = 10.0;
    pub const TANK_FLOOR_OFFSET: f32 = 70.0;

    /// Pre-round countdown
    pub const COUNTDOWN_LABELS: [&str; 5] = ["Ready?", "3", "2", "1", "GO!"];
    pub const COUNTDOWN_STEP_MS: u32 = 800;

    /// Host-side timer period for the round clock
    pub const TIMER_PERIOD_MS: u32 = 1000;
}

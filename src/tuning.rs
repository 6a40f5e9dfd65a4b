//! Gameplay numbers as data
//!
//! The shipped game always plays with `Tuning::default()`. Tests build
//! variants (no random spawns, short rounds) to get deterministic scenarios.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a tuning table is rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("board must have positive size, got {width}x{height}")]
    EmptyBoard { width: f32, height: f32 },

    #[error("player must have positive size and speed")]
    BadPlayer,

    #[error("player ({player}px) does not fit on the board ({board}px)")]
    PlayerTooWide { player: f32, board: f32 },

    #[error("bucket capacity must be at least 1")]
    ZeroBucket,

    #[error("spawn chance {0} is outside [0, 1]")]
    SpawnChance(f32),

    #[error("drop speed band [{min}, {max}) is empty or negative")]
    SpeedBand { min: f32, max: f32 },

    #[error("spawn margin {margin} leaves no room on a {width}px board")]
    SpawnMargin { margin: f32, width: f32 },

    #[error("round length must be at least one second")]
    ZeroRound,

    #[error("countdown needs at least one label")]
    EmptyCountdown,

    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Gameplay constants for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub board_width: f32,
    pub board_height: f32,

    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub player_floor_offset: f32,
    pub bucket_max: u32,

    pub drop_radius: f32,
    pub drop_spawn_y: f32,
    pub drop_spawn_margin: f32,
    pub drop_min_speed: f32,
    pub drop_max_speed: f32,
    pub spawn_chance: f32,
    pub offscreen_tolerance: f32,

    pub points_per_drop: u32,
    pub round_seconds: u32,

    pub tank_width: f32,
    pub tank_height: f32,
    pub tank_inset: f32,
    pub tank_floor_offset: f32,

    pub countdown_labels: Vec<String>,
    pub countdown_step_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            player_floor_offset: PLAYER_FLOOR_OFFSET,
            bucket_max: BUCKET_MAX,

            drop_radius: DROP_RADIUS,
            drop_spawn_y: DROP_SPAWN_Y,
            drop_spawn_margin: DROP_SPAWN_MARGIN,
            drop_min_speed: DROP_MIN_SPEED,
            drop_max_speed: DROP_MAX_SPEED,
            spawn_chance: SPAWN_CHANCE,
            offscreen_tolerance: OFFSCREEN_TOLERANCE,

            points_per_drop: POINTS_PER_DROP,
            round_seconds: ROUND_SECONDS,

            tank_width: TANK_WIDTH,
            tank_height: TANK_HEIGHT,
            tank_inset: TANK_INSET,
            tank_floor_offset: TANK_FLOOR_OFFSET,

            countdown_labels: COUNTDOWN_LABELS.iter().map(|s| s.to_string()).collect(),
            countdown_step_ms: COUNTDOWN_STEP_MS,
        }
    }
}

impl Tuning {
    /// Parse a tuning table and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the table describes a playable round
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.board_width <= 0.0 || self.board_height <= 0.0 {
            return Err(TuningError::EmptyBoard {
                width: self.board_width,
                height: self.board_height,
            });
        }
        if self.player_width <= 0.0 || self.player_height <= 0.0 || self.player_speed <= 0.0 {
            return Err(TuningError::BadPlayer);
        }
        if self.player_width > self.board_width {
            return Err(TuningError::PlayerTooWide {
                player: self.player_width,
                board: self.board_width,
            });
        }
        if self.bucket_max == 0 {
            return Err(TuningError::ZeroBucket);
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(TuningError::SpawnChance(self.spawn_chance));
        }
        if self.drop_min_speed < 0.0 || self.drop_max_speed <= self.drop_min_speed {
            return Err(TuningError::SpeedBand {
                min: self.drop_min_speed,
                max: self.drop_max_speed,
            });
        }
        if self.drop_spawn_margin < 0.0 || 2.0 * self.drop_spawn_margin >= self.board_width {
            return Err(TuningError::SpawnMargin {
                margin: self.drop_spawn_margin,
                width: self.board_width,
            });
        }
        if self.round_seconds == 0 {
            return Err(TuningError::ZeroRound);
        }
        if self.countdown_labels.is_empty() {
            return Err(TuningError::EmptyCountdown);
        }
        Ok(())
    }

    /// Leftmost x the player may occupy is 0; this is the rightmost
    pub fn player_max_x(&self) -> f32 {
        self.board_width - self.player_width
    }

    /// Player's starting x (centered)
    pub fn player_start_x(&self) -> f32 {
        self.board_width / 2.0 - self.player_width / 2.0
    }

    /// Player's fixed y (top edge)
    pub fn player_y(&self) -> f32 {
        self.board_height - self.player_floor_offset
    }

    /// Drops below this y are gone
    pub fn miss_line(&self) -> f32 {
        self.board_height + self.offscreen_tolerance
    }

    /// Same as default but without random spawns
    pub fn without_spawns() -> Self {
        Self {
            spawn_chance: 0.0,
            ..Self::default()
        }
    }
}

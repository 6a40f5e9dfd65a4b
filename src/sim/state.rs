//! Round state and entity types
//!
//! One `GameState` owns everything a session mutates: the player, the tanks,
//! the falling drops, the counters, the phase and the round timer handle.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timer::RoundTimer;
use crate::highscores::HighScores;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start prompt is showing
    Idle,
    /// Pre-round countdown, `step` indexes the label on screen
    Countdown { step: usize },
    /// Round in progress
    Active,
    /// Timer ran out, summary is showing
    Ended,
    /// Player quit from the summary; nothing runs any more
    Quit,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Countdown { .. } => "countdown",
            GamePhase::Active => "active",
            GamePhase::Ended => "ended",
            GamePhase::Quit => "quit",
        }
    }
}

/// Scheduling generation.
///
/// Every host callback (countdown timeout, timer interval, animation frame)
/// remembers the generation it was scheduled under. Once the session moves on
/// the generation changes and late callbacks are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// The player and their bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Pixels per frame
    pub speed: f32,
    /// Drops currently held
    pub bucket: u32,
    pub bucket_max: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_start_x(), tuning.player_y()),
            width: tuning.player_width,
            height: tuning.player_height,
            speed: tuning.player_speed,
            bucket: 0,
            bucket_max: tuning.bucket_max,
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn is_full(&self) -> bool {
        self.bucket >= self.bucket_max
    }

    /// Bucket fill in [0, 1]
    pub fn fill_ratio(&self) -> f32 {
        if self.bucket_max == 0 {
            0.0
        } else {
            self.bucket as f32 / self.bucket_max as f32
        }
    }
}

/// A falling raindrop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainDrop {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub radius: f32,
    /// Pixels per frame, downward
    pub speed: f32,
}

impl RainDrop {
    /// Lowest point of the drop
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// A collection tank
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tank {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Tank {
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }
}

/// The two tanks in the bottom corners
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tanks {
    pub left: Tank,
    pub right: Tank,
}

impl Tanks {
    pub fn new(tuning: &Tuning) -> Self {
        let y = tuning.board_height - tuning.tank_floor_offset;
        Self {
            left: Tank {
                pos: Vec2::new(tuning.tank_inset, y),
                width: tuning.tank_width,
                height: tuning.tank_height,
            },
            right: Tank {
                pos: Vec2::new(
                    tuning.board_width - tuning.tank_inset - tuning.tank_width,
                    y,
                ),
                width: tuning.tank_width,
                height: tuning.tank_height,
            },
        }
    }

    /// Whether the player stands at (or past) either tank's inner edge
    pub fn in_reach(&self, player: &Player) -> bool {
        player.left() <= self.left.right() || player.right() >= self.right.pos.x
    }
}

/// Per-round tallies shown on the summary screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    pub caught: u32,
    pub missed: u32,
    pub deposits: u32,
    /// Sum of bucket contents emptied into tanks
    pub water_deposited: u32,
}

/// Things that happened since the host last drained the queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    DropSpawned { id: u32 },
    DropCaught { id: u32, bucket: u32 },
    DropMissed { id: u32 },
    Deposited { amount: u32 },
    TimerTicked { time_left: u32 },
    CountdownStep { label: String },
    RoundStarted,
    RoundEnded { score: u32, high_score: u32, new_high: bool },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    pub generation: Generation,
    pub player: Player,
    pub tanks: Tanks,
    /// Falling drops in spawn order
    pub drops: Vec<RainDrop>,
    pub score: u32,
    /// Seconds left in the round
    pub time_left: u32,
    /// Best score this session
    pub high_score: u32,
    pub stats: RoundStats,
    pub leaderboard: HighScores,
    /// The one running round clock, if any
    pub timer: Option<RoundTimer>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session in the Idle phase
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            player: Player::new(&tuning),
            tanks: Tanks::new(&tuning),
            time_left: tuning.round_seconds,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            generation: Generation::default(),
            drops: Vec::new(),
            score: 0,
            high_score: 0,
            stats: RoundStats::default(),
            leaderboard: HighScores::new(),
            timer: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Updates only run while this holds
    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Put counters, player and drops back to round-start values
    pub fn reset_round(&mut self) {
        self.score = 0;
        self.time_left = self.tuning.round_seconds;
        self.player = Player::new(&self.tuning);
        self.drops.clear();
        self.stats = RoundStats::default();
    }

    /// Invalidate every callback scheduled so far
    pub fn bump_generation(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.generation
    }

    /// Label on screen during the countdown
    pub fn countdown_label(&self) -> Option<&str> {
        match self.phase {
            GamePhase::Countdown { step } => {
                self.tuning.countdown_labels.get(step).map(String::as_str)
            }
            _ => None,
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending events, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(Tuning::default(), 7);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(!state.is_active());
        assert_eq!(state.time_left, 60);
        assert_eq!(state.player.pos, Vec2::new(380.0, 520.0));
        assert!(state.timer.is_none());
    }

    #[test]
    fn test_tank_layout() {
        let tanks = Tanks::new(&Tuning::default());
        assert_eq!(tanks.left.pos, Vec2::new(10.0, 530.0));
        assert_eq!(tanks.right.pos, Vec2::new(750.0, 530.0));
        assert_eq!(tanks.left.right(), 50.0);
    }

    #[test]
    fn test_tank_reach_edges() {
        let tuning = Tuning::default();
        let tanks = Tanks::new(&tuning);
        let mut player = Player::new(&tuning);
        assert!(!tanks.in_reach(&player));

        player.pos.x = 50.0;
        assert!(tanks.in_reach(&player));
        player.pos.x = 51.0;
        assert!(!tanks.in_reach(&player));

        // right edge at 750 touches the right tank
        player.pos.x = 710.0;
        assert!(tanks.in_reach(&player));
        player.pos.x = 709.0;
        assert!(!tanks.in_reach(&player));
    }

    #[test]
    fn test_reset_round_keeps_high_score() {
        let mut state = GameState::new(Tuning::default(), 7);
        state.score = 120;
        state.high_score = 300;
        state.time_left = 3;
        state.player.bucket = 4;
        state.player.pos.x = 12.0;
        let id = state.next_entity_id();
        state.drops.push(RainDrop {
            id,
            pos: Vec2::new(100.0, 100.0),
            radius: 4.0,
            speed: 3.0,
        });

        state.reset_round();
        assert_eq!(state.score, 0);
        assert_eq!(state.time_left, 60);
        assert_eq!(state.player.bucket, 0);
        assert_eq!(state.player.pos.x, 380.0);
        assert!(state.drops.is_empty());
        assert_eq!(state.high_score, 300);
    }

    #[test]
    fn test_fill_ratio() {
        let mut player = Player::new(&Tuning::default());
        assert_eq!(player.fill_ratio(), 0.0);
        player.bucket = 2;
        assert!((player.fill_ratio() - 0.4).abs() < 1e-6);
        player.bucket = 5;
        assert!(player.is_full());
    }
}

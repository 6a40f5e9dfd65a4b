//! Round simulation
//!
//! All gameplay logic lives here, with no rendering or platform dependencies:
//! - Seeded RNG only
//! - One owned `GameState` per session
//! - Host callbacks carry a `Generation` so stale ones are dropped

pub mod autopilot;
pub mod round;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;
pub mod view;

pub use autopilot::autopilot_input;
pub use round::{CountdownOutcome, RoundInput, advance_countdown, press};
pub use spawner::{maybe_spawn, push_drop, spawn_drop};
pub use state::{
    GameEvent, GamePhase, GameState, Generation, Player, RainDrop, RoundStats, Tank, Tanks,
};
pub use tick::{TickInput, catches, deposit, tick};
pub use timer::{RoundTimer, TimerOutcome, active_timer_count, cancel_timer, start_timer, timer_tick};
pub use view::{DropView, FrameView, Rect};

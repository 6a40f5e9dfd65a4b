//! Round controller
//!
//! Legal transitions:
//!
//! ```text
//! Idle --start--> Countdown --labels done--> Active --timer 0--> Ended
//!                     ^                                            |
//!                     +------------------replay--------------------+
//!                                                                  |
//!                                                     Quit <--quit-+
//! ```
//!
//! Inputs that are not legal in the current phase are ignored.

use super::state::{GameEvent, GamePhase, GameState, Generation};
use super::timer::{cancel_timer, start_timer};

/// Edge-triggered round inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundInput {
    Start,
    Replay,
    Quit,
}

/// What the host should do after a countdown step fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownOutcome {
    /// Show this label and schedule the next step
    Step { label: String },
    /// Countdown finished, round is live: start the frame loop and clock
    Started { generation: Generation },
    /// Step was scheduled by an earlier countdown; drop it
    Stale,
}

/// Apply a round input. Returns false when the phase ignores it.
pub fn press(state: &mut GameState, input: RoundInput) -> bool {
    match (state.phase, input) {
        (GamePhase::Idle, RoundInput::Start) | (GamePhase::Ended, RoundInput::Replay) => {
            begin_countdown(state);
            true
        }
        (GamePhase::Ended, RoundInput::Quit) => {
            cancel_timer(state);
            state.bump_generation();
            state.phase = GamePhase::Quit;
            log::info!("Player quit (high score {})", state.high_score);
            true
        }
        _ => false,
    }
}

/// Enter the countdown with the first label showing
fn begin_countdown(state: &mut GameState) {
    cancel_timer(state);
    let generation = state.bump_generation();
    state.reset_round();
    state.phase = GamePhase::Countdown { step: 0 };

    if let Some(label) = state.countdown_label().map(str::to_owned) {
        state.push_event(GameEvent::CountdownStep { label });
    }
    log::debug!("Countdown started (generation {})", generation.0);
}

/// Fire one countdown step scheduled under `generation`
pub fn advance_countdown(state: &mut GameState, generation: Generation) -> CountdownOutcome {
    let GamePhase::Countdown { step } = state.phase else {
        return CountdownOutcome::Stale;
    };
    if generation != state.generation {
        log::warn!(
            "Dropping stale countdown step (generation {}, current {})",
            generation.0,
            state.generation.0
        );
        return CountdownOutcome::Stale;
    }

    let next = step + 1;
    if let Some(label) = state.tuning.countdown_labels.get(next).cloned() {
        state.phase = GamePhase::Countdown { step: next };
        state.push_event(GameEvent::CountdownStep {
            label: label.clone(),
        });
        return CountdownOutcome::Step { label };
    }

    start_round(state);
    CountdownOutcome::Started {
        generation: state.generation,
    }
}

/// Countdown -> Active
fn start_round(state: &mut GameState) {
    state.reset_round();
    state.phase = GamePhase::Active;
    start_timer(state);
    state.push_event(GameEvent::RoundStarted);
    log::info!(
        "Round started: {} seconds (generation {})",
        state.time_left,
        state.generation.0
    );
}

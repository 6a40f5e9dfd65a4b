//! Round clock
//!
//! The host fires `timer_tick` once per wall-clock second, independent of the
//! frame rate. A session owns at most one `RoundTimer`; the generation it
//! carries lets late ticks from an earlier round be recognised and dropped.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState, Generation};
use crate::highscores::RoundRecord;

/// Handle for the running round clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTimer {
    pub generation: Generation,
    /// Ticks delivered so far (active or not)
    pub ticks: u32,
}

/// What the host should do after delivering a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// One second passed; keep the interval
    Ticked { time_left: u32 },
    /// The round just ended; clear the interval
    Expired { score: u32, high_score: u32 },
    /// Not active right now; keep the interval
    Inert,
    /// Tick belongs to a cancelled timer; clear the interval
    Stale,
}

impl TimerOutcome {
    /// Whether the host should stop its interval
    pub fn should_cancel(&self) -> bool {
        matches!(self, TimerOutcome::Expired { .. } | TimerOutcome::Stale)
    }
}

/// Register the round clock for the current generation
pub fn start_timer(state: &mut GameState) -> Generation {
    if let Some(old) = state.timer {
        // Every path into Active clears the old clock first
        log::error!(
            "Round timer started while generation {} is still registered",
            old.generation.0
        );
        debug_assert!(false, "at most one round timer per session");
    }

    state.timer = Some(RoundTimer {
        generation: state.generation,
        ticks: 0,
    });
    state.generation
}

/// Drop the registered clock, if any
pub fn cancel_timer(state: &mut GameState) {
    if let Some(timer) = state.timer.take() {
        log::debug!(
            "Round timer cancelled after {} ticks (generation {})",
            timer.ticks,
            timer.generation.0
        );
    }
}

/// 0 or 1
pub fn active_timer_count(state: &GameState) -> usize {
    usize::from(state.timer.is_some())
}

/// Deliver one wall-clock second.
///
/// Decrements first, then ends the round once `time_left` reaches zero: a
/// 60 second round ends on the 60th tick with the display reading 0.
pub fn timer_tick(state: &mut GameState, generation: Generation) -> TimerOutcome {
    let Some(timer) = state.timer.as_mut() else {
        log::warn!("Timer tick for generation {} with no clock running", generation.0);
        return TimerOutcome::Stale;
    };
    if timer.generation != generation {
        log::warn!(
            "Dropping stale timer tick (generation {}, current {})",
            generation.0,
            timer.generation.0
        );
        return TimerOutcome::Stale;
    }
    timer.ticks += 1;

    if !state.is_active() {
        return TimerOutcome::Inert;
    }

    state.time_left = state.time_left.saturating_sub(1);
    state.push_event(GameEvent::TimerTicked {
        time_left: state.time_left,
    });

    if state.time_left > 0 {
        return TimerOutcome::Ticked {
            time_left: state.time_left,
        };
    }

    end_round(state);
    TimerOutcome::Expired {
        score: state.score,
        high_score: state.high_score,
    }
}

/// Active -> Ended: stop the clock and settle the high score
fn end_round(state: &mut GameState) {
    cancel_timer(state);
    state.phase = GamePhase::Ended;

    let new_high = state.score > state.high_score;
    state.high_score = state.high_score.max(state.score);
    let rank = state.leaderboard.add_score(RoundRecord {
        score: state.score,
        caught: state.stats.caught,
        missed: state.stats.missed,
        deposits: state.stats.deposits,
    });

    log::info!(
        "Time's up! score {} (high {}, rank {:?})",
        state.score,
        state.high_score,
        rank
    );
    state.push_event(GameEvent::RoundEnded {
        score: state.score,
        high_score: state.high_score,
        new_high,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{TickInput, tick};
    use crate::tuning::Tuning;

    fn running_round(seconds: u32) -> (GameState, Generation) {
        let tuning = Tuning {
            round_seconds: seconds,
            ..Tuning::without_spawns()
        };
        let mut state = GameState::new(tuning, 1);
        state.bump_generation();
        state.reset_round();
        state.phase = GamePhase::Active;
        let generation = start_timer(&mut state);
        (state, generation)
    }

    #[test]
    fn test_counts_down_one_per_tick() {
        let (mut state, generation) = running_round(60);
        assert_eq!(
            timer_tick(&mut state, generation),
            TimerOutcome::Ticked { time_left: 59 }
        );
        assert_eq!(state.time_left, 59);
    }

    #[test]
    fn test_full_round_ends_on_last_tick() {
        let (mut state, generation) = running_round(60);
        for expected in (1..60).rev() {
            assert_eq!(
                timer_tick(&mut state, generation),
                TimerOutcome::Ticked { time_left: expected }
            );
        }
        assert!(state.is_active());
        assert_eq!(state.time_left, 1);

        let outcome = timer_tick(&mut state, generation);
        assert_eq!(
            outcome,
            TimerOutcome::Expired {
                score: 0,
                high_score: 0
            }
        );
        assert!(outcome.should_cancel());
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.time_left, 0);
        assert_eq!(active_timer_count(&state), 0);
    }

    #[test]
    fn test_exactly_one_end_event() {
        let (mut state, generation) = running_round(2);
        timer_tick(&mut state, generation);
        timer_tick(&mut state, generation);
        // Interval not cleared yet by the host: later ticks are stale
        assert_eq!(timer_tick(&mut state, generation), TimerOutcome::Stale);
        assert_eq!(timer_tick(&mut state, generation), TimerOutcome::Stale);

        let ended = state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
            .count();
        assert_eq!(ended, 1);
        assert_eq!(state.time_left, 0);
    }

    #[test]
    fn test_inert_while_inactive() {
        let (mut state, generation) = running_round(60);
        state.phase = GamePhase::Countdown { step: 0 };
        assert_eq!(timer_tick(&mut state, generation), TimerOutcome::Inert);
        assert_eq!(state.time_left, 60);
        assert_eq!(state.timer.map(|t| t.ticks), Some(1));
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let (mut state, old) = running_round(60);
        cancel_timer(&mut state);
        state.bump_generation();
        let current = start_timer(&mut state);
        assert_ne!(old, current);

        assert_eq!(timer_tick(&mut state, old), TimerOutcome::Stale);
        assert_eq!(state.time_left, 60);
        assert_eq!(
            timer_tick(&mut state, current),
            TimerOutcome::Ticked { time_left: 59 }
        );
    }

    #[test]
    fn test_high_score_only_rises() {
        let (mut state, generation) = running_round(1);
        state.high_score = 50;
        state.score = 30;
        timer_tick(&mut state, generation);
        assert_eq!(state.high_score, 50);
        assert!(state.events().contains(&GameEvent::RoundEnded {
            score: 30,
            high_score: 50,
            new_high: false
        }));

        let (mut state, generation) = running_round(1);
        state.high_score = 50;
        state.score = 80;
        timer_tick(&mut state, generation);
        assert_eq!(state.high_score, 80);
        assert_eq!(state.leaderboard.best(), 80);
    }

    #[test]
    fn test_updates_stop_after_expiry() {
        let (mut state, generation) = running_round(1);
        timer_tick(&mut state, generation);
        assert_eq!(state.phase, GamePhase::Ended);

        crate::sim::spawner::push_drop(&mut state, glam::Vec2::new(400.0, 510.0), 4.0, 4.0);
        let before = format!("{:?}", state);
        for _ in 0..50 {
            tick(&mut state, &TickInput { left: true, ..Default::default() });
        }
        assert_eq!(format!("{:?}", state), before);
    }

    #[test]
    #[should_panic(expected = "at most one round timer")]
    #[cfg(debug_assertions)]
    fn test_second_timer_is_a_bug() {
        let (mut state, _) = running_round(60);
        start_timer(&mut state);
    }
}

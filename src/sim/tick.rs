//! Per-frame update step
//!
//! One call advances the round by one animation frame. Displacements are flat
//! per-frame pixel deltas, so the game speeds up and slows down with the
//! display's frame rate.

use super::autopilot::autopilot_input;
use super::spawner::maybe_spawn;
use super::state::{GameEvent, GameState, RainDrop};

/// Held-key state for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Demo mode: the autopilot steers instead of the keys
    pub autopilot: bool,
}

/// Advance the round by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Paused, counting down or over: nothing moves
    if !state.is_active() {
        return;
    }

    let input = if input.autopilot {
        autopilot_input(state)
    } else {
        *input
    };
    move_player(state, &input);

    maybe_spawn(state);

    // Newest first so removal doesn't disturb indices still to visit
    for i in (0..state.drops.len()).rev() {
        let drop = &mut state.drops[i];
        drop.pos.y += drop.speed;

        if catches(state, &state.drops[i]) {
            let drop = state.drops.remove(i);
            let player = &mut state.player;
            player.bucket = (player.bucket + 1).min(player.bucket_max);
            state.score += state.tuning.points_per_drop;
            state.stats.caught += 1;
            log::debug!("Caught drop {} (bucket {})", drop.id, state.player.bucket);
            state.push_event(GameEvent::DropCaught {
                id: drop.id,
                bucket: state.player.bucket,
            });
        } else if state.drops[i].pos.y > state.tuning.miss_line() {
            let drop = state.drops.remove(i);
            state.stats.missed += 1;
            state.push_event(GameEvent::DropMissed { id: drop.id });
        }
    }

    deposit(state);
}

/// Move the player one step; a step that would leave the board is refused
fn move_player(state: &mut GameState, input: &TickInput) {
    let max_x = state.tuning.player_max_x();
    let player = &mut state.player;

    if input.left && player.pos.x - player.speed >= 0.0 {
        player.pos.x -= player.speed;
    }
    if input.right && player.pos.x + player.speed <= max_x {
        player.pos.x += player.speed;
    }
}

/// Whether the bucket takes this drop right now.
///
/// A full bucket takes nothing: the drop keeps falling and is eventually missed.
pub fn catches(state: &GameState, drop: &RainDrop) -> bool {
    let player = &state.player;
    drop.bottom() >= player.pos.y
        && drop.pos.x >= player.left()
        && drop.pos.x <= player.right()
        && !player.is_full()
        && state.is_active()
}

/// Empty the bucket if the player stands at a tank
pub fn deposit(state: &mut GameState) -> bool {
    if state.player.bucket == 0 || !state.tanks.in_reach(&state.player) {
        return false;
    }

    let amount = state.player.bucket;
    state.player.bucket = 0;
    state.stats.deposits += 1;
    state.stats.water_deposited += amount;
    log::debug!("Deposited {} drops", amount);
    state.push_event(GameEvent::Deposited { amount });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawner::push_drop;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    fn active_state(tuning: Tuning) -> GameState {
        let mut state = GameState::new(tuning, 12345);
        state.reset_round();
        state.phase = GamePhase::Active;
        state
    }

    fn hold_left() -> TickInput {
        TickInput {
            left: true,
            ..Default::default()
        }
    }

    fn hold_right() -> TickInput {
        TickInput {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_inactive_is_noop() {
        let mut state = GameState::new(Tuning::default(), 12345);
        push_drop(&mut state, Vec2::new(400.0, 100.0), 4.0, 3.0);
        state.drain_events();
        let before = format!("{:?}", state);

        for _ in 0..100 {
            tick(&mut state, &hold_left());
        }
        assert_eq!(format!("{:?}", state), before);
    }

    #[test]
    fn test_player_moves_and_stops_at_edges() {
        let mut state = active_state(Tuning::without_spawns());
        tick(&mut state, &hold_left());
        assert_eq!(state.player.pos.x, 375.0);

        for _ in 0..200 {
            tick(&mut state, &hold_left());
        }
        assert_eq!(state.player.pos.x, 0.0);

        for _ in 0..400 {
            tick(&mut state, &hold_right());
        }
        assert_eq!(state.player.pos.x, 760.0);
    }

    #[test]
    fn test_step_that_would_overshoot_is_refused() {
        let mut state = active_state(Tuning::without_spawns());
        state.player.pos.x = 3.0;
        tick(&mut state, &hold_left());
        assert_eq!(state.player.pos.x, 3.0);

        state.player.pos.x = 757.0;
        tick(&mut state, &hold_right());
        assert_eq!(state.player.pos.x, 757.0);
    }

    #[test]
    fn test_catch_scenario() {
        let mut state = active_state(Tuning::without_spawns());
        state.player.bucket = 2;

        // One right over the bucket, two well off to the side
        let target = push_drop(&mut state, Vec2::new(400.0, 400.0), 4.0, 4.0);
        let far_left = push_drop(&mut state, Vec2::new(100.0, 300.0), 4.0, 3.0);
        let far_right = push_drop(&mut state, Vec2::new(700.0, 200.0), 4.0, 3.5);
        state.drain_events();

        // 400 + 4 + 4n >= 520 first holds at n = 29
        for _ in 0..28 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.player.bucket, 2);
        assert_eq!(state.drops.len(), 3);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.bucket, 3);
        assert_eq!(state.score, 10);
        assert_eq!(state.stats.caught, 1);
        assert!(state.drops.iter().all(|d| d.id != target));
        assert!(state.drops.iter().any(|d| d.id == far_left));
        assert!(state.drops.iter().any(|d| d.id == far_right));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::DropCaught {
                id: target,
                bucket: 3
            }]
        );
    }

    #[test]
    fn test_full_bucket_misses() {
        let mut state = active_state(Tuning::without_spawns());
        state.player.bucket = 5;
        let id = push_drop(&mut state, Vec2::new(400.0, 500.0), 4.0, 4.0);

        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.drops.is_empty());
        assert_eq!(state.player.bucket, 5);
        assert_eq!(state.score, 0);
        assert_eq!(state.stats.missed, 1);
        assert!(state.events().contains(&GameEvent::DropMissed { id }));
    }

    #[test]
    fn test_drop_beside_player_is_missed_only_past_tolerance() {
        let mut state = active_state(Tuning::without_spawns());
        push_drop(&mut state, Vec2::new(100.0, 605.0), 4.0, 5.0);

        // 610 is not past 600 + 10
        tick(&mut state, &TickInput::default());
        assert_eq!(state.drops.len(), 1);

        tick(&mut state, &TickInput::default());
        assert!(state.drops.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_catch_at_player_edges() {
        let mut state = active_state(Tuning::without_spawns());
        // player spans [380, 420]
        push_drop(&mut state, Vec2::new(380.0, 520.0), 4.0, 1.0);
        push_drop(&mut state, Vec2::new(420.0, 520.0), 4.0, 1.0);
        push_drop(&mut state, Vec2::new(420.5, 520.0), 4.0, 1.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.bucket, 2);
        assert_eq!(state.drops.len(), 1);
        assert_eq!(state.drops[0].pos.x, 420.5);
    }

    #[test]
    fn test_newest_drop_wins_last_slot() {
        let mut state = active_state(Tuning::without_spawns());
        state.player.bucket = 4;
        let older = push_drop(&mut state, Vec2::new(400.0, 520.0), 4.0, 1.0);
        let newer = push_drop(&mut state, Vec2::new(401.0, 520.0), 4.0, 1.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.bucket, 5);
        assert_eq!(state.score, 10);
        assert_eq!(state.drops.len(), 1);
        assert_eq!(state.drops[0].id, older);
        assert!(state.events().iter().any(|e| matches!(
            e,
            GameEvent::DropCaught { id, .. } if *id == newer
        )));
    }

    #[test]
    fn test_deposit_at_left_tank() {
        let mut state = active_state(Tuning::without_spawns());
        state.player.bucket = 3;
        state.player.pos.x = 55.0;

        tick(&mut state, &hold_left());
        assert_eq!(state.player.pos.x, 50.0);
        assert_eq!(state.player.bucket, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.stats.deposits, 1);
        assert_eq!(state.stats.water_deposited, 3);
    }

    #[test]
    fn test_deposit_at_right_tank() {
        let mut state = active_state(Tuning::without_spawns());
        state.player.bucket = 5;
        state.player.pos.x = 705.0;

        tick(&mut state, &hold_right());
        assert_eq!(state.player.bucket, 0);
    }

    #[test]
    fn test_empty_bucket_deposit_is_noop() {
        let mut state = active_state(Tuning::without_spawns());
        state.player.pos.x = 0.0;
        assert!(!deposit(&mut state));
        assert_eq!(state.stats.deposits, 0);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_catch_and_deposit_same_frame() {
        let mut state = active_state(Tuning::without_spawns());
        state.player.pos.x = 20.0;
        push_drop(&mut state, Vec2::new(30.0, 515.0), 4.0, 3.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 10);
        assert_eq!(state.player.bucket, 0);
        assert_eq!(state.stats.water_deposited, 1);
    }

    #[test]
    fn test_random_spawns_show_up() {
        let tuning = Tuning {
            spawn_chance: 1.0,
            ..Tuning::default()
        };
        let mut state = active_state(tuning);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.drops.len(), 10);
    }

    proptest! {
        #[test]
        fn prop_player_stays_on_board(moves in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..600)) {
            let mut state = active_state(Tuning::default());
            let max_x = state.tuning.player_max_x();
            for (left, right) in moves {
                tick(&mut state, &TickInput { left, right, autopilot: false });
                prop_assert!(state.player.pos.x >= 0.0);
                prop_assert!(state.player.pos.x <= max_x);
                prop_assert!(state.player.bucket <= state.player.bucket_max);
            }
        }

        #[test]
        fn prop_inactive_never_mutates(seed in any::<u64>(), frames in 1usize..200) {
            let mut state = GameState::new(Tuning::default(), seed);
            state.phase = GamePhase::Ended;
            let before = format!("{:?}", state);
            for _ in 0..frames {
                tick(&mut state, &hold_left());
            }
            prop_assert_eq!(format!("{:?}", state), before);
        }
    }
}

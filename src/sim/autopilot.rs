//! Demo mode: the game plays itself
//!
//! Runs to the nearest tank once the bucket is full, otherwise chases the
//! lowest drop it can still get under in time.

use super::state::{GameState, RainDrop};
use super::tick::TickInput;

/// Pick this frame's held keys
pub fn autopilot_input(state: &GameState) -> TickInput {
    let player = &state.player;
    let center = player.pos.x + player.width / 2.0;

    let target = if player.is_full() {
        Some(nearest_tank_x(state))
    } else if let Some(drop) = best_drop(state) {
        Some(drop.pos.x)
    } else if player.bucket > 0 {
        // Nothing to chase: bank what we have
        Some(nearest_tank_x(state))
    } else {
        None
    };

    let Some(target) = target else {
        return TickInput::default();
    };

    // Close enough when the target is within the bucket minus one step
    let deadband = (player.width / 2.0 - player.speed).max(0.0);
    let delta = target - center;
    TickInput {
        left: delta < -deadband,
        right: delta > deadband,
        autopilot: false,
    }
}

/// Center x of the closer tank; stopping within the deadband of it is in reach
fn nearest_tank_x(state: &GameState) -> f32 {
    let player = &state.player;
    let center = player.pos.x + player.width / 2.0;

    let left_spot = state.tanks.left.pos.x + state.tanks.left.width / 2.0;
    let right_spot = state.tanks.right.pos.x + state.tanks.right.width / 2.0;

    if (center - left_spot).abs() <= (center - right_spot).abs() {
        left_spot
    } else {
        right_spot
    }
}

/// Lowest drop the player can still reach before it passes the bucket
fn best_drop(state: &GameState) -> Option<&RainDrop> {
    let player = &state.player;
    let center = player.pos.x + player.width / 2.0;

    state
        .drops
        .iter()
        .filter(|drop| drop.bottom() < player.pos.y && drop.speed > 0.0)
        .filter(|drop| {
            let frames = (player.pos.y - drop.bottom()) / drop.speed;
            let gap = ((drop.pos.x - center).abs() - player.width / 2.0).max(0.0);
            gap <= frames * player.speed
        })
        .max_by(|a, b| {
            a.bottom()
                .partial_cmp(&b.bottom())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

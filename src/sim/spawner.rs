//! Raindrop spawning

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameState, RainDrop};

/// Roll the per-frame spawn chance; on success add one drop above the board
pub fn maybe_spawn(state: &mut GameState) -> Option<u32> {
    let chance = state.tuning.spawn_chance;
    if state.rng().random::<f32>() < chance {
        Some(spawn_drop(state))
    } else {
        None
    }
}

/// Add one drop at a random column with a random fall speed
pub fn spawn_drop(state: &mut GameState) -> u32 {
    let margin = state.tuning.drop_spawn_margin;
    let width = state.tuning.board_width;
    let (min_speed, max_speed) = (state.tuning.drop_min_speed, state.tuning.drop_max_speed);

    let x = state.rng().random_range(margin..width - margin);
    let speed = state.rng().random_range(min_speed..max_speed);
    let pos = Vec2::new(x, state.tuning.drop_spawn_y);
    let radius = state.tuning.drop_radius;

    push_drop(state, pos, radius, speed)
}

/// Add a drop at a known position (scripted scenarios, tests)
pub fn push_drop(state: &mut GameState, pos: Vec2, radius: f32, speed: f32) -> u32 {
    let id = state.next_entity_id();
    state.drops.push(RainDrop {
        id,
        pos,
        radius,
        speed,
    });
    state.push_event(GameEvent::DropSpawned { id });
    id
}

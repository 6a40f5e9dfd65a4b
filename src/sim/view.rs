//! Read-only snapshot for the presentation layer

use glam::Vec2;
use serde::Serialize;

use super::state::{GameState, RoundStats};
use crate::highscores::RoundRecord;

/// Axis-aligned rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

/// A drop as the renderer needs it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DropView {
    pub pos: Vec2,
    pub radius: f32,
}

/// Everything a frame or HUD needs to draw
#[derive(Debug, Clone, Serialize)]
pub struct FrameView {
    pub phase: &'static str,
    pub countdown_label: Option<String>,
    pub score: u32,
    pub time_left: u32,
    pub high_score: u32,
    /// Bucket fill in [0, 1]
    pub bucket_fill: f32,
    pub board: Vec2,
    pub player: Rect,
    pub drops: Vec<DropView>,
    pub tanks: [Rect; 2],
    pub stats: RoundStats,
    pub leaderboard: Vec<RoundRecord>,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let tank = |t: &super::state::Tank| Rect {
            pos: t.pos,
            width: t.width,
            height: t.height,
        };

        Self {
            phase: state.phase.as_str(),
            countdown_label: state.countdown_label().map(str::to_owned),
            score: state.score,
            time_left: state.time_left,
            high_score: state.high_score,
            bucket_fill: state.player.fill_ratio(),
            board: Vec2::new(state.tuning.board_width, state.tuning.board_height),
            player: Rect {
                pos: state.player.pos,
                width: state.player.width,
                height: state.player.height,
            },
            drops: state
                .drops
                .iter()
                .map(|d| DropView {
                    pos: d.pos,
                    radius: d.radius,
                })
                .collect(),
            tanks: [tank(&state.tanks.left), tank(&state.tanks.right)],
            stats: state.stats,
            leaderboard: state.leaderboard.entries.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::round::{RoundInput, press};
    use crate::sim::spawner::push_drop;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_idle() {
        let state = GameState::new(Tuning::default(), 1);
        let view = FrameView::capture(&state);
        assert_eq!(view.phase, "idle");
        assert_eq!(view.countdown_label, None);
        assert_eq!(view.time_left, 60);
        assert_eq!(view.bucket_fill, 0.0);
        assert_eq!(view.tanks[1].pos, Vec2::new(750.0, 530.0));
        assert!(view.drops.is_empty());
    }

    #[test]
    fn test_capture_countdown_and_drops() {
        let mut state = GameState::new(Tuning::default(), 1);
        press(&mut state, RoundInput::Start);
        push_drop(&mut state, Vec2::new(10.0, 20.0), 4.0, 3.0);
        state.player.bucket = 1;

        let view = FrameView::capture(&state);
        assert_eq!(view.phase, "countdown");
        assert_eq!(view.countdown_label.as_deref(), Some("Ready?"));
        assert_eq!(view.drops.len(), 1);
        assert!((view.bucket_fill - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_serializes_to_json() {
        let state = GameState::new(Tuning::default(), 1);
        let json = serde_json::to_value(FrameView::capture(&state)).unwrap();
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["score"], 0);
        assert_eq!(json["time_left"], 60);
    }
}

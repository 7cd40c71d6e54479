use serde::Serialize;

use aftershock_core::collaborators::Collaborators;
use aftershock_core::input::{InputSource, KeyboardState};
use aftershock_core::player::{PlayerSlot, Standing};
use aftershock_duel::round::EndReason;
use aftershock_duel::scene_gen::generate_arena;
use aftershock_duel::{DuelEvent, DuelSnapshot, QuakeDuel};

use crate::config::{HostConfig, ScriptSegment};

/// Replays script segments as keyboard snapshots.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    segments: Vec<ScriptSegment>,
    keyboard: KeyboardState,
}

impl ScriptedInput {
    pub fn new(segments: Vec<ScriptSegment>) -> Self {
        Self {
            segments,
            keyboard: KeyboardState::new(),
        }
    }

    /// Keyboard state for host time `time`. Press edges are relative to the
    /// previous call.
    pub fn advance(&mut self, time: f32) -> &KeyboardState {
        let held: Vec<&str> = self
            .segments
            .iter()
            .filter(|segment| segment.is_active(time))
            .flat_map(|segment| segment.keys.iter().map(String::as_str))
            .collect();
        self.keyboard.apply_snapshot(held);
        &self.keyboard
    }
}

/// Outcome of one headless match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub frames: u32,
    pub winner: Option<PlayerSlot>,
    pub end_reason: Option<EndReason>,
    pub standings: Vec<Standing>,
    pub events: Vec<DuelEvent>,
    pub snapshot: DuelSnapshot,
}

/// Build the arena, then run frames until the match is decided or
/// `max_frames` is reached.
pub fn run_match(config: &HostConfig, collaborators: Collaborators) -> MatchSummary {
    let objects = generate_arena(config.arena_seed, &config.duel.arena);
    let mut duel = QuakeDuel::new(
        config.duel.clone(),
        config.scene_name.as_str(),
        &objects,
        collaborators,
    );
    let mut script = ScriptedInput::new(config.scripts.clone());
    let dt = config.frame_dt();

    let mut events = Vec::new();
    let mut frames = 0;
    while frames < config.max_frames && !duel.is_over() {
        let keyboard = script.advance(frames as f32 * dt);
        if keyboard.just_pressed(&config.hazard_trigger_key) {
            let outcome = duel.trigger_hazard();
            tracing::info!(?outcome, "manual hazard trigger");
        }
        events.extend(duel.tick(dt, keyboard));
        frames += 1;
    }

    if !duel.is_over() {
        tracing::warn!(frames, "frame limit reached before the match was decided");
    }
    tracing::info!(
        frames,
        winner = ?duel.winner(),
        end_reason = ?duel.round().end_reason(),
        "match finished"
    );

    let summary = MatchSummary {
        frames,
        winner: duel.winner(),
        end_reason: duel.round().end_reason(),
        standings: duel.standings(),
        events,
        snapshot: duel.snapshot(),
    };
    if let Some(action) = config.post_match {
        duel.resolve(action);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_edges_follow_segments() {
        let mut script = ScriptedInput::new(vec![
            ScriptSegment::new(0.0, 1.0, &["KeyW"]),
            ScriptSegment::new(0.5, 0.6, &["Space"]),
        ]);
        let kb = script.advance(0.0);
        assert!(kb.just_pressed("KeyW"));
        assert!(!kb.is_held("Space"));

        let kb = script.advance(0.5);
        assert!(kb.is_held("KeyW"));
        assert!(!kb.just_pressed("KeyW"));
        assert!(kb.just_pressed("Space"));

        let kb = script.advance(0.7);
        assert!(!kb.is_held("Space"));
        assert!(kb.keys_just_released.contains("Space"));

        let kb = script.advance(1.0);
        assert!(kb.keys_down.is_empty());
    }

    #[test]
    fn overlapping_segments_hold_a_key_once() {
        let mut script = ScriptedInput::new(vec![
            ScriptSegment::new(0.0, 2.0, &["KeyE"]),
            ScriptSegment::new(1.0, 3.0, &["KeyE"]),
        ]);
        script.advance(0.0);
        let kb = script.advance(1.5);
        assert!(kb.is_held("KeyE"));
        assert!(!kb.just_pressed("KeyE"));
        assert!(script.advance(2.5).is_held("KeyE"));
    }
}

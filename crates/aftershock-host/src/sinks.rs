//! Collaborators that turn every simulation side effect into a log line.

use aftershock_core::collaborators::{
    AnimationFrame, AnimationSink, AudioChannel, AudioCues, ClipId, Collaborators,
    SceneTransition, UiPresenter,
};
use aftershock_core::player::{HealthBand, PlayerSlot, Standing};

/// Banner text for the winner panel.
pub fn victory_text(winner: PlayerSlot) -> String {
    format!("PLAYER {} VICTORY!", winner.number())
}

#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioCues for LogAudio {
    fn play_one_shot(&mut self, clip: ClipId) {
        tracing::info!(?clip, "audio one-shot");
    }

    fn play_looping(&mut self, channel: AudioChannel, clip: ClipId) {
        tracing::info!(?channel, ?clip, "audio loop started");
    }

    fn stop(&mut self, channel: AudioChannel) {
        tracing::info!(?channel, "audio loop stopped");
    }
}

#[derive(Debug, Default)]
pub struct LogAnimation;

impl AnimationSink for LogAnimation {
    fn present(&mut self, frame: &AnimationFrame) {
        tracing::trace!(
            slot = %frame.slot,
            speed = frame.locomotion_speed,
            grounded = frame.grounded,
            ducking = frame.ducking,
            jumping = frame.jumping,
            "animation frame"
        );
    }
}

#[derive(Debug, Default)]
pub struct LogUi;

impl UiPresenter for LogUi {
    fn show_countdown(&mut self, text: &str) {
        tracing::info!(text, "countdown");
    }

    fn hide_countdown(&mut self) {
        tracing::debug!("countdown hidden");
    }

    fn show_health(&mut self, slot: PlayerSlot, health: f32, max: f32, band: HealthBand) {
        tracing::info!(%slot, health, max, ?band, "health bar");
    }

    fn show_victory(&mut self, winner: PlayerSlot) {
        tracing::info!("{}", victory_text(winner));
    }

    fn show_leaderboard(&mut self, standings: &[Standing]) {
        match serde_json::to_string(standings) {
            Ok(json) => tracing::info!(standings = %json, "leaderboard"),
            Err(e) => tracing::warn!("Failed to serialize leaderboard: {e}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct LogScenes;

impl SceneTransition for LogScenes {
    fn load_scene(&mut self, name: &str) {
        tracing::info!(scene = name, "scene load requested");
    }
}

/// A bundle with every slot wired to a logging sink.
pub fn logging_collaborators() -> Collaborators {
    Collaborators::detached()
        .with_audio(LogAudio)
        .with_ui(LogUi)
        .with_animation(LogAnimation)
        .with_scenes(LogScenes)
}

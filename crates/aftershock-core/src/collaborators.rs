use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::player::{HealthBand, PlayerSlot, Standing};

/// Audio clips the simulation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClipId {
    Music,
    Jump,
    Earthquake,
    Victory,
}

/// Looping channels. One-shots are fire-and-forget and have no channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioChannel {
    Music,
    Hazard,
}

/// Audio playback sink.
pub trait AudioCues {
    fn play_one_shot(&mut self, clip: ClipId);

    fn play_looping(&mut self, channel: AudioChannel, clip: ClipId);

    fn stop(&mut self, channel: AudioChannel);
}

/// Per-tick animation parameters for one player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub slot: PlayerSlot,
    /// 0.0 idle, 0.5 walk, 1.0 run.
    pub locomotion_speed: f32,
    pub grounded: bool,
    pub ducking: bool,
    pub jumping: bool,
}

/// Animation sink. Receives one frame per player every tick.
pub trait AnimationSink {
    fn present(&mut self, frame: &AnimationFrame);
}

/// On-screen presentation: countdown, health bars, victory and leaderboard panels.
pub trait UiPresenter {
    fn show_countdown(&mut self, text: &str);

    fn hide_countdown(&mut self);

    fn show_health(&mut self, slot: PlayerSlot, health: f32, max: f32, band: HealthBand);

    fn show_victory(&mut self, winner: PlayerSlot);

    fn show_leaderboard(&mut self, standings: &[Standing]);
}

/// Scene navigation, used only after the match is decided.
pub trait SceneTransition {
    fn load_scene(&mut self, name: &str);
}

/// The set of external collaborators a match talks to.
///
/// Any slot may be empty. Calls routed to an empty slot are skipped; the first
/// skip per collaborator is logged at `warn`, later ones at `debug`.
#[derive(Default)]
pub struct Collaborators {
    pub audio: Option<Box<dyn AudioCues>>,
    pub animation: Option<Box<dyn AnimationSink>>,
    pub ui: Option<Box<dyn UiPresenter>>,
    pub scenes: Option<Box<dyn SceneTransition>>,
    warned: HashSet<&'static str>,
}

impl Collaborators {
    /// A bundle with every slot empty.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn with_audio(mut self, audio: impl AudioCues + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn with_animation(mut self, animation: impl AnimationSink + 'static) -> Self {
        self.animation = Some(Box::new(animation));
        self
    }

    pub fn with_ui(mut self, ui: impl UiPresenter + 'static) -> Self {
        self.ui = Some(Box::new(ui));
        self
    }

    pub fn with_scenes(mut self, scenes: impl SceneTransition + 'static) -> Self {
        self.scenes = Some(Box::new(scenes));
        self
    }

    fn missing(&mut self, collaborator: &'static str, action: &str) {
        if self.warned.insert(collaborator) {
            tracing::warn!(collaborator, action, "collaborator missing, skipping");
        } else {
            tracing::debug!(collaborator, action, "collaborator missing, skipping");
        }
    }

    pub fn play_one_shot(&mut self, clip: ClipId) {
        match self.audio.as_mut() {
            Some(audio) => audio.play_one_shot(clip),
            None => self.missing("audio", "play_one_shot"),
        }
    }

    pub fn play_looping(&mut self, channel: AudioChannel, clip: ClipId) {
        match self.audio.as_mut() {
            Some(audio) => audio.play_looping(channel, clip),
            None => self.missing("audio", "play_looping"),
        }
    }

    pub fn stop_audio(&mut self, channel: AudioChannel) {
        match self.audio.as_mut() {
            Some(audio) => audio.stop(channel),
            None => self.missing("audio", "stop"),
        }
    }

    pub fn present_animation(&mut self, frame: &AnimationFrame) {
        match self.animation.as_mut() {
            Some(animation) => animation.present(frame),
            None => self.missing("animation", "present"),
        }
    }

    pub fn show_countdown(&mut self, text: &str) {
        match self.ui.as_mut() {
            Some(ui) => ui.show_countdown(text),
            None => self.missing("ui", "show_countdown"),
        }
    }

    pub fn hide_countdown(&mut self) {
        match self.ui.as_mut() {
            Some(ui) => ui.hide_countdown(),
            None => self.missing("ui", "hide_countdown"),
        }
    }

    pub fn show_health(&mut self, slot: PlayerSlot, health: f32, max: f32) {
        let band = HealthBand::from_health(health, max);
        match self.ui.as_mut() {
            Some(ui) => ui.show_health(slot, health, max, band),
            None => self.missing("ui", "show_health"),
        }
    }

    pub fn show_victory(&mut self, winner: PlayerSlot) {
        match self.ui.as_mut() {
            Some(ui) => ui.show_victory(winner),
            None => self.missing("ui", "show_victory"),
        }
    }

    pub fn show_leaderboard(&mut self, standings: &[Standing]) {
        match self.ui.as_mut() {
            Some(ui) => ui.show_leaderboard(standings),
            None => self.missing("ui", "show_leaderboard"),
        }
    }

    pub fn load_scene(&mut self, name: &str) {
        match self.scenes.as_mut() {
            Some(scenes) => scenes.load_scene(name),
            None => self.missing("scenes", "load_scene"),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("audio", &self.audio.is_some())
            .field("animation", &self.animation.is_some())
            .field("ui", &self.ui.is_some())
            .field("scenes", &self.scenes.is_some())
            .finish()
    }
}

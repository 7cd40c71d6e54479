use serde::{Deserialize, Serialize};

use crate::hazard::HazardConfig;
use crate::health::{HealthConfig, MAX_HEALTH};
use crate::locomotion::{self, LocomotionConfig, SprintPolicy};
use crate::round::RoundConfig;
use crate::scene_gen::ArenaConfig;

/// Scene loaded when leaving a finished match for the menu.
pub const MENU_SCENE: &str = "Menu";

/// Top-level duel configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    pub locomotion: LocomotionConfig,
    pub health: HealthConfig,
    pub hazard: HazardConfig,
    pub round: RoundConfig,
    pub arena: ArenaConfig,
}

impl DuelConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("AFTERSHOCK_DUEL_CONFIG")
            .unwrap_or_else(|_| "config/duel.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<DuelConfig>(&content) {
                Ok(cfg) => cfg.validate(),
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    DuelConfig::default()
                },
            },
            Err(_) => DuelConfig::default(),
        }
    }

    /// Replace values the simulation cannot run with by their defaults,
    /// logging each correction.
    pub fn validate(mut self) -> Self {
        let l = &mut self.locomotion;
        if !(l.gravity.is_finite() && l.gravity < 0.0) {
            reject("locomotion.gravity", l.gravity, locomotion::GRAVITY);
            l.gravity = locomotion::GRAVITY;
        }
        non_negative("locomotion.walk_speed", &mut l.walk_speed, locomotion::WALK_SPEED);
        non_negative("locomotion.run_speed", &mut l.run_speed, locomotion::RUN_SPEED);
        non_negative("locomotion.duck_speed", &mut l.duck_speed, locomotion::DUCK_SPEED);
        positive(
            "locomotion.rotation_speed",
            &mut l.rotation_speed,
            locomotion::ROTATION_SPEED,
        );
        non_negative("locomotion.jump_height", &mut l.jump_height, locomotion::JUMP_HEIGHT);
        if !(l.air_control.is_finite() && (0.0..=1.0).contains(&l.air_control)) {
            reject("locomotion.air_control", l.air_control, locomotion::AIR_CONTROL);
            l.air_control = locomotion::AIR_CONTROL;
        }
        if !(l.grounded_bias.is_finite() && l.grounded_bias <= 0.0) {
            reject("locomotion.grounded_bias", l.grounded_bias, locomotion::GROUNDED_BIAS);
            l.grounded_bias = locomotion::GROUNDED_BIAS;
        }
        for profile in &mut l.players {
            if let SprintPolicy::DoubleTap { window_secs } = &mut profile.sprint {
                positive(
                    "locomotion.players.sprint.window_secs",
                    window_secs,
                    locomotion::DOUBLE_TAP_WINDOW,
                );
            }
        }

        positive("health.max_health", &mut self.health.max_health, MAX_HEALTH);

        let defaults = HazardConfig::default();
        let h = &mut self.hazard;
        positive("hazard.duration_secs", &mut h.duration_secs, defaults.duration_secs);
        non_negative("hazard.intensity", &mut h.intensity, defaults.intensity);
        non_negative("hazard.speed", &mut h.speed, defaults.speed);
        non_negative(
            "hazard.damage_per_second",
            &mut h.damage_per_second,
            defaults.damage_per_second,
        );

        let defaults = RoundConfig::default();
        let r = &mut self.round;
        non_negative("round.countdown_secs", &mut r.countdown_secs, defaults.countdown_secs);
        non_negative(
            "round.start_banner_secs",
            &mut r.start_banner_secs,
            defaults.start_banner_secs,
        );
        positive(
            "round.hazard_interval_secs",
            &mut r.hazard_interval_secs,
            defaults.hazard_interval_secs,
        );
        positive(
            "round.round_duration_secs",
            &mut r.round_duration_secs,
            defaults.round_duration_secs,
        );

        let a = &mut self.arena;
        a.untagged_chance = a.untagged_chance.clamp(0.0, 1.0);
        a.body_chance = a.body_chance.clamp(0.0, 1.0);
        self
    }
}

fn reject(field: &'static str, value: f32, fallback: f32) {
    tracing::warn!(field, value, fallback, "invalid config value, using default");
}

fn positive(field: &'static str, value: &mut f32, fallback: f32) {
    if !(value.is_finite() && *value > 0.0) {
        reject(field, *value, fallback);
        *value = fallback;
    }
}

fn non_negative(field: &'static str, value: &mut f32, fallback: f32) {
    if !(value.is_finite() && *value >= 0.0) {
        reject(field, *value, fallback);
        *value = fallback;
    }
}

use serde::{Deserialize, Serialize};

use aftershock_duel::PostMatchAction;
use aftershock_duel::config::DuelConfig;

/// Keys held during `[start_secs, end_secs)` of host time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub start_secs: f32,
    pub end_secs: f32,
    pub keys: Vec<String>,
}

impl ScriptSegment {
    pub fn new(start_secs: f32, end_secs: f32, keys: &[&str]) -> Self {
        Self {
            start_secs,
            end_secs,
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn is_active(&self, time: f32) -> bool {
        time >= self.start_secs && time < self.end_secs
    }
}

/// Top-level host configuration, loaded from `aftershock.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub frame_rate_hz: f32,
    /// Hard stop for the frame loop.
    pub max_frames: u32,
    pub arena_seed: u64,
    /// Scene reloaded by a restart.
    pub scene_name: String,
    pub hazard_trigger_key: String,
    /// Applied once the match is decided. `None` leaves the result on screen.
    pub post_match: Option<PostMatchAction>,
    pub duel: DuelConfig,
    pub scripts: Vec<ScriptSegment>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60.0,
            max_frames: 60 * 180,
            arena_seed: 42,
            scene_name: "House".to_string(),
            hazard_trigger_key: "KeyQ".to_string(),
            post_match: None,
            duel: DuelConfig::default(),
            scripts: default_scripts(),
        }
    }
}

/// Player one wanders and hops; player two ducks through the first two quakes.
fn default_scripts() -> Vec<ScriptSegment> {
    vec![
        ScriptSegment::new(6.5, 8.0, &["KeyW"]),
        ScriptSegment::new(8.0, 8.1, &["Space"]),
        ScriptSegment::new(9.0, 10.5, &["KeyD", "ShiftLeft"]),
        ScriptSegment::new(7.0, 7.1, &["Numpad0"]),
        ScriptSegment::new(15.0, 40.0, &["ControlRight"]),
    ]
}

impl HostConfig {
    /// Load config from `aftershock.toml` (or `AFTERSHOCK_CONFIG`) if it
    /// exists, then apply env var overrides and validate.
    pub fn load() -> Self {
        let path =
            std::env::var("AFTERSHOCK_CONFIG").unwrap_or_else(|_| "aftershock.toml".to_string());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<HostConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    HostConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {path} found, using defaults");
                HostConfig::default()
            },
        };
        config.apply_env_overrides();
        config.validate()
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("AFTERSHOCK_FRAME_RATE")
            && let Ok(hz) = val.parse::<f32>()
        {
            self.frame_rate_hz = hz;
        }
        if let Ok(val) = std::env::var("AFTERSHOCK_MAX_FRAMES")
            && let Ok(n) = val.parse::<u32>()
        {
            self.max_frames = n;
        }
        if let Ok(val) = std::env::var("AFTERSHOCK_ARENA_SEED")
            && let Ok(seed) = val.parse::<u64>()
        {
            self.arena_seed = seed;
        }
        if let Ok(scene) = std::env::var("AFTERSHOCK_SCENE")
            && !scene.is_empty()
        {
            self.scene_name = scene;
        }
    }

    /// Replace unusable values with defaults, logging each one.
    pub fn validate(mut self) -> Self {
        let defaults = HostConfig::default();
        if !(self.frame_rate_hz.is_finite() && self.frame_rate_hz > 0.0) {
            tracing::warn!(
                value = self.frame_rate_hz,
                "frame_rate_hz must be > 0, using default"
            );
            self.frame_rate_hz = defaults.frame_rate_hz;
        }
        if self.scene_name.is_empty() {
            tracing::warn!("scene_name is empty, using default");
            self.scene_name = defaults.scene_name;
        }
        self.scripts.retain(|segment| {
            let usable = segment.start_secs.is_finite()
                && segment.end_secs.is_finite()
                && segment.end_secs > segment.start_secs;
            if !usable {
                tracing::warn!(?segment, "dropping script segment with empty time range");
            }
            usable
        });
        self.duel = self.duel.validate();
        self
    }

    /// Fixed frame step in seconds.
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.frame_rate_hz
    }
}

use aftershock_core::collaborators::{AudioChannel, ClipId, Collaborators};
use aftershock_core::player::PlayerSlot;
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::body::{BodyOrigin, DEFAULT_MASS, PhysicsBody};
use crate::health::DamageOutcome;
use crate::noise::{gradient_noise, seed_offset};
use crate::player::DuelPlayer;
use crate::world::{ObjectId, ObjectKind, Transform, UNTAGGED, WorldObject};

/// Hazard length in seconds.
pub const DURATION_SECS: f32 = 5.0;
/// Offset amplitude in world units.
pub const INTENSITY: f32 = 0.3;
/// Noise time scale.
pub const SPEED: f32 = 25.0;
/// Damage per second to exposed players.
pub const DAMAGE_PER_SECOND: f32 = 10.0;
/// Rotation amplitude in degrees per unit of intensity.
const ROTATION_DEGREES: f32 = 10.0;
/// Tolerance on the duration check so accumulated float error cannot add a tick.
const END_EPSILON: f32 = 1e-4;
/// Noise lane spacing along the seed axis.
const LANE_STRIDE: f32 = 31.7;

/// How targets are moved while the hazard runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerturbationMode {
    /// Offset from the activation snapshot; targets snap back when it ends.
    #[default]
    VisualOffset,
    /// Push dynamic bodies with force and torque; targets stay where they settle.
    PhysicsImpulse,
}

/// Which world objects the hazard may move.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetFilter {
    pub tags: Vec<String>,
    pub include_untagged: bool,
    pub excluded_name_fragments: Vec<String>,
    pub require_parent: bool,
}

impl Default for TargetFilter {
    fn default() -> Self {
        Self {
            tags: ["Furniture", "Prop", "Decoration"]
                .map(String::from)
                .to_vec(),
            include_untagged: true,
            excluded_name_fragments: ["Player", "Ground", "Floor", "Wall", "Roof", "FullHouse"]
                .map(String::from)
                .to_vec(),
            require_parent: true,
        }
    }
}

impl TargetFilter {
    pub fn accepts(&self, object: &WorldObject) -> bool {
        if !matches!(object.kind, ObjectKind::Prop) {
            return false;
        }
        if self
            .excluded_name_fragments
            .iter()
            .any(|fragment| object.name.contains(fragment.as_str()))
        {
            return false;
        }
        if self.require_parent && object.parent.is_none() {
            return false;
        }
        if object.tag == UNTAGGED {
            return self.include_untagged;
        }
        self.tags.iter().any(|tag| *tag == object.tag)
    }
}

/// Hazard tuning, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardConfig {
    pub duration_secs: f32,
    pub intensity: f32,
    pub speed: f32,
    pub damage_per_second: f32,
    pub mode: PerturbationMode,
    /// Force per unit mass per unit intensity, impulse mode only.
    pub force_strength: f32,
    /// Torque per unit mass per unit intensity, impulse mode only.
    pub torque_strength: f32,
    pub gravity: f32,
    pub floor_height: f32,
    pub filter: TargetFilter,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            duration_secs: DURATION_SECS,
            intensity: INTENSITY,
            speed: SPEED,
            damage_per_second: DAMAGE_PER_SECOND,
            mode: PerturbationMode::default(),
            force_strength: 60.0,
            torque_strength: 20.0,
            gravity: -9.81,
            floor_height: 0.0,
            filter: TargetFilter::default(),
        }
    }
}

/// Stable index of a target within the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetIndex(pub usize);

/// A world object the hazard owns for the session.
#[derive(Debug, Clone)]
pub struct HazardTarget {
    pub object: ObjectId,
    pub name: String,
    pub transform: Transform,
    pub body: PhysicsBody,
    seed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardPhase {
    Inactive,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    AlreadyActive,
}

/// What one hazard tick produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HazardReport {
    /// Players killed this tick, in slot order.
    pub deaths: Vec<PlayerSlot>,
    /// The hazard ran out this tick.
    pub ended: bool,
}

/// The earthquake: a timed perturbation of the scene that hurts anyone
/// standing up.
#[derive(Debug, Clone)]
pub struct HazardSimulator {
    config: HazardConfig,
    targets: Vec<HazardTarget>,
    /// Parallel to `targets`; filled on activation, emptied on deactivation.
    snapshots: Vec<Transform>,
    phase: HazardPhase,
    elapsed: f32,
    /// Damage handed out per exposed player in the current activation.
    damage_dealt: f32,
    activations: u32,
}

impl HazardSimulator {
    /// Classify `objects` once and take ownership of every accepted target.
    pub fn new(config: HazardConfig, objects: &[WorldObject]) -> Self {
        let mut constructed = 0usize;
        let targets: Vec<HazardTarget> = objects
            .iter()
            .filter(|object| config.filter.accepts(object))
            .map(|object| {
                let body = match object.body {
                    Some(spec) => PhysicsBody::at_rest(spec.mass, BodyOrigin::Declared),
                    None => {
                        constructed += 1;
                        PhysicsBody::at_rest(DEFAULT_MASS, BodyOrigin::Constructed)
                    }
                };
                HazardTarget {
                    object: object.id,
                    name: object.name.clone(),
                    transform: object.transform,
                    body,
                    seed: seed_offset(object.id),
                }
            })
            .collect();
        tracing::info!(
            targets = targets.len(),
            constructed_bodies = constructed,
            mode = ?config.mode,
            "hazard targets selected"
        );
        Self {
            config,
            targets,
            snapshots: Vec::new(),
            phase: HazardPhase::Inactive,
            elapsed: 0.0,
            damage_dealt: 0.0,
            activations: 0,
        }
    }

    pub fn config(&self) -> &HazardConfig {
        &self.config
    }

    pub fn phase(&self) -> HazardPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == HazardPhase::Active
    }

    /// Active time so far in the current activation.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of times the hazard has started this session.
    pub fn activations(&self) -> u32 {
        self.activations
    }

    pub fn targets(&self) -> &[HazardTarget] {
        &self.targets
    }

    pub fn target(&self, index: TargetIndex) -> Option<&HazardTarget> {
        self.targets.get(index.0)
    }

    /// Activation snapshot for a target, present only while active.
    pub fn snapshot(&self, index: TargetIndex) -> Option<&Transform> {
        self.snapshots.get(index.0)
    }

    /// Start the hazard. Does nothing while it is already running.
    pub fn trigger(&mut self, collab: &mut Collaborators) -> TriggerOutcome {
        if self.is_active() {
            tracing::debug!("hazard already active, trigger ignored");
            return TriggerOutcome::AlreadyActive;
        }
        self.snapshots = self.targets.iter().map(|t| t.transform).collect();
        if self.config.mode == PerturbationMode::PhysicsImpulse {
            for target in &mut self.targets {
                target.body.set_kinematic(false);
            }
        }
        self.phase = HazardPhase::Active;
        self.elapsed = 0.0;
        self.damage_dealt = 0.0;
        self.activations += 1;
        collab.play_looping(AudioChannel::Hazard, ClipId::Earthquake);
        tracing::info!(
            activation = self.activations,
            duration = self.config.duration_secs,
            "hazard started"
        );
        TriggerOutcome::Started
    }

    /// Advance an active hazard by `dt` of simulated time.
    ///
    /// `time` is the global simulated clock and drives the noise field, so
    /// perturbation keeps evolving across activations.
    pub fn tick(
        &mut self,
        dt: f32,
        time: f32,
        players: &mut [DuelPlayer],
        collab: &mut Collaborators,
    ) -> HazardReport {
        let mut report = HazardReport::default();
        if !self.is_active() || !dt.is_finite() || dt <= 0.0 {
            return report;
        }

        let remaining = (self.config.duration_secs - self.elapsed).max(0.0);
        let step = dt.min(remaining);
        self.elapsed += step;

        let t = time * self.config.speed;
        match self.config.mode {
            PerturbationMode::VisualOffset => self.offset_targets(t),
            PerturbationMode::PhysicsImpulse => self.push_targets(t, step),
        }

        // The last step pays out whatever the activation still owes, so an
        // exposed player loses exactly rate * duration per activation.
        let finished = self.elapsed >= self.config.duration_secs - END_EPSILON;
        let budget = (self.config.damage_per_second * self.config.duration_secs
            - self.damage_dealt)
            .max(0.0);
        let damage = if finished {
            budget
        } else {
            (self.config.damage_per_second * step).min(budget)
        };
        self.damage_dealt += damage;
        if damage > 0.0 {
            for player in players.iter_mut() {
                if player.is_dead() || player.is_ducking() {
                    continue;
                }
                if player.take_damage(damage, collab) == DamageOutcome::Died {
                    report.deaths.push(player.slot);
                }
            }
        }

        if finished {
            self.deactivate(collab);
            report.ended = true;
        }
        report
    }

    /// Stop an active hazard before its duration runs out. Targets are put
    /// back the same way a normal deactivation does. False when inactive.
    pub fn halt(&mut self, collab: &mut Collaborators) -> bool {
        if !self.is_active() {
            return false;
        }
        tracing::info!(elapsed = self.elapsed, "hazard halted early");
        self.deactivate(collab);
        true
    }

    fn offset_targets(&mut self, t: f32) {
        let intensity = self.config.intensity;
        for (target, origin) in self.targets.iter_mut().zip(&self.snapshots) {
            let s = target.seed;
            let offset = Vec3::new(
                gradient_noise(t, s),
                gradient_noise(t, s + LANE_STRIDE),
                gradient_noise(t, s + 2.0 * LANE_STRIDE),
            ) * intensity;
            let r = gradient_noise(t, s + 3.0 * LANE_STRIDE) * intensity * ROTATION_DEGREES;
            let wobble = Quat::from_euler(
                EulerRot::XYZ,
                r.to_radians(),
                (r * 0.5).to_radians(),
                (r * 0.3).to_radians(),
            );
            target.transform.translation = origin.translation + offset;
            target.transform.rotation = (origin.rotation * wobble).normalize();
        }
    }

    fn push_targets(&mut self, t: f32, step: f32) {
        let intensity = self.config.intensity;
        for target in &mut self.targets {
            let s = target.seed;
            let lane = |k: f32| gradient_noise(t, s + k * LANE_STRIDE);
            let mass = target.body.mass;
            let force = Vec3::new(lane(0.0), lane(1.0).abs() * 0.5, lane(2.0))
                * intensity
                * self.config.force_strength
                * mass;
            let torque = Vec3::new(lane(3.0), lane(4.0), lane(5.0))
                * intensity
                * self.config.torque_strength
                * mass;
            target.body.add_force(force);
            target.body.add_torque(torque);
            target.body.integrate(
                &mut target.transform,
                step,
                self.config.gravity,
                self.config.floor_height,
            );
        }
    }

    fn deactivate(&mut self, collab: &mut Collaborators) {
        collab.stop_audio(AudioChannel::Hazard);
        match self.config.mode {
            PerturbationMode::VisualOffset => {
                for (target, origin) in self.targets.iter_mut().zip(&self.snapshots) {
                    target.transform = *origin;
                }
            }
            PerturbationMode::PhysicsImpulse => {
                for target in &mut self.targets {
                    target.body.set_kinematic(true);
                }
            }
        }
        self.snapshots.clear();
        self.phase = HazardPhase::Inactive;
        tracing::info!(elapsed = self.elapsed, "hazard ended");
    }
}

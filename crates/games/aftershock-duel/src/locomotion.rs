use aftershock_core::collaborators::AnimationFrame;
use aftershock_core::input::{ControlScheme, InputSource, KeyBindings};
use aftershock_core::player::PlayerSlot;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Gravity acceleration (units/s^2, downward).
pub const GRAVITY: f32 = -20.0;
/// Walking speed.
pub const WALK_SPEED: f32 = 5.0;
/// Sprinting speed.
pub const RUN_SPEED: f32 = 10.0;
/// Speed while ducking.
pub const DUCK_SPEED: f32 = 0.5;
/// Facing slerp rate, per second.
pub const ROTATION_SPEED: f32 = 10.0;
/// Apex height of a jump.
pub const JUMP_HEIGHT: f32 = 2.0;
/// Horizontal speed multiplier while airborne.
pub const AIR_CONTROL: f32 = 0.5;
/// Vertical velocity held while grounded so ground contact stays stable.
pub const GROUNDED_BIAS: f32 = -2.0;
/// Double-tap window for sprint.
pub const DOUBLE_TAP_WINDOW: f32 = 0.3;
/// Below this horizontal input magnitude the player counts as standing still.
const MOVE_THRESHOLD: f32 = 0.1;

/// How a player starts sprinting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SprintPolicy {
    /// Sprint while the sprint key is held and the player is moving.
    HeldModifier,
    /// Sprint after two direction presses within `window_secs`; ends when
    /// every direction key is released.
    DoubleTap { window_secs: f32 },
}

impl Default for SprintPolicy {
    fn default() -> Self {
        SprintPolicy::DoubleTap {
            window_secs: DOUBLE_TAP_WINDOW,
        }
    }
}

/// Frame of reference for directional input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveBasis {
    /// Input x/z map straight onto world X/Z.
    World,
    /// Input is relative to a camera; both axes are flattened onto the ground.
    Camera { forward: Vec3, right: Vec3 },
}

impl MoveBasis {
    /// Normalized world-space move direction for input axes `(x, z)`.
    /// Zero when there is no usable input.
    pub fn resolve(&self, x: f32, z: f32) -> Vec3 {
        let (right, forward) = match *self {
            MoveBasis::World => (Vec3::X, Vec3::Z),
            MoveBasis::Camera { forward, right } => (
                Vec3::new(right.x, 0.0, right.z).normalize_or_zero(),
                Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero(),
            ),
        };
        (right * x + forward * z).normalize_or_zero()
    }
}

/// Per-player binding and sprint choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub scheme: ControlScheme,
    pub sprint: SprintPolicy,
    pub spawn: Vec3,
    pub facing_yaw_degrees: f32,
}

impl PlayerProfile {
    pub fn for_slot(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => Self {
                scheme: ControlScheme::Wasd,
                sprint: SprintPolicy::default(),
                spawn: Vec3::new(-3.0, 0.0, 0.0),
                facing_yaw_degrees: 90.0,
            },
            PlayerSlot::Two => Self {
                scheme: ControlScheme::Arrows,
                sprint: SprintPolicy::default(),
                spawn: Vec3::new(3.0, 0.0, 0.0),
                facing_yaw_degrees: -90.0,
            },
        }
    }
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::for_slot(PlayerSlot::One)
    }
}

/// Locomotion tuning, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub gravity: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub duck_speed: f32,
    pub rotation_speed: f32,
    pub jump_height: f32,
    pub air_control: f32,
    pub grounded_bias: f32,
    pub ground_height: f32,
    pub basis: MoveBasis,
    pub players: [PlayerProfile; 2],
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            walk_speed: WALK_SPEED,
            run_speed: RUN_SPEED,
            duck_speed: DUCK_SPEED,
            rotation_speed: ROTATION_SPEED,
            jump_height: JUMP_HEIGHT,
            air_control: AIR_CONTROL,
            grounded_bias: GROUNDED_BIAS,
            ground_height: 0.0,
            basis: MoveBasis::World,
            players: PlayerSlot::ALL.map(PlayerProfile::for_slot),
        }
    }
}

impl LocomotionConfig {
    pub fn profile(&self, slot: PlayerSlot) -> &PlayerProfile {
        &self.players[slot.index()]
    }

    /// Initial upward speed that peaks at `jump_height`.
    pub fn jump_velocity(&self) -> f32 {
        (self.jump_height * 2.0 * self.gravity.abs()).sqrt()
    }
}

/// One frame of a player's intent, sampled from their bindings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionInput {
    pub move_x: f32,
    pub move_z: f32,
    pub direction_pressed: bool,
    pub direction_held: bool,
    pub jump_pressed: bool,
    pub duck_held: bool,
    pub sprint_held: bool,
}

impl LocomotionInput {
    pub fn sample(bindings: &KeyBindings, source: &dyn InputSource) -> Self {
        let (move_x, move_z) = bindings.axes(source);
        Self {
            move_x,
            move_z,
            direction_pressed: bindings.direction_just_pressed(source),
            direction_held: bindings.direction_held(source),
            jump_pressed: source.just_pressed(&bindings.jump),
            duck_held: source.is_held(&bindings.duck),
            sprint_held: source.is_held(&bindings.sprint),
        }
    }
}

/// Locomotion state, derived after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    Idle,
    Walking,
    Running,
    Jumping,
    Ducking,
}

impl MotionState {
    /// Animation speed parameter. Airborne and ducking players get none.
    pub fn animation_speed(self) -> f32 {
        match self {
            MotionState::Walking => 0.5,
            MotionState::Running => 1.0,
            MotionState::Idle | MotionState::Jumping | MotionState::Ducking => 0.0,
        }
    }
}

/// What a tick did that the caller may want to react to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocomotionReport {
    pub jumped: bool,
}

/// Per-player motion controller.
///
/// Once control is revoked the controller ignores every further tick; it is
/// never removed, so queries keep answering with the last state.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    slot: PlayerSlot,
    config: LocomotionConfig,
    sprint_policy: SprintPolicy,
    pub position: Vec3,
    pub facing: Quat,
    pub vertical_velocity: f32,
    grounded: bool,
    ducking: bool,
    jumping: bool,
    sprinting: bool,
    moving: bool,
    state: MotionState,
    local_time: f32,
    last_tap: f32,
    control: bool,
}

impl LocomotionController {
    pub fn new(slot: PlayerSlot, config: &LocomotionConfig) -> Self {
        let profile = config.profile(slot);
        let position = profile.spawn;
        Self {
            slot,
            sprint_policy: profile.sprint,
            position,
            facing: Quat::from_rotation_y(profile.facing_yaw_degrees.to_radians()),
            vertical_velocity: 0.0,
            grounded: position.y <= config.ground_height,
            ducking: false,
            jumping: false,
            sprinting: false,
            moving: false,
            state: MotionState::Idle,
            local_time: 0.0,
            last_tap: f32::NEG_INFINITY,
            control: true,
            config: config.clone(),
        }
    }

    pub fn slot(&self) -> PlayerSlot {
        self.slot
    }

    pub fn is_ducking(&self) -> bool {
        self.ducking
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn has_control(&self) -> bool {
        self.control
    }

    /// Stop processing input. Irreversible for this controller.
    pub fn revoke_control(&mut self) {
        if self.control {
            tracing::debug!(slot = %self.slot, "locomotion control revoked");
        }
        self.control = false;
        self.sprinting = false;
        self.moving = false;
    }

    pub fn animation_frame(&self) -> AnimationFrame {
        AnimationFrame {
            slot: self.slot,
            locomotion_speed: self.state.animation_speed(),
            grounded: self.grounded,
            ducking: self.ducking,
            jumping: self.jumping,
        }
    }

    /// Advance one frame.
    pub fn tick(&mut self, input: &LocomotionInput, dt: f32) -> LocomotionReport {
        let mut report = LocomotionReport::default();
        if !self.control || !dt.is_finite() || dt <= 0.0 {
            return report;
        }
        self.local_time += dt;

        // Landing.
        if self.grounded && self.vertical_velocity <= 0.0 {
            self.vertical_velocity = self.config.grounded_bias;
            self.jumping = false;
        }

        let x = if input.move_x.is_finite() { input.move_x } else { 0.0 };
        let z = if input.move_z.is_finite() { input.move_z } else { 0.0 };
        let direction = self.config.basis.resolve(x, z);
        self.moving = direction.length_squared() > MOVE_THRESHOLD * MOVE_THRESHOLD;

        self.update_sprint(input);

        if !self.ducking && input.duck_held && self.grounded && !self.jumping {
            self.ducking = true;
        } else if self.ducking && !input.duck_held {
            self.ducking = false;
        }

        if input.jump_pressed && self.grounded && !self.ducking && !self.jumping {
            self.vertical_velocity = self.config.jump_velocity();
            self.jumping = true;
            report.jumped = true;
        }

        let mut speed = if self.ducking {
            self.config.duck_speed
        } else if self.sprinting {
            self.config.run_speed
        } else {
            self.config.walk_speed
        };
        if !self.grounded {
            speed *= self.config.air_control;
        }
        let horizontal = direction * speed;

        if self.moving {
            let target = Quat::from_rotation_y(direction.x.atan2(direction.z));
            let t = (self.config.rotation_speed * dt).clamp(0.0, 1.0);
            self.facing = self.facing.slerp(target, t).normalize();
        }

        self.vertical_velocity += self.config.gravity * dt;
        let displacement = horizontal * dt + Vec3::Y * self.vertical_velocity * dt;
        self.position += displacement;

        if self.position.y <= self.config.ground_height {
            self.position.y = self.config.ground_height;
            self.grounded = true;
        } else {
            self.grounded = false;
        }

        self.state = self.derive_state();
        report
    }

    fn update_sprint(&mut self, input: &LocomotionInput) {
        match self.sprint_policy {
            SprintPolicy::HeldModifier => {
                self.sprinting = input.sprint_held && self.moving;
            }
            SprintPolicy::DoubleTap { window_secs } => {
                if input.direction_pressed {
                    if self.local_time - self.last_tap <= window_secs {
                        self.sprinting = true;
                    }
                    self.last_tap = self.local_time;
                }
                if !input.direction_held {
                    self.sprinting = false;
                }
            }
        }
    }

    fn derive_state(&self) -> MotionState {
        if self.ducking {
            MotionState::Ducking
        } else if self.jumping || !self.grounded {
            MotionState::Jumping
        } else if !self.moving {
            MotionState::Idle
        } else if self.sprinting {
            MotionState::Running
        } else {
            MotionState::Walking
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> LocomotionController {
        LocomotionController::new(PlayerSlot::One, &LocomotionConfig::default())
    }

    fn forward() -> LocomotionInput {
        LocomotionInput {
            move_z: 1.0,
            direction_held: true,
            ..Default::default()
        }
    }

    fn settle(c: &mut LocomotionController) {
        for _ in 0..5 {
            c.tick(&LocomotionInput::default(), DT);
        }
    }

    #[test]
    fn jump_velocity_reaches_configured_height() {
        let config = LocomotionConfig::default();
        let v = config.jump_velocity();
        let apex = v * v / (2.0 * config.gravity.abs());
        assert!((apex - config.jump_height).abs() < 1e-4);
    }

    #[test]
    fn standing_player_stays_grounded_with_bias() {
        let mut c = controller();
        settle(&mut c);
        assert!(c.is_grounded());
        assert_eq!(c.position.y, 0.0);
        assert!(c.vertical_velocity < 0.0, "grounded velocity keeps a bias");
        assert_eq!(c.state(), MotionState::Idle);
    }

    #[test]
    fn jump_rises_to_about_jump_height_and_lands() {
        let mut c = controller();
        settle(&mut c);
        let report = c.tick(
            &LocomotionInput {
                jump_pressed: true,
                ..Default::default()
            },
            1.0 / 240.0,
        );
        assert!(report.jumped);
        assert!(c.is_jumping());

        let mut peak = 0.0f32;
        for _ in 0..480 {
            c.tick(&LocomotionInput::default(), 1.0 / 240.0);
            peak = peak.max(c.position.y);
        }
        assert!((peak - JUMP_HEIGHT).abs() < 0.1, "peak {peak}");
        assert!(c.is_grounded());
        c.tick(&LocomotionInput::default(), 1.0 / 240.0);
        assert!(!c.is_jumping());
        assert!((c.vertical_velocity - (GROUNDED_BIAS + GRAVITY / 240.0)).abs() < 1e-5);
    }

    #[test]
    fn no_jump_while_airborne() {
        let mut c = controller();
        settle(&mut c);
        let jump = LocomotionInput {
            jump_pressed: true,
            ..Default::default()
        };
        assert!(c.tick(&jump, DT).jumped);
        let v = c.vertical_velocity;
        assert!(!c.tick(&jump, DT).jumped);
        assert!(c.vertical_velocity < v);
    }

    #[test]
    fn duck_blocks_jump_and_slows_movement() {
        let mut c = controller();
        settle(&mut c);
        let duck_jump = LocomotionInput {
            duck_held: true,
            jump_pressed: true,
            ..forward()
        };
        let start = c.position;
        let report = c.tick(&duck_jump, DT);
        assert!(c.is_ducking());
        assert!(!report.jumped);
        let travelled = (c.position - start).with_y(0.0).length();
        assert!((travelled - DUCK_SPEED * DT).abs() < 1e-5);
        assert_eq!(c.state(), MotionState::Ducking);
        assert_eq!(c.animation_frame().locomotion_speed, 0.0);
    }

    #[test]
    fn duck_needs_ground_and_releases() {
        let mut c = controller();
        settle(&mut c);
        c.tick(
            &LocomotionInput {
                jump_pressed: true,
                ..Default::default()
            },
            DT,
        );
        c.tick(
            &LocomotionInput {
                duck_held: true,
                ..Default::default()
            },
            DT,
        );
        assert!(!c.is_ducking(), "cannot duck mid-air");

        let mut c = controller();
        settle(&mut c);
        c.tick(
            &LocomotionInput {
                duck_held: true,
                ..Default::default()
            },
            DT,
        );
        assert!(c.is_ducking());
        c.tick(&LocomotionInput::default(), DT);
        assert!(!c.is_ducking());
    }

    #[test]
    fn walking_speed_and_animation() {
        let mut c = controller();
        settle(&mut c);
        let start = c.position;
        c.tick(&forward(), DT);
        let travelled = (c.position - start).with_y(0.0).length();
        assert!((travelled - WALK_SPEED * DT).abs() < 1e-5);
        assert_eq!(c.state(), MotionState::Walking);
        assert_eq!(c.animation_frame().locomotion_speed, 0.5);
    }

    #[test]
    fn airborne_movement_is_damped() {
        let mut c = controller();
        settle(&mut c);
        c.tick(
            &LocomotionInput {
                jump_pressed: true,
                ..Default::default()
            },
            DT,
        );
        assert!(!c.is_grounded());
        let start = c.position;
        c.tick(&forward(), DT);
        let travelled = (c.position - start).with_y(0.0).length();
        assert!((travelled - WALK_SPEED * AIR_CONTROL * DT).abs() < 1e-5);
        assert_eq!(c.animation_frame().locomotion_speed, 0.0);
    }

    #[test]
    fn double_tap_starts_sprint_and_release_ends_it() {
        let mut c = controller();
        settle(&mut c);
        let tap = LocomotionInput {
            direction_pressed: true,
            ..forward()
        };
        c.tick(&tap, DT);
        assert!(!c.is_sprinting());
        c.tick(&LocomotionInput::default(), DT);
        c.tick(&tap, DT);
        assert!(c.is_sprinting());
        assert_eq!(c.state(), MotionState::Running);

        let start = c.position;
        c.tick(&forward(), DT);
        let travelled = (c.position - start).with_y(0.0).length();
        assert!((travelled - RUN_SPEED * DT).abs() < 1e-4);

        c.tick(&LocomotionInput::default(), DT);
        assert!(!c.is_sprinting());
    }

    #[test]
    fn slow_double_tap_does_not_sprint() {
        let mut c = controller();
        settle(&mut c);
        let tap = LocomotionInput {
            direction_pressed: true,
            ..forward()
        };
        c.tick(&tap, DT);
        for _ in 0..30 {
            c.tick(&LocomotionInput::default(), DT);
        }
        c.tick(&tap, DT);
        assert!(!c.is_sprinting());
    }

    #[test]
    fn held_modifier_sprints_only_while_moving() {
        let mut config = LocomotionConfig::default();
        config.players[0].sprint = SprintPolicy::HeldModifier;
        let mut c = LocomotionController::new(PlayerSlot::One, &config);
        settle(&mut c);

        c.tick(
            &LocomotionInput {
                sprint_held: true,
                ..Default::default()
            },
            DT,
        );
        assert!(!c.is_sprinting());

        c.tick(
            &LocomotionInput {
                sprint_held: true,
                ..forward()
            },
            DT,
        );
        assert!(c.is_sprinting());
        assert_eq!(c.animation_frame().locomotion_speed, 1.0);

        c.tick(&forward(), DT);
        assert!(!c.is_sprinting());
    }

    #[test]
    fn facing_turns_gradually() {
        let mut c = controller();
        settle(&mut c);
        let before = c.facing;
        let back = LocomotionInput {
            move_z: -1.0,
            direction_held: true,
            ..Default::default()
        };
        c.tick(&back, DT);
        let target = Quat::from_rotation_y(std::f32::consts::PI);
        assert!(c.facing.angle_between(before) > 0.0);
        assert!(c.facing.angle_between(target) > 0.01, "facing snapped");
        for _ in 0..120 {
            c.tick(&back, DT);
        }
        assert!(c.facing.angle_between(target) < 0.01);
    }

    #[test]
    fn camera_basis_ignores_pitch() {
        let basis = MoveBasis::Camera {
            forward: Vec3::new(0.0, -0.7, 0.7),
            right: Vec3::X,
        };
        let dir = basis.resolve(0.0, 1.0);
        assert!((dir - Vec3::Z).length() < 1e-5);
        let diag = basis.resolve(1.0, 1.0);
        assert!((diag.length() - 1.0).abs() < 1e-5);
        assert_eq!(diag.y, 0.0);
    }

    #[test]
    fn revoked_controller_is_inert() {
        let mut c = controller();
        settle(&mut c);
        c.revoke_control();
        let start = c.position;
        let report = c.tick(
            &LocomotionInput {
                jump_pressed: true,
                ..forward()
            },
            DT,
        );
        assert!(!report.jumped);
        assert_eq!(c.position, start);
        assert!(!c.has_control());
    }

    #[test]
    fn nan_axes_treated_as_zero() {
        let mut c = controller();
        settle(&mut c);
        let start = c.position;
        c.tick(
            &LocomotionInput {
                move_x: f32::NAN,
                move_z: f32::INFINITY,
                direction_held: true,
                ..Default::default()
            },
            DT,
        );
        assert_eq!(c.position.x, start.x);
        assert_eq!(c.position.z, start.z);
    }

    #[test]
    fn sample_reads_bound_keys() {
        use aftershock_core::input::KeyboardState;
        let mut keys = KeyboardState::new();
        keys.on_key_down("ArrowLeft");
        keys.on_key_down("Numpad0");
        keys.on_key_down("ControlRight");
        let input = LocomotionInput::sample(&ControlScheme::Arrows.bindings(), &keys);
        assert_eq!(input.move_x, -1.0);
        assert!(input.direction_pressed);
        assert!(input.jump_pressed);
        assert!(input.duck_held);
        assert!(!input.sprint_held);

        let other = LocomotionInput::sample(&ControlScheme::Wasd.bindings(), &keys);
        assert_eq!(other, LocomotionInput::default());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_input() -> impl Strategy<Value = LocomotionInput> {
            (
                -1.0f32..=1.0,
                -1.0f32..=1.0,
                any::<bool>(),
                any::<bool>(),
                any::<bool>(),
                any::<bool>(),
            )
                .prop_map(|(x, z, pressed, jump, duck, sprint)| LocomotionInput {
                    move_x: x,
                    move_z: z,
                    direction_pressed: pressed,
                    direction_held: x != 0.0 || z != 0.0,
                    jump_pressed: jump,
                    duck_held: duck,
                    sprint_held: sprint,
                })
        }

        proptest! {
            #[test]
            fn never_below_ground_and_facing_normalized(
                inputs in prop::collection::vec(arb_input(), 1..200),
            ) {
                let mut c = controller();
                for input in &inputs {
                    c.tick(input, DT);
                    prop_assert!(c.position.y >= 0.0);
                    prop_assert!(c.position.is_finite());
                    prop_assert!((c.facing.length() - 1.0).abs() < 1e-3);
                }
            }

            #[test]
            fn never_ducking_and_jumping_together(
                inputs in prop::collection::vec(arb_input(), 1..200),
            ) {
                let mut c = controller();
                for input in &inputs {
                    c.tick(input, DT);
                    if c.is_ducking() {
                        prop_assert!(!c.is_jumping());
                    }
                }
            }
        }
    }
}

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::world::Transform;

/// Fraction of linear velocity lost per second.
const LINEAR_DAMPING: f32 = 0.5;
/// Fraction of angular velocity lost per second.
const ANGULAR_DAMPING: f32 = 1.5;
/// Horizontal friction applied while resting on the floor, per second.
const FLOOR_FRICTION: f32 = 4.0;
/// Mass used when a declared mass is unusable.
pub const DEFAULT_MASS: f32 = 1.0;

/// Where a hazard target's rigid body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyOrigin {
    /// Declared by the scene.
    Declared,
    /// Constructed at hazard setup because the object had none.
    Constructed,
}

/// Minimal rigid body for hazard targets.
///
/// Forces and torques accumulate between integrations and are cleared by
/// [`PhysicsBody::integrate`]. A kinematic body ignores both and never moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub mass: f32,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub kinematic: bool,
    pub origin: BodyOrigin,
    force: Vec3,
    torque: Vec3,
}

impl PhysicsBody {
    /// A kinematic body at rest.
    pub fn at_rest(mass: f32, origin: BodyOrigin) -> Self {
        let mass = if mass.is_finite() && mass > 0.0 {
            mass
        } else {
            DEFAULT_MASS
        };
        Self {
            mass,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            kinematic: true,
            origin,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    pub fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;
        if kinematic {
            self.settle();
        }
    }

    /// Zero all motion and pending forces.
    pub fn settle(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    pub fn add_force(&mut self, force: Vec3) {
        if force.is_finite() {
            self.force += force;
        }
    }

    pub fn add_torque(&mut self, torque: Vec3) {
        if torque.is_finite() {
            self.torque += torque;
        }
    }

    /// Semi-implicit Euler step: velocity first, then position.
    ///
    /// The body cannot sink below `floor_y`; touching the floor kills downward
    /// velocity and applies horizontal friction.
    pub fn integrate(&mut self, transform: &mut Transform, dt: f32, gravity: f32, floor_y: f32) {
        if self.kinematic || dt <= 0.0 {
            self.force = Vec3::ZERO;
            self.torque = Vec3::ZERO;
            return;
        }

        let acceleration = self.force / self.mass + Vec3::new(0.0, gravity, 0.0);
        self.velocity += acceleration * dt;
        self.angular_velocity += self.torque / self.mass * dt;
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;

        self.velocity *= (1.0 - LINEAR_DAMPING * dt).max(0.0);
        self.angular_velocity *= (1.0 - ANGULAR_DAMPING * dt).max(0.0);

        transform.translation += self.velocity * dt;
        let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
        transform.rotation = (spin * transform.rotation).normalize();

        if transform.translation.y <= floor_y {
            transform.translation.y = floor_y;
            if self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
            }
            let keep = (1.0 - FLOOR_FRICTION * dt).max(0.0);
            self.velocity.x *= keep;
            self.velocity.z *= keep;
        }

        if !self.velocity.is_finite() || !self.angular_velocity.is_finite() {
            self.settle();
        }
    }
}

use aftershock_core::collaborators::Collaborators;
use aftershock_core::input::KeyBindings;
use aftershock_core::player::PlayerSlot;

use crate::health::{DamageOutcome, HealthConfig, HealthSystem};
use crate::locomotion::{LocomotionConfig, LocomotionController};

/// One duelist: motion and health of the same logical player.
#[derive(Debug, Clone)]
pub struct DuelPlayer {
    pub slot: PlayerSlot,
    pub bindings: KeyBindings,
    pub locomotion: LocomotionController,
    pub health: HealthSystem,
}

impl DuelPlayer {
    pub fn new(slot: PlayerSlot, locomotion: &LocomotionConfig, health: &HealthConfig) -> Self {
        Self {
            slot,
            bindings: locomotion.profile(slot).scheme.bindings(),
            locomotion: LocomotionController::new(slot, locomotion),
            health: HealthSystem::new(slot, health),
        }
    }

    pub fn is_ducking(&self) -> bool {
        self.locomotion.is_ducking()
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    /// Apply damage and publish the new health. A killing blow revokes
    /// locomotion control; reporting the death is left to the caller.
    pub fn take_damage(&mut self, amount: f32, collab: &mut Collaborators) -> DamageOutcome {
        let outcome = self.health.take_damage(amount);
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Damaged { .. } => self.publish_health(collab),
            DamageOutcome::Died => {
                self.locomotion.revoke_control();
                self.publish_health(collab);
            }
        }
        outcome
    }

    pub fn heal(&mut self, amount: f32, collab: &mut Collaborators) -> bool {
        let healed = self.health.heal(amount);
        if healed {
            self.publish_health(collab);
        }
        healed
    }

    pub fn publish_health(&self, collab: &mut Collaborators) {
        collab.show_health(self.slot, self.health.health(), self.health.max_health());
    }
}

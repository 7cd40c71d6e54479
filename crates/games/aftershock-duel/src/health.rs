use aftershock_core::player::PlayerSlot;
use serde::{Deserialize, Serialize};

/// Default maximum health.
pub const MAX_HEALTH: f32 = 100.0;
/// Health at or below this is zero. Absorbs rounding from per-frame damage.
const DEATH_THRESHOLD: f32 = 1e-3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub max_health: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: MAX_HEALTH,
        }
    }
}

/// Result of a damage call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Player already dead, or the amount was unusable.
    Ignored,
    /// Health went down and the player survived.
    Damaged { health: f32 },
    /// This call killed the player. Returned exactly once per player.
    Died,
}

/// Health and the latched dead flag for one player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSystem {
    slot: PlayerSlot,
    max: f32,
    current: f32,
    dead: bool,
}

impl HealthSystem {
    /// A non-finite or non-positive `max_health` falls back to [`MAX_HEALTH`].
    pub fn new(slot: PlayerSlot, config: &HealthConfig) -> Self {
        let max = if config.max_health.is_finite() && config.max_health > 0.0 {
            config.max_health
        } else {
            tracing::warn!(
                %slot,
                max_health = config.max_health,
                fallback = MAX_HEALTH,
                "invalid max health, using default"
            );
            MAX_HEALTH
        };
        Self {
            slot,
            max,
            current: max,
            dead: false,
        }
    }

    pub fn health(&self) -> f32 {
        self.current
    }

    pub fn max_health(&self) -> f32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }
        if !amount.is_finite() || amount < 0.0 {
            tracing::warn!(slot = %self.slot, amount, "rejected damage amount");
            return DamageOutcome::Ignored;
        }
        self.current = (self.current - amount).clamp(0.0, self.max);
        if self.current <= DEATH_THRESHOLD {
            self.current = 0.0;
            self.dead = true;
            tracing::info!(slot = %self.slot, "player died");
            DamageOutcome::Died
        } else {
            DamageOutcome::Damaged {
                health: self.current,
            }
        }
    }

    /// Returns false when the call was ignored. Dead players cannot be healed.
    pub fn heal(&mut self, amount: f32) -> bool {
        if self.dead {
            return false;
        }
        if !amount.is_finite() || amount < 0.0 {
            tracing::warn!(slot = %self.slot, amount, "rejected heal amount");
            return false;
        }
        self.current = (self.current + amount).clamp(0.0, self.max);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health() -> HealthSystem {
        HealthSystem::new(PlayerSlot::One, &HealthConfig::default())
    }

    #[test]
    fn starts_full() {
        let h = health();
        assert_eq!(h.health(), MAX_HEALTH);
        assert!(!h.is_dead());
    }

    #[test]
    fn damage_reduces_health() {
        let mut h = health();
        assert_eq!(h.take_damage(30.0), DamageOutcome::Damaged { health: 70.0 });
        assert_eq!(h.health(), 70.0);
    }

    #[test]
    fn overkill_clamps_to_zero_and_dies_once() {
        let mut h = health();
        assert_eq!(h.take_damage(250.0), DamageOutcome::Died);
        assert_eq!(h.health(), 0.0);
        assert!(h.is_dead());
        assert_eq!(h.take_damage(10.0), DamageOutcome::Ignored);
        assert_eq!(h.health(), 0.0);
    }

    #[test]
    fn exact_lethal_damage_kills() {
        let mut h = health();
        assert_eq!(h.take_damage(MAX_HEALTH), DamageOutcome::Died);
    }

    #[test]
    fn unusable_max_falls_back_to_default() {
        for max_health in [-1.0, 0.0, f32::NAN, f32::INFINITY] {
            let mut h = HealthSystem::new(PlayerSlot::Two, &HealthConfig { max_health });
            assert_eq!(h.max_health(), MAX_HEALTH, "{max_health}");
            assert_eq!(h.take_damage(5.0), DamageOutcome::Damaged { health: 95.0 });
            assert!(h.heal(5.0));
            assert_eq!(h.health(), MAX_HEALTH);
        }
    }

    #[test]
    fn rounding_residue_counts_as_dead() {
        let mut h = health();
        h.take_damage(MAX_HEALTH - 0.0005);
        assert!(h.is_dead());
        assert_eq!(h.health(), 0.0);
    }

    #[test]
    fn heal_caps_at_max() {
        let mut h = health();
        h.take_damage(40.0);
        assert!(h.heal(100.0));
        assert_eq!(h.health(), MAX_HEALTH);
    }

    #[test]
    fn dead_players_stay_dead() {
        let mut h = health();
        h.take_damage(MAX_HEALTH);
        assert!(!h.heal(50.0));
        assert_eq!(h.health(), 0.0);
        assert!(h.is_dead());
    }

    #[test]
    fn bad_amounts_are_ignored() {
        let mut h = health();
        assert_eq!(h.take_damage(f32::NAN), DamageOutcome::Ignored);
        assert_eq!(h.take_damage(-5.0), DamageOutcome::Ignored);
        assert_eq!(h.take_damage(f32::INFINITY), DamageOutcome::Ignored);
        assert!(!h.heal(f32::NAN));
        assert!(!h.heal(-1.0));
        assert_eq!(h.health(), MAX_HEALTH);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Damage(f32),
            Heal(f32),
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (-10.0f32..80.0).prop_map(Op::Damage),
                (-10.0f32..80.0).prop_map(Op::Heal),
            ]
        }

        proptest! {
            #[test]
            fn health_bounded_and_death_latched(
                ops in prop::collection::vec(arb_op(), 0..100),
            ) {
                let mut h = health();
                let mut deaths = 0;
                let mut was_dead = false;
                for op in ops {
                    match op {
                        Op::Damage(a) => {
                            if h.take_damage(a) == DamageOutcome::Died {
                                deaths += 1;
                            }
                        }
                        Op::Heal(a) => {
                            h.heal(a);
                        }
                    }
                    prop_assert!(h.health() >= 0.0 && h.health() <= MAX_HEALTH);
                    if was_dead {
                        prop_assert!(h.is_dead());
                    }
                    was_dead = h.is_dead();
                }
                prop_assert!(deaths <= 1);
                prop_assert_eq!(deaths == 1, h.is_dead());
            }
        }
    }
}

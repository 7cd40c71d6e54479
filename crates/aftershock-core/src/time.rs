use serde::{Deserialize, Serialize};

/// Simulated match clock.
///
/// Every duration in the simulation (hazard length, round length, countdown)
/// is measured by summing the scaled deltas this clock hands out, never by
/// wall-clock time. Freezing the clock therefore pauses all of them at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    time_scale: f32,
    elapsed: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self {
            time_scale: 1.0,
            elapsed: 0.0,
        }
    }

    /// Advance by a raw frame delta and return the scaled delta to integrate.
    ///
    /// Non-finite or negative deltas are treated as zero.
    pub fn advance(&mut self, raw_dt: f32) -> f32 {
        let raw_dt = if raw_dt.is_finite() && raw_dt > 0.0 {
            raw_dt
        } else {
            0.0
        };
        let dt = raw_dt * self.time_scale;
        self.elapsed += dt;
        dt
    }

    /// Total scaled time since the clock was created.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn freeze(&mut self) {
        self.time_scale = 0.0;
    }

    pub fn unfreeze(&mut self) {
        self.time_scale = 1.0;
    }

    pub fn is_frozen(&self) -> bool {
        self.time_scale == 0.0
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_elapsed() {
        let mut clock = SimClock::new();
        assert_eq!(clock.advance(0.25), 0.25);
        assert_eq!(clock.advance(0.25), 0.25);
        assert!((clock.elapsed() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn frozen_clock_hands_out_zero() {
        let mut clock = SimClock::new();
        clock.advance(1.0);
        clock.freeze();
        assert!(clock.is_frozen());
        assert_eq!(clock.advance(1.0), 0.0);
        assert_eq!(clock.elapsed(), 1.0);

        clock.unfreeze();
        assert_eq!(clock.advance(1.0), 1.0);
        assert_eq!(clock.elapsed(), 2.0);
    }

    #[test]
    fn bad_deltas_are_ignored() {
        let mut clock = SimClock::new();
        assert_eq!(clock.advance(f32::NAN), 0.0);
        assert_eq!(clock.advance(f32::INFINITY), 0.0);
        assert_eq!(clock.advance(-1.0), 0.0);
        assert_eq!(clock.elapsed(), 0.0);
    }
}

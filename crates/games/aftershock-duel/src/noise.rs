//! Smooth 2D gradient noise for hazard perturbation.
//!
//! Lattice gradients come from an integer hash so the field is deterministic
//! and needs no permutation table. Output is scaled into `[-1, 1]`.

use std::f32::consts::{FRAC_1_SQRT_2, SQRT_2};

/// Span of per-target seed offsets along the second noise axis.
const SEED_SPAN: f32 = 1024.0;

/// Eight unit gradient directions.
const GRADIENTS: [(f32, f32); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    (FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    (-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
];

fn hash2(ix: i32, iy: i32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x8da6_b343) ^ (iy as u32).wrapping_mul(0xd816_3841);
    h ^= h >> 13;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 16;
    h
}

/// Quintic fade, zero first and second derivative at the lattice.
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn corner(ix: i32, iy: i32, dx: f32, dy: f32) -> f32 {
    let (gx, gy) = GRADIENTS[(hash2(ix, iy) & 7) as usize];
    gx * dx + gy * dy
}

/// Gradient noise at `(x, y)` in `[-1, 1]`. Zero on integer lattice points.
pub fn gradient_noise(x: f32, y: f32) -> f32 {
    if !x.is_finite() || !y.is_finite() {
        return 0.0;
    }
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let ix = x0 as i32;
    let iy = y0 as i32;

    let n00 = corner(ix, iy, fx, fy);
    let n10 = corner(ix.wrapping_add(1), iy, fx - 1.0, fy);
    let n01 = corner(ix, iy.wrapping_add(1), fx, fy - 1.0);
    let n11 = corner(ix.wrapping_add(1), iy.wrapping_add(1), fx - 1.0, fy - 1.0);

    let u = fade(fx);
    let v = fade(fy);
    let value = lerp(lerp(n00, n10, u), lerp(n01, n11, u), v);
    (value * SQRT_2).clamp(-1.0, 1.0)
}

/// Per-object offset along the noise y axis, stable for a given id.
///
/// Never an integer, so a lane sampled at integer times is still non-zero.
pub fn seed_offset(id: u32) -> f32 {
    let h = hash2(id as i32, 0x5eed);
    let unit = (h >> 8) as f32 / (1u32 << 24) as f32;
    unit * SEED_SPAN + 0.37
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_on_lattice() {
        for x in -3..3 {
            for y in -3..3 {
                assert_eq!(gradient_noise(x as f32, y as f32), 0.0);
            }
        }
    }

    #[test]
    fn deterministic() {
        assert_eq!(gradient_noise(3.7, 12.25), gradient_noise(3.7, 12.25));
        assert_eq!(seed_offset(42), seed_offset(42));
    }

    #[test]
    fn non_finite_input_is_silent() {
        assert_eq!(gradient_noise(f32::NAN, 1.5), 0.0);
        assert_eq!(gradient_noise(0.5, f32::INFINITY), 0.0);
    }

    #[test]
    fn seeds_differ_between_objects() {
        let seeds: Vec<f32> = (0..16).map(seed_offset).collect();
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn field_is_not_flat() {
        let spread = (0..200)
            .map(|i| gradient_noise(i as f32 * 0.173, 5.41))
            .fold(0.0f32, |acc, v| acc.max(v.abs()));
        assert!(spread > 0.1, "noise looks flat: max |v| = {spread}");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn output_stays_in_unit_range(x in -1.0e4f32..1.0e4, y in -1.0e4f32..1.0e4) {
                let v = gradient_noise(x, y);
                prop_assert!((-1.0..=1.0).contains(&v));
            }

            #[test]
            fn small_steps_give_small_changes(x in -100.0f32..100.0, y in -100.0f32..100.0) {
                let a = gradient_noise(x, y);
                let b = gradient_noise(x + 1e-3, y);
                prop_assert!((a - b).abs() < 0.05);
            }
        }
    }
}

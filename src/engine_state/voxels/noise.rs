//! # Noise Module
//!
//! Deterministic 2D noise fields that drive the terrain heightmap.
//!
//! [`GradientNoise`] is the engine's own gradient noise: every integer lattice point
//! gets a pseudo-random unit gradient derived purely from its coordinates, so the
//! same world coordinates always produce the same terrain, across runs and across
//! chunk rebuilds. [`PerlinNoise`] wraps the `noise` crate for seeded worlds and
//! [`ConstantNoise`] produces perfectly flat terrain.

use std::f64::consts::PI;

use noise::{NoiseFn, Perlin};

/// A deterministic scalar field over the plane.
///
/// Implementations must be pure: equal inputs always yield bit-identical outputs
/// and sampling never mutates state.
pub trait NoiseField {
    /// Samples the field at `(x, y)`. Values are roughly within [-1, 1].
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<N: NoiseField + ?Sized> NoiseField for Box<N> {
    fn sample(&self, x: f64, y: f64) -> f64 {
        (**self).sample(x, y)
    }
}

/// Gradient noise with hash-derived lattice gradients and smootherstep blending.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradientNoise;

impl GradientNoise {
    /// Mixes lattice coordinates into 32 pseudo-random bits.
    fn lattice_hash(ix: i32, iy: i32) -> u32 {
        const HALF: u32 = u32::BITS / 2;

        let mut a = ix as u32;
        let mut b = iy as u32;
        a = a.wrapping_mul(3_284_157_443);
        b ^= a.rotate_left(HALF);
        b = b.wrapping_mul(1_911_520_717);
        a ^= b.rotate_left(HALF);
        a.wrapping_mul(2_048_419_325)
    }

    /// Maps the lattice hash to an angle in [0, 2π) and returns its unit vector.
    fn lattice_gradient(ix: i32, iy: i32) -> (f64, f64) {
        let angle = Self::lattice_hash(ix, iy) as f64 * (PI / 2_147_483_648.0);
        (angle.cos(), angle.sin())
    }

    /// Dot product of a lattice gradient with the offset from that lattice point.
    fn lattice_dot(ix: i32, iy: i32, x: f64, y: f64) -> f64 {
        let (gx, gy) = Self::lattice_gradient(ix, iy);
        (x - ix as f64) * gx + (y - iy as f64) * gy
    }
}

/// Quintic easing `6w^5 - 15w^4 + 10w^3`; flat first and second derivative at 0 and 1.
pub fn smootherstep(w: f64) -> f64 {
    w * w * w * (w * (w * 6.0 - 15.0) + 10.0)
}

fn lerp(a0: f64, a1: f64, w: f64) -> f64 {
    a0 + (a1 - a0) * w
}

impl NoiseField for GradientNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor() as i32;
        let y0 = y.floor() as i32;
        let x1 = x0.wrapping_add(1);
        let y1 = y0.wrapping_add(1);

        let sx = smootherstep(x - x0 as f64);
        let sy = smootherstep(y - y0 as f64);

        let bottom = lerp(
            Self::lattice_dot(x0, y0, x, y),
            Self::lattice_dot(x1, y0, x, y),
            sx,
        );
        let top = lerp(
            Self::lattice_dot(x0, y1, x, y),
            Self::lattice_dot(x1, y1, x, y),
            sx,
        );
        lerp(bottom, top, sy)
    }
}

/// Seeded Perlin noise backed by the `noise` crate.
#[derive(Clone)]
pub struct PerlinNoise {
    perlin: Perlin,
}

impl PerlinNoise {
    /// Creates a Perlin field for the given seed.
    pub fn new(seed: u32) -> Self {
        PerlinNoise {
            perlin: Perlin::new(seed),
        }
    }
}

impl NoiseField for PerlinNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x, y])
    }
}

/// A field that returns the same value everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantNoise {
    value: f64,
}

impl ConstantNoise {
    /// Creates a constant field.
    pub fn new(value: f64) -> Self {
        ConstantNoise { value }
    }
}

impl NoiseField for ConstantNoise {
    fn sample(&self, _x: f64, _y: f64) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_noise_is_deterministic() {
        let a = GradientNoise;
        let b = GradientNoise;
        for i in 0..200 {
            let x = i as f64 * 0.37 - 40.0;
            let y = i as f64 * 0.11 + 3.0;
            assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
        }
    }

    #[test]
    fn lattice_hash_matches_known_values() {
        assert_eq!(GradientNoise::lattice_hash(0, 0), 0);
        assert_eq!(GradientNoise::lattice_hash(1, 0), 3_094_586_479);
        assert_eq!(GradientNoise::lattice_hash(0, 1), 4_133_807_155);
        assert_eq!(GradientNoise::lattice_hash(-1, -1), 471_089_182);
        assert_eq!(GradientNoise::lattice_hash(12345, -678), 3_642_649_129);
    }

    #[test]
    fn gradient_noise_matches_known_samples() {
        let known = [
            (0.5, 0.5, 0x3f71_302f_ae22_d340_u64),
            (1.25, -3.75, 0x3fb5_8baa_c581_531e),
            (-7.3, 12.9, 0xbfc7_cb3a_9e07_f924),
            (100.1, -200.2, 0x3fcc_14b3_7f6b_04f6),
        ];
        for (x, y, bits) in known {
            let v = GradientNoise.sample(x, y);
            assert_eq!(v.to_bits(), bits, "sample({x}, {y}) = {v}");
        }
    }

    #[test]
    fn gradient_noise_vanishes_on_lattice_points() {
        for ix in -5..5 {
            for iy in -5..5 {
                assert_eq!(GradientNoise.sample(ix as f64, iy as f64), 0.0);
            }
        }
    }

    #[test]
    fn gradient_noise_stays_in_range() {
        for i in 0..5000 {
            let x = i as f64 * 0.173 - 400.0;
            let y = i as f64 * 0.291 - 700.0;
            let v = GradientNoise.sample(x, y);
            assert!((-1.0..=1.0).contains(&v), "{v} out of range at ({x}, {y})");
        }
    }

    #[test]
    fn gradient_noise_is_not_constant() {
        let first = GradientNoise.sample(0.5, 0.5);
        let varies = (1..50).any(|i| GradientNoise.sample(0.5 + i as f64, 0.5) != first);
        assert!(varies);
    }

    #[test]
    fn gradient_noise_is_continuous() {
        let v1 = GradientNoise.sample(10.3, -4.7);
        let v2 = GradientNoise.sample(10.3001, -4.7);
        assert!((v1 - v2).abs() < 0.01);
    }

    #[test]
    fn lattice_gradients_are_unit_length() {
        for (ix, iy) in [(0, 0), (1, -1), (i32::MAX, i32::MIN), (-37, 912)] {
            let (gx, gy) = GradientNoise::lattice_gradient(ix, iy);
            assert!(((gx * gx + gy * gy) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn smootherstep_hits_endpoints() {
        assert_eq!(smootherstep(0.0), 0.0);
        assert_eq!(smootherstep(1.0), 1.0);
        assert_eq!(smootherstep(0.5), 0.5);
    }

    #[test]
    fn perlin_adapter_is_deterministic_per_seed() {
        let a = PerlinNoise::new(3);
        let b = PerlinNoise::new(3);
        assert_eq!(a.sample(1.25, -7.5), b.sample(1.25, -7.5));
    }

    #[test]
    fn boxed_fields_delegate() {
        let boxed: Box<dyn NoiseField> = Box::new(ConstantNoise::new(-1.0));
        assert_eq!(boxed.sample(100.0, 100.0), -1.0);
    }
}

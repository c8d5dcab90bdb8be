// field.rs - Star storage, sampling and depth advance
//
// Structure-of-Arrays layout: the per-frame depth pass only walks `z`.

use rand::Rng;

use crate::config::StarfieldConfig;

/// One star in camera space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    /// Depth ahead of the viewer, in (0, depth].
    pub z: f64,
}

pub struct StarField {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,

    depth: f64,
    near: f64,
}

impl StarField {
    /// Sample `config.star_count` independent stars.
    pub fn new<R: Rng + ?Sized>(config: &StarfieldConfig, rng: &mut R) -> Self {
        let n = config.star_count;
        let mut field = Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
            depth: config.depth,
            near: config.near,
        };

        for _ in 0..n {
            field.x.push(rng.random_range(-config.spread_x..config.spread_x));
            field.y.push(rng.random_range(-config.spread_y..config.spread_y));
            // random() is [0, 1), flip it so depth is never zero
            field.z.push(config.depth * (1.0 - rng.random::<f64>()));
        }

        field
    }

    /// Build a field from explicit stars. Depths must be in (0, depth].
    pub fn from_stars<I>(config: &StarfieldConfig, stars: I) -> Self
    where
        I: IntoIterator<Item = Star>,
    {
        let mut field = Self {
            x: Vec::new(),
            y: Vec::new(),
            z: Vec::new(),
            depth: config.depth,
            near: config.near,
        };
        for s in stars {
            debug_assert!(s.z > 0.0 && s.z <= config.depth, "star depth {} out of range", s.z);
            field.x.push(s.x);
            field.y.push(s.y);
            field.z.push(s.z);
        }
        field
    }

    /// Move every star `distance` units closer, wrapping the ones that
    /// reach the near plane back to the far end.
    pub fn advance(&mut self, distance: f64) {
        if !distance.is_finite() || distance <= 0.0 {
            return;
        }
        let (near, depth) = (self.near, self.depth);
        for z in &mut self.z {
            *z = wrap_depth(*z - distance, near, depth);
        }
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<Star> {
        Some(Star { x: *self.x.get(i)?, y: self.y[i], z: self.z[i] })
    }

    pub fn iter(&self) -> impl Iterator<Item = Star> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((&x, &y), &z)| Star { x, y, z })
    }

    pub fn depths(&self) -> &[f64] {
        &self.z
    }

    /// Far plane this field wraps to.
    pub fn depth(&self) -> f64 {
        self.depth
    }
}

/// Bring a depth at or below `near` back into (near, depth] by adding
/// whole multiples of `depth`. Only z is recycled, x/y stay put.
#[inline]
pub fn wrap_depth(z: f64, near: f64, depth: f64) -> f64 {
    // depth <= 0 never converges; StarfieldConfig::validate rejects it
    if z > near || !(depth > 0.0) {
        return z;
    }

    // A long stall can overshoot by many wraps, so jump to the last one
    let wraps = ((near - z) / depth).floor() + 1.0;
    let mut z = z + wraps * depth;
    // Rounding at large magnitudes can land just short
    while z <= near {
        z += depth;
    }
    // Anything in (0, near] lands in (depth, depth + near]; pin to the far plane
    z.min(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn field(seed: u64, count: usize) -> StarField {
        let config = StarfieldConfig { star_count: count, ..Default::default() };
        StarField::new(&config, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_sampling_stays_inside_the_world_window() {
        let f = field(7, 3000);
        assert_eq!(f.len(), 3000);
        for (i, s) in f.iter().enumerate() {
            assert!((-800.0..800.0).contains(&s.x), "star {i} x = {}", s.x);
            assert!((-450.0..450.0).contains(&s.y), "star {i} y = {}", s.y);
            assert!(s.z > 0.0 && s.z <= 1000.0, "star {i} z = {}", s.z);
        }
    }

    #[test]
    fn test_same_seed_produces_same_field() {
        let a = field(123, 500);
        let b = field(123, 500);
        assert!(a.iter().eq(b.iter()));

        let c = field(124, 500);
        assert!(!a.iter().eq(c.iter()));
    }

    #[test]
    fn test_zero_count_is_valid() {
        let f = field(1, 0);
        assert!(f.is_empty());
        assert_eq!(f.get(0), None);
    }

    #[test]
    fn test_advance_by_zero_leaves_depths_unchanged() {
        let mut f = field(9, 1000);
        let before = f.depths().to_vec();
        f.advance(0.0);
        assert_eq!(f.depths(), &before[..]);
    }

    #[test]
    fn test_depth_invariant_holds_over_many_steps() {
        let mut f = field(42, 2000);
        let steps = [0.3, 16.0 * 0.08, 1.7, 250.0, 999.0, 1000.0, 1234.5, 5e6, 0.01];
        for _ in 0..50 {
            for &d in &steps {
                f.advance(d);
                for (i, &z) in f.depths().iter().enumerate() {
                    assert!(z > 0.0 && z <= 1000.0, "star {i} z = {z} after advance({d})");
                }
            }
        }
    }

    #[test]
    fn test_wrap_keeps_lateral_position() {
        let config = StarfieldConfig::default();
        let mut f = StarField::from_stars(&config, [Star { x: 120.0, y: -33.0, z: 5.0 }]);
        f.advance(4.5);
        let s = f.get(0).unwrap();
        assert_eq!((s.x, s.y), (120.0, -33.0));
        assert_eq!(s.z, 1000.0);

        f.advance(10.0);
        let s = f.get(0).unwrap();
        assert_eq!((s.x, s.y), (120.0, -33.0));
        assert_eq!(s.z, 990.0);
    }

    #[test]
    fn test_wrap_adds_depth_instead_of_resampling() {
        assert_eq!(wrap_depth(-4.0, 1.0, 1000.0), 996.0);
        assert_eq!(wrap_depth(1.0, 1.0, 1000.0), 1000.0);
        assert_eq!(wrap_depth(1.5, 1.0, 1000.0), 1.5);
    }

    #[test]
    fn test_wrap_handles_multiple_laps() {
        // 3.5 laps behind the near plane
        assert_eq!(wrap_depth(-3499.0, 1.0, 1000.0), 501.0);
        let z = wrap_depth(-1e12, 1.0, 1000.0);
        assert!(z > 1.0 && z <= 1000.0, "z = {z}");
    }

    #[test]
    fn test_non_finite_distance_is_ignored() {
        let mut f = field(3, 100);
        let before = f.depths().to_vec();
        f.advance(f64::INFINITY);
        f.advance(f64::NAN);
        f.advance(-5.0);
        assert_eq!(f.depths(), &before[..]);
    }
}

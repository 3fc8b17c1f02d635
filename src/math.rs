//! Extensions to `glam::Vec2`.
//!
//! The engine uses [`glam::Vec2`] everywhere: component-wise arithmetic,
//! `length()`, `round()`, `floor()`, `min()`/`max()` all come from glam.
//! Note that `normalize()` on a zero-length vector produces NaN components;
//! callers that normalize user input (e.g. a dash direction) must guard with
//! `is_nan()` before using the result.

use glam::Vec2;
use rand::Rng;

/// Random-sampling extensions for [`Vec2`].
pub trait Vec2Ext {
    /// A vector with both components drawn uniformly from `[0, 1)`.
    fn random<R: Rng>(rng: &mut R) -> Self;

    /// A unit vector at a uniformly random angle in `[0, 2π)`.
    fn random_unit_vector<R: Rng>(rng: &mut R) -> Self;
}

impl Vec2Ext for Vec2 {
    fn random<R: Rng>(rng: &mut R) -> Self {
        Vec2::new(rng.gen::<f32>(), rng.gen::<f32>())
    }

    fn random_unit_vector<R: Rng>(rng: &mut R) -> Self {
        let theta = rng.gen::<f32>() * std::f32::consts::TAU;
        Vec2::new(theta.cos(), theta.sin())
    }
}

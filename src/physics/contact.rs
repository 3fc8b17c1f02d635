//! Contact data produced by the narrow phase.

use glam::Vec2;

/// Result of a successful ray or swept-AABB test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Point where the ray (or swept center) enters the target.
    pub point: Vec2,
    /// Axis-aligned unit normal of the struck face, pointing against the
    /// motion on that axis. Zero when both slab near-times tie exactly
    /// (corner hit).
    pub normal: Vec2,
    /// Point where the ray exits the target.
    pub exit: Vec2,
    /// Time of impact as a fraction of the frame's motion, in `[0, 1]` for
    /// ray tests and `(-0.0001, 1]` for swept tests.
    pub toi: f32,
}

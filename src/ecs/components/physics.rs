//! Collision components.

use glam::Vec2;

use crate::physics::collider::{Aabb, ColliderKind, Rect};

/// Collision component: owns the entity's [`Aabb`] and exposes the
/// directional contact flags computed by the collision pipeline.
///
/// The box's position is refreshed every frame from the entity's `Position`
/// plus `offset`; the flags are recomputed every frame and never persist.
/// Downstream systems read them for gameplay decisions (a jump check reads
/// `south`).
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub aabb: Aabb,
    /// Displacement of the box from the entity's logical position.
    pub offset: Vec2,
    /// Contact on top of this entity (something pressing down on it).
    pub north: bool,
    /// Contact underneath (standing on ground).
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl Collider {
    /// A collider of the given size with no offset.
    pub fn new(size: Vec2, kind: ColliderKind) -> Self {
        Self {
            aabb: Aabb::new(Rect::new(Vec2::ZERO, size), kind),
            offset: Vec2::ZERO,
            north: false,
            south: false,
            east: false,
            west: false,
        }
    }

    /// Offset the box from the entity's position (sprite anchors rarely
    /// coincide with hitboxes).
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Whether any directional contact is currently set.
    pub fn touching(&self) -> bool {
        self.north || self.south || self.east || self.west
    }
}

//! Position and velocity components.
//!
//! Plain newtypes over [`glam::Vec2`]; there is deliberately no shared
//! "vector component" base type.

use glam::Vec2;

/// World-space position of an entity's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Velocity in world units per second. Entities without this component are
/// static bodies: the collision pipeline resolves others against them but
/// never moves them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

//! Carom 2D collision engine
//!
//! A small swept-AABB collision engine for ECS-driven canvas games.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - `glam::Vec2` extensions (random unit vectors)
//! 2. **physics::collider** - rectangles, AABBs, and collider kinds
//! 3. **physics::narrowphase** - point, rect, ray, and swept intersection tests
//! 4. **physics::broadphase** - quadtree and spatial-hash candidate filtering
//! 5. **physics** - the per-frame collision pipeline (feature = "ecs")
//! 6. **ecs** - hecs components and systems (feature = "ecs")
//!
//! Per frame, [`physics::CollisionWorld`] rebuilds the broad-phase index from
//! entity positions, queries candidates for each moving entity, resolves swept
//! collisions in time-of-impact order, and writes corrected velocities and
//! directional contact flags back to the entities. Position integration is a
//! separate step ([`ecs::systems::movement_system`]) that runs on the
//! corrected velocities.

pub mod math;
pub mod physics;

#[cfg(feature = "ecs")]
pub mod ecs;

pub use math::Vec2Ext;

pub use physics::broadphase::{BroadPhase, BroadPhaseError, QuadTree, SpatialHashGrid};
pub use physics::collider::{Aabb, ColliderKind, Rect};
pub use physics::contact::Contact;
pub use physics::narrowphase::{
    dynamic_rect_vs_rect, point_vs_rect, ray_vs_rect, rect_vs_rect,
};

#[cfg(feature = "ecs")]
pub use physics::{CollisionWorld, ContactEvent};

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

// Re-export glam for convenience
pub use glam;

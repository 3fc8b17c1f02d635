//! Components attached to game entities.

pub mod kinematics;
pub mod physics;

pub use kinematics::{Position, Velocity};
pub use physics::Collider;

//! Free-function systems run once per frame.

use super::components::kinematics::{Position, Velocity};

/// Integrate positions from velocities: `p += v * dt`.
///
/// Run this after `CollisionWorld::update` so positions advance with the
/// corrected velocities.
pub fn movement_system(world: &mut hecs::World, dt: f32) {
    for (_, (position, velocity)) in world.query_mut::<(&mut Position, &Velocity)>() {
        position.0 += velocity.0 * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_movement_integrates_velocity() {
        let mut world = hecs::World::new();
        let entity = world.spawn((
            Position::new(1.0, 2.0),
            Velocity::new(10.0, -4.0),
        ));

        movement_system(&mut world, 0.5);

        let position = world.get::<&Position>(entity).unwrap();
        assert_eq!(position.0, Vec2::new(6.0, 0.0));
    }

    #[test]
    fn test_static_entities_do_not_move() {
        let mut world = hecs::World::new();
        let entity = world.spawn((Position::new(3.0, 3.0),));

        movement_system(&mut world, 1.0);

        let position = world.get::<&Position>(entity).unwrap();
        assert_eq!(position.0, Vec2::new(3.0, 3.0));
    }
}

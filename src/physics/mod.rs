//! 2D swept-AABB collision detection and response.
//!
//! # Pipeline
//!
//! [`CollisionWorld::update`] runs once per frame:
//!
//! 1. Clear and rebuild the broad-phase index from every entity with a
//!    `Position` and a `Collider` (velocity copied in, zero for static
//!    bodies)
//! 2. For each entity that also has a `Velocity`: query candidates over the
//!    frame's swept extent, sweep against each one, sort hits by time of
//!    impact
//! 3. Resolve hits earliest-first: set directional contact flags, correct the
//!    velocity, and re-sync the box's cached velocity so later hits in the
//!    same pass see the correction
//!
//! Position integration happens afterwards in a separate step using the
//! corrected velocities (see `ecs::systems::movement_system`). The whole pass
//! is single-threaded and synchronous; the broad-phase index is owned
//! exclusively by the [`CollisionWorld`].

pub mod broadphase;
pub mod collider;
pub mod contact;
pub mod narrowphase;

#[cfg(feature = "ecs")]
pub use pipeline::{CollisionWorld, ContactEvent};

#[cfg(feature = "ecs")]
mod pipeline {
    use glam::Vec2;
    use tracing::{debug, trace};

    use crate::ecs::components::kinematics::{Position, Velocity};
    use crate::ecs::components::physics::Collider;

    use super::broadphase::{BroadPhase, BroadPhaseError, QuadTree, SpatialHashGrid};
    use super::collider::{Aabb, ColliderKind, Rect};
    use super::contact::Contact;
    use super::narrowphase::dynamic_rect_vs_rect;

    /// A contact against a `Custom*` collider, published for gameplay code.
    #[derive(Debug, Clone, Copy)]
    pub struct ContactEvent {
        /// The moving entity being resolved.
        pub entity: hecs::Entity,
        /// The collider it struck.
        pub other: hecs::Entity,
        pub contact: Contact,
    }

    /// Per-frame collision orchestration over a hecs world.
    ///
    /// Owns the broad-phase structure (chosen at construction) and the
    /// scratch buffers reused across frames.
    pub struct CollisionWorld {
        broadphase: Box<dyn BroadPhase<hecs::Entity>>,
        events: Vec<ContactEvent>,
        candidates: Vec<(hecs::Entity, Aabb)>,
    }

    impl CollisionWorld {
        /// A collision world backed by a quadtree over `bounds`.
        pub fn with_quadtree(bounds: Rect) -> Result<Self, BroadPhaseError> {
            debug!(?bounds, "collision world using quadtree broadphase");
            Ok(Self::new(Box::new(QuadTree::new(bounds)?)))
        }

        /// A collision world backed by a spatial hash grid.
        pub fn with_grid(cell_size: f32) -> Result<Self, BroadPhaseError> {
            debug!(cell_size, "collision world using spatial-hash broadphase");
            Ok(Self::new(Box::new(SpatialHashGrid::new(cell_size)?)))
        }

        fn new(broadphase: Box<dyn BroadPhase<hecs::Entity>>) -> Self {
            Self {
                broadphase,
                events: Vec::new(),
                candidates: Vec::new(),
            }
        }

        /// Contacts against `Custom*` colliders collected by the most recent
        /// [`update`](Self::update).
        pub fn events(&self) -> &[ContactEvent] {
            &self.events
        }

        /// Run one frame of collision detection and response.
        pub fn update(&mut self, world: &mut hecs::World, dt: f32) {
            self.events.clear();
            self.broadphase.clear();

            let mut indexed = 0usize;
            for (entity, (position, velocity, collider)) in
                world.query_mut::<(&Position, Option<&Velocity>, &mut Collider)>()
            {
                collider.aabb.rect.pos = position.0 + collider.offset;
                collider.aabb.vel = velocity.map_or(Vec2::ZERO, |v| v.0);
                self.broadphase.insert(entity, collider.aabb);
                indexed += 1;
            }
            trace!(entities = indexed, "rebuilt broadphase index");

            // Static bodies are only resolved against, never resolved. The
            // query mirrors the rebuild phase: an entity missing a Position
            // was never indexed and must not be resolved either.
            let movers: Vec<hecs::Entity> = world
                .query_mut::<(&Position, &Collider, &Velocity)>()
                .into_iter()
                .map(|(entity, _)| entity)
                .collect();

            for entity in movers {
                self.resolve_entity(world, entity, dt);
            }
        }

        fn resolve_entity(&mut self, world: &mut hecs::World, entity: hecs::Entity, dt: f32) {
            let mut aabb = match world.get::<&Collider>(entity) {
                Ok(collider) => collider.aabb,
                Err(_) => return,
            };
            let mut velocity = match world.get::<&Velocity>(entity) {
                Ok(velocity) => velocity.0,
                Err(_) => return,
            };

            self.candidates.clear();
            // Candidates must cover the frame's entire motion; the current
            // rect alone misses geometry a fast mover crosses into mid-frame.
            let motion = aabb.vel * dt;
            let swept = Rect::new(
                aabb.rect.pos.min(aabb.rect.pos + motion),
                aabb.rect.size + motion.abs(),
            );
            self.broadphase.query(&swept, &mut self.candidates);

            let mut hits: Vec<(hecs::Entity, Aabb, f32)> = Vec::new();
            for &(other, other_aabb) in &self.candidates {
                if other == entity {
                    continue;
                }
                if let Some(contact) = dynamic_rect_vs_rect(&aabb, &other_aabb, dt) {
                    hits.push((other, other_aabb, contact.toi));
                }
            }

            // Earliest impact first; resolving out of order produces
            // tunneling and order-dependent artifacts.
            hits.sort_by(|a, b| a.2.total_cmp(&b.2));

            let mut north = false;
            let mut south = false;
            let mut east = false;
            let mut west = false;

            for (other, other_aabb, _) in hits {
                // Re-run against the corrected velocity so a later contact in
                // the same pass cannot double-penetrate.
                let Some(contact) = dynamic_rect_vs_rect(&aabb, &other_aabb, dt) else {
                    continue;
                };

                if other_aabb.kind.emits_event() {
                    self.events.push(ContactEvent {
                        entity,
                        other,
                        contact,
                    });
                }

                if !other_aabb.kind.resolves(contact.normal) {
                    continue;
                }

                if contact.normal.y < 0.0 {
                    south = true;
                }
                if contact.normal.y > 0.0 {
                    north = true;
                }
                if contact.normal.x < 0.0 {
                    east = true;
                }
                if contact.normal.x > 0.0 {
                    west = true;
                }

                if other_aabb.kind == ColliderKind::Bounce {
                    if contact.normal.x != 0.0 {
                        velocity.x = -velocity.x;
                    }
                    if contact.normal.y != 0.0 {
                        velocity.y = -velocity.y;
                    }
                } else {
                    // Cancel the portion of the frame's motion remaining
                    // after impact along the blocked axis.
                    velocity.x += contact.normal.x * velocity.x.abs() * (1.0 - contact.toi);
                    velocity.y += contact.normal.y * velocity.y.abs() * (1.0 - contact.toi);
                }
                aabb.vel = velocity;

                trace!(?entity, ?other, toi = contact.toi, "resolved contact");
            }

            if let Ok(mut vel) = world.get::<&mut Velocity>(entity) {
                vel.0 = velocity;
            }
            if let Ok(mut collider) = world.get::<&mut Collider>(entity) {
                collider.north = north;
                collider.south = south;
                collider.east = east;
                collider.west = west;
                collider.aabb.vel = velocity;
            }
        }
    }
}

#[cfg(all(test, feature = "ecs"))]
mod tests {
    use super::collider::{ColliderKind, Rect};
    use super::pipeline::CollisionWorld;
    use crate::ecs::components::kinematics::{Position, Velocity};
    use crate::ecs::components::physics::Collider;
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn world_with_quadtree() -> CollisionWorld {
        CollisionWorld::with_quadtree(Rect::from_xywh(-100.0, -100.0, 400.0, 400.0)).unwrap()
    }

    fn spawn_static(world: &mut hecs::World, x: f32, y: f32, w: f32, h: f32) -> hecs::Entity {
        world.spawn((
            Position(Vec2::new(x, y)),
            Collider::new(Vec2::new(w, h), ColliderKind::Solid),
        ))
    }

    #[test]
    fn test_mover_stops_at_wall() {
        let mut world = hecs::World::new();
        let mut collisions = world_with_quadtree();

        let mover = world.spawn((
            Position(Vec2::new(0.0, 0.0)),
            Velocity(Vec2::new(10.0, 0.0)),
            Collider::new(Vec2::new(10.0, 10.0), ColliderKind::Solid),
        ));
        spawn_static(&mut world, 15.0, 0.0, 10.0, 10.0);

        collisions.update(&mut world, 1.0);

        // Contact at toi 0.5: half the remaining motion is cancelled.
        let velocity = world.get::<&Velocity>(mover).unwrap();
        assert_relative_eq!(velocity.0.x, 5.0);

        let collider = world.get::<&Collider>(mover).unwrap();
        assert!(collider.east);
        assert!(!collider.west);
        assert!(!collider.north);
        assert!(!collider.south);
    }

    #[test]
    fn test_falling_onto_floor_sets_south_flag() {
        let mut world = hecs::World::new();
        let mut collisions = world_with_quadtree();

        let mover = world.spawn((
            Position(Vec2::new(0.0, 0.0)),
            Velocity(Vec2::new(0.0, 20.0)),
            Collider::new(Vec2::new(10.0, 10.0), ColliderKind::Solid),
        ));
        spawn_static(&mut world, 0.0, 15.0, 100.0, 10.0);

        collisions.update(&mut world, 1.0);

        let collider = world.get::<&Collider>(mover).unwrap();
        assert!(collider.south);

        let velocity = world.get::<&Velocity>(mover).unwrap();
        assert!(velocity.0.y < 20.0);
    }

    #[test]
    fn test_contact_flags_reset_each_frame() {
        let mut world = hecs::World::new();
        let mut collisions = world_with_quadtree();

        let mover = world.spawn((
            Position(Vec2::new(0.0, 0.0)),
            Velocity(Vec2::new(10.0, 0.0)),
            Collider::new(Vec2::new(10.0, 10.0), ColliderKind::Solid),
        ));
        let wall = spawn_static(&mut world, 15.0, 0.0, 10.0, 10.0);

        collisions.update(&mut world, 1.0);
        assert!(world.get::<&Collider>(mover).unwrap().east);

        // The wall is gone; every flag (north included) must clear.
        world.despawn(wall).unwrap();
        collisions.update(&mut world, 1.0);

        let collider = world.get::<&Collider>(mover).unwrap();
        assert!(!collider.north && !collider.south && !collider.east && !collider.west);
    }

    #[test]
    fn test_resolution_order_is_earliest_first() {
        let mut world = hecs::World::new();
        let mut collisions = world_with_quadtree();

        // Moving diagonally into a floor (hit first) and a wall (hit later).
        let mover = world.spawn((
            Position(Vec2::new(0.0, 0.0)),
            Velocity(Vec2::new(20.0, 40.0)),
            Collider::new(Vec2::new(10.0, 10.0), ColliderKind::Solid),
        ));
        spawn_static(&mut world, -50.0, 20.0, 100.0, 10.0); // floor, toi 0.25
        spawn_static(&mut world, 25.0, -50.0, 10.0, 100.0); // wall, toi 0.75

        collisions.update(&mut world, 1.0);

        let collider = world.get::<&Collider>(mover).unwrap();
        assert!(collider.south, "floor contact must be registered");
        assert!(collider.east, "wall contact must be registered");

        let velocity = world.get::<&Velocity>(mover).unwrap();
        // Floor first: vy corrected by (1 - 0.25); then the wall with the
        // re-swept, slower motion.
        assert_relative_eq!(velocity.0.y, 10.0);
        assert!(velocity.0.x < 20.0);
    }

    #[test]
    fn test_static_bodies_are_not_resolved() {
        let mut world = hecs::World::new();
        let mut collisions = world_with_quadtree();

        // Overlapping statics: no velocity component, no resolution, no panic.
        let a = spawn_static(&mut world, 0.0, 0.0, 10.0, 10.0);
        spawn_static(&mut world, 5.0, 5.0, 10.0, 10.0);

        collisions.update(&mut world, 1.0);

        let collider = world.get::<&Collider>(a).unwrap();
        assert!(!collider.north && !collider.south && !collider.east && !collider.west);
    }

    #[test]
    fn test_custom_collider_emits_event_without_response() {
        let mut world = hecs::World::new();
        let mut collisions = world_with_quadtree();

        let mover = world.spawn((
            Position(Vec2::new(0.0, 0.0)),
            Velocity(Vec2::new(10.0, 0.0)),
            Collider::new(Vec2::new(10.0, 10.0), ColliderKind::Solid),
        ));
        let pickup = world.spawn((
            Position(Vec2::new(15.0, 0.0)),
            Collider::new(Vec2::new(10.0, 10.0), ColliderKind::Custom),
        ));

        collisions.update(&mut world, 1.0);

        let events = collisions.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].entity, mover);
        assert_eq!(events[0].other, pickup);

        // No velocity correction against a Custom collider.
        let velocity = world.get::<&Velocity>(mover).unwrap();
        assert_relative_eq!(velocity.0.x, 10.0);
    }

    #[test]
    fn test_one_way_platform_passable_from_below() {
        let mut world = hecs::World::new();
        let mut collisions = world_with_quadtree();

        // Jumping up through a SolidFromTop platform.
        let jumper = world.spawn((
            Position(Vec2::new(0.0, 30.0)),
            Velocity(Vec2::new(0.0, -40.0)),
            Collider::new(Vec2::new(10.0, 10.0), ColliderKind::SolidFromTop),
        ));
        world.spawn((
            Position(Vec2::new(-20.0, 15.0)),
            Collider::new(Vec2::new(50.0, 5.0), ColliderKind::SolidFromTop),
        ));

        collisions.update(&mut world, 1.0);

        {
            let velocity = world.get::<&Velocity>(jumper).unwrap();
            assert_relative_eq!(velocity.0.y, -40.0);
        }

        // Falling back down, the same platform blocks.
        world.get::<&mut Velocity>(jumper).unwrap().0 = Vec2::new(0.0, 40.0);
        world.get::<&mut Position>(jumper).unwrap().0 = Vec2::new(0.0, -10.0);
        collisions.update(&mut world, 1.0);

        let collider = world.get::<&Collider>(jumper).unwrap();
        assert!(collider.south);
        assert!(world.get::<&Velocity>(jumper).unwrap().0.y < 40.0);
    }

    #[test]
    fn test_bounce_collider_reflects_velocity() {
        let mut world = hecs::World::new();
        let mut collisions = world_with_quadtree();

        let ball = world.spawn((
            Position(Vec2::new(0.0, 0.0)),
            Velocity(Vec2::new(10.0, 0.0)),
            Collider::new(Vec2::new(10.0, 10.0), ColliderKind::Solid),
        ));
        world.spawn((
            Position(Vec2::new(15.0, 0.0)),
            Collider::new(Vec2::new(10.0, 10.0), ColliderKind::Bounce),
        ));

        collisions.update(&mut world, 1.0);

        let velocity = world.get::<&Velocity>(ball).unwrap();
        assert_relative_eq!(velocity.0.x, -10.0);
    }

    #[test]
    fn test_grid_backed_world_matches_quadtree_outcome() {
        for mut collisions in [
            world_with_quadtree(),
            CollisionWorld::with_grid(16.0).unwrap(),
        ] {
            let mut world = hecs::World::new();
            let mover = world.spawn((
                Position(Vec2::new(0.0, 0.0)),
                Velocity(Vec2::new(10.0, 0.0)),
                Collider::new(Vec2::new(10.0, 10.0), ColliderKind::Solid),
            ));
            spawn_static(&mut world, 15.0, 0.0, 10.0, 10.0);

            collisions.update(&mut world, 1.0);

            let velocity = world.get::<&Velocity>(mover).unwrap();
            assert_relative_eq!(velocity.0.x, 5.0);
            assert!(world.get::<&Collider>(mover).unwrap().east);
        }
    }

    #[test]
    fn test_entities_without_collider_are_ignored() {
        let mut world = hecs::World::new();
        let mut collisions = world_with_quadtree();

        world.spawn((Position(Vec2::ZERO), Velocity(Vec2::new(5.0, 5.0))));
        spawn_static(&mut world, 0.0, 0.0, 10.0, 10.0);

        // Must not panic or produce events.
        collisions.update(&mut world, 1.0);
        assert!(collisions.events().is_empty());
    }

    #[test]
    fn test_fast_mover_does_not_tunnel_across_quadrants() {
        let mut world = hecs::World::new();
        let mut collisions =
            CollisionWorld::with_quadtree(Rect::from_xywh(0.0, 0.0, 100.0, 100.0)).unwrap();

        // The mover crosses the whole left half in one frame; the wall sits
        // in a different quadrant than the mover's starting rect.
        let mover = world.spawn((
            Position(Vec2::new(0.0, 0.0)),
            Velocity(Vec2::new(80.0, 0.0)),
            Collider::new(Vec2::new(10.0, 10.0), ColliderKind::Solid),
        ));
        spawn_static(&mut world, 60.0, 0.0, 10.0, 10.0);
        // A third body forces the root to split, separating mover and wall.
        spawn_static(&mut world, 10.0, 60.0, 10.0, 10.0);

        collisions.update(&mut world, 1.0);

        // Contact at toi 0.625; querying only the starting rect would miss
        // the wall entirely and leave the velocity uncorrected.
        let collider = world.get::<&Collider>(mover).unwrap();
        assert!(collider.east);

        let velocity = world.get::<&Velocity>(mover).unwrap();
        assert_relative_eq!(velocity.0.x, 50.0);
    }

    #[test]
    fn test_mover_without_position_is_not_resolved() {
        let mut world = hecs::World::new();
        let mut collisions = world_with_quadtree();

        // Collider and Velocity but no Position: never indexed by the
        // rebuild phase, so it must not be resolved either.
        let ghost = world.spawn((
            Velocity(Vec2::new(10.0, 0.0)),
            Collider::new(Vec2::new(10.0, 10.0), ColliderKind::Solid),
        ));
        spawn_static(&mut world, 15.0, 0.0, 10.0, 10.0);

        collisions.update(&mut world, 1.0);

        let velocity = world.get::<&Velocity>(ghost).unwrap();
        assert_relative_eq!(velocity.0.x, 10.0);
        assert!(!world.get::<&Collider>(ghost).unwrap().touching());
    }
}

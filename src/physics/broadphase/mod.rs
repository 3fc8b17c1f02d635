//! Broadphase candidate filtering.
//!
//! Two interchangeable strategies answer "which boxes might collide with this
//! box": a recursively subdividing [`QuadTree`] and a uniform
//! [`SpatialHashGrid`]. Both are rebuilt every frame by the collision
//! pipeline; that is a deliberate simplicity tradeoff for scenes of tens to
//! low hundreds of entities.

pub mod grid;
pub mod quadtree;

use std::hash::Hash;

use thiserror::Error;

use super::collider::{Aabb, Rect};

pub use grid::SpatialHashGrid;
pub use quadtree::QuadTree;

/// Broadphase construction errors.
#[derive(Debug, Error, PartialEq)]
pub enum BroadPhaseError {
    #[error("grid cell size must be positive, got {0}")]
    InvalidCellSize(f32),
    #[error("quadtree bounds must have a positive area")]
    DegenerateBounds,
}

/// A spatial index over `(key, box)` pairs.
///
/// `K` identifies the owner of each box (the collision pipeline uses
/// `hecs::Entity`). Queries must return a superset of every inserted box that
/// truly overlaps the query rectangle; false positives are acceptable, false
/// negatives are not.
pub trait BroadPhase<K: Copy + Eq + Hash> {
    /// Drop every stored box.
    fn clear(&mut self);

    /// Index `aabb` under `key`.
    fn insert(&mut self, key: K, aabb: Aabb);

    /// Forget `key`. Structures that are rebuilt from scratch every frame may
    /// leave this a no-op.
    fn remove(&mut self, _key: K) {}

    /// Append all candidates that might overlap `rect` to `out`. The caller
    /// is responsible for skipping its own key.
    fn query(&self, rect: &Rect, out: &mut Vec<(K, Aabb)>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collider::ColliderKind;
    use crate::physics::narrowphase::rect_vs_rect;

    fn boxes() -> Vec<(u32, Aabb)> {
        let rects = [
            Rect::from_xywh(5.0, 5.0, 10.0, 10.0),
            Rect::from_xywh(80.0, 10.0, 15.0, 8.0),
            Rect::from_xywh(40.0, 40.0, 30.0, 30.0),
            Rect::from_xywh(12.0, 70.0, 6.0, 6.0),
            Rect::from_xywh(49.0, 49.0, 2.0, 2.0),
            Rect::from_xywh(0.0, 0.0, 100.0, 4.0),
            Rect::from_xywh(90.0, 90.0, 10.0, 10.0),
            Rect::from_xywh(33.0, 21.0, 5.0, 40.0),
        ];
        rects
            .iter()
            .enumerate()
            .map(|(i, r)| (i as u32, Aabb::new(*r, ColliderKind::Solid)))
            .collect()
    }

    fn assert_no_false_negatives<B: BroadPhase<u32>>(index: &B, inserted: &[(u32, Aabb)]) {
        let queries = [
            Rect::from_xywh(0.0, 0.0, 20.0, 20.0),
            Rect::from_xywh(45.0, 45.0, 10.0, 10.0),
            Rect::from_xywh(30.0, 0.0, 10.0, 100.0),
            Rect::from_xywh(99.0, 99.0, 5.0, 5.0),
            Rect::from_xywh(-10.0, -10.0, 5.0, 5.0),
        ];

        for query in &queries {
            let mut candidates = Vec::new();
            index.query(query, &mut candidates);

            for (key, aabb) in inserted {
                if rect_vs_rect(&aabb.rect, query) {
                    assert!(
                        candidates.iter().any(|(k, _)| k == key),
                        "box {key} overlaps {query:?} but was not returned"
                    );
                }
            }
        }
    }

    #[test]
    fn test_quadtree_soundness() {
        let mut tree = QuadTree::new(Rect::from_xywh(0.0, 0.0, 100.0, 100.0)).unwrap();
        let inserted = boxes();
        for (key, aabb) in &inserted {
            tree.insert(*key, *aabb);
        }
        assert_no_false_negatives(&tree, &inserted);
    }

    #[test]
    fn test_grid_soundness() {
        let mut grid = SpatialHashGrid::new(16.0).unwrap();
        let inserted = boxes();
        for (key, aabb) in &inserted {
            BroadPhase::insert(&mut grid, *key, *aabb);
        }
        assert_no_false_negatives(&grid, &inserted);
    }

    #[test]
    fn test_both_strategies_agree_after_clear() {
        let mut tree = QuadTree::new(Rect::from_xywh(0.0, 0.0, 100.0, 100.0)).unwrap();
        let mut grid = SpatialHashGrid::new(16.0).unwrap();
        for (key, aabb) in boxes() {
            tree.insert(key, aabb);
            BroadPhase::insert(&mut grid, key, aabb);
        }

        tree.clear();
        grid.clear();

        let query = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let mut out = Vec::new();
        tree.query(&query, &mut out);
        assert!(out.is_empty());
        grid.query(&query, &mut out);
        assert!(out.is_empty());
    }
}

//! Recursive spatial subdivision over axis-aligned boxes.

use std::hash::Hash;

use crate::physics::collider::{Aabb, Rect};

use super::{BroadPhase, BroadPhaseError};

/// Objects a node holds before it subdivides.
pub const DEFAULT_MAX_OBJECTS: usize = 2;
/// Maximum subdivision depth.
pub const DEFAULT_MAX_LEVELS: u32 = 5;

/// A quadtree node. The root is rebuilt every frame via [`QuadTree::clear`]
/// and re-insertion; nodes have no cross-frame identity.
///
/// A node is either a leaf (no children) or split into exactly four equal
/// quadrants, numbered 0 = top-left, 1 = top-right, 2 = bottom-right,
/// 3 = bottom-left. Objects that straddle a child boundary stay in the node
/// that could not push them down.
#[derive(Debug)]
pub struct QuadTree<K> {
    bounds: Rect,
    level: u32,
    max_objects: usize,
    max_levels: u32,
    objects: Vec<(K, Aabb)>,
    children: Option<Box<[QuadTree<K>; 4]>>,
}

impl<K: Copy + Eq + Hash> QuadTree<K> {
    /// Create a root node with the default subdivision limits.
    pub fn new(bounds: Rect) -> Result<Self, BroadPhaseError> {
        Self::with_limits(bounds, DEFAULT_MAX_OBJECTS, DEFAULT_MAX_LEVELS)
    }

    /// Create a root node with explicit subdivision limits.
    pub fn with_limits(
        bounds: Rect,
        max_objects: usize,
        max_levels: u32,
    ) -> Result<Self, BroadPhaseError> {
        if bounds.size.x <= 0.0 || bounds.size.y <= 0.0 {
            return Err(BroadPhaseError::DegenerateBounds);
        }
        Ok(Self::node(bounds, 0, max_objects, max_levels))
    }

    fn node(bounds: Rect, level: u32, max_objects: usize, max_levels: u32) -> Self {
        Self {
            bounds,
            level,
            max_objects,
            max_levels,
            objects: Vec::new(),
            children: None,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Total number of objects stored in this node and its subtree.
    pub fn len(&self) -> usize {
        let mut count = self.objects.len();
        if let Some(children) = &self.children {
            for child in children.iter() {
                count += child.len();
            }
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index a box under `key`.
    ///
    /// Delegates to the single containing child when split; otherwise the box
    /// is kept here. Once the node's own list exceeds its object limit and
    /// depth allows, the node splits and redistributes whatever fits cleanly
    /// into one quadrant.
    pub fn insert(&mut self, key: K, aabb: Aabb) {
        if self.children.is_some() {
            if let Some(i) = Self::quadrant_index(&self.bounds, &aabb.rect) {
                if let Some(children) = self.children.as_mut() {
                    children[i].insert(key, aabb);
                    return;
                }
            }
        }

        self.objects.push((key, aabb));

        if self.objects.len() > self.max_objects && self.level < self.max_levels {
            if self.children.is_none() {
                self.split();
            }

            let bounds = self.bounds;
            if let Some(children) = self.children.as_mut() {
                let mut kept = Vec::new();
                for (k, obj) in self.objects.drain(..) {
                    match Self::quadrant_index(&bounds, &obj.rect) {
                        Some(i) => children[i].insert(k, obj),
                        None => kept.push((k, obj)),
                    }
                }
                self.objects = kept;
            }
        }
    }

    /// Recursively empty the tree, dropping all children. Full-rebuild
    /// semantics: there is no incremental update.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.children = None;
    }

    /// Append every object that might overlap `rect` to `out`: this node's
    /// own objects plus the contents of every overlapping child. Returns a
    /// superset of the true overlaps, never misses one.
    pub fn retrieve(&self, rect: &Rect, out: &mut Vec<(K, Aabb)>) {
        out.extend(self.objects.iter().copied());

        if let Some(children) = &self.children {
            for child in children.iter() {
                if overlaps_inclusive(&child.bounds, rect) {
                    child.retrieve(rect, out);
                }
            }
        }
    }

    /// The quadrant fully containing `rect`, or `None` for straddlers.
    fn quadrant_index(bounds: &Rect, rect: &Rect) -> Option<usize> {
        (0..4).find(|&i| Self::child_bounds(bounds, i).contains_rect(rect))
    }

    fn child_bounds(bounds: &Rect, index: usize) -> Rect {
        let half = bounds.size * 0.5;
        let offset = match index {
            0 => glam::Vec2::ZERO,
            1 => glam::Vec2::new(half.x, 0.0),
            2 => half,
            _ => glam::Vec2::new(0.0, half.y),
        };
        Rect::new(bounds.pos + offset, half)
    }

    fn split(&mut self) {
        let children = Box::new([
            Self::node(
                Self::child_bounds(&self.bounds, 0),
                self.level + 1,
                self.max_objects,
                self.max_levels,
            ),
            Self::node(
                Self::child_bounds(&self.bounds, 1),
                self.level + 1,
                self.max_objects,
                self.max_levels,
            ),
            Self::node(
                Self::child_bounds(&self.bounds, 2),
                self.level + 1,
                self.max_objects,
                self.max_levels,
            ),
            Self::node(
                Self::child_bounds(&self.bounds, 3),
                self.level + 1,
                self.max_objects,
                self.max_levels,
            ),
        ]);
        self.children = Some(children);
    }
}

/// Closed-interval overlap used for pruning child recursion; erring on the
/// inclusive side keeps queries free of false negatives at shared edges.
fn overlaps_inclusive(a: &Rect, b: &Rect) -> bool {
    a.min_x() <= b.max_x()
        && a.max_x() >= b.min_x()
        && a.min_y() <= b.max_y()
        && a.max_y() >= b.min_y()
}

impl<K: Copy + Eq + Hash> BroadPhase<K> for QuadTree<K> {
    fn clear(&mut self) {
        QuadTree::clear(self);
    }

    fn insert(&mut self, key: K, aabb: Aabb) {
        QuadTree::insert(self, key, aabb);
    }

    fn query(&self, rect: &Rect, out: &mut Vec<(K, Aabb)>) {
        self.retrieve(rect, out);
    }
}

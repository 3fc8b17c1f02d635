//! Uniform-grid spatial hashing over axis-aligned boxes.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::physics::collider::{Aabb, Rect};

use super::{BroadPhase, BroadPhaseError};

/// The inclusive range of grid cells a box covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    min: (i32, i32),
    max: (i32, i32),
}

impl CellRange {
    fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (self.min.0..=self.max.0)
            .flat_map(move |i| (self.min.1..=self.max.1).map(move |j| (i, j)))
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    range: CellRange,
    aabb: Aabb,
}

/// A spatial hash grid bucketing boxes into uniform square cells.
///
/// Every box is appended to the bucket of each cell it covers, and the
/// covered range is recorded per key so [`SpatialHashGrid::remove`] can undo
/// the insertion. A key whose box moved must be removed before it is
/// re-inserted; the grid does not diff positions on its own.
#[derive(Debug)]
pub struct SpatialHashGrid<K> {
    cell_size: f32,
    grid: HashMap<(i32, i32), Vec<K>>,
    entries: HashMap<K, Entry>,
}

impl<K: Copy + Eq + Hash> SpatialHashGrid<K> {
    /// Create a grid with square cells of the given size.
    pub fn new(cell_size: f32) -> Result<Self, BroadPhaseError> {
        if !(cell_size > 0.0) {
            return Err(BroadPhaseError::InvalidCellSize(cell_size));
        }
        Ok(Self {
            cell_size,
            grid: HashMap::new(),
            entries: HashMap::new(),
        })
    }

    /// Map a world position to integer cell coordinates.
    pub fn hash(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    fn cell_range(&self, rect: &Rect) -> CellRange {
        CellRange {
            min: self.hash(rect.min_x(), rect.min_y()),
            max: self.hash(rect.max_x(), rect.max_y()),
        }
    }

    /// Number of keys currently indexed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every stored box.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.entries.clear();
    }

    /// Index `aabb` under `key`, appending the key to every covered cell's
    /// bucket and recording the range for later removal.
    pub fn insert(&mut self, key: K, aabb: Aabb) {
        let range = self.cell_range(&aabb.rect);
        self.entries.insert(key, Entry { range, aabb });

        for cell in range.cells() {
            self.grid.entry(cell).or_default().push(key);
        }
    }

    /// Remove `key` from every bucket it was inserted into. Unknown keys are
    /// a no-op.
    pub fn remove(&mut self, key: K) {
        let Some(entry) = self.entries.remove(&key) else {
            return;
        };

        for cell in entry.range.cells() {
            if let Some(bucket) = self.grid.get_mut(&cell) {
                bucket.retain(|k| *k != key);
            }
        }
    }

    /// Candidates whose boxes share a cell with `rect`, de-duplicated (a box
    /// spanning several shared cells is returned once), excluding `key`
    /// itself.
    pub fn possible_collisions(&self, key: K, rect: &Rect) -> Vec<(K, Aabb)> {
        let mut out = Vec::new();
        self.query_into(rect, Some(key), &mut out);
        out
    }

    fn query_into(&self, rect: &Rect, exclude: Option<K>, out: &mut Vec<(K, Aabb)>) {
        let range = self.cell_range(rect);
        let mut seen = HashSet::new();

        for cell in range.cells() {
            let Some(bucket) = self.grid.get(&cell) else {
                continue;
            };
            for &k in bucket {
                if exclude == Some(k) || !seen.insert(k) {
                    continue;
                }
                if let Some(entry) = self.entries.get(&k) {
                    out.push((k, entry.aabb));
                }
            }
        }
    }
}

impl<K: Copy + Eq + Hash> BroadPhase<K> for SpatialHashGrid<K> {
    fn clear(&mut self) {
        SpatialHashGrid::clear(self);
    }

    fn insert(&mut self, key: K, aabb: Aabb) {
        SpatialHashGrid::insert(self, key, aabb);
    }

    fn remove(&mut self, key: K) {
        SpatialHashGrid::remove(self, key);
    }

    fn query(&self, rect: &Rect, out: &mut Vec<(K, Aabb)>) {
        self.query_into(rect, None, out);
    }
}

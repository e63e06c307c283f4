//! Sector grid: partitions active entities into per-cell object lists for
//! proximity queries. Every active entity sits in exactly one bucket, keyed
//! by its quantized position; out-of-bounds positions clamp to the nearest
//! edge cell so a lookup can never fail.

use glam::IVec2;

use crate::list::ObjList;
use crate::obj::ObjId;

/// Default sector cell edge in world units.
pub const DEFAULT_CELL: i32 = 50;

#[derive(Debug)]
pub struct SectorGrid {
    cell: i32,
    cols: i32,
    rows: i32,
    bounds: IVec2,
    buckets: Vec<ObjList>,
}

impl Default for SectorGrid {
    fn default() -> Self {
        let mut g = Self {
            cell: DEFAULT_CELL,
            cols: 0,
            rows: 0,
            bounds: IVec2::ZERO,
            buckets: Vec::new(),
        };
        g.init(DEFAULT_CELL, DEFAULT_CELL, DEFAULT_CELL);
        g
    }
}

impl SectorGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)compute grid dimensions from the playfield bounds, discarding any
    /// prior bucket contents. Must run before bucket operations; callers that
    /// still hold members re-insert them afterwards.
    pub fn init(&mut self, width: i32, height: i32, cell: i32) {
        debug_assert!(width > 0 && height > 0 && cell > 0);
        self.cell = cell.max(1);
        self.bounds = IVec2::new(width.max(1), height.max(1));
        self.cols = (self.bounds.x + self.cell - 1) / self.cell;
        self.rows = (self.bounds.y + self.cell - 1) / self.cell;
        self.buckets.clear();
        self.buckets
            .resize_with((self.cols * self.rows) as usize, ObjList::new);
        log::debug!(
            "sector grid init: {}x{} cells of {} units",
            self.cols,
            self.rows,
            self.cell
        );
    }

    #[inline]
    pub fn cell(&self) -> i32 {
        self.cell
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Pure map from a world point to its bucket index, clamped to the valid
    /// range for out-of-bounds coordinates.
    #[inline]
    pub fn bucket_for(&self, p: IVec2) -> usize {
        let x = p.x.clamp(0, self.bounds.x - 1);
        let y = p.y.clamp(0, self.bounds.y - 1);
        ((y / self.cell) * self.cols + (x / self.cell)) as usize
    }

    pub fn insert(&mut self, id: ObjId, pos: IVec2) {
        let b = self.bucket_for(pos);
        self.buckets[b].push_back(id);
    }

    pub fn remove(&mut self, id: ObjId, pos: IVec2) -> bool {
        let b = self.bucket_for(pos);
        self.buckets[b].remove(id)
    }

    /// Re-bucket after a position change. Returns whether the bucket changed;
    /// order relative to other members is defined only within the new bucket.
    pub fn rebucket(&mut self, id: ObjId, old: IVec2, new: IVec2) -> bool {
        let from = self.bucket_for(old);
        let to = self.bucket_for(new);
        if from == to {
            return false;
        }
        let removed = self.buckets[from].remove(id);
        debug_assert!(removed, "rebucket of object {id:?} missing from old bucket");
        self.buckets[to].push_back(id);
        true
    }

    /// The bucket covering a world point.
    pub fn list_at(&self, p: IVec2) -> &ObjList {
        &self.buckets[self.bucket_for(p)]
    }

    /// Bucket indices of the 3x3 neighborhood around `p`, deduplicated at the
    /// playfield edge, in row-major order. Shapes never exceed one cell, so
    /// anything covering `p` lives in one of these.
    pub fn neighborhood(&self, p: IVec2) -> Vec<usize> {
        let mut out = Vec::with_capacity(9);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let b = self.bucket_for(p + IVec2::new(dx * self.cell, dy * self.cell));
                if !out.contains(&b) {
                    out.push(b);
                }
            }
        }
        out
    }

    pub fn bucket(&self, index: usize) -> &ObjList {
        &self.buckets[index]
    }

    /// Every member of every bucket, in bucket-index then list order.
    pub fn all_members(&self) -> Vec<ObjId> {
        self.buckets.iter().flat_map(ObjList::iter).collect()
    }

    /// Empty all buckets without touching the grid dimensions.
    pub fn clear_buckets(&mut self) {
        for b in &mut self.buckets {
            b.clear();
        }
    }
}

//! Entity types: stable numbering, category bits, shape and status.

use glam::IVec2;
use prop_core::StoreHandle;

/// Stable object number. Assigned once at creation, never reused while any
/// serialized or scripted reference may still name it. `0` is never valid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjId(pub u32);

/// Category bits. The low bits form the master-list sort band: the list is
/// kept grouped by descending band, so foreground categories scan first.
pub mod category {
    pub const STATIC_BACK: u32 = 1 << 0;
    pub const STRUCTURE: u32 = 1 << 1;
    pub const VEHICLE: u32 = 1 << 2;
    pub const ITEM: u32 = 1 << 3;
    pub const LIVING: u32 = 1 << 4;
    pub const FOREGROUND: u32 = 1 << 5;
    /// Bits that participate in master-list grouping.
    pub const SORT_MASK: u32 = 0x3F;
}

/// Object collision flags, matched against query masks in point finds.
pub mod ocf {
    pub const SOLID: u32 = 1 << 0;
    pub const ALIVE: u32 = 1 << 1;
    pub const COLLECTIBLE: u32 = 1 << 2;
    pub const INTERACTIVE: u32 = 1 << 3;
    pub const ALL: u32 = u32::MAX;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// In the master list and a sector bucket; visible to all queries.
    Active,
    /// Parked in the inactive side list; invisible to spatial queries.
    Inactive,
}

/// Collision rect relative to the object position (offset is usually
/// negative: the shape extends around the center).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Shape {
    pub off: IVec2,
    pub size: IVec2,
}

impl Shape {
    pub const fn new(off: IVec2, size: IVec2) -> Self {
        Self { off, size }
    }

    /// Does the shape cover `rel` (a point relative to the object position)?
    #[inline]
    pub fn contains(&self, rel: IVec2) -> bool {
        rel.x >= self.off.x
            && rel.y >= self.off.y
            && rel.x < self.off.x + self.size.x
            && rel.y < self.off.y + self.size.y
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            off: IVec2::new(-4, -4),
            size: IVec2::new(8, 8),
        }
    }
}

#[derive(Debug)]
pub struct Obj {
    pub id: ObjId,
    pub category: u32,
    /// World position. Mutate only through `Registry::update_position` so
    /// the sector grid stays consistent.
    pub pos: IVec2,
    pub shape: Shape,
    pub ocf: u32,
    pub status: Status,
    /// Scratch mark for multi-bucket sweeps; owned by the registry's marker
    /// counter.
    pub marker: u32,
    pub props: StoreHandle,
}

impl Obj {
    #[inline]
    pub fn sort_band(&self) -> u32 {
        self.category & category::SORT_MASK
    }

    /// Does the object's shape cover the world point `p`?
    #[inline]
    pub fn at_point(&self, p: IVec2) -> bool {
        self.shape.contains(p - self.pos)
    }
}

/// Spawn-time parameters; everything else the registry assigns itself.
#[derive(Copy, Clone, Debug)]
pub struct ObjInit {
    pub category: u32,
    pub pos: IVec2,
    pub shape: Shape,
    pub ocf: u32,
    pub status: Status,
}

impl Default for ObjInit {
    fn default() -> Self {
        Self {
            category: category::ITEM,
            pos: IVec2::ZERO,
            shape: Shape::default(),
            ocf: 0,
            status: Status::Active,
        }
    }
}

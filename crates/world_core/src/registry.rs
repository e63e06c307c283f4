//! The authoritative object registry: the only place entities are created,
//! found by number, and removed. Owns the master ordered list, the sector
//! grid, the inactive side list, the deferred resort queue, the per-entity
//! property stores and the marker counter.
//!
//! Determinism contract: replicas that execute the same operation sequence
//! hold bit-identical list state. Every ordering decision below reads the
//! link structure, never hash-map iteration order.

use std::collections::HashMap;

use glam::IVec2;
use prop_core::{PropArena, StoreHandle};

use crate::config::WorldCfg;
use crate::error::RegistryError;
use crate::list::ObjList;
use crate::obj::{Obj, ObjId, ObjInit, Status};
use crate::resort::{OrderFn, Place, ResortQueue, ResortRequest};
use crate::sector::{DEFAULT_CELL, SectorGrid};

pub struct Registry {
    objs: HashMap<ObjId, Obj>,
    master: ObjList,
    inactive: ObjList,
    sectors: SectorGrid,
    resorts: ResortQueue,
    props: PropArena,
    next_number: u32,
    last_marker: u32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Object numbering starts at 1; `0` is never assigned.
    pub fn new() -> Self {
        Self {
            objs: HashMap::new(),
            master: ObjList::new(),
            inactive: ObjList::new(),
            sectors: SectorGrid::new(),
            resorts: ResortQueue::new(),
            props: PropArena::new(),
            next_number: 1,
            last_marker: 0,
        }
    }

    /// Registry with an initialized sector grid over the given bounds.
    pub fn with_bounds(width: i32, height: i32) -> Self {
        let mut r = Self::new();
        r.init(width, height);
        r
    }

    pub fn init(&mut self, width: i32, height: i32) {
        self.init_with_cell(width, height, DEFAULT_CELL);
    }

    pub fn init_from_cfg(&mut self, cfg: &WorldCfg) {
        self.init_with_cell(cfg.width, cfg.height, cfg.sector_cell);
    }

    /// (Re)compute the sector grid and re-bucket every active object.
    pub fn init_with_cell(&mut self, width: i32, height: i32, cell: i32) {
        self.sectors.init(width, height, cell);
        let active: Vec<(ObjId, IVec2)> = self
            .master
            .iter()
            .filter_map(|id| self.objs.get(&id).map(|o| (id, o.pos)))
            .collect();
        for (id, pos) in active {
            self.sectors.insert(id, pos);
        }
    }

    // ------------------------------------------------------------------
    // Creation / removal
    // ------------------------------------------------------------------

    /// Create an entity under the next free object number.
    pub fn spawn(&mut self, init: ObjInit) -> ObjId {
        let id = ObjId(self.next_number);
        self.next_number += 1;
        self.insert_new(id, init, true);
        id
    }

    /// Register an entity under an explicit number (the load path). Fails if
    /// the number is taken or invalid; the registry is left untouched then.
    pub fn add(&mut self, number: ObjId, init: ObjInit) -> Result<ObjId, RegistryError> {
        self.add_inner(number, init, true)
    }

    /// Load-path insertion: appends to the master list instead of sorting
    /// into the category band, so stored order survives until `fix_order`.
    pub(crate) fn add_appended(
        &mut self,
        number: ObjId,
        init: ObjInit,
    ) -> Result<ObjId, RegistryError> {
        self.add_inner(number, init, false)
    }

    fn add_inner(
        &mut self,
        number: ObjId,
        init: ObjInit,
        sorted: bool,
    ) -> Result<ObjId, RegistryError> {
        if number.0 == 0 {
            log::warn!("add: object number 0 is reserved");
            return Err(RegistryError::InvalidNumber(number));
        }
        if self.objs.contains_key(&number) {
            log::warn!("add: object {number:?} is already registered");
            return Err(RegistryError::AlreadyRegistered(number));
        }
        self.next_number = self.next_number.max(number.0 + 1);
        self.insert_new(number, init, sorted);
        Ok(number)
    }

    fn insert_new(&mut self, id: ObjId, init: ObjInit, sorted: bool) {
        let props = self.props.alloc();
        let obj = Obj {
            id,
            category: init.category,
            pos: init.pos,
            shape: init.shape,
            ocf: init.ocf,
            status: init.status,
            marker: 0,
            props,
        };
        self.objs.insert(id, obj);
        self.enlist(id, sorted);
        log::debug!("registered object {:?} (category {:#x})", id, init.category);
    }

    fn enlist(&mut self, id: ObjId, sorted: bool) {
        let (status, pos) = {
            let o = &self.objs[&id];
            (o.status, o.pos)
        };
        match status {
            Status::Active => {
                if sorted {
                    self.master_insert(id);
                } else {
                    self.master.push_back(id);
                }
                self.sectors.insert(id, pos);
            }
            Status::Inactive => {
                self.inactive.push_back(id);
            }
        }
    }

    /// Insert at the front of the object's category band: the master list is
    /// grouped by descending sort band and newer objects go in front of
    /// older ones of the same band.
    fn master_insert(&mut self, id: ObjId) {
        let band = self.objs[&id].sort_band();
        let objs = &self.objs;
        let anchor = self
            .master
            .iter()
            .find(|m| objs.get(m).map_or(0, Obj::sort_band) <= band);
        match anchor {
            Some(a) => self.master.insert_before(id, a),
            None => self.master.push_back(id),
        };
    }

    /// Detach the entity from every index and release its property store.
    /// Idempotent: removing an already-removed object is a no-op, so removal
    /// is safe mid-iteration over a collected id list.
    pub fn remove(&mut self, id: ObjId) -> bool {
        let Some(obj) = self.objs.remove(&id) else {
            log::debug!("remove: object {id:?} already gone");
            return false;
        };
        self.master.remove(id);
        self.inactive.remove(id);
        if obj.status == Status::Active {
            self.sectors.remove(id, obj.pos);
        }
        self.props.remove(obj.props);
        log::debug!("removed object {id:?}");
        true
    }

    /// Remove every active object; with `clear_inactive`, the side list too.
    /// Object numbers are not reset — they are never reused.
    pub fn clear(&mut self, clear_inactive: bool) {
        let mut doomed = self.master.to_vec();
        if clear_inactive {
            doomed.extend(self.inactive.iter());
        }
        for id in doomed {
            self.remove(id);
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Live entity by stable number; `None` once removed.
    #[inline]
    pub fn get(&self, id: ObjId) -> Option<&Obj> {
        self.objs.get(&id)
    }

    /// Mutable access for script-side fields (category, ocf, props). Position
    /// changes must go through [`Registry::update_position`].
    #[inline]
    pub fn get_mut(&mut self, id: ObjId) -> Option<&mut Obj> {
        self.objs.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: ObjId) -> bool {
        self.objs.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objs.is_empty()
    }

    /// The sector bucket covering a map position.
    pub fn objects_at(&self, p: IVec2) -> &ObjList {
        self.sectors.list_at(p)
    }

    /// First entity (in deterministic bucket-scan order) whose collision
    /// flags intersect `mask` and whose shape covers the point, skipping
    /// `exclude`. Inactive objects are never bucketed, so never found.
    pub fn find_at_point(&self, p: IVec2, mask: u32, exclude: Option<ObjId>) -> Option<ObjId> {
        for bucket in self.sectors.neighborhood(p) {
            for id in self.sectors.bucket(bucket).iter() {
                if Some(id) == exclude {
                    continue;
                }
                let Some(obj) = self.objs.get(&id) else {
                    continue;
                };
                if obj.ocf & mask != 0 && obj.at_point(p) {
                    return Some(id);
                }
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Position / status updates
    // ------------------------------------------------------------------

    /// Required after any coordinate change; re-buckets into the correct
    /// sector while preserving the entity's master-list position.
    pub fn update_position(&mut self, id: ObjId, new: IVec2) -> bool {
        let Some(obj) = self.objs.get_mut(&id) else {
            return false;
        };
        let old = obj.pos;
        obj.pos = new;
        if obj.status == Status::Active && old != new {
            self.sectors.rebucket(id, old, new);
        }
        true
    }

    /// Move an inactive object back into the master list and sector grid.
    pub fn activate(&mut self, id: ObjId) -> bool {
        let Some(obj) = self.objs.get_mut(&id) else {
            return false;
        };
        if obj.status == Status::Active {
            return false;
        }
        obj.status = Status::Active;
        self.inactive.remove(id);
        self.enlist(id, true);
        true
    }

    /// Park an active object in the inactive side list, invisible to all
    /// spatial queries.
    pub fn deactivate(&mut self, id: ObjId) -> bool {
        let Some(obj) = self.objs.get_mut(&id) else {
            return false;
        };
        if obj.status == Status::Inactive {
            return false;
        }
        obj.status = Status::Inactive;
        let pos = obj.pos;
        self.master.remove(id);
        self.sectors.remove(id, pos);
        self.inactive.push_back(id);
        true
    }

    // ------------------------------------------------------------------
    // Ordering
    // ------------------------------------------------------------------

    /// Move `a` immediately before `b`. Both must be live members of the
    /// same list (master or inactive).
    pub fn order_before(&mut self, a: ObjId, b: ObjId) -> Result<(), RegistryError> {
        self.order(a, b, Place::Before)
    }

    /// Move `a` immediately after `b`.
    pub fn order_after(&mut self, a: ObjId, b: ObjId) -> Result<(), RegistryError> {
        self.order(a, b, Place::After)
    }

    fn order(&mut self, a: ObjId, b: ObjId, place: Place) -> Result<(), RegistryError> {
        let list = if self.master.contains(a) && self.master.contains(b) {
            &mut self.master
        } else if self.inactive.contains(a) && self.inactive.contains(b) {
            &mut self.inactive
        } else {
            if !self.objs.contains_key(&a) {
                return Err(RegistryError::NotAMember(a));
            }
            if !self.objs.contains_key(&b) {
                return Err(RegistryError::NotAMember(b));
            }
            log::warn!("order: {a:?} and {b:?} are not members of the same list");
            return Err(RegistryError::CrossList);
        };
        let ok = match place {
            Place::Before => list.move_before(a, b),
            Place::After => list.move_after(a, b),
        };
        if ok {
            Ok(())
        } else {
            // Both are members of the same list, so the only way the move
            // itself fails is a self-referential request.
            Err(RegistryError::InvalidMove(a, b))
        }
    }

    /// Repair the category-grouping invariant after bulk loading: a stable
    /// re-sort by descending sort band, preserving relative order inside
    /// every band (and therefore any already-consistent run).
    pub fn fix_order(&mut self) {
        let old = self.master.to_vec();
        let objs = &self.objs;
        let mut fixed = old.clone();
        fixed.sort_by_key(|id| std::cmp::Reverse(objs.get(id).map_or(0, Obj::sort_band)));
        if fixed != old {
            log::debug!("fix_order: repairing category grouping of {} objects", fixed.len());
            self.master.permute(&old, &fixed);
        }
    }

    // ------------------------------------------------------------------
    // Scheduled resorts
    // ------------------------------------------------------------------

    /// Queue a stable, comparator-driven resort of every master member whose
    /// category intersects `mask`; applied at the next resort pass.
    pub fn schedule_category_resort(&mut self, mask: u32, order: OrderFn) {
        self.resorts.schedule_category(mask, order);
    }

    /// Queue an explicit before/after placement; applied at the next pass,
    /// silently dropped if either object is removed before then.
    pub fn schedule_move_resort(&mut self, obj: ObjId, anchor: ObjId, place: Place) {
        self.resorts.schedule_move(obj, anchor, place);
    }

    pub fn pending_resorts(&self) -> usize {
        self.resorts.len()
    }

    /// Drain the resort queue once per tick, FIFO. Resorts scheduled while
    /// executing are deferred to the next tick, not interleaved.
    pub fn execute_scheduled_resorts(&mut self) {
        let batch = self.resorts.take_for_tick();
        for req in batch {
            match req {
                ResortRequest::Category { mask, order } => self.resort_category(mask, &order),
                ResortRequest::Move { obj, anchor, place } => self.resort_move(obj, anchor, place),
            }
        }
    }

    /// Gather the in-scope members (they are contiguous when the grouping
    /// invariant holds, but need not be), sort them, and splice the block
    /// back at the first scoped position. Out-of-scope members keep their
    /// relative order.
    fn resort_category(&mut self, mask: u32, order: &OrderFn) {
        let objs = &self.objs;
        let scoped: Vec<ObjId> = self
            .master
            .iter()
            .filter(|id| objs.get(id).is_some_and(|o| o.category & mask != 0))
            .collect();
        if scoped.len() < 2 {
            return;
        }
        let mut sorted = scoped.clone();
        // Stable: members the comparator does not distinguish keep their
        // prior relative order, which network replay depends on.
        sorted.sort_by(|a, b| order(&objs[a], &objs[b]));
        let splice_after = self.master.prev_of(scoped[0]);
        for id in &scoped {
            self.master.remove(*id);
        }
        match splice_after {
            None => {
                for id in sorted.iter().rev() {
                    self.master.push_front(*id);
                }
            }
            Some(prev) => {
                let mut at = prev;
                for id in &sorted {
                    self.master.insert_after(*id, at);
                    at = *id;
                }
            }
        }
    }

    fn resort_move(&mut self, obj: ObjId, anchor: ObjId, place: Place) {
        if !self.master.contains(obj) || !self.master.contains(anchor) {
            log::debug!("dropping move resort: {obj:?}/{anchor:?} no longer sorted members");
            return;
        }
        match place {
            Place::Before => self.master.move_before(obj, anchor),
            Place::After => self.master.move_after(obj, anchor),
        };
    }

    // ------------------------------------------------------------------
    // Synchronization / diagnostics
    // ------------------------------------------------------------------

    /// Recompute derived per-tick state so independent replicas agree:
    /// sector buckets are rebuilt in master-list order and markers reset.
    /// Nothing here reads clocks, addresses, or hash iteration order.
    pub fn synchronize(&mut self) {
        self.sectors.clear_buckets();
        let active: Vec<(ObjId, IVec2)> = self
            .master
            .iter()
            .filter_map(|id| self.objs.get(&id).map(|o| (id, o.pos)))
            .collect();
        for (id, pos) in active {
            self.sectors.insert(id, pos);
        }
        self.last_marker = 0;
        for o in self.objs.values_mut() {
            o.marker = 0;
        }
        let bad = self.cross_check();
        debug_assert_eq!(bad, 0, "synchronize left inconsistent sector state");
    }

    /// Consistency pass over bucket membership: every active master member
    /// must sit in exactly the bucket its position maps to, and every bucket
    /// member must be a live master member seen exactly once. Inconsistencies
    /// are reported, not repaired; returns how many were found.
    pub fn cross_check(&mut self) -> usize {
        let mut bad = 0usize;
        let master = self.master.to_vec();
        for id in &master {
            match self.objs.get(id) {
                Some(o) if o.status != Status::Active => {
                    log::error!("cross-check: inactive object {id:?} in master list");
                    bad += 1;
                }
                Some(o) => {
                    if !self.sectors.list_at(o.pos).contains(*id) {
                        log::error!("cross-check: object {id:?} missing from its sector bucket");
                        bad += 1;
                    }
                }
                None => {
                    log::error!("cross-check: master list references dead object {id:?}");
                    bad += 1;
                }
            }
        }
        let mark = self.next_marker();
        for id in self.sectors.all_members() {
            if !self.master.contains(id) {
                log::error!("cross-check: stale object {id:?} in a sector bucket");
                bad += 1;
                continue;
            }
            let Some(o) = self.objs.get_mut(&id) else {
                continue;
            };
            if o.marker == mark {
                log::error!("cross-check: object {id:?} bucketed more than once");
                bad += 1;
            } else {
                o.marker = mark;
            }
        }
        if bad > 0 {
            log::error!("cross-check found {bad} inconsistencies");
        }
        bad
    }

    /// Fresh marker value for a multi-bucket sweep. On wrap-around every
    /// object's marker is cleared before restarting.
    pub fn next_marker(&mut self) -> u32 {
        if self.last_marker == u32::MAX {
            for o in self.objs.values_mut() {
                o.marker = 0;
            }
            self.last_marker = 0;
        }
        self.last_marker += 1;
        self.last_marker
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The single ordered list of all active entities.
    pub fn master(&self) -> &ObjList {
        &self.master
    }

    pub fn inactive(&self) -> &ObjList {
        &self.inactive
    }

    pub fn sectors(&self) -> &SectorGrid {
        &self.sectors
    }

    pub fn props(&self) -> &PropArena {
        &self.props
    }

    pub fn props_mut(&mut self) -> &mut PropArena {
        &mut self.props
    }

    /// The property store behind a live entity.
    pub fn store_of(&self, id: ObjId) -> Option<StoreHandle> {
        self.objs.get(&id).map(|o| o.props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::category;

    fn active(cat: u32, x: i32, y: i32) -> ObjInit {
        ObjInit {
            category: cat,
            pos: IVec2::new(x, y),
            ..ObjInit::default()
        }
    }

    #[test]
    fn numbers_are_stable_and_never_reused() {
        let mut r = Registry::with_bounds(200, 200);
        let a = r.spawn(active(category::ITEM, 10, 10));
        let b = r.spawn(active(category::ITEM, 20, 20));
        assert_eq!(a, ObjId(1));
        assert_eq!(b, ObjId(2));
        r.remove(a);
        let c = r.spawn(active(category::ITEM, 30, 30));
        assert_eq!(c, ObjId(3));
    }

    #[test]
    fn add_rejects_duplicates_and_zero() {
        let mut r = Registry::with_bounds(200, 200);
        let a = r.spawn(active(category::ITEM, 10, 10));
        assert_eq!(
            r.add(a, active(category::ITEM, 10, 10)),
            Err(RegistryError::AlreadyRegistered(a))
        );
        assert_eq!(
            r.add(ObjId(0), active(category::ITEM, 10, 10)),
            Err(RegistryError::InvalidNumber(ObjId(0)))
        );
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn master_list_groups_by_descending_band() {
        let mut r = Registry::with_bounds(200, 200);
        let back = r.spawn(active(category::STATIC_BACK, 10, 10));
        let living = r.spawn(active(category::LIVING, 10, 10));
        let item = r.spawn(active(category::ITEM, 10, 10));
        let living2 = r.spawn(active(category::LIVING, 10, 10));
        // Descending band; newest of a band in front of older ones.
        assert_eq!(r.master().to_vec(), vec![living2, living, item, back]);
    }

    #[test]
    fn deactivate_hides_from_queries_and_activate_restores() {
        let mut r = Registry::with_bounds(200, 200);
        let a = r.spawn(active(category::LIVING, 10, 10));
        assert!(r.deactivate(a));
        assert!(!r.deactivate(a));
        assert!(r.master().is_empty());
        assert!(r.inactive().contains(a));
        assert!(!r.objects_at(IVec2::new(10, 10)).contains(a));
        assert!(r.activate(a));
        assert!(r.objects_at(IVec2::new(10, 10)).contains(a));
    }

    #[test]
    fn cross_check_is_clean_after_mixed_mutation() {
        let mut r = Registry::with_bounds(300, 300);
        let ids: Vec<ObjId> = (0..12)
            .map(|i| r.spawn(active(category::ITEM, i * 25, i * 20)))
            .collect();
        r.update_position(ids[3], IVec2::new(280, 280));
        r.remove(ids[5]);
        r.deactivate(ids[7]);
        assert_eq!(r.cross_check(), 0);
    }
}

//! Deferred resort requests. Scripted or user logic queues a reorder; the
//! registry drains the queue exactly once per tick. Requests queued while a
//! drain is executing land in the next tick's batch, never interleaved.

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::obj::{Obj, ObjId};

/// Pairwise ordering supplied by the scripting layer (a first-class value
/// here; the runtime behind it is opaque to the core).
pub type OrderFn = Box<dyn Fn(&Obj, &Obj) -> Ordering>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Place {
    Before,
    After,
}

pub enum ResortRequest {
    /// Stable re-sort of every master-list member whose category intersects
    /// `mask`, ordered by the comparison function.
    Category { mask: u32, order: OrderFn },
    /// Move `obj` immediately before/after `anchor`. Dropped silently at
    /// execution time if either has been removed meanwhile.
    Move {
        obj: ObjId,
        anchor: ObjId,
        place: Place,
    },
}

#[derive(Default)]
pub struct ResortQueue {
    queued: VecDeque<ResortRequest>,
}

impl ResortQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_category(&mut self, mask: u32, order: OrderFn) {
        self.queued.push_back(ResortRequest::Category { mask, order });
    }

    pub fn schedule_move(&mut self, obj: ObjId, anchor: ObjId, place: Place) {
        self.queued.push_back(ResortRequest::Move { obj, anchor, place });
    }

    /// Take the whole queue for this tick's drain. The queue itself is left
    /// empty, so anything scheduled during execution waits for the next tick.
    pub fn take_for_tick(&mut self) -> VecDeque<ResortRequest> {
        std::mem::take(&mut self.queued)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queued.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}

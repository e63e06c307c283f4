//! Ordered object list: doubly-linked order realized as index links over a
//! contiguous node slab. The list owns its link nodes, never the entities.
//! Order is semantically meaningful (draw/execution/collision priority) and
//! is defined entirely by the links, so iteration is deterministic across
//! replicas regardless of how membership is tracked internally.

use std::collections::HashMap;

use crate::obj::ObjId;

const NIL: u32 = u32::MAX;

#[derive(Copy, Clone, Debug)]
struct Node {
    obj: ObjId,
    prev: u32,
    next: u32,
}

#[derive(Debug)]
pub struct ObjList {
    nodes: Vec<Node>,
    free: Vec<u32>,
    head: u32,
    tail: u32,
    index: HashMap<ObjId, u32>,
}

impl Default for ObjList {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            index: HashMap::new(),
        }
    }
}

impl ObjList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: ObjId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn first(&self) -> Option<ObjId> {
        (self.head != NIL).then(|| self.nodes[self.head as usize].obj)
    }

    pub fn last(&self) -> Option<ObjId> {
        (self.tail != NIL).then(|| self.nodes[self.tail as usize].obj)
    }

    /// Successor of `id` in list order.
    pub fn next_of(&self, id: ObjId) -> Option<ObjId> {
        let n = *self.index.get(&id)?;
        let next = self.nodes[n as usize].next;
        (next != NIL).then(|| self.nodes[next as usize].obj)
    }

    /// Predecessor of `id` in list order.
    pub fn prev_of(&self, id: ObjId) -> Option<ObjId> {
        let n = *self.index.get(&id)?;
        let prev = self.nodes[n as usize].prev;
        (prev != NIL).then(|| self.nodes[prev as usize].obj)
    }

    pub fn push_back(&mut self, id: ObjId) -> bool {
        if self.contains(id) {
            debug_assert!(false, "object {id:?} already in list");
            return false;
        }
        let n = self.alloc(id);
        self.link_tail(n);
        true
    }

    pub fn push_front(&mut self, id: ObjId) -> bool {
        if self.contains(id) {
            debug_assert!(false, "object {id:?} already in list");
            return false;
        }
        let n = self.alloc(id);
        self.link_head(n);
        true
    }

    /// Insert `id` immediately before `anchor`. Fails if `id` is already a
    /// member or `anchor` is not.
    pub fn insert_before(&mut self, id: ObjId, anchor: ObjId) -> bool {
        if self.contains(id) {
            return false;
        }
        let Some(&at) = self.index.get(&anchor) else {
            return false;
        };
        let n = self.alloc(id);
        self.link_before(n, at);
        true
    }

    /// Insert `id` immediately after `anchor`.
    pub fn insert_after(&mut self, id: ObjId, anchor: ObjId) -> bool {
        if self.contains(id) {
            return false;
        }
        let Some(&at) = self.index.get(&anchor) else {
            return false;
        };
        let n = self.alloc(id);
        self.link_after(n, at);
        true
    }

    /// Detach `id`. Idempotent: removing a non-member is a no-op returning
    /// `false`, which keeps removal safe mid-iteration over collected ids.
    pub fn remove(&mut self, id: ObjId) -> bool {
        let Some(n) = self.index.remove(&id) else {
            return false;
        };
        self.unlink(n);
        self.nodes[n as usize].obj = ObjId(0);
        self.free.push(n);
        true
    }

    /// Move `a` to sit immediately before `b`. No-op success when already in
    /// that relation; fails when either is not a member or `a == b`.
    pub fn move_before(&mut self, a: ObjId, b: ObjId) -> bool {
        if a == b {
            return false;
        }
        let (Some(&an), Some(&bn)) = (self.index.get(&a), self.index.get(&b)) else {
            return false;
        };
        if self.nodes[bn as usize].prev == an {
            return true;
        }
        self.unlink(an);
        self.link_before(an, bn);
        true
    }

    /// Move `a` to sit immediately after `b`.
    pub fn move_after(&mut self, a: ObjId, b: ObjId) -> bool {
        if a == b {
            return false;
        }
        let (Some(&an), Some(&bn)) = (self.index.get(&a), self.index.get(&b)) else {
            return false;
        };
        if self.nodes[bn as usize].next == an {
            return true;
        }
        self.unlink(an);
        self.link_after(an, bn);
        true
    }

    /// Rewrite the members listed in `old` (given in current list order) with
    /// the same set in the order of `new`, leaving every other member's
    /// position untouched. This is the primitive behind stable category
    /// resorts: only the scoped slots are reassigned.
    pub fn permute(&mut self, old: &[ObjId], new: &[ObjId]) -> bool {
        if old.len() != new.len() {
            debug_assert!(false, "permute with mismatched lengths");
            return false;
        }
        #[cfg(debug_assertions)]
        {
            let mut a = old.to_vec();
            let mut b = new.to_vec();
            a.sort_unstable();
            b.sort_unstable();
            debug_assert_eq!(a, b, "permute must receive the same member set");
        }
        let mut slots = Vec::with_capacity(old.len());
        for id in old {
            match self.index.get(id) {
                Some(&s) => slots.push(s),
                None => {
                    debug_assert!(false, "permute of non-member {id:?}");
                    return false;
                }
            }
        }
        for (&slot, &id) in slots.iter().zip(new) {
            self.nodes[slot as usize].obj = id;
            self.index.insert(id, slot);
        }
        true
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cur: self.head,
        }
    }

    pub fn to_vec(&self) -> Vec<ObjId> {
        self.iter().collect()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
        self.index.clear();
    }

    fn alloc(&mut self, id: ObjId) -> u32 {
        let n = if let Some(n) = self.free.pop() {
            self.nodes[n as usize] = Node {
                obj: id,
                prev: NIL,
                next: NIL,
            };
            n
        } else {
            let n = u32::try_from(self.nodes.len()).expect("list slab index fits u32");
            self.nodes.push(Node {
                obj: id,
                prev: NIL,
                next: NIL,
            });
            n
        };
        self.index.insert(id, n);
        n
    }

    fn link_head(&mut self, n: u32) {
        self.nodes[n as usize].prev = NIL;
        self.nodes[n as usize].next = self.head;
        if self.head != NIL {
            self.nodes[self.head as usize].prev = n;
        } else {
            self.tail = n;
        }
        self.head = n;
    }

    fn link_tail(&mut self, n: u32) {
        self.nodes[n as usize].next = NIL;
        self.nodes[n as usize].prev = self.tail;
        if self.tail != NIL {
            self.nodes[self.tail as usize].next = n;
        } else {
            self.head = n;
        }
        self.tail = n;
    }

    fn link_before(&mut self, n: u32, at: u32) {
        let prev = self.nodes[at as usize].prev;
        if prev == NIL {
            self.link_head_at(n, at);
        } else {
            self.nodes[n as usize].prev = prev;
            self.nodes[n as usize].next = at;
            self.nodes[prev as usize].next = n;
            self.nodes[at as usize].prev = n;
        }
    }

    fn link_head_at(&mut self, n: u32, at: u32) {
        debug_assert_eq!(self.head, at);
        self.nodes[n as usize].prev = NIL;
        self.nodes[n as usize].next = at;
        self.nodes[at as usize].prev = n;
        self.head = n;
    }

    fn link_after(&mut self, n: u32, at: u32) {
        let next = self.nodes[at as usize].next;
        self.nodes[n as usize].prev = at;
        self.nodes[n as usize].next = next;
        self.nodes[at as usize].next = n;
        if next == NIL {
            self.tail = n;
        } else {
            self.nodes[next as usize].prev = n;
        }
    }

    fn unlink(&mut self, n: u32) {
        let Node { prev, next, .. } = self.nodes[n as usize];
        if prev != NIL {
            self.nodes[prev as usize].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next as usize].prev = prev;
        } else {
            self.tail = prev;
        }
        self.nodes[n as usize].prev = NIL;
        self.nodes[n as usize].next = NIL;
    }
}

pub struct Iter<'a> {
    list: &'a ObjList,
    cur: u32,
}

impl Iterator for Iter<'_> {
    type Item = ObjId;

    fn next(&mut self) -> Option<ObjId> {
        if self.cur == NIL {
            return None;
        }
        let node = &self.list.nodes[self.cur as usize];
        self.cur = node.next;
        Some(node.obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[u32]) -> Vec<ObjId> {
        v.iter().map(|&n| ObjId(n)).collect()
    }

    #[test]
    fn push_insert_remove_keep_links_consistent() {
        let mut l = ObjList::new();
        assert!(l.push_back(ObjId(1)));
        assert!(l.push_back(ObjId(3)));
        assert!(l.insert_before(ObjId(2), ObjId(3)));
        assert!(l.insert_after(ObjId(4), ObjId(3)));
        assert_eq!(l.to_vec(), ids(&[1, 2, 3, 4]));
        assert_eq!(l.first(), Some(ObjId(1)));
        assert_eq!(l.last(), Some(ObjId(4)));

        assert!(l.remove(ObjId(1)));
        assert!(!l.remove(ObjId(1)));
        assert_eq!(l.to_vec(), ids(&[2, 3, 4]));
        assert_eq!(l.prev_of(ObjId(3)), Some(ObjId(2)));
        assert_eq!(l.next_of(ObjId(4)), None);
    }

    #[test]
    fn move_before_and_after_including_adjacent_noop() {
        let mut l = ObjList::new();
        for n in 1..=4 {
            l.push_back(ObjId(n));
        }
        assert!(l.move_before(ObjId(4), ObjId(2)));
        assert_eq!(l.to_vec(), ids(&[1, 4, 2, 3]));
        // Already immediately before: success without relinking.
        assert!(l.move_before(ObjId(4), ObjId(2)));
        assert_eq!(l.to_vec(), ids(&[1, 4, 2, 3]));
        assert!(l.move_after(ObjId(1), ObjId(3)));
        assert_eq!(l.to_vec(), ids(&[4, 2, 3, 1]));
        assert!(!l.move_after(ObjId(9), ObjId(3)));
    }

    #[test]
    fn permute_reorders_subset_in_place() {
        let mut l = ObjList::new();
        for n in 1..=5 {
            l.push_back(ObjId(n));
        }
        // Swap 2 and 4 without touching 1, 3, 5.
        assert!(l.permute(&ids(&[2, 4]), &ids(&[4, 2])));
        assert_eq!(l.to_vec(), ids(&[1, 4, 3, 2, 5]));
    }

    #[test]
    fn slab_reuses_freed_nodes() {
        let mut l = ObjList::new();
        for n in 1..=3 {
            l.push_back(ObjId(n));
        }
        l.remove(ObjId(2));
        l.push_back(ObjId(9));
        assert_eq!(l.to_vec(), ids(&[1, 3, 9]));
        assert_eq!(l.len(), 3);
    }
}

//! Generational arena of property stores.
//!
//! Removing a store bumps the slot generation, so every outstanding
//! [`StoreHandle`] into it starts observing `None` — the moral equivalent of
//! walking an intrusive reference list and nulling each holder, without the
//! manual notification walk.

use std::collections::HashMap;

use crate::Value;

/// Reserved key: reading it yields the prototype reference itself; writing a
/// store value under it rebinds the prototype pointer.
pub const PROTOTYPE_KEY: &str = "Prototype";
/// Reserved-by-convention key backing the name helpers.
pub const NAME_KEY: &str = "Name";

/// Weak reference into a [`PropArena`]. Stale after the store is removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreHandle {
    index: u32,
    generation: u32,
}

/// One property store: own slots plus an optional prototype consulted on
/// lookup miss. Prototype chains must stay acyclic; cyclic assignment is
/// rejected at bind time (see [`PropArena::set_property`]).
#[derive(Debug, Default)]
pub struct Store {
    props: HashMap<String, Value>,
    prototype: Option<StoreHandle>,
}

impl Store {
    #[inline]
    pub fn prototype(&self) -> Option<StoreHandle> {
        self.prototype
    }

    /// Own-slot read; no prototype delegation.
    #[inline]
    pub fn own(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    #[inline]
    pub fn own_len(&self) -> usize {
        self.props.len()
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    store: Option<Store>,
}

#[derive(Debug, Default)]
pub struct PropArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl PropArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self) -> StoreHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.store = Some(Store::default());
            return StoreHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = u32::try_from(self.slots.len()).expect("arena index fits u32");
        self.slots.push(Slot {
            generation: 0,
            store: Some(Store::default()),
        });
        StoreHandle {
            index,
            generation: 0,
        }
    }

    pub fn alloc_with_prototype(&mut self, prototype: StoreHandle) -> StoreHandle {
        let h = self.alloc();
        self.set_property(h, PROTOTYPE_KEY, Value::Store(prototype));
        h
    }

    pub fn get(&self, h: StoreHandle) -> Option<&Store> {
        let slot = self.slots.get(h.index as usize)?;
        if slot.generation != h.generation {
            return None;
        }
        slot.store.as_ref()
    }

    pub fn get_mut(&mut self, h: StoreHandle) -> Option<&mut Store> {
        let slot = self.slots.get_mut(h.index as usize)?;
        if slot.generation != h.generation {
            return None;
        }
        slot.store.as_mut()
    }

    #[inline]
    pub fn is_live(&self, h: StoreHandle) -> bool {
        self.get(h).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.store.is_some()).count()
    }

    /// Destroy the store. Bumping the generation clears every outstanding
    /// handle in one step; stale removal is a no-op.
    pub fn remove(&mut self, h: StoreHandle) -> bool {
        let Some(slot) = self.slots.get_mut(h.index as usize) else {
            return false;
        };
        if slot.generation != h.generation || slot.store.is_none() {
            return false;
        }
        slot.store = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(h.index);
        true
    }

    /// Own slot, then the prototype chain. The reserved prototype key reads
    /// the prototype reference itself, never a slot.
    pub fn get_property(&self, h: StoreHandle, key: &str) -> Value {
        let Some(store) = self.get(h) else {
            return Value::Nil;
        };
        if key == PROTOTYPE_KEY {
            return store.prototype.map_or(Value::Nil, Value::Store);
        }
        let mut cur = store;
        loop {
            if let Some(v) = cur.props.get(key) {
                return v.clone();
            }
            match cur.prototype.and_then(|p| self.get(p)) {
                Some(next) => cur = next,
                None => return Value::Nil,
            }
        }
    }

    /// Insert or overwrite. A store value under the reserved prototype key
    /// rebinds the prototype pointer instead of filling a slot; an assignment
    /// that would close a prototype cycle is refused.
    pub fn set_property(&mut self, h: StoreHandle, key: &str, value: Value) {
        if key == PROTOTYPE_KEY {
            match value {
                Value::Store(p) => {
                    if self.chain_reaches(p, h) {
                        log::warn!("refused cyclic prototype assignment on store {h:?}");
                        return;
                    }
                    if let Some(store) = self.get_mut(h) {
                        store.prototype = Some(p);
                    }
                    return;
                }
                Value::Nil => {
                    if let Some(store) = self.get_mut(h) {
                        store.prototype = None;
                    }
                    return;
                }
                // Non-store values fall through to an ordinary (shadowed) slot.
                _ => {}
            }
        }
        if let Some(store) = self.get_mut(h) {
            store.props.insert(key.to_string(), value);
        }
    }

    /// Drop the own slot; reads fall back to the prototype afterwards.
    pub fn reset_property(&mut self, h: StoreHandle, key: &str) {
        if let Some(store) = self.get_mut(h) {
            store.props.remove(key);
        }
    }

    pub fn name(&self, h: StoreHandle) -> String {
        match self.get_property(h, NAME_KEY) {
            Value::Str(s) => s,
            _ => String::new(),
        }
    }

    pub fn set_name(&mut self, h: StoreHandle, name: Option<&str>) {
        match name {
            Some(n) => self.set_property(h, NAME_KEY, Value::from(n)),
            None => self.reset_property(h, NAME_KEY),
        }
    }

    /// Does the chain starting at `from` reach `target`? Chains are acyclic
    /// (this guard is what keeps them so), hence the walk terminates.
    fn chain_reaches(&self, from: StoreHandle, target: StoreHandle) -> bool {
        let mut cur = Some(from);
        while let Some(h) = cur {
            if h == target {
                return true;
            }
            cur = self.get(h).and_then(Store::prototype);
        }
        false
    }
}

//! Destroying a store must leave every outstanding handle observing the
//! cleared state, including handles stored as values in other stores.

use prop_core::{PropArena, Value};

#[test]
fn all_outstanding_handles_observe_cleared_state() {
    let mut arena = PropArena::new();
    let target = arena.alloc();
    let holders: Vec<_> = std::iter::repeat(target).take(16).collect();

    assert!(arena.remove(target));
    for h in holders {
        assert!(arena.get(h).is_none());
        assert!(arena.get_property(h, "anything").is_nil());
    }
}

#[test]
fn store_valued_slots_go_stale_not_dangling() {
    let mut arena = PropArena::new();
    let target = arena.alloc();
    let owner = arena.alloc();
    arena.set_property(owner, "Contents", Value::Store(target));

    arena.remove(target);
    let held = arena
        .get_property(owner, "Contents")
        .as_store()
        .expect("slot still holds the handle");
    assert!(arena.get(held).is_none());
}

#[test]
fn lookup_through_removed_prototype_stops_cleanly() {
    let mut arena = PropArena::new();
    let proto = arena.alloc();
    arena.set_property(proto, "Value", Value::from(1));
    let obj = arena.alloc_with_prototype(proto);

    arena.remove(proto);
    assert!(arena.get_property(obj, "Value").is_nil());
}

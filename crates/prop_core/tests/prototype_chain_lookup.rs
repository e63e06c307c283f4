//! Lookup misses delegate down the prototype chain; resetting an own slot
//! re-exposes the prototype's value.

use prop_core::{PropArena, Value};

#[test]
fn reset_falls_back_to_prototype() {
    let mut arena = PropArena::new();
    let def = arena.alloc();
    arena.set_property(def, "MaxSpeed", Value::from(20));

    let obj = arena.alloc_with_prototype(def);
    assert_eq!(arena.get_property(obj, "MaxSpeed").as_int(), 20);

    arena.set_property(obj, "MaxSpeed", Value::from(35));
    assert_eq!(arena.get_property(obj, "MaxSpeed").as_int(), 35);
    // Definition value untouched by the instance override.
    assert_eq!(arena.get_property(def, "MaxSpeed").as_int(), 20);

    arena.reset_property(obj, "MaxSpeed");
    assert_eq!(arena.get_property(obj, "MaxSpeed").as_int(), 20);
}

#[test]
fn reset_without_prototype_reads_nil() {
    let mut arena = PropArena::new();
    let obj = arena.alloc();
    arena.set_property(obj, "Wealth", Value::from(5));
    arena.reset_property(obj, "Wealth");
    assert!(arena.get_property(obj, "Wealth").is_nil());
}

#[test]
fn two_level_chain_resolves_deepest_definition() {
    let mut arena = PropArena::new();
    let base = arena.alloc();
    arena.set_property(base, "Category", Value::from(8));
    let species = arena.alloc_with_prototype(base);
    let obj = arena.alloc_with_prototype(species);
    assert_eq!(arena.get_property(obj, "Category").as_int(), 8);
}

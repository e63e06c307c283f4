//! Explicit ordering: after order_before(X, Y), X's immediate successor is
//! Y; cross-list and dead operands fail as typed errors.

use world_core::{ObjId, ObjInit, Registry, RegistryError};

#[test]
fn immediate_successor_after_order_before() {
    let mut r = Registry::with_bounds(200, 200);
    let x = r.spawn(ObjInit::default());
    let _mid = r.spawn(ObjInit::default());
    let y = r.spawn(ObjInit::default());

    r.order_before(x, y).unwrap();
    assert_eq!(r.master().next_of(x), Some(y));

    r.order_after(y, x).unwrap();
    assert_eq!(r.master().prev_of(y), Some(x));
}

#[test]
fn ordering_against_dead_or_cross_list_operands_fails() {
    let mut r = Registry::with_bounds(200, 200);
    let a = r.spawn(ObjInit::default());
    let b = r.spawn(ObjInit::default());

    assert_eq!(
        r.order_before(a, ObjId(999)),
        Err(RegistryError::NotAMember(ObjId(999)))
    );

    r.deactivate(b);
    assert_eq!(r.order_before(a, b), Err(RegistryError::CrossList));

    // Both inactive: ordering happens on the side list.
    r.deactivate(a);
    r.order_before(a, b).unwrap();
    assert_eq!(r.inactive().next_of(a), Some(b));
}

#[test]
fn ordering_an_object_against_itself_is_an_invalid_move() {
    let mut r = Registry::with_bounds(200, 200);
    let a = r.spawn(ObjInit::default());
    let b = r.spawn(ObjInit::default());
    let before = r.master().to_vec();

    assert_eq!(r.order_before(a, a), Err(RegistryError::InvalidMove(a, a)));
    assert_eq!(r.order_after(b, b), Err(RegistryError::InvalidMove(b, b)));
    assert_eq!(r.master().to_vec(), before);
}

//! Point finds match collision flags against the query mask at the exact
//! point, honor the exclusion, and never see inactive objects.

use glam::IVec2;
use world_core::obj::{Shape, ocf};
use world_core::{ObjInit, Registry};

fn solid_at(x: i32, y: i32) -> ObjInit {
    ObjInit {
        pos: IVec2::new(x, y),
        shape: Shape::new(IVec2::new(-3, -3), IVec2::new(6, 6)),
        ocf: ocf::SOLID,
        ..ObjInit::default()
    }
}

#[test]
fn excluded_entity_is_never_returned() {
    let mut r = Registry::with_bounds(300, 300);
    let only = r.spawn(solid_at(100, 100));
    let p = IVec2::new(100, 100);
    assert_eq!(r.find_at_point(p, ocf::ALL, None), Some(only));
    // Even as the only spatial match.
    assert_eq!(r.find_at_point(p, ocf::ALL, Some(only)), None);
}

#[test]
fn mask_must_intersect_and_shape_must_cover() {
    let mut r = Registry::with_bounds(300, 300);
    let a = r.spawn(solid_at(50, 50));
    assert_eq!(r.find_at_point(IVec2::new(52, 48), ocf::SOLID, None), Some(a));
    // Point outside the 6x6 shape.
    assert_eq!(r.find_at_point(IVec2::new(58, 50), ocf::SOLID, None), None);
    // Disjoint mask.
    assert_eq!(r.find_at_point(IVec2::new(50, 50), ocf::ALIVE, None), None);
}

#[test]
fn finds_across_a_sector_border() {
    let mut r = Registry::with_bounds(300, 300);
    // Bucketed in the cell left of the border at x=50, shape reaches across.
    let a = r.spawn(solid_at(49, 10));
    assert_eq!(r.find_at_point(IVec2::new(51, 10), ocf::SOLID, None), Some(a));
}

#[test]
fn inactive_objects_are_invisible_to_point_finds() {
    let mut r = Registry::with_bounds(300, 300);
    let a = r.spawn(solid_at(80, 80));
    r.deactivate(a);
    assert_eq!(r.find_at_point(IVec2::new(80, 80), ocf::ALL, None), None);
    r.activate(a);
    assert_eq!(r.find_at_point(IVec2::new(80, 80), ocf::ALL, None), Some(a));
}

//! Collision detection between entity boxes
//!
//! Everything collides as a rectangle except the player, whose rounded hull
//! is modelled as the ellipse inscribed in its hitbox. Rectangle corners
//! would otherwise claim hits well outside the visible boat.

use glam::Vec2;

use super::hitbox::{Collider, EntityKind, resolve_hitbox};
use super::rect::Rect;

/// Half-open AABB overlap on both axes
#[inline]
pub fn rect_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Overlap test with both boxes grown by `margin` on every side.
/// Spawn placement only.
#[inline]
pub fn inflated_rect_overlap(a: &Rect, b: &Rect, margin: f32) -> bool {
    rect_overlap(&a.inflate(margin), &b.inflate(margin))
}

/// True if `candidate` keeps `margin` clearance from every box in `existing`
pub fn spawn_area_clear<I>(candidate: &Rect, existing: I, margin: f32) -> bool
where
    I: IntoIterator<Item = Rect>,
{
    !existing
        .into_iter()
        .any(|other| inflated_rect_overlap(candidate, &other, margin))
}

/// Ellipse inscribed in `ellipse_box` against a rectangle.
///
/// Takes the point of `rect` closest to the ellipse center, scales the offset
/// by the two radii and reports a hit when the normalized squared distance
/// is at most 1.
pub fn ellipse_vs_rect(ellipse_box: &Rect, rect: &Rect) -> bool {
    let rx = ellipse_box.width / 2.0;
    let ry = ellipse_box.height / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }

    let center = ellipse_box.center();
    let closest = rect.closest_point(center);
    let d = (closest - center) / Vec2::new(rx, ry);

    d.length_squared() <= 1.0
}

/// Collision between two entities using their resolved hitboxes.
///
/// Dispatches to the ellipse test when exactly one side is the player.
pub fn entities_collide<A, B>(a: &A, b: &B) -> bool
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    let box_a = resolve_hitbox(a);
    let box_b = resolve_hitbox(b);

    match (a.kind() == EntityKind::Player, b.kind() == EntityKind::Player) {
        (true, false) => ellipse_vs_rect(&box_a, &box_b),
        (false, true) => ellipse_vs_rect(&box_b, &box_a),
        _ => rect_overlap(&box_a, &box_b),
    }
}

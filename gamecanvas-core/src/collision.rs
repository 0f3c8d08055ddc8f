//! Overlap tests for simple game logic.

use ultraviolet::Vec2;

/// Whether two rects, given by top-left and size, overlap.
/// Rects that only share an edge don't count.
#[must_use]
pub fn hit_rect(a_position: Vec2, a_size: Vec2, b_position: Vec2, b_size: Vec2) -> bool {
    let (a_max, b_max) = (a_position + a_size, b_position + b_size);
    b_max.x > a_position.x && b_position.x < a_max.x && b_max.y > a_position.y && b_position.y < a_max.y
}

/// Whether two circles overlap or touch.
#[must_use]
pub fn hit_circle(a_center: Vec2, a_radius: f32, b_center: Vec2, b_radius: f32) -> bool {
    (a_center - b_center).mag() <= a_radius + b_radius
}

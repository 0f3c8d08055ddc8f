//! Angles, the circle tessellation table, and pivot composition.
//!
//! Angles at the public surface are in degrees. Canvas space is y-down, so a
//! positive angle turns clockwise on screen.

use ultraviolet::Vec2;

/// Number of segments used to approximate a circle outline.
pub const CIRCLE_RESOLUTION: usize = 24;

/// Unit circle points, starting at `(0, 1)` and stepping by `2π / 24`.
/// Computed once.
#[must_use]
pub fn circle_points() -> &'static [Vec2; CIRCLE_RESOLUTION] {
    static TABLE: std::sync::OnceLock<[Vec2; CIRCLE_RESOLUTION]> = std::sync::OnceLock::new();
    TABLE.get_or_init(|| {
        #[allow(clippy::cast_precision_loss)]
        let step = std::f32::consts::TAU / CIRCLE_RESOLUTION as f32;
        std::array::from_fn(|i| {
            #[allow(clippy::cast_precision_loss)]
            let (sin, cos) = (i as f32 * step).sin_cos();
            Vec2::new(sin, cos)
        })
    })
}

#[must_use]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}
#[must_use]
pub fn rad_to_deg(radians: f32) -> f32 {
    radians.to_degrees()
}
#[must_use]
pub fn cos_deg(degrees: f32) -> f32 {
    degrees.to_radians().cos()
}
#[must_use]
pub fn sin_deg(degrees: f32) -> f32 {
    degrees.to_radians().sin()
}
/// Angle in degrees of the vector `(x, y)` from the +x axis.
#[must_use]
pub fn atan2_deg(x: f32, y: f32) -> f32 {
    y.atan2(x).to_degrees()
}

/// A decomposed placement, ready to be written into a render slot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    pub scale: Vec2,
    /// Degrees.
    pub rotation: f32,
}

/// Place something scaled by `scale`, then rotated by `degrees` about `pivot`,
/// where `pivot` is relative to `origin`.
///
/// Builds `T(origin + pivot) * R(degrees) * T(-pivot) * S(scale)` and reads
/// the result back out as translation, per-axis scale and angle.
#[must_use]
pub fn compose_about_pivot(origin: Vec2, pivot: Vec2, degrees: f32, scale: Vec2) -> Placement {
    use cgmath::{Deg, Matrix4, Vector3};

    let spin = Matrix4::from_translation(Vector3::new(origin.x + pivot.x, origin.y + pivot.y, 0.0))
        * Matrix4::from_angle_z(Deg(degrees));
    let unpivot = Matrix4::from_translation(Vector3::new(-pivot.x, -pivot.y, 0.0))
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, 1.0);
    let m = spin * unpivot;

    // cgmath is column-major, `m.x` is the first column.
    let row_norm = |a: f32, b: f32, c: f32| (a * a + b * b + c * c).sqrt();
    Placement {
        position: Vec2::new(m.w.x, m.w.y),
        scale: Vec2::new(row_norm(m.x.x, m.y.x, m.z.x), row_norm(m.x.y, m.y.y, m.z.y)),
        // Direction of the transformed y axis.
        rotation: (-m.y.x).atan2(m.y.y).to_degrees(),
    }
}

#[cfg(test)]
mod test {
    use super::{circle_points, compose_about_pivot, Vec2};
    fn near(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }
    #[test]
    fn circle_table() {
        let pts = circle_points();
        assert!(near(pts[0].x, 0.0) && near(pts[0].y, 1.0));
        // Quarter turn.
        assert!(near(pts[6].x, 1.0) && near(pts[6].y, 0.0));
        assert!(pts.iter().all(|p| near(p.mag(), 1.0)));
    }
    #[test]
    fn trig_helpers() {
        assert!(near(super::cos_deg(60.0), 0.5));
        assert!(near(super::sin_deg(30.0), 0.5));
        assert!(near(super::atan2_deg(0.0, 1.0), 90.0));
        assert!(near(super::atan2_deg(-1.0, 0.0), 180.0));
        assert!(near(super::rad_to_deg(super::deg_to_rad(123.0)), 123.0));
    }
    #[test]
    fn quarter_turn_about_pivot() {
        let placed = compose_about_pivot(Vec2::zero(), Vec2::new(10.0, 10.0), 90.0, Vec2::one());
        assert!(near(placed.position.x, 20.0), "{placed:?}");
        assert!(near(placed.position.y, 0.0), "{placed:?}");
        assert!(near(placed.scale.x, 1.0) && near(placed.scale.y, 1.0));
        assert!(near(placed.rotation, 90.0));
    }
    #[test]
    fn rotated_placement_swings_about_pivot() {
        let origin = Vec2::new(100.0, 50.0);
        let pivot = Vec2::new(8.0, -4.0);
        let placed = compose_about_pivot(origin, pivot, 30.0, Vec2::one());
        let (sin, cos) = 30f32.to_radians().sin_cos();
        let spun = Vec2::new(-pivot.x * cos + pivot.y * sin, -pivot.x * sin - pivot.y * cos);
        let expected = origin + pivot + spun;
        assert!(near(placed.position.x, expected.x));
        assert!(near(placed.position.y, expected.y));
        assert!(near(placed.rotation, 30.0));
    }
    #[test]
    fn uniform_scale_is_recovered() {
        let placed = compose_about_pivot(Vec2::zero(), Vec2::new(1.0, 0.0), 45.0, Vec2::broadcast(3.0));
        assert!(near(placed.scale.x, 3.0) && near(placed.scale.y, 3.0));
        assert!(near(placed.rotation, 45.0));
    }
}

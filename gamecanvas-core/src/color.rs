use crate::util::{FiniteF32, FiniteF32Error};

/// Straight-alpha RGBA, every channel within `[0, 1]`.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, bytemuck::Zeroable, Debug)]
pub struct Color([FiniteF32; 4]);
impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
impl Color {
    pub const TRANSPARENT: Self = Self([FiniteF32::ZERO; 4]);
    pub const WHITE: Self = Self([FiniteF32::ONE; 4]);
    pub const BLACK: Self = Self([
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ZERO,
        FiniteF32::ONE,
    ]);
    /// Build from channels. Out-of-range channels are saturated, non-finite ones rejected.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Result<Self, FiniteF32Error> {
        Self::from_array([r, g, b, a])
    }
    pub fn from_array(rgba: [f32; 4]) -> Result<Self, FiniteF32Error> {
        Ok(Self([
            FiniteF32::new_unit(rgba[0])?,
            FiniteF32::new_unit(rgba[1])?,
            FiniteF32::new_unit(rgba[2])?,
            FiniteF32::new_unit(rgba[3])?,
        ]))
    }
    /// Build from hue, saturation, value and alpha, all in `[0, 1]`.
    /// Hue wraps around, so `1.0` is red again.
    pub fn from_hsv(h: f32, s: f32, v: f32, a: f32) -> Result<Self, FiniteF32Error> {
        let [h, s, v] = [
            FiniteF32::new(h)?.get(),
            FiniteF32::new_unit(s)?.get(),
            FiniteF32::new_unit(v)?.get(),
        ];
        if s == 0.0 {
            return Self::new(v, v, v, a);
        }
        let sector = (h * 6.0).rem_euclid(6.0);
        let fraction = sector.fract();
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * fraction);
        let t = v * (1.0 - s * (1.0 - fraction));
        // Truncation is the point, sector is within [0, 6).
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let [r, g, b] = match sector as u32 {
            0 => [v, t, p],
            1 => [q, v, p],
            2 => [p, v, t],
            3 => [p, q, v],
            4 => [t, p, v],
            _ => [v, p, q],
        };
        Self::new(r, g, b, a)
    }
    #[must_use]
    pub fn as_array(self) -> [f32; 4] {
        self.0.map(FiniteF32::get)
    }
    #[must_use]
    pub fn alpha(self) -> f32 {
        self.0[3].get()
    }
    /// Multiply channel-wise. Used to tint a texel by the slot color.
    #[must_use]
    pub fn modulate(self, rgba: [f32; 4]) -> [f32; 4] {
        let own = self.as_array();
        std::array::from_fn(|i| own[i] * rgba[i])
    }
}

#[cfg(test)]
mod test {
    use super::Color;
    fn close(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(a, b)| (a - b).abs() < 1e-5)
    }
    #[test]
    fn saturates_channels() {
        let c = Color::new(2.0, -1.0, 0.5, 1.0).unwrap();
        assert_eq!(c.as_array(), [1.0, 0.0, 0.5, 1.0]);
        assert!(Color::new(f32::NAN, 0.0, 0.0, 1.0).is_err());
    }
    #[test]
    fn hsv_primaries() {
        let red = Color::from_hsv(0.0, 1.0, 1.0, 1.0).unwrap();
        assert!(close(red.as_array(), [1.0, 0.0, 0.0, 1.0]));
        let green = Color::from_hsv(1.0 / 3.0, 1.0, 1.0, 0.5).unwrap();
        assert!(close(green.as_array(), [0.0, 1.0, 0.0, 0.5]));
        let blue = Color::from_hsv(2.0 / 3.0, 1.0, 1.0, 1.0).unwrap();
        assert!(close(blue.as_array(), [0.0, 0.0, 1.0, 1.0]));
        let wrapped = Color::from_hsv(1.0, 1.0, 1.0, 1.0).unwrap();
        assert!(close(wrapped.as_array(), red.as_array()));
    }
    #[test]
    fn hsv_gray() {
        let gray = Color::from_hsv(0.7, 0.0, 0.25, 1.0).unwrap();
        assert_eq!(gray.as_array(), [0.25, 0.25, 0.25, 1.0]);
    }
    #[test]
    fn default_is_white() {
        assert_eq!(Color::default(), Color::WHITE);
    }
}

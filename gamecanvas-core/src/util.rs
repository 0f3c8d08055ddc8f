//! Small numeric helpers shared by the canvas modules.

/// A float which is neither NaN nor infinite.
#[derive(Copy, Clone, PartialEq, PartialOrd, bytemuck::NoUninit, bytemuck::Zeroable, Debug)]
#[repr(transparent)]
pub struct FiniteF32(f32);
impl FiniteF32 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);
    pub fn new(val: f32) -> Result<Self, FiniteF32Error> {
        if val.is_finite() {
            Ok(Self(val))
        } else {
            Err(FiniteF32Error::NotFinite)
        }
    }
    /// Accept a finite value and saturate it into `[0, 1]`.
    pub fn new_unit(val: f32) -> Result<Self, FiniteF32Error> {
        Self::new(val).map(|v| Self(v.0.clamp(0.0, 1.0)))
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for FiniteF32 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f32> for FiniteF32 {
    type Error = FiniteF32Error;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<FiniteF32> for f32 {
    fn from(value: FiniteF32) -> Self {
        value.get()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FiniteF32Error {
    #[error("not finite")]
    NotFinite,
}

// No NaN can be constructed, so equality is total.
impl Eq for FiniteF32 {}

#[cfg(test)]
mod test {
    use super::FiniteF32;
    #[test]
    fn rejects_nan_and_inf() {
        assert!(FiniteF32::new(f32::NAN).is_err());
        assert!(FiniteF32::new(f32::INFINITY).is_err());
        assert!(FiniteF32::new_unit(f32::NEG_INFINITY).is_err());
        assert_eq!(FiniteF32::new(-3.5).map(FiniteF32::get), Ok(-3.5));
    }
    #[test]
    fn unit_saturates() {
        assert_eq!(FiniteF32::new_unit(2.0), Ok(FiniteF32::ONE));
        assert_eq!(FiniteF32::new_unit(-0.1), Ok(FiniteF32::ZERO));
        assert_eq!(FiniteF32::new_unit(0.25).map(f32::from), Ok(0.25));
    }
}

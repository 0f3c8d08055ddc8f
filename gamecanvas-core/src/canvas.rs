//! Maps the fixed logical canvas onto whatever the physical display is.
//!
//! The canvas is scaled uniformly to fit the device. Whichever axis has spare
//! room gets letterbox borders on both sides. "World" space is the device
//! rectangle measured in canvas units, its origin at the device's top-left.

use crate::units::Resolution;
use ultraviolet::Vec2;

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasError {
    #[error("canvas {axis} must be greater than zero")]
    InvalidArgument { axis: &'static str },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ResolutionChange {
    Unchanged,
    Changed,
}

/// What the host knows about the display, polled once per frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DisplayInfo {
    pub width: u32,
    pub height: u32,
    pub resolution: Resolution,
    pub touch_supported: bool,
}
impl Default for DisplayInfo {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            resolution: Resolution::default(),
            touch_supported: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasScaler {
    width: u32,
    height: u32,
    device: [u32; 2],
    /// Canvas units per device pixel.
    scale: f32,
    world: [u32; 2],
    border: Vec2,
}
impl CanvasScaler {
    pub fn new(width: u32, height: u32, device_width: u32, device_height: u32) -> Result<Self, CanvasError> {
        check_size(width, height)?;
        let mut this = Self {
            width,
            height,
            device: [width, height],
            scale: 1.0,
            world: [width, height],
            border: Vec2::zero(),
        };
        this.set_device_size(device_width, device_height);
        this.recompute();
        Ok(this)
    }
    /// Change the logical size. Equal arguments leave everything untouched.
    pub fn set_resolution(&mut self, width: u32, height: u32) -> Result<ResolutionChange, CanvasError> {
        check_size(width, height)?;
        if (width, height) == (self.width, self.height) {
            return Ok(ResolutionChange::Unchanged);
        }
        self.width = width;
        self.height = height;
        self.recompute();
        log::debug!(
            "canvas resized to {width}x{height}, scale {}, border {:?}",
            self.scale,
            self.border
        );
        Ok(ResolutionChange::Changed)
    }
    /// Record the device size, recomputing if it differs.
    /// A zero-sized device keeps the previous geometry. Returns whether anything changed.
    pub fn set_device_size(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::trace!("ignoring zero-sized device {width}x{height}");
            return false;
        }
        if self.device == [width, height] {
            return false;
        }
        self.device = [width, height];
        self.recompute();
        true
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn recompute(&mut self) {
        let [dw, dh] = self.device.map(|v| v as f32);
        let (cw, ch) = (self.width as f32, self.height as f32);
        self.scale = (cw / dw).max(ch / dh);
        // Rounding can leave the world a hair smaller than the canvas, hence the clamp.
        self.world = [(dw * self.scale).floor() as u32, (dh * self.scale).floor() as u32];
        self.border = Vec2::new(
            ((self.world[0] as f32 - cw) * 0.5).max(0.0),
            ((self.world[1] as f32 - ch) * 0.5).max(0.0),
        );
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }
    #[must_use]
    pub fn border(&self) -> Vec2 {
        self.border
    }
    #[must_use]
    pub fn world_size(&self) -> [u32; 2] {
        self.world
    }
    #[must_use]
    pub fn device_size(&self) -> [u32; 2] {
        self.device
    }
    #[must_use]
    pub fn is_portrait(&self) -> bool {
        self.width <= self.height
    }
    /// Device pixel to canvas coordinates.
    #[must_use]
    pub fn to_canvas(&self, device: Vec2) -> Vec2 {
        device * self.scale - self.border
    }
}
impl Default for CanvasScaler {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            device: [DEFAULT_WIDTH, DEFAULT_HEIGHT],
            scale: 1.0,
            world: [DEFAULT_WIDTH, DEFAULT_HEIGHT],
            border: Vec2::zero(),
        }
    }
}

fn check_size(width: u32, height: u32) -> Result<(), CanvasError> {
    if width == 0 {
        Err(CanvasError::InvalidArgument { axis: "width" })
    } else if height == 0 {
        Err(CanvasError::InvalidArgument { axis: "height" })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{CanvasError, CanvasScaler, ResolutionChange, Vec2};
    #[test]
    fn resolution_round_trip() {
        let mut scaler = CanvasScaler::new(640, 480, 1280, 720).unwrap();
        assert_eq!(scaler.set_resolution(320, 240), Ok(ResolutionChange::Changed));
        assert_eq!((scaler.width(), scaler.height()), (320, 240));
        assert!(scaler.border().x >= 0.0 && scaler.border().y >= 0.0);
        assert_eq!(scaler.set_resolution(320, 240), Ok(ResolutionChange::Unchanged));
        assert_eq!(
            scaler.set_resolution(0, 240),
            Err(CanvasError::InvalidArgument { axis: "width" })
        );
        // Rejected calls don't touch state.
        assert_eq!(scaler.width(), 320);
    }
    #[test]
    fn widescreen_gets_side_borders() {
        let scaler = CanvasScaler::new(640, 480, 1280, 720).unwrap();
        assert!((scaler.scale() - 480.0 / 720.0).abs() < 1e-6);
        assert_eq!(scaler.world_size(), [853, 480]);
        assert!((scaler.border().x - 106.5).abs() < 1e-3);
        assert_eq!(scaler.border().y, 0.0);
        assert!(!scaler.is_portrait());
    }
    #[test]
    fn tall_device_gets_top_and_bottom_borders() {
        let scaler = CanvasScaler::new(480, 640, 480, 1000).unwrap();
        assert_eq!(scaler.border().x, 0.0);
        assert!(scaler.border().y > 0.0);
        assert!(scaler.is_portrait());
    }
    #[test]
    fn device_to_canvas() {
        let scaler = CanvasScaler::new(640, 480, 1280, 720).unwrap();
        let center = scaler.to_canvas(Vec2::new(640.0, 360.0));
        assert!((center.x - 320.0).abs() < 0.5, "{center:?}");
        assert!((center.y - 240.0).abs() < 0.5, "{center:?}");
    }
    #[test]
    fn zero_device_is_ignored() {
        let mut scaler = CanvasScaler::new(640, 480, 1280, 720).unwrap();
        let before = scaler.clone();
        assert!(!scaler.set_device_size(0, 720));
        assert_eq!(scaler, before);
        assert!(scaler.set_device_size(640, 480));
        assert_eq!(scaler.scale(), 1.0);
        assert!(!scaler.set_device_size(640, 480));
    }
}

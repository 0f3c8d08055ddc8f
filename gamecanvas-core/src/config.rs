//! Startup settings, in toml.
//!
//! Every field has a default, so a partial (or empty) file is fine. Values are
//! checked after parsing, since serde bypasses the setters.

use crate::{
    canvas::{self, CanvasError},
    draw::{DrawError, Style},
    units::Length,
};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{name} {requirement}, got {value}")]
    InvalidArgument {
        name: &'static str,
        requirement: &'static str,
        value: String,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Style(#[from] DrawError),
}

fn invalid(name: &'static str, requirement: &'static str, value: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidArgument {
        name,
        requirement,
        value: value.to_string(),
    }
}
fn check_positive(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(name, "must be greater than zero", value))
    }
}
fn check_length(name: &'static str, value: Length) -> Result<Length, ConfigError> {
    if value.value() > 0.0 && value.value().is_finite() {
        Ok(value)
    } else {
        Err(invalid(name, "must be greater than zero", value))
    }
}

/// Thresholds for the gesture recognizer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Seconds a touch may sit still and still end as a tap or flick.
    max_tap_time: f32,
    min_flick_distance: Length,
    max_tap_distance: Length,
    /// Seconds of stillness before a touch counts as held.
    min_hold_time: f32,
    pinch_in_scale: f32,
    pinch_out_scale: f32,
}
impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            max_tap_time: 0.2,
            min_flick_distance: Length::Inch(1.0),
            max_tap_distance: Length::Inch(0.9),
            min_hold_time: 0.4,
            pinch_in_scale: 0.95,
            pinch_out_scale: 1.05,
        }
    }
}
impl GestureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("max tap time", self.max_tap_time)?;
        check_length("min flick distance", self.min_flick_distance)?;
        check_length("max tap distance", self.max_tap_distance)?;
        check_positive("min hold time", self.min_hold_time)?;
        check_pinch_in(self.pinch_in_scale)?;
        check_pinch_out(self.pinch_out_scale)?;
        Ok(())
    }
    #[must_use]
    pub fn max_tap_time(&self) -> f32 {
        self.max_tap_time
    }
    pub fn set_max_tap_time(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.max_tap_time = check_positive("max tap time", seconds)?;
        Ok(())
    }
    #[must_use]
    pub fn min_flick_distance(&self) -> Length {
        self.min_flick_distance
    }
    pub fn set_min_flick_distance(&mut self, distance: Length) -> Result<(), ConfigError> {
        self.min_flick_distance = check_length("min flick distance", distance)?;
        Ok(())
    }
    #[must_use]
    pub fn max_tap_distance(&self) -> Length {
        self.max_tap_distance
    }
    pub fn set_max_tap_distance(&mut self, distance: Length) -> Result<(), ConfigError> {
        self.max_tap_distance = check_length("max tap distance", distance)?;
        Ok(())
    }
    #[must_use]
    pub fn min_hold_time(&self) -> f32 {
        self.min_hold_time
    }
    pub fn set_min_hold_time(&mut self, seconds: f32) -> Result<(), ConfigError> {
        self.min_hold_time = check_positive("min hold time", seconds)?;
        Ok(())
    }
    #[must_use]
    pub fn pinch_in_scale(&self) -> f32 {
        self.pinch_in_scale
    }
    pub fn set_pinch_in_scale(&mut self, scale: f32) -> Result<(), ConfigError> {
        self.pinch_in_scale = check_pinch_in(scale)?;
        Ok(())
    }
    #[must_use]
    pub fn pinch_out_scale(&self) -> f32 {
        self.pinch_out_scale
    }
    pub fn set_pinch_out_scale(&mut self, scale: f32) -> Result<(), ConfigError> {
        self.pinch_out_scale = check_pinch_out(scale)?;
        Ok(())
    }
}
fn check_pinch_in(scale: f32) -> Result<f32, ConfigError> {
    if scale > 0.0 && scale < 1.0 {
        Ok(scale)
    } else {
        Err(invalid("pinch in scale", "must be between 0 and 1", scale))
    }
}
fn check_pinch_out(scale: f32) -> Result<f32, ConfigError> {
    if scale > 1.0 && scale.is_finite() {
        Ok(scale)
    } else {
        Err(invalid("pinch out scale", "must be greater than 1", scale))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
}
impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: canvas::DEFAULT_WIDTH,
            height: canvas::DEFAULT_HEIGHT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frames per second the host should aim for.
    pub frame_rate: u32,
    pub canvas: CanvasSettings,
    pub gestures: GestureConfig,
    /// Initial pen. The color always starts white.
    pub style: Style,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            canvas: CanvasSettings::default(),
            gestures: GestureConfig::default(),
            style: Style::default(),
        }
    }
}
impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width == 0 {
            return Err(CanvasError::InvalidArgument { axis: "width" }.into());
        }
        if self.canvas.height == 0 {
            return Err(CanvasError::InvalidArgument { axis: "height" }.into());
        }
        if self.frame_rate == 0 {
            return Err(invalid("frame rate", "must be greater than zero", 0));
        }
        self.gestures.validate()?;
        self.style.validate()?;
        Ok(())
    }
    /// Seconds per frame at the configured rate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn frame_interval(&self) -> f32 {
        1.0 / self.frame_rate as f32
    }
}

#[cfg(test)]
mod test {
    use super::{ConfigError, GestureConfig, Settings};
    use crate::units::Length;

    #[test]
    fn empty_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }
    #[test]
    fn partial_file() {
        let text = r#"
frame_rate = 30

[canvas]
width = 320

[gestures]
min_flick_distance = "2.54cm"
"#;
        let settings = Settings::from_toml_str(text).unwrap();
        assert_eq!(settings.frame_rate, 30);
        assert_eq!(settings.canvas.width, 320);
        assert_eq!(settings.canvas.height, 480);
        assert_eq!(settings.gestures.min_flick_distance(), Length::Centimeter(2.54));
        assert_eq!(settings.gestures.max_tap_time(), 0.2);
    }
    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Settings::from_toml_str("[canvas]\nwidth = 0"),
            Err(ConfigError::Canvas(_))
        ));
        assert!(matches!(
            Settings::from_toml_str("[gestures]\npinch_in_scale = 1.5"),
            Err(ConfigError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Settings::from_toml_str("[gestures]\nmax_tap_distance = \"3 furlongs\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Settings::from_toml_str("[style]\nfont_size = -1.0"),
            Err(ConfigError::Style(_))
        ));
    }
    #[test]
    fn setters_reject_and_keep() {
        let mut config = GestureConfig::default();
        assert!(config.set_max_tap_time(0.0).is_err());
        assert!(config.set_min_hold_time(-1.0).is_err());
        assert!(config.set_pinch_out_scale(1.0).is_err());
        assert!(config.set_min_flick_distance(Length::Inch(0.0)).is_err());
        assert_eq!(config, GestureConfig::default());
        config.set_max_tap_distance(Length::Pixel(40.0)).unwrap();
        config.set_pinch_in_scale(0.5).unwrap();
        assert_eq!(config.pinch_in_scale(), 0.5);
    }
    #[test]
    fn saved_file_reloads() {
        let mut settings = Settings::default();
        settings.canvas.height = 900;
        let text = settings.to_toml_string().unwrap();
        assert_eq!(Settings::from_toml_str(&text).unwrap(), settings);
    }
}

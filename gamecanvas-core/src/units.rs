//! Physical lengths and display densities.
//!
//! Gesture thresholds are measured in physical distance so that a flick feels
//! the same on a phone and on a desktop monitor.

pub const CM_PER_IN: f32 = 2.54;
pub const IN_PER_CM: f32 = 1.0 / CM_PER_IN;
/// Typographic points per inch, W3C definition.
pub const PT_PER_IN: f32 = 72.0;
pub const IN_PER_PT: f32 = 1.0 / PT_PER_IN;
/// Density assumed when the display cannot report one.
pub const FALLBACK_DPI: f32 = 96.0;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnitParseError {
    #[error(transparent)]
    Value(#[from] std::num::ParseFloatError),
    #[error("unknown unit, expected one of px, in, pt, cm")]
    UnrecognizedUnit,
}

/// A distance in one of several units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Device pixels, meaningful only together with a [`Resolution`].
    Pixel(f32),
    Inch(f32),
    /// Typographic points.
    Point(f32),
    Centimeter(f32),
}
impl Length {
    #[must_use]
    pub fn value(self) -> f32 {
        match self {
            Self::Pixel(x) | Self::Inch(x) | Self::Point(x) | Self::Centimeter(x) => x,
        }
    }
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Self::Pixel(_) => "px",
            Self::Inch(_) => "in",
            Self::Point(_) => "pt",
            Self::Centimeter(_) => "cm",
        }
    }
    /// Convert into inches, under the given resolution.
    #[must_use]
    pub fn into_inches(self, resolution: Resolution) -> f32 {
        match self {
            Self::Pixel(px) => px / resolution.into_dpi(),
            Self::Point(p) => p * IN_PER_PT,
            Self::Inch(i) => i,
            Self::Centimeter(cm) => cm * IN_PER_CM,
        }
    }
    /// Convert into device pixels, under the given resolution.
    #[must_use]
    pub fn into_pixels(self, resolution: Resolution) -> f32 {
        match self {
            Self::Pixel(px) => px,
            other => other.into_inches(resolution) * resolution.into_dpi(),
        }
    }
}
impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.value(), self.unit())
    }
}

impl std::str::FromStr for Length {
    type Err = UnitParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_ascii();
        // Units are two ascii letters. Bail before slicing through a multibyte char.
        if s.len() < 2 || !s.is_char_boundary(s.len() - 2) {
            return Err(UnitParseError::UnrecognizedUnit);
        }
        let (number, unit) = s.split_at(s.len() - 2);
        let build = match unit {
            "px" => Self::Pixel,
            "in" => Self::Inch,
            "pt" => Self::Point,
            "cm" => Self::Centimeter,
            _ => return Err(UnitParseError::UnrecognizedUnit),
        };
        Ok(build(number.trim_ascii().parse()?))
    }
}

impl serde::Serialize for Length {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
impl<'de> serde::Deserialize<'de> for Length {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Pixel density of a display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Resolution {
    /// Dots per inch
    Dpi(f32),
    /// Dots per centimeter
    Dpcm(f32),
}
impl Resolution {
    /// Some platforms report zero or garbage when the density is unknown.
    /// Anything that isn't a positive finite number is replaced by [`FALLBACK_DPI`].
    #[must_use]
    pub fn or_fallback(self) -> Self {
        let dpi = self.into_dpi();
        if dpi.is_finite() && dpi > 0.0 {
            self
        } else {
            log::debug!("display reported unusable density {self}, assuming {FALLBACK_DPI}dpi");
            Self::Dpi(FALLBACK_DPI)
        }
    }
    #[must_use]
    pub fn into_dpi(self) -> f32 {
        match self {
            Resolution::Dpi(i) => i,
            Resolution::Dpcm(cm) => cm * CM_PER_IN,
        }
    }
}
impl Default for Resolution {
    fn default() -> Self {
        Self::Dpi(FALLBACK_DPI)
    }
}
impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dpi(x) => write!(f, "{x}dpi"),
            Self::Dpcm(x) => write!(f, "{x}dpcm"),
        }
    }
}

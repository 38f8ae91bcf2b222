//! Color spaces, target gamuts and output formats.
//!
//! The chroma floor search works in one of two cylindrical color spaces
//! ([`ColorSpace::Oklch`] or [`ColorSpace::Hct`]). Each space has fixed
//! domains for its hue, chroma and lightness channels, plus the precision
//! defaults and guardrail thresholds that apply when searching in it.
//!
//! # Examples
//!
//! ```
//! use egal::space::{ColorSpace, Gamut, OutputFormat};
//!
//! let space: ColorSpace = "hct".parse().unwrap();
//! assert_eq!(space.chroma_domain().max, 200.0);
//!
//! let gamut: Gamut = "Rec.2020".parse().unwrap();
//! assert_eq!(gamut, Gamut::Rec2020);
//!
//! assert_eq!(OutputFormat::default().name(), "oklch");
//! ```

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Closed interval `[min, max]` of a color channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies inside the interval.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Hue domain shared by every supported space. The upper bound is exclusive.
pub const HUE_DOMAIN: Domain = Domain::new(0.0, 360.0);

/// Cylindrical color space in which lightness and hue are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Oklab in polar form. Lightness and chroma are both in `0..=1`.
    #[default]
    Oklch,
    /// Material HCT (CAM16 hue/chroma, L* tone). Tone is in `0..=100`.
    Hct,
}

impl ColorSpace {
    /// Name used in cache keys, JSON options and messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Oklch => "oklch",
            Self::Hct => "hct",
        }
    }

    #[must_use]
    pub const fn chroma_domain(&self) -> Domain {
        match self {
            Self::Oklch => Domain::new(0.0, 1.0),
            Self::Hct => Domain::new(0.0, 200.0),
        }
    }

    #[must_use]
    pub const fn lightness_domain(&self) -> Domain {
        match self {
            Self::Oklch => Domain::new(0.0, 1.0),
            Self::Hct => Domain::new(0.0, 100.0),
        }
    }

    /// Search precision used when none is given.
    #[must_use]
    pub const fn default_precision(&self) -> f64 {
        match self {
            Self::Oklch => 0.000_01,
            Self::Hct => 0.01,
        }
    }

    /// Range of precisions accepted while guardrails are on.
    #[must_use]
    pub const fn precision_limits(&self) -> Domain {
        match self {
            Self::Oklch => Domain::new(0.000_01, 0.05),
            Self::Hct => Domain::new(0.001, 5.0),
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oklch" => Ok(Self::Oklch),
            "hct" => Ok(Self::Hct),
            _ => Err(UnknownNameError::new("color space", s)),
        }
    }
}

/// Target gamut that every rendered color must fit in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gamut {
    #[default]
    Srgb,
    P3,
    Rec2020,
}

impl Gamut {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Srgb => "srgb",
            Self::P3 => "p3",
            Self::Rec2020 => "rec2020",
        }
    }

    /// Match a gamut keyword as written inside `egal(...)`.
    ///
    /// Accepts `srgb`/`rgb`, `p3` and `rec2020`/`rec.2020`, ignoring case.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "srgb" | "rgb" => Some(Self::Srgb),
            "p3" => Some(Self::P3),
            "rec2020" | "rec.2020" => Some(Self::Rec2020),
            _ => None,
        }
    }
}

impl fmt::Display for Gamut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gamut {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s.trim()).ok_or_else(|| UnknownNameError::new("gamut", s))
    }
}

/// CSS color function used for the rendered string.
///
/// Only `oklch` and `oklab` can express every color of the wider gamuts;
/// the other formats are clipped to what they can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Hsl,
    Hwb,
    Lch,
    Lab,
    #[default]
    Oklch,
    Oklab,
    /// Rendered as `rgb(R% G% B%)`.
    Srgb,
}

impl OutputFormat {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Hsl => "hsl",
            Self::Hwb => "hwb",
            Self::Lch => "lch",
            Self::Lab => "lab",
            Self::Oklch => "oklch",
            Self::Oklab => "oklab",
            Self::Srgb => "srgb",
        }
    }

    /// Every output format, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Hsl,
        Self::Hwb,
        Self::Lch,
        Self::Lab,
        Self::Oklch,
        Self::Oklab,
        Self::Srgb,
    ];
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.name() == lower)
            .ok_or_else(|| UnknownNameError::new("output format", s))
    }
}

/// Error returned when a space, gamut or format name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNameError {
    kind: &'static str,
    name: String,
}

impl UnknownNameError {
    fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for UnknownNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {}: {}", self.kind, self.name)
    }
}

impl std::error::Error for UnknownNameError {}

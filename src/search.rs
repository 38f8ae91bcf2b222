//! Chroma floor search.
//!
//! For one hue and lightness, [`find_max_chroma`] bisects the chroma domain
//! for the gamut boundary. [`find_chroma_floor_for_lightness`] repeats that
//! for every hue of a [`HueSpec`] and keeps the smallest result: the largest
//! chroma that every one of those hues can display at that lightness.
//!
//! # Examples
//!
//! ```
//! use egal::search::{HueSpec, SearchParameters};
//! use egal::space::{ColorSpace, Gamut};
//!
//! let params = SearchParameters {
//!     lightness: 0.5,
//!     hues: HueSpec::List(vec![0.0, 120.0, 240.0]),
//!     space: ColorSpace::Oklch,
//!     gamut: Gamut::Srgb,
//!     precision: 0.0001,
//! };
//! let floor = params.find_chroma_floor();
//! assert!(floor > 0.05 && floor < 0.2);
//! ```

use std::fmt;

use serde::Deserialize;

use crate::cache::CacheKey;
use crate::color::{Color, GAMUT_EPSILON};
use crate::sanitize::DEFAULT_HUE_STEP;
use crate::space::{ColorSpace, Gamut, HUE_DOMAIN};

/// Which hues a chroma floor has to hold for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HueSpec {
    /// Every multiple of the step below 360.
    Step(f64),
    /// An explicit list of hues, in degrees.
    List(Vec<f64>),
}

impl Default for HueSpec {
    fn default() -> Self {
        Self::Step(DEFAULT_HUE_STEP)
    }
}

impl HueSpec {
    /// Expand into the concrete hues to evaluate.
    ///
    /// A step that is not strictly positive and finite expands as the
    /// default step.
    #[must_use]
    pub fn hues(&self) -> Vec<f64> {
        match self {
            Self::List(hues) => hues.clone(),
            Self::Step(step) => {
                let step = if step.is_finite() && *step > 0.0 {
                    *step
                } else {
                    DEFAULT_HUE_STEP
                };
                (0u32..)
                    .map(|i| HUE_DOMAIN.min + f64::from(i) * step)
                    .take_while(|hue| *hue < HUE_DOMAIN.max)
                    .collect()
            }
        }
    }
}

impl fmt::Display for HueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(step) => write!(f, "{step}"),
            Self::List(hues) => {
                for (i, hue) in hues.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{hue}")?;
                }
                Ok(())
            }
        }
    }
}

/// Everything that determines a chroma floor.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParameters {
    pub lightness: f64,
    pub hues: HueSpec,
    pub space: ColorSpace,
    pub gamut: Gamut,
    pub precision: f64,
}

impl SearchParameters {
    #[must_use]
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            self.lightness,
            &self.hues,
            self.space,
            self.gamut,
            self.precision,
        )
    }

    #[must_use]
    pub fn find_chroma_floor(&self) -> f64 {
        find_chroma_floor_for_lightness(
            self.lightness,
            &self.hues,
            self.space,
            self.gamut,
            self.precision,
        )
    }
}

/// Largest chroma at which `(lightness, hue)` still fits `gamut`.
///
/// Bisects the chroma domain of `space` until the bracket is no wider than
/// `precision` and returns the last midpoint tested. The search also stops
/// once the midpoint can no longer move, so any precision terminates.
#[must_use]
pub fn find_max_chroma(
    hue: f64,
    lightness: f64,
    space: ColorSpace,
    gamut: Gamut,
    precision: f64,
) -> f64 {
    let domain = space.chroma_domain();
    let (mut min, mut max) = (domain.min, domain.max);

    loop {
        let chroma = (min + max) / 2.0;
        let stalled = chroma == min || chroma == max;

        if Color::from_space(space, lightness, chroma, hue).in_gamut(gamut, GAMUT_EPSILON) {
            min = chroma;
        } else {
            max = chroma;
        }

        if max - min <= precision || stalled {
            return chroma;
        }
    }
}

/// Minimum of [`find_max_chroma`] over every hue of `hues`.
///
/// Starts from the top of the chroma domain, so an empty hue list yields the
/// domain maximum.
#[must_use]
pub fn find_chroma_floor_for_lightness(
    lightness: f64,
    hues: &HueSpec,
    space: ColorSpace,
    gamut: Gamut,
    precision: f64,
) -> f64 {
    let floor = hues
        .hues()
        .into_iter()
        .map(|hue| find_max_chroma(hue, lightness, space, gamut, precision))
        .fold(space.chroma_domain().max, f64::min);

    #[cfg(feature = "tracing")]
    tracing::trace!(lightness, %hues, %space, %gamut, precision, floor, "computed chroma floor");

    floor
}

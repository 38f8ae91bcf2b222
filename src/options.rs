//! Layered configuration for [`egal`](crate::egal()).
//!
//! Options arrive from several places: built-in defaults, the host's base
//! options, a JSON blob written inside an `egal(...)` call, and values
//! parsed directly from the call's arguments. Each source is an
//! [`OptionsLayer`] in which every field is optional. Layers are stacked
//! with [`OptionsLayer::over`], where the upper layer wins for every field it
//! sets, and [`OptionsLayer::resolve`] fills the remaining gaps with defaults
//! to produce a complete [`EgalOptions`].
//!
//! The default precision depends on the color space, so it is chosen after
//! the merge: a layer that only switches `space` to HCT also switches the
//! precision default to HCT's.
//!
//! # Examples
//!
//! ```
//! use egal::options::OptionsLayer;
//! use egal::space::{ColorSpace, Gamut};
//!
//! let base = OptionsLayer::new().gamut(Gamut::P3).precision(0.001);
//! let json = OptionsLayer::from_json(r#"{"space": "hct", "gamut": "rec2020"}"#).unwrap();
//!
//! let options = json.over(&base).resolve();
//! assert_eq!(options.space, ColorSpace::Hct);
//! assert_eq!(options.gamut, Gamut::Rec2020);
//! assert_eq!(options.precision, 0.001);
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::search::HueSpec;
use crate::space::{ColorSpace, Gamut, OutputFormat};

/// Signature of a toe function.
pub type ToeFn = dyn Fn(f64, &EgalOptions) -> f64 + Send + Sync;

/// Transform applied to the lightness before anything else.
///
/// It receives the raw lightness and the resolved options (without the toe
/// function itself) and returns the lightness to use.
#[derive(Clone)]
pub struct ToeFunction(Arc<ToeFn>);

impl ToeFunction {
    pub fn new(f: impl Fn(f64, &EgalOptions) -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn apply(&self, lightness: f64, options: &EgalOptions) -> f64 {
        (self.0)(lightness, options)
    }
}

impl fmt::Debug for ToeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToeFunction(..)")
    }
}

/// Fully resolved options.
#[derive(Debug, Clone)]
pub struct EgalOptions {
    /// Hues the chroma floor must hold for.
    pub hues: HueSpec,
    /// Alpha of the rendered color, `0..=1`.
    pub opacity: f64,
    pub output: OutputFormat,
    pub toe_function: Option<ToeFunction>,
    /// Clamp precision and hue step to values that keep searches fast.
    pub guardrails: bool,
    pub space: ColorSpace,
    pub gamut: Gamut,
    /// Width of the final binary search bracket, in chroma units of `space`.
    pub precision: f64,
}

impl Default for EgalOptions {
    fn default() -> Self {
        OptionsLayer::default().resolve()
    }
}

/// One source of options. Unset fields defer to lower layers.
///
/// Deserializes from JSON objects with camelCase keys. `null` counts as
/// unset, unknown keys are ignored and a toe function cannot be given in
/// JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionsLayer {
    pub hues: Option<HueSpec>,
    pub opacity: Option<f64>,
    pub output: Option<OutputFormat>,
    #[serde(skip)]
    pub toe_function: Option<ToeFunction>,
    pub guardrails: Option<bool>,
    pub space: Option<ColorSpace>,
    pub gamut: Option<Gamut>,
    pub precision: Option<f64>,
}

impl OptionsLayer {
    /// An empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the options blob of an `egal(...)` call.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(OptionsError::Json)?;
        if !value.is_object() {
            return Err(OptionsError::NotAnObject);
        }
        serde_json::from_value(value).map_err(OptionsError::Json)
    }

    #[must_use]
    pub fn hues(mut self, hues: HueSpec) -> Self {
        self.hues = Some(hues);
        self
    }

    /// Evaluate every multiple of `step` below 360.
    #[must_use]
    pub fn hue_step(self, step: f64) -> Self {
        self.hues(HueSpec::Step(step))
    }

    /// Evaluate exactly these hues.
    #[must_use]
    pub fn hue_list(self, hues: impl Into<Vec<f64>>) -> Self {
        self.hues(HueSpec::List(hues.into()))
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    #[must_use]
    pub fn output(mut self, output: OutputFormat) -> Self {
        self.output = Some(output);
        self
    }

    #[must_use]
    pub fn toe_function(
        mut self,
        f: impl Fn(f64, &EgalOptions) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.toe_function = Some(ToeFunction::new(f));
        self
    }

    #[must_use]
    pub fn guardrails(mut self, guardrails: bool) -> Self {
        self.guardrails = Some(guardrails);
        self
    }

    #[must_use]
    pub fn space(mut self, space: ColorSpace) -> Self {
        self.space = Some(space);
        self
    }

    #[must_use]
    pub fn gamut(mut self, gamut: Gamut) -> Self {
        self.gamut = Some(gamut);
        self
    }

    #[must_use]
    pub fn precision(mut self, precision: f64) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Stack `self` on top of `lower`: fields set here win.
    #[must_use]
    pub fn over(&self, lower: &Self) -> Self {
        Self {
            hues: self.hues.clone().or_else(|| lower.hues.clone()),
            opacity: self.opacity.or(lower.opacity),
            output: self.output.or(lower.output),
            toe_function: self
                .toe_function
                .clone()
                .or_else(|| lower.toe_function.clone()),
            guardrails: self.guardrails.or(lower.guardrails),
            space: self.space.or(lower.space),
            gamut: self.gamut.or(lower.gamut),
            precision: self.precision.or(lower.precision),
        }
    }

    /// Fill unset fields with defaults.
    ///
    /// Defaults: hue step 1, opacity 1, `oklch` output, guardrails on,
    /// `oklch` space, `srgb` gamut, and the space's default precision.
    #[must_use]
    pub fn resolve(&self) -> EgalOptions {
        let space = self.space.unwrap_or_default();
        EgalOptions {
            hues: self.hues.clone().unwrap_or_default(),
            opacity: self.opacity.unwrap_or(1.0),
            output: self.output.unwrap_or_default(),
            toe_function: self.toe_function.clone(),
            guardrails: self.guardrails.unwrap_or(true),
            space,
            gamut: self.gamut.unwrap_or_default(),
            precision: self
                .precision
                .unwrap_or_else(|| space.default_precision()),
        }
    }
}

/// Error from [`OptionsLayer::from_json`].
#[derive(Debug)]
pub enum OptionsError {
    /// Not valid JSON, or a field has the wrong type.
    Json(serde_json::Error),
    /// Valid JSON, but not an object.
    NotAnObject,
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "Invalid JSON options: {e}"),
            Self::NotAnObject => write!(f, "JSON options must be an object"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::NotAnObject => None,
        }
    }
}

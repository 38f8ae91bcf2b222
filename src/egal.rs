//! Color computation: lightness, chroma fraction and hue in, CSS color out.
//!
//! Chroma is not absolute. It is a fraction of the chroma floor at the given
//! lightness, so `1.0` is the most colorful value that every hue of the hue
//! specification can show in the target gamut, and colors sharing a
//! lightness and chroma fraction look equally colorful whatever their hue.
//!
//! [`Egal`] owns the floor cache. The free function [`egal()`] uses a
//! process-wide engine.
//!
//! # Examples
//!
//! ```
//! use egal::prelude::*;
//!
//! assert_eq!(egal(0.5, 1.0, 0.0, &OptionsLayer::new()), "oklch(50% 0.08501 0)");
//! ```

use std::sync::{Arc, LazyLock};

use crate::cache::FloorCache;
use crate::color::{Color, Model};
use crate::options::{EgalOptions, OptionsLayer};
use crate::sanitize::{
    DEFAULT_HUE_STEP, sanitize_chroma, sanitize_hue, sanitize_hue_step, sanitize_lightness,
    sanitize_opacity, sanitize_precision,
};
use crate::search::{HueSpec, SearchParameters};

/// Color engine holding a chroma floor cache.
///
/// Engines are cheap to clone; clones share the cache.
#[derive(Debug, Clone, Default)]
pub struct Egal {
    cache: Arc<FloorCache>,
}

static DEFAULT_ENGINE: LazyLock<Egal> = LazyLock::new(Egal::new);

/// The process-wide engine behind [`egal()`].
#[must_use]
pub fn default_engine() -> &'static Egal {
    &DEFAULT_ENGINE
}

/// Compute a color with the process-wide engine. See [`Egal::color`].
#[must_use]
pub fn egal(lightness: f64, chroma: f64, hue: f64, options: &OptionsLayer) -> String {
    DEFAULT_ENGINE.color(lightness, chroma, hue, options)
}

impl Egal {
    /// Engine with its own cache of [`FloorCache::DEFAULT_CAPACITY`] floors.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache(Arc::new(FloorCache::new()))
    }

    /// Engine using `cache`, which may be shared with other engines.
    #[must_use]
    pub fn with_cache(cache: Arc<FloorCache>) -> Self {
        Self { cache }
    }

    #[must_use]
    pub fn cache(&self) -> &FloorCache {
        &self.cache
    }

    /// Render a color as a CSS string.
    ///
    /// `lightness` is in the units of the color space (`0..=1` for Oklch,
    /// `0..=100` for HCT), `chroma` is a fraction of the chroma floor and
    /// `hue` is in degrees. Any input, including NaN and infinities, yields a
    /// valid color; invalid values are replaced and reported with
    /// `log::warn!`. With `chroma <= 1` the result lies in the target gamut.
    #[must_use]
    pub fn color(&self, lightness: f64, chroma: f64, hue: f64, options: &OptionsLayer) -> String {
        self.compute(lightness, chroma, hue, options).to_string()
    }

    /// Like [`Egal::color`], but returns the mapped color unformatted.
    #[must_use]
    pub fn compute(&self, lightness: f64, chroma: f64, hue: f64, options: &OptionsLayer) -> Color {
        let options = options.resolve();
        let space = options.space;

        let hue = sanitize_hue(hue);
        let chroma = sanitize_chroma(chroma);
        let lightness = match &options.toe_function {
            Some(toe) => {
                let without_toe = EgalOptions {
                    toe_function: None,
                    ..options.clone()
                };
                let toed = toe.apply(lightness, &without_toe);
                sanitize_lightness(toed, space, Some(lightness))
            }
            None => sanitize_lightness(lightness, space, None),
        };
        let opacity = sanitize_opacity(options.opacity);

        let mut hues = match options.hues {
            HueSpec::List(list) if list.is_empty() => {
                log::warn!(
                    target: "egal::sanitize",
                    "The 'hues' option should not be an empty array; using the default instead (a step value of {DEFAULT_HUE_STEP})."
                );
                HueSpec::default()
            }
            HueSpec::List(list) => {
                let mut list: Vec<f64> = list.into_iter().map(sanitize_hue).collect();
                list.sort_by(f64::total_cmp);
                HueSpec::List(list)
            }
            HueSpec::Step(step) => HueSpec::Step(sanitize_hue(step)),
        };

        let mut precision = options.precision;
        if options.guardrails {
            precision = sanitize_precision(precision, space);
            if let HueSpec::Step(step) = hues {
                hues = HueSpec::Step(sanitize_hue_step(step));
            }
        }

        let floor = self.chroma_floor(&SearchParameters {
            lightness,
            hues,
            space,
            gamut: options.gamut,
            precision,
        });

        let adjusted_chroma = floor * chroma;
        // a grey has no hue
        let hue = if adjusted_chroma == 0.0 { f64::NAN } else { hue };

        Color::from_space(space, lightness, adjusted_chroma, hue)
            .with_alpha(opacity)
            .to(Model::for_output(options.output))
            .to_gamut(options.gamut)
    }

    /// Chroma floor for `params`, served from the cache when possible.
    ///
    /// `params` is used as given; no sanitization happens here.
    #[must_use]
    pub fn chroma_floor(&self, params: &SearchParameters) -> f64 {
        self.cache
            .get_or_insert_with(params.cache_key(), || params.find_chroma_floor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{ColorSpace, Gamut, OutputFormat};

    fn render(lightness: f64, chroma: f64, hue: f64, options: &OptionsLayer) -> String {
        Egal::new().color(lightness, chroma, hue, options)
    }

    #[test]
    fn test_reference_colors() {
        let defaults = OptionsLayer::new();
        assert_eq!(render(0.5, 1.0, 0.0, &defaults), "oklch(50% 0.08501 0)");
        assert_eq!(render(0.5, 1.0, 100.0, &defaults), "oklch(50% 0.08501 100)");
    }

    #[test]
    fn test_empty_hue_list_falls_back_to_default_step() {
        let options = OptionsLayer::new().hue_list(Vec::new());
        assert_eq!(render(0.12, 0.34, 56.0, &options), "oklch(12% 0.00696 56)");
    }

    #[test]
    fn test_black_has_no_hue() {
        assert_eq!(render(0.0, 0.0, 0.0, &OptionsLayer::new()), "oklch(0% 0 none)");
    }

    #[test]
    fn test_zero_chroma_is_grey() {
        assert_eq!(render(0.5, 0.0, 120.0, &OptionsLayer::new()), "oklch(50% 0 none)");
    }

    #[test]
    fn test_opacity() {
        let options = OptionsLayer::new().opacity(0.5);
        assert_eq!(render(0.5, 1.0, 0.0, &options), "oklch(50% 0.08501 0 / 0.5)");
        let nan = OptionsLayer::new().opacity(f64::NAN);
        assert_eq!(render(0.5, 1.0, 0.0, &nan), "oklch(50% 0.08501 0)");
        let high = OptionsLayer::new().opacity(3.0);
        assert_eq!(render(0.5, 1.0, 0.0, &high), "oklch(50% 0.08501 0)");
    }

    #[test]
    fn test_hue_wraps() {
        let defaults = OptionsLayer::new();
        assert_eq!(render(0.5, 1.0, 460.0, &defaults), render(0.5, 1.0, 100.0, &defaults));
        assert_eq!(render(0.5, 1.0, f64::NAN, &defaults), render(0.5, 1.0, 0.0, &defaults));
    }

    #[test]
    fn test_toe_function_reshapes_lightness() {
        let options = OptionsLayer::new().toe_function(|l, _| l / 2.0);
        assert_eq!(render(1.0, 1.0, 0.0, &options), "oklch(50% 0.08501 0)");
    }

    #[test]
    fn test_toe_function_sees_options_without_itself() {
        let options = OptionsLayer::new()
            .space(ColorSpace::Oklch)
            .toe_function(|l, opts| {
                assert!(opts.toe_function.is_none());
                l
            });
        let _ = render(0.5, 1.0, 0.0, &options);
    }

    #[test]
    fn test_floor_is_cached() {
        let engine = Egal::new();
        assert!(engine.cache().is_empty());
        let first = engine.color(0.6, 0.5, 200.0, &OptionsLayer::new().hue_step(10.0));
        assert_eq!(engine.cache().len(), 1);
        let second = engine.color(0.6, 0.5, 200.0, &OptionsLayer::new().hue_step(10.0));
        assert_eq!(engine.cache().len(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_guardrails_sanitize_precision_into_the_key() {
        let engine = Egal::new();
        let _ = engine.color(0.5, 1.0, 0.0, &OptionsLayer::new().hue_step(30.0).precision(0.0));
        let _ = engine.color(0.5, 1.0, 0.0, &OptionsLayer::new().hue_step(30.0));
        // precision 0 was replaced by the default, so both share one floor
        assert_eq!(engine.cache().len(), 1);
    }

    #[test]
    fn test_output_formats() {
        for output in OutputFormat::ALL {
            let options = OptionsLayer::new().output(output);
            let color = render(0.7, 0.5, 250.0, &options);
            let prefix = match output {
                OutputFormat::Srgb => "rgb(",
                other => other.name(),
            };
            assert!(color.starts_with(prefix), "{color}");
        }
    }

    #[test]
    fn test_hct_space() {
        let options = OptionsLayer::new().space(ColorSpace::Hct).hue_step(10.0);
        let color = render(50.0, 1.0, 120.0, &options);
        assert!(color.starts_with("oklch("), "{color}");
    }

    #[test]
    fn test_result_stays_in_gamut() {
        let engine = Egal::new();
        for gamut in [Gamut::Srgb, Gamut::P3, Gamut::Rec2020] {
            let options = OptionsLayer::new().gamut(gamut).hue_step(15.0);
            for hue in [0.0, 90.0, 180.0, 270.0] {
                let color = engine.compute(0.65, 1.0, hue, &options);
                assert!(color.in_gamut(gamut, crate::color::GAMUT_EPSILON));
            }
        }
    }
}

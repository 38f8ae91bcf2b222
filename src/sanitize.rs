//! Input sanitization for the color computation.
//!
//! Every function here is total: any real number, infinity or NaN maps to a
//! value inside the documented domain. Out-of-range input is reported through
//! `log::warn!` (target `egal::sanitize`) and replaced by a fallback; nothing
//! in this module returns an error or panics.

use crate::space::{ColorSpace, HUE_DOMAIN};

/// Largest chroma factor accepted before clamping.
pub const CHROMA_MAX: f64 = 1e6;

/// Hue step used when the `hues` option is missing or unusable.
pub const DEFAULT_HUE_STEP: f64 = 1.0;

/// Smallest hue step allowed while guardrails are on.
pub const MIN_HUE_STEP: f64 = 1.0;

const TARGET: &str = "egal::sanitize";

/// Wrap a hue into `[0, 360)`.
///
/// Non-finite hues become 0 with a warning.
#[must_use]
pub fn sanitize_hue(h: f64) -> f64 {
    if h.is_finite() {
        let wrapped = h.rem_euclid(HUE_DOMAIN.max) + 0.0;
        // rem_euclid can round up to the modulus for tiny negative inputs
        if wrapped >= HUE_DOMAIN.max { 0.0 } else { wrapped }
    } else {
        log::warn!(
            target: TARGET,
            "Invalid hue value. Expected finite number, got {h} instead. Reverting to 0."
        );
        0.0
    }
}

/// Clamp `value` into `[min, max]`. Requires `min <= max`.
#[must_use]
pub fn ensure_in_range(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clamp a chroma factor into `[0, CHROMA_MAX]`.
#[must_use]
pub fn sanitize_chroma(c: f64) -> f64 {
    if c.is_nan() {
        log::warn!(
            target: TARGET,
            "The chroma value should be a finite nonnegative number (received NaN); using 0 instead."
        );
        0.0
    } else if c.is_infinite() {
        let clean = if c < 0.0 { 0.0 } else { CHROMA_MAX };
        log::warn!(
            target: TARGET,
            "The chroma value should be a finite nonnegative number (received {c}); using {clean} instead."
        );
        clean
    } else if c < 0.0 {
        log::warn!(
            target: TARGET,
            "The chroma value should be a nonnegative number (received {c}); using 0 instead."
        );
        0.0
    } else if c > CHROMA_MAX {
        log::warn!(
            target: TARGET,
            "The chroma value should be at most {CHROMA_MAX} (received {c}); using {CHROMA_MAX} instead."
        );
        CHROMA_MAX
    } else {
        c
    }
}

/// Clamp a lightness into the lightness domain of `space`.
///
/// `before_toe` carries the caller's original lightness when `l` is the
/// output of a toe function, so that warnings name the value the user wrote.
#[must_use]
pub fn sanitize_lightness(l: f64, space: ColorSpace, before_toe: Option<f64>) -> f64 {
    let max = space.lightness_domain().max;
    let received = match before_toe {
        Some(original) => {
            format!("{l} (result of applying the toe function to {original})")
        }
        None => l.to_string(),
    };

    if l.is_nan() {
        log::warn!(
            target: TARGET,
            "The lightness value should be a finite nonnegative number (received {received}); using 0 instead."
        );
        0.0
    } else if l.is_infinite() {
        let clean = if l < 0.0 { 0.0 } else { max };
        log::warn!(
            target: TARGET,
            "The lightness value should be a finite nonnegative number (received {received}); using {clean} instead."
        );
        clean
    } else if l < 0.0 {
        log::warn!(
            target: TARGET,
            "The lightness value should be a nonnegative number (received {received}); using 0 instead."
        );
        0.0
    } else if l > max {
        log::warn!(
            target: TARGET,
            "The lightness value should be at most {max} (received {received}); using {max} instead."
        );
        max
    } else {
        l
    }
}

/// Clamp an opacity into `[0, 1]`. NaN silently becomes 1.
#[must_use]
pub fn sanitize_opacity(opacity: f64) -> f64 {
    if opacity.is_nan() {
        1.0
    } else {
        ensure_in_range(opacity, 0.0, 1.0)
    }
}

/// Keep a search precision inside the guardrail limits of `space`.
#[must_use]
pub fn sanitize_precision(p: f64, space: ColorSpace) -> f64 {
    let default = space.default_precision();
    let limits = space.precision_limits();
    let name = space.name().to_ascii_uppercase();

    if !p.is_finite() {
        log::warn!(
            target: TARGET,
            "The 'precision' option should be a finite, positive number (received {p}); using the default for {name} instead ({default})."
        );
        default
    } else if p == 0.0 {
        log::warn!(
            target: TARGET,
            "The 'precision' option should not be set to 0; using the default for {name} instead ({default})."
        );
        default
    } else if p < 0.0 {
        log::warn!(
            target: TARGET,
            "The 'precision' option should not be negative (received {p}); using the default for {name} instead ({default})."
        );
        default
    } else if p < limits.min {
        log::warn!(
            target: TARGET,
            "The 'precision' option is very high (received {p}); this may lead to performance issues. For example, the default precision for {name} is {default}. Using {} instead. To prevent this behavior, set 'guardrails' to false.",
            limits.min
        );
        limits.min
    } else if p > limits.max {
        log::warn!(
            target: TARGET,
            "The 'precision' option is very low (received {p}); this may lead to bad results. For example, the default precision for {name} is {default}. Using {} instead. To prevent this behavior, set 'guardrails' to false.",
            limits.max
        );
        limits.max
    } else {
        p
    }
}

/// Keep a hue step usable while guardrails are on.
///
/// Zero, multiples of 360 and non-finite steps fall back to
/// [`DEFAULT_HUE_STEP`]; steps below [`MIN_HUE_STEP`] are raised to it.
#[must_use]
pub fn sanitize_hue_step(step: f64) -> f64 {
    if !step.is_finite() || step.rem_euclid(HUE_DOMAIN.max) == 0.0 {
        log::warn!(
            target: TARGET,
            "The 'hues' option should not be set to 0 or a multiple of 360 (received {step}); using the default instead ({DEFAULT_HUE_STEP})."
        );
        DEFAULT_HUE_STEP
    } else if step < MIN_HUE_STEP {
        log::warn!(
            target: TARGET,
            "The 'hues' step is very small (received {step}); this may lead to performance issues. For example, the default hue step is {DEFAULT_HUE_STEP}. Using {MIN_HUE_STEP} instead. To prevent this behavior, set 'guardrails' to false."
        );
        MIN_HUE_STEP
    } else {
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_hue() {
        let cases = [
            (f64::NAN, 0.0),
            (f64::INFINITY, 0.0),
            (f64::NEG_INFINITY, 0.0),
            (-10.0, 350.0),
            (370.0, 10.0),
            (0.0, 0.0),
            (360.0, 0.0),
            (720.0, 0.0),
            (-360.0, 0.0),
            (180.0, 180.0),
            (0.000_01, 0.000_01),
            (-100.0, 260.0),
        ];
        for (input, expected) in cases {
            assert_eq!(sanitize_hue(input), expected, "sanitize_hue({input})");
        }
        assert!((sanitize_hue(719.999_99) - 359.999_99).abs() < 1e-9);
        assert!(sanitize_hue(-0.0).is_sign_positive());
    }

    #[test]
    fn test_sanitize_hue_tiny_negative_stays_below_360() {
        let h = sanitize_hue(-1e-20);
        assert!((0.0..360.0).contains(&h));
    }

    #[test]
    fn test_ensure_in_range() {
        assert_eq!(ensure_in_range(5.0, 0.0, 10.0), 5.0);
        assert_eq!(ensure_in_range(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(ensure_in_range(15.0, 0.0, 10.0), 10.0);
        assert_eq!(ensure_in_range(5.0, 5.0, 5.0), 5.0);
        assert_eq!(ensure_in_range(f64::INFINITY, 0.0, 10.0), 10.0);
        assert_eq!(ensure_in_range(f64::NEG_INFINITY, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_sanitize_chroma() {
        assert_eq!(sanitize_chroma(f64::NAN), 0.0);
        assert_eq!(sanitize_chroma(f64::INFINITY), CHROMA_MAX);
        assert_eq!(sanitize_chroma(f64::NEG_INFINITY), 0.0);
        assert_eq!(sanitize_chroma(-0.5), 0.0);
        assert_eq!(sanitize_chroma(2e6), CHROMA_MAX);
        assert_eq!(sanitize_chroma(CHROMA_MAX), CHROMA_MAX);
        assert_eq!(sanitize_chroma(0.34), 0.34);
    }

    #[test]
    fn test_sanitize_lightness_oklch() {
        let cases = [
            (f64::NAN, None, 0.0),
            (f64::INFINITY, None, 1.0),
            (f64::NEG_INFINITY, None, 0.0),
            (-0.1, None, 0.0),
            (1.1, None, 1.0),
            (0.5, None, 0.5),
            (f64::NAN, Some(0.5), 0.0),
            (f64::INFINITY, Some(0.5), 1.0),
            (-0.1, Some(0.5), 0.0),
            (1.1, Some(0.5), 1.0),
            (0.5, Some(0.5), 0.5),
        ];
        for (l, before, expected) in cases {
            assert_eq!(sanitize_lightness(l, ColorSpace::Oklch, before), expected);
        }
    }

    #[test]
    fn test_sanitize_lightness_hct_uses_tone_domain() {
        assert_eq!(sanitize_lightness(50.0, ColorSpace::Hct, None), 50.0);
        assert_eq!(sanitize_lightness(150.0, ColorSpace::Hct, None), 100.0);
    }

    #[test]
    fn test_sanitize_opacity() {
        assert_eq!(sanitize_opacity(f64::NAN), 1.0);
        assert_eq!(sanitize_opacity(1.5), 1.0);
        assert_eq!(sanitize_opacity(-1.0), 0.0);
        assert_eq!(sanitize_opacity(0.25), 0.25);
    }

    #[test]
    fn test_sanitize_precision() {
        let oklch = ColorSpace::Oklch;
        assert_eq!(sanitize_precision(f64::NAN, oklch), 0.000_01);
        assert_eq!(sanitize_precision(f64::INFINITY, oklch), 0.000_01);
        assert_eq!(sanitize_precision(0.0, oklch), 0.000_01);
        assert_eq!(sanitize_precision(-1.0, oklch), 0.000_01);
        assert_eq!(sanitize_precision(1e-9, oklch), 0.000_01);
        assert_eq!(sanitize_precision(1.0, oklch), 0.05);
        assert_eq!(sanitize_precision(0.001, oklch), 0.001);

        let hct = ColorSpace::Hct;
        assert_eq!(sanitize_precision(0.0, hct), 0.01);
        assert_eq!(sanitize_precision(1e-6, hct), 0.001);
        assert_eq!(sanitize_precision(10.0, hct), 5.0);
    }

    #[test]
    fn test_sanitize_hue_step() {
        assert_eq!(sanitize_hue_step(0.0), DEFAULT_HUE_STEP);
        assert_eq!(sanitize_hue_step(360.0), DEFAULT_HUE_STEP);
        assert_eq!(sanitize_hue_step(720.0), DEFAULT_HUE_STEP);
        assert_eq!(sanitize_hue_step(f64::NAN), DEFAULT_HUE_STEP);
        assert_eq!(sanitize_hue_step(0.000_01), MIN_HUE_STEP);
        assert_eq!(sanitize_hue_step(10.0), 10.0);
        assert_eq!(sanitize_hue_step(359.999), 359.999);
    }
}

//! Property-based tests for egal.
//!
//! These tests verify fundamental properties that should always hold:
//! sanitized values land in their domains, the cache is transparent,
//! colors stay in gamut and well-formed stylesheets rewrite completely.

use proptest::prelude::*;

use egal::color::{Color, GAMUT_EPSILON, Model};
use egal::css::Rewriter;
use egal::prelude::*;
use egal::sanitize::{ensure_in_range, sanitize_chroma, sanitize_hue};

// ============================================================================
// Custom Strategies
// ============================================================================

/// Any f64, including NaN and both infinities.
fn any_float() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>(),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        -1e9..1e9f64,
    ]
}

fn any_gamut() -> impl Strategy<Value = Gamut> {
    prop_oneof![Just(Gamut::Srgb), Just(Gamut::P3), Just(Gamut::Rec2020)]
}

/// A well-formed `egal(...)` call.
fn call() -> impl Strategy<Value = String> {
    (
        0u32..=100,
        0u32..=100,
        0u32..360,
        prop::option::of(0u32..=100),
        prop::option::of(prop_oneof![Just("p3"), Just("srgb"), Just("rec.2020")]),
    )
        .prop_map(|(l, c, h, alpha, gamut)| {
            let mut call = format!("egal({l}% {c}% {h}");
            if let Some(alpha) = alpha {
                call.push_str(&format!(" / {alpha}%"));
            }
            if let Some(gamut) = gamut {
                call.push_str(&format!(", {gamut}"));
            }
            call.push(')');
            call
        })
}

/// Parse the numbers back out of an `oklch(L% C H[ / A])` string.
fn parse_oklch(css: &str) -> Option<Color> {
    let inner = css.strip_prefix("oklch(")?.strip_suffix(')')?;
    let channels = inner.split(" / ").next()?;
    let mut parts = channels.split(' ');
    let lightness: f64 = parts.next()?.strip_suffix('%')?.parse().ok()?;
    let chroma: f64 = parts.next()?.parse().ok()?;
    let hue = match parts.next()? {
        "none" => 0.0,
        h => h.parse().ok()?,
    };
    Some(Color::new(Model::Oklch, [lightness / 100.0, chroma, hue], 1.0))
}

// ============================================================================
// Sanitizer
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn prop_sanitized_hue_in_domain(h in any_float()) {
        let s = sanitize_hue(h);
        prop_assert!((0.0..360.0).contains(&s));
        if h.is_finite() {
            let diff = (h - s) / 360.0;
            prop_assert!((diff - diff.round()).abs() < 1e-6 || h.abs() > 1e12);
        } else {
            prop_assert_eq!(s, 0.0);
        }
    }

    #[test]
    fn prop_ensure_in_range(v in any::<f64>(), a in -1e6..1e6f64, b in -1e6..1e6f64) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let r = ensure_in_range(v, min, max);
        if v.is_nan() {
            prop_assert!(r.is_nan());
        } else {
            prop_assert!(r >= min && r <= max);
            if v >= min && v <= max {
                prop_assert_eq!(r, v);
            }
        }
    }

    #[test]
    fn prop_sanitize_chroma_idempotent(c in any_float()) {
        let once = sanitize_chroma(c);
        prop_assert_eq!(sanitize_chroma(once), once);
        prop_assert!(once >= 0.0);
    }
}

// ============================================================================
// Color computation
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_cache_is_transparent(l in 0.0..=1.0f64, c in 0.0..=1.0f64, h in 0.0..360.0f64) {
        let engine = Egal::new();
        let options = OptionsLayer::new().hue_step(30.0);
        let first = engine.color(l, c, h, &options);
        let second = engine.color(l, c, h, &options);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, Egal::new().color(l, c, h, &options));
    }

    #[test]
    fn prop_output_in_gamut(
        l in 0.0..=1.0f64,
        c in 0.0..=1.0f64,
        h in 0.0..360.0f64,
        gamut in any_gamut(),
    ) {
        let options = OptionsLayer::new().gamut(gamut).hue_step(30.0);
        let css = Egal::new().color(l, c, h, &options);
        let color = parse_oklch(&css);
        prop_assert!(color.is_some(), "unparseable {}", css);
        // five significant digits cost a little accuracy
        prop_assert!(color.unwrap().in_gamut(gamut, GAMUT_EPSILON * 20.0), "{}", css);
    }

    #[test]
    fn prop_well_formed_calls_rewrite_completely(calls in prop::collection::vec(call(), 1..4)) {
        let css = calls
            .iter()
            .enumerate()
            .map(|(i, call)| format!(".c{i} {{ color: {call}; }}"))
            .collect::<Vec<_>>()
            .join("\n");
        let (text, diagnostics) = Rewriter::new().with_engine(Egal::new()).rewrite(&css);
        prop_assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        prop_assert!(!text.contains("egal("), "{}", text);
    }
}

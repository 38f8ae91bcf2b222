//! CSS serialization of [`Color`] values.

use super::{Color, Model};

/// Significant digits kept when serializing.
const PRECISION: i32 = 5;

/// Round `n` to `precision` significant digits, where every digit of the
/// integer part counts as significant (so `24.2549` keeps three decimals
/// and `1234.56` becomes `1234.6`).
#[must_use]
pub fn to_precision(n: f64, precision: i32) -> f64 {
    if n == 0.0 || !n.is_finite() {
        return n;
    }
    let integer = n.trunc();
    let digits = if integer == 0.0 {
        0
    } else {
        #[allow(clippy::cast_possible_truncation)]
        let digits = integer.abs().log10().floor() as i32 + 1;
        digits
    };
    let multiplier = 10f64.powi(precision - digits);
    (n * multiplier + 0.5).floor() / multiplier
}

fn number(n: f64) -> String {
    if n.is_nan() {
        return "none".to_string();
    }
    // adding zero turns -0 into 0
    let rounded = to_precision(n, PRECISION) + 0.0;
    rounded.to_string()
}

fn percent(n: f64) -> String {
    if n.is_nan() {
        "none".to_string()
    } else {
        format!("{}%", number(n))
    }
}

pub(super) fn serialize(color: &Color) -> String {
    let [a, b, c] = color.coords();
    let body = match color.model() {
        Model::Oklch => format!("oklch({} {} {}", percent(a * 100.0), number(b), number(c)),
        Model::Oklab => format!("oklab({} {} {}", percent(a * 100.0), number(b), number(c)),
        Model::Lab => format!("lab({} {} {}", number(a), number(b), number(c)),
        Model::Lch => format!("lch({} {} {}", number(a), number(b), number(c)),
        Model::Hsl => format!("hsl({} {} {}", number(a), percent(b), percent(c)),
        Model::Hwb => format!("hwb({} {} {}", number(a), percent(b), percent(c)),
        Model::Srgb => format!(
            "rgb({} {} {}",
            percent(a * 100.0),
            percent(b * 100.0),
            percent(c * 100.0)
        ),
        Model::P3 => format!("color(display-p3 {} {} {}", number(a), number(b), number(c)),
        Model::Rec2020 => format!("color(rec2020 {} {} {}", number(a), number(b), number(c)),
        Model::Xyz => format!("color(xyz-d65 {} {} {}", number(a), number(b), number(c)),
        Model::Hct => format!("color(--hct {} {} {}", number(a), number(b), number(c)),
    };

    if color.alpha() < 1.0 {
        format!("{body} / {})", number(color.alpha()))
    } else {
        format!("{body})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_precision() {
        assert_eq!(to_precision(0.085_014_343, 5), 0.085_01);
        assert_eq!(to_precision(24.254_9, 5), 24.255);
        assert_eq!(to_precision(1_234.56, 5), 1_234.6);
        assert_eq!(to_precision(0.0, 5), 0.0);
        assert_eq!(to_precision(-1.234_567, 5), -1.234_6);
        assert_eq!(to_precision(50.0, 5), 50.0);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(-0.0), "0");
        assert_eq!(number(-0.000_000_1), "0");
        assert_eq!(number(f64::NAN), "none");
        assert_eq!(number(0.5), "0.5");
        assert_eq!(percent(50.0), "50%");
    }

    #[test]
    fn test_serialize_formats() {
        let oklch = Color::new(Model::Oklch, [0.5, 0.085_014, 0.0], 1.0);
        assert_eq!(oklch.to_string(), "oklch(50% 0.08501 0)");

        let none = Color::new(Model::Oklch, [0.0, 0.0, f64::NAN], 1.0);
        assert_eq!(none.to_string(), "oklch(0% 0 none)");

        let rgb = Color::new(Model::Srgb, [1.0, 0.5, 0.0], 0.25);
        assert_eq!(rgb.to_string(), "rgb(100% 50% 0% / 0.25)");

        let hsl = Color::new(Model::Hsl, [120.0, 50.0, 25.0], 1.0);
        assert_eq!(hsl.to_string(), "hsl(120 50% 25%)");

        let lab = Color::new(Model::Lab, [50.0, -20.0, 30.5], 1.0);
        assert_eq!(lab.to_string(), "lab(50 -20 30.5)");
    }
}

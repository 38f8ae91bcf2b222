//! Gamut mapping after CSS Color 4 (`css-color-4` §13.2).
//!
//! The color is reduced in Oklch chroma by binary search until clipping it
//! to the destination cube changes it by less than one just-noticeable
//! difference in deltaEOK. Lightness and hue stay fixed.

use super::{Color, Model};
use crate::space::Gamut;

/// Per-channel overshoot tolerated when testing gamut membership.
pub const GAMUT_EPSILON: f64 = 0.000_075;

const JND: f64 = 0.02;
const EPSILON: f64 = 0.0001;

/// Euclidean distance between two colors in Oklab.
#[must_use]
pub fn delta_eok(a: &Color, b: &Color) -> f64 {
    let [l1, a1, b1] = a.to(Model::Oklab).coords();
    let [l2, a2, b2] = b.to(Model::Oklab).coords();
    ((l1 - l2).powi(2) + (a1 - a2).powi(2) + (b1 - b2).powi(2)).sqrt()
}

/// Clamp every channel of `color` into the unit cube of `gamut`.
fn clip(color: &Color, gamut: Gamut) -> Color {
    let rgb = color.to(Model::for_gamut(gamut));
    Color::new(rgb.model(), rgb.coords().map(|c| c.clamp(0.0, 1.0)), rgb.alpha())
}

pub(super) fn to_gamut_css(color: &Color, gamut: Gamut) -> Color {
    if color.in_gamut(gamut, 0.0) {
        return *color;
    }
    map_into(color, gamut).to(color.model())
}

fn map_into(color: &Color, gamut: Gamut) -> Color {
    let destination = Model::for_gamut(gamut);
    let origin = color.to(Model::Oklch);
    let [lightness, chroma, _] = origin.coords();

    if lightness >= 1.0 {
        return Color::new(destination, [1.0, 1.0, 1.0], color.alpha());
    }
    if lightness <= 0.0 {
        return Color::new(destination, [0.0, 0.0, 0.0], color.alpha());
    }
    if origin.in_gamut(gamut, 0.0) {
        return origin;
    }

    let mut current = origin;
    let mut clipped = clip(&current, gamut);
    if delta_eok(&clipped, &current) < JND {
        return clipped;
    }

    let (mut min, mut max) = (0.0, chroma);
    let mut min_in_gamut = true;
    while max - min > EPSILON {
        let mid = (min + max) / 2.0;
        let [l, _, h] = current.coords();
        current = Color::new(Model::Oklch, [l, mid, h], current.alpha());

        if min_in_gamut && current.in_gamut(gamut, 0.0) {
            min = mid;
            continue;
        }

        clipped = clip(&current, gamut);
        let delta = delta_eok(&clipped, &current);
        if delta < JND {
            if JND - delta < EPSILON {
                break;
            }
            min_in_gamut = false;
            min = mid;
        } else {
            max = mid;
        }
    }
    clipped
}

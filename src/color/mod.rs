//! Color values with just enough of CSS Color 4 to compute and render egal colors.
//!
//! A [`Color`] is a triple of coordinates tagged with the [`Model`] they are
//! expressed in, plus an alpha channel. Every model converts through CIE XYZ
//! (D65). The perceptual models come from `palette`; the RGB gamuts use the
//! CSS Color 4 matrices and sign-preserving transfer functions so that
//! out-of-gamut values survive a round trip; HCT lives in [`hct`].
//!
//! Hues may be NaN, which is how a powerless hue (CSS `none`) is represented.
//! NaN hues convert as 0.
//!
//! # Examples
//!
//! ```
//! use egal::color::{Color, Model};
//! use egal::space::Gamut;
//!
//! let red = Color::new(Model::Srgb, [1.0, 0.0, 0.0], 1.0);
//! let oklch = red.to(Model::Oklch);
//! assert!((oklch.coords()[0] - 0.628).abs() < 1e-3);
//! assert!(oklch.in_gamut(Gamut::Srgb, egal::color::GAMUT_EPSILON));
//! ```

#![allow(clippy::unreadable_literal, clippy::excessive_precision)]

mod format;
mod gamut;
mod hct;

use std::fmt;

use palette::convert::FromColorUnclamped;
use palette::white_point::{D50, D65};
use palette::{Hsl, Hsv, Hwb, Lab, Lch, Oklab, Oklch, Srgb, Xyz, encoding};

use crate::space::{ColorSpace, Gamut, OutputFormat};

pub use format::to_precision;
pub use gamut::{GAMUT_EPSILON, delta_eok};

/// D65 reference white, `Y = 1`.
pub(crate) const D65_WHITE: [f64; 3] = [
    0.3127 / 0.3290,
    1.0,
    (1.0 - 0.3127 - 0.3290) / 0.3290,
];

const XYZ_TO_LINEAR_SRGB: [[f64; 3]; 3] = [
    [3.2409699419045226, -1.537383177570094, -0.4986107602930034],
    [-0.9692436362808796, 1.8759675015077202, 0.04155505740717559],
    [0.05563007969699366, -0.20397695888897652, 1.0569715142428786],
];

const LINEAR_SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.41239079926595934, 0.357584339383878, 0.1804807884018343],
    [0.21263900587151027, 0.715168678767756, 0.07219231536073371],
    [0.01933081871559182, 0.11919477979462598, 0.9505321522496607],
];

const XYZ_TO_LINEAR_P3: [[f64; 3]; 3] = [
    [2.493496911941425, -0.9313836179191239, -0.40271078445071684],
    [-0.8294889695615747, 1.7626640603183463, 0.023624685841943577],
    [0.03584583024378447, -0.07617238926804182, 0.9568845240076872],
];

const LINEAR_P3_TO_XYZ: [[f64; 3]; 3] = [
    [0.4865709486482162, 0.26566769316909306, 0.1982172852343625],
    [0.2289745640697488, 0.6917385218365064, 0.079286914093745],
    [0.0, 0.04511338185890264, 1.043944368900976],
];

const XYZ_TO_LINEAR_REC2020: [[f64; 3]; 3] = [
    [1.7166511879712674, -0.35567078377639233, -0.25336628137365974],
    [-0.6666843518324892, 1.6164812366349395, 0.01576854581391113],
    [0.017639857445310783, -0.042770613257808524, 0.9421031212354738],
];

const LINEAR_REC2020_TO_XYZ: [[f64; 3]; 3] = [
    [0.6369580483012914, 0.14461690358620832, 0.1688809751641721],
    [0.2627002120112671, 0.6779980715188708, 0.05930171646986196],
    [0.0, 0.028072693049087428, 1.060985057710791],
];

// Bradford chromatic adaptation
const D65_TO_D50: [[f64; 3]; 3] = [
    [1.0479297925449969, 0.022946870601609652, -0.05019226628920524],
    [0.02962780877005599, 0.9904344267538799, -0.017073799063418826],
    [-0.009243040646204504, 0.015055191490298152, 0.7518742814281371],
];

const D50_TO_D65: [[f64; 3]; 3] = [
    [0.955473421488075, -0.02309845494876471, 0.06325924320057072],
    [-0.0283697093338637, 1.0099953980813041, 0.021041441191917323],
    [0.012314014864481998, -0.020507649298898964, 1.330365926242124],
];

const REC2020_ALPHA: f64 = 1.09929682680944;
const REC2020_BETA: f64 = 0.018053968510807;

// Below these a/b magnitudes a polar hue is powerless.
const OKLCH_ACHROMATIC: f64 = 0.0002;
const LCH_ACHROMATIC: f64 = 0.02;
const RGB_ACHROMATIC: f64 = 1e-7;

pub(crate) fn multiply(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Coordinate system a [`Color`] is expressed in.
///
/// | Model | Coordinates |
/// |-------|-------------|
/// | `Xyz` | CIE XYZ, D65, `Y` in `0..=1` |
/// | `Srgb`, `P3`, `Rec2020` | gamma-encoded R, G, B in `0..=1` |
/// | `Oklab` | L `0..=1`, a, b |
/// | `Oklch` | L `0..=1`, C, H degrees |
/// | `Lab` | CIE L* `0..=100`, a*, b* (D50) |
/// | `Lch` | CIE L* `0..=100`, C*, H degrees (D50) |
/// | `Hsl` | H degrees, S `0..=100`, L `0..=100` |
/// | `Hwb` | H degrees, W `0..=100`, B `0..=100` |
/// | `Hct` | H degrees, C, T `0..=100` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    Xyz,
    Srgb,
    P3,
    Rec2020,
    Oklab,
    Oklch,
    Lab,
    Lch,
    Hsl,
    Hwb,
    Hct,
}

impl Model {
    /// RGB model whose unit cube is `gamut`.
    #[must_use]
    pub const fn for_gamut(gamut: Gamut) -> Self {
        match gamut {
            Gamut::Srgb => Self::Srgb,
            Gamut::P3 => Self::P3,
            Gamut::Rec2020 => Self::Rec2020,
        }
    }

    #[must_use]
    pub const fn for_output(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Hsl => Self::Hsl,
            OutputFormat::Hwb => Self::Hwb,
            OutputFormat::Lch => Self::Lch,
            OutputFormat::Lab => Self::Lab,
            OutputFormat::Oklch => Self::Oklch,
            OutputFormat::Oklab => Self::Oklab,
            OutputFormat::Srgb => Self::Srgb,
        }
    }

    #[must_use]
    pub const fn for_space(space: ColorSpace) -> Self {
        match space {
            ColorSpace::Oklch => Self::Oklch,
            ColorSpace::Hct => Self::Hct,
        }
    }

    /// Index of the hue coordinate, if the model is cylindrical.
    #[must_use]
    pub const fn hue_index(&self) -> Option<usize> {
        match self {
            Self::Oklch | Self::Lch => Some(2),
            Self::Hsl | Self::Hwb | Self::Hct => Some(0),
            _ => None,
        }
    }
}

/// A color in some [`Model`], with alpha in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    model: Model,
    coords: [f64; 3],
    alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn new(model: Model, coords: [f64; 3], alpha: f64) -> Self {
        Self {
            model,
            coords,
            alpha,
        }
    }

    /// Build an opaque color from lightness, chroma and hue in `space`.
    #[must_use]
    pub const fn from_space(space: ColorSpace, lightness: f64, chroma: f64, hue: f64) -> Self {
        let coords = match space {
            ColorSpace::Oklch => [lightness, chroma, hue],
            ColorSpace::Hct => [hue, chroma, lightness],
        };
        Self::new(Model::for_space(space), coords, 1.0)
    }

    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub const fn model(&self) -> Model {
        self.model
    }

    #[must_use]
    pub const fn coords(&self) -> [f64; 3] {
        self.coords
    }

    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// CIE XYZ (D65) coordinates of this color.
    #[must_use]
    pub fn to_xyz(&self) -> [f64; 3] {
        let mut c = self.coords;
        if let Some(i) = self.model.hue_index()
            && c[i].is_nan()
        {
            c[i] = 0.0;
        }

        match self.model {
            Model::Xyz => c,
            Model::Srgb => multiply(&LINEAR_SRGB_TO_XYZ, c.map(srgb_to_linear)),
            Model::P3 => multiply(&LINEAR_P3_TO_XYZ, c.map(srgb_to_linear)),
            Model::Rec2020 => multiply(&LINEAR_REC2020_TO_XYZ, c.map(rec2020_to_linear)),
            Model::Oklab => oklab_to_xyz(Oklab::new(c[0], c[1], c[2])),
            Model::Oklch => {
                oklab_to_xyz(Oklab::from_color_unclamped(Oklch::<f64>::new(c[0], c[1], c[2])))
            }
            Model::Lab => lab_to_xyz(Lab::new(c[0], c[1], c[2])),
            Model::Lch => lab_to_xyz(Lab::from_color_unclamped(Lch::<D50, f64>::new(c[0], c[1], c[2]))),
            Model::Hsl => {
                let hsl = Hsl::<encoding::Srgb, f64>::new(c[0], c[1] / 100.0, c[2] / 100.0);
                let rgb = Srgb::<f64>::from_color_unclamped(hsl);
                Self::new(Model::Srgb, [rgb.red, rgb.green, rgb.blue], self.alpha).to_xyz()
            }
            Model::Hwb => {
                let hwb = Hwb::<encoding::Srgb, f64>::new(c[0], c[1] / 100.0, c[2] / 100.0);
                let hsv = Hsv::<encoding::Srgb, f64>::from_color_unclamped(hwb);
                let rgb = Srgb::<f64>::from_color_unclamped(hsv);
                Self::new(Model::Srgb, [rgb.red, rgb.green, rgb.blue], self.alpha).to_xyz()
            }
            Model::Hct => hct::hct_to_xyz(c),
        }
    }

    /// Express CIE XYZ (D65) coordinates in `model`.
    #[must_use]
    pub fn from_xyz(model: Model, xyz: [f64; 3], alpha: f64) -> Self {
        let coords = match model {
            Model::Xyz => xyz,
            Model::Srgb => multiply(&XYZ_TO_LINEAR_SRGB, xyz).map(linear_to_srgb),
            Model::P3 => multiply(&XYZ_TO_LINEAR_P3, xyz).map(linear_to_srgb),
            Model::Rec2020 => multiply(&XYZ_TO_LINEAR_REC2020, xyz).map(linear_to_rec2020),
            Model::Oklab => {
                let lab = xyz_to_oklab(xyz);
                [lab.l, lab.a, lab.b]
            }
            Model::Oklch => {
                let lab = xyz_to_oklab(xyz);
                let lch = Oklch::<f64>::from_color_unclamped(lab);
                let hue = if lab.a.abs() < OKLCH_ACHROMATIC && lab.b.abs() < OKLCH_ACHROMATIC {
                    f64::NAN
                } else {
                    lch.hue.into_positive_degrees()
                };
                [lch.l, lch.chroma, hue]
            }
            Model::Lab => {
                let lab = xyz_to_lab(xyz);
                [lab.l, lab.a, lab.b]
            }
            Model::Lch => {
                let lab = xyz_to_lab(xyz);
                let lch = Lch::<D50, f64>::from_color_unclamped(lab);
                let hue = if lab.a.abs() < LCH_ACHROMATIC && lab.b.abs() < LCH_ACHROMATIC {
                    f64::NAN
                } else {
                    lch.hue.into_positive_degrees()
                };
                [lch.l, lch.chroma, hue]
            }
            Model::Hsl => {
                let rgb = xyz_to_srgb(xyz);
                let hsl = Hsl::<encoding::Srgb, f64>::from_color_unclamped(rgb);
                let hue = achromatic_rgb_hue(rgb, hsl.hue.into_positive_degrees());
                // white overshoots 1 by rounding, which sends saturation to inf
                let saturation = if hue.is_nan() || !hsl.saturation.is_finite() {
                    0.0
                } else {
                    hsl.saturation
                };
                [hue, saturation * 100.0, hsl.lightness * 100.0]
            }
            Model::Hwb => {
                let rgb = xyz_to_srgb(xyz);
                let hsv = Hsv::<encoding::Srgb, f64>::from_color_unclamped(rgb);
                let hwb = Hwb::<encoding::Srgb, f64>::from_color_unclamped(hsv);
                let hue = achromatic_rgb_hue(rgb, hwb.hue.into_positive_degrees());
                [hue, hwb.whiteness * 100.0, hwb.blackness * 100.0]
            }
            Model::Hct => hct::xyz_to_hct(xyz),
        };
        Self::new(model, coords, alpha)
    }

    /// Convert to `model`. Converting to the current model is the identity,
    /// so powerless hues are preserved.
    #[must_use]
    pub fn to(&self, model: Model) -> Self {
        if model == self.model {
            *self
        } else {
            Self::from_xyz(model, self.to_xyz(), self.alpha)
        }
    }

    /// Whether the color fits the RGB cube of `gamut`, allowing each encoded
    /// channel to overshoot by `epsilon`.
    #[must_use]
    pub fn in_gamut(&self, gamut: Gamut, epsilon: f64) -> bool {
        self.to(Model::for_gamut(gamut))
            .coords
            .iter()
            .all(|&c| c >= -epsilon && c <= 1.0 + epsilon)
    }

    /// Map into `gamut` with the CSS Color 4 algorithm, keeping the model.
    #[must_use]
    pub fn to_gamut(&self, gamut: Gamut) -> Self {
        gamut::to_gamut_css(self, gamut)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::serialize(self))
    }
}

fn oklab_to_xyz(lab: Oklab<f64>) -> [f64; 3] {
    let xyz = Xyz::<D65, f64>::from_color_unclamped(lab);
    [xyz.x, xyz.y, xyz.z]
}

fn xyz_to_oklab(xyz: [f64; 3]) -> Oklab<f64> {
    Oklab::from_color_unclamped(Xyz::<D65, f64>::new(xyz[0], xyz[1], xyz[2]))
}

fn lab_to_xyz(lab: Lab<D50, f64>) -> [f64; 3] {
    let d50 = Xyz::<D50, f64>::from_color_unclamped(lab);
    multiply(&D50_TO_D65, [d50.x, d50.y, d50.z])
}

fn xyz_to_lab(xyz: [f64; 3]) -> Lab<D50, f64> {
    let [x, y, z] = multiply(&D65_TO_D50, xyz);
    Lab::from_color_unclamped(Xyz::<D50, f64>::new(x, y, z))
}

fn xyz_to_srgb(xyz: [f64; 3]) -> Srgb<f64> {
    let [r, g, b] = multiply(&XYZ_TO_LINEAR_SRGB, xyz).map(linear_to_srgb);
    Srgb::new(r, g, b)
}

fn achromatic_rgb_hue(rgb: Srgb<f64>, hue: f64) -> f64 {
    let max = rgb.red.max(rgb.green).max(rgb.blue);
    let min = rgb.red.min(rgb.green).min(rgb.blue);
    if max - min < RGB_ACHROMATIC { f64::NAN } else { hue }
}

fn srgb_to_linear(v: f64) -> f64 {
    let abs = v.abs();
    if abs <= 0.04045 {
        v / 12.92
    } else {
        ((abs + 0.055) / 1.055).powf(2.4).copysign(v)
    }
}

fn linear_to_srgb(v: f64) -> f64 {
    let abs = v.abs();
    if abs > 0.0031308 {
        (1.055 * abs.powf(1.0 / 2.4) - 0.055).copysign(v)
    } else {
        12.92 * v
    }
}

fn rec2020_to_linear(v: f64) -> f64 {
    let abs = v.abs();
    if abs < REC2020_BETA * 4.5 {
        v / 4.5
    } else {
        ((abs + REC2020_ALPHA - 1.0) / REC2020_ALPHA)
            .powf(1.0 / 0.45)
            .copysign(v)
    }
}

fn linear_to_rec2020(v: f64) -> f64 {
    let abs = v.abs();
    if abs >= REC2020_BETA {
        (REC2020_ALPHA * abs.powf(0.45) - (REC2020_ALPHA - 1.0)).copysign(v)
    } else {
        4.5 * v
    }
}

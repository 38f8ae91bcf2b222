//! HCT (hue, chroma, tone): CAM16 hue and chroma combined with CIE L* tone.
//!
//! Coordinates are `[hue, chroma, tone]`. The appearance model is evaluated
//! under fixed viewing conditions: D65 white, an adapting luminance of
//! `200/π · Y(L*=50)`, a mid-gray background and an average surround.

use std::f64::consts::{PI, TAU};
use std::sync::LazyLock;

use super::{D65_WHITE, multiply};

const CAT16: [[f64; 3]; 3] = [
    [0.401288, 0.650173, -0.051461],
    [-0.250268, 1.204414, 0.045854],
    [-0.002079, 0.048952, 0.953127],
];

const CAT16_INV: [[f64; 3]; 3] = [
    [1.8620678550872327, -1.0112546305316843, 0.14918677544445175],
    [0.38752654323613717, 0.6214474419314753, -0.008973985167612518],
    [-0.015841498849333856, -0.03412293802851557, 1.0499644368778496],
];

const M1: [[f64; 3]; 3] = [
    [460.0, 451.0, 288.0],
    [460.0, -891.0, -261.0],
    [460.0, -220.0, -6300.0],
];

const ADAPTED_COEF: f64 = 0.42;
const ADAPTED_COEF_INV: f64 = 1.0 / ADAPTED_COEF;

const KAPPA: f64 = 24389.0 / 27.0;
const EPSILON: f64 = 216.0 / 24389.0;

const MAX_ATTEMPTS: usize = 15;
const THRESHOLD: f64 = 2e-12;

/// Precomputed CAM16 environment.
#[derive(Debug, Clone)]
struct ViewingConditions {
    fl: f64,
    n: f64,
    z: f64,
    nbb: f64,
    ncb: f64,
    c: f64,
    nc: f64,
    aw: f64,
    d_rgb: [f64; 3],
    d_rgb_inv: [f64; 3],
}

impl ViewingConditions {
    fn standard() -> Self {
        let adapting_luminance = 200.0 / PI * from_lstar(50.0);
        let background_luminance = from_lstar(50.0) * 100.0;
        Self::new(adapting_luminance, background_luminance)
    }

    fn new(la: f64, yb: f64) -> Self {
        // average surround
        let (f, c, nc) = (1.0, 0.69, 1.0);

        let xyz_w = D65_WHITE.map(|v| v * 100.0);
        let yw = xyz_w[1];
        let rgb_w = multiply(&CAT16, xyz_w);

        let k = 1.0 / (5.0 * la + 1.0);
        let k4 = k.powi(4);
        let fl = k4 * la + 0.1 * (1.0 - k4) * (1.0 - k4) * (5.0 * la).cbrt();

        let n = yb / yw;
        let z = 1.48 + n.sqrt();
        let nbb = 0.725 * n.powf(-0.2);

        let d = (f * (1.0 - 1.0 / 3.6 * ((-la - 42.0) / 92.0).exp())).clamp(0.0, 1.0);
        let d_rgb = rgb_w.map(|v| 1.0 + (yw / v - 1.0) * d);
        let d_rgb_inv = d_rgb.map(|v| 1.0 / v);

        let rgb_cw = [rgb_w[0] * d_rgb[0], rgb_w[1] * d_rgb[1], rgb_w[2] * d_rgb[2]];
        let rgb_aw = adapt(rgb_cw, fl);
        let aw = nbb * (2.0 * rgb_aw[0] + rgb_aw[1] + 0.05 * rgb_aw[2]);

        Self {
            fl,
            n,
            z,
            nbb,
            ncb: nbb,
            c,
            nc,
            aw,
            d_rgb,
            d_rgb_inv,
        }
    }
}

static VIEWING_CONDITIONS: LazyLock<ViewingConditions> = LazyLock::new(ViewingConditions::standard);

fn spow(x: f64, p: f64) -> f64 {
    x.abs().powf(p).copysign(x)
}

fn zdiv(n: f64, d: f64) -> f64 {
    if d == 0.0 { 0.0 } else { n / d }
}

fn adapt(coords: [f64; 3], fl: f64) -> [f64; 3] {
    coords.map(|c| {
        let x = spow(fl * c.abs() * 0.01, ADAPTED_COEF);
        400.0 * x.copysign(c) / (x + 27.13)
    })
}

fn unadapt(adapted: [f64; 3], fl: f64) -> [f64; 3] {
    let constant = 100.0 / fl * 27.13f64.powf(ADAPTED_COEF_INV);
    adapted.map(|c| {
        let cabs = c.abs();
        (constant * spow(cabs / (400.0 - cabs), ADAPTED_COEF_INV)).copysign(c)
    })
}

/// Relative luminance `Y` (0..=1) for a CIE L* value.
pub(crate) fn from_lstar(lstar: f64) -> f64 {
    if lstar > 8.0 {
        ((lstar + 16.0) / 116.0).powi(3)
    } else {
        lstar / KAPPA
    }
}

/// CIE L* for a relative luminance `Y` (0..=1).
pub(crate) fn to_lstar(y: f64) -> f64 {
    let fy = if y > EPSILON {
        y.cbrt()
    } else {
        (KAPPA * y + 16.0) / 116.0
    };
    116.0 * fy - 16.0
}

/// CAM16 lightness `J`, chroma `C` and hue `h` (degrees) to D65 XYZ.
fn cam16_to_xyz(j: f64, chroma: f64, hue: f64) -> [f64; 3] {
    let env = &*VIEWING_CONDITIONS;
    let h_rad = hue.to_radians();
    let (sin_h, cos_h) = h_rad.sin_cos();

    let j_root = spow(j, 0.5) * 0.1;
    let alpha = zdiv(chroma, j_root);
    let t = spow(alpha * (1.64 - 0.29f64.powf(env.n)).powf(-0.73), 10.0 / 9.0);
    let et = 0.25 * ((h_rad + 2.0).cos() + 3.8);
    let a_achromatic = env.aw * spow(j_root, 2.0 / env.c / env.z);

    let p1 = 5e4 / 13.0 * env.nc * env.ncb * et;
    let p2 = a_achromatic / env.nbb;
    let r = 23.0 * (p2 + 0.305) * zdiv(t, 23.0 * p1 + t * (11.0 * cos_h + 108.0 * sin_h));
    let a = r * cos_h;
    let b = r * sin_h;

    let rgb_c = unadapt(multiply(&M1, [p2, a, b]).map(|c| c / 1403.0), env.fl);
    let rgb = [
        rgb_c[0] * env.d_rgb_inv[0],
        rgb_c[1] * env.d_rgb_inv[1],
        rgb_c[2] * env.d_rgb_inv[2],
    ];
    multiply(&CAT16_INV, rgb).map(|c| c / 100.0)
}

/// D65 XYZ to CAM16 `(J, C, h)`.
fn xyz_to_cam16(xyz: [f64; 3]) -> (f64, f64, f64) {
    let env = &*VIEWING_CONDITIONS;
    let xyz100 = xyz.map(|c| c * 100.0);
    let cat = multiply(&CAT16, xyz100);
    let rgb_a = adapt(
        [cat[0] * env.d_rgb[0], cat[1] * env.d_rgb[1], cat[2] * env.d_rgb[2]],
        env.fl,
    );

    let a = rgb_a[0] + (-12.0 * rgb_a[1] + rgb_a[2]) / 11.0;
    let b = (rgb_a[0] + rgb_a[1] - 2.0 * rgb_a[2]) / 9.0;
    let h_rad = b.atan2(a).rem_euclid(TAU);

    let et = 0.25 * ((h_rad + 2.0).cos() + 3.8);
    let t = 5e4 / 13.0
        * env.nc
        * env.ncb
        * zdiv(
            et * a.hypot(b),
            rgb_a[0] + rgb_a[1] + 1.05 * rgb_a[2] + 0.305,
        );
    let alpha = spow(t, 0.9) * (1.64 - 0.29f64.powf(env.n)).powf(0.73);

    let achromatic = env.nbb * (2.0 * rgb_a[0] + rgb_a[1] + 0.05 * rgb_a[2]);
    let j_root = spow(achromatic / env.aw, 0.5 * env.c * env.z);

    let j = 100.0 * spow(j_root, 2.0);
    let chroma = alpha * j_root;
    (j, chroma, h_rad.to_degrees())
}

/// HCT `[hue, chroma, tone]` to D65 XYZ.
///
/// Tone fixes `Y` exactly, so the CAM16 lightness is solved for with a few
/// Newton steps starting from a polynomial fit.
pub(crate) fn hct_to_xyz(coords: [f64; 3]) -> [f64; 3] {
    let [hue, chroma, tone] = coords;
    if tone == 0.0 {
        return [0.0, 0.0, 0.0];
    }

    let y = from_lstar(tone);
    let mut j = if tone > 0.0 {
        0.00379058511492914 * tone.powi(2) + 0.608983189401032 * tone
            + 0.9155088574762233
    } else {
        9.514440756550361e-6 * tone.powi(2) + 0.08693057439788597 * tone
            - 21.928975842194614
    };

    let mut last = f64::INFINITY;
    for _ in 0..=MAX_ATTEMPTS {
        let xyz = cam16_to_xyz(j, chroma, hue);
        let delta = (xyz[1] - y).abs();
        if delta < last {
            if delta <= THRESHOLD {
                return xyz;
            }
            last = delta;
        }
        j -= (xyz[1] - y) * j / (2.0 * xyz[1]);
    }

    cam16_to_xyz(j, chroma, hue)
}

/// D65 XYZ to HCT `[hue, chroma, tone]`.
pub(crate) fn xyz_to_hct(xyz: [f64; 3]) -> [f64; 3] {
    let tone = to_lstar(xyz[1]);
    if tone == 0.0 {
        return [0.0, 0.0, 0.0];
    }
    let (_, chroma, hue) = xyz_to_cam16(xyz);
    [hue.rem_euclid(360.0), chroma, tone]
}

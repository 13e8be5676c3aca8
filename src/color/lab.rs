//! CIE L*a*b* conversion and color-difference formulas.
//!
//! Conversion goes sRGB -> linear RGB -> XYZ (D65 reference white) -> L*a*b*.
//! Two distances are provided: the Euclidean CIE76 and the perceptual
//! CIEDE2000 (with unit weighting factors `kL = kC = kH = 1`).

use crate::color::Color;

// D65 reference white, 2° observer, scaled to Y = 100.
const REF_X: f64 = 95.047;
const REF_Y: f64 = 100.0;
const REF_Z: f64 = 108.883;

const EPSILON: f64 = 0.008856;
const KAPPA_SLOPE: f64 = 7.787;

const POW25_7: f64 = 6_103_515_625.0;

/// Color in the CIE L*a*b* space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabColor {
    /// Lightness, `0..=100`.
    pub l: f64,
    /// Green-red axis.
    pub a: f64,
    /// Blue-yellow axis.
    pub b: f64,
}

impl LabColor {
    /// Converts an 8-bit sRGB color.
    pub fn from_rgb(color: Color) -> Self {
        let r = srgb_to_linear(color.r) * 100.0;
        let g = srgb_to_linear(color.g) * 100.0;
        let b = srgb_to_linear(color.b) * 100.0;

        let x = r * 0.4124 + g * 0.3576 + b * 0.1805;
        let y = r * 0.2126 + g * 0.7152 + b * 0.0722;
        let z = r * 0.0193 + g * 0.1192 + b * 0.9505;

        let fx = lab_f(x / REF_X);
        let fy = lab_f(y / REF_Y);
        let fz = lab_f(z / REF_Z);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}

impl From<Color> for LabColor {
    fn from(color: Color) -> Self {
        Self::from_rgb(color)
    }
}

fn srgb_to_linear(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

fn lab_f(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA_SLOPE * t + 16.0 / 116.0
    }
}

/// Euclidean distance in L*a*b* (CIE 1976).
pub fn cie76(lab1: &LabColor, lab2: &LabColor) -> f64 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// CIEDE2000 color difference.
pub fn ciede2000(lab1: &LabColor, lab2: &LabColor) -> f64 {
    let c1 = lab1.a.hypot(lab1.b);
    let c2 = lab2.a.hypot(lab2.b);
    let c_bar7 = ((c1 + c2) / 2.0).powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt());

    let a1p = (1.0 + g) * lab1.a;
    let a2p = (1.0 + g) * lab2.a;
    let c1p = a1p.hypot(lab1.b);
    let c2p = a2p.hypot(lab2.b);
    let h1p = hue_deg(lab1.b, a1p);
    let h2p = hue_deg(lab2.b, a2p);

    let dlp = lab2.l - lab1.l;
    let dcp = c2p - c1p;
    let chroma_product = c1p * c2p;
    let dhp = if chroma_product == 0.0 {
        0.0
    } else {
        let diff = h2p - h1p;
        if diff.abs() <= 180.0 {
            diff
        } else if diff > 180.0 {
            diff - 360.0
        } else {
            diff + 360.0
        }
    };
    let d_hp = 2.0 * chroma_product.sqrt() * (dhp.to_radians() / 2.0).sin();

    let l_bar = (lab1.l + lab2.l) / 2.0;
    let c_bar_p = (c1p + c2p) / 2.0;
    let h_bar_p = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_p - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_p).to_radians().cos()
        + 0.32 * (3.0 * h_bar_p + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar_p - 63.0).to_radians().cos();
    let d_theta = 30.0 * (-((h_bar_p - 275.0) / 25.0).powi(2)).exp();
    let c_bar_p7 = c_bar_p.powi(7);
    let r_c = 2.0 * (c_bar_p7 / (c_bar_p7 + POW25_7)).sqrt();
    let l50 = (l_bar - 50.0).powi(2);
    let s_l = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
    let s_c = 1.0 + 0.045 * c_bar_p;
    let s_h = 1.0 + 0.015 * c_bar_p * t;
    let r_t = -(2.0 * d_theta).to_radians().sin() * r_c;

    let dl = dlp / s_l;
    let dc = dcp / s_c;
    let dh = d_hp / s_h;
    (dl * dl + dc * dc + dh * dh + r_t * dc * dh).sqrt()
}

fn hue_deg(b: f64, a_prime: f64) -> f64 {
    if b == 0.0 && a_prime == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a_prime).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

//! Colors and the perceptual color-distance oracle.
//!
//! `same_within_tolerance` avoids the expensive CIEDE2000 formula where it can:
//! CIE76 is bounded by `0.695 * ΔE00 <= ΔE76 <= 6.2 * ΔE00`, so a cheap
//! Euclidean distance is enough to settle most pairs.

use crate::util::{LooksSameError, LooksSameResult};

pub mod lab;

pub use lab::{cie76, ciede2000, LabColor};

/// Just noticeable difference: CIEDE2000 distances below this value are
/// indistinguishable to a typical observer.
pub const JND: f64 = 2.3;

const CIE76_UPPER_FACTOR: f64 = 6.2;
const CIE76_LOWER_FACTOR: f64 = 0.695;

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Default highlight color for diff images (`#ff00ff`).
    pub const MAGENTA: Color = Color::new(255, 0, 255);

    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb` (the leading `#` is optional).
    pub fn parse(input: &str) -> LooksSameResult<Self> {
        let invalid = || LooksSameError::InvalidColor {
            input: input.to_owned(),
        };
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Gamma-weighted luma (YIQ Y component).
    #[inline]
    pub(crate) fn luma(self) -> f64 {
        f64::from(self.r) * 0.29889531
            + f64::from(self.g) * 0.58662247
            + f64::from(self.b) * 0.11448223
    }
}

impl std::str::FromStr for Color {
    type Err = LooksSameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Exact channel equality.
#[inline]
pub fn same_color(c1: Color, c2: Color) -> bool {
    c1 == c2
}

/// Returns true if the CIEDE2000 distance between the colors is below
/// `tolerance`.
pub fn same_within_tolerance(c1: Color, c2: Color, tolerance: f64) -> bool {
    if same_color(c1, c2) {
        return true;
    }

    let lab1 = LabColor::from_rgb(c1);
    let lab2 = LabColor::from_rgb(c2);

    let approx = cie76(&lab1, &lab2);
    if approx >= tolerance * CIE76_UPPER_FACTOR {
        return false;
    }
    if approx <= tolerance * CIE76_LOWER_FACTOR {
        return true;
    }

    ciede2000(&lab1, &lab2) < tolerance
}

/// Compares a single pair of colors, defaulting the tolerance to [`JND`].
pub fn colors(c1: Color, c2: Color, tolerance: Option<f64>) -> bool {
    same_within_tolerance(c1, c2, tolerance.unwrap_or(JND))
}

#[cfg(test)]
mod tests {
    use super::{colors, same_color, same_within_tolerance, Color, JND};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn parse_accepts_long_and_short_hex() {
        assert_eq!(Color::parse("#ff00ff").unwrap(), Color::MAGENTA);
        assert_eq!(Color::parse("0a0B0c").unwrap(), Color::new(10, 11, 12));
        assert_eq!(Color::parse("#f0a").unwrap(), Color::new(255, 0, 170));
        assert!(Color::parse("#ff00f").is_err());
        assert!(Color::parse("#gg0000").is_err());
    }

    #[test]
    fn parse_rejects_signed_channels() {
        assert!(Color::parse("#+f+f+f").is_err());
        assert!(Color::parse("+ff+ff").is_err());
        assert!(Color::parse("#+fa").is_err());
    }

    #[test]
    fn identical_colors_are_always_same() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let c = Color::new(rng.random(), rng.random(), rng.random());
            assert!(colors(c, c, None));
            assert!(same_within_tolerance(c, c, 0.0));
        }
    }

    #[test]
    fn exact_match_implies_tolerant_match() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let c1 = Color::new(rng.random(), rng.random(), rng.random());
            let c2 = if rng.random_bool(0.5) {
                c1
            } else {
                Color::new(rng.random(), rng.random(), rng.random())
            };
            let tolerance = rng.random_range(0.0..10.0);
            if same_color(c1, c2) {
                assert!(same_within_tolerance(c1, c2, tolerance));
            }
        }
    }

    #[test]
    fn nearly_identical_colors_are_same_at_jnd() {
        assert!(colors(Color::new(100, 100, 100), Color::new(101, 100, 100), None));
        assert!(!colors(Color::new(0, 0, 0), Color::new(255, 255, 255), None));
    }

    #[test]
    fn tolerance_controls_the_verdict() {
        let c1 = Color::new(130, 80, 60);
        let c2 = Color::new(140, 80, 60);
        assert!(!colors(c1, c2, Some(JND)));
        assert!(colors(c1, c2, Some(50.0)));
    }
}

//! Comparison options.

use crate::color::{Color, JND};
use crate::diff::CLUSTERS_SIZE;
use crate::util::{LooksSameError, LooksSameResult};

/// Options controlling a comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct CompareOptions {
    /// Only exact color equality counts as a match.
    pub strict: bool,
    /// CIEDE2000 tolerance; `None` means [`JND`]. Conflicts with `strict`.
    pub tolerance: Option<f64>,
    /// Forgive mismatches caused by antialiasing.
    pub ignore_antialiasing: bool,
    /// Brightness tolerance for the antialiasing edge checks.
    pub antialiasing_tolerance: f64,
    /// Forgive one blinking text caret.
    pub ignore_caret: bool,
    /// Device pixel ratio; the expected caret width in pixels.
    pub pixel_ratio: f64,
    /// Stop at the first mismatching pixel.
    pub stop_on_first_fail: bool,
    /// Group mismatches into clusters.
    pub should_cluster: bool,
    /// Cluster radius in pixels; zero selects [`CLUSTERS_SIZE`].
    pub cluster_radius: usize,
    /// Materialize a highlighted diff image.
    pub create_diff_image: bool,
    /// Color used to paint differing pixels in the diff image.
    pub highlight_color: Color,
    /// Scan rows in parallel when the pipeline allows it (feature `rayon`).
    pub parallel: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            strict: false,
            tolerance: None,
            ignore_antialiasing: true,
            antialiasing_tolerance: 0.0,
            ignore_caret: true,
            pixel_ratio: 1.0,
            stop_on_first_fail: false,
            should_cluster: false,
            cluster_radius: CLUSTERS_SIZE,
            create_diff_image: false,
            highlight_color: Color::MAGENTA,
            parallel: false,
        }
    }
}

impl CompareOptions {
    /// Checks option consistency. Called before any pixel is visited.
    pub fn validate(&self) -> LooksSameResult<()> {
        if self.strict && self.tolerance.is_some() {
            return Err(LooksSameError::StrictWithTolerance);
        }
        if let Some(tolerance) = self.tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(LooksSameError::InvalidOption {
                    name: "tolerance",
                    reason: "must be a finite non-negative number",
                });
            }
        }
        if !self.antialiasing_tolerance.is_finite() || self.antialiasing_tolerance < 0.0 {
            return Err(LooksSameError::InvalidOption {
                name: "antialiasing_tolerance",
                reason: "must be a finite non-negative number",
            });
        }
        if !self.pixel_ratio.is_finite() || self.pixel_ratio < 0.0 {
            return Err(LooksSameError::InvalidOption {
                name: "pixel_ratio",
                reason: "must be a finite non-negative number",
            });
        }
        Ok(())
    }

    /// Tolerance actually used by the non-strict comparator.
    pub fn resolved_tolerance(&self) -> f64 {
        self.tolerance.unwrap_or(JND)
    }
}

#[cfg(test)]
mod tests {
    use super::CompareOptions;
    use crate::util::LooksSameError;

    #[test]
    fn defaults_ignore_antialiasing_and_caret() {
        let opts = CompareOptions::default();
        assert!(opts.ignore_antialiasing);
        assert!(opts.ignore_caret);
        assert!(!opts.strict);
        assert_eq!(opts.resolved_tolerance(), 2.3);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn strict_alone_is_valid() {
        let opts = CompareOptions {
            strict: true,
            ..CompareOptions::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn rejects_negative_values() {
        let opts = CompareOptions {
            tolerance: Some(-1.0),
            ..CompareOptions::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(LooksSameError::InvalidOption { name: "tolerance", .. })
        ));

        let opts = CompareOptions {
            pixel_ratio: f64::NAN,
            ..CompareOptions::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(LooksSameError::InvalidOption { name: "pixel_ratio", .. })
        ));
    }
}

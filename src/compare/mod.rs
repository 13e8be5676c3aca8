//! Pixel comparators and their composition into a pipeline.
//!
//! The pipeline is built once per comparison pass from [`CompareOptions`]:
//! a base color check (exact or tolerance based), optionally wrapped by the
//! antialiasing filter, optionally wrapped by the caret detector. Every
//! wrapper runs its base first and only consults its own check for pixels
//! the base rejected, so a wrapper can forgive a mismatch but never turn a
//! match into a diff.

use crate::color::{same_color, same_within_tolerance, Color};
use crate::image::ImageView;
use crate::util::LooksSameResult;

pub mod antialiasing;
pub mod caret;
mod options;

pub use antialiasing::AntialiasingFilter;
pub use caret::{CaretDetector, CaretState};
pub use options::CompareOptions;

/// Everything a comparator may look at for one pixel.
///
/// `width` and `height` are the dimensions of the overlap of both images;
/// coordinates are relative to the views.
#[derive(Clone, Copy, Debug)]
pub struct PixelContext<'a> {
    pub color1: Color,
    pub color2: Color,
    pub first: &'a ImageView<'a>,
    pub second: &'a ImageView<'a>,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Composable pixel comparator.
#[derive(Clone, Debug, PartialEq)]
pub enum Comparator {
    /// Exact channel equality.
    Exact,
    /// CIEDE2000 distance below `tolerance`.
    Tolerant { tolerance: f64 },
    /// Base comparator, then antialiasing forgiveness.
    Antialiasing {
        base: Box<Comparator>,
        filter: AntialiasingFilter,
    },
    /// Base comparator, then caret forgiveness.
    Caret {
        base: Box<Comparator>,
        detector: CaretDetector,
    },
}

impl Comparator {
    /// Builds the pipeline described by `opts`. Fails on invalid options.
    pub fn build(opts: &CompareOptions) -> LooksSameResult<Self> {
        opts.validate()?;

        let mut comparator = if opts.strict {
            Comparator::Exact
        } else {
            Comparator::Tolerant {
                tolerance: opts.resolved_tolerance(),
            }
        };

        if opts.ignore_antialiasing {
            comparator = Comparator::Antialiasing {
                base: Box::new(comparator),
                filter: AntialiasingFilter::new(opts.antialiasing_tolerance),
            };
        }

        if opts.ignore_caret {
            comparator = Comparator::Caret {
                base: Box::new(comparator),
                detector: CaretDetector::new(opts.pixel_ratio),
            };
        }

        Ok(comparator)
    }

    /// Returns true if the two pixels look the same.
    pub fn compare(&mut self, ctx: &PixelContext<'_>) -> bool {
        match self {
            Comparator::Exact => same_color(ctx.color1, ctx.color2),
            Comparator::Tolerant { tolerance } => {
                same_within_tolerance(ctx.color1, ctx.color2, *tolerance)
            }
            Comparator::Antialiasing { base, filter } => base.compare(ctx) || filter.check(ctx),
            Comparator::Caret { base, detector } => base.compare(ctx) || detector.validate(ctx),
        }
    }

    /// True if the pipeline carries per-pass state and therefore depends on
    /// the row-major visiting order.
    pub fn is_stateful(&self) -> bool {
        match self {
            Comparator::Exact | Comparator::Tolerant { .. } => false,
            Comparator::Antialiasing { base, .. } => base.is_stateful(),
            Comparator::Caret { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CompareOptions, Comparator, PixelContext};
    use crate::color::JND;
    use crate::image::ImageView;
    use crate::util::LooksSameError;

    #[test]
    fn default_pipeline_layers_caret_over_antialiasing_over_tolerance() {
        let comparator = Comparator::build(&CompareOptions::default()).unwrap();
        let Comparator::Caret { base, detector } = comparator else {
            panic!("caret layer expected on top");
        };
        assert_eq!(detector.pixel_ratio(), 1);
        let Comparator::Antialiasing { base, filter } = *base else {
            panic!("antialiasing layer expected");
        };
        assert_eq!(filter.brightness_tolerance(), 0.0);
        assert_eq!(*base, Comparator::Tolerant { tolerance: JND });
    }

    #[test]
    fn strict_pipeline_without_filters_is_exact() {
        let opts = CompareOptions {
            strict: true,
            ignore_antialiasing: false,
            ignore_caret: false,
            ..CompareOptions::default()
        };
        let comparator = Comparator::build(&opts).unwrap();
        assert_eq!(comparator, Comparator::Exact);
        assert!(!comparator.is_stateful());
    }

    #[test]
    fn strict_with_tolerance_is_rejected() {
        let opts = CompareOptions {
            strict: true,
            tolerance: Some(5.0),
            ..CompareOptions::default()
        };
        assert_eq!(
            Comparator::build(&opts).unwrap_err(),
            LooksSameError::StrictWithTolerance
        );
    }

    #[test]
    fn wrappers_never_reject_a_base_match() {
        let data = [10u8, 20, 30, 10, 20, 30, 10, 20, 30, 10, 20, 30];
        let view = ImageView::from_rgb(&data, 2, 2).unwrap();
        let mut comparator = Comparator::build(&CompareOptions::default()).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                let ctx = PixelContext {
                    color1: view.pixel(x, y),
                    color2: view.pixel(x, y),
                    first: &view,
                    second: &view,
                    x,
                    y,
                    width: 2,
                    height: 2,
                };
                assert!(comparator.compare(&ctx));
            }
        }
    }
}

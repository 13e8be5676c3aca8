//! Antialiased pixel detection.
//!
//! Based on "Anti-aliased Pixel and Intensity Slope Detector" (V. Vysniauskas,
//! 2009). A pixel is considered antialiased when its 3x3 neighbourhood holds
//! both darker and brighter pixels, at most two pixels of equal brightness, and
//! its darkest or brightest neighbour sits on a hard edge in both images.

use crate::compare::PixelContext;
use crate::image::ImageView;

/// Maximum number of equal-brightness neighbours an antialiased pixel may have.
const MAX_EQUAL_NEIGHBOURS: usize = 2;

/// Forgives mismatches caused by edge smoothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AntialiasingFilter {
    brightness_tolerance: f64,
}

impl AntialiasingFilter {
    /// `brightness_tolerance` applies only to the checks of the darkest and
    /// brightest neighbours.
    pub fn new(brightness_tolerance: f64) -> Self {
        Self {
            brightness_tolerance,
        }
    }

    pub fn brightness_tolerance(&self) -> f64 {
        self.brightness_tolerance
    }

    /// Returns true if the mismatch at the context pixel looks like an
    /// antialiasing artifact in either image.
    pub fn check(&self, ctx: &PixelContext<'_>) -> bool {
        let (w, h) = (ctx.width, ctx.height);
        self.is_antialiased(ctx.second, ctx.first, ctx.x, ctx.y, w, h)
            || self.is_antialiased(ctx.first, ctx.second, ctx.x, ctx.y, w, h)
    }

    fn is_antialiased(
        &self,
        image: &ImageView<'_>,
        other: &ImageView<'_>,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> bool {
        let center = image.pixel(x, y).luma();

        let mut equal = 0usize;
        let mut darker = 0usize;
        let mut brighter = 0usize;
        let mut min = 0.0f64;
        let mut max = 0.0f64;
        let mut darkest = (x, y);
        let mut brightest = (x, y);

        for (nx, ny) in neighbours(x, y, width, height) {
            let delta = image.pixel(nx, ny).luma() - center;
            if delta == 0.0 {
                equal += 1;
            } else if delta > 0.0 {
                brighter += 1;
            } else {
                darker += 1;
            }
            if equal > MAX_EQUAL_NEIGHBOURS {
                return false;
            }

            if delta < min {
                min = delta;
                darkest = (nx, ny);
            }
            if delta > max {
                max = delta;
                brightest = (nx, ny);
            }
        }

        if darker == 0 || brighter == 0 {
            return false;
        }

        let on_edge = |(px, py): (usize, usize)| {
            !self.has_few_equal_neighbours(image, px, py, width, height)
                && !self.has_few_equal_neighbours(other, px, py, width, height)
        };
        on_edge(darkest) || on_edge(brightest)
    }

    /// Extreme-pixel check: false once more than two neighbours share the
    /// pixel's brightness (within tolerance).
    fn has_few_equal_neighbours(
        &self,
        image: &ImageView<'_>,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> bool {
        let center = image.pixel(x, y).luma();
        let mut equal = 0usize;
        for (nx, ny) in neighbours(x, y, width, height) {
            let delta = image.pixel(nx, ny).luma() - center;
            if delta.abs() <= self.brightness_tolerance {
                equal += 1;
                if equal > MAX_EQUAL_NEIGHBOURS {
                    return false;
                }
            }
        }
        true
    }
}

/// 3x3 neighbourhood of `(x, y)` clamped to `width x height`, excluding the
/// center, in row-major order.
fn neighbours(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let x0 = x.saturating_sub(1);
    let y0 = y.saturating_sub(1);
    let x2 = (x + 1).min(width - 1);
    let y2 = (y + 1).min(height - 1);
    (y0..=y2)
        .flat_map(move |ny| (x0..=x2).map(move |nx| (nx, ny)))
        .filter(move |&(nx, ny)| nx != x || ny != y)
}

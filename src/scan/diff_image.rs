//! Scan that materializes a highlighted diff image.
//!
//! The traversal covers the union of both images. Pixels outside the overlap
//! are differences by definition and are painted without comparison; pixels
//! that match copy the color of the second image.

use std::ops::ControlFlow;

use crate::color::Color;
use crate::compare::{Comparator, CompareOptions, PixelContext};
use crate::diff::{DiffArea, DiffClusters, Rect};
use crate::image::{ImageView, OwnedImage};
use crate::scan::RowScan;
use crate::trace::trace_event;

/// Highlighted diff image with pixel statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffImage {
    /// RGB image covering the union of both inputs.
    pub image: OwnedImage,
    /// Number of highlighted pixels.
    pub different_pixels: usize,
    /// Number of pixels in the diff image.
    pub total_pixels: usize,
}

/// Result of a diff-image scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffImageScanOutput {
    pub diff_image: DiffImage,
    pub diff_area: DiffArea,
    pub diff_clusters: Vec<Rect>,
}

/// Walks the union of both images and paints the diff.
pub struct DiffImageScan<'a> {
    first: ImageView<'a>,
    second: ImageView<'a>,
    comparator: Comparator,
    min_width: usize,
    min_height: usize,
    highlight: Color,
    should_cluster: bool,
    output: OwnedImage,
    different_pixels: usize,
    diff_area: DiffArea,
    diff_clusters: DiffClusters,
}

impl<'a> DiffImageScan<'a> {
    pub fn new(
        first: ImageView<'a>,
        second: ImageView<'a>,
        comparator: Comparator,
        opts: &CompareOptions,
    ) -> Self {
        let width = first.width().max(second.width());
        let height = first.height().max(second.height());
        Self {
            min_width: first.width().min(second.width()),
            min_height: first.height().min(second.height()),
            first,
            second,
            comparator,
            highlight: opts.highlight_color,
            should_cluster: opts.should_cluster,
            output: OwnedImage::blank(width, height),
            different_pixels: 0,
            diff_area: DiffArea::new(),
            diff_clusters: DiffClusters::new(opts.cluster_radius),
        }
    }

    fn mark_different(&mut self, x: usize, y: usize) {
        self.output.set(x, y, self.highlight);
        self.different_pixels += 1;
        let (abs_x, abs_y) = self.first.to_absolute(x, y);
        self.diff_area.update(abs_x, abs_y);
        if self.should_cluster {
            self.diff_clusters.update(abs_x, abs_y);
        }
    }
}

impl RowScan for DiffImageScan<'_> {
    type Output = DiffImageScanOutput;

    const YIELD_EVERY: usize = 256;

    fn rows(&self) -> usize {
        self.output.height()
    }

    fn visit_row(&mut self, y: usize) -> ControlFlow<()> {
        for x in 0..self.output.width() {
            if x >= self.min_width || y >= self.min_height {
                self.mark_different(x, y);
                continue;
            }

            let ctx = PixelContext {
                color1: self.first.pixel(x, y),
                color2: self.second.pixel(x, y),
                first: &self.first,
                second: &self.second,
                x,
                y,
                width: self.min_width,
                height: self.min_height,
            };
            if self.comparator.compare(&ctx) {
                let color = ctx.color2;
                self.output.set(x, y, color);
            } else {
                self.mark_different(x, y);
            }
        }
        ControlFlow::Continue(())
    }

    fn finish(self) -> DiffImageScanOutput {
        let diff_clusters = if self.should_cluster {
            self.diff_clusters.clusters()
        } else {
            self.diff_area.area().into_iter().collect()
        };
        let total_pixels = self.output.width() * self.output.height();
        trace_event!(
            "scan_finished",
            different_pixels = self.different_pixels,
            total_pixels = total_pixels
        );
        DiffImageScanOutput {
            diff_image: DiffImage {
                image: self.output,
                different_pixels: self.different_pixels,
                total_pixels,
            },
            diff_area: self.diff_area,
            diff_clusters,
        }
    }
}

//! Coordinate-collecting scan over the overlap of two images.

use std::ops::ControlFlow;

use crate::compare::{Comparator, CompareOptions, PixelContext};
use crate::diff::{DiffArea, DiffClusters, Rect};
use crate::image::ImageView;
use crate::scan::RowScan;
use crate::trace::trace_event;

/// Result of a coordinate-collecting scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffCoords {
    /// Bounding rectangle of all mismatches, in absolute coordinates.
    pub diff_area: DiffArea,
    /// Joined clusters, or the overall area when clustering is disabled.
    pub diff_clusters: Vec<Rect>,
}

/// Walks the overlapping region, feeding mismatches into the accumulators.
pub struct CoordScan<'a> {
    first: ImageView<'a>,
    second: ImageView<'a>,
    comparator: Comparator,
    width: usize,
    height: usize,
    stop_on_first_fail: bool,
    should_cluster: bool,
    diff_area: DiffArea,
    diff_clusters: DiffClusters,
}

impl<'a> CoordScan<'a> {
    pub fn new(
        first: ImageView<'a>,
        second: ImageView<'a>,
        comparator: Comparator,
        opts: &CompareOptions,
    ) -> Self {
        Self {
            width: first.width().min(second.width()),
            height: first.height().min(second.height()),
            first,
            second,
            comparator,
            stop_on_first_fail: opts.stop_on_first_fail,
            should_cluster: opts.should_cluster,
            diff_area: DiffArea::new(),
            diff_clusters: DiffClusters::new(opts.cluster_radius),
        }
    }

    /// True if rows may be compared out of order: the pipeline is stateless
    /// and the scan does not stop at the first mismatch.
    pub fn can_run_parallel(&self) -> bool {
        !self.stop_on_first_fail && !self.comparator.is_stateful()
    }

    pub(crate) fn views(&self) -> (ImageView<'a>, ImageView<'a>) {
        (self.first, self.second)
    }

    pub(crate) fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub(crate) fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// Records a mismatch at view coordinates `(x, y)`.
    pub(crate) fn record(&mut self, x: usize, y: usize) {
        let (abs_x, abs_y) = self.first.to_absolute(x, y);
        self.diff_area.update(abs_x, abs_y);
        if self.should_cluster {
            self.diff_clusters.update(abs_x, abs_y);
        }
    }
}

impl RowScan for CoordScan<'_> {
    type Output = DiffCoords;

    const YIELD_EVERY: usize = 1;

    fn rows(&self) -> usize {
        self.height
    }

    fn visit_row(&mut self, y: usize) -> ControlFlow<()> {
        for x in 0..self.width {
            let ctx = PixelContext {
                color1: self.first.pixel(x, y),
                color2: self.second.pixel(x, y),
                first: &self.first,
                second: &self.second,
                x,
                y,
                width: self.width,
                height: self.height,
            };
            if self.comparator.compare(&ctx) {
                continue;
            }
            self.record(x, y);
            if self.stop_on_first_fail {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn finish(self) -> DiffCoords {
        let diff_clusters = if self.should_cluster {
            self.diff_clusters.clusters()
        } else {
            self.diff_area.area().into_iter().collect()
        };
        trace_event!(
            "scan_finished",
            empty = self.diff_area.is_empty(),
            clusters = diff_clusters.len()
        );
        DiffCoords {
            diff_area: self.diff_area,
            diff_clusters,
        }
    }
}

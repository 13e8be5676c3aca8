//! Rayon-parallel coordinate scan (feature-gated).
//!
//! Only pipelines without per-pass state may be evaluated out of order. Rows
//! are compared in parallel, each worker holding its own clone of the
//! comparator; the mismatches are then fed into the accumulators in row-major
//! order, so the result is identical to the sequential scan.

use rayon::prelude::*;

use crate::compare::PixelContext;
use crate::scan::{CoordScan, DiffCoords, RowScan};
use crate::trace::trace_span;

/// Row-parallel variant of the coordinate-collecting scan.
///
/// Callers must check [`CoordScan::can_run_parallel`] first.
pub(crate) fn scan_coords_par(mut scan: CoordScan<'_>) -> DiffCoords {
    debug_assert!(scan.can_run_parallel());

    let (first, second) = scan.views();
    let (width, height) = scan.dimensions();
    let _span = trace_span!("coord_scan", width = width, height = height, parallel = true).entered();

    let comparator = scan.comparator();
    let row_mismatches: Vec<Vec<usize>> = (0..height)
        .into_par_iter()
        .map_init(
            || comparator.clone(),
            |cmp, y| {
                (0..width)
                    .filter(|&x| {
                        let ctx = PixelContext {
                            color1: first.pixel(x, y),
                            color2: second.pixel(x, y),
                            first: &first,
                            second: &second,
                            x,
                            y,
                            width,
                            height,
                        };
                        !cmp.compare(&ctx)
                    })
                    .collect()
            },
        )
        .collect();

    for (y, xs) in row_mismatches.into_iter().enumerate() {
        for x in xs {
            scan.record(x, y);
        }
    }
    scan.finish()
}

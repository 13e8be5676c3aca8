//! Row-major scan drivers.
//!
//! A scan visits the pixel grid row by row, ascending `y` then ascending `x`.
//! The caret detector probes ahead of the current pixel and relies on this
//! order, so stateful pipelines are only ever driven sequentially.
//!
//! Scans are expressed as [`RowScan`] state machines; a driver decides what
//! happens between rows. [`drive_blocking`] runs them back to back, while
//! `drive_async` (feature `async`) hands control back to the tokio scheduler
//! every [`RowScan::YIELD_EVERY`] rows. The scan owns all of its mutable
//! state, so nothing can observe or mutate it between suspension points.

use std::ops::ControlFlow;

mod coords;
mod diff_image;
#[cfg(feature = "rayon")]
pub(crate) mod par;

pub use coords::{CoordScan, DiffCoords};
pub use diff_image::{DiffImage, DiffImageScan, DiffImageScanOutput};

/// Incremental row-major scan.
pub trait RowScan {
    type Output;

    /// Rows between cooperative suspension points.
    const YIELD_EVERY: usize;

    /// Number of rows to visit.
    fn rows(&self) -> usize;

    /// Visits every pixel of row `y`. `Break` ends the scan early.
    fn visit_row(&mut self, y: usize) -> ControlFlow<()>;

    /// Consumes the scan and produces its result.
    fn finish(self) -> Self::Output;
}

/// Runs a scan to completion on the current thread.
pub fn drive_blocking<S: RowScan>(mut scan: S) -> S::Output {
    for y in 0..scan.rows() {
        if scan.visit_row(y).is_break() {
            break;
        }
    }
    scan.finish()
}

/// Runs a scan, yielding to the tokio scheduler every `YIELD_EVERY` rows.
#[cfg(feature = "async")]
pub async fn drive_async<S: RowScan>(mut scan: S) -> S::Output {
    let every = S::YIELD_EVERY.max(1);
    for y in 0..scan.rows() {
        if scan.visit_row(y).is_break() {
            break;
        }
        if (y + 1) % every == 0 {
            tokio::task::yield_now().await;
        }
    }
    scan.finish()
}

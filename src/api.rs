//! High-level comparison entry points.
//!
//! A comparison goes through the following stages:
//!
//! 1. options are validated and the comparator pipeline is built;
//! 2. two whole images with identical buffers are equal without a scan;
//! 3. images of different sizes are unequal over the whole larger area,
//!    unless a diff image was requested;
//! 4. otherwise the pixels are scanned.

use crate::compare::{Comparator, CompareOptions};
use crate::diff::Rect;
use crate::image::ImageView;
use crate::scan::{drive_blocking, CoordScan, DiffCoords, DiffImage, DiffImageScan};
use crate::trace::{trace_event, trace_span};
use crate::util::LooksSameResult;

/// Outcome of [`looks_same`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompareResult {
    /// True if no pixel was reported as different.
    pub equal: bool,
    /// Size `(width, height)` of the first (reference) image.
    pub reference_size: (usize, usize),
    /// Bounding rectangle of all differences, `None` when equal.
    pub diff_bounds: Option<Rect>,
    /// Diff clusters, or `[diff_bounds]` when clustering is disabled.
    pub diff_clusters: Vec<Rect>,
    /// Highlighted diff image, present when `create_diff_image` was set and a
    /// scan took place.
    pub diff_image: Option<DiffImage>,
}

enum Plan<'a> {
    Done(CompareResult),
    Coords(CoordScan<'a>),
    DiffImage(DiffImageScan<'a>),
}

/// Compares two images.
pub fn looks_same(
    first: ImageView<'_>,
    second: ImageView<'_>,
    opts: &CompareOptions,
) -> LooksSameResult<CompareResult> {
    let _span = trace_span!(
        "looks_same",
        width = first.width(),
        height = first.height()
    )
    .entered();

    let reference_size = (first.width(), first.height());
    match plan(first, second, opts)? {
        Plan::Done(result) => Ok(result),
        Plan::Coords(scan) => {
            let coords = run_coords(scan, opts);
            Ok(result_from_coords(coords, reference_size))
        }
        Plan::DiffImage(scan) => {
            let _span = trace_span!("diff_image_scan").entered();
            let out = drive_blocking(scan);
            Ok(CompareResult {
                equal: out.diff_area.is_empty(),
                reference_size,
                diff_bounds: out.diff_area.area(),
                diff_clusters: out.diff_clusters,
                diff_image: Some(out.diff_image),
            })
        }
    }
}

/// Returns the bounding rectangle of all differences, `None` if the images
/// look the same. Images of different sizes differ over the whole larger area.
pub fn diff_area(
    first: ImageView<'_>,
    second: ImageView<'_>,
    opts: &CompareOptions,
) -> LooksSameResult<Option<Rect>> {
    let comparator = Comparator::build(opts)?;
    if !same_dimensions(&first, &second) {
        return Ok(Some(max_diff_bounds(&first, &second)));
    }
    let coords = run_coords(CoordScan::new(first, second, comparator, opts), opts);
    Ok(coords.diff_area.area())
}

/// Builds a highlighted diff image of both inputs.
///
/// Unlike [`looks_same`] this always scans, even for identical buffers or
/// mismatching sizes.
pub fn create_diff(
    first: ImageView<'_>,
    second: ImageView<'_>,
    opts: &CompareOptions,
) -> LooksSameResult<DiffImage> {
    let comparator = Comparator::build(opts)?;
    let _span = trace_span!("diff_image_scan").entered();
    let out = drive_blocking(DiffImageScan::new(first, second, comparator, opts));
    Ok(out.diff_image)
}

fn plan<'a>(
    first: ImageView<'a>,
    second: ImageView<'a>,
    opts: &CompareOptions,
) -> LooksSameResult<Plan<'a>> {
    let comparator = Comparator::build(opts)?;
    let reference_size = (first.width(), first.height());

    if buffers_equal(&first, &second) {
        trace_event!("buffers_equal");
        return Ok(Plan::Done(CompareResult {
            equal: true,
            reference_size,
            diff_bounds: None,
            diff_clusters: Vec::new(),
            diff_image: None,
        }));
    }

    if !opts.create_diff_image && !same_dimensions(&first, &second) {
        let bounds = max_diff_bounds(&first, &second);
        trace_event!(
            "dimensions_differ",
            first_width = first.width(),
            first_height = first.height(),
            second_width = second.width(),
            second_height = second.height()
        );
        return Ok(Plan::Done(CompareResult {
            equal: false,
            reference_size,
            diff_bounds: Some(bounds),
            diff_clusters: vec![bounds],
            diff_image: None,
        }));
    }

    if opts.create_diff_image {
        return Ok(Plan::DiffImage(DiffImageScan::new(
            first, second, comparator, opts,
        )));
    }

    Ok(Plan::Coords(CoordScan::new(first, second, comparator, opts)))
}

fn run_coords(scan: CoordScan<'_>, opts: &CompareOptions) -> DiffCoords {
    #[cfg(feature = "rayon")]
    {
        if opts.parallel && scan.can_run_parallel() {
            return crate::scan::par::scan_coords_par(scan);
        }
    }
    #[cfg(not(feature = "rayon"))]
    let _ = opts;

    let _span = trace_span!("coord_scan").entered();
    drive_blocking(scan)
}

fn result_from_coords(coords: DiffCoords, reference_size: (usize, usize)) -> CompareResult {
    CompareResult {
        equal: coords.diff_area.is_empty(),
        reference_size,
        diff_bounds: coords.diff_area.area(),
        diff_clusters: coords.diff_clusters,
        diff_image: None,
    }
}

/// Whole images whose decoded buffers are bit-identical.
fn buffers_equal(first: &ImageView<'_>, second: &ImageView<'_>) -> bool {
    !first.is_bounded()
        && !second.is_bounded()
        && same_dimensions(first, second)
        && first.stride() == second.stride()
        && first.channels() == second.channels()
        && first.as_slice() == second.as_slice()
}

fn same_dimensions(first: &ImageView<'_>, second: &ImageView<'_>) -> bool {
    first.width() == second.width() && first.height() == second.height()
}

/// Rectangle covering the larger of both images, anchored at the first
/// image's absolute origin.
fn max_diff_bounds(first: &ImageView<'_>, second: &ImageView<'_>) -> Rect {
    let (left, top) = first.to_absolute(0, 0);
    Rect {
        left,
        top,
        right: left + first.width().max(second.width()) - 1,
        bottom: top + first.height().max(second.height()) - 1,
    }
}

#[cfg(feature = "async")]
mod asynchronous {
    use super::{plan, result_from_coords, CompareResult, Plan};
    use crate::compare::{Comparator, CompareOptions};
    use crate::image::ImageView;
    use crate::scan::{drive_async, DiffImage, DiffImageScan};
    use crate::util::LooksSameResult;

    /// Async [`looks_same`](super::looks_same): yields to the tokio scheduler
    /// after every row (every 256 rows when building a diff image).
    pub async fn looks_same_async(
        first: ImageView<'_>,
        second: ImageView<'_>,
        opts: &CompareOptions,
    ) -> LooksSameResult<CompareResult> {
        let reference_size = (first.width(), first.height());
        match plan(first, second, opts)? {
            Plan::Done(result) => Ok(result),
            Plan::Coords(scan) => {
                let coords = drive_async(scan).await;
                Ok(result_from_coords(coords, reference_size))
            }
            Plan::DiffImage(scan) => {
                let out = drive_async(scan).await;
                Ok(CompareResult {
                    equal: out.diff_area.is_empty(),
                    reference_size,
                    diff_bounds: out.diff_area.area(),
                    diff_clusters: out.diff_clusters,
                    diff_image: Some(out.diff_image),
                })
            }
        }
    }

    /// Async [`create_diff`](super::create_diff).
    pub async fn create_diff_async(
        first: ImageView<'_>,
        second: ImageView<'_>,
        opts: &CompareOptions,
    ) -> LooksSameResult<DiffImage> {
        let comparator = Comparator::build(opts)?;
        let out = drive_async(DiffImageScan::new(first, second, comparator, opts)).await;
        Ok(out.diff_image)
    }
}

#[cfg(feature = "async")]
pub use asynchronous::{create_diff_async, looks_same_async};

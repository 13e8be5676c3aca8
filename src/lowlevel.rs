//! Low-level building blocks for custom comparison pipelines.
//!
//! These types expose the comparators, accumulators and scan state machines
//! behind [`looks_same`](crate::looks_same) for callers that drive scans
//! themselves or need individual pieces such as the color oracle.

pub use crate::color::{cie76, ciede2000, same_color, same_within_tolerance, LabColor};
pub use crate::compare::{
    AntialiasingFilter, CaretDetector, CaretState, Comparator, PixelContext,
};
pub use crate::diff::{join_clusters, DiffArea, DiffClusters, CLUSTERS_SIZE};
#[cfg(feature = "async")]
pub use crate::scan::drive_async;
pub use crate::scan::{
    drive_blocking, CoordScan, DiffCoords, DiffImageScan, DiffImageScanOutput, RowScan,
};

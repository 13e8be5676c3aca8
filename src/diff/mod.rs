//! Accumulators for mismatching pixel coordinates.
//!
//! `DiffArea` tracks the overall bounding rectangle of a diff, `DiffClusters`
//! groups nearby mismatches into separate rectangles. Both are fed by the scan
//! driver in absolute image coordinates.

mod area;
mod clusters;

pub use area::{DiffArea, Rect};
pub use clusters::{join_clusters, DiffClusters, CLUSTERS_SIZE};

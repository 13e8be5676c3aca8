//! looksame is a perceptual pixel-comparison engine for visual regression
//! testing.
//!
//! Two images are compared pixel by pixel with a CIEDE2000 color oracle;
//! mismatches caused by antialiasing or a blinking text caret can be
//! forgiven. The result tells whether the images look the same and where
//! they differ (overall bounds, clusters, or a highlighted diff image).
//!
//! Decoding lives behind the `image-io` feature, structured logging behind
//! `tracing`, row-parallel scanning behind `rayon`, and a cooperative scan
//! driver for tokio behind `async`.

mod api;
pub mod color;
pub mod compare;
pub mod diff;
pub mod image;
pub mod lowlevel;
pub mod scan;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use api::{create_diff, diff_area, looks_same, CompareResult};
#[cfg(feature = "async")]
pub use api::{create_diff_async, looks_same_async};
pub use color::{colors, Color, JND};
pub use compare::CompareOptions;
pub use diff::Rect;
pub use crate::image::{BoundingBox, ImageView, OwnedImage};
pub use scan::DiffImage;
pub use util::{LooksSameError, LooksSameResult};

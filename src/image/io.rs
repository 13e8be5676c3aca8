//! Loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. The source-level entry
//! points compare the encoded bytes of whole images before decoding anything,
//! and read only the headers when the sizes alone decide the result.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::api::{create_diff, looks_same, CompareResult};
use crate::compare::CompareOptions;
use crate::diff::Rect;
use crate::image::{BoundingBox, ImageView, OwnedImage};
use crate::scan::DiffImage;
use crate::trace::trace_event;
use crate::util::{LooksSameError, LooksSameResult};

/// Where an image comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Encoded file on disk.
    Path(PathBuf),
    /// Encoded image in memory.
    Bytes(Vec<u8>),
}

/// An image source with an optional region to compare.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    pub source: ImageSource,
    pub bounding_box: Option<BoundingBox>,
}

impl SourceImage {
    /// Whole image read from `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ImageSource::Path(path.into()),
            bounding_box: None,
        }
    }

    /// Whole image decoded from `bytes`.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            source: ImageSource::Bytes(bytes),
            bounding_box: None,
        }
    }

    /// Restricts the comparison to `bbox`.
    pub fn with_bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.bounding_box = Some(bbox);
        self
    }

    fn read(&self) -> LooksSameResult<Vec<u8>> {
        match &self.source {
            ImageSource::Bytes(bytes) => Ok(bytes.clone()),
            ImageSource::Path(path) => std::fs::read(path).map_err(|err| LooksSameError::ImageIo {
                reason: format!("can't load image file {}: {err}", path.display()),
            }),
        }
    }
}

/// Loaded source: encoded bytes plus the geometry of the compared region.
struct Loaded {
    bytes: Vec<u8>,
    bounding_box: Option<BoundingBox>,
    region: (usize, usize),
    origin: (usize, usize),
}

impl Loaded {
    fn load(src: &SourceImage) -> LooksSameResult<Self> {
        if let Some(bbox) = &src.bounding_box {
            bbox.validate()?;
        }
        let bytes = src.read()?;
        let (img_width, img_height) = read_dimensions(&bytes)?;
        let (region, origin) = match src.bounding_box {
            None => ((img_width, img_height), (0, 0)),
            Some(bbox) => {
                if bbox.right >= img_width || bbox.bottom >= img_height {
                    return Err(LooksSameError::BoundingBoxOutOfBounds {
                        left: bbox.left,
                        top: bbox.top,
                        right: bbox.right,
                        bottom: bbox.bottom,
                        img_width,
                        img_height,
                    });
                }
                ((bbox.width(), bbox.height()), (bbox.left, bbox.top))
            }
        };
        Ok(Self {
            bytes,
            bounding_box: src.bounding_box,
            region,
            origin,
        })
    }
}

/// Compares two encoded images.
pub fn looks_same_sources(
    first: &SourceImage,
    second: &SourceImage,
    opts: &CompareOptions,
) -> LooksSameResult<CompareResult> {
    opts.validate()?;
    let first = Loaded::load(first)?;
    let second = Loaded::load(second)?;

    if first.bounding_box.is_none() && second.bounding_box.is_none() && first.bytes == second.bytes
    {
        trace_event!("buffers_equal", bytes = first.bytes.len());
        return Ok(CompareResult {
            equal: true,
            reference_size: first.region,
            diff_bounds: None,
            diff_clusters: Vec::new(),
            diff_image: None,
        });
    }

    if !opts.create_diff_image && first.region != second.region {
        let (left, top) = first.origin;
        let bounds = Rect {
            left,
            top,
            right: left + first.region.0.max(second.region.0) - 1,
            bottom: top + first.region.1.max(second.region.1) - 1,
        };
        return Ok(CompareResult {
            equal: false,
            reference_size: first.region,
            diff_bounds: Some(bounds),
            diff_clusters: vec![bounds],
            diff_image: None,
        });
    }

    let first_img = decode_rgb(&first.bytes)?;
    let second_img = decode_rgb(&second.bytes)?;
    let first_view = region_view(&first_img, first.bounding_box)?;
    let second_view = region_view(&second_img, second.bounding_box)?;
    looks_same(first_view, second_view, opts)
}

/// Builds a diff image of two encoded images.
pub fn create_diff_sources(
    reference: &SourceImage,
    current: &SourceImage,
    opts: &CompareOptions,
) -> LooksSameResult<DiffImage> {
    opts.validate()?;
    let reference_img = decode_rgb(&reference.read()?)?;
    let current_img = decode_rgb(&current.read()?)?;
    let reference_view = region_view(&reference_img, reference.bounding_box)?;
    let current_view = region_view(&current_img, current.bounding_box)?;
    create_diff(reference_view, current_view, opts)
}

fn region_view(img: &OwnedImage, bbox: Option<BoundingBox>) -> LooksSameResult<ImageView<'_>> {
    match bbox {
        Some(bbox) => img.view().bounded(bbox),
        None => Ok(img.view()),
    }
}

fn read_dimensions(bytes: &[u8]) -> LooksSameResult<(usize, usize)> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(io_error)?
        .into_dimensions()
        .map_err(io_error)?;
    Ok((width as usize, height as usize))
}

/// Decodes an encoded image into an owned RGB buffer.
pub fn decode_rgb(bytes: &[u8]) -> LooksSameResult<OwnedImage> {
    let img = image::load_from_memory(bytes).map_err(io_error)?;
    owned_from_dynamic_image(&img)
}

/// Creates an owned RGB image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> LooksSameResult<OwnedImage> {
    let rgb = img.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    OwnedImage::new(rgb.into_raw(), width, height)
}

/// Loads an image from disk and converts it to RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> LooksSameResult<OwnedImage> {
    let img = image::open(path).map_err(io_error)?;
    owned_from_dynamic_image(&img)
}

/// Saves an RGB image; the format follows the file extension.
pub fn save_rgb_image<P: AsRef<Path>>(img: &OwnedImage, path: P) -> LooksSameResult<()> {
    to_rgb_buffer(img)?.save(path).map_err(io_error)
}

/// Encodes an RGB image as PNG.
pub fn encode_png(img: &OwnedImage) -> LooksSameResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    to_rgb_buffer(img)?
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(io_error)?;
    Ok(out.into_inner())
}

fn to_rgb_buffer(img: &OwnedImage) -> LooksSameResult<image::RgbImage> {
    let width = img.width() as u32;
    let height = img.height() as u32;
    image::RgbImage::from_raw(width, height, img.data().to_vec()).ok_or(
        LooksSameError::InvalidDimensions {
            width: img.width(),
            height: img.height(),
        },
    )
}

fn io_error(err: impl std::fmt::Display) -> LooksSameError {
    LooksSameError::ImageIo {
        reason: err.to_string(),
    }
}

//! Owned contiguous RGB image buffer.

use crate::color::Color;
use crate::image::ImageView;
use crate::util::{LooksSameError, LooksSameResult};

/// Owned contiguous RGB image, used for materialized diff images.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps an RGB buffer of exactly `width * height * 3` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> LooksSameResult<Self> {
        if width == 0 || height == 0 {
            return Err(LooksSameError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(3))
            .ok_or(LooksSameError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(LooksSameError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(LooksSameError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Allocates a black image. Dimensions must be non-zero.
    pub(crate) fn blank(width: usize, height: usize) -> Self {
        Self {
            data: vec![0u8; width * height * 3],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the raw RGB bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns the raw RGB bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Returns the color at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 3;
        Some(Color::new(self.data[idx], self.data[idx + 1], self.data[idx + 2]))
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, color: Color) {
        let idx = (y * self.width + x) * 3;
        self.data[idx] = color.r;
        self.data[idx + 1] = color.g;
        self.data[idx + 2] = color.b;
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
            channels: 3,
            left: 0,
            top: 0,
            bounded: false,
        }
    }
}

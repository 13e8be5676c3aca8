//! Image views over decoded pixel buffers.
//!
//! `ImageView` is a borrowed 2D view into an interleaved RGB or RGBA buffer
//! with an explicit stride. The stride counts pixels between the starts of
//! consecutive rows, so a stride larger than the width represents padded rows.
//! Bounded views are zero-copy windows into the same backing slice; they keep
//! the original stride and remember their offset so mismatches can be reported
//! in the coordinates of the full image.

use crate::color::Color;
use crate::util::{LooksSameError, LooksSameResult};

mod bounds;
#[cfg(feature = "image-io")]
pub mod io;
mod owned;

pub use bounds::BoundingBox;
pub use owned::OwnedImage;

/// Borrowed RGB/RGBA image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
    channels: usize,
    left: usize,
    top: usize,
    bounded: bool,
}

impl<'a> ImageView<'a> {
    /// Creates a contiguous RGB view with `stride == width`.
    pub fn from_rgb(data: &'a [u8], width: usize, height: usize) -> LooksSameResult<Self> {
        Self::new(data, width, height, width, 3)
    }

    /// Creates a contiguous RGBA view with `stride == width`. Alpha is ignored.
    pub fn from_rgba(data: &'a [u8], width: usize, height: usize) -> LooksSameResult<Self> {
        Self::new(data, width, height, width, 4)
    }

    /// Creates a view with an explicit stride (in pixels) and channel count.
    pub fn new(
        data: &'a [u8],
        width: usize,
        height: usize,
        stride: usize,
        channels: usize,
    ) -> LooksSameResult<Self> {
        if channels != 3 && channels != 4 {
            return Err(LooksSameError::InvalidChannels { channels });
        }
        let needed = required_len(width, height, stride, channels)?;
        if data.len() < needed {
            return Err(LooksSameError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            channels,
            left: 0,
            top: 0,
            bounded: false,
        })
    }

    /// Returns the view width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the view height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in pixels between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the number of interleaved channels (3 or 4).
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns true for views created with [`ImageView::bounded`].
    pub fn is_bounded(&self) -> bool {
        self.bounded
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the color at `(x, y)` relative to this view.
    ///
    /// Callers must stay within `width x height`; the scan driver and the
    /// comparators only ever ask for in-bounds coordinates.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Color {
        debug_assert!(x < self.width && y < self.height);
        let idx = ((self.top + y) * self.stride + self.left + x) * self.channels;
        Color::new(self.data[idx], self.data[idx + 1], self.data[idx + 2])
    }

    /// Returns the color at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixel(x, y))
    }

    /// Maps view coordinates to coordinates of the underlying full image.
    #[inline]
    pub fn to_absolute(&self, x: usize, y: usize) -> (usize, usize) {
        (x + self.left, y + self.top)
    }

    /// Returns a zero-copy window covering the inclusive `bbox`.
    ///
    /// The box is interpreted relative to this view and must fit inside it.
    pub fn bounded(&self, bbox: BoundingBox) -> LooksSameResult<ImageView<'a>> {
        bbox.validate()?;
        if bbox.right >= self.width || bbox.bottom >= self.height {
            return Err(LooksSameError::BoundingBoxOutOfBounds {
                left: bbox.left,
                top: bbox.top,
                right: bbox.right,
                bottom: bbox.bottom,
                img_width: self.width,
                img_height: self.height,
            });
        }
        Ok(Self {
            width: bbox.width(),
            height: bbox.height(),
            left: self.left + bbox.left,
            top: self.top + bbox.top,
            bounded: true,
            ..*self
        })
    }
}

fn required_len(
    width: usize,
    height: usize,
    stride: usize,
    channels: usize,
) -> LooksSameResult<usize> {
    if width == 0 || height == 0 {
        return Err(LooksSameError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(LooksSameError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .and_then(|v| v.checked_mul(channels))
        .ok_or(LooksSameError::InvalidDimensions { width, height })
}

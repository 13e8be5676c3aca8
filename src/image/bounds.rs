//! Inclusive bounding boxes for sub-region comparison.

use crate::util::{LooksSameError, LooksSameResult};

/// Inclusive rectangle selecting a region of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    /// X-coordinate of the upper left corner.
    pub left: usize,
    /// Y-coordinate of the upper left corner.
    pub top: usize,
    /// X-coordinate of the bottom right corner.
    pub right: usize,
    /// Y-coordinate of the bottom right corner.
    pub bottom: usize,
}

impl BoundingBox {
    /// Creates a validated bounding box.
    pub fn new(left: usize, top: usize, right: usize, bottom: usize) -> LooksSameResult<Self> {
        let bbox = Self {
            left,
            top,
            right,
            bottom,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Checks that the corners are ordered.
    pub fn validate(&self) -> LooksSameResult<()> {
        if self.left > self.right {
            return Err(LooksSameError::InvalidBoundingBox {
                reason: "\"left\" coordinate cannot be greater than \"right\"",
            });
        }
        if self.top > self.bottom {
            return Err(LooksSameError::InvalidBoundingBox {
                reason: "\"top\" coordinate cannot be greater than \"bottom\"",
            });
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }
}

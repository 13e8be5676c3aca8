//! Growing bounding rectangle of mismatching pixels.

/// Inclusive rectangle in absolute image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: usize,
    pub top: usize,
    pub right: usize,
    pub bottom: usize,
}

impl Rect {
    /// Creates a rectangle covering a single point.
    pub const fn point(x: usize, y: usize) -> Self {
        Self {
            left: x,
            top: y,
            right: x,
            bottom: y,
        }
    }

    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    /// Returns true if the rectangle contains `(x, y)`.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Returns true if the extents overlap on both axes (touching counts).
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.left > other.right || other.left > self.right {
            return false;
        }
        if self.bottom < other.top || other.bottom < self.top {
            return false;
        }
        true
    }

    /// Grows the rectangle to include `(x, y)`.
    #[inline]
    pub fn include(&mut self, x: usize, y: usize) {
        self.left = self.left.min(x);
        self.top = self.top.min(y);
        self.right = self.right.max(x);
        self.bottom = self.bottom.max(y);
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Bounding rectangle that starts empty and grows monotonically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DiffArea {
    area: Option<Rect>,
}

impl DiffArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grows the area to include `(x, y)`.
    pub fn update(&mut self, x: usize, y: usize) -> &mut Self {
        match &mut self.area {
            Some(rect) => rect.include(x, y),
            None => self.area = Some(Rect::point(x, y)),
        }
        self
    }

    /// True until the first update.
    pub fn is_empty(&self) -> bool {
        self.area.is_none()
    }

    /// Returns the accumulated rectangle, `None` while empty.
    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    /// Returns true if `(x, y)` lies inside the area expanded by `radius` on
    /// every side.
    pub fn contains_within(&self, x: usize, y: usize, radius: usize) -> bool {
        match &self.area {
            Some(rect) => {
                x >= rect.left.saturating_sub(radius)
                    && x <= rect.right.saturating_add(radius)
                    && y >= rect.top.saturating_sub(radius)
                    && y <= rect.bottom.saturating_add(radius)
            }
            None => false,
        }
    }

    /// Min/max reduction with another area.
    pub fn merge(&mut self, other: &DiffArea) {
        if let Some(rect) = other.area {
            self.update(rect.left, rect.top).update(rect.right, rect.bottom);
        }
    }
}

impl From<Rect> for DiffArea {
    fn from(rect: Rect) -> Self {
        Self { area: Some(rect) }
    }
}

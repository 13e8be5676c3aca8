//! Blinking text caret detection.
//!
//! The detector is a two-state automaton owned by a single comparison pass.
//! While `Searching`, the first rejected pixel starts a probe that walks down
//! a `pixel_ratio` wide column block collecting consecutive mismatches. A
//! clean vertical bar (height above one pixel, width equal to the pixel
//! ratio) locks the detector onto that region; from then on only pixels
//! inside the locked region are forgiven. Only one caret is ever forgiven per
//! pass, so multi-cursor screenshots report every caret after the first.
//!
//! The probe looks ahead of the scan position, so the detector relies on the
//! row-major visiting order of the scan driver.

use crate::color::same_color;
use crate::compare::PixelContext;
use crate::diff::Rect;
use crate::trace::trace_event;

/// State of the caret automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaretState {
    /// No caret has been found yet.
    Searching,
    /// A caret was confirmed; `caret` is inclusive, in view coordinates.
    Locked { caret: Rect },
}

/// Forgives one vertical caret-shaped mismatch region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaretDetector {
    pixel_ratio: usize,
    state: CaretState,
}

impl CaretDetector {
    /// Creates a searching detector. Fractional ratios are floored and
    /// anything below one is treated as one.
    pub fn new(pixel_ratio: f64) -> Self {
        let floored = pixel_ratio.floor();
        let pixel_ratio = if floored >= 1.0 { floored as usize } else { 1 };
        Self {
            pixel_ratio,
            state: CaretState::Searching,
        }
    }

    pub fn pixel_ratio(&self) -> usize {
        self.pixel_ratio
    }

    pub fn state(&self) -> CaretState {
        self.state
    }

    /// Decides whether a pixel already rejected by the base comparator is
    /// part of the caret.
    pub fn validate(&mut self, ctx: &PixelContext<'_>) -> bool {
        match self.state {
            CaretState::Locked { caret } => caret.contains(ctx.x, ctx.y),
            CaretState::Searching => {
                let last = self.last_caret_point(ctx);
                let caret = Rect {
                    left: ctx.x,
                    top: ctx.y,
                    right: last.0,
                    bottom: last.1,
                };
                if !self.looks_like_caret(&caret) {
                    return false;
                }
                trace_event!(
                    "caret_locked",
                    x = caret.left,
                    y = caret.top,
                    height = caret.height()
                );
                self.state = CaretState::Locked { caret };
                true
            }
        }
    }

    fn last_caret_point(&self, ctx: &PixelContext<'_>) -> (usize, usize) {
        let mut current = (ctx.x, ctx.y);
        loop {
            let next = self.next_caret_point(ctx.x, current);
            if next.0 >= ctx.width || next.1 >= ctx.height {
                return current;
            }
            if same_color(ctx.first.pixel(next.0, next.1), ctx.second.pixel(next.0, next.1)) {
                return current;
            }
            current = next;
        }
    }

    fn next_caret_point(&self, start_x: usize, current: (usize, usize)) -> (usize, usize) {
        let next_x = current.0 + 1;
        if next_x < start_x + self.pixel_ratio {
            (next_x, current.1)
        } else {
            (start_x, current.1 + 1)
        }
    }

    fn looks_like_caret(&self, caret: &Rect) -> bool {
        caret.height() > 1 && caret.width() == self.pixel_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::{CaretDetector, CaretState};
    use crate::color::Color;
    use crate::compare::PixelContext;
    use crate::diff::Rect;
    use crate::image::ImageView;

    const WHITE: [u8; 3] = [255, 255, 255];
    const BLACK: [u8; 3] = [0, 0, 0];

    fn canvas(width: usize, height: usize, black: &[(usize, usize)]) -> Vec<u8> {
        let mut data = WHITE.repeat(width * height);
        for &(x, y) in black {
            let idx = (y * width + x) * 3;
            data[idx..idx + 3].copy_from_slice(&BLACK);
        }
        data
    }

    fn ctx<'a>(
        first: &'a ImageView<'a>,
        second: &'a ImageView<'a>,
        x: usize,
        y: usize,
    ) -> PixelContext<'a> {
        PixelContext {
            color1: first.pixel(x, y),
            color2: second.pixel(x, y),
            first,
            second,
            x,
            y,
            width: first.width(),
            height: first.height(),
        }
    }

    #[test]
    fn pixel_ratio_is_floored_and_clamped() {
        assert_eq!(CaretDetector::new(2.7).pixel_ratio(), 2);
        assert_eq!(CaretDetector::new(0.0).pixel_ratio(), 1);
        assert_eq!(CaretDetector::new(0.5).pixel_ratio(), 1);
    }

    #[test]
    fn vertical_bar_locks_the_detector() {
        let reference = canvas(5, 6, &[]);
        let current = canvas(5, 6, &[(2, 1), (2, 2), (2, 3)]);
        let first = ImageView::from_rgb(&reference, 5, 6).unwrap();
        let second = ImageView::from_rgb(&current, 5, 6).unwrap();

        let mut detector = CaretDetector::new(1.0);
        assert!(detector.validate(&ctx(&first, &second, 2, 1)));
        assert_eq!(
            detector.state(),
            CaretState::Locked {
                caret: Rect {
                    left: 2,
                    top: 1,
                    right: 2,
                    bottom: 3
                }
            }
        );
        assert!(detector.validate(&ctx(&first, &second, 2, 2)));
        assert!(detector.validate(&ctx(&first, &second, 2, 3)));
        assert!(!detector.validate(&ctx(&first, &second, 2, 4)));
    }

    #[test]
    fn single_pixel_is_not_a_caret() {
        let reference = canvas(4, 4, &[]);
        let current = canvas(4, 4, &[(1, 1)]);
        let first = ImageView::from_rgb(&reference, 4, 4).unwrap();
        let second = ImageView::from_rgb(&current, 4, 4).unwrap();

        let mut detector = CaretDetector::new(1.0);
        assert!(!detector.validate(&ctx(&first, &second, 1, 1)));
        assert_eq!(detector.state(), CaretState::Searching);
    }

    #[test]
    fn wide_bar_needs_matching_pixel_ratio() {
        let black = [(1, 0), (2, 0), (1, 1), (2, 1), (1, 2), (2, 2)];
        let reference = canvas(5, 5, &[]);
        let current = canvas(5, 5, &black);
        let first = ImageView::from_rgb(&reference, 5, 5).unwrap();
        let second = ImageView::from_rgb(&current, 5, 5).unwrap();

        let mut narrow = CaretDetector::new(1.0);
        assert!(narrow.validate(&ctx(&first, &second, 1, 0)));

        let mut wide = CaretDetector::new(2.0);
        assert!(wide.validate(&ctx(&first, &second, 1, 0)));
        assert_eq!(
            wide.state(),
            CaretState::Locked {
                caret: Rect {
                    left: 1,
                    top: 0,
                    right: 2,
                    bottom: 2
                }
            }
        );
        assert!(wide.validate(&ctx(&first, &second, 2, 1)));
    }

    #[test]
    fn broken_bar_of_wrong_width_is_rejected() {
        // Second column stops after the first row: the probe ends mid-block.
        let black = [(1, 0), (2, 0), (1, 1)];
        let reference = canvas(5, 5, &[]);
        let current = canvas(5, 5, &black);
        let first = ImageView::from_rgb(&reference, 5, 5).unwrap();
        let second = ImageView::from_rgb(&current, 5, 5).unwrap();

        let mut detector = CaretDetector::new(2.0);
        assert!(!detector.validate(&ctx(&first, &second, 1, 0)));
        assert_eq!(detector.state(), CaretState::Searching);
    }

    #[test]
    fn only_the_first_caret_is_forgiven() {
        let black = [(0, 0), (0, 1), (0, 2), (3, 0), (3, 1), (3, 2)];
        let reference = canvas(5, 4, &[]);
        let current = canvas(5, 4, &black);
        let first = ImageView::from_rgb(&reference, 5, 4).unwrap();
        let second = ImageView::from_rgb(&current, 5, 4).unwrap();

        let mut detector = CaretDetector::new(1.0);
        assert!(detector.validate(&ctx(&first, &second, 0, 0)));
        assert!(!detector.validate(&ctx(&first, &second, 3, 0)));
        assert_eq!(second.pixel(3, 0), Color::new(0, 0, 0));
    }
}

use looksame::{
    create_diff, diff_area, looks_same, BoundingBox, Color, CompareOptions, ImageView,
    LooksSameError, Rect,
};

const WHITE: [u8; 3] = [255, 255, 255];
const BLACK: [u8; 3] = [0, 0, 0];
const GRAY: [u8; 3] = [120, 120, 120];
const RED: [u8; 3] = [255, 0, 0];

struct Canvas {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Canvas {
    fn filled(width: usize, height: usize, color: [u8; 3]) -> Self {
        Self {
            data: color.repeat(width * height),
            width,
            height,
        }
    }

    fn paint(mut self, points: &[(usize, usize)], color: [u8; 3]) -> Self {
        for &(x, y) in points {
            let idx = (y * self.width + x) * 3;
            self.data[idx..idx + 3].copy_from_slice(&color);
        }
        self
    }

    fn view(&self) -> ImageView<'_> {
        ImageView::from_rgb(&self.data, self.width, self.height).unwrap()
    }
}

fn column(x: usize, rows: std::ops::RangeInclusive<usize>) -> Vec<(usize, usize)> {
    rows.map(|y| (x, y)).collect()
}

#[test]
fn identical_buffers_are_equal() {
    let first = Canvas::filled(16, 8, GRAY).paint(&[(3, 3)], RED);
    let second = Canvas::filled(16, 8, GRAY).paint(&[(3, 3)], RED);
    let result = looks_same(first.view(), second.view(), &CompareOptions::default()).unwrap();
    assert!(result.equal);
    assert_eq!(result.reference_size, (16, 8));
    assert_eq!(result.diff_bounds, None);
    assert!(result.diff_clusters.is_empty());
}

#[test]
fn single_pixel_difference_is_reported_at_its_position() {
    let first = Canvas::filled(20, 10, GRAY);
    let second = Canvas::filled(20, 10, GRAY).paint(&[(12, 6)], RED);
    let result = looks_same(first.view(), second.view(), &CompareOptions::default()).unwrap();
    assert!(!result.equal);
    assert_eq!(result.diff_bounds, Some(Rect::point(12, 6)));
    assert_eq!(result.diff_clusters, vec![Rect::point(12, 6)]);

    let opts = CompareOptions {
        stop_on_first_fail: true,
        ..CompareOptions::default()
    };
    let result = looks_same(first.view(), second.view(), &opts).unwrap();
    assert!(!result.equal);
    assert_eq!(result.diff_bounds, Some(Rect::point(12, 6)));
}

#[test]
fn stop_on_first_fail_reports_only_the_first_mismatch_in_row_order() {
    let first = Canvas::filled(20, 10, GRAY);
    let second = Canvas::filled(20, 10, GRAY).paint(&[(12, 6), (3, 8)], RED);

    let full = looks_same(first.view(), second.view(), &CompareOptions::default()).unwrap();
    assert_eq!(
        full.diff_bounds,
        Some(Rect {
            left: 3,
            top: 6,
            right: 12,
            bottom: 8
        })
    );

    let opts = CompareOptions {
        stop_on_first_fail: true,
        ..CompareOptions::default()
    };
    let early = looks_same(first.view(), second.view(), &opts).unwrap();
    assert!(!early.equal);
    assert_eq!(early.diff_bounds, Some(Rect::point(12, 6)));
}

#[test]
fn blinking_caret_is_forgiven_by_default() {
    let first = Canvas::filled(20, 10, WHITE);
    let second = Canvas::filled(20, 10, WHITE).paint(&column(5, 2..=5), BLACK);

    let result = looks_same(first.view(), second.view(), &CompareOptions::default()).unwrap();
    assert!(result.equal);

    let opts = CompareOptions {
        ignore_caret: false,
        ..CompareOptions::default()
    };
    let result = looks_same(first.view(), second.view(), &opts).unwrap();
    assert!(!result.equal);
    assert_eq!(
        result.diff_bounds,
        Some(Rect {
            left: 5,
            top: 2,
            right: 5,
            bottom: 5
        })
    );
}

#[test]
fn caret_width_follows_pixel_ratio() {
    let first = Canvas::filled(20, 10, WHITE);
    let mut bar = column(5, 2..=5);
    bar.extend(column(6, 2..=5));
    let second = Canvas::filled(20, 10, WHITE).paint(&bar, BLACK);

    let retina = CompareOptions {
        pixel_ratio: 2.0,
        ..CompareOptions::default()
    };
    assert!(looks_same(first.view(), second.view(), &retina).unwrap().equal);

    let result = looks_same(first.view(), second.view(), &CompareOptions::default()).unwrap();
    assert!(!result.equal);
}

#[test]
fn only_the_first_caret_is_forgiven() {
    let first = Canvas::filled(20, 10, WHITE);
    let mut bars = column(5, 2..=5);
    bars.extend(column(14, 2..=5));
    let second = Canvas::filled(20, 10, WHITE).paint(&bars, BLACK);

    let result = looks_same(first.view(), second.view(), &CompareOptions::default()).unwrap();
    assert!(!result.equal);
    assert_eq!(
        result.diff_bounds,
        Some(Rect {
            left: 14,
            top: 2,
            right: 14,
            bottom: 5
        })
    );
}

/// Black left half, white right half, with one smoothed edge pixel.
fn edge(gray_at: Option<(usize, usize)>) -> Canvas {
    let left_half: Vec<(usize, usize)> = (0..10).flat_map(|y| (0..5).map(move |x| (x, y))).collect();
    let canvas = Canvas::filled(10, 10, WHITE).paint(&left_half, BLACK);
    match gray_at {
        Some(point) => canvas.paint(&[point], [128, 128, 128]),
        None => canvas,
    }
}

#[test]
fn antialiased_edge_pixel_is_forgiven_by_default() {
    let first = edge(None);
    let second = edge(Some((5, 4)));

    let result = looks_same(first.view(), second.view(), &CompareOptions::default()).unwrap();
    assert!(result.equal);

    let opts = CompareOptions {
        ignore_antialiasing: false,
        ..CompareOptions::default()
    };
    let result = looks_same(first.view(), second.view(), &opts).unwrap();
    assert!(!result.equal);
    assert_eq!(result.diff_bounds, Some(Rect::point(5, 4)));
}

#[test]
fn tolerance_widens_the_match() {
    let first = Canvas::filled(6, 6, [130, 80, 60]);
    let second = Canvas::filled(6, 6, [140, 80, 60]);
    let base = CompareOptions {
        ignore_caret: false,
        ..CompareOptions::default()
    };

    assert!(!looks_same(first.view(), second.view(), &base).unwrap().equal);

    let tolerant = CompareOptions {
        tolerance: Some(5.0),
        ..base.clone()
    };
    assert!(looks_same(first.view(), second.view(), &tolerant).unwrap().equal);

    let strict = CompareOptions {
        strict: true,
        ..base
    };
    let result = looks_same(first.view(), second.view(), &strict).unwrap();
    assert_eq!(
        result.diff_bounds,
        Some(Rect {
            left: 0,
            top: 0,
            right: 5,
            bottom: 5
        })
    );
}

#[test]
fn strict_with_tolerance_is_rejected_before_scanning() {
    let first = Canvas::filled(4, 4, GRAY);
    let opts = CompareOptions {
        strict: true,
        tolerance: Some(1.0),
        ..CompareOptions::default()
    };
    let err = looks_same(first.view(), first.view(), &opts).unwrap_err();
    assert_eq!(err, LooksSameError::StrictWithTolerance);
    assert_eq!(
        diff_area(first.view(), first.view(), &opts).unwrap_err(),
        LooksSameError::StrictWithTolerance
    );
    assert!(create_diff(first.view(), first.view(), &opts).is_err());
}

#[test]
fn different_sizes_differ_over_the_larger_area() {
    let first = Canvas::filled(4, 3, GRAY);
    let second = Canvas::filled(6, 5, GRAY);
    let result = looks_same(first.view(), second.view(), &CompareOptions::default()).unwrap();
    let bounds = Rect {
        left: 0,
        top: 0,
        right: 5,
        bottom: 4,
    };
    assert!(!result.equal);
    assert_eq!(result.reference_size, (4, 3));
    assert_eq!(result.diff_bounds, Some(bounds));
    assert_eq!(result.diff_clusters, vec![bounds]);
    assert_eq!(
        diff_area(first.view(), second.view(), &CompareOptions::default()).unwrap(),
        Some(bounds)
    );
}

#[test]
fn repeated_comparisons_give_identical_results() {
    let first = Canvas::filled(20, 10, WHITE);
    let second = Canvas::filled(20, 10, WHITE)
        .paint(&column(5, 2..=5), BLACK)
        .paint(&[(15, 8), (2, 9)], RED);
    let opts = CompareOptions {
        should_cluster: true,
        ..CompareOptions::default()
    };
    let once = looks_same(first.view(), second.view(), &opts).unwrap();
    let twice = looks_same(first.view(), second.view(), &opts).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn clustering_separates_distant_differences() {
    let first = Canvas::filled(40, 10, GRAY);
    let second = Canvas::filled(40, 10, GRAY).paint(&[(2, 2), (30, 2), (6, 2)], RED);
    let opts = CompareOptions {
        should_cluster: true,
        ..CompareOptions::default()
    };
    let result = looks_same(first.view(), second.view(), &opts).unwrap();
    assert_eq!(
        result.diff_clusters,
        vec![
            Rect {
                left: 2,
                top: 2,
                right: 6,
                bottom: 2
            },
            Rect::point(30, 2),
        ]
    );

    let bounds = result.diff_bounds.unwrap();
    for cluster in &result.diff_clusters {
        assert!(bounds.contains(cluster.left, cluster.top));
        assert!(bounds.contains(cluster.right, cluster.bottom));
    }
    for (i, a) in result.diff_clusters.iter().enumerate() {
        for b in &result.diff_clusters[i + 1..] {
            assert!(!a.overlaps(b));
        }
    }
}

#[test]
fn bounded_regions_report_absolute_coordinates() {
    let first = Canvas::filled(20, 20, GRAY).paint(&[(1, 1)], RED);
    let second = Canvas::filled(20, 20, GRAY).paint(&[(12, 13)], RED);
    let bbox = BoundingBox::new(10, 10, 15, 15).unwrap();

    let first_view = first.view().bounded(bbox).unwrap();
    let second_view = second.view().bounded(bbox).unwrap();
    let result = looks_same(first_view, second_view, &CompareOptions::default()).unwrap();
    assert!(!result.equal);
    assert_eq!(result.reference_size, (6, 6));
    assert_eq!(result.diff_bounds, Some(Rect::point(12, 13)));

    let outside = BoundingBox::new(0, 0, 5, 5).unwrap();
    let result = looks_same(
        first.view().bounded(outside).unwrap(),
        second.view().bounded(outside).unwrap(),
        &CompareOptions::default(),
    )
    .unwrap();
    assert_eq!(result.diff_bounds, Some(Rect::point(1, 1)));
}

#[test]
fn rgba_and_rgb_buffers_with_the_same_colors_are_equal() {
    let rgb = Canvas::filled(5, 4, GRAY);
    let rgba: Vec<u8> = [120, 120, 120, 7].repeat(5 * 4);
    let rgba_view = ImageView::from_rgba(&rgba, 5, 4).unwrap();
    let result = looks_same(rgb.view(), rgba_view, &CompareOptions::default()).unwrap();
    assert!(result.equal);
}

#[test]
fn diff_image_highlights_mismatches_and_copies_matches() {
    let first = Canvas::filled(4, 3, GRAY);
    let second = Canvas::filled(4, 3, [121, 120, 120]).paint(&[(1, 1)], RED);
    let highlight = Color::parse("#00ff00").unwrap();
    let opts = CompareOptions {
        create_diff_image: true,
        highlight_color: highlight,
        ..CompareOptions::default()
    };

    let result = looks_same(first.view(), second.view(), &opts).unwrap();
    assert!(!result.equal);
    let diff = result.diff_image.unwrap();
    assert_eq!(diff.different_pixels, 1);
    assert_eq!(diff.total_pixels, 12);
    assert_eq!(diff.image.get(1, 1), Some(highlight));
    assert_eq!(diff.image.get(0, 0), Some(Color::new(121, 120, 120)));

    let standalone = create_diff(first.view(), second.view(), &opts).unwrap();
    assert_eq!(standalone, diff);
}

#[test]
fn diff_image_of_different_sizes_paints_the_uncovered_area() {
    let first = Canvas::filled(2, 2, GRAY);
    let second = Canvas::filled(3, 2, GRAY);
    let opts = CompareOptions {
        create_diff_image: true,
        ..CompareOptions::default()
    };
    let result = looks_same(first.view(), second.view(), &opts).unwrap();
    assert!(!result.equal);
    assert_eq!(
        result.diff_bounds,
        Some(Rect {
            left: 2,
            top: 0,
            right: 2,
            bottom: 1
        })
    );
    let diff = result.diff_image.unwrap();
    assert_eq!(diff.different_pixels, 2);
    assert_eq!(diff.image.get(2, 0), Some(Color::MAGENTA));
    assert_eq!(diff.image.get(0, 0), Some(Color::new(120, 120, 120)));
}

#[test]
fn clusters_never_overlap_after_a_component_grows_over_another() {
    let first = Canvas::filled(8, 16, GRAY);
    let mut points = vec![(0, 0)];
    points.extend(column(5, 0..=10));
    points.extend([(0, 8), (1, 9), (2, 10), (3, 11), (4, 12), (5, 13)]);
    let second = Canvas::filled(8, 16, GRAY).paint(&points, RED);
    let opts = CompareOptions {
        strict: true,
        ignore_antialiasing: false,
        ignore_caret: false,
        should_cluster: true,
        cluster_radius: 1,
        ..CompareOptions::default()
    };

    let result = looks_same(first.view(), second.view(), &opts).unwrap();
    assert_eq!(
        result.diff_clusters,
        vec![Rect {
            left: 0,
            top: 0,
            right: 5,
            bottom: 13
        }]
    );
    assert_eq!(
        looksame::lowlevel::join_clusters(&result.diff_clusters),
        result.diff_clusters
    );
}

#[test]
fn zero_cluster_radius_uses_the_default_radius() {
    let first = Canvas::filled(20, 10, GRAY);
    let second = Canvas::filled(20, 10, GRAY).paint(&[(1, 1), (1, 2), (6, 2)], RED);
    let opts = CompareOptions {
        strict: true,
        ignore_antialiasing: false,
        ignore_caret: false,
        should_cluster: true,
        cluster_radius: 0,
        ..CompareOptions::default()
    };
    let result = looks_same(first.view(), second.view(), &opts).unwrap();
    assert_eq!(
        result.diff_clusters,
        vec![Rect {
            left: 1,
            top: 1,
            right: 6,
            bottom: 2
        }]
    );
}

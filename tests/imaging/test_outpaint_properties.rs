// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Compositing and expansion properties across many size combinations

use ai_image_backend::imaging::{composite, MASK_EDITABLE, MASK_PRESERVE};
use ai_image_backend::tools::{expand_image, should_expand};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};

use crate::common::{FakeProvider, FILL_COLOR};

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, 42])
    }))
}

#[test]
fn test_composite_invariants_hold_for_size_grid() {
    for (w, h) in [(1, 1), (3, 5), (8, 8), (7, 2)] {
        for (tw, th) in [(w, h), (w + 1, h), (w, h + 3), (w + 6, h + 9), (w * 3, h * 2)] {
            let image = gradient(w, h);
            let composite = composite(&image, tw, th).unwrap();

            assert_eq!(composite.canvas.dimensions(), (tw, th));
            assert_eq!(composite.mask.dimensions(), (tw, th));
            assert_eq!(composite.x_offset, (tw - w) / 2);
            assert_eq!(composite.y_offset, (th - h) / 2);

            for y in 0..th {
                for x in 0..tw {
                    let inside = x >= composite.x_offset
                        && x < composite.x_offset + w
                        && y >= composite.y_offset
                        && y < composite.y_offset + h;
                    let expected = if inside { MASK_PRESERVE } else { MASK_EDITABLE };
                    assert_eq!(
                        composite.mask.get_pixel(x, y)[0],
                        expected,
                        "{}x{} -> {}x{} at ({}, {})",
                        w,
                        h,
                        tw,
                        th,
                        x,
                        y
                    );
                    if inside {
                        let source =
                            image.get_pixel(x - composite.x_offset, y - composite.y_offset);
                        let placed = composite.canvas.get_pixel(x, y);
                        assert_eq!(placed.0, [source[0], source[1], source[2]]);
                    }
                }
            }
        }
    }
}

#[test]
fn test_composite_none_whenever_target_shrinks() {
    for (tw, th) in [(9, 10), (10, 9), (1, 1), (100, 9)] {
        assert!(composite(&gradient(10, 10), tw, th).is_none());
    }
}

#[test]
fn test_should_expand_matches_growth_rule() {
    for (current, target, expected) in [
        ((10, 10), (11, 10), true),
        ((10, 10), (10, 10), false),
        ((10, 10), (9, 20), false),
        ((10, 10), (20, 9), false),
        ((10, 10), (5, 5), false),
    ] {
        assert_eq!(should_expand(true, current, target), expected, "{:?} -> {:?}", current, target);
        assert!(!should_expand(false, current, target));
    }
}

#[tokio::test]
async fn test_expand_image_preserves_center_and_fills_border() {
    let provider = FakeProvider::new();
    let source = gradient(6, 4);
    let expanded = expand_image(provider.as_ref(), source.clone(), 11, 9, "sky")
        .await
        .unwrap();

    assert_eq!(expanded.dimensions(), (11, 9));
    // offsets (2, 2)
    assert_eq!(expanded.get_pixel(2, 2), source.get_pixel(0, 0));
    assert_eq!(expanded.get_pixel(7, 5), source.get_pixel(5, 3));
    let fill = image::Rgba([FILL_COLOR[0], FILL_COLOR[1], FILL_COLOR[2], 255]);
    assert_eq!(expanded.get_pixel(8, 5), fill);
    assert_eq!(expanded.get_pixel(10, 8), fill);
    assert_eq!(expanded.get_pixel(2, 1), fill);
}

#[tokio::test]
async fn test_expand_image_returns_input_for_smaller_target() {
    let provider = FakeProvider::new();
    let source = gradient(6, 4);
    let result = expand_image(provider.as_ref(), source.clone(), 3, 8, "sky")
        .await
        .unwrap();

    assert_eq!(result.dimensions(), (6, 4));
    assert_eq!(provider.load_count(), 0);
}

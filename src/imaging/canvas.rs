// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Canvas compositing for outpainting and canvas expansion

use image::{imageops, DynamicImage, GrayImage, Luma, Rgb, RgbImage, RgbaImage};

/// Opaque fill for the area the inpainting model will regenerate
pub const NEUTRAL_BACKGROUND: Rgb<u8> = Rgb([127, 127, 127]);

/// Mask value for pixels the model must leave untouched
pub const MASK_PRESERVE: u8 = 0;

/// Mask value for pixels the model regenerates
pub const MASK_EDITABLE: u8 = 255;

/// An image centered on a larger canvas together with its outpainting mask
#[derive(Debug, Clone)]
pub struct Composite {
    pub canvas: RgbImage,
    /// Same dimensions as `canvas`
    pub mask: GrayImage,
    pub x_offset: u32,
    pub y_offset: u32,
}

/// Floor-centered offsets of a `width` x `height` image on the target canvas
///
/// `None` when the canvas would be smaller than the image on either axis.
pub fn centering_offsets(
    width: u32,
    height: u32,
    target_width: u32,
    target_height: u32,
) -> Option<(u32, u32)> {
    if target_width < width || target_height < height {
        return None;
    }
    Some(((target_width - width) / 2, (target_height - height) / 2))
}

/// Paste `image` centered on an opaque canvas and build the border mask
///
/// Returns `None` without allocating anything when either target dimension
/// is smaller than the image; callers pass the image through unchanged.
///
/// The mask marks the top, left, right and bottom bands around the pasted
/// rectangle as editable. With an odd size difference the extra pixel lands
/// on the right/bottom side and is part of the editable band there.
pub fn composite(image: &DynamicImage, target_width: u32, target_height: u32) -> Option<Composite> {
    let (width, height) = (image.width(), image.height());
    let (x_offset, y_offset) = centering_offsets(width, height, target_width, target_height)?;

    let mut canvas = RgbImage::from_pixel(target_width, target_height, NEUTRAL_BACKGROUND);
    imageops::replace(
        &mut canvas,
        &image.to_rgb8(),
        i64::from(x_offset),
        i64::from(y_offset),
    );

    let right_edge = x_offset + width;
    let bottom_edge = y_offset + height;
    let mask = GrayImage::from_fn(target_width, target_height, |x, y| {
        let preserved = x >= x_offset && x < right_edge && y >= y_offset && y < bottom_edge;
        Luma([if preserved { MASK_PRESERVE } else { MASK_EDITABLE }])
    });

    Some(Composite {
        canvas,
        mask,
        x_offset,
        y_offset,
    })
}

/// Center `image` on a transparent canvas of the new size
///
/// Offsets clamp at zero, so an image larger than the canvas is clipped on
/// its right/bottom edge.
pub fn expand_canvas(image: &DynamicImage, target_width: u32, target_height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::new(target_width, target_height);
    let left = (i64::from(target_width) - i64::from(image.width())).max(0) / 2;
    let top = (i64::from(target_height) - i64::from(image.height())).max(0) / 2;
    imageops::replace(&mut canvas, &image.to_rgba8(), left, top);
    canvas
}

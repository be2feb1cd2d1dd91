// ABOUTME: Grayscale raster frames fed to the bar detector
// ABOUTME: Wraps packed luma, RGB, or BGR camera buffers as image::GrayImage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Camera frames arrive as packed byte buffers. They are wrapped in `image`
//! buffers and reduced to a single luma channel for the bar detector.

use image::{imageops, GrayImage, RgbImage};

use crate::errors::{CoreError, CoreResult};

/// Wrap a grayscale buffer of `width * height` bytes
///
/// # Errors
///
/// Returns `CoreError::InvalidRaster` when the buffer is too short for the
/// declared dimensions.
pub fn gray_from_luma(width: u32, height: u32, pixels: Vec<u8>) -> CoreResult<GrayImage> {
    let len = pixels.len();
    GrayImage::from_raw(width, height, pixels).ok_or(CoreError::InvalidRaster {
        width,
        height,
        channels: 1,
        len,
    })
}

/// Convert a packed 3-byte RGB buffer
///
/// # Errors
///
/// Returns `CoreError::InvalidRaster` when the buffer is too short.
pub fn gray_from_rgb(width: u32, height: u32, rgb: Vec<u8>) -> CoreResult<GrayImage> {
    let image = rgb_image(width, height, rgb)?;
    Ok(imageops::grayscale(&image))
}

/// Convert a packed 3-byte BGR buffer (the usual camera capture layout)
///
/// # Errors
///
/// Returns `CoreError::InvalidRaster` when the buffer is too short.
pub fn gray_from_bgr(width: u32, height: u32, bgr: Vec<u8>) -> CoreResult<GrayImage> {
    let mut image = rgb_image(width, height, bgr)?;
    for pixel in image.pixels_mut() {
        pixel.0.swap(0, 2);
    }
    Ok(imageops::grayscale(&image))
}

fn rgb_image(width: u32, height: u32, bytes: Vec<u8>) -> CoreResult<RgbImage> {
    let len = bytes.len();
    RgbImage::from_raw(width, height, bytes).ok_or(CoreError::InvalidRaster {
        width,
        height,
        channels: 3,
        len,
    })
}

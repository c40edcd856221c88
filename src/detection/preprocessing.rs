use image::{DynamicImage, GrayImage, ImageBuffer, Luma, RgbImage};
use imageproc::filter::separable_filter_equal;

use crate::models::Preprocessed;

/// Side length of the smoothing kernel
pub const BLUR_KERNEL_SIZE: usize = 5;

/// Convert image to a display-ready RGB copy.
///
/// Decoders already hand back RGB, so this is a plain duplicate.
pub fn to_display(img: &RgbImage) -> RgbImage {
    img.clone()
}

/// Convert image to grayscale
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    DynamicImage::ImageRgb8(img.clone()).to_luma8()
}

/// Sigma picked for a Gaussian kernel of the given size when none is specified
pub fn sigma_for_kernel(size: usize) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalised 1-D Gaussian weights
pub fn gaussian_kernel(size: usize) -> Vec<f32> {
    let sigma = sigma_for_kernel(size);
    let half = (size / 2) as f32;
    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - half;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Apply a 5x5 Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage) -> GrayImage {
    let kernel = gaussian_kernel(BLUR_KERNEL_SIZE);

    // Filter in f32 and round once so flat regions keep their exact value
    let widened: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(img.width(), img.height(), |x, y| {
            Luma([f32::from(img.get_pixel(x, y)[0])])
        });
    let blurred = separable_filter_equal(&widened, &kernel);

    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([blurred.get_pixel(x, y)[0].round().clamp(0.0, 255.0) as u8])
    })
}

/// Produce the display, luminance and smoothed rasters for a color source
pub fn process(img: &RgbImage) -> Preprocessed {
    let display = to_display(img);
    let luminance = to_grayscale(img);
    let smoothed = apply_blur(&luminance);

    Preprocessed {
        display,
        luminance,
        smoothed,
    }
}

//! Canny edge detection on an already smoothed luminance image.
//!
//! `imageproc::edges::canny` blurs its input again before taking gradients,
//! so the stages are assembled here from `imageproc` Sobel filters: L1
//! gradient magnitude, non-maximum suppression along the quantised gradient
//! direction, then 8-connected hysteresis.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::definitions::Image;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::error::Result;
use crate::models::Thresholds;

/// Pixel value marking an edge
pub const EDGE: u8 = 255;
/// Pixel value marking background
pub const NO_EDGE: u8 = 0;

type Magnitude = ImageBuffer<Luma<i32>, Vec<i32>>;

/// Detect edges using Canny with the given hysteresis thresholds.
///
/// Magnitudes strictly above `high` seed edges; magnitudes strictly above
/// `low` join an edge when 8-connected to one.
pub fn detect(img: &GrayImage, thresholds: Thresholds) -> Result<GrayImage> {
    thresholds.validate()?;

    let gx = horizontal_sobel(img);
    let gy = vertical_sobel(img);
    let magnitude = gradient_magnitude(&gx, &gy);
    let thinned = non_maximum_suppression(&magnitude, &gx, &gy);

    Ok(hysteresis(&thinned, thresholds.low, thresholds.high))
}

fn gradient_magnitude(gx: &Image<Luma<i16>>, gy: &Image<Luma<i16>>) -> Magnitude {
    ImageBuffer::from_fn(gx.width(), gx.height(), |x, y| {
        let h = i32::from(gx.get_pixel(x, y)[0]);
        let v = i32::from(gy.get_pixel(x, y)[0]);
        Luma([h.abs() + v.abs()])
    })
}

/// Quantised gradient direction in degrees: 0, 45, 90 or 135
fn direction(h: i32, v: i32) -> u32 {
    let mut angle = (v as f32).atan2(h as f32).to_degrees();
    if angle < 0.0 {
        angle += 180.0;
    }

    if !(22.5..157.5).contains(&angle) {
        0
    } else if angle < 67.5 {
        45
    } else if angle < 112.5 {
        90
    } else {
        135
    }
}

/// Keep only pixels that are local maxima across the edge.
///
/// Border pixels are always suppressed.
pub(crate) fn non_maximum_suppression(
    magnitude: &Magnitude,
    gx: &Image<Luma<i16>>,
    gy: &Image<Luma<i16>>,
) -> Magnitude {
    let (width, height) = magnitude.dimensions();
    let mut out = Magnitude::new(width, height);
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let m = magnitude.get_pixel(x, y)[0];
            if m == 0 {
                continue;
            }

            let h = i32::from(gx.get_pixel(x, y)[0]);
            let v = i32::from(gy.get_pixel(x, y)[0]);
            let (before, after) = match direction(h, v) {
                0 => ((x - 1, y), (x + 1, y)),
                45 => ((x - 1, y - 1), (x + 1, y + 1)),
                90 => ((x, y - 1), (x, y + 1)),
                _ => ((x + 1, y - 1), (x - 1, y + 1)),
            };
            let before = magnitude.get_pixel(before.0, before.1)[0];
            let after = magnitude.get_pixel(after.0, after.1)[0];

            // Ties go to the first pixel of a plateau so ridges stay one pixel wide
            if m > before && m >= after {
                out.put_pixel(x, y, Luma([m]));
            }
        }
    }

    out
}

fn hysteresis(thinned: &Magnitude, low: i32, high: i32) -> GrayImage {
    let (width, height) = thinned.dimensions();
    let mut out = GrayImage::from_pixel(width, height, Luma([NO_EDGE]));
    let mut stack = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if thinned.get_pixel(x, y)[0] <= high || out.get_pixel(x, y)[0] == EDGE {
                continue;
            }

            out.put_pixel(x, y, Luma([EDGE]));
            stack.push((x, y));

            while let Some((cx, cy)) = stack.pop() {
                for (nx, ny) in neighbours(cx, cy, width, height) {
                    if out.get_pixel(nx, ny)[0] == NO_EDGE && thinned.get_pixel(nx, ny)[0] > low {
                        out.put_pixel(nx, ny, Luma([EDGE]));
                        stack.push((nx, ny));
                    }
                }
            }
        }
    }

    out
}

/// In-bounds 8-neighbourhood of (x, y)
fn neighbours(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    (-1i64..=1)
        .flat_map(|dy| (-1i64..=1).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| dx != 0 || dy != 0)
        .filter_map(move |(dx, dy)| {
            let nx = i64::from(x) + dx;
            let ny = i64::from(y) + dy;
            if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
                None
            } else {
                Some((nx as u32, ny as u32))
            }
        })
}

use std::path::Path;

use image::{ImageError, ImageReader, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::error::{Error, Result};
use crate::presenter::save_jpeg;

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const DISC_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const RECTANGLE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const TRIANGLE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// File name of the synthesized image inside the output directory
pub const TEST_IMAGE_FILE: &str = "test_shapes.jpg";

/// Read an image file and normalise it to 8-bit RGB
pub fn load(path: &Path) -> Result<RgbImage> {
    let decoded = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(ImageError::IoError)
        .and_then(|reader| reader.decode())
        .map_err(|source| Error::Load {
            path: path.to_path_buf(),
            source,
        })?;

    log::debug!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        decoded.width(),
        decoded.height(),
        decoded.color()
    );

    Ok(decoded.to_rgb8())
}

/// Geometry of the three shapes drawn on a synthetic canvas.
///
/// Coordinates scale with the canvas; on 800x600 they are the disc at
/// (200,200) radius 100, the square (400,100)-(600,300) and the triangle
/// (700,300), (600,500), (800,500).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestShapes {
    pub disc_center: (i32, i32),
    pub disc_radius: i32,
    /// Inclusive corners
    pub rect_top_left: (i32, i32),
    pub rect_bottom_right: (i32, i32),
    pub triangle: [(i32, i32); 3],
}

impl TestShapes {
    pub fn for_canvas(width: u32, height: u32) -> Self {
        let w = width as i32;
        let h = height as i32;

        Self {
            disc_center: (w / 4, h / 3),
            disc_radius: w.min(h) / 6,
            rect_top_left: (w / 2, h / 6),
            rect_bottom_right: (3 * w / 4, h / 2),
            triangle: [(7 * w / 8, h / 2), (3 * w / 4, 5 * h / 6), (w, 5 * h / 6)],
        }
    }

    /// Inclusive (min_x, min_y, max_x, max_y) box around each shape
    pub fn bounding_boxes(&self) -> [(i32, i32, i32, i32); 3] {
        let (cx, cy) = self.disc_center;
        let r = self.disc_radius;
        let xs = self.triangle.map(|(x, _)| x);
        let ys = self.triangle.map(|(_, y)| y);

        [
            (cx - r, cy - r, cx + r, cy + r),
            (
                self.rect_top_left.0,
                self.rect_top_left.1,
                self.rect_bottom_right.0,
                self.rect_bottom_right.1,
            ),
            (
                xs.iter().copied().min().unwrap_or(0),
                ys.iter().copied().min().unwrap_or(0),
                xs.iter().copied().max().unwrap_or(0),
                ys.iter().copied().max().unwrap_or(0),
            ),
        ]
    }

    fn draw(&self, canvas: &mut RgbImage) {
        draw_filled_circle_mut(canvas, self.disc_center, self.disc_radius, DISC_COLOR);

        let (x0, y0) = self.rect_top_left;
        let (x1, y1) = self.rect_bottom_right;
        let rect = Rect::at(x0, y0).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32);
        draw_filled_rect_mut(canvas, rect, RECTANGLE_COLOR);

        let polygon = self.triangle.map(|(x, y)| Point::new(x, y));
        // draw_polygon_mut panics when the outline is closed explicitly
        if polygon[0] != polygon[2] {
            draw_polygon_mut(canvas, &polygon, TRIANGLE_COLOR);
        }
    }
}

/// Render the disc, square and triangle on a white canvas
pub fn synthesize(width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, BACKGROUND);
    TestShapes::for_canvas(width, height).draw(&mut canvas);
    canvas
}

/// Synthesize the test image and keep a copy at `path` for reuse
pub fn synthesize_to(path: &Path, width: u32, height: u32) -> Result<RgbImage> {
    let image = synthesize(width, height);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(Error::io(parent))?;
    }
    save_jpeg(&image, path)?;
    log::debug!("Wrote synthetic {}x{} image to {}", width, height, path.display());

    Ok(image)
}

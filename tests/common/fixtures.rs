use image::{GrayImage, ImageBuffer, Rgb};
use tempfile::NamedTempFile;

/// Creates a 120x90 PNG with a dark 40x30 square on a light background.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image() -> NamedTempFile {
    let img = ImageBuffer::from_fn(120, 90, |x, y| {
        if (40..80).contains(&x) && (30..60).contains(&y) {
            Rgb([20u8, 30u8, 40u8])
        } else {
            Rgb([230u8, 225u8, 220u8])
        }
    });
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Creates a file with an image extension but garbage contents
pub fn create_corrupt_image() -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".jpg")
        .tempfile()
        .expect("Failed to create temp file");
    std::fs::write(file.path(), b"this is not a jpeg").expect("Failed to write temp file");
    file
}

pub fn output_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().expect("Failed to create temp directory")
}

pub fn is_edge(edges: &GrayImage, x: u32, y: u32) -> bool {
    edges.get_pixel(x, y)[0] == edgeview::detection::edges::EDGE
}

/// True when an edge pixel lies within `radius` (Chebyshev) of (x, y)
pub fn edge_near(edges: &GrayImage, x: u32, y: u32, radius: u32) -> bool {
    let x0 = x.saturating_sub(radius);
    let y0 = y.saturating_sub(radius);
    let x1 = (x + radius).min(edges.width() - 1);
    let y1 = (y + radius).min(edges.height() - 1);
    (y0..=y1).any(|yy| (x0..=x1).any(|xx| is_edge(edges, xx, yy)))
}

pub fn count_edges(edges: &GrayImage) -> usize {
    edges
        .pixels()
        .filter(|p| p[0] == edgeview::detection::edges::EDGE)
        .count()
}

/// Collect edge pixels inside an inclusive box
pub fn edges_in_box(edges: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) -> Vec<(u32, u32)> {
    (y0..=y1)
        .flat_map(|y| (x0..=x1).map(move |x| (x, y)))
        .filter(|&(x, y)| is_edge(edges, x, y))
        .collect()
}

pub mod composite;
#[cfg(feature = "gui")]
pub mod viewer;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{GrayImage, ImageBuffer, ImageFormat, Pixel, PixelWithColorType, RgbImage};

use crate::error::{Error, Result};
use crate::models::PipelineRun;

pub const COMPOSITE_FILE: &str = "edge_detection_results.png";
pub const ORIGINAL_FILE: &str = "original.jpg";
pub const GRAYSCALE_FILE: &str = "grayscale.jpg";
pub const BLURRED_FILE: &str = "blurred.jpg";
pub const EDGES_FILE: &str = "edge_detected.jpg";

/// Quality used for every JPEG this crate writes
pub const JPEG_QUALITY: u8 = 95;

/// Write an 8-bit image as JPEG
pub(crate) fn save_jpeg<P>(image: &ImageBuffer<P, Vec<u8>>, path: &Path) -> Result<()>
where
    P: Pixel<Subpixel = u8> + PixelWithColorType,
{
    let file = File::create(path).map_err(Error::io(path))?;
    let mut writer = BufWriter::new(file);
    image
        .write_with_encoder(JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY))
        .map_err(Error::encode(path))?;
    writer.flush().map_err(Error::io(path))?;
    Ok(())
}

/// Paths written by one presentation, plus the composite itself
#[derive(Debug, Clone)]
pub struct Presentation {
    pub composite_path: PathBuf,
    pub original_path: PathBuf,
    pub grayscale_path: PathBuf,
    pub blurred_path: PathBuf,
    pub edges_path: PathBuf,
    pub composite: RgbImage,
}

impl Presentation {
    pub fn written_files(&self) -> [&Path; 5] {
        [
            &self.composite_path,
            &self.original_path,
            &self.grayscale_path,
            &self.blurred_path,
            &self.edges_path,
        ]
    }
}

/// Writes stage images and the composite, then optionally shows it
pub struct Presenter {
    output_dir: PathBuf,
    panel_width: u32,
    display: bool,
}

impl Presenter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            panel_width: composite::DEFAULT_PANEL_WIDTH,
            display: false,
        }
    }

    pub fn with_panel_width(mut self, panel_width: u32) -> Self {
        self.panel_width = panel_width;
        self
    }

    pub fn with_display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Present the stages of a finished run
    pub fn present_run(&self, run: &PipelineRun) -> Result<Presentation> {
        self.present(
            &run.stages.display,
            &run.stages.luminance,
            &run.stages.smoothed,
            &run.edges,
        )
    }

    pub fn present(
        &self,
        display: &RgbImage,
        luminance: &GrayImage,
        smoothed: &GrayImage,
        edges: &GrayImage,
    ) -> Result<Presentation> {
        let dims = display.dimensions();
        for (name, other) in [
            ("grayscale", luminance.dimensions()),
            ("blurred", smoothed.dimensions()),
            ("edge", edges.dimensions()),
        ] {
            if other != dims {
                return Err(Error::Parameter(format!(
                    "{name} image is {}x{} but the source is {}x{}",
                    other.0, other.1, dims.0, dims.1
                )));
            }
        }

        std::fs::create_dir_all(&self.output_dir).map_err(Error::io(&self.output_dir))?;

        let composite = composite::compose(display, luminance, smoothed, edges, self.panel_width);
        let composite_path = self.output_dir.join(COMPOSITE_FILE);
        composite
            .save_with_format(&composite_path, ImageFormat::Png)
            .map_err(Error::encode(&composite_path))?;
        log::debug!("Wrote composite {}", composite_path.display());

        let original_path = self.output_dir.join(ORIGINAL_FILE);
        let grayscale_path = self.output_dir.join(GRAYSCALE_FILE);
        let blurred_path = self.output_dir.join(BLURRED_FILE);
        let edges_path = self.output_dir.join(EDGES_FILE);

        // Decoded sources are already RGB, so the display raster is written as is
        save_jpeg(display, &original_path)?;
        save_jpeg(luminance, &grayscale_path)?;
        save_jpeg(smoothed, &blurred_path)?;
        save_jpeg(edges, &edges_path)?;

        println!(
            "Screenshots saved in the '{}' folder",
            self.output_dir.display()
        );

        let presentation = Presentation {
            composite_path,
            original_path,
            grayscale_path,
            blurred_path,
            edges_path,
            composite,
        };

        if self.display {
            self.show(&presentation);
        }

        Ok(presentation)
    }

    #[cfg(feature = "gui")]
    fn show(&self, presentation: &Presentation) {
        if let Err(e) = viewer::show(&presentation.composite) {
            log::warn!("Could not open the result viewer: {}", e);
        }
    }

    #[cfg(not(feature = "gui"))]
    fn show(&self, _presentation: &Presentation) {
        log::info!("Built without the gui feature; skipping the result viewer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    fn stages(w: u32, h: u32) -> (RgbImage, GrayImage, GrayImage, GrayImage) {
        (
            RgbImage::from_fn(w, h, |x, _| Rgb([(x * 3) as u8, 40, 200])),
            GrayImage::from_pixel(w, h, Luma([100])),
            GrayImage::from_pixel(w, h, Luma([100])),
            GrayImage::from_fn(w, h, |x, _| Luma([if x == w / 2 { 255 } else { 0 }])),
        )
    }

    #[test]
    fn writes_all_five_files_into_new_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("a").join("b");
        let (display, gray, blurred, edges) = stages(64, 48);

        let presentation = Presenter::new(&out)
            .with_panel_width(64)
            .present(&display, &gray, &blurred, &edges)
            .unwrap();

        for path in presentation.written_files() {
            assert!(path.is_file(), "missing {}", path.display());
            assert!(path.starts_with(&out));
        }
        assert_eq!(presentation.composite_path.file_name().unwrap(), COMPOSITE_FILE);
    }

    #[test]
    fn stage_files_keep_source_dimensions() {
        let dir = tempfile::TempDir::new().unwrap();
        let (display, gray, blurred, edges) = stages(64, 48);

        let presentation = Presenter::new(dir.path())
            .present(&display, &gray, &blurred, &edges)
            .unwrap();

        for path in &presentation.written_files()[1..] {
            let img = image::open(path).unwrap();
            assert_eq!((img.width(), img.height()), (64, 48));
        }
    }

    #[test]
    fn composite_on_disk_matches_returned_image() {
        let dir = tempfile::TempDir::new().unwrap();
        let (display, gray, blurred, edges) = stages(32, 32);

        let presentation = Presenter::new(dir.path())
            .with_panel_width(50)
            .present(&display, &gray, &blurred, &edges)
            .unwrap();

        let reloaded = image::open(&presentation.composite_path).unwrap().to_rgb8();
        assert_eq!(reloaded, presentation.composite);
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let (display, gray, blurred, _) = stages(64, 48);
        let edges = GrayImage::new(10, 10);

        let result = Presenter::new(dir.path()).present(&display, &gray, &blurred, &edges);
        assert!(matches!(result, Err(Error::Parameter(_))));
    }

    #[test]
    fn unwritable_output_directory_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let (display, gray, blurred, edges) = stages(16, 16);

        let result = Presenter::new(blocker.join("out")).present(&display, &gray, &blurred, &edges);
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}

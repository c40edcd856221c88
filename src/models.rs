use std::path::PathBuf;

use image::{GrayImage, RgbImage};

use crate::error::{Error, Result};

pub const DEFAULT_LOW_THRESHOLD: i32 = 50;
pub const DEFAULT_HIGH_THRESHOLD: i32 = 150;
pub const DEFAULT_OUTPUT_DIR: &str = "results";
pub const DEFAULT_SYNTHETIC_WIDTH: u32 = 800;
pub const DEFAULT_SYNTHETIC_HEIGHT: u32 = 600;

/// Smallest synthetic canvas on which all three test shapes stay distinct
pub const MIN_SYNTHETIC_SIZE: u32 = 16;

/// Hysteresis thresholds on the L1 gradient magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub low: i32,
    pub high: i32,
}

impl Thresholds {
    /// Create a validated threshold pair
    pub fn new(low: i32, high: i32) -> Result<Self> {
        let thresholds = Self { low, high };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        if self.low < 0 || self.high < 0 {
            return Err(Error::Parameter(format!(
                "thresholds must not be negative (low={}, high={})",
                self.low, self.high
            )));
        }
        if self.low > self.high {
            return Err(Error::Parameter(format!(
                "low threshold {} is greater than high threshold {}",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

/// Everything a single pipeline run needs, independent of how it was gathered
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub use_synthetic_image: bool,
    pub source_path: Option<PathBuf>,
    pub thresholds: Thresholds,
    pub output_directory: PathBuf,
    /// Show the composite in a window after writing the results
    pub display: bool,
    /// Canvas size used whenever a test image is synthesized
    pub synthetic_size: (u32, u32),
}

impl PipelineConfig {
    /// Configuration that synthesizes the test image
    pub fn synthetic(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            use_synthetic_image: true,
            output_directory: output_directory.into(),
            ..Self::default()
        }
    }

    /// Configuration that loads `path`, falling back to a test image on failure
    pub fn from_file(path: impl Into<PathBuf>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            use_synthetic_image: false,
            source_path: Some(path.into()),
            output_directory: output_directory.into(),
            ..Self::default()
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    pub fn with_synthetic_size(mut self, width: u32, height: u32) -> Self {
        self.synthetic_size = (width, height);
        self
    }

    /// Reject configurations the pipeline cannot run
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;

        if !self.use_synthetic_image && self.source_path.is_none() {
            return Err(Error::Parameter(
                "no source image path given and synthetic image not requested".to_string(),
            ));
        }

        let (width, height) = self.synthetic_size;
        if width < MIN_SYNTHETIC_SIZE || height < MIN_SYNTHETIC_SIZE {
            return Err(Error::Parameter(format!(
                "synthetic image must be at least {MIN_SYNTHETIC_SIZE}x{MIN_SYNTHETIC_SIZE}, got {width}x{height}"
            )));
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            use_synthetic_image: false,
            source_path: None,
            thresholds: Thresholds::default(),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            display: true,
            synthetic_size: (DEFAULT_SYNTHETIC_WIDTH, DEFAULT_SYNTHETIC_HEIGHT),
        }
    }
}

/// Where the source raster of a run came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    /// Decoded from the requested file
    Loaded(PathBuf),
    /// Synthesized on request and written to the given path
    Synthesized(PathBuf),
    /// The requested file failed to load, so a test image was synthesized instead
    FallbackSynthesized {
        requested: PathBuf,
        reason: String,
        written_to: PathBuf,
    },
}

impl ImageOrigin {
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, ImageOrigin::Loaded(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ImageOrigin::FallbackSynthesized { .. })
    }
}

/// Outputs of the preprocessing stage, all with the source's dimensions
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub display: RgbImage,
    pub luminance: GrayImage,
    pub smoothed: GrayImage,
}

/// Result of one pipeline run, before presentation
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub origin: ImageOrigin,
    pub source: RgbImage,
    pub stages: Preprocessed,
    pub edges: GrayImage,
    pub thresholds: Thresholds,
}

impl PipelineRun {
    pub fn dimensions(&self) -> (u32, u32) {
        self.source.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_are_valid() {
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.low, 50);
        assert_eq!(thresholds.high, 150);
        assert!(thresholds.validate().is_ok());
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        assert!(matches!(Thresholds::new(150, 50), Err(Error::Parameter(_))));
    }

    #[test]
    fn negative_thresholds_are_rejected() {
        assert!(matches!(Thresholds::new(-1, 50), Err(Error::Parameter(_))));
    }

    #[test]
    fn equal_thresholds_are_accepted() {
        assert!(Thresholds::new(0, 0).is_ok());
        assert!(Thresholds::new(80, 80).is_ok());
    }

    #[test]
    fn loading_without_path_is_rejected() {
        let config = PipelineConfig::default();
        assert!(matches!(config.validate(), Err(Error::Parameter(_))));
    }

    #[test]
    fn tiny_synthetic_canvas_is_rejected() {
        let config = PipelineConfig::synthetic("out").with_synthetic_size(4, 600);
        assert!(matches!(config.validate(), Err(Error::Parameter(_))));
    }

    #[test]
    fn origin_flags() {
        assert!(!ImageOrigin::Loaded(PathBuf::from("a.png")).is_synthetic());
        assert!(ImageOrigin::Synthesized(PathBuf::from("t.jpg")).is_synthetic());

        let fallback = ImageOrigin::FallbackSynthesized {
            requested: PathBuf::from("missing.png"),
            reason: "not found".to_string(),
            written_to: PathBuf::from("t.jpg"),
        };
        assert!(fallback.is_synthetic());
        assert!(fallback.is_fallback());
    }
}

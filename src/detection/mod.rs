pub mod edges;
pub mod preprocessing;
pub mod source;

use image::RgbImage;

use crate::error::Result;
use crate::models::{ImageOrigin, PipelineConfig, PipelineRun};

/// Runs source acquisition, preprocessing and edge detection for one image
pub struct EdgeDetectionPipeline {
    config: PipelineConfig,
    progress: bool,
}

impl EdgeDetectionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            progress: false,
        }
    }

    /// Print a line to stdout at each stage transition
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn report(&self, message: &str) {
        if self.progress {
            println!("{}", message);
        }
    }

    /// Run the full pipeline on the configured source
    pub fn run(&self) -> Result<PipelineRun> {
        self.config.validate()?;

        let (source, origin) = self.acquire()?;
        log::debug!("Source image {}x{} ({:?})", source.width(), source.height(), origin);

        // Step 1: Preprocess image
        self.report("Preprocessing image...");
        let stages = preprocessing::process(&source);

        // Step 2: Detect edges
        self.report("Detecting edges...");
        let edges = edges::detect(&stages.smoothed, self.config.thresholds)?;
        log::debug!(
            "Marked {} edge pixels (low={}, high={})",
            edges.pixels().filter(|p| p[0] == edges::EDGE).count(),
            self.config.thresholds.low,
            self.config.thresholds.high
        );

        Ok(PipelineRun {
            origin,
            source,
            stages,
            edges,
            thresholds: self.config.thresholds,
        })
    }

    /// Load the requested file, or synthesize the test image when asked to or when loading fails
    pub fn acquire(&self) -> Result<(RgbImage, ImageOrigin)> {
        let test_image_path = self.config.output_directory.join(source::TEST_IMAGE_FILE);
        let (width, height) = self.config.synthetic_size;

        let requested = match (&self.config.source_path, self.config.use_synthetic_image) {
            (Some(path), false) => path,
            _ => {
                let image = source::synthesize_to(&test_image_path, width, height)?;
                self.report(&format!(
                    "Test image created and saved to {}",
                    test_image_path.display()
                ));
                return Ok((image, ImageOrigin::Synthesized(test_image_path)));
            }
        };

        self.report("Loading image...");
        match source::load(requested) {
            Ok(image) => Ok((image, ImageOrigin::Loaded(requested.clone()))),
            Err(e) => {
                log::warn!("Falling back to a synthetic image: {}", e);
                self.report(&format!("Error loading image: {}", e));
                self.report("Creating a test image instead.");

                let image = source::synthesize_to(&test_image_path, width, height)?;
                self.report(&format!(
                    "Test image created and saved to {}",
                    test_image_path.display()
                ));
                Ok((
                    image,
                    ImageOrigin::FallbackSynthesized {
                        requested: requested.clone(),
                        reason: e.to_string(),
                        written_to: test_image_path,
                    },
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::Thresholds;

    #[test]
    fn synthetic_run_writes_test_image() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = PipelineConfig::synthetic(dir.path()).with_synthetic_size(120, 90);

        let run = EdgeDetectionPipeline::new(config).run().unwrap();

        assert_eq!(run.origin, ImageOrigin::Synthesized(dir.path().join(source::TEST_IMAGE_FILE)));
        assert!(dir.path().join(source::TEST_IMAGE_FILE).is_file());
        assert_eq!(run.dimensions(), (120, 90));
        assert_eq!(run.edges.dimensions(), (120, 90));
    }

    #[test]
    fn missing_file_falls_back_to_synthetic() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.png");
        let config = PipelineConfig::from_file(&missing, dir.path()).with_synthetic_size(100, 80);

        let run = EdgeDetectionPipeline::new(config).run().unwrap();

        match &run.origin {
            ImageOrigin::FallbackSynthesized {
                requested,
                written_to,
                ..
            } => {
                assert_eq!(requested, &missing);
                assert!(written_to.is_file());
            }
            other => panic!("expected fallback, got {other:?}"),
        }
        assert_eq!(run.dimensions(), (100, 80));
    }

    #[test]
    fn inverted_thresholds_fail_before_any_work() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = PipelineConfig::synthetic(dir.path())
            .with_thresholds(Thresholds { low: 120, high: 60 });

        let result = EdgeDetectionPipeline::new(config).run();

        assert!(matches!(result, Err(Error::Parameter(_))));
        assert!(!dir.path().join(source::TEST_IMAGE_FILE).exists());
    }
}

pub mod detection;
pub mod error;
pub mod models;
pub mod presenter;
pub mod prompt;

pub use detection::EdgeDetectionPipeline;
pub use error::{Error, Result};
pub use models::{ImageOrigin, PipelineConfig, PipelineRun, Preprocessed, Thresholds};
pub use presenter::{Presentation, Presenter};

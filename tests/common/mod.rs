#![allow(dead_code, unused_imports)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from edgeview for tests
pub use edgeview::{
    EdgeDetectionPipeline, Error, ImageOrigin, PipelineConfig, PipelineRun, Presenter, Thresholds,
};

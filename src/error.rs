use std::path::{Path, PathBuf};

/// Errors produced by the edge detection pipeline
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source image could not be opened or decoded
    #[error("could not load image from {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        source: image::ImageError,
    },

    /// An output directory or file could not be created
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An output image could not be encoded or written
    #[error("failed to write image {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// A run-time parameter was rejected before processing
    #[error("invalid parameter: {0}")]
    Parameter(String),
}

impl Error {
    /// Build a mapper from `std::io::Error` that remembers the path involved
    pub fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Build a mapper from `image::ImageError` for a failed write
    pub fn encode(path: &Path) -> impl FnOnce(image::ImageError) -> Self + '_ {
        move |source| Self::Encode {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

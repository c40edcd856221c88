use std::path::PathBuf;

use edgeview::detection::source;
use edgeview::models::{DEFAULT_SYNTHETIC_HEIGHT, DEFAULT_SYNTHETIC_WIDTH};

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(source::TEST_IMAGE_FILE));

    source::synthesize_to(&path, DEFAULT_SYNTHETIC_WIDTH, DEFAULT_SYNTHETIC_HEIGHT)?;
    println!(
        "Created {} ({}x{} test shapes)",
        path.display(),
        DEFAULT_SYNTHETIC_WIDTH,
        DEFAULT_SYNTHETIC_HEIGHT
    );
    Ok(())
}

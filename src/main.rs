use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use edgeview::models::{DEFAULT_OUTPUT_DIR, DEFAULT_SYNTHETIC_HEIGHT, DEFAULT_SYNTHETIC_WIDTH};
use edgeview::prompt::{Prompter, SourceChoice};
use edgeview::{EdgeDetectionPipeline, PipelineConfig, Presenter, Thresholds};

#[derive(Parser)]
#[command(name = "edgeview")]
#[command(about = "Grayscale, blur and Canny edge detection with saved stage outputs")]
struct Cli {
    /// Synthesize a test image with basic shapes instead of loading one
    #[arg(long, conflicts_with = "image")]
    synthetic: bool,

    /// Path to input image file
    #[arg(long, value_name = "IMAGE")]
    image: Option<PathBuf>,

    /// Low hysteresis threshold (asked interactively when omitted)
    #[arg(long, requires = "high", allow_negative_numbers = true)]
    low: Option<i32>,

    /// High hysteresis threshold (asked interactively when omitted)
    #[arg(long, requires = "low", allow_negative_numbers = true)]
    high: Option<i32>,

    /// Directory receiving all output images
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Width of the synthetic test image
    #[arg(long, default_value_t = DEFAULT_SYNTHETIC_WIDTH)]
    width: u32,

    /// Height of the synthetic test image
    #[arg(long, default_value_t = DEFAULT_SYNTHETIC_HEIGHT)]
    height: u32,

    /// Don't open the result viewer
    #[arg(long)]
    no_display: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

/// Fill in whatever the command line left open by asking on the terminal
fn build_config(args: &Cli) -> anyhow::Result<PipelineConfig> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let source = if args.synthetic {
        SourceChoice::Synthetic
    } else if let Some(path) = &args.image {
        SourceChoice::File(path.clone())
    } else {
        prompter.source().context("failed to read image source")?
    };

    let thresholds = match (args.low, args.high) {
        (Some(low), Some(high)) => Thresholds::new(low, high)?,
        _ => prompter
            .thresholds()
            .context("failed to read edge detection parameters")?,
    };

    let config = match source {
        SourceChoice::Synthetic => PipelineConfig::synthetic(&args.output_dir),
        SourceChoice::File(path) => PipelineConfig::from_file(path, &args.output_dir),
    };

    Ok(config
        .with_thresholds(thresholds)
        .with_synthetic_size(args.width, args.height)
        .with_display(!args.no_display))
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logger(args.verbose);

    let config = build_config(&args)?;
    config.validate()?;

    let output_dir = config.output_directory.clone();
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let display = config.display;
    let run = EdgeDetectionPipeline::new(config).with_progress(true).run()?;

    if args.verbose {
        println!("Image: {}x{} ({:?})\n", run.source.width(), run.source.height(), run.origin);
    }

    println!("Displaying and saving results...");
    Presenter::new(&output_dir)
        .with_display(display)
        .present_run(&run)
        .context("failed to save results")?;

    println!("Processing completed!");
    println!(
        "All output files are saved in the '{}' directory",
        output_dir.display()
    );

    Ok(())
}

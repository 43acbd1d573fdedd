use std::path::{Path, PathBuf};

use adorn_core::{
    AccessoryCategory, AccessoryDimensions, CalibrationConfig, LandmarkSet, PlacementEngine,
    QualitySignals,
};
use adorn_quality::QualityReport;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adorn", about = "Adorn jewelry placement CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a placement from a landmark set
    Place {
        /// Landmark-set JSON file (space, normalized points, image size)
        landmarks: PathBuf,
        /// Accessory category: earring, necklace, ring, or bracelet
        #[arg(short, long)]
        category: AccessoryCategory,
        /// Physical accessory width in millimeters
        #[arg(long)]
        width_mm: f64,
        /// Physical accessory height in millimeters
        #[arg(long)]
        height_mm: f64,
        /// Source image; enables quality-aware padding and feathering
        #[arg(short, long)]
        image: Option<PathBuf>,
        /// Calibration override file (TOML)
        #[arg(long)]
        calibration: Option<PathBuf>,
    },
    /// Report brightness, contrast, and edge-density signals for an image
    Assess {
        /// Image to analyze
        image: PathBuf,
    },
    /// Print the active calibration table
    Profiles {
        /// Calibration override file (TOML)
        #[arg(long)]
        calibration: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Place {
            landmarks,
            category,
            width_mm,
            height_mm,
            image,
            calibration,
        } => place(
            &landmarks,
            category,
            width_mm,
            height_mm,
            image.as_deref(),
            calibration.as_deref(),
        ),
        Commands::Assess { image } => assess(&image),
        Commands::Profiles { calibration } => profiles(calibration.as_deref()),
    }
}

fn place(
    landmarks: &Path,
    category: AccessoryCategory,
    width_mm: f64,
    height_mm: f64,
    image: Option<&Path>,
    calibration: Option<&Path>,
) -> Result<()> {
    let engine = build_engine(calibration)?;

    let text = std::fs::read_to_string(landmarks)
        .with_context(|| format!("failed to read landmark file {}", landmarks.display()))?;
    let set: LandmarkSet = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse landmark file {}", landmarks.display()))?;

    let signals = image.map(image_signals).transpose()?;

    let placement = engine.place(
        &set,
        category,
        AccessoryDimensions::new(width_mm, height_mm),
        signals.as_ref(),
    )?;

    println!("{}", serde_json::to_string_pretty(&placement)?);
    Ok(())
}

fn assess(image: &Path) -> Result<()> {
    let report = image_report(image)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn profiles(calibration: Option<&Path>) -> Result<()> {
    let engine = build_engine(calibration)?;
    println!("{}", serde_json::to_string_pretty(engine.calibration())?);
    Ok(())
}

fn build_engine(calibration: Option<&Path>) -> Result<PlacementEngine> {
    match calibration {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read calibration file {}", path.display()))?;
            let config = CalibrationConfig::from_toml_str(&text)?;
            tracing::info!(path = %path.display(), "calibration overrides loaded");
            Ok(PlacementEngine::new(config)?)
        }
        None => Ok(PlacementEngine::with_defaults()),
    }
}

fn image_report(path: &Path) -> Result<QualityReport> {
    let gray = image::open(path)
        .with_context(|| format!("failed to open image {}", path.display()))?
        .to_luma8();
    let report = adorn_quality::assess(gray.as_raw(), gray.width(), gray.height())?;
    Ok(report)
}

fn image_signals(path: &Path) -> Result<QualitySignals> {
    Ok(image_report(path)?.signals())
}

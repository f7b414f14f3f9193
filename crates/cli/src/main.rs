mod pipeline;
mod retry;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ingest::OcrEngine;
use pipeline::Pipeline;
use settings::Settings;

/// Drafts the operator's formal response letter to an ANS preliminary
/// mediation notice (NIP) from a folder of case documents.
#[derive(Parser)]
#[command(name = "carta-ans")]
struct Cli {
    /// Folder containing the case's .pdf documents
    #[arg(long)]
    folder: PathBuf,

    /// Load settings from this .env file instead of the default lookup
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Also write the final letter to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path).context(format!("Failed to load env file: {:?}", path))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;
    let pipeline = Pipeline::from_settings(&settings, build_ocr());

    match pipeline.run(&cli.folder).await? {
        Some(letter) => {
            if let Some(path) = &cli.output {
                tokio::fs::write(path, &letter)
                    .await
                    .context(format!("Failed to write letter to {:?}", path))?;
                info!(output = %path.display(), "Letter written");
            }
            println!("{letter}");
        }
        None => {
            warn!("No usable data in the case folder; no letter was generated");
        }
    }

    Ok(())
}

#[cfg(feature = "ocr")]
fn build_ocr() -> Arc<dyn OcrEngine> {
    Arc::new(ingest::ocr::TesseractOcr::default())
}

#[cfg(not(feature = "ocr"))]
fn build_ocr() -> Arc<dyn OcrEngine> {
    Arc::new(ingest::NoopOcr)
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paperscan — command-line front end.
//
// Entry point. Parses arguments, initialises logging, loads configuration,
// and dispatches to the subcommand handlers.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use paperscan_core::ScanConfig;
use paperscan_core::human_errors::humanize_error;

#[derive(Parser)]
#[command(name = "paperscan", version)]
#[command(about = "Detect, outline and straighten a sheet of paper in a photo")]
struct Cli {
    /// JSON configuration file (missing fields take defaults)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the detected paper corners as JSON
    Detect {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        /// Also write the corners to this file
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Straighten the paper into an upright image
    Crop {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Use these corners (JSON, as printed by `detect`) instead of detecting
        #[arg(long, value_name = "FILE")]
        corners: Option<PathBuf>,
    },

    /// Draw the paper outline over the photo
    Highlight {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Outline colour (name or #rrggbb)
        #[arg(long)]
        color: Option<String>,

        /// Outline thickness in pixels
        #[arg(long)]
        thickness: Option<f32>,

        /// Outline these corners instead of detecting
        #[arg(long, value_name = "FILE")]
        corners: Option<PathBuf>,
    },

    /// Letterbox the photo into a fixed-size preview canvas
    Fit {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "paperscan failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> paperscan_core::Result<()> {
    let config = match &cli.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };

    match cli.command {
        Command::Detect { image, out } => {
            let json = commands::detect(&image, &config, out.as_deref())?;
            println!("{json}");
        }
        Command::Crop {
            image,
            output,
            corners,
        } => commands::crop(&image, &output, corners.as_deref(), &config)?,
        Command::Highlight {
            image,
            output,
            color,
            thickness,
            corners,
        } => commands::highlight(
            &image,
            &output,
            corners.as_deref(),
            color.as_deref(),
            thickness,
            &config,
        )?,
        Command::Fit {
            image,
            output,
            width,
            height,
        } => {
            let width = width.unwrap_or(config.preview.width);
            let height = height.unwrap_or(config.preview.height);
            commands::fit(&image, &output, width, height).await?
        }
    }

    Ok(())
}

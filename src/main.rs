// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ftir-reprocess project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the FTIR interferogram reprocessing tool

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use ftir_reprocess::acquisition::{InterferogramSource, JsonBundleSource};
use ftir_reprocess::batch::{run_batch, MetricsRow};
use ftir_reprocess::config::Config;
use ftir_reprocess::pipeline::run_file;

/// Reprocess FTIR interferograms into absorbance spectra
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (YAML format)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Floor applied to the reference single beam and the transmittance
    #[arg(long, global = true)]
    epsilon: Option<f64>,

    /// Path to a configuration to validate and exit
    #[arg(long)]
    validate_config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Disable all logging output
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Process a single interferogram file
    File {
        /// Path to the interferogram file
        path: PathBuf,

        /// Apodization window name (use 'b3' for the instrument default)
        #[arg(long)]
        apod: Option<String>,

        /// Zero-fill multiplier
        #[arg(long)]
        zf: Option<i64>,

        /// Output directory for series files and the metrics CSV
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Process every interferogram file of a directory
    Batch {
        /// Data directory containing the interferogram files
        #[arg(long)]
        data: Option<PathBuf>,

        /// Apodization window name
        #[arg(long)]
        apod: Option<String>,

        /// Zero-fill multiplier
        #[arg(long)]
        zf: Option<i64>,

        /// Output directory for the ledgers
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of worker threads
        #[arg(long)]
        workers: Option<usize>,

        /// Skip files already listed in batch_metrics.csv
        #[arg(long)]
        resume: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger with appropriate level based on verbose and quiet flags
    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    // Validate configuration file if --validate-config is set
    if let Some(validate_path) = args.validate_config {
        if !validate_path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file does not exist: {}",
                validate_path.display()
            ));
        }
        Config::from_file(&validate_path)
            .map_err(|err| anyhow::anyhow!("Configuration validation failed: {:#}", err))?;
        println!("Configuration file is valid: {}", validate_path.display());
        return Ok(());
    }

    let Some(command) = args.command else {
        return Err(anyhow::anyhow!(
            "No command given, use `file <PATH>` or `batch` (see --help)"
        ));
    };

    // Load configuration
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.yaml"));
    let mut config = Config::from_file(&config_path)?;

    match command {
        Command::File {
            path,
            apod,
            zf,
            out,
        } => {
            config.apply_args(apod, zf, args.epsilon, None, out, None, false);
            config.validate()?;
            let settings = config.processing.settings()?;

            let source = JsonBundleSource::new();
            let row = run_file(&source, &path, &settings, &config.output.out_dir)?;

            print_metrics(&row);
            println!(
                "\nSaved series + CSV in: {}",
                absolute(&config.output.out_dir).display()
            );
        }
        Command::Batch {
            data,
            apod,
            zf,
            out,
            workers,
            resume,
        } => {
            config.apply_args(apod, zf, args.epsilon, data, out, workers, resume);
            config.validate()?;
            let settings = config.processing.settings()?;

            info!(
                "Batch run: apod={}, zf={}, workers={}",
                settings.apod_name, settings.zero_fill, config.batch.workers
            );
            let source: Arc<dyn InterferogramSource> = Arc::new(JsonBundleSource::new());
            let summary = run_batch(source, settings, &config.batch, &config.output)
                .await
                .context("Batch run failed")?;
            println!(
                "Found {} | skipped {} | processed {} | OK={} FAIL={}",
                summary.found, summary.skipped, summary.processed, summary.ok, summary.failed
            );
        }
    }

    Ok(())
}

fn print_metrics(row: &MetricsRow) {
    fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    println!("\n=== Metrics ===");
    println!("path: {}", row.path);
    println!("apod: {}", row.apod);
    println!("zf: {}", row.zf);
    println!("status: {}", row.status);
    println!("lwn: {}", opt(row.lwn));
    println!("hfq: {}", opt(row.hfq));
    println!("lfq: {}", opt(row.lfq));
    println!("points: {}", opt(row.points));
    println!("mean_dnu_cm-1: {}", opt(row.mean_dnu));
    println!("peak_cm-1: {}", opt(row.peak_wavenumber));
    println!("peak_A: {}", opt(row.peak_absorbance));
    println!("rms_vs_ref: {}", opt(row.rms));
    println!("mae_vs_ref: {}", opt(row.mae));
    println!("maxabs_vs_ref: {}", opt(row.max_abs));
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Qie.
//! The Qie project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! qie - split a table into one file per column value.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use qie::log::{QiCLogBridge, QiCLogConfig, QiCLogConfigBuilder, QiCLogger};
use qie::run::QI_PREVIEW_SAMPLES;
use qie::{
    QiCCancelToken, QiCEventSink, QiCOutputFormat, QiCRunEvent, QiCRunSummary, QiCSession,
    QiCSplitRequest,
};

#[derive(Parser)]
#[command(author, version, about = "Split a table into one file per column value", long_about = None)]
struct Cli {
    /// JSON file with logger settings
    #[arg(long, global = true)]
    log_config: Option<PathBuf>,

    /// Write the log to this file instead of the default location
    #[arg(long, global = true)]
    log_file: Option<String>,

    /// No console logging or progress output
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SelectionArgs {
    /// Column to split on; repeat for combinations
    #[arg(long = "by", required_unless_present = "all", conflicts_with = "all")]
    by: Vec<String>,

    /// Split on every column
    #[arg(long)]
    all: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the columns of a table
    Columns { input: PathBuf },
    /// Show the groups and filenames a split would produce
    Preview {
        input: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
        #[arg(long, default_value = "csv", value_parser = parse_format)]
        format: QiCOutputFormat,
        #[arg(long, default_value_t = QI_PREVIEW_SAMPLES)]
        samples: usize,
    },
    /// Split a table and bundle the files into a ZIP
    Split {
        input: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Existing folder that receives the output directory and archive
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "csv", value_parser = parse_format)]
        format: QiCOutputFormat,
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_format(s: &str) -> std::result::Result<QiCOutputFormat, String> {
    s.parse::<QiCOutputFormat>().map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    match cli.command {
        Commands::Columns { input } => {
            let session = load(&input)?;
            for (i, column) in session.QiFDataset().QiFColumns().iter().enumerate() {
                println!("{:>3}  {}", i + 1, column);
            }
            Ok(())
        }
        Commands::Preview {
            input,
            selection,
            format,
            samples,
        } => {
            let session = load(&input)?;
            let columns = selected_columns(&session, &selection);
            let preview = session
                .QiFPreview(columns.as_slice(), format, samples)
                .context("Preview failed")?;

            println!("Mode: {}", preview.description);
            println!("Rows: {}", preview.total_rows);
            println!("Groups: {}", preview.group_count);
            println!("Files:");
            for name in &preview.sample_files {
                println!("  {}", name);
            }
            if preview.remaining > 0 {
                println!("  ... and {} more", preview.remaining);
            }
            println!();
            println!("{}", preview.columns.join("\t"));
            for row in &preview.sample_rows {
                println!("{}", row.join("\t"));
            }
            Ok(())
        }
        Commands::Split {
            input,
            selection,
            out,
            format,
            json,
        } => {
            let session = load(&input)?;
            let columns = selected_columns(&session, &selection);
            let request = QiCSplitRequest::QiFNew(columns, format, out);

            let cancel = QiCCancelToken::QiFNew();
            let on_interrupt = cancel.clone();
            ctrlc::set_handler(move || {
                eprintln!("\nInterrupt received, stopping after the current group...");
                on_interrupt.QiFCancel();
            })
            .context("Failed to set signal handler")?;

            let sink = if cli.quiet { None } else { Some(progress_sink()) };
            let handle = session.QiFSpawn(request, cancel, sink)?;
            let summary = handle
                .join()
                .map_err(|_| anyhow!("split thread panicked"))?
                .context("Split failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            Ok(())
        }
    }
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let mut config = match &cli.log_config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Cannot read log config {}", path.display()))?;
            let value: serde_json::Value =
                serde_json::from_str(&text).context("Log config is not valid JSON")?;
            QiCLogConfigBuilder::QiFFromJson(&value).context("Invalid log config")?
        }
        None => QiCLogConfig::default(),
    };
    if let Some(file) = &cli.log_file {
        config.file_enabled = true;
        config.file_path = Some(file.clone());
    }
    if cli.quiet {
        config.console_enabled = false;
    }

    let level = config.QiFLevel();
    QiCLogger::QiFInit(config);
    QiCLogBridge::QiFInstall(level);
    Ok(())
}

fn load(input: &Path) -> Result<QiCSession> {
    QiCSession::QiFLoad(input).with_context(|| format!("Cannot load {}", input.display()))
}

fn selected_columns(session: &QiCSession, selection: &SelectionArgs) -> Vec<String> {
    if selection.all {
        session.QiFDataset().QiFColumns().to_vec()
    } else {
        selection.by.clone()
    }
}

/// Progress lines on stderr; log events already reach the console through the logger.
fn progress_sink() -> QiCEventSink {
    Arc::new(|event: &QiCRunEvent| {
        if let QiCRunEvent::Progress { percent, message } = event {
            eprintln!("[{:>3}%] {}", percent, message);
        }
    })
}

fn print_summary(summary: &QiCRunSummary) {
    if summary.total_groups == 0 {
        println!("No groups to export");
        return;
    }
    if let Some(dir) = &summary.output_dir {
        println!("Output: {}", dir.display());
    }
    for record in &summary.exported {
        println!("  {} ({} rows)", record.QiFFileName(), record.rows);
    }
    for failure in &summary.failures {
        println!("  group {} failed: {}", failure.group, failure.message);
    }
    println!(
        "Rows: {} across {} files",
        summary.QiFExportedRows(),
        summary.QiFExportedCount()
    );
    if let Some(archive) = &summary.archive {
        println!(
            "Archive: {} ({:.2} MB)",
            archive.path.display(),
            archive.QiFSizeMb()
        );
    }
    if summary.cancelled {
        println!(
            "Cancelled: {} of {} groups exported",
            summary.QiFExportedCount(),
            summary.total_groups
        );
    }
}

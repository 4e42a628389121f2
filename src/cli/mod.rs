//! # CLI Module
//!
//! Command-line interface for capture-sort.
//!
//! ## Usage
//! ```bash
//! # Copy ~/DCIM into ~/Sorted, naming files "..._from_camera.JPG"
//! capture-sort ~/DCIM ~/Sorted
//!
//! # With a device label
//! capture-sort ~/DCIM ~/Sorted gopro
//!
//! # Show the planned names only
//! capture-sort ~/DCIM ~/Sorted --dry-run
//!
//! # JSON output
//! capture-sort ~/DCIM ~/Sorted --output json
//! ```

use capture_sort::core::organize::PlannedCopy;
use capture_sort::core::pipeline::{
    prepare_destination, PipelineResult, RenamePipeline, DEFAULT_LABEL,
};
use capture_sort::error::Result;
use capture_sort::events::{CopyEvent, Event, EventChannel, PipelineEvent, VerifyEvent};
use clap::{Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::thread;

/// Capture Sort - rename photos and videos by capture time, then verify
#[derive(Parser, Debug)]
#[command(name = "capture-sort")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the files to sort (not searched recursively)
    source: PathBuf,

    /// Directory to build the dated tree in
    destination: PathBuf,

    /// Device label embedded in every file name
    #[arg(default_value = DEFAULT_LABEL)]
    label: String,

    /// Delete an existing destination without asking
    #[arg(short, long)]
    yes: bool,

    /// Print the planned names without copying
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Outcome of a CLI invocation
pub enum Outcome {
    /// Copy verified, or dry run finished
    Success,
    /// Copy finished but the trees differ
    VerificationFailed,
}

/// Run the CLI
pub fn run() -> Result<Outcome> {
    let cli = Cli::parse();

    let pipeline = RenamePipeline::builder()
        .source(&cli.source)
        .destination(&cli.destination)
        .label(cli.label.clone())
        .build();

    if cli.dry_run {
        let plan = pipeline.plan()?;
        match cli.output {
            OutputFormat::Pretty => print_pretty_plan(&plan),
            OutputFormat::Json => print_json(&serde_json::json!({ "planned": plan })),
        }
        return Ok(Outcome::Success);
    }

    let term = Term::stderr();
    let assume_yes = cli.yes;
    prepare_destination(&cli.source, &cli.destination, |path| {
        assume_yes || ask_delete(&term, path)
    })?;

    let result = run_with_progress(&pipeline, cli.output, cli.verbose)?;

    match cli.output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, cli.verbose),
        OutputFormat::Json => print_json(&serde_json::json!({
            "copies": result.copies,
            "report": result.report,
            "duration_ms": result.duration_ms,
        })),
    }

    if result.report.is_success() {
        Ok(Outcome::Success)
    } else {
        Ok(Outcome::VerificationFailed)
    }
}

fn ask_delete(term: &Term, path: &Path) -> bool {
    let prompt = format!(
        "{} Destination {} already exists. Delete it? [y/N] ",
        style("?").yellow().bold(),
        style(path.display()).cyan()
    );
    if term.write_str(&prompt).is_err() {
        return false;
    }
    match term.read_line() {
        Ok(answer) => matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"),
        Err(_) => false,
    }
}

fn run_with_progress(
    pipeline: &RenamePipeline,
    output: OutputFormat,
    verbose: bool,
) -> Result<PipelineResult> {
    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        let Some(pb) = progress_clone else {
            for _ in receiver.iter() {}
            return;
        };
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_position(0);
                    pb.set_message(format!("{}", phase));
                }
                Event::Copy(CopyEvent::Started { total_files }) => {
                    pb.set_length(total_files as u64);
                }
                Event::Copy(CopyEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                }
                Event::Copy(CopyEvent::FileCopied {
                    destination,
                    renamed,
                    ..
                }) if verbose => {
                    let marker = if renamed { " (renamed)" } else { "" };
                    pb.println(format!("  {}{}", destination.display(), marker));
                }
                Event::Verify(VerifyEvent::Started { root, total_files }) => {
                    pb.set_length(total_files as u64);
                    pb.set_position(0);
                    pb.set_message(format!("Hashing {}", root.display()));
                }
                Event::Verify(VerifyEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    result
}

fn print_pretty_plan(plan: &[PlannedCopy]) {
    for item in plan {
        println!(
            "{} {} {}",
            item.source.display(),
            style("->").dim(),
            item.relative_path.display()
        );
    }
    println!();
    println!(
        "{} {} files planned, nothing copied",
        style("✓").green().bold(),
        style(plan.len()).cyan()
    );
}

fn print_pretty_results(term: &Term, result: &PipelineResult, verbose: bool) {
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files copied in {:.1}s",
        style(result.copies.len()).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    let renamed = result.files_renamed();
    if renamed > 0 {
        term.write_line(&format!(
            "  {} names disambiguated with a numbered suffix",
            style(renamed).yellow()
        ))
        .ok();
    }

    if verbose {
        for copy in result.copies.iter().filter(|c| c.was_renamed()) {
            term.write_line(&format!(
                "    {} {}",
                style("○").dim(),
                copy.destination.display()
            ))
            .ok();
        }
    }

    term.write_line("").ok();

    let marker = if result.report.is_success() {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    };
    for line in result.report.to_string().lines() {
        term.write_line(&format!("{} {}", marker, line)).ok();
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("failed to serialize output: {}", e),
    }
}

//! aligned-fasta - aligned FASTA inspection and normalization
//!
//! ## Usage
//!
//! ```bash
//! aligned-fasta alignment.fasta                      # summary
//! aligned-fasta -r coordinates alignment.fasta       # coordinate table
//! aligned-fasta -r none -o out.fasta alignment.fasta # unwrap/normalize
//! cat alignment.fasta | aligned-fasta -              # read stdin
//! ```

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::{debug, warn};

use aligned_fasta::formats::{parse_input, write_output, Input, Output};
use aligned_fasta::model::Alignment;

/// What to print about the parsed alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportArg {
    /// Sequence count, column count, block count and per-sequence lengths
    Summary,
    /// The coordinate table, one tab-separated row per sequence
    Coordinates,
    /// Nothing
    None,
}

/// aligned-fasta - read, inspect and rewrite aligned FASTA files
///
/// Reads one multiple sequence alignment, reports on its block structure
/// and optionally writes it back with each sequence on a single line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Aligned FASTA file to read. Use "-" for stdin.
    file: String,

    /// Write the alignment as aligned FASTA. Use "-" for stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Report to print
    #[arg(short = 'r', long = "report", value_enum, default_value = "summary")]
    report: ReportArg,

    /// Increase log verbosity (-v: info, -vv: debug). RUST_LOG overrides.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Do not print the notice about aligned FASTA support being experimental
    #[arg(long = "no-experimental-notice")]
    no_experimental_notice: bool,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Writes the alignment summary.
fn write_summary<W: Write>(mut out: W, alignment: &Alignment) -> io::Result<()> {
    writeln!(out, "Sequences: {}", alignment.sequence_count())?;
    writeln!(out, "Columns:   {}", alignment.length())?;
    writeln!(out, "Blocks:    {}", alignment.coordinates().block_count())?;
    let width = alignment.max_id_length();
    for record in alignment.records() {
        writeln!(out, "{:<width$}  {}", record.id, record.len(), width = width)?;
    }
    Ok(())
}

/// Writes the coordinate table, preceded by the breakpoint columns.
fn write_coordinates<W: Write>(mut out: W, alignment: &Alignment) -> io::Result<()> {
    let coordinates = alignment.coordinates();
    let join = |values: &[usize]| {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\t")
    };
    writeln!(out, "#columns\t{}", join(coordinates.columns()))?;
    for (record, row) in alignment.records().iter().zip(coordinates.rows()) {
        writeln!(out, "{}\t{}", record.id, join(row.as_slice()))?;
    }
    Ok(())
}

fn report(report: ReportArg, out: &mut dyn Write, alignment: &Alignment) -> io::Result<()> {
    match report {
        ReportArg::Summary => write_summary(&mut *out, alignment)?,
        ReportArg::Coordinates => write_coordinates(&mut *out, alignment)?,
        ReportArg::None => {}
    }
    out.flush()
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if !args.no_experimental_notice {
        warn!("Aligned FASTA support is experimental and may change in future releases");
    }

    let input = Input::from_arg(&args.file);
    let alignment = parse_input(&input)
        .with_context(|| format!("Failed to read alignment from {}", input))?;

    let output = args.output.as_deref().map(Output::from_arg);

    // Keep stdout clean when it carries the alignment itself
    if output == Some(Output::Stdout) {
        debug!("Alignment goes to stdout, writing the report to stderr");
        report(args.report, &mut io::stderr().lock(), &alignment)?;
    } else {
        report(args.report, &mut io::stdout().lock(), &alignment)?;
    }

    if let Some(output) = output {
        write_output(&output, &alignment)
            .with_context(|| format!("Failed to write alignment to {}", output))?;
        if output != Output::Stdout {
            eprintln!(
                "Wrote {} sequences to {}",
                alignment.sequence_count(),
                output
            );
        }
    }

    Ok(())
}

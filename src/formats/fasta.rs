//! Aligned FASTA parser and writer.
//!
//! Aligned FASTA is ordinary FASTA in which alignment gaps are written as
//! dashes, so that every record spans the same number of columns.
//!
//! ## Format
//!
//! ```text
//! >sequence_identifier optional description
//! ACGT-ACGT--ACG
//! >another_sequence
//! AC-TTACG--TACG
//! ```
//!
//! Sequence lines may be wrapped; they are concatenated. The writer emits
//! each gapped sequence on a single line.

use std::io::{self, Write};

use thiserror::Error;

use crate::coordinates::{CoordinateError, Coordinates, GAP};
use crate::formats::LineSource;
use crate::model::{Alignment, AlignmentError, Record};

/// Errors that can occur during aligned FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to read input: {0}")]
    IoError(#[from] io::Error),

    #[error("Empty FASTA file")]
    EmptyFile,

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),

    #[error("Sequence '{id}' has {found} aligned columns, expected {expected}")]
    LengthMismatch {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid coordinates: {0}")]
    Coordinates(#[from] CoordinateError),

    #[error("Invalid alignment: {0}")]
    InvalidAlignment(#[from] AlignmentError),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// A record whose gapped sequence is still being accumulated.
struct GappedRecord {
    id: String,
    description: Option<String>,
    gapped: String,
}

/// Splits a header (without the leading '>') into identifier and description.
fn split_header(header: &str) -> Option<(&str, Option<&str>)> {
    let header = header.trim();
    if header.is_empty() {
        return None;
    }
    match header.split_once(char::is_whitespace) {
        Some((id, description)) => Some((id, Some(description.trim_start()))),
        None => Some((header, None)),
    }
}

/// Parses exactly one alignment from a source of lines.
///
/// Gaps are removed from the record sequences, and their positions are kept
/// in the alignment's coordinate table.
pub fn parse_aligned_fasta<S: LineSource>(mut source: S) -> FastaResult<Alignment> {
    let mut entries: Vec<GappedRecord> = Vec::new();
    let mut line_number = 0;

    while let Some(line) = source.next_line()? {
        line_number += 1;

        if let Some(header) = line.strip_prefix('>') {
            let (id, description) = split_header(header).ok_or_else(|| {
                FastaError::InvalidFormat(format!(
                    "Empty sequence identifier at line {}",
                    line_number
                ))
            })?;
            entries.push(GappedRecord {
                id: id.to_string(),
                description: description.map(str::to_string),
                gapped: String::new(),
            });
        } else {
            // whitespace is never part of a sequence, not even inside a line
            let mut data = line.chars().filter(|c| !c.is_whitespace()).peekable();
            if data.peek().is_none() {
                continue;
            }
            match entries.last_mut() {
                Some(entry) => entry.gapped.extend(data),
                None => return Err(FastaError::SequenceWithoutHeader(line_number)),
            }
        }
    }

    if entries.is_empty() {
        return Err(FastaError::EmptyFile);
    }

    let gapped: Vec<&str> = entries.iter().map(|entry| entry.gapped.as_str()).collect();
    let coordinates = Coordinates::infer(&gapped).map_err(|err| match err {
        CoordinateError::LengthMismatch {
            row,
            expected,
            found,
        } => FastaError::LengthMismatch {
            id: entries[row].id.clone(),
            expected,
            found,
        },
        other => FastaError::Coordinates(other),
    })?;

    let records = entries
        .into_iter()
        .map(|entry| Record {
            id: entry.id,
            description: entry.description,
            sequence: entry.gapped.chars().filter(|&c| c != GAP).collect(),
        })
        .collect();

    Ok(Alignment::new(records, coordinates)?)
}

/// Parses aligned FASTA content from a string.
///
/// Useful for testing or processing in-memory data.
pub fn parse_aligned_fasta_str(content: &str) -> FastaResult<Alignment> {
    parse_aligned_fasta(content.as_bytes())
}

fn format_header(record: &Record) -> String {
    match record.description.as_deref() {
        Some(description) => format!(">{} {}", record.id, description),
        None => format!(">{}", record.id),
    }
}

/// Formats an alignment as aligned FASTA text.
///
/// Each record yields a header line and a single gapped sequence line. Lines
/// are joined with `\n`, without a trailing newline.
///
/// Only a validated [`Alignment`] can be formatted:
///
/// ```compile_fail
/// use aligned_fasta::formats::fasta::format_alignment;
///
/// let text = format_alignment(&">seq1\nACGT");
/// ```
pub fn format_alignment(alignment: &Alignment) -> String {
    let mut lines = Vec::with_capacity(2 * alignment.sequence_count());
    for (record, line) in alignment.records().iter().zip(alignment.gapped_rows()) {
        lines.push(format_header(record));
        lines.push(line);
    }
    lines.join("\n")
}

/// Writes an alignment as aligned FASTA, ending with a newline.
pub fn write_alignment<W: Write>(mut writer: W, alignment: &Alignment) -> io::Result<()> {
    if !alignment.is_empty() {
        writeln!(writer, "{}", format_alignment(alignment))?;
    }
    writer.flush()
}

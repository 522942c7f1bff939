//! Alignment file input and output.
//!
//! The parser itself only needs a [`LineSource`]; where the lines come from
//! (a file, standard input, an in-memory string) is decided once, here, by
//! [`Input`]. Likewise [`Output`] resolves where formatted text is written.
//!
//! Only aligned FASTA is supported (see [`fasta`]).

pub mod fasta;

use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::model::Alignment;

/// Errors that can occur when reading an alignment file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] io::Error),

    #[error("FASTA error: {0}")]
    FastaError(#[from] fasta::FastaError),
}

/// Result type for file-level parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A source of text lines, one at a time.
///
/// Returned lines have their line terminator removed.
pub trait LineSource {
    /// Returns the next line, or `None` at the end of the input.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

impl<R: BufRead> LineSource for R {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let content_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(content_len);
        Ok(Some(line))
    }
}

/// Adapts an iterator of already split lines into a [`LineSource`].
///
/// ```
/// use aligned_fasta::formats::{fasta::parse_aligned_fasta, LineIter};
///
/// let lines = [">seq1", "AC-T"];
/// let alignment = parse_aligned_fasta(LineIter::new(lines.iter().copied())).unwrap();
/// assert_eq!(alignment.get(0).unwrap().sequence, "ACT");
/// ```
#[derive(Debug, Clone)]
pub struct LineIter<I> {
    lines: I,
}

impl<I> LineIter<I> {
    pub fn new(lines: I) -> Self {
        Self { lines }
    }
}

impl<I, S> LineSource for LineIter<I>
where
    I: Iterator<Item = S>,
    S: Into<String>,
{
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.next().map(|line| {
            let mut line: String = line.into();
            let content_len = line.trim_end_matches(['\n', '\r']).len();
            line.truncate(content_len);
            line
        }))
    }
}

/// Where an alignment is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Path(PathBuf),
}

impl Input {
    /// Interprets a command line argument; `-` means standard input.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Input::Stdin
        } else {
            Input::Path(PathBuf::from(arg))
        }
    }

    /// Opens the input for buffered line reading.
    pub fn open(&self) -> io::Result<Box<dyn BufRead>> {
        match self {
            Input::Stdin => Ok(Box::new(io::stdin().lock())),
            Input::Path(path) => {
                let file = File::open(path)?;
                Ok(Box::new(BufReader::with_capacity(1024 * 1024, file)))
            }
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Stdin => write!(f, "<stdin>"),
            Input::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Where a formatted alignment is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    Path(PathBuf),
}

impl Output {
    /// Interprets a command line argument; `-` means standard output.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Output::Stdout
        } else {
            Output::Path(PathBuf::from(arg))
        }
    }

    /// Opens the output for buffered writing, truncating existing files.
    pub fn create(&self) -> io::Result<Box<dyn Write>> {
        match self {
            Output::Stdout => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
            Output::Path(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout => write!(f, "<stdout>"),
            Output::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Returns true if the file extension is one commonly used for FASTA.
pub fn has_fasta_extension<P: AsRef<Path>>(path: P) -> bool {
    let Some(ext) = path.as_ref().extension().and_then(OsStr::to_str) else {
        return false;
    };
    matches!(
        ext.to_lowercase().as_str(),
        "fa" | "fas" | "fasta" | "fna" | "faa" | "ffn" | "frn" | "afa" | "mfa" | "aln"
    )
}

/// Reads one alignment from the given input.
pub fn parse_input(input: &Input) -> ParseResult<Alignment> {
    if let Input::Path(path) = input {
        if !has_fasta_extension(path) {
            debug!("{} has no FASTA extension, reading it as aligned FASTA anyway", input);
        }
    }

    let reader = input.open()?;
    let alignment = fasta::parse_aligned_fasta(reader)?;
    info!(
        "Read {} sequences over {} columns from {}",
        alignment.sequence_count(),
        alignment.length(),
        input
    );
    Ok(alignment)
}

/// Reads one alignment from an aligned FASTA file.
///
/// # Examples
///
/// ```no_run
/// use aligned_fasta::formats::parse_file;
///
/// let alignment = parse_file("alignment.fasta").unwrap();
/// println!("Loaded {} sequences", alignment.sequence_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> ParseResult<Alignment> {
    parse_input(&Input::Path(path.as_ref().to_path_buf()))
}

/// Writes an alignment as aligned FASTA to the given output.
pub fn write_output(output: &Output, alignment: &Alignment) -> io::Result<()> {
    let writer = output.create()?;
    fasta::write_alignment(writer, alignment)?;
    info!(
        "Wrote {} sequences to {}",
        alignment.sequence_count(),
        output
    );
    Ok(())
}

/// Writes an alignment as aligned FASTA to a file.
pub fn write_file<P: AsRef<Path>>(path: P, alignment: &Alignment) -> io::Result<()> {
    write_output(&Output::Path(path.as_ref().to_path_buf()), alignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_source_strips_terminators() {
        let mut source = "first\r\nsecond\n\nlast".as_bytes();
        assert_eq!(source.next_line().unwrap().as_deref(), Some("first"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("second"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("last"));
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn test_line_iter() {
        let mut source = LineIter::new(vec!["a\n".to_string(), "b".to_string()].into_iter());
        assert_eq!(source.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("b"));
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn test_input_from_arg() {
        assert_eq!(Input::from_arg("-"), Input::Stdin);
        assert_eq!(
            Input::from_arg("aln.fasta"),
            Input::Path(PathBuf::from("aln.fasta"))
        );
        assert_eq!(Input::Stdin.to_string(), "<stdin>");
    }

    #[test]
    fn test_output_from_arg() {
        assert_eq!(Output::from_arg("-"), Output::Stdout);
        assert_eq!(
            Output::from_arg("out.fa"),
            Output::Path(PathBuf::from("out.fa"))
        );
        assert_eq!(Output::from_arg("out.fa").to_string(), "out.fa");
    }

    #[test]
    fn test_has_fasta_extension() {
        assert!(has_fasta_extension("test.fa"));
        assert!(has_fasta_extension("test.FASTA"));
        assert!(has_fasta_extension("test.afa"));
        assert!(!has_fasta_extension("test.phy"));
        assert!(!has_fasta_extension("test"));
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_file("does/not/exist.fasta");
        assert!(matches!(result, Err(ParseError::IoError(_))));
    }
}

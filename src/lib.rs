//! # aligned-fasta - aligned FASTA reader and writer
//!
//! Reads and writes multiple sequence alignments stored as aligned FASTA,
//! i.e. FASTA records whose sequences contain `-` gaps and all span the same
//! number of columns.
//!
//! ## Architecture
//!
//! - `coordinates`: the coordinate table of an alignment and its inference
//!   from gapped text
//! - `model`: records and the alignment that owns them
//! - `formats`: input/output boundary and the aligned FASTA parser and writer
//!
//! ```
//! use aligned_fasta::formats::fasta::{format_alignment, parse_aligned_fasta_str};
//!
//! let alignment = parse_aligned_fasta_str(">seq1 first\nACGT\n>seq2\nAC-T\n").unwrap();
//! assert_eq!(alignment.coordinates().row(1), Some(&[0, 2, 2, 3][..]));
//! assert_eq!(format_alignment(&alignment), ">seq1 first\nACGT\n>seq2\nAC-T");
//! ```

pub mod coordinates;
pub mod formats;
pub mod model;

//! Data model for aligned sequences.
//!
//! An [`Alignment`] owns its [`Record`]s, which hold *ungapped* residues, and
//! a [`Coordinates`] table that places those residues into aligned columns.
//! Gapped rows are never stored; they are rebuilt from the table on demand.

use std::iter;

use thiserror::Error;

use crate::coordinates::{Coordinates, GAP};

/// A single sequence with its identifier, description and residues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The sequence identifier (first word of the FASTA header, without '>')
    pub id: String,
    /// Free text following the identifier, if any
    pub description: Option<String>,
    /// The ungapped sequence data
    pub sequence: String,
}

impl Record {
    /// Creates a new record without description.
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            sequence: sequence.into(),
        }
    }

    /// Sets the description of the record.
    ///
    /// Surrounding whitespace is trimmed; a blank description is no description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize_description(Some(description.into()));
        self
    }

    /// Returns the number of residues.
    pub fn len(&self) -> usize {
        self.sequence.chars().count()
    }

    /// Returns true if the record has no residues.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    let description = description?;
    let trimmed = description.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == description.len() {
        Some(description)
    } else {
        Some(trimmed.to_string())
    }
}

/// Errors raised when records and coordinates do not describe an alignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("Alignment has {records} records but {rows} coordinate rows")]
    RowCountMismatch { records: usize, rows: usize },

    #[error("Coordinates of '{id}' start at {start}, expected 0")]
    InvalidStart { id: String, start: usize },

    #[error("Coordinates of '{id}' end at {end}, but the sequence has {len} residues")]
    InvalidEnd { id: String, end: usize, len: usize },

    #[error("Invalid sequence identifier '{id}': must be non-empty and without whitespace")]
    InvalidId { id: String },

    #[error("Description of '{id}' spans several lines")]
    MultilineDescription { id: String },

    #[error("Sequence '{id}' contains the gap character at residue {position}")]
    GapInSequence { id: String, position: usize },

    #[error("Sequence '{id}' contains whitespace at residue {position}")]
    WhitespaceInSequence { id: String, position: usize },
}

/// Checks that a record can be written as aligned FASTA and read back unchanged.
fn validate_record(record: &Record) -> Result<(), AlignmentError> {
    if record.id.is_empty() || record.id.chars().any(char::is_whitespace) {
        return Err(AlignmentError::InvalidId {
            id: record.id.clone(),
        });
    }
    if let Some(description) = &record.description {
        if description.contains(['\n', '\r']) {
            return Err(AlignmentError::MultilineDescription {
                id: record.id.clone(),
            });
        }
    }
    for (position, residue) in record.sequence.chars().enumerate() {
        if residue == GAP {
            return Err(AlignmentError::GapInSequence {
                id: record.id.clone(),
                position,
            });
        }
        if residue.is_whitespace() {
            return Err(AlignmentError::WhitespaceInSequence {
                id: record.id.clone(),
                position,
            });
        }
    }
    Ok(())
}

/// A multiple sequence alignment in coordinate form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    records: Vec<Record>,
    coordinates: Coordinates,
}

impl Alignment {
    /// Creates an alignment, checking that every coordinate row covers the
    /// whole sequence of its record and that every record survives a round
    /// trip through aligned FASTA: identifiers are single non-empty words,
    /// descriptions fit on one line and sequences hold no gaps or whitespace.
    ///
    /// Descriptions are trimmed, and blank ones become `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use aligned_fasta::coordinates::Coordinates;
    /// use aligned_fasta::model::{Alignment, Record};
    ///
    /// let records = vec![Record::new("seq1", "ACGT"), Record::new("seq2", "ACT")];
    /// let coordinates = Coordinates::new(vec![vec![0, 2, 3, 4], vec![0, 2, 2, 3]]).unwrap();
    /// let alignment = Alignment::new(records, coordinates).unwrap();
    /// assert_eq!(alignment.gapped_row(1).as_deref(), Some("AC-T"));
    /// ```
    pub fn new(
        mut records: Vec<Record>,
        coordinates: Coordinates,
    ) -> Result<Self, AlignmentError> {
        if records.len() != coordinates.row_count() {
            return Err(AlignmentError::RowCountMismatch {
                records: records.len(),
                rows: coordinates.row_count(),
            });
        }

        for (record, row) in records.iter_mut().zip(coordinates.rows()) {
            record.description = normalize_description(record.description.take());
            validate_record(record)?;

            let start = row[0];
            if start != 0 {
                return Err(AlignmentError::InvalidStart {
                    id: record.id.clone(),
                    start,
                });
            }
            let end = row[row.len() - 1];
            let len = record.len();
            if end != len {
                return Err(AlignmentError::InvalidEnd {
                    id: record.id.clone(),
                    end,
                    len,
                });
            }
        }

        Ok(Self {
            records,
            coordinates,
        })
    }

    /// Returns the records, in row order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the coordinate table.
    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    /// Splits the alignment into its records and coordinates.
    pub fn into_parts(self) -> (Vec<Record>, Coordinates) {
        (self.records, self.coordinates)
    }

    /// Returns the number of sequences.
    pub fn sequence_count(&self) -> usize {
        self.records.len()
    }

    /// Returns the number of aligned columns.
    pub fn length(&self) -> usize {
        self.coordinates.length()
    }

    /// Returns the maximum identifier length (for display purposes).
    pub fn max_id_length(&self) -> usize {
        self.records.iter().map(|r| r.id.len()).max().unwrap_or(0)
    }

    /// Gets a record by index.
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Returns true if the alignment has no sequences.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rebuilds the gapped line of one row from the coordinate table.
    pub fn gapped_row(&self, index: usize) -> Option<String> {
        let record = self.records.get(index)?;
        let mut residues = record.sequence.chars();
        let mut line = String::with_capacity(self.length());

        for block in self.coordinates.blocks() {
            if block.is_gap(index) {
                line.extend(iter::repeat(GAP).take(block.width()));
            } else {
                line.extend(residues.by_ref().take(block.width()));
            }
        }

        Some(line)
    }

    /// Iterates over the gapped lines of all rows.
    pub fn gapped_rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.records.len()).filter_map(move |index| self.gapped_row(index))
    }
}

//! Coordinate representation of a multiple sequence alignment.
//!
//! An alignment of `N` sequences over `L` columns is stored as a table of
//! breakpoints. Each breakpoint records, for every row, how many residues of
//! that row lie to the left of a given column. Two consecutive breakpoints
//! delimit a *block*: a run of columns across which every row is either made
//! of residues only (its coordinate advances by the block width) or of gaps
//! only (its coordinate stays flat).
//!
//! ```text
//! seq1  AC G T        columns   0  2  3  4
//! seq2  AC - T        seq1      0  2  3  4
//!                     seq2      0  2  2  3
//! ```

use std::ops::Range;

use thiserror::Error;

/// The alignment gap character.
pub const GAP: char = '-';

/// Errors raised while building or inferring a coordinate table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("Row {row} has {found} columns, expected {expected}")]
    LengthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Coordinate table has no breakpoints")]
    NoBreakpoints,

    #[error("Breakpoint columns must start at 0 and strictly increase (breakpoint {breakpoint})")]
    ColumnsNotIncreasing { breakpoint: usize },

    #[error("Row {row} has {found} breakpoints, expected {expected}")]
    BreakpointCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} decreases in block {block}")]
    Decreasing { row: usize, block: usize },

    #[error("Row {row} advances by {found} in block {block}, expected 0 or {expected}")]
    InconsistentAdvance {
        row: usize,
        block: usize,
        expected: usize,
        found: usize,
    },
}

/// Result type for coordinate operations.
pub type CoordinateResult<T> = Result<T, CoordinateError>;

/// A validated coordinate table.
///
/// `columns[k]` is the aligned column at which breakpoint `k` sits, and
/// `rows[i][k]` is the number of residues of row `i` before that column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    columns: Vec<usize>,
    rows: Vec<Vec<usize>>,
}

impl Coordinates {
    /// Infers the coordinate table of a set of gapped strings.
    ///
    /// A breakpoint is placed at the first column, at every column whose gap
    /// pattern differs from the one of the previous column, and after the
    /// last column. All strings must have the same number of characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use aligned_fasta::coordinates::Coordinates;
    ///
    /// let coordinates = Coordinates::infer(&["ACGT", "AC-T"]).unwrap();
    /// assert_eq!(coordinates.row(0), Some(&[0, 2, 3, 4][..]));
    /// assert_eq!(coordinates.row(1), Some(&[0, 2, 2, 3][..]));
    /// ```
    pub fn infer<S: AsRef<str>>(lines: &[S]) -> CoordinateResult<Self> {
        let length = lines.first().map_or(0, |line| line.as_ref().chars().count());
        for (row, line) in lines.iter().enumerate().skip(1) {
            let found = line.as_ref().chars().count();
            if found != length {
                return Err(CoordinateError::LengthMismatch {
                    row,
                    expected: length,
                    found,
                });
            }
        }

        let mut columns = Vec::new();
        let mut rows = vec![Vec::new(); lines.len()];
        let mut counters = vec![0usize; lines.len()];
        let mut residues: Vec<_> = lines.iter().map(|line| line.as_ref().chars()).collect();
        let mut previous = vec![false; lines.len()];
        let mut current = vec![false; lines.len()];

        for column in 0..length {
            for (gapped, chars) in current.iter_mut().zip(residues.iter_mut()) {
                *gapped = chars.next() == Some(GAP);
            }

            if column == 0 || current != previous {
                push_breakpoint(&mut columns, &mut rows, column, &counters);
            }

            for (counter, &gapped) in counters.iter_mut().zip(&current) {
                if !gapped {
                    *counter += 1;
                }
            }
            std::mem::swap(&mut previous, &mut current);
        }

        // closing breakpoint; with no columns it is also the opening one
        push_breakpoint(&mut columns, &mut rows, length, &counters);

        log::debug!(
            "Inferred {} blocks for {} rows over {} columns",
            columns.len() - 1,
            lines.len(),
            length
        );

        Ok(Self { columns, rows })
    }

    /// Builds a table from per-row breakpoints, deriving each block's width
    /// from the rows that advance in it.
    ///
    /// A block in which every row is flat has no width and is rejected; use
    /// [`Coordinates::with_columns`] to describe all-gap blocks.
    pub fn new(rows: Vec<Vec<usize>>) -> CoordinateResult<Self> {
        let breakpoints = rows.first().map_or(1, Vec::len);
        let mut columns = Vec::with_capacity(breakpoints);
        let mut column = 0;
        columns.push(column);
        for block in 0..breakpoints.saturating_sub(1) {
            let width = rows
                .iter()
                .filter_map(|row| Some(row.get(block + 1)?.saturating_sub(*row.get(block)?)))
                .max()
                .unwrap_or(0);
            column += width;
            columns.push(column);
        }
        Self::with_columns(columns, rows)
    }

    /// Builds a table from explicit breakpoint columns and per-row breakpoints.
    ///
    /// Interior breakpoints across which no row changes its gap status are
    /// dropped, so that adjacent blocks always differ in their gap pattern and
    /// the table equals the one inferred from its own gapped rendering.
    ///
    /// # Examples
    ///
    /// ```
    /// use aligned_fasta::coordinates::Coordinates;
    ///
    /// let coordinates = Coordinates::with_columns(vec![0, 2, 4], vec![vec![0, 2, 4]]).unwrap();
    /// assert_eq!(coordinates.columns(), &[0, 4]);
    /// assert_eq!(coordinates.row(0), Some(&[0, 4][..]));
    /// ```
    pub fn with_columns(columns: Vec<usize>, rows: Vec<Vec<usize>>) -> CoordinateResult<Self> {
        if columns.is_empty() {
            return Err(CoordinateError::NoBreakpoints);
        }
        if columns[0] != 0 {
            return Err(CoordinateError::ColumnsNotIncreasing { breakpoint: 0 });
        }
        if let Some(k) = columns.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(CoordinateError::ColumnsNotIncreasing { breakpoint: k + 1 });
        }

        for (row, breakpoints) in rows.iter().enumerate() {
            if breakpoints.len() != columns.len() {
                return Err(CoordinateError::BreakpointCountMismatch {
                    row,
                    expected: columns.len(),
                    found: breakpoints.len(),
                });
            }
            for (block, (bounds, edges)) in
                breakpoints.windows(2).zip(columns.windows(2)).enumerate()
            {
                let advance = bounds[1]
                    .checked_sub(bounds[0])
                    .ok_or(CoordinateError::Decreasing { row, block })?;
                let width = edges[1] - edges[0];
                if advance != 0 && advance != width {
                    return Err(CoordinateError::InconsistentAdvance {
                        row,
                        block,
                        expected: width,
                        found: advance,
                    });
                }
            }
        }

        Ok(Self::merge_redundant(columns, rows))
    }

    /// Drops the interior breakpoints that separate blocks of equal gap pattern.
    fn merge_redundant(columns: Vec<usize>, rows: Vec<Vec<usize>>) -> Self {
        let last = columns.len() - 1;
        let keep: Vec<bool> = (0..columns.len())
            .map(|k| {
                k == 0
                    || k == last
                    || rows
                        .iter()
                        .any(|row| (row[k - 1] == row[k]) != (row[k] == row[k + 1]))
            })
            .collect();

        let dropped = keep.iter().filter(|&&kept| !kept).count();
        if dropped == 0 {
            return Self { columns, rows };
        }
        log::debug!("Merged {} redundant breakpoints", dropped);

        let retain = |values: Vec<usize>| -> Vec<usize> {
            values
                .into_iter()
                .zip(&keep)
                .filter_map(|(value, &kept)| kept.then_some(value))
                .collect()
        };
        Self {
            columns: retain(columns),
            rows: rows.into_iter().map(retain).collect(),
        }
    }

    /// Returns the aligned column of every breakpoint.
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Returns all rows of the table.
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Returns the breakpoints of one row.
    pub fn row(&self, index: usize) -> Option<&[usize]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of breakpoints (table columns).
    pub fn breakpoint_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the number of blocks.
    pub fn block_count(&self) -> usize {
        self.breakpoint_count() - 1
    }

    /// Returns the number of aligned columns covered by the table.
    pub fn length(&self) -> usize {
        self.columns.last().copied().unwrap_or(0)
    }

    /// Returns the number of residues of a row covered by the table.
    pub fn residue_count(&self, row: usize) -> Option<usize> {
        let breakpoints = self.row(row)?;
        Some(breakpoints[breakpoints.len() - 1] - breakpoints[0])
    }

    /// Iterates over the blocks from left to right.
    pub fn blocks(&self) -> impl Iterator<Item = Block<'_>> + '_ {
        (0..self.block_count()).map(move |index| Block {
            coordinates: self,
            index,
        })
    }
}

fn push_breakpoint(
    columns: &mut Vec<usize>,
    rows: &mut [Vec<usize>],
    column: usize,
    counters: &[usize],
) {
    columns.push(column);
    for (row, &counter) in rows.iter_mut().zip(counters) {
        row.push(counter);
    }
}

/// A view of one block of a [`Coordinates`] table.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    coordinates: &'a Coordinates,
    index: usize,
}

impl Block<'_> {
    /// Position of the block, counted from the left.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Aligned columns spanned by the block.
    pub fn columns(&self) -> Range<usize> {
        self.coordinates.columns[self.index]..self.coordinates.columns[self.index + 1]
    }

    /// Number of aligned columns spanned by the block.
    pub fn width(&self) -> usize {
        self.columns().len()
    }

    /// Ungapped residue range of a row inside the block.
    pub fn residues(&self, row: usize) -> Option<Range<usize>> {
        let breakpoints = self.coordinates.row(row)?;
        Some(breakpoints[self.index]..breakpoints[self.index + 1])
    }

    /// Returns true if the row is gapped throughout the block.
    pub fn is_gap(&self, row: usize) -> bool {
        self.residues(row).is_some_and(|range| range.is_empty())
    }

    /// Gap status of every row in the block.
    pub fn gap_pattern(&self) -> Vec<bool> {
        (0..self.coordinates.row_count())
            .map(|row| self.is_gap(row))
            .collect()
    }
}

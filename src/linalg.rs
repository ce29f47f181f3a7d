//! Dense matrices over GF(2).
//!
//! Rows are packed into `BitVec<u64, Lsb0>` so row operations are word-wide
//! XORs. Used to hold Goppa parity-check matrices and to bring them into
//! systematic form.

use crate::error::{Error, Result};
use bitvec::prelude::*;
use std::fmt::{self, Display, Formatter};

/// Packed row of a [`BitMatrix`]
pub type BitRow = BitVec<u64, Lsb0>;

/// Matrix over GF(2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    cols: usize,
    data: Vec<BitRow>,
}

impl BitMatrix {
    /// All-zero matrix of the given shape
    pub fn new(rows: usize, cols: usize) -> Self {
        BitMatrix {
            cols,
            data: vec![bitvec![u64, Lsb0; 0; cols]; rows],
        }
    }

    /// Build from packed rows, which must all have the same length.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the row lengths differ.
    pub fn from_rows(data: Vec<BitRow>) -> Result<Self> {
        let cols = data.first().map_or(0, |row| row.len());
        if let Some(bad) = data.iter().position(|row| row.len() != cols) {
            return Err(Error::InvalidParameter(format!(
                "row {} has {} columns, expected {}",
                bad,
                data[bad].len(),
                cols
            )));
        }
        Ok(BitMatrix { cols, data })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.len()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.data[row][col]
    }

    /// Set the entry at `(row, col)`
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        self.data[row].set(col, value);
    }

    /// Borrow one row
    pub fn row(&self, row: usize) -> &BitSlice<u64, Lsb0> {
        &self.data[row]
    }

    /// Matrix-vector product `M · v` over GF(2).
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `v` does not have `cols()` entries.
    pub fn mul_vec<T: BitStore, O: BitOrder>(&self, v: &BitSlice<T, O>) -> Result<BitRow> {
        if v.len() != self.cols {
            return Err(Error::InvalidParameter(format!(
                "vector has {} entries, matrix has {} columns",
                v.len(),
                self.cols
            )));
        }
        Ok(self
            .data
            .iter()
            .map(|row| row.iter_ones().filter(|&c| v[c]).count() % 2 == 1)
            .collect())
    }

    /// Bring the matrix to reduced row echelon form in place.
    ///
    /// Returns the pivot column of each nonzero row, in row order; its length
    /// is the rank. Rows past the rank end up all zero.
    pub fn row_reduce(&mut self) -> Vec<usize> {
        let mut pivots = Vec::new();
        let rows = self.data.len();

        for col in 0..self.cols {
            let pivot_row = pivots.len();
            if pivot_row == rows {
                break;
            }
            let Some(found) = (pivot_row..rows).find(|&r| self.data[r][col]) else {
                continue;
            };
            self.data.swap(pivot_row, found);

            let pivot = self.data[pivot_row].clone();
            for (r, row) in self.data.iter_mut().enumerate() {
                if r != pivot_row && row[col] {
                    *row ^= pivot.as_bitslice();
                }
            }
            pivots.push(col);
        }
        pivots
    }

    /// Rank over GF(2)
    pub fn rank(&self) -> usize {
        self.clone().row_reduce().len()
    }

    /// New matrix made of the given columns, in the given order
    pub fn select_columns(&self, columns: &[usize]) -> BitMatrix {
        let data = self
            .data
            .iter()
            .map(|row| columns.iter().map(|&c| row[c]).collect())
            .collect();
        BitMatrix {
            cols: columns.len(),
            data,
        }
    }
}

impl Display for BitMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in &self.data {
            for bit in row.iter().by_vals() {
                write!(f, "{}", u8::from(bit))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

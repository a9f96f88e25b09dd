use std::fmt::Debug;
use std::io::Write;

use anyhow::Result;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("invalid DP grid shape: {shape:?} (every axis must be at least 1)")]
pub struct InvalidDimensionError {
    pub shape: Vec<usize>,
}

#[derive(Error, Debug)]
#[error("DP grid coordinates {coords:?} are out of range for shape {shape:?}")]
pub struct GridIndexError {
    pub coords: Vec<isize>,
    pub shape: Vec<usize>,
}

/// A dense `D`-dimensional dynamic programming grid of scores.
///
/// Each axis has one more cell than the sequence it indexes, so that
/// index 0 is the empty prefix. The origin starts at 0 and every other
/// cell starts at negative infinity. Reading outside of the grid yields
/// negative infinity, which lets the recurrences treat the boundary
/// rows exactly like the interior.
#[derive(Clone, Debug)]
pub struct DpGrid<const D: usize> {
    shape: [usize; D],
    strides: [usize; D],
    data: Vec<f64>,
}

pub type DpGrid2 = DpGrid<2>;
pub type DpGrid3 = DpGrid<3>;

impl<const D: usize> DpGrid<D> {
    pub fn new(shape: [usize; D]) -> Result<Self> {
        let mut grid = Self::new_unset(shape)?;
        grid.data[0] = 0.0;
        Ok(grid)
    }

    /// Creates a grid where every cell, including the origin, is negative infinity.
    pub fn new_unset(shape: [usize; D]) -> Result<Self> {
        if D == 0 || shape.iter().any(|&len| len == 0) {
            return Err(InvalidDimensionError {
                shape: shape.to_vec(),
            }
            .into());
        }

        // row-major: the last axis is contiguous
        let mut strides = [1usize; D];
        for axis in (0..D.saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * shape[axis + 1];
        }

        let size = shape.iter().product();

        Ok(Self {
            shape,
            strides,
            data: vec![-f64::INFINITY; size],
        })
    }

    /// Creates a grid sized for the given sequence lengths.
    pub fn for_lengths(lengths: [usize; D]) -> Result<Self> {
        Self::new(lengths.map(|len| len + 1))
    }

    pub fn shape(&self) -> [usize; D] {
        self.shape
    }

    fn flat_index(&self, coords: [isize; D]) -> Option<usize> {
        let mut flat = 0;
        for axis in 0..D {
            let c = coords[axis];
            if c < 0 || c as usize >= self.shape[axis] {
                return None;
            }
            flat += c as usize * self.strides[axis];
        }
        Some(flat)
    }

    /// The value at `coords`, or negative infinity if any coordinate is outside of the grid.
    #[inline]
    pub fn get(&self, coords: [isize; D]) -> f64 {
        match self.flat_index(coords) {
            Some(idx) => self.data[idx],
            None => -f64::INFINITY,
        }
    }

    #[inline]
    pub fn get_at(&self, coords: [usize; D]) -> f64 {
        self.get(coords.map(|c| c as isize))
    }

    pub fn set(&mut self, coords: [isize; D], value: f64) -> Result<()> {
        match self.flat_index(coords) {
            Some(idx) => {
                self.data[idx] = value;
                Ok(())
            }
            None => Err(GridIndexError {
                coords: coords.to_vec(),
                shape: self.shape.to_vec(),
            }
            .into()),
        }
    }

    #[inline]
    pub fn set_at(&mut self, coords: [usize; D], value: f64) -> Result<()> {
        self.set(coords.map(|c| c as isize), value)
    }

    /// The far corner of the grid: the score of aligning every sequence in full.
    pub fn score(&self) -> f64 {
        self.get(self.shape.map(|len| len as isize - 1))
    }
}

impl DpGrid2 {
    pub fn dump(&self, out: &mut impl Write) -> Result<()> {
        self.dump_with_labels(out, &[], &[])
    }

    /// Writes the grid as a matrix, optionally labelling the rows and
    /// columns with the residues of the sequences that index them.
    pub fn dump_with_labels(
        &self,
        out: &mut impl Write,
        row_labels: &[u8],
        column_labels: &[u8],
    ) -> Result<()> {
        let [num_rows, num_cols] = self.shape;
        let row_idx_width = (num_rows - 1).to_string().len();
        let first_column_width = row_idx_width + 3;
        let column_width = 9;
        let precision = 1;

        let label = |labels: &[u8], idx: usize| -> char {
            match idx {
                0 => '-',
                _ => labels.get(idx - 1).map(|&b| char::from(b)).unwrap_or(' '),
            }
        };

        // write the column indices
        write!(out, "{}", " ".repeat(first_column_width - 1))?;
        for col_idx in 0..num_cols {
            write!(out, "{:w$} ", col_idx, w = column_width)?;
        }
        writeln!(out)?;

        if !column_labels.is_empty() {
            write!(out, "{}", " ".repeat(first_column_width - 1))?;
            for col_idx in 0..num_cols {
                write!(out, "{:>w$} ", label(column_labels, col_idx), w = column_width)?;
            }
            writeln!(out)?;
        }

        write!(out, "{}", " ".repeat(first_column_width))?;
        for _ in 0..num_cols {
            write!(out, "   {} ", "-".repeat(column_width - 3))?;
        }
        writeln!(out)?;

        for row_idx in 0..num_rows {
            let row_label = if row_labels.is_empty() {
                ' '
            } else {
                label(row_labels, row_idx)
            };
            write!(out, "{:w$} {} ", row_idx, row_label, w = row_idx_width)?;
            for col_idx in 0..num_cols {
                write!(
                    out,
                    "{:w$.p$} ",
                    self.get_at([row_idx, col_idx]),
                    w = column_width,
                    p = precision
                )?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_new_grid() -> anyhow::Result<()> {
        let grid = DpGrid2::new([3, 4])?;
        check!(grid.get([0, 0]) == 0.0);
        check!(grid.get([1, 2]) == -f64::INFINITY);
        check!(grid.shape() == [3, 4]);

        let_assert!(Err(err) = DpGrid3::new([2, 0, 2]));
        let_assert!(Some(err) = err.downcast_ref::<InvalidDimensionError>());
        check!(err.shape == vec![2, 0, 2]);

        let unset = DpGrid2::new_unset([2, 2])?;
        check!(unset.get([0, 0]) == -f64::INFINITY);
        Ok(())
    }

    #[test]
    fn test_out_of_range_access() -> anyhow::Result<()> {
        let mut grid = DpGrid3::for_lengths([1, 2, 3])?;
        check!(grid.shape() == [2, 3, 4]);
        check!(grid.get([-1, 0, 0]) == -f64::INFINITY);
        check!(grid.get([0, 3, 0]) == -f64::INFINITY);

        let_assert!(Err(err) = grid.set([2, 0, 0], 1.0));
        check!(err.downcast_ref::<GridIndexError>().is_some());
        check!(grid.set([0, -1, 0], 1.0).is_err());

        grid.set([1, 2, 3], 7.5)?;
        check!(grid.get([1, 2, 3]) == 7.5);
        check!(grid.score() == 7.5);

        grid.set_at([1, 0, 3], -2.0)?;
        check!(grid.get_at([1, 0, 3]) == -2.0);
        // neighbouring cells are untouched
        check!(grid.get([1, 1, 3]) == -f64::INFINITY);
        check!(grid.get([0, 0, 3]) == -f64::INFINITY);
        Ok(())
    }

    #[test]
    fn test_dump() -> anyhow::Result<()> {
        let mut grid = DpGrid2::for_lengths([1, 1])?;
        grid.set([0, 1], -4.0)?;
        grid.set([1, 0], -4.0)?;
        grid.set([1, 1], 2.0)?;

        let mut out: Vec<u8> = vec![];
        grid.dump_with_labels(&mut out, b"A", b"C")?;
        let text = String::from_utf8(out)?;
        let lines: Vec<&str> = text.lines().collect();

        check!(lines.len() == 5);
        check!(lines[3].contains("0.0"));
        check!(lines[3].contains("-4.0"));
        check!(lines[4].starts_with("1 A"));
        check!(lines[4].contains("2.0"));
        Ok(())
    }
}

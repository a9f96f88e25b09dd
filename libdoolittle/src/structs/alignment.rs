use std::cmp::{max, min};
use std::fmt::{Display, Formatter};

use crate::alphabet::{is_gap, UTF8_PIPE, UTF8_SPACE, UTF8_STAR};
use crate::structs::Sequence;
use anyhow::Result;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("an alignment needs at least two sequences, got: {count}")]
pub struct TooFewSequencesError {
    pub count: usize,
}

#[derive(Error, Debug)]
#[error("column has {found} symbols, but the alignment has {expected} rows")]
pub struct ColumnWidthError {
    pub expected: usize,
    pub found: usize,
}

#[derive(Error, Debug)]
#[error("alignment row {row} has length {found}, expected {expected}")]
pub struct RowLengthMismatchError {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

#[derive(Error, Debug)]
#[error("alignment row index {row} is out of range for {count} rows")]
pub struct RowIndexError {
    pub row: usize,
    pub count: usize,
}

/// This selects the character for the line between two aligned residues.
pub fn select_middle_character(top_byte: u8, bottom_byte: u8) -> u8 {
    if is_gap(top_byte) || is_gap(bottom_byte) {
        UTF8_SPACE
    } else if top_byte.eq_ignore_ascii_case(&bottom_byte) {
        UTF8_PIPE
    } else {
        UTF8_STAR
    }
}

/// Computes the match annotations between each adjacent pair of symbols in a column.
pub fn middle_column(column: &[u8]) -> Vec<u8> {
    column
        .windows(2)
        .map(|pair| select_middle_character(pair[0], pair[1]))
        .collect()
}

/// A set of named, gapped sequence rows that are aligned column by column.
///
/// Between each pair of adjacent rows there is a "middle" row holding the
/// match annotations: `|` for identical residues, `*` for a mismatch and a
/// space when either side is a gap.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Alignment {
    /// The name of the sequence in each row
    pub names: Vec<String>,
    /// The aligned (gapped) sequence rows
    pub rows: Vec<String>,
    /// The match annotation rows, `rows.len() - 1` of them
    pub middle: Vec<String>,
    /// The score of the alignment, if one has been computed
    pub score: Option<f64>,
}

impl Alignment {
    /// Creates an empty alignment with `count` rows.
    pub fn new(count: usize) -> Result<Self> {
        if count < 2 {
            return Err(TooFewSequencesError { count }.into());
        }

        Ok(Alignment {
            names: vec![String::new(); count],
            rows: vec![String::new(); count],
            middle: vec![String::new(); count - 1],
            score: None,
        })
    }

    /// Creates an alignment holding each sequence as one row, as is.
    pub fn from_sequences(seqs: &[Sequence]) -> Result<Self> {
        let mut alignment = Self::new(seqs.len())?;

        seqs.iter().enumerate().for_each(|(idx, seq)| {
            alignment.names[idx] = seq.name.clone();
            alignment.rows[idx] = seq.as_str().to_string();
        });

        if alignment.length().is_ok() {
            alignment.annotate()?;
        }

        Ok(alignment)
    }

    /// Parses FASTA-like text into an alignment with one row per record.
    pub fn from_fasta_str(text: &str) -> Result<Self> {
        let seqs = Sequence::amino_from_fasta_str(text)?;
        Self::from_sequences(&seqs)
    }

    pub fn with_names(mut self, names: &[&str]) -> Self {
        self.names
            .iter_mut()
            .zip(names)
            .for_each(|(name, &new)| *name = new.to_string());
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The number of columns; fails if the rows differ in length.
    pub fn length(&self) -> Result<usize> {
        let expected = self.rows.first().map(|r| r.len()).unwrap_or(0);

        match self.rows.iter().position(|r| r.len() != expected) {
            Some(row) => Err(RowLengthMismatchError {
                row,
                expected,
                found: self.rows[row].len(),
            }
            .into()),
            None => Ok(expected),
        }
    }

    pub fn row(&self, idx: usize) -> Option<&str> {
        self.rows.get(idx).map(|r| r.as_str())
    }

    pub fn row_bytes(&self, idx: usize) -> Option<&[u8]> {
        self.rows.get(idx).map(|r| r.as_bytes())
    }

    /// Replaces a whole row.
    pub fn set_row(&mut self, idx: usize, name: &str, row: &str) -> Result<()> {
        if idx >= self.rows.len() {
            return Err(RowIndexError {
                row: idx,
                count: self.rows.len(),
            }
            .into());
        }
        self.names[idx] = name.to_string();
        self.rows[idx] = row.to_string();
        Ok(())
    }

    /// The symbols of every row at a column index.
    pub fn column(&self, col: usize) -> Option<Vec<u8>> {
        self.rows.iter().map(|r| r.as_bytes().get(col).copied()).collect()
    }

    fn check_column(&self, column: &[u8], middle: &[u8]) -> Result<()> {
        if column.len() != self.rows.len() {
            return Err(ColumnWidthError {
                expected: self.rows.len(),
                found: column.len(),
            }
            .into());
        }
        if middle.len() != self.middle.len() {
            return Err(ColumnWidthError {
                expected: self.middle.len(),
                found: middle.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Inserts one column (and its match annotations) in front of every row.
    pub fn prepend_column(&mut self, column: &[u8], middle: &[u8]) -> Result<&mut Self> {
        self.check_column(column, middle)?;

        self.rows
            .iter_mut()
            .zip(column)
            .for_each(|(row, &b)| row.insert(0, char::from(b)));
        self.middle
            .iter_mut()
            .zip(middle)
            .for_each(|(row, &b)| row.insert(0, char::from(b)));

        Ok(self)
    }

    /// Appends one column (and its match annotations) to the end of every row.
    pub fn append_column(&mut self, column: &[u8], middle: &[u8]) -> Result<&mut Self> {
        self.check_column(column, middle)?;

        self.rows
            .iter_mut()
            .zip(column)
            .for_each(|(row, &b)| row.push(char::from(b)));
        self.middle
            .iter_mut()
            .zip(middle)
            .for_each(|(row, &b)| row.push(char::from(b)));

        Ok(self)
    }

    /// Recomputes every match annotation row from the sequence rows.
    pub fn annotate(&mut self) -> Result<()> {
        self.length()?;

        self.middle = self
            .rows
            .windows(2)
            .map(|pair| {
                pair[0]
                    .bytes()
                    .zip(pair[1].bytes())
                    .map(|(a, b)| char::from(select_middle_character(a, b)))
                    .collect()
            })
            .collect();

        Ok(())
    }

    pub fn gap_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.bytes().filter(|&b| is_gap(b)).count())
            .sum()
    }

    /// Renders the rows interleaved with their match annotations in blocks of 80 columns.
    pub fn render(&self) -> Result<String> {
        let length = self.length()?;
        let name_width = self.names.iter().map(|n| n.len()).max().unwrap_or(0);

        let mut ali_string = String::new();

        if let Some(score) = self.score {
            ali_string.push_str(&format!("==  score: {score}\n"));
        }

        let mut start_offset: usize = 0;
        loop {
            let end_offset = min(start_offset + 80, length);

            for (row_idx, row) in self.rows.iter().enumerate() {
                ali_string.push_str(&format!(
                    "{:>W$} {}\n",
                    self.names[row_idx],
                    &row[start_offset..end_offset],
                    W = name_width
                ));

                // the middle line is missing if the rows were replaced without annotating
                if let Some(middle) = self.middle.get(row_idx) {
                    if row_idx + 1 < self.rows.len() && middle.len() == length {
                        ali_string.push_str(&format!(
                            "{:W$} {}\n",
                            "",
                            &middle[start_offset..end_offset],
                            W = name_width
                        ));
                    }
                }
            }

            start_offset += 80;
            if start_offset >= max(length, 1) {
                break;
            }
            ali_string.push('\n');
        }

        Ok(ali_string)
    }
}

impl Display for Alignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered = self.render().map_err(|_| std::fmt::Error)?;
        write!(f, "{rendered}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_new_requires_two_rows() {
        let_assert!(Err(err) = Alignment::new(1));
        check!(err.downcast_ref::<TooFewSequencesError>().is_some());
        check!(Alignment::new(2).is_ok());
    }

    #[test]
    fn test_prepend_and_append() -> anyhow::Result<()> {
        let mut ali = Alignment::new(3)?;
        ali.append_column(b"AA_", b"| ")?;
        ali.prepend_column(b"CDE", b"**")?;
        ali.append_column(b"GGG", b"||")?;

        check!(ali.row(0) == Some("CAG"));
        check!(ali.row(1) == Some("DAG"));
        check!(ali.row(2) == Some("E_G"));
        check!(ali.middle[0] == "*||");
        check!(ali.middle[1] == "* |");
        check!(ali.length()? == 3);
        check!(ali.gap_count() == 1);
        check!(ali.column(1) == Some(b"AA_".to_vec()));
        Ok(())
    }

    #[test]
    fn test_column_width_is_checked() -> anyhow::Result<()> {
        let mut ali = Alignment::new(2)?;
        let_assert!(Err(err) = ali.prepend_column(b"ABC", b"|"));
        check!(err.downcast_ref::<ColumnWidthError>().is_some());
        let_assert!(Err(_) = ali.append_column(b"AB", b""));
        Ok(())
    }

    #[test]
    fn test_unequal_rows_are_reported() -> anyhow::Result<()> {
        let mut ali = Alignment::new(2)?;
        ali.set_row(0, "a", "ACD")?;
        ali.set_row(1, "b", "AC")?;

        let_assert!(Err(err) = ali.length());
        let_assert!(Some(err) = err.downcast_ref::<RowLengthMismatchError>());
        check!(err.row == 1);
        check!(ali.render().is_err());
        check!(ali.annotate().is_err());
        check!(ali.set_row(2, "c", "A").is_err());
        Ok(())
    }

    #[test]
    fn test_annotate_and_render() -> anyhow::Result<()> {
        let mut ali = Alignment::new(2)?.with_names(&["one", "two"]);
        ali.set_row(0, "one", "AcD_")?;
        ali.set_row(1, "two", "ACE-")?;
        ali.annotate()?;
        check!(ali.middle[0] == "||* ");

        let ali = ali.with_score(-2.0);
        check!(ali.render()? == "==  score: -2\none AcD_\n    ||* \ntwo ACE-\n");
        Ok(())
    }

    #[test]
    fn test_render_wraps_long_rows() -> anyhow::Result<()> {
        let mut ali = Alignment::new(2)?;
        ali.set_row(0, "a", &"A".repeat(100))?;
        ali.set_row(1, "b", &"A".repeat(100))?;
        ali.annotate()?;

        let rendered = ali.render()?;
        let lines: Vec<&str> = rendered.lines().collect();
        // two blocks of three lines separated by one blank line
        check!(lines.len() == 7);
        check!(lines[0].len() == 82);
        check!(lines[3].is_empty());
        check!(lines[4].len() == 22);
        Ok(())
    }

    #[test]
    fn test_from_fasta_str() -> anyhow::Result<()> {
        let ali = Alignment::from_fasta_str(">a\nAC_D\n>b\nACED\n")?;
        check!(ali.names == vec!["a".to_string(), "b".to_string()]);
        check!(ali.middle[0] == "|| |");

        let_assert!(Err(err) = Alignment::from_fasta_str(">a\nACD\n"));
        check!(err.downcast_ref::<TooFewSequencesError>().is_some());
        Ok(())
    }
}

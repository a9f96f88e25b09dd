use crate::align::Scoring;
use crate::alphabet::digital_amino;
use crate::structs::sequence::UnknownUtf8SequenceByteError;
use crate::structs::Alignment;
use anyhow::Result;

/// Scores an alignment by summing the pairwise scores of every
/// unordered pair of rows in every column.
///
/// Each pair of rows is counted once, so a two-row alignment scores the
/// same as the pairwise DP and a three-row alignment the same as the triple DP.
pub fn sum_of_pairs(alignment: &Alignment, scoring: &impl Scoring) -> Result<f64> {
    let length = alignment.length()?;

    let digital_rows = alignment
        .rows
        .iter()
        .map(|row| {
            row.bytes()
                .map(|byte| digital_amino(byte).ok_or(UnknownUtf8SequenceByteError { byte }))
                .collect::<Result<Vec<u8>, _>>()
        })
        .collect::<Result<Vec<Vec<u8>>, _>>()?;

    let mut score = 0.0;
    for col in 0..length {
        for (row_idx, top) in digital_rows.iter().enumerate() {
            for bottom in &digital_rows[(row_idx + 1)..] {
                score += scoring.pair(top[col], bottom[col]);
            }
        }
    }

    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{MatchMismatch, ScoreMatrix};
    use crate::structs::alignment::RowLengthMismatchError;
    use assert2::{check, let_assert};

    fn simple() -> MatchMismatch {
        MatchMismatch {
            matches: 2.0,
            mismatch: -1.0,
            gap: -4.0,
        }
    }

    #[test]
    fn test_two_rows() -> anyhow::Result<()> {
        let alignment = Alignment::from_fasta_str(">a\nAC\n>b\nA_\n")?;
        check!(sum_of_pairs(&alignment, &simple())? == -2.0);
        Ok(())
    }

    #[test]
    fn test_gap_pairs_score_zero() -> anyhow::Result<()> {
        let alignment = Alignment::from_fasta_str(">a\nA_C\n>b\nA_-\n>c\nAGC\n")?;
        // column 1: 3 matches; column 2: two gap pairs and one gap-gap pair;
        // column 3: C/_ + C/C + _/C
        check!(sum_of_pairs(&alignment, &simple())? == 6.0 - 8.0 + (-4.0 + 2.0 - 4.0));
        Ok(())
    }

    #[test]
    fn test_is_idempotent() -> anyhow::Result<()> {
        let scoring = ScoreMatrix::blosum62(-4.0);
        let alignment = Alignment::from_fasta_str(">a\nHEAGAWGHE_E\n>b\n_PA__W_HEAE\n>c\nHEA_WGH__EE\n")?;
        let before = alignment.clone();

        let first = sum_of_pairs(&alignment, &scoring)?;
        let second = sum_of_pairs(&alignment, &scoring)?;
        check!(first == second);
        check!(alignment == before);
        Ok(())
    }

    #[test]
    fn test_errors() -> anyhow::Result<()> {
        let mut alignment = Alignment::new(2)?;
        alignment.set_row(0, "a", "ACD")?;
        alignment.set_row(1, "b", "AC")?;
        let_assert!(Err(err) = sum_of_pairs(&alignment, &simple()));
        check!(err.downcast_ref::<RowLengthMismatchError>().is_some());

        alignment.set_row(1, "b", "A#C")?;
        let_assert!(Err(err) = sum_of_pairs(&alignment, &simple()));
        let_assert!(Some(err) = err.downcast_ref::<UnknownUtf8SequenceByteError>());
        check!(err.byte == b'#');
        Ok(())
    }
}

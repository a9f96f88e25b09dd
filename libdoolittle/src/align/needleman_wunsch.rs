use std::fmt::{Display, Formatter};

use crate::align::structs::{Backtracer, DpGrid2};
use crate::align::Scoring;
use crate::alphabet::UTF8_GAP;
use crate::structs::alignment::select_middle_character;
use crate::structs::{Alignment, Sequence};
use anyhow::Result;
use log::debug;
use serde::Serialize;

/// One column of a pairwise alignment, named for the direction
/// it moves through the DP grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PairStep {
    /// Both sequences advance
    Diagonal,
    /// Only the first sequence advances (a gap in the second)
    Up,
    /// Only the second sequence advances (a gap in the first)
    Left,
}

impl PairStep {
    pub fn advances_first(&self) -> bool {
        matches!(self, PairStep::Diagonal | PairStep::Up)
    }

    pub fn advances_second(&self) -> bool {
        matches!(self, PairStep::Diagonal | PairStep::Left)
    }

    fn offsets(&self) -> (usize, usize) {
        (self.advances_first() as usize, self.advances_second() as usize)
    }
}

impl Display for PairStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PairStep::Diagonal => write!(f, "D"),
            PairStep::Up => write!(f, "U"),
            PairStep::Left => write!(f, "L"),
        }
    }
}

pub type PairTrace = Vec<PairStep>;

/// Every (score, step) that could lead into cell (i, j).
fn candidates(
    grid: &DpGrid2,
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    seq_1_idx: usize,
    seq_2_idx: usize,
) -> Vec<(f64, PairStep)> {
    let mut candidates = Vec::with_capacity(3);

    if seq_1_idx > 0 && seq_2_idx > 0 {
        let pair = scoring.pair(
            seq_1.digital_bytes[seq_1_idx],
            seq_2.digital_bytes[seq_2_idx],
        );
        candidates.push((
            grid.get_at([seq_1_idx - 1, seq_2_idx - 1]) + pair,
            PairStep::Diagonal,
        ));
    }

    if seq_1_idx > 0 {
        candidates.push((
            grid.get_at([seq_1_idx - 1, seq_2_idx]) + scoring.gap(),
            PairStep::Up,
        ));
    }

    if seq_2_idx > 0 {
        candidates.push((
            grid.get_at([seq_1_idx, seq_2_idx - 1]) + scoring.gap(),
            PairStep::Left,
        ));
    }

    candidates
}

/// Fills the linear gap DP grid for two sequences.
pub fn nw_fill(seq_1: &Sequence, seq_2: &Sequence, scoring: &impl Scoring) -> Result<DpGrid2> {
    let mut grid = DpGrid2::for_lengths([seq_1.length, seq_2.length])?;

    for seq_1_idx in 0..=seq_1.length {
        for seq_2_idx in 0..=seq_2.length {
            if seq_1_idx == 0 && seq_2_idx == 0 {
                continue;
            }

            let best = candidates(&grid, seq_1, seq_2, scoring, seq_1_idx, seq_2_idx)
                .into_iter()
                .map(|(score, _)| score)
                .fold(-f64::INFINITY, f64::max);

            grid.set_at([seq_1_idx, seq_2_idx], best)?;
        }
    }

    Ok(grid)
}

/// The optimal global alignment score of two sequences.
pub fn nw_score(seq_1: &Sequence, seq_2: &Sequence, scoring: &impl Scoring) -> Result<f64> {
    Ok(nw_fill(seq_1, seq_2, scoring)?.score())
}

fn nw_backtrack(
    grid: &DpGrid2,
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    backtracer: &mut Backtracer,
) -> Result<Vec<PairTrace>> {
    backtracer.trace_paths(
        (seq_1.length, seq_2.length),
        |&(i, j)| i == 0 && j == 0,
        |&(i, j)| {
            let current = grid.get_at([i, j]);
            candidates(grid, seq_1, seq_2, scoring, i, j)
                .into_iter()
                .filter(|&(score, _)| score == current)
                .map(|(_, step)| {
                    let (di, dj) = step.offsets();
                    ((i - di, j - dj), step)
                })
                .collect()
        },
    )
}

/// Builds the two-row alignment that a trace describes.
pub fn trace_to_alignment(trace: &[PairStep], seq_1: &Sequence, seq_2: &Sequence) -> Result<Alignment> {
    let mut alignment = Alignment::new(2)?.with_names(&[seq_1.name.as_str(), seq_2.name.as_str()]);
    let mut seq_1_idx = 0;
    let mut seq_2_idx = 0;

    for step in trace {
        let top = if step.advances_first() {
            seq_1_idx += 1;
            seq_1.utf8_bytes[seq_1_idx]
        } else {
            UTF8_GAP
        };

        let bottom = if step.advances_second() {
            seq_2_idx += 1;
            seq_2.utf8_bytes[seq_2_idx]
        } else {
            UTF8_GAP
        };

        alignment.append_column(&[top, bottom], &[select_middle_character(top, bottom)])?;
    }

    Ok(alignment)
}

/// Every optimal alignment the backtracer chooses to follow, each carrying the optimal score.
pub fn nw_align_all(
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    backtracer: &mut Backtracer,
) -> Result<Vec<Alignment>> {
    let grid = nw_fill(seq_1, seq_2, scoring)?;
    let score = grid.score();
    let traces = nw_backtrack(&grid, seq_1, seq_2, scoring, backtracer)?;

    debug!(
        "needleman-wunsch: score {score}, {} optimal alignment(s), {} tie(s)",
        traces.len(),
        backtracer.ties()
    );

    traces
        .iter()
        .map(|trace| Ok(trace_to_alignment(trace, seq_1, seq_2)?.with_score(score)))
        .collect()
}

/// One optimal path, chosen at random among ties with the given seed.
pub fn nw_trace(
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    seed: u64,
) -> Result<PairTrace> {
    nw_trace_with(seq_1, seq_2, scoring, &mut Backtracer::random(seed))
}

/// The first optimal path the backtracer follows.
pub fn nw_trace_with(
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    backtracer: &mut Backtracer,
) -> Result<PairTrace> {
    let grid = nw_fill(seq_1, seq_2, scoring)?;
    let mut traces = nw_backtrack(&grid, seq_1, seq_2, scoring, backtracer)?;
    // there is always at least one path back to the origin
    Ok(traces.swap_remove(0))
}

/// One optimal alignment, chosen at random among ties with the given seed.
pub fn nw_align(
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    seed: u64,
) -> Result<Alignment> {
    let mut alignments = nw_align_all(seq_1, seq_2, scoring, &mut Backtracer::random(seed))?;
    Ok(alignments.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{sum_of_pairs, MatchMismatch, ScoreMatrix};
    use assert2::check;

    fn simple() -> MatchMismatch {
        MatchMismatch {
            matches: 2.0,
            mismatch: -1.0,
            gap: -4.0,
        }
    }

    fn seq(name: &str, text: &str) -> Sequence {
        Sequence::from_utf8(text.as_bytes()).unwrap().named(name)
    }

    #[test]
    fn test_identical_sequences() -> anyhow::Result<()> {
        let a = seq("a", "AAA");
        let b = seq("b", "AAA");

        check!(nw_score(&a, &b, &simple())? == 6.0);

        let alignments = nw_align_all(&a, &b, &simple(), &mut Backtracer::exhaustive())?;
        check!(alignments.len() == 1);
        check!(alignments[0].rows == vec!["AAA".to_string(), "AAA".to_string()]);
        check!(alignments[0].middle[0] == "|||");
        check!(alignments[0].score == Some(6.0));
        Ok(())
    }

    #[test]
    fn test_single_gap() -> anyhow::Result<()> {
        let a = seq("a", "AC");
        let b = seq("b", "A");

        let alignments = nw_align_all(&a, &b, &simple(), &mut Backtracer::exhaustive())?;
        check!(alignments.len() == 1);
        check!(alignments[0].score == Some(-2.0));
        check!(alignments[0].rows == vec!["AC".to_string(), "A_".to_string()]);
        check!(alignments[0].middle[0] == "| ");
        Ok(())
    }

    #[test]
    fn test_fill_boundaries() -> anyhow::Result<()> {
        let grid = nw_fill(&seq("a", "ACD"), &seq("b", "AC"), &simple())?;
        check!(grid.get([0, 0]) == 0.0);
        check!(grid.get([3, 0]) == -12.0);
        check!(grid.get([0, 2]) == -8.0);
        check!(grid.score() == 0.0);
        Ok(())
    }

    #[test]
    fn test_empty_sequence() -> anyhow::Result<()> {
        let a = seq("a", "ACD");
        let empty = seq("e", "");

        check!(nw_score(&a, &empty, &simple())? == -12.0);
        let alignment = nw_align(&empty, &a, &simple(), 0)?;
        check!(alignment.rows == vec!["___".to_string(), "ACD".to_string()]);
        Ok(())
    }

    #[test]
    fn test_score_is_symmetric() -> anyhow::Result<()> {
        let scoring = ScoreMatrix::pam250(-4.0);
        let pairs = [
            ("HEAGAWGHEE", "PAWHEAE"),
            ("MKTAYIAKQR", "MKTAYIAK"),
            ("WWW", "CYC"),
        ];

        for (a, b) in pairs {
            let (a, b) = (seq("a", a), seq("b", b));
            check!(nw_score(&a, &b, &scoring)? == nw_score(&b, &a, &scoring)?);
        }
        Ok(())
    }

    #[test]
    fn test_exhaustive_alignments_are_optimal() -> anyhow::Result<()> {
        let scoring = MatchMismatch {
            matches: 1.0,
            mismatch: -1.0,
            gap: -1.0,
        };
        let a = seq("a", "GATTACA");
        let b = seq("b", "GCATGCA");

        let score = nw_score(&a, &b, &scoring)?;
        let mut backtracer = Backtracer::exhaustive();
        let alignments = nw_align_all(&a, &b, &scoring, &mut backtracer)?;

        check!(alignments.len() > 1);
        check!(backtracer.ties() > 0);

        for alignment in &alignments {
            // length() fails on ragged rows
            check!(alignment.length().is_ok());
            check!(sum_of_pairs(alignment, &scoring)? == score);
        }

        // no alignment is reported twice
        for (idx, alignment) in alignments.iter().enumerate() {
            check!(!alignments[(idx + 1)..].contains(alignment));
        }
        Ok(())
    }

    #[test]
    fn test_seeded_alignment_rescores_to_optimum() -> anyhow::Result<()> {
        let scoring = ScoreMatrix::blosum62(-4.0);
        let a = seq("a", "HEAGAWGHEE");
        let b = seq("b", "PAWHEAE");

        let score = nw_score(&a, &b, &scoring)?;
        let alignment = nw_align(&a, &b, &scoring, 42)?;
        check!(sum_of_pairs(&alignment, &scoring)? == score);
        check!(alignment == nw_align(&a, &b, &scoring, 42)?);

        let trace = nw_trace(&a, &b, &scoring, 42)?;
        check!(trace.iter().filter(|s| s.advances_first()).count() == a.length);
        check!(trace.iter().filter(|s| s.advances_second()).count() == b.length);
        Ok(())
    }
}

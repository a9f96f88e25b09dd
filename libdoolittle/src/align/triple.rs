use std::fmt::{Display, Formatter};

use crate::align::structs::{Backtracer, DpGrid3};
use crate::align::Scoring;
use crate::alphabet::{DIGITAL_GAP, UTF8_GAP};
use crate::structs::alignment::middle_column;
use crate::structs::{Alignment, Sequence};
use anyhow::Result;
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("three-way alignment needs exactly three sequences, got: {count}")]
pub struct SequenceCountError {
    pub count: usize,
}

#[derive(Error, Debug)]
#[error("sequence {index} ('{name}') is empty")]
pub struct EmptySequenceError {
    pub index: usize,
    pub name: String,
}

/// One column of a three-way alignment: which of the sequences advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TripleStep(pub [bool; 3]);

impl TripleStep {
    /// Every non-empty subset of the three sequences.
    pub const MOVES: [TripleStep; 7] = [
        TripleStep([true, true, true]),
        TripleStep([true, true, false]),
        TripleStep([true, false, true]),
        TripleStep([false, true, true]),
        TripleStep([true, false, false]),
        TripleStep([false, true, false]),
        TripleStep([false, false, true]),
    ];

    pub fn advances(&self, seq_idx: usize) -> bool {
        self.0[seq_idx]
    }

    fn offsets(&self) -> [usize; 3] {
        self.0.map(|advances| advances as usize)
    }
}

impl Display for TripleStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for advances in self.0 {
            write!(f, "{}", if advances { 'X' } else { '-' })?;
        }
        Ok(())
    }
}

fn check_sequences(seqs: &[Sequence]) -> Result<[&Sequence; 3]> {
    let triple: [&Sequence; 3] = match seqs {
        [a, b, c] => [a, b, c],
        _ => return Err(SequenceCountError { count: seqs.len() }.into()),
    };

    if let Some(index) = triple.iter().position(|seq| seq.is_empty()) {
        return Err(EmptySequenceError {
            index,
            name: triple[index].name.clone(),
        }
        .into());
    }

    Ok(triple)
}

/// Every (score, step) that could lead into `cell`.
fn candidates(
    grid: &DpGrid3,
    seqs: &[&Sequence; 3],
    scoring: &impl Scoring,
    cell: [usize; 3],
) -> Vec<(f64, TripleStep)> {
    TripleStep::MOVES
        .iter()
        .filter(|step| (0..3).all(|k| !step.advances(k) || cell[k] > 0))
        .map(|&step| {
            let offsets = step.offsets();
            let column: [u8; 3] = std::array::from_fn(|k| match step.advances(k) {
                true => seqs[k].digital_bytes[cell[k]],
                false => DIGITAL_GAP,
            });
            let previous: [usize; 3] = std::array::from_fn(|k| cell[k] - offsets[k]);

            (
                grid.get_at(previous) + scoring.triple(column[0], column[1], column[2]),
                step,
            )
        })
        .collect()
}

/// Fills the three dimensional sum-of-pairs DP grid.
pub fn triple_fill(seqs: &[Sequence], scoring: &impl Scoring) -> Result<DpGrid3> {
    let seqs = check_sequences(seqs)?;
    let mut grid = DpGrid3::for_lengths(seqs.map(|seq| seq.length))?;

    for i in 0..=seqs[0].length {
        for j in 0..=seqs[1].length {
            for k in 0..=seqs[2].length {
                if i == 0 && j == 0 && k == 0 {
                    continue;
                }
                let best = candidates(&grid, &seqs, scoring, [i, j, k])
                    .into_iter()
                    .map(|(score, _)| score)
                    .fold(-f64::INFINITY, f64::max);

                grid.set_at([i, j, k], best)?;
            }
        }
    }

    Ok(grid)
}

pub fn triple_score(seqs: &[Sequence], scoring: &impl Scoring) -> Result<f64> {
    Ok(triple_fill(seqs, scoring)?.score())
}

fn trace_to_alignment(trace: &[TripleStep], seqs: &[&Sequence; 3]) -> Result<Alignment> {
    let mut alignment = Alignment::new(3)?.with_names(&seqs.map(|seq| seq.name.as_str()));
    let mut positions = [0usize; 3];

    for step in trace {
        let column: [u8; 3] = std::array::from_fn(|k| {
            if step.advances(k) {
                positions[k] += 1;
                seqs[k].utf8_bytes[positions[k]]
            } else {
                UTF8_GAP
            }
        });
        alignment.append_column(&column, &middle_column(&column))?;
    }

    Ok(alignment)
}

pub fn triple_align_all(
    seqs: &[Sequence],
    scoring: &impl Scoring,
    backtracer: &mut Backtracer,
) -> Result<Vec<Alignment>> {
    let grid = triple_fill(seqs, scoring)?;
    let seqs = check_sequences(seqs)?;
    let score = grid.score();

    let traces = backtracer.trace_paths(
        seqs.map(|seq| seq.length),
        |cell| cell.iter().all(|&c| c == 0),
        |&cell| {
            let current = grid.get_at(cell);
            candidates(&grid, &seqs, scoring, cell)
                .into_iter()
                .filter(|&(score, _)| score == current)
                .map(|(_, step)| {
                    let offsets = step.offsets();
                    (std::array::from_fn(|k| cell[k] - offsets[k]), step)
                })
                .collect()
        },
    )?;

    debug!(
        "triple: score {score}, {} optimal alignment(s), {} tie(s)",
        traces.len(),
        backtracer.ties()
    );

    traces
        .iter()
        .map(|trace| Ok(trace_to_alignment(trace, &seqs)?.with_score(score)))
        .collect()
}

pub fn triple_align(seqs: &[Sequence], scoring: &impl Scoring, seed: u64) -> Result<Alignment> {
    let mut alignments = triple_align_all(seqs, scoring, &mut Backtracer::random(seed))?;
    Ok(alignments.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{nw_score, sum_of_pairs, MatchMismatch, ScoreMatrix};
    use assert2::{check, let_assert};

    fn seqs(texts: &[&str]) -> Vec<Sequence> {
        texts
            .iter()
            .enumerate()
            .map(|(idx, text)| {
                Sequence::from_utf8(text.as_bytes())
                    .unwrap()
                    .named(format!("s{idx}"))
            })
            .collect()
    }

    fn simple() -> MatchMismatch {
        MatchMismatch {
            matches: 2.0,
            mismatch: -1.0,
            gap: -4.0,
        }
    }

    #[test]
    fn test_identical_sequences() -> anyhow::Result<()> {
        let input = seqs(&["AAA", "AAA", "AAA"]);
        check!(triple_score(&input, &simple())? == 18.0);

        let alignments = triple_align_all(&input, &simple(), &mut Backtracer::exhaustive())?;
        check!(alignments.len() == 1);
        check!(alignments[0].rows.iter().all(|r| r == "AAA"));
        check!(alignments[0].middle == vec!["|||".to_string(), "|||".to_string()]);
        check!(alignments[0].names[2] == "s2");
        Ok(())
    }

    #[test]
    fn test_column_moves() -> anyhow::Result<()> {
        // A/A/A then C/_/C: 3 matches, then one match and two residue-gap pairs
        let input = seqs(&["AC", "A", "AC"]);
        check!(triple_score(&input, &simple())? == 6.0 + 2.0 - 8.0);

        let alignments = triple_align_all(&input, &simple(), &mut Backtracer::exhaustive())?;
        check!(alignments.len() == 1);
        check!(alignments[0].rows == vec!["AC".to_string(), "A_".to_string(), "AC".to_string()]);
        check!(alignments[0].middle == vec!["| ".to_string(), "| ".to_string()]);
        Ok(())
    }

    #[test]
    fn test_sum_of_pairs_matches_score() -> anyhow::Result<()> {
        let scoring = ScoreMatrix::pam250(-4.0);
        let input = seqs(&["HEAGAWGHEE", "PAWHEAE", "HEAWGHE"]);

        let score = triple_score(&input, &scoring)?;
        let mut backtracer = Backtracer::exhaustive();
        let alignments = triple_align_all(&input, &scoring, &mut backtracer)?;

        check!(!alignments.is_empty());
        for alignment in &alignments {
            check!(alignment.length().is_ok());
            check!(sum_of_pairs(alignment, &scoring)? == score);
        }

        // the optimum is never worse than the sum of the optimal pairwise scores
        let pairwise = nw_score(&input[0], &input[1], &scoring)?
            + nw_score(&input[0], &input[2], &scoring)?
            + nw_score(&input[1], &input[2], &scoring)?;
        check!(score <= pairwise);

        let seeded = triple_align(&input, &scoring, 11)?;
        check!(sum_of_pairs(&seeded, &scoring)? == score);
        Ok(())
    }

    #[test]
    fn test_configuration_errors() {
        let_assert!(Err(err) = triple_score(&seqs(&["A", "C"]), &simple()));
        let_assert!(Some(err) = err.downcast_ref::<SequenceCountError>());
        check!(err.count == 2);

        let_assert!(Err(err) = triple_score(&seqs(&["A", "C", "D", "E"]), &simple()));
        check!(err.downcast_ref::<SequenceCountError>().is_some());

        let_assert!(Err(err) = triple_score(&seqs(&["A", "", "D"]), &simple()));
        let_assert!(Some(err) = err.downcast_ref::<EmptySequenceError>());
        check!(err.index == 1);
        check!(err.name == "s1");
    }

    #[test]
    fn test_step_display() {
        check!(TripleStep::MOVES[0].to_string() == "XXX");
        check!(TripleStep::MOVES[4].to_string() == "X--");
    }
}

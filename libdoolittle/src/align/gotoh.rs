use crate::align::needleman_wunsch::{trace_to_alignment, PairStep, PairTrace};
use crate::align::structs::{Backtracer, DpGrid2};
use crate::align::Scoring;
use crate::max_f64;
use crate::structs::{Alignment, Sequence};
use anyhow::Result;
use log::debug;
use serde::Serialize;

/// Affine gap costs: a gap run of length `L` scores `open + L * extend`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AffineGap {
    pub open: f64,
    pub extend: f64,
}

impl Default for AffineGap {
    fn default() -> Self {
        Self {
            open: -4.0,
            extend: -1.0,
        }
    }
}

impl AffineGap {
    pub fn new(open: f64, extend: f64) -> Self {
        Self { open, extend }
    }

    /// The cost of the first position of a gap run.
    fn first(&self) -> f64 {
        self.open + self.extend
    }
}

/// The three grids of the affine recurrence.
///
/// `match_grid` holds the best score of any alignment of the prefixes;
/// `up_grid` the best one that ends in a gap in the second sequence;
/// `left_grid` the best one that ends in a gap in the first sequence.
#[derive(Clone, Debug)]
pub struct GotohGrids {
    pub match_grid: DpGrid2,
    pub up_grid: DpGrid2,
    pub left_grid: DpGrid2,
}

impl GotohGrids {
    pub fn score(&self) -> f64 {
        self.match_grid.score()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GotohState {
    Match,
    Up,
    Left,
}

pub fn gotoh_fill(
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    gap: &AffineGap,
) -> Result<GotohGrids> {
    let lengths = [seq_1.length, seq_2.length];
    let mut match_grid = DpGrid2::for_lengths(lengths)?;
    let mut up_grid = DpGrid2::new_unset(match_grid.shape())?;
    let mut left_grid = DpGrid2::new_unset(match_grid.shape())?;

    for seq_1_idx in 0..=seq_1.length {
        for seq_2_idx in 0..=seq_2.length {
            if seq_1_idx == 0 && seq_2_idx == 0 {
                continue;
            }
            let (i, j) = (seq_1_idx as isize, seq_2_idx as isize);

            let up = if seq_1_idx > 0 {
                max_f64!(
                    match_grid.get([i - 1, j]) + gap.first(),
                    up_grid.get([i - 1, j]) + gap.extend
                )
            } else {
                -f64::INFINITY
            };

            let left = if seq_2_idx > 0 {
                max_f64!(
                    match_grid.get([i, j - 1]) + gap.first(),
                    left_grid.get([i, j - 1]) + gap.extend
                )
            } else {
                -f64::INFINITY
            };

            let diagonal = if seq_1_idx > 0 && seq_2_idx > 0 {
                match_grid.get([i - 1, j - 1])
                    + scoring.pair(
                        seq_1.digital_bytes[seq_1_idx],
                        seq_2.digital_bytes[seq_2_idx],
                    )
            } else {
                -f64::INFINITY
            };

            up_grid.set([i, j], up)?;
            left_grid.set([i, j], left)?;
            match_grid.set([i, j], max_f64!(diagonal, up, left))?;
        }
    }

    Ok(GotohGrids {
        match_grid,
        up_grid,
        left_grid,
    })
}

pub fn gotoh_score(
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    gap: &AffineGap,
) -> Result<f64> {
    Ok(gotoh_fill(seq_1, seq_2, scoring, gap)?.score())
}

type GotohCell = (GotohState, usize, usize);

/// The (cell, step) pairs that reproduce the score of `cell`.
fn predecessors(
    grids: &GotohGrids,
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    gap: &AffineGap,
    cell: &GotohCell,
) -> Vec<(GotohCell, PairStep)> {
    let &(state, i, j) = cell;
    let mut predecessors = vec![];

    // a cell of the up/left grids is entered by opening or by extending a gap
    let gap_moves = |predecessors: &mut Vec<(GotohCell, PairStep)>, gap_state: GotohState| {
        let (grid, step, prev_i, prev_j) = match gap_state {
            GotohState::Up if i > 0 => (&grids.up_grid, PairStep::Up, i - 1, j),
            GotohState::Left if j > 0 => (&grids.left_grid, PairStep::Left, i, j - 1),
            _ => return,
        };
        let current = grid.get_at([i, j]);

        if grids.match_grid.get_at([prev_i, prev_j]) + gap.first() == current {
            predecessors.push(((GotohState::Match, prev_i, prev_j), step));
        }
        if grid.get_at([prev_i, prev_j]) + gap.extend == current {
            predecessors.push(((gap_state, prev_i, prev_j), step));
        }
    };

    match state {
        GotohState::Match => {
            let current = grids.match_grid.get_at([i, j]);

            if i > 0 && j > 0 {
                let pair = scoring.pair(seq_1.digital_bytes[i], seq_2.digital_bytes[j]);
                if grids.match_grid.get_at([i - 1, j - 1]) + pair == current {
                    predecessors.push(((GotohState::Match, i - 1, j - 1), PairStep::Diagonal));
                }
            }
            if grids.up_grid.get_at([i, j]) == current {
                gap_moves(&mut predecessors, GotohState::Up);
            }
            if grids.left_grid.get_at([i, j]) == current {
                gap_moves(&mut predecessors, GotohState::Left);
            }
        }
        gap_state => gap_moves(&mut predecessors, gap_state),
    }

    predecessors
}

fn gotoh_backtrack(
    grids: &GotohGrids,
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    gap: &AffineGap,
    backtracer: &mut Backtracer,
) -> Result<Vec<PairTrace>> {
    let traces = backtracer.trace_paths(
        (GotohState::Match, seq_1.length, seq_2.length),
        |&(state, i, j)| state == GotohState::Match && i == 0 && j == 0,
        |cell| predecessors(grids, seq_1, seq_2, scoring, gap, cell),
    )?;

    // with a zero open cost, reopening a gap ties with extending it,
    // which yields the same steps through different states
    let mut unique: Vec<PairTrace> = Vec::with_capacity(traces.len());
    for trace in traces {
        if !unique.contains(&trace) {
            unique.push(trace);
        }
    }

    Ok(unique)
}

pub fn gotoh_align_all(
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    gap: &AffineGap,
    backtracer: &mut Backtracer,
) -> Result<Vec<Alignment>> {
    let grids = gotoh_fill(seq_1, seq_2, scoring, gap)?;
    let score = grids.score();
    let traces = gotoh_backtrack(&grids, seq_1, seq_2, scoring, gap, backtracer)?;

    debug!(
        "gotoh: score {score}, {} optimal alignment(s), {} tie(s)",
        traces.len(),
        backtracer.ties()
    );

    traces
        .iter()
        .map(|trace| Ok(trace_to_alignment(trace, seq_1, seq_2)?.with_score(score)))
        .collect()
}

pub fn gotoh_align(
    seq_1: &Sequence,
    seq_2: &Sequence,
    scoring: &impl Scoring,
    gap: &AffineGap,
    seed: u64,
) -> Result<Alignment> {
    let mut alignments =
        gotoh_align_all(seq_1, seq_2, scoring, gap, &mut Backtracer::random(seed))?;
    Ok(alignments.swap_remove(0))
}

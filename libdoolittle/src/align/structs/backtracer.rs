use std::fmt::Debug;

use anyhow::Result;
use log::trace;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("no predecessor reproduces the score of DP cell {cell}")]
pub struct BacktraceError {
    pub cell: String,
}

/// How ties between equally good predecessors are resolved during backtracking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum BacktraceMode {
    /// Follow every tied predecessor and report every optimal path.
    ///
    /// The number of optimal paths can grow exponentially with the
    /// number of ties, so this can be very slow on repetitive input.
    #[default]
    Exhaustive,
    /// Follow one tied predecessor chosen uniformly at random.
    Random { seed: u64 },
}

/// Resolves ties while walking back through a filled DP grid.
pub struct Backtracer {
    mode: BacktraceMode,
    rng: Pcg64,
    ties: usize,
}

impl Backtracer {
    pub fn new(mode: BacktraceMode) -> Self {
        let seed = match mode {
            BacktraceMode::Exhaustive => 0,
            BacktraceMode::Random { seed } => seed,
        };

        Self {
            mode,
            rng: Pcg64::seed_from_u64(seed),
            ties: 0,
        }
    }

    pub fn exhaustive() -> Self {
        Self::new(BacktraceMode::Exhaustive)
    }

    pub fn random(seed: u64) -> Self {
        Self::new(BacktraceMode::Random { seed })
    }

    pub fn mode(&self) -> BacktraceMode {
        self.mode
    }

    /// The number of cells where more than one predecessor was optimal.
    pub fn ties(&self) -> usize {
        self.ties
    }

    /// Narrows a list of tied candidates down to the ones that will be followed.
    pub fn select<T: Debug>(&mut self, mut candidates: Vec<T>) -> Vec<T> {
        if candidates.len() < 2 {
            return candidates;
        }

        self.ties += 1;
        trace!("tie between {} predecessors: {:?}", candidates.len(), candidates);

        match self.mode {
            BacktraceMode::Exhaustive => candidates,
            BacktraceMode::Random { .. } => {
                let pick = self.rng.gen_range(0..candidates.len());
                vec![candidates.swap_remove(pick)]
            }
        }
    }

    /// Walks back from `start` until `is_origin` holds, collecting the steps taken.
    ///
    /// `predecessors` lists every (cell, step) pair that reproduces the score
    /// of the given cell. Each branch extends its own copy of the path, and the
    /// finished paths are returned in forward order.
    pub fn trace_paths<S, T, O, P>(
        &mut self,
        start: S,
        is_origin: O,
        mut predecessors: P,
    ) -> Result<Vec<Vec<T>>>
    where
        S: Debug,
        T: Clone + Debug,
        O: Fn(&S) -> bool,
        P: FnMut(&S) -> Vec<(S, T)>,
    {
        let mut paths: Vec<Vec<T>> = vec![];
        let mut stack: Vec<(S, Vec<T>)> = vec![(start, vec![])];

        while let Some((cell, path)) = stack.pop() {
            if is_origin(&cell) {
                let mut path = path;
                path.reverse();
                paths.push(path);
                continue;
            }

            let candidates = predecessors(&cell);
            if candidates.is_empty() {
                return Err(BacktraceError {
                    cell: format!("{cell:?}"),
                }
                .into());
            }

            // pushed in reverse so that the first candidate is explored first
            for (next, step) in self.select(candidates).into_iter().rev() {
                let mut branch = path.clone();
                branch.push(step);
                stack.push((next, branch));
            }
        }

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    // a tiny lattice: from n, step by 1 or by 2 down to 0
    fn steps(n: &usize) -> Vec<(usize, usize)> {
        [1usize, 2]
            .into_iter()
            .filter(|&s| s <= *n)
            .map(|s| (n - s, s))
            .collect()
    }

    #[test]
    fn test_exhaustive_paths() -> anyhow::Result<()> {
        let mut backtracer = Backtracer::exhaustive();
        let paths = backtracer.trace_paths(4usize, |&n| n == 0, steps)?;

        // the compositions of 4 into 1s and 2s
        check!(paths.len() == 5);
        check!(paths[0] == vec![1, 1, 1, 1]);
        check!(paths.iter().all(|p| p.iter().sum::<usize>() == 4));
        check!(backtracer.ties() == 4);
        Ok(())
    }

    #[test]
    fn test_random_paths_are_reproducible() -> anyhow::Result<()> {
        let first = Backtracer::random(7).trace_paths(10usize, |&n| n == 0, steps)?;
        let second = Backtracer::random(7).trace_paths(10usize, |&n| n == 0, steps)?;

        check!(first.len() == 1);
        check!(first == second);
        check!(first[0].iter().sum::<usize>() == 10);
        Ok(())
    }

    #[test]
    fn test_dead_end_is_an_error() {
        let mut backtracer = Backtracer::exhaustive();
        let result = backtracer.trace_paths(3usize, |&n| n == 0, |_: &usize| Vec::<(usize, usize)>::new());
        let_assert!(Err(err) = result);
        check!(err.downcast_ref::<BacktraceError>().is_some());
    }

    #[test]
    fn test_select() {
        let mut backtracer = Backtracer::random(1);
        check!(backtracer.select(vec![3]) == vec![3]);
        check!(backtracer.ties() == 0);

        let picked = backtracer.select(vec![1, 2, 3]);
        check!(picked.len() == 1);
        check!(backtracer.ties() == 1);
        check!(backtracer.mode() == BacktraceMode::Random { seed: 1 });
    }
}

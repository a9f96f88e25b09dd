use crate::align::structs::Backtracer;
use crate::align::{nw_trace_with, sum_of_pairs, Scoring};
use crate::cluster::{build_guide_tree, Cluster, GuideTree, LeafDistances, Linkage};
use crate::structs::{Alignment, Sequence, TraceSide};
use anyhow::Result;
use log::debug;

/// A guide tree and the multiple alignment it produced.
#[derive(Clone, Debug)]
pub struct ProgressiveResult {
    pub tree: GuideTree,
    pub alignment: Alignment,
}

/// Picks the closest pair of leaves drawn one from each side.
///
/// Left leaves are scanned in the outer loop; only a strictly smaller
/// distance replaces the first pair found.
fn representative_pair(left: &Cluster, right: &Cluster, distances: &LeafDistances) -> (usize, usize) {
    let left_leaves = left.leaf_indices();
    let right_leaves = right.leaf_indices();

    let mut best = (left_leaves[0], right_leaves[0]);
    let mut min_distance = distances.get(best.0, best.1);

    for &left_idx in &left_leaves {
        for &right_idx in &right_leaves {
            let distance = distances.get(left_idx, right_idx);
            if distance < min_distance {
                min_distance = distance;
                best = (left_idx, right_idx);
            }
        }
    }

    best
}

fn merge(
    cluster: &Cluster,
    distances: &LeafDistances,
    scoring: &impl Scoring,
    backtracer: &mut Backtracer,
    current: &mut [Sequence],
) -> Result<()> {
    let Cluster::Node { left, right, .. } = cluster else {
        return Ok(());
    };

    merge(left, distances, scoring, backtracer, current)?;
    merge(right, distances, scoring, backtracer, current)?;

    let (left_rep, right_rep) = representative_pair(left, right, distances);
    debug!("aligning {left} with {right} through sequences {left_rep} and {right_rep}");

    let trace = nw_trace_with(&current[left_rep], &current[right_rep], scoring, backtracer)?;

    // every sequence on a side already shares the representative's gap skeleton
    for idx in left.leaf_indices() {
        current[idx] = current[idx].project(&trace, TraceSide::First);
    }
    for idx in right.leaf_indices() {
        current[idx] = current[idx].project(&trace, TraceSide::Second);
    }

    Ok(())
}

/// Merges the leaves of a guide tree into one multiple alignment.
///
/// Each internal node aligns the closest pair of leaves across its two
/// children and inserts the resulting gap columns into every sequence
/// of the corresponding child. The rows come out in input order and the
/// alignment carries its sum-of-pairs score.
pub fn progressive_align(tree: &GuideTree, scoring: &impl Scoring, seed: u64) -> Result<Alignment> {
    let mut leaves = tree.root.leaves();
    leaves.sort_by_key(|(index, _)| *index);
    // leaf indices are the input positions 0..k
    let mut current: Vec<Sequence> = leaves.into_iter().map(|(_, seq)| seq.clone()).collect();

    let mut backtracer = Backtracer::random(seed);
    merge(
        &tree.root,
        &tree.leaf_distances,
        scoring,
        &mut backtracer,
        &mut current,
    )?;

    let mut alignment = Alignment::new(current.len())?;
    for (index, sequence) in current.iter().enumerate() {
        alignment.set_row(index, &sequence.name, sequence.as_str())?;
    }
    alignment.annotate()?;

    let score = sum_of_pairs(&alignment, scoring)?;
    debug!("progressive alignment: sum-of-pairs score {score}");

    Ok(alignment.with_score(score))
}

/// Builds a guide tree and aligns the sequences along it.
pub fn feng_doolittle(
    seqs: &[Sequence],
    scoring: &impl Scoring,
    linkage: Linkage,
    seed: u64,
) -> Result<ProgressiveResult> {
    let tree = build_guide_tree(seqs, scoring, linkage)?;
    let alignment = progressive_align(&tree, scoring, seed)?;
    Ok(ProgressiveResult { tree, alignment })
}

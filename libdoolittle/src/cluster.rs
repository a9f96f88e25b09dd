use std::fmt::{Display, Formatter};

use crate::align::{nw_score, Scoring};
use crate::structs::alignment::TooFewSequencesError;
use crate::structs::Sequence;
use crate::util::weighted_mean;
use anyhow::Result;
use log::debug;
use serde::Serialize;

/// How the distance to a merged cluster combines the distances to its two children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Linkage {
    /// UPGMA: the simple average of the two child distances
    #[default]
    Unweighted,
    /// WPGMA: the child distances weighted by the number of leaves below each child
    Weighted,
}

impl Display for Linkage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Linkage::Unweighted => write!(f, "UPGMA"),
            Linkage::Weighted => write!(f, "WPGMA"),
        }
    }
}

/// The distances between every pair of input sequences: the negated
/// optimal pairwise alignment score.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafDistances {
    distances: Vec<Vec<f64>>,
}

impl LeafDistances {
    pub fn new(seqs: &[Sequence], scoring: &impl Scoring) -> Result<Self> {
        let mut distances = vec![vec![0.0; seqs.len()]; seqs.len()];

        for i in 0..seqs.len() {
            for j in (i + 1)..seqs.len() {
                let distance = -nw_score(&seqs[i], &seqs[j], scoring)?;
                distances[i][j] = distance;
                distances[j][i] = distance;
            }
        }

        Ok(Self { distances })
    }

    /// Wraps a precomputed square matrix of distances.
    pub fn from_matrix(distances: Vec<Vec<f64>>) -> Self {
        Self { distances }
    }

    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.distances[a][b]
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// A node of a guide tree.
///
/// A leaf holds one input sequence along with its position in the input;
/// an internal node owns its two children and the distance at which they
/// were merged.
#[derive(Clone, Debug, PartialEq)]
pub enum Cluster {
    Leaf {
        index: usize,
        sequence: Sequence,
    },
    Node {
        left: Box<Cluster>,
        right: Box<Cluster>,
        distance: f64,
        size: usize,
    },
}

impl Cluster {
    pub fn leaf(index: usize, sequence: Sequence) -> Self {
        Cluster::Leaf { index, sequence }
    }

    pub fn merge(left: Cluster, right: Cluster, distance: f64) -> Self {
        let size = left.size() + right.size();
        Cluster::Node {
            left: Box::new(left),
            right: Box::new(right),
            distance,
            size,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Cluster::Leaf { .. })
    }

    /// The number of leaves below (or at) this cluster.
    pub fn size(&self) -> usize {
        match self {
            Cluster::Leaf { .. } => 1,
            Cluster::Node { size, .. } => *size,
        }
    }

    /// The merge distance of an internal node; leaves have none.
    pub fn distance(&self) -> Option<f64> {
        match self {
            Cluster::Leaf { .. } => None,
            Cluster::Node { distance, .. } => Some(*distance),
        }
    }

    /// The number of internal nodes.
    pub fn num_nodes(&self) -> usize {
        match self {
            Cluster::Leaf { .. } => 0,
            Cluster::Node { left, right, .. } => 1 + left.num_nodes() + right.num_nodes(),
        }
    }

    /// The input indices of the leaves, left to right.
    pub fn leaf_indices(&self) -> Vec<usize> {
        self.leaves().iter().map(|(index, _)| *index).collect()
    }

    /// The leaves, left to right.
    pub fn leaves(&self) -> Vec<(usize, &Sequence)> {
        let mut leaves = Vec::with_capacity(self.size());
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<(usize, &'a Sequence)>) {
        match self {
            Cluster::Leaf { index, sequence } => leaves.push((*index, sequence)),
            Cluster::Node { left, right, .. } => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            }
        }
    }
}

impl Display for Cluster {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cluster::Leaf { index, .. } => write!(f, "{index}"),
            Cluster::Node { left, right, .. } => write!(f, "({left},{right})"),
        }
    }
}

/// The linkage distance between two clusters.
///
/// Two leaves are looked up directly. Otherwise an internal side is split
/// into its children and the two child distances are combined according
/// to the linkage; the left argument is split first.
pub fn cluster_distance(
    a: &Cluster,
    b: &Cluster,
    leaf_distances: &LeafDistances,
    linkage: Linkage,
) -> f64 {
    let (left, right, other) = match (a, b) {
        (Cluster::Leaf { index: i, .. }, Cluster::Leaf { index: j, .. }) => {
            return leaf_distances.get(*i, *j)
        }
        (Cluster::Node { left, right, .. }, other) | (other, Cluster::Node { left, right, .. }) => {
            (left, right, other)
        }
    };

    let left_distance = cluster_distance(left, other, leaf_distances, linkage);
    let right_distance = cluster_distance(right, other, leaf_distances, linkage);

    match linkage {
        Linkage::Unweighted => (left_distance + right_distance) / 2.0,
        Linkage::Weighted => {
            weighted_mean(left_distance, left.size(), right_distance, right.size())
        }
    }
}

/// A guide tree together with the leaf distances it was built from.
#[derive(Clone, Debug)]
pub struct GuideTree {
    pub root: Cluster,
    pub linkage: Linkage,
    pub leaf_distances: LeafDistances,
}

impl Display for GuideTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root)
    }
}

/// Agglomerates the sequences into a binary guide tree.
///
/// Each round merges the closest pair of current clusters. Pairs are
/// scanned as (i, j) with i < j in cluster order and only a strictly
/// smaller distance replaces the running minimum. The merged cluster takes
/// the place of the first of the pair and the second is removed.
pub fn build_guide_tree(
    seqs: &[Sequence],
    scoring: &impl Scoring,
    linkage: Linkage,
) -> Result<GuideTree> {
    if seqs.len() < 2 {
        return Err(TooFewSequencesError { count: seqs.len() }.into());
    }

    let leaf_distances = LeafDistances::new(seqs, scoring)?;

    let mut clusters: Vec<Cluster> = seqs
        .iter()
        .enumerate()
        .map(|(index, seq)| Cluster::leaf(index, seq.clone()))
        .collect();

    while clusters.len() > 1 {
        let (mut min_i, mut min_j) = (0, 1);
        let mut min_distance = cluster_distance(&clusters[0], &clusters[1], &leaf_distances, linkage);

        for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                let distance = cluster_distance(&clusters[i], &clusters[j], &leaf_distances, linkage);
                if distance < min_distance {
                    min_distance = distance;
                    min_i = i;
                    min_j = j;
                }
            }
        }

        debug!(
            "{linkage}: merging {} and {} at distance {min_distance}",
            clusters[min_i], clusters[min_j]
        );

        // min_j > min_i, so removing it leaves min_i in place
        let right = clusters.remove(min_j);
        let left = clusters.remove(min_i);
        clusters.insert(min_i, Cluster::merge(left, right, min_distance));
    }

    Ok(GuideTree {
        root: clusters.swap_remove(0),
        linkage,
        leaf_distances,
    })
}

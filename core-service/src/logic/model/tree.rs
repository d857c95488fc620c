//! Isolation Tree
//!
//! Randomized binary partitioning of a subsample. Anomalies are easier to
//! isolate and thus end up on shorter root-to-leaf paths.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Euler–Mascheroni constant
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

// ============================================================================
// PATH LENGTH ESTIMATES
// ============================================================================

/// Average unsuccessful-search path length in a BST of `n` points
fn harmonic_estimate(n: f64) -> f64 {
    2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
}

/// Path length still owed by a leaf that stopped with `size` points
pub fn leaf_adjustment(size: usize) -> f64 {
    if size > 1 {
        harmonic_estimate(size as f64)
    } else {
        0.0
    }
}

/// c(psi): normalizer for average path lengths
pub fn normalization_factor(psi: f64) -> f64 {
    if psi <= 1.0 {
        0.0
    } else if psi <= 2.0 {
        1.0
    } else {
        harmonic_estimate(psi)
    }
}

/// ceil(log2(psi)); 0 for psi <= 1
pub fn height_limit(psi: usize) -> usize {
    (usize::BITS - psi.saturating_sub(1).leading_zeros()) as usize
}

// ============================================================================
// TREE
// ============================================================================

/// Node in an isolation tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Points with `value < threshold` go left, the rest go right
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Training points that reached this node and the depth it sits at
    Leaf { size: usize, depth: usize },
}

/// A single isolation tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationTree {
    /// Subsample size this tree was grown from
    psi: usize,
    root: Node,
}

impl IsolationTree {
    /// Grow a tree over `data[i]` for every `i` in `indices`
    pub fn grow<R: Rng + ?Sized>(
        data: &[&[f64]],
        indices: Vec<usize>,
        num_features: usize,
        rng: &mut R,
    ) -> Self {
        let psi = indices.len();
        let limit = height_limit(psi);
        let root = Self::grow_node(data, &indices, num_features, 0, limit, rng);
        Self { psi, root }
    }

    fn grow_node<R: Rng + ?Sized>(
        data: &[&[f64]],
        indices: &[usize],
        num_features: usize,
        depth: usize,
        limit: usize,
        rng: &mut R,
    ) -> Node {
        let leaf = Node::Leaf {
            size: indices.len(),
            depth,
        };

        if indices.len() <= 1 || depth >= limit {
            return leaf;
        }

        // Only features that still vary at this node can split it
        let candidates: Vec<(usize, f64, f64)> = (0..num_features)
            .filter_map(|feature| {
                let (lo, hi) = indices.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                    let v = data[i][feature];
                    (lo.min(v), hi.max(v))
                });
                (hi > lo).then_some((feature, lo, hi))
            })
            .collect();

        // Every point identical
        let Some(&(feature, lo, hi)) = candidates.choose(rng) else {
            return leaf;
        };

        let threshold = rng.gen_range(lo..hi);
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| data[i][feature] < threshold);

        Node::Split {
            feature,
            threshold,
            left: Box::new(Self::grow_node(data, &left, num_features, depth + 1, limit, rng)),
            right: Box::new(Self::grow_node(data, &right, num_features, depth + 1, limit, rng)),
        }
    }

    pub fn psi(&self) -> usize {
        self.psi
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Edges to the leaf reached by `sample` plus that leaf's adjustment.
    /// `None` when a split refers to a dimension the sample lacks.
    pub fn path_length(&self, sample: &[f64]) -> Option<f64> {
        let mut node = &self.root;
        let mut depth = 0usize;

        loop {
            match node {
                Node::Leaf { size, .. } => return Some(depth as f64 + leaf_adjustment(*size)),
                Node::Split { feature, threshold, left, right } => {
                    let value = *sample.get(*feature)?;
                    node = if value < *threshold { left } else { right };
                    depth += 1;
                }
            }
        }
    }

    /// Structural check used when loading persisted trees
    pub fn validate(&self, num_features: usize) -> Result<(), String> {
        if self.psi == 0 {
            return Err("tree has psi = 0".into());
        }

        let limit = height_limit(self.psi);
        let mut reached = 0usize;
        Self::validate_node(&self.root, 0, limit, num_features, &mut reached)?;

        if reached != self.psi {
            return Err(format!("leaf sizes sum to {}, expected psi {}", reached, self.psi));
        }
        Ok(())
    }

    fn validate_node(
        node: &Node,
        depth: usize,
        limit: usize,
        num_features: usize,
        reached: &mut usize,
    ) -> Result<(), String> {
        match node {
            Node::Leaf { size, depth: stored } => {
                if *stored != depth {
                    return Err(format!("leaf records depth {} but sits at depth {}", stored, depth));
                }
                if depth > limit {
                    return Err(format!("leaf depth {} exceeds height limit {}", depth, limit));
                }
                *reached = reached
                    .checked_add(*size)
                    .ok_or_else(|| "leaf size overflow".to_string())?;
                Ok(())
            }
            Node::Split { feature, threshold, left, right } => {
                if *feature >= num_features {
                    return Err(format!("split feature {} out of bounds ({})", feature, num_features));
                }
                if !threshold.is_finite() {
                    return Err("split threshold is not finite".into());
                }
                if depth >= limit {
                    return Err(format!("split at depth {} reaches past height limit {}", depth, limit));
                }
                Self::validate_node(left, depth + 1, limit, num_features, reached)?;
                Self::validate_node(right, depth + 1, limit, num_features, reached)
            }
        }
    }
}

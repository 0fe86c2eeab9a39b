//! SKATER: spatially constrained regionalization by spanning-tree pruning.
//!
//! Given a contiguity lattice whose units carry feature vectors, SKATER
//! builds a minimum spanning tree over dissimilarity-weighted adjacencies and
//! then removes `K - 1` tree edges, one at a time, each time picking the edge
//! whose removal most reduces the total within-region sum of squared
//! deviations (SSD). Because every region is a connected subtree of the
//! contiguity graph, spatial contiguity holds by construction.
//!
//! The pruning loop is sequential (each cut changes the forest) but the
//! per-edge split scoring inside an iteration is independent and runs on a
//! rayon thread pool.
//!
//! # Example
//!
//! ```ignore
//! use regio_algo::{skater, SkaterConfig};
//!
//! let partition = skater(&lattice, &SkaterConfig::new(5).with_min_size(10))?;
//! for region in &partition.regions {
//!     println!("region {}: {} units, ssd {:.2}", region.label, region.units.len(), region.ssd);
//! }
//! ```

use crate::cost::{weighted_edges, CostEdge, Dissimilarity};
use crate::mst::minimum_spanning_tree;
use rayon::prelude::*;
use regio_core::{Lattice, RegioError, UnitId};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Error type for regionalization.
#[derive(Debug, Error)]
pub enum RegionalizeError {
    /// A unit has no adjacency edges; no spanning tree can include it
    #[error("Unit '{0}' has no neighbors; drop it or use a connected adjacency rule")]
    IsolatedUnit(String),

    /// The lattice has more than one connected component
    #[error("Lattice is disconnected; found {0} islands, run per island")]
    Disconnected(usize),

    /// Requested number of groups is zero
    #[error("Invalid group count: {0}")]
    InvalidGroupCount(usize),

    /// Requested minimum group size is zero
    #[error("Invalid minimum group size: {0}")]
    InvalidMinSize(usize),

    /// Units carry no features (or there are no units at all)
    #[error("Empty feature matrix")]
    EmptyFeatures,

    /// A unit's feature vector length disagrees with the rest
    #[error("Unit '{0}' has {1} features, expected {2}")]
    RaggedFeatures(String, usize, usize),

    /// A unit's feature vector contains NaN or infinity
    #[error("Unit '{0}' has non-finite feature values")]
    NonFinite(String),

    /// The (groups, min_size) request cannot be satisfied for this unit count
    #[error("Cannot split {units} units into {groups} groups of at least {min_size}")]
    Infeasible {
        units: usize,
        groups: usize,
        min_size: usize,
    },
}

impl From<RegionalizeError> for RegioError {
    fn from(err: RegionalizeError) -> Self {
        RegioError::Algorithm(err.to_string())
    }
}

/// Configuration for a SKATER run.
#[derive(Debug, Clone, Serialize)]
pub struct SkaterConfig {
    /// Number of regions to produce (K). `1` is the identity partition.
    pub num_groups: usize,
    /// Minimum units per region
    pub min_size: usize,
    /// Dissimilarity metric for edge costs
    pub metric: Dissimilarity,
}

impl SkaterConfig {
    pub fn new(num_groups: usize) -> Self {
        Self {
            num_groups,
            min_size: 1,
            metric: Dissimilarity::Euclidean,
        }
    }

    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_metric(mut self, metric: Dissimilarity) -> Self {
        self.metric = metric;
        self
    }
}

/// One region of the final partition.
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    /// Region label (0-based, in order of first unit appearance)
    pub label: usize,
    /// Member units, in node order
    pub units: Vec<UnitId>,
    /// Within-region sum of squared deviations from the region mean
    pub ssd: f64,
}

/// A strict partition of the lattice into contiguous regions.
#[derive(Debug, Clone, Serialize)]
pub struct Partition {
    /// Region label per unit, indexed by lattice node order
    pub assignments: Vec<usize>,
    /// Region summaries, one per label
    pub regions: Vec<Region>,
}

impl Partition {
    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }

    /// Total within-region SSD across all regions.
    pub fn total_ssd(&self) -> f64 {
        self.regions.iter().map(|r| r.ssd).sum()
    }

    /// Map unit ids to region labels.
    pub fn label_map(&self, lattice: &Lattice) -> HashMap<UnitId, usize> {
        lattice
            .graph
            .node_weights()
            .zip(&self.assignments)
            .map(|(unit, &label)| (unit.id, label))
            .collect()
    }
}

/// Sum of squared deviations from the mean feature vector over `members`.
fn ssd_of(members: &[usize], features: &[&[f64]], dims: usize) -> f64 {
    let n = members.len() as f64;
    if members.is_empty() {
        return 0.0;
    }
    let mut ssd = 0.0;
    for d in 0..dims {
        let mut sum = 0.0;
        let mut sumsq = 0.0;
        for &m in members {
            let v = features[m][d];
            sum += v;
            sumsq += v * v;
        }
        ssd += sumsq - sum * sum / n;
    }
    // Guard against tiny negative values from cancellation
    ssd.max(0.0)
}

/// Collect the subtree reachable from `start` without crossing `banned` edge.
fn collect_side(
    adjacency: &[Vec<(usize, usize)>],
    alive: &[bool],
    start: usize,
    banned: usize,
) -> Vec<usize> {
    let mut visited = vec![false; adjacency.len()];
    let mut stack = vec![start];
    let mut members = Vec::new();
    visited[start] = true;
    while let Some(node) = stack.pop() {
        members.push(node);
        for &(edge, neighbor) in &adjacency[node] {
            if edge == banned || !alive[edge] || visited[neighbor] {
                continue;
            }
            visited[neighbor] = true;
            stack.push(neighbor);
        }
    }
    members
}

/// Result of scoring one candidate cut.
struct CutScore {
    edge: usize,
    reduction: f64,
}

/// Run SKATER on a lattice.
///
/// Validates all parameters before touching the tree; on any error no partial
/// partition is returned. Deterministic: score ties resolve to the lowest
/// MST edge index, and the MST itself breaks cost ties by edge-list order.
pub fn skater(lattice: &Lattice, config: &SkaterConfig) -> Result<Partition, RegionalizeError> {
    let n = lattice.num_units();

    if config.num_groups == 0 {
        return Err(RegionalizeError::InvalidGroupCount(0));
    }
    if config.min_size == 0 {
        return Err(RegionalizeError::InvalidMinSize(0));
    }
    if n == 0 {
        return Err(RegionalizeError::EmptyFeatures);
    }

    let units: Vec<_> = lattice.graph.node_weights().collect();
    let features: Vec<&[f64]> = units.iter().map(|u| u.features.as_slice()).collect();
    let dims = features[0].len();
    if dims == 0 {
        return Err(RegionalizeError::EmptyFeatures);
    }
    for unit in &units {
        if unit.features.len() != dims {
            return Err(RegionalizeError::RaggedFeatures(
                unit.name.clone(),
                unit.features.len(),
                dims,
            ));
        }
        if unit.features.iter().any(|v| !v.is_finite()) {
            return Err(RegionalizeError::NonFinite(unit.name.clone()));
        }
    }

    // Both factors are caller-supplied, so the product can overflow.
    let demand = config.num_groups.checked_mul(config.min_size);
    if demand.map_or(true, |d| d > n) {
        return Err(RegionalizeError::Infeasible {
            units: n,
            groups: config.num_groups,
            min_size: config.min_size,
        });
    }

    let edges = weighted_edges(lattice, config.metric)?;
    let tree = minimum_spanning_tree(n, &edges)?;

    // Working forest: MST adjacency lists plus a liveness flag per tree edge.
    let mut alive = vec![true; tree.len()];
    let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    for (tree_idx, edge) in tree.iter().enumerate() {
        adjacency[edge.source].push((tree_idx, edge.target));
        adjacency[edge.target].push((tree_idx, edge.source));
    }

    for _ in 0..config.num_groups - 1 {
        let scores: Vec<CutScore> = (0..tree.len())
            .into_par_iter()
            .filter(|&e| alive[e])
            .filter_map(|e| {
                let side_a = collect_side(&adjacency, &alive, tree[e].source, e);
                let side_b = collect_side(&adjacency, &alive, tree[e].target, e);
                if side_a.len() < config.min_size || side_b.len() < config.min_size {
                    return None;
                }
                let mut whole = side_a.clone();
                whole.extend_from_slice(&side_b);
                let reduction = ssd_of(&whole, &features, dims)
                    - ssd_of(&side_a, &features, dims)
                    - ssd_of(&side_b, &features, dims);
                Some(CutScore { edge: e, reduction })
            })
            .collect();

        // Sequential arg-max so the tie-break stays deterministic regardless
        // of rayon scheduling: strictly-greater wins, lowest edge index kept.
        let mut best: Option<&CutScore> = None;
        for score in &scores {
            let better = match best {
                None => true,
                Some(b) => {
                    score.reduction > b.reduction
                        || (score.reduction == b.reduction && score.edge < b.edge)
                }
            };
            if better {
                best = Some(score);
            }
        }

        match best {
            Some(cut) => alive[cut.edge] = false,
            None => {
                return Err(RegionalizeError::Infeasible {
                    units: n,
                    groups: config.num_groups,
                    min_size: config.min_size,
                })
            }
        }
    }

    Ok(label_forest(lattice, &tree, &alive, &features, dims))
}

/// Label the connected components of the pruned forest 0..K-1 in order of
/// first unit appearance and summarize each region.
fn label_forest(
    lattice: &Lattice,
    tree: &[CostEdge],
    alive: &[bool],
    features: &[&[f64]],
    dims: usize,
) -> Partition {
    let n = lattice.num_units();
    let ids: Vec<UnitId> = lattice.graph.node_weights().map(|u| u.id).collect();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (tree_idx, edge) in tree.iter().enumerate() {
        if alive[tree_idx] {
            adjacency[edge.source].push(edge.target);
            adjacency[edge.target].push(edge.source);
        }
    }

    let mut assignments = vec![usize::MAX; n];
    let mut regions = Vec::new();
    for start in 0..n {
        if assignments[start] != usize::MAX {
            continue;
        }
        let label = regions.len();
        let mut stack = vec![start];
        let mut members = Vec::new();
        assignments[start] = label;
        while let Some(node) = stack.pop() {
            members.push(node);
            for &neighbor in &adjacency[node] {
                if assignments[neighbor] == usize::MAX {
                    assignments[neighbor] = label;
                    stack.push(neighbor);
                }
            }
        }
        members.sort_unstable();
        let ssd = ssd_of(&members, features, dims);
        let units = members.iter().map(|&m| ids[m]).collect();
        regions.push(Region { label, units, ssd });
    }

    Partition {
        assignments,
        regions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regio_core::{Contiguity, Unit, UnitId};

    fn chain_lattice(values: &[f64]) -> Lattice {
        let units = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Unit::new(UnitId::new(i), format!("u{i}"), vec![v]))
            .collect();
        let pairs: Vec<_> = (0..values.len() - 1)
            .map(|i| (UnitId::new(i), UnitId::new(i + 1)))
            .collect();
        Lattice::from_units(Contiguity::Rook, units, &pairs).unwrap()
    }

    /// 3x2 grid with a sharp feature break between columns 1 and 2:
    ///   0 - 1 - 2
    ///   |   |   |
    ///   3 - 4 - 5
    fn grid_lattice() -> Lattice {
        let values = [0.0, 0.1, 5.0, 0.2, 0.0, 5.1];
        let units = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Unit::new(UnitId::new(i), format!("cell{i}"), vec![v]))
            .collect();
        let pairs = vec![
            (UnitId::new(0), UnitId::new(1)),
            (UnitId::new(1), UnitId::new(2)),
            (UnitId::new(3), UnitId::new(4)),
            (UnitId::new(4), UnitId::new(5)),
            (UnitId::new(0), UnitId::new(3)),
            (UnitId::new(1), UnitId::new(4)),
            (UnitId::new(2), UnitId::new(5)),
        ];
        Lattice::from_units(Contiguity::Rook, units, &pairs).unwrap()
    }

    #[test]
    fn test_linear_chain_cuts_largest_jump() {
        // [0,0,0,10,10], K=2 -> cut between units 2 and 3
        let lattice = chain_lattice(&[0.0, 0.0, 0.0, 10.0, 10.0]);
        let partition = skater(&lattice, &SkaterConfig::new(2)).unwrap();
        assert_eq!(partition.num_regions(), 2);
        assert_eq!(partition.assignments, vec![0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_grid_splits_by_feature_break() {
        let lattice = grid_lattice();
        let partition = skater(&lattice, &SkaterConfig::new(2)).unwrap();
        assert_eq!(partition.num_regions(), 2);
        // Units 2 and 5 (the high-value column) end up together
        assert_eq!(partition.assignments[2], partition.assignments[5]);
        assert_ne!(partition.assignments[0], partition.assignments[2]);
        assert_eq!(partition.assignments[0], partition.assignments[4]);
    }

    #[test]
    fn test_k1_is_identity() {
        let lattice = chain_lattice(&[1.0, 2.0, 3.0]);
        let partition = skater(&lattice, &SkaterConfig::new(1)).unwrap();
        assert_eq!(partition.num_regions(), 1);
        assert_eq!(partition.regions[0].units.len(), 3);
        assert!(partition.assignments.iter().all(|&l| l == 0));
    }

    #[test]
    fn test_min_size_respected() {
        // Without the constraint the best cut isolates the single outlier.
        let lattice = chain_lattice(&[0.0, 0.0, 0.0, 0.0, 100.0]);
        let partition = skater(&lattice, &SkaterConfig::new(2).with_min_size(2)).unwrap();
        for region in &partition.regions {
            assert!(region.units.len() >= 2);
        }
    }

    #[test]
    fn test_infeasible_request() {
        // 6 units, min_size=4, K=3 would need 12 units
        let lattice = chain_lattice(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = skater(&lattice, &SkaterConfig::new(3).with_min_size(4));
        assert!(matches!(
            result,
            Err(RegionalizeError::Infeasible {
                units: 6,
                groups: 3,
                min_size: 4
            })
        ));
    }

    #[test]
    fn test_infeasible_on_product_overflow() {
        // groups * min_size wraps to 0 in release; the gate must still reject
        let lattice = chain_lattice(&[0.0, 1.0, 2.0]);
        let config = SkaterConfig::new(usize::MAX / 2 + 1).with_min_size(2);
        let result = skater(&lattice, &config);
        assert!(matches!(result, Err(RegionalizeError::Infeasible { .. })));
    }

    #[test]
    fn test_infeasible_mid_pruning() {
        // Star lattice: feasible by unit count (3 * 2 <= 7), but every tree
        // edge isolates a single leaf, so min_size=2 never finds an eligible
        // cut and the run must abort without a partial partition.
        let units = (0..7)
            .map(|i| Unit::new(UnitId::new(i), format!("u{i}"), vec![i as f64 * 3.0]))
            .collect();
        let pairs: Vec<_> = (1..7).map(|i| (UnitId::new(0), UnitId::new(i))).collect();
        let lattice = Lattice::from_units(Contiguity::Custom, units, &pairs).unwrap();
        let result = skater(&lattice, &SkaterConfig::new(3).with_min_size(2));
        assert!(matches!(result, Err(RegionalizeError::Infeasible { .. })));
    }

    #[test]
    fn test_disconnected_input() {
        // Units {0,1} and {2,3} with no cross edges
        let units = (0..4)
            .map(|i| Unit::new(UnitId::new(i), format!("u{i}"), vec![i as f64]))
            .collect();
        let pairs = vec![
            (UnitId::new(0), UnitId::new(1)),
            (UnitId::new(2), UnitId::new(3)),
        ];
        let lattice = Lattice::from_units(Contiguity::Queen, units, &pairs).unwrap();
        let result = skater(&lattice, &SkaterConfig::new(2));
        assert!(matches!(result, Err(RegionalizeError::Disconnected(2))));
    }

    #[test]
    fn test_invalid_parameters() {
        let lattice = chain_lattice(&[0.0, 1.0]);
        assert!(matches!(
            skater(&lattice, &SkaterConfig::new(0)),
            Err(RegionalizeError::InvalidGroupCount(0))
        ));
        assert!(matches!(
            skater(&lattice, &SkaterConfig::new(1).with_min_size(0)),
            Err(RegionalizeError::InvalidMinSize(0))
        ));
    }

    #[test]
    fn test_empty_features_rejected() {
        let units = vec![
            Unit::new(UnitId::new(0), "a", vec![]),
            Unit::new(UnitId::new(1), "b", vec![]),
        ];
        let pairs = vec![(UnitId::new(0), UnitId::new(1))];
        let lattice = Lattice::from_units(Contiguity::Queen, units, &pairs).unwrap();
        assert!(matches!(
            skater(&lattice, &SkaterConfig::new(2)),
            Err(RegionalizeError::EmptyFeatures)
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let units = vec![
            Unit::new(UnitId::new(0), "a", vec![0.0]),
            Unit::new(UnitId::new(1), "b", vec![f64::NAN]),
        ];
        let pairs = vec![(UnitId::new(0), UnitId::new(1))];
        let lattice = Lattice::from_units(Contiguity::Queen, units, &pairs).unwrap();
        assert!(matches!(
            skater(&lattice, &SkaterConfig::new(2)),
            Err(RegionalizeError::NonFinite(name)) if name == "b"
        ));
    }

    #[test]
    fn test_determinism() {
        let lattice = grid_lattice();
        let config = SkaterConfig::new(3);
        let first = skater(&lattice, &config).unwrap();
        let second = skater(&lattice, &config).unwrap();
        assert_eq!(first.assignments, second.assignments);
    }

    #[test]
    fn test_label_map_and_ssd() {
        let lattice = chain_lattice(&[0.0, 0.0, 10.0, 10.0]);
        let partition = skater(&lattice, &SkaterConfig::new(2)).unwrap();
        let labels = partition.label_map(&lattice);
        assert_eq!(labels[&UnitId::new(0)], labels[&UnitId::new(1)]);
        assert_ne!(labels[&UnitId::new(0)], labels[&UnitId::new(3)]);
        // Both regions are internally homogeneous
        assert!(partition.total_ssd() < 1e-12);
    }

    #[test]
    fn test_further_split_reduces_ssd() {
        let lattice = grid_lattice();
        let two = skater(&lattice, &SkaterConfig::new(2)).unwrap();
        let three = skater(&lattice, &SkaterConfig::new(3)).unwrap();
        assert!(three.total_ssd() <= two.total_ssd() + 1e-12);
    }
}

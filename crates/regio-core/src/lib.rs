//! # regio-core: Areal Data Modeling Core
//!
//! Provides the fundamental data structures for spatially constrained analysis
//! of areal data (census tracts, counties, grid cells, ...).
//!
//! ## Design Philosophy
//!
//! A study area is modeled as an **undirected contiguity graph** (a *lattice*)
//! where:
//! - **Nodes**: areal units, each carrying a feature vector of real-valued
//!   attributes (raw demographics, principal-component scores, ...)
//! - **Edges**: spatial adjacency between two units (shared boundary)
//!
//! This graph-based approach enables:
//! - Fast topological queries (connectivity, island detection)
//! - Spanning-tree construction for regionalization
//! - Type-safe unit access with newtype IDs
//!
//! Geometry never enters this crate: adjacency is supplied precomputed by an
//! upstream contiguity builder, and the rule used ("queen", "rook", ...) is
//! only recorded as provenance.
//!
//! ## Quick Start
//!
//! ```rust
//! use regio_core::{Lattice, Contiguity, Unit, UnitId};
//!
//! let units = vec![
//!     Unit::new(UnitId::new(0), "48001", vec![0.2, 1.4]),
//!     Unit::new(UnitId::new(1), "48003", vec![0.3, 1.1]),
//!     Unit::new(UnitId::new(2), "48005", vec![2.8, -0.5]),
//! ];
//! let edges = vec![
//!     (UnitId::new(0), UnitId::new(1)),
//!     (UnitId::new(1), UnitId::new(2)),
//! ];
//! let lattice = Lattice::from_units(Contiguity::Queen, units, &edges).unwrap();
//! assert_eq!(lattice.num_units(), 3);
//! ```
//!
//! ## Modules
//!
//! - [`diagnostics`] - Validation and diagnostic reporting
//! - [`graph_utils`] - Topological analysis (components, islands, DOT export)
//! - [`io`] - Serde exchange format for lattices

use petgraph::{prelude::*, Undirected};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod diagnostics;
pub mod error;
pub mod graph_utils;
pub mod io;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{RegioError, RegioResult};
pub use graph_utils::*;
pub use io::{LatticeSpec, UnitSpec};
pub use petgraph::graph::NodeIndex;

/// Type-safe identifier for an areal unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(usize);

impl UnitId {
    #[inline]
    pub fn new(value: usize) -> Self {
        UnitId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An areal observation: one polygon of the study area, reduced to its
/// identifier, a display name (typically a GEOID), and a feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    /// Real-valued attributes (raw counts, rates, PC scores, ...)
    pub features: Vec<f64>,
}

impl Unit {
    pub fn new(id: UnitId, name: impl Into<String>, features: Vec<f64>) -> Self {
        Self {
            id,
            name: name.into(),
            features,
        }
    }
}

/// Contiguity rule under which the adjacency edges were derived.
///
/// Recorded for provenance only; this crate never computes adjacency itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contiguity {
    /// Shared boundary or corner
    #[default]
    Queen,
    /// Shared boundary segment only
    Rook,
    /// Adjacency supplied by some other rule (k-nearest, manual, ...)
    Custom,
}

/// Edge payload: a spatial adjacency between two units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacency {
    pub from: UnitId,
    pub to: UnitId,
}

/// The contiguity graph of a study area.
#[derive(Debug, Default)]
pub struct Lattice {
    pub graph: Graph<Unit, Adjacency, Undirected>,
    pub contiguity: Contiguity,
}

impl Lattice {
    pub fn new(contiguity: Contiguity) -> Self {
        Self {
            graph: Graph::new_undirected(),
            contiguity,
        }
    }

    /// Build a lattice from units and adjacency pairs.
    ///
    /// Duplicate pairs and self-pairs are rejected, as are pairs referencing
    /// unknown unit ids.
    pub fn from_units(
        contiguity: Contiguity,
        units: Vec<Unit>,
        pairs: &[(UnitId, UnitId)],
    ) -> RegioResult<Self> {
        let mut lattice = Lattice::new(contiguity);
        let mut index_of: HashMap<UnitId, NodeIndex> = HashMap::with_capacity(units.len());

        for unit in units {
            if index_of.contains_key(&unit.id) {
                return Err(RegioError::Validation(format!(
                    "duplicate unit id {}",
                    unit.id
                )));
            }
            let id = unit.id;
            let idx = lattice.graph.add_node(unit);
            index_of.insert(id, idx);
        }

        for &(a, b) in pairs {
            if a == b {
                return Err(RegioError::Validation(format!(
                    "self-adjacency on unit {a}"
                )));
            }
            let (ia, ib) = match (index_of.get(&a), index_of.get(&b)) {
                (Some(&ia), Some(&ib)) => (ia, ib),
                _ => {
                    return Err(RegioError::Validation(format!(
                        "adjacency ({a}, {b}) references an unknown unit"
                    )))
                }
            };
            if lattice.graph.find_edge(ia, ib).is_some() {
                continue; // symmetric duplicate
            }
            lattice.graph.add_edge(ia, ib, Adjacency { from: a, to: b });
        }

        Ok(lattice)
    }

    pub fn num_units(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_adjacencies(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of feature dimensions, taken from the first unit.
    pub fn num_features(&self) -> usize {
        self.graph
            .node_weights()
            .next()
            .map(|u| u.features.len())
            .unwrap_or(0)
    }

    /// Get all units in node-index order.
    pub fn units(&self) -> Vec<&Unit> {
        self.graph.node_weights().collect()
    }

    /// Find a unit by id.
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.graph.node_weights().find(|u| u.id == id)
    }

    /// Compute size, connectivity, and degree statistics for the lattice.
    pub fn stats(&self) -> LatticeStats {
        let n = self.num_units();
        let e = self.num_adjacencies();
        let degrees: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.neighbors(idx).count())
            .collect();
        LatticeStats {
            num_units: n,
            num_adjacencies: e,
            num_features: self.num_features(),
            num_components: petgraph::algo::connected_components(&self.graph),
            num_isolated: degrees.iter().filter(|&&d| d == 0).count(),
            min_degree: degrees.iter().copied().min().unwrap_or(0),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            avg_degree: if n == 0 { 0.0 } else { 2.0 * e as f64 / n as f64 },
            density: if n < 2 {
                0.0
            } else {
                2.0 * e as f64 / (n as f64 * (n as f64 - 1.0))
            },
        }
    }

    /// Validate lattice data for issues that break downstream algorithms.
    ///
    /// Populates the provided `Diagnostics` with any warnings/errors found.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        if self.num_units() == 0 {
            diag.add_error("structure", "Lattice has no units");
            return; // Can't check further
        }

        let dims = self.num_features();
        if dims == 0 {
            diag.add_error("features", "Units carry empty feature vectors");
        }
        for unit in self.graph.node_weights() {
            if unit.features.len() != dims {
                diag.add(
                    DiagnosticIssue::new(
                        Severity::Error,
                        "features",
                        format!(
                            "Feature vector has {} entries, expected {}",
                            unit.features.len(),
                            dims
                        ),
                    )
                    .with_entity(unit.name.clone()),
                );
            }
            if unit.features.iter().any(|v| !v.is_finite()) {
                diag.add(
                    DiagnosticIssue::new(
                        Severity::Error,
                        "features",
                        "Feature vector contains non-finite values",
                    )
                    .with_entity(unit.name.clone()),
                );
            }
        }

        for idx in self.graph.node_indices() {
            if self.graph.neighbors(idx).count() == 0 {
                diag.add(
                    DiagnosticIssue::new(
                        Severity::Error,
                        "structure",
                        "Unit has no neighbors; no spanning tree can include it",
                    )
                    .with_entity(self.graph[idx].name.clone()),
                );
            }
        }

        let components = petgraph::algo::connected_components(&self.graph);
        if components > 1 {
            diag.add_warning(
                "structure",
                &format!(
                    "Lattice has {components} connected components; regionalization must be run per component"
                ),
            );
        }
    }
}

/// Statistics about a lattice's size and structure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LatticeStats {
    pub num_units: usize,
    pub num_adjacencies: usize,
    pub num_features: usize,
    pub num_components: usize,
    pub num_isolated: usize,
    pub min_degree: usize,
    pub max_degree: usize,
    pub avg_degree: f64,
    /// Realized fraction of the possible adjacencies
    pub density: f64,
}

impl std::fmt::Display for LatticeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} units, {} adjacencies, {} features, {} components ({} isolated)",
            self.num_units,
            self.num_adjacencies,
            self.num_features,
            self.num_components,
            self.num_isolated
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Lattice {
        let units = (0..n)
            .map(|i| Unit::new(UnitId::new(i), format!("u{i}"), vec![i as f64]))
            .collect();
        let pairs: Vec<_> = (0..n.saturating_sub(1))
            .map(|i| (UnitId::new(i), UnitId::new(i + 1)))
            .collect();
        Lattice::from_units(Contiguity::Rook, units, &pairs).unwrap()
    }

    #[test]
    fn test_lattice_construction() {
        let lattice = chain(4);
        assert_eq!(lattice.num_units(), 4);
        assert_eq!(lattice.num_adjacencies(), 3);
        assert_eq!(lattice.num_features(), 1);
        assert_eq!(lattice.unit(UnitId::new(2)).unwrap().name, "u2");
    }

    #[test]
    fn test_duplicate_pairs_collapse() {
        let units = vec![
            Unit::new(UnitId::new(0), "a", vec![0.0]),
            Unit::new(UnitId::new(1), "b", vec![1.0]),
        ];
        let pairs = vec![
            (UnitId::new(0), UnitId::new(1)),
            (UnitId::new(1), UnitId::new(0)),
        ];
        let lattice = Lattice::from_units(Contiguity::Queen, units, &pairs).unwrap();
        assert_eq!(lattice.num_adjacencies(), 1);
    }

    #[test]
    fn test_unknown_endpoint_rejected() {
        let units = vec![Unit::new(UnitId::new(0), "a", vec![0.0])];
        let pairs = vec![(UnitId::new(0), UnitId::new(7))];
        let result = Lattice::from_units(Contiguity::Queen, units, &pairs);
        assert!(matches!(result, Err(RegioError::Validation(_))));
    }

    #[test]
    fn test_self_adjacency_rejected() {
        let units = vec![Unit::new(UnitId::new(0), "a", vec![0.0])];
        let pairs = vec![(UnitId::new(0), UnitId::new(0))];
        assert!(Lattice::from_units(Contiguity::Queen, units, &pairs).is_err());
    }

    #[test]
    fn test_duplicate_unit_id_rejected() {
        let units = vec![
            Unit::new(UnitId::new(3), "a", vec![0.0]),
            Unit::new(UnitId::new(3), "b", vec![1.0]),
        ];
        assert!(Lattice::from_units(Contiguity::Queen, units, &[]).is_err());
    }

    #[test]
    fn test_stats() {
        let lattice = chain(5);
        let stats = lattice.stats();
        assert_eq!(stats.num_units, 5);
        assert_eq!(stats.num_adjacencies, 4);
        assert_eq!(stats.num_components, 1);
        assert_eq!(stats.num_isolated, 0);
        assert_eq!(stats.min_degree, 1);
        assert_eq!(stats.max_degree, 2);
        assert!((stats.avg_degree - 8.0 / 5.0).abs() < 1e-12);
        assert!((stats.density - 2.0 * 4.0 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_stats_empty() {
        let lattice = Lattice::new(Contiguity::Queen);
        let stats = lattice.stats();
        assert_eq!(stats.num_units, 0);
        assert_eq!(stats.avg_degree, 0.0);
        assert_eq!(stats.density, 0.0);
    }

    #[test]
    fn test_validation_empty() {
        let lattice = Lattice::new(Contiguity::Queen);
        let mut diag = Diagnostics::new();
        lattice.validate_into(&mut diag);
        assert!(diag.has_errors());
        assert!(diag.errors().any(|i| i.message.contains("no units")));
    }

    #[test]
    fn test_validation_isolated_unit() {
        let units = vec![
            Unit::new(UnitId::new(0), "a", vec![0.0]),
            Unit::new(UnitId::new(1), "b", vec![1.0]),
            Unit::new(UnitId::new(2), "island", vec![2.0]),
        ];
        let pairs = vec![(UnitId::new(0), UnitId::new(1))];
        let lattice = Lattice::from_units(Contiguity::Queen, units, &pairs).unwrap();

        let mut diag = Diagnostics::new();
        lattice.validate_into(&mut diag);
        assert!(diag.has_errors());
        assert!(diag
            .errors()
            .any(|i| i.entity.as_deref() == Some("island")));
    }

    #[test]
    fn test_validation_ragged_features() {
        let units = vec![
            Unit::new(UnitId::new(0), "a", vec![0.0, 1.0]),
            Unit::new(UnitId::new(1), "b", vec![1.0]),
        ];
        let pairs = vec![(UnitId::new(0), UnitId::new(1))];
        let lattice = Lattice::from_units(Contiguity::Queen, units, &pairs).unwrap();

        let mut diag = Diagnostics::new();
        lattice.validate_into(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validation_clean() {
        let lattice = chain(3);
        let mut diag = Diagnostics::new();
        lattice.validate_into(&mut diag);
        assert!(!diag.has_errors());
    }
}

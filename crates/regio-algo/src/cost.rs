//! Edge cost computation: dissimilarity between adjacent units.
//!
//! A lattice edge only records that two units touch; regionalization needs a
//! weight expressing how *different* they are. This module attaches a
//! dissimilarity cost to every adjacency, in stable edge-list order so that
//! downstream tie-breaks are reproducible.

use crate::skater::RegionalizeError;
use petgraph::visit::EdgeRef;
use regio_core::Lattice;
use serde::{Deserialize, Serialize};

/// Dissimilarity metric between two feature vectors.
///
/// Costs are symmetric and zero only for identical vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dissimilarity {
    /// Euclidean distance (the usual SKATER weight)
    #[default]
    Euclidean,
    /// Squared Euclidean distance (skips the sqrt; same MST up to ties)
    #[serde(rename = "sqeuclidean")]
    SquaredEuclidean,
    /// City-block distance
    Manhattan,
}

impl Dissimilarity {
    /// Compute the dissimilarity between two feature vectors.
    ///
    /// Callers are expected to have validated equal lengths; trailing entries
    /// of the longer vector are ignored otherwise.
    pub fn between(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Dissimilarity::Euclidean => {
                let sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
                sq.sqrt()
            }
            Dissimilarity::SquaredEuclidean => {
                a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
            }
            Dissimilarity::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
        }
    }
}

impl std::str::FromStr for Dissimilarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Dissimilarity::Euclidean),
            "sqeuclidean" | "squared" => Ok(Dissimilarity::SquaredEuclidean),
            "manhattan" | "cityblock" => Ok(Dissimilarity::Manhattan),
            other => Err(format!("unknown dissimilarity metric '{other}'")),
        }
    }
}

/// A weighted adjacency edge, indexed by its position in the lattice edge list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEdge {
    /// Position in the original edge list; the deterministic tie-break key
    pub index: usize,
    /// Node index of one endpoint
    pub source: usize,
    /// Node index of the other endpoint
    pub target: usize,
    /// Dissimilarity between the endpoint feature vectors
    pub cost: f64,
}

/// Attach a dissimilarity cost to every adjacency edge of the lattice.
///
/// Returns edges in lattice edge-list order. Fails with
/// [`RegionalizeError::IsolatedUnit`] if any unit of a multi-unit lattice has
/// no neighbors, since no spanning tree could include it.
pub fn weighted_edges(
    lattice: &Lattice,
    metric: Dissimilarity,
) -> Result<Vec<CostEdge>, RegionalizeError> {
    if lattice.num_units() > 1 {
        for node in lattice.graph.node_indices() {
            if lattice.graph.neighbors(node).count() == 0 {
                return Err(RegionalizeError::IsolatedUnit(
                    lattice.graph[node].name.clone(),
                ));
            }
        }
    }

    let edges = lattice
        .graph
        .edge_references()
        .enumerate()
        .map(|(index, edge)| {
            let a = &lattice.graph[edge.source()];
            let b = &lattice.graph[edge.target()];
            CostEdge {
                index,
                source: edge.source().index(),
                target: edge.target().index(),
                cost: metric.between(&a.features, &b.features),
            }
        })
        .collect();

    Ok(edges)
}

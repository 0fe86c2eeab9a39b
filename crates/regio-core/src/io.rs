//! Serde exchange format for lattices.
//!
//! The JSON layout mirrors what upstream contiguity builders emit: a list of
//! units with id/name/features, plus adjacency as id pairs.
//!
//! ```json
//! {
//!   "contiguity": "queen",
//!   "units": [
//!     { "id": 0, "name": "48201311500", "features": [1.2, -0.3] },
//!     { "id": 1, "name": "48201311600", "features": [0.9, 0.1] }
//!   ],
//!   "edges": [[0, 1]]
//! }
//! ```
//!
//! Reading and writing files is left to callers; this module only defines the
//! shape and the checked conversion into a [`Lattice`].

use crate::{Contiguity, Lattice, RegioError, RegioResult, Unit, UnitId};
use serde::{Deserialize, Serialize};

/// One unit record in the exchange format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub features: Vec<f64>,
}

/// A whole lattice in the exchange format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeSpec {
    #[serde(default)]
    pub contiguity: Contiguity,
    pub units: Vec<UnitSpec>,
    #[serde(default)]
    pub edges: Vec<(usize, usize)>,
}

impl LatticeSpec {
    /// Convert the spec into a [`Lattice`], validating unit references and
    /// feature-vector lengths.
    pub fn into_lattice(self) -> RegioResult<Lattice> {
        if self.units.is_empty() {
            return Err(RegioError::Validation("lattice spec has no units".into()));
        }

        let dims = self.units[0].features.len();
        for unit in &self.units {
            if unit.features.len() != dims {
                return Err(RegioError::Validation(format!(
                    "unit '{}' has {} features, expected {}",
                    unit.name,
                    unit.features.len(),
                    dims
                )));
            }
        }

        let units: Vec<Unit> = self
            .units
            .into_iter()
            .map(|u| Unit::new(UnitId::new(u.id), u.name, u.features))
            .collect();
        let pairs: Vec<(UnitId, UnitId)> = self
            .edges
            .iter()
            .map(|&(a, b)| (UnitId::new(a), UnitId::new(b)))
            .collect();

        Lattice::from_units(self.contiguity, units, &pairs)
    }

    /// Build a spec back from a lattice (for emitting derived lattices).
    pub fn from_lattice(lattice: &Lattice) -> Self {
        let units = lattice
            .graph
            .node_weights()
            .map(|u| UnitSpec {
                id: u.id.value(),
                name: u.name.clone(),
                features: u.features.clone(),
            })
            .collect();
        let edges = lattice
            .graph
            .edge_weights()
            .map(|adj| (adj.from.value(), adj.to.value()))
            .collect();
        Self {
            contiguity: lattice.contiguity,
            units,
            edges,
        }
    }
}

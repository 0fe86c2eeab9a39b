//! Island decomposition and topology export.
//!
//! Regionalization requires a connected lattice. When validation reports
//! multiple components, the island decomposition here tells the caller how to
//! split the problem into per-island runs.

use crate::{Lattice, UnitId};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

/// One connected component of the lattice.
#[derive(Debug, Clone, Serialize)]
pub struct Island {
    /// Island label, assigned in order of first unit appearance
    pub id: usize,
    /// Member unit ids, sorted
    pub units: Vec<UnitId>,
}

impl Island {
    pub fn size(&self) -> usize {
        self.units.len()
    }
}

/// Island decomposition of a lattice.
#[derive(Debug, Clone, Serialize)]
pub struct IslandAnalysis {
    pub islands: Vec<Island>,
}

impl IslandAnalysis {
    pub fn num_islands(&self) -> usize {
        self.islands.len()
    }

    pub fn is_connected(&self) -> bool {
        self.islands.len() <= 1
    }

    /// Island id per unit id.
    pub fn membership(&self) -> HashMap<UnitId, usize> {
        self.islands
            .iter()
            .flat_map(|island| island.units.iter().map(|&unit| (unit, island.id)))
            .collect()
    }
}

/// Decompose a lattice into its islands.
///
/// Islands are numbered in order of first unit appearance, so the
/// decomposition is deterministic for a given lattice.
pub fn find_islands(lattice: &Lattice) -> IslandAnalysis {
    let mut seen = vec![false; lattice.num_units()];
    let mut islands = Vec::new();
    for start in lattice.graph.node_indices() {
        if seen[start.index()] {
            continue;
        }
        seen[start.index()] = true;
        let mut stack = vec![start];
        let mut units = Vec::new();
        while let Some(node) = stack.pop() {
            units.push(lattice.graph[node].id);
            for neighbor in lattice.graph.neighbors(node) {
                if !seen[neighbor.index()] {
                    seen[neighbor.index()] = true;
                    stack.push(neighbor);
                }
            }
        }
        units.sort_unstable();
        islands.push(Island {
            id: islands.len(),
            units,
        });
    }
    IslandAnalysis { islands }
}

/// Export the lattice topology for external tools.
pub fn export_graph(lattice: &Lattice, format: &str) -> Result<String> {
    match format.to_ascii_lowercase().as_str() {
        "graphviz" | "dot" => Ok(render_dot(lattice)),
        other => Err(anyhow!("unsupported graph export format '{other}'")),
    }
}

/// Graphviz rendering; nodes are keyed by unit id, labeled by unit name.
fn render_dot(lattice: &Lattice) -> String {
    let mut out = String::from("graph regio_lattice {\n");
    for unit in lattice.graph.node_weights() {
        let _ = writeln!(
            out,
            "  u{} [label=\"{}\"];",
            unit.id,
            escape_label(&unit.name)
        );
    }
    for adjacency in lattice.graph.edge_weights() {
        let _ = writeln!(out, "  u{} -- u{};", adjacency.from, adjacency.to);
    }
    out.push('}');
    out
}

fn escape_label(name: &str) -> String {
    name.replace('"', "\\\"")
}

use anyhow::{bail, Result};
use regio_algo::{dissimilarity_index, information_theory_index};
use std::path::Path;
use tracing::info;

use crate::commands::common::load_lattice;

pub fn handle(lattice_path: &Path, group_a: usize, group_b: usize) -> Result<()> {
    let lattice = load_lattice(lattice_path)?;
    let dims = lattice.num_features();
    if group_a >= dims || group_b >= dims {
        bail!("lattice has {dims} feature column(s); got --group-a {group_a} --group-b {group_b}");
    }

    let a: Vec<f64> = lattice
        .graph
        .node_weights()
        .map(|u| u.features[group_a])
        .collect();
    let b: Vec<f64> = lattice
        .graph
        .node_weights()
        .map(|u| u.features[group_b])
        .collect();

    info!(
        "Computing segregation indices over {} unit(s), columns {} and {}",
        a.len(),
        group_a,
        group_b
    );

    let d = dissimilarity_index(&a, &b)?;
    let h = information_theory_index(&a, &b)?;
    println!("Dissimilarity index (D)     : {d:.4}");
    println!("Information theory index (H): {h:.4}");
    Ok(())
}

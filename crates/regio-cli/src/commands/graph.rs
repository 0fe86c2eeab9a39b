use anyhow::Result;
use regio_core::graph_utils;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::commands::common::load_lattice;
use regio_cli::cli::GraphCommands;

pub fn handle(command: &GraphCommands) -> Result<()> {
    match command {
        GraphCommands::Stats { lattice } => stats(lattice),
        GraphCommands::Islands { lattice, emit } => islands(lattice, emit.as_deref()),
        GraphCommands::Export { lattice, format } => export(lattice, format),
    }
}

fn stats(path: &Path) -> Result<()> {
    let lattice = load_lattice(path)?;
    let stats = lattice.stats();
    println!("Lattice statistics for {}:", path.display());
    println!("  Units         : {}", stats.num_units);
    println!("  Adjacencies   : {}", stats.num_adjacencies);
    println!("  Features      : {}", stats.num_features);
    println!("  Components    : {}", stats.num_components);
    println!(
        "  Degree [min/avg/max]: {}/{:.2}/{}",
        stats.min_degree, stats.avg_degree, stats.max_degree
    );
    println!("  Density       : {:.4}", stats.density);
    Ok(())
}

fn islands(path: &Path, emit: Option<&Path>) -> Result<()> {
    let lattice = load_lattice(path)?;
    let analysis = graph_utils::find_islands(&lattice);
    for island in &analysis.islands {
        println!("Island {}: {} unit(s)", island.id, island.size());
    }

    if let Some(out) = emit {
        let membership = analysis.membership();
        let units: BTreeMap<String, usize> = lattice
            .graph
            .node_weights()
            .map(|unit| (unit.name.clone(), membership[&unit.id]))
            .collect();
        let payload = json!({
            "islands": analysis
                .islands
                .iter()
                .map(|island| json!({ "id": island.id, "size": island.size() }))
                .collect::<Vec<_>>(),
            "units": units,
        });
        fs::write(out, serde_json::to_string_pretty(&payload)?)?;
        info!("wrote island assignments to {}", out.display());
    }
    Ok(())
}

fn export(path: &Path, format: &str) -> Result<()> {
    let lattice = load_lattice(path)?;
    let rendered = graph_utils::export_graph(&lattice, format)?;
    println!("{rendered}");
    Ok(())
}

use anyhow::{bail, Context, Result};
use regio_core::{Lattice, LatticeSpec};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Load a lattice from its JSON exchange file.
pub fn load_lattice(path: &Path) -> Result<Lattice> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let spec: LatticeSpec = serde_json::from_str(&text)
        .with_context(|| format!("parsing lattice spec {}", path.display()))?;
    let lattice = spec.into_lattice()?;
    Ok(lattice)
}

/// Replace unit feature vectors from a CSV keyed by unit name.
///
/// Expected layout: a header row, first column the unit name, remaining
/// columns numeric features. Every unit in the lattice must appear.
pub fn apply_features_csv(lattice: &mut Lattice, path: &Path) -> Result<()> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;

    let mut by_name: HashMap<String, Vec<f64>> = HashMap::new();
    for record in reader.records() {
        let record = record.context("reading CSV record")?;
        let Some(name) = record.get(0) else {
            bail!("CSV record has no columns");
        };
        let features = record
            .iter()
            .skip(1)
            .map(|field| {
                field
                    .trim()
                    .parse::<f64>()
                    .with_context(|| format!("non-numeric feature '{field}' for unit '{name}'"))
            })
            .collect::<Result<Vec<f64>>>()?;
        by_name.insert(name.to_string(), features);
    }

    for unit in lattice.graph.node_weights_mut() {
        match by_name.get(&unit.name) {
            Some(features) => unit.features = features.clone(),
            None => bail!("CSV has no feature row for unit '{}'", unit.name),
        }
    }

    Ok(())
}

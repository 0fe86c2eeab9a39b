use anyhow::{bail, Result};
use regio_algo::{skater, Dissimilarity, SkaterConfig};
use regio_core::Diagnostics;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use crate::commands::common::{apply_features_csv, load_lattice};

pub fn handle(
    lattice_path: &Path,
    groups: usize,
    min_size: usize,
    metric: Dissimilarity,
    features_csv: Option<&Path>,
    out: Option<&Path>,
) -> Result<()> {
    let mut lattice = load_lattice(lattice_path)?;
    if let Some(csv_path) = features_csv {
        apply_features_csv(&mut lattice, csv_path)?;
    }

    let mut diag = Diagnostics::new();
    lattice.validate_into(&mut diag);
    for warning in diag.warnings() {
        warn!("{warning}");
    }
    if diag.has_errors() {
        for issue in diag.errors() {
            error!("{issue}");
        }
        bail!("lattice failed validation: {}", diag.summary());
    }

    info!(
        "Regionalizing {} into {} group(s), min size {}, metric {:?}",
        lattice.stats(),
        groups,
        min_size,
        metric
    );

    let config = SkaterConfig::new(groups)
        .with_min_size(min_size)
        .with_metric(metric);
    let partition = skater(&lattice, &config)?;

    for region in &partition.regions {
        info!(
            "region {}: {} unit(s), ssd {:.4}",
            region.label,
            region.units.len(),
            region.ssd
        );
    }
    info!("total within-region ssd: {:.4}", partition.total_ssd());

    let labels: BTreeMap<String, usize> = lattice
        .graph
        .node_weights()
        .zip(&partition.assignments)
        .map(|(unit, &label)| (unit.name.clone(), label))
        .collect();
    let payload = json!({
        "labels": labels,
        "regions": partition
            .regions
            .iter()
            .map(|r| json!({ "label": r.label, "size": r.units.len(), "ssd": r.ssd }))
            .collect::<Vec<_>>(),
    });
    let text = serde_json::to_string_pretty(&payload)?;

    match out {
        Some(path) => {
            fs::write(path, text)?;
            info!("wrote labels to {}", path.display());
        }
        None => println!("{text}"),
    }

    Ok(())
}

//! Postcondition checks for partitions.
//!
//! SKATER guarantees its invariants by construction; these checks exist so
//! tests and cautious callers can verify a partition independently against
//! the original lattice: completeness, contiguity, minimum size, group count.

use crate::skater::{Partition, SkaterConfig};
use regio_core::Lattice;
use std::collections::HashSet;

/// Violations found when checking a partition against its lattice and config.
#[derive(Debug, Clone, Default)]
pub struct PartitionViolations {
    /// Assignment vector length disagrees with the unit count
    pub incomplete: bool,
    /// Node indices whose label references no region
    pub unknown_labels: Vec<usize>,
    /// Region labels whose member list disagrees with the assignment vector
    pub mismatched_regions: Vec<usize>,
    /// Regions that are not connected in the original adjacency graph
    pub noncontiguous_regions: Vec<usize>,
    /// Regions smaller than the configured minimum
    pub undersized_regions: Vec<usize>,
    /// Actual group count when it differs from the requested one
    pub wrong_group_count: Option<usize>,
}

impl PartitionViolations {
    pub fn is_valid(&self) -> bool {
        !self.incomplete
            && self.unknown_labels.is_empty()
            && self.mismatched_regions.is_empty()
            && self.noncontiguous_regions.is_empty()
            && self.undersized_regions.is_empty()
            && self.wrong_group_count.is_none()
    }
}

/// Check a partition's invariants against its lattice and configuration.
pub fn check_partition(
    lattice: &Lattice,
    partition: &Partition,
    config: &SkaterConfig,
) -> PartitionViolations {
    let mut violations = PartitionViolations::default();
    let n = lattice.num_units();

    if partition.assignments.len() != n {
        violations.incomplete = true;
        return violations; // Everything else keys off the assignments
    }

    let k = partition.regions.len();
    if k != config.num_groups {
        violations.wrong_group_count = Some(k);
    }

    // Labels must reference existing regions, and each region's member list
    // must match the assignment vector exactly.
    for (node, &label) in partition.assignments.iter().enumerate() {
        if label >= k {
            violations.unknown_labels.push(node);
        }
    }
    let ids: Vec<_> = lattice.graph.node_weights().map(|u| u.id).collect();
    for region in &partition.regions {
        let from_assignments: HashSet<_> = partition
            .assignments
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == region.label)
            .map(|(node, _)| ids[node])
            .collect();
        let from_region: HashSet<_> = region.units.iter().copied().collect();
        if from_assignments != from_region {
            violations.mismatched_regions.push(region.label);
        }
        if region.units.len() < config.min_size {
            violations.undersized_regions.push(region.label);
        }
        if !region_is_contiguous(lattice, &partition.assignments, region.label) {
            violations.noncontiguous_regions.push(region.label);
        }
    }

    violations
}

/// BFS over the lattice restricted to one region's members.
fn region_is_contiguous(lattice: &Lattice, assignments: &[usize], label: usize) -> bool {
    let members: Vec<_> = lattice
        .graph
        .node_indices()
        .filter(|idx| assignments[idx.index()] == label)
        .collect();
    let Some(&start) = members.first() else {
        return false; // An empty region is never valid
    };

    let mut visited = HashSet::new();
    let mut stack = vec![start];
    visited.insert(start);
    while let Some(node) = stack.pop() {
        for neighbor in lattice.graph.neighbors(node) {
            if assignments[neighbor.index()] == label && visited.insert(neighbor) {
                stack.push(neighbor);
            }
        }
    }

    visited.len() == members.len()
}

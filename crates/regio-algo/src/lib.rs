//! # regio-algo: Regionalization Algorithms for Areal Data
//!
//! This crate provides the algorithms that turn a contiguity lattice
//! (regio-core) into analysis products: spatially constrained regionalization
//! and segregation indices.
//!
//! ## Regionalization (SKATER)
//!
//! [`skater`] partitions the lattice into K contiguous, internally
//! homogeneous regions by pruning a minimum spanning tree:
//!
//! 1. [`cost`] attaches a dissimilarity weight to every adjacency edge
//!    ([`Dissimilarity::Euclidean`] by default)
//! 2. [`mst`] builds the minimum spanning tree (Kruskal, deterministic
//!    tie-break by edge-list order)
//! 3. the pruner removes K−1 tree edges, each time the one whose removal
//!    most reduces total within-region sum of squared deviations, subject
//!    to a minimum region size
//!
//! Every region is a connected subtree of the adjacency structure, so
//! contiguity holds by construction. The whole pipeline is deterministic.
//!
//! ## Segregation Indices
//!
//! [`diversity`] computes two-group evenness measures per study area:
//! the index of dissimilarity and Theil's information theory index.
//!
//! ## Example
//!
//! ```ignore
//! use regio_algo::{skater, SkaterConfig, Dissimilarity};
//!
//! let config = SkaterConfig::new(8)
//!     .with_min_size(10)
//!     .with_metric(Dissimilarity::Euclidean);
//! let partition = skater(&lattice, &config)?;
//! println!("total within-region SSD: {:.2}", partition.total_ssd());
//! ```

pub mod cost;
pub mod diversity;
pub mod mst;
pub mod skater;
pub mod validation;

pub use cost::{weighted_edges, CostEdge, Dissimilarity};
pub use diversity::{dissimilarity_index, information_theory_index};
pub use mst::{minimum_spanning_tree, total_cost};
pub use skater::{skater, Partition, Region, RegionalizeError, SkaterConfig};
pub use validation::{check_partition, PartitionViolations};

use clap::{Parser, Subcommand};
use regio_algo::Dissimilarity;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lattice graph utilities
    Graph {
        #[command(subcommand)]
        command: GraphCommands,
    },
    /// SKATER regionalization: contiguous, homogeneous regions
    Regionalize {
        /// Path to the lattice JSON file
        #[arg(long)]
        lattice: PathBuf,
        /// Number of regions to produce
        #[arg(long)]
        groups: usize,
        /// Minimum units per region
        #[arg(long, default_value_t = 1)]
        min_size: usize,
        /// Dissimilarity metric for edge costs
        #[arg(long, default_value = "euclidean")]
        metric: Dissimilarity,
        /// Replace unit feature vectors from a CSV keyed by unit name
        #[arg(long)]
        features_csv: Option<PathBuf>,
        /// Write per-unit labels to this JSON file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Two-group segregation indices (dissimilarity D, information theory H)
    Diversity {
        /// Path to the lattice JSON file
        #[arg(long)]
        lattice: PathBuf,
        /// Feature column holding group A counts
        #[arg(long)]
        group_a: usize,
        /// Feature column holding group B counts
        #[arg(long)]
        group_b: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum GraphCommands {
    /// Show lattice statistics
    Stats {
        /// Path to the lattice JSON file
        #[arg(long)]
        lattice: PathBuf,
    },
    /// List connected components (islands)
    Islands {
        /// Path to the lattice JSON file
        #[arg(long)]
        lattice: PathBuf,
        /// Write per-unit island assignments to this JSON file
        #[arg(long)]
        emit: Option<PathBuf>,
    },
    /// Export the topology for external tools
    Export {
        /// Path to the lattice JSON file
        #[arg(long)]
        lattice: PathBuf,
        /// Output format (graphviz/dot)
        #[arg(long, default_value = "dot")]
        format: String,
    },
}

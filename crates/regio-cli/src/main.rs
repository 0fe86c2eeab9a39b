use clap::Parser;
use regio_cli::cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::FmtSubscriber;

mod commands;

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match &cli.command {
        Commands::Graph { command } => commands::graph::handle(command),
        Commands::Regionalize {
            lattice,
            groups,
            min_size,
            metric,
            features_csv,
            out,
        } => commands::regionalize::handle(
            lattice,
            *groups,
            *min_size,
            *metric,
            features_csv.as_deref(),
            out.as_deref(),
        ),
        Commands::Diversity {
            lattice,
            group_a,
            group_b,
        } => commands::diversity::handle(lattice, *group_a, *group_b),
    };

    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(1);
    }
}

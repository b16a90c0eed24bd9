use clap::Parser;
use tracing_subscriber::EnvFilter;

use chorale_motif::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("chorale_motif=debug,info")
    } else {
        EnvFilter::new("chorale_motif=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Search(args) => {
            cli::search::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Index(args) => {
            cli::index::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}

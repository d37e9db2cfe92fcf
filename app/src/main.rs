//! `medqr` command-line entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use medqr_lib::cli::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    medqr_lib::load_dotenv();

    let cli = Cli::parse();
    medqr_lib::run(cli)
}

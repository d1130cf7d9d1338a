//! Ingest service entry point.

use clap::Parser;
use ports_lib::cli::{self, IngestCli};

#[tokio::main]
async fn main() {
    let cli = IngestCli::parse();
    cli::exit_on_error(cli::run_ingest(cli).await);
}

//! Ports service entry point.

use clap::Parser;
use ports_lib::cli::{self, PortsServiceCli};

#[tokio::main]
async fn main() {
    let cli = PortsServiceCli::parse();
    cli::exit_on_error(cli::run_ports_service(cli).await);
}

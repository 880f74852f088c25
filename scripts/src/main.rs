use std::{io, process::ExitCode};

use clap::Parser;
use scripts::cli::Cli;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let Cli { rpc_url, command } = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match command.run(rpc_url.as_deref()).await {
        // Exit codes outside a byte can only come from non-Unix platforms
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            debug!("{e:?}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

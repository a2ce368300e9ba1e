mod application;
mod domain;
mod infrastructure;
mod presentation;

use clap::Parser;
use colored::Colorize;
use crate::infrastructure::http_client::HyperHttpClient;
use crate::infrastructure::logging::init_tracing_subscriber;
use crate::presentation::cli::Cli;

/// Courier: named HTTP requests from a workspace file
///
/// Resolves a request declared in `courier.yaml` (variables, defaults and
/// request templates) into a concrete HTTP request and prints the response
/// body. Without a request name it opens $EDITOR so a raw HTTP/1.1 request
/// can be written by hand.
#[tokio::main]
async fn main() {
    init_tracing_subscriber();

    let cli = Cli::parse();
    let request_service = HyperHttpClient::new().create_request_service();

    if let Err(err) = cli.run(&request_service).await {
        eprintln!("{}", format!("{:#}", err).red());
        std::process::exit(1);
    }
}

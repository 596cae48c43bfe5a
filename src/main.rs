//! Warehouse Routing - Axum Server

use std::process::ExitCode;
use std::sync::Arc;

use tracing::error;
use tracing_subscriber::EnvFilter;
use warehouse_routing::config::AppConfig;
use warehouse_routing::solver::Optimizer;
use warehouse_routing::{api, console};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warehouse_routing=info".parse().unwrap()))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let network = match config.load_network() {
        Ok(network) => network,
        Err(e) => {
            error!(error = %e, source = ?config.network, "Failed to load network");
            return ExitCode::FAILURE;
        }
    };

    console::print_banner();
    console::print_network(&network, &config.solver);

    let app = api::create_router(Optimizer::new(Arc::new(network), config.solver));

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %config.addr, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };
    console::print_listening(config.addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

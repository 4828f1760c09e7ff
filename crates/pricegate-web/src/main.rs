use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use pricegate_core::PriceGateway;
use pricegate_web::cli::Cli;
use pricegate_web::{build_router, rate_limit, AppState, ServerError};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "server exited with error");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let config = cli.gateway_config();
    config.validate()?;

    let gateway = PriceGateway::from_config(&config);
    let state = AppState::new(gateway, cli.rate_limit_max_requests)?;
    state.rate_limiter().spawn_cleanup(rate_limit::CLEANUP_INTERVAL);
    let app = build_router(state);

    let addr = cli.bind_addr();
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(
        addr = %local,
        upstream = config.effective_base_url(),
        testnet = config.testnet,
        "pricegate listening"
    );
    info!("health:       http://{local}/api/v1/health");
    info!("single price: http://{local}/api/v1/prices/:symbol");
    info!("batch prices: http://{local}/api/v1/prices/batch");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("pricegate stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

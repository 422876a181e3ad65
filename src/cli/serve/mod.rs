//! Serve command - runs the page and the JSON API on one port

use std::net::SocketAddr;

use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::api::create_router_with_state;
use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::observability::{create_metrics_router, init_metrics};

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on (overrides server.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;
    apply_args(&mut config, args);
    config.validate()?;

    init_logging(&config.logging);
    let metrics = init_metrics(&config.metrics);

    let state = crate::create_app_state(&config)?;
    let mut app = create_router_with_state(state);

    if let Some(metrics) = metrics {
        app = app.merge(create_metrics_router(metrics, &config.metrics.path));
    }

    let addr = build_socket_addr(&config)?;
    info!("Starting Anima on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

fn apply_args(config: &mut AppConfig, args: ServeArgs) {
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Some(host) = args.host {
        config.server.host = host;
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

//! Station occupancy map server.

use anyhow::Result;
use clap::Parser;
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use map_api::config::{Args, ServiceConfig};
use map_api::loader;
use map_api::state::AppState;

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics exporter initialized");

    let config = ServiceConfig::load(args.config.as_deref())?.with_args(&args);
    let state = Arc::new(AppState::new(&args, config)?);

    info!(
        snapshot_root = %args.snapshot_root,
        registry = %args.registry,
        live = args.live_status.is_some(),
        "Starting map server"
    );

    // registry, catalog, newest snapshot; failures leave /ready at 503
    loader::initialize(&state).await;

    let app = map_api::router(state, Some(prometheus_handle));

    let addr: SocketAddr = args.listen.parse()?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

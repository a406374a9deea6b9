use std::sync::Arc;

use metro_ops::config::ServiceConfig;
use metro_ops::logging::init_logger;
use metro_ops::server;
use metro_ops::service::ScheduleService;
use tokio::net::TcpListener;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let config = ServiceConfig::from_env();
    info!(?config, "Starting metro-ops");

    // Built outside the runtime: the HTTP catalogs use blocking clients.
    let service = Arc::new(ScheduleService::from_config(&config)?);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = TcpListener::bind(config.http_address).await?;
        server::serve(listener, service.clone(), shutdown_signal()).await
    })?;
    drop(runtime);

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

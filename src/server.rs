//! HTTP server bootstrap.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::routes;
use crate::service::ScheduleService;

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    service: Arc<ScheduleService>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Serving schedule API");
    }
    axum::serve(listener, routes::create_router(service))
        .with_graceful_shutdown(shutdown)
        .await
}

/// The API running on a private runtime in the background.
///
/// Dropping the handle stops the server.
pub struct ScheduleServer {
    // Owns the worker threads serving requests
    #[allow(dead_code)]
    runtime: Runtime,
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ScheduleServer {
    pub fn start(service: Arc<ScheduleService>, addr: SocketAddr) -> io::Result<Self> {
        let runtime = Runtime::new()?;
        let listener = runtime.block_on(TcpListener::bind(addr))?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        runtime.spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            if let Err(err) = serve(listener, service, shutdown).await {
                error!(error = %err, "Schedule API stopped");
            }
        });

        Ok(Self {
            runtime,
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for ScheduleServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

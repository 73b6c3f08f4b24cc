pub mod config;
pub mod hub;
pub mod serial;
pub mod server;

pub use config::*;
pub use hub::*;
pub use serial::*;
pub use server::*;

use anyhow::Context;
use std::future::Future;
use tokio::net::TcpListener;

/// Run the relay until the trigger source ends (stdin) or fails.
pub async fn run(config: RelayConfig) -> anyhow::Result<()> {
    let hub = TriggerHub::new(config.buffer);
    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("bind {}", config.listen))?;
    log::info!("[relay] listening on ws://{}", listener.local_addr()?);

    if config.reads_stdin() {
        relay(listener, hub.clone(), run_stdin(hub)).await
    } else {
        let reopen = config.reopen_delay();
        let device_hub = hub.clone();
        let source = async move {
            run_device(&config.serial, config.baud, device_hub, reopen).await;
            Ok(())
        };
        relay(listener, hub, source).await
    }
}

/// Serve clients on `listener` while `source` publishes into `hub`. Returns
/// when the source does; the server stops with it.
pub async fn relay<F>(listener: TcpListener, hub: TriggerHub, source: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    let server = tokio::spawn(serve(listener, hub));
    let outcome = source.await;
    server.abort();
    outcome
}

//! SkyPortal Client - headless entry point
//!
//! Loads the portal's data, follows server pushes, and logs what changes.

use skyportal_client::{Portal, PortalConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("skyportal_client=debug")),
        )
        .init();

    let config = PortalConfig::from_env();
    tracing::info!(base_url = %config.base_url, ws_url = %config.ws_url, "starting");

    let portal = Portal::new(config);
    let mut updates = portal.store().subscribe();

    portal.hydrate();
    let socket = portal.connect();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                tracing::info!("shutting down");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                tracing::info!(slices = ?state, "state updated");
            }
        }
    }

    socket.shutdown().await;
    Ok(())
}

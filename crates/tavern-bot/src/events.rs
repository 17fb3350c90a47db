//! Platform-event loop: delivers gateway notifications to the owning
//! group controller, one at a time, under that group's lock.

use std::sync::Arc;
use tavern_core::gateway::{Gateway, GatewayEvent};
use tavern_core::Registry;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Consume the event stream until the sender side closes.
pub async fn run(
    gateway: Arc<dyn Gateway>,
    registry: Arc<Registry>,
    mut events: mpsc::UnboundedReceiver<GatewayEvent>,
) {
    while let Some(event) = events.recv().await {
        handle_event(gateway.as_ref(), &registry, event).await;
    }
    debug!("gateway event stream closed");
}

/// Route one notification to the controller that owns its container.
/// Events for untracked containers are ignored; handler failures are
/// logged and do not stop the loop.
pub async fn handle_event(gateway: &dyn Gateway, registry: &Registry, event: GatewayEvent) {
    match event {
        GatewayEvent::ContainerRenamed { id, new_name, .. } => {
            let Some(handle) = registry.find_by_container(id) else {
                debug!(container = %id, "rename for untracked container");
                return;
            };
            if let Err(err) = handle.on_container_renamed(gateway, registry, &new_name).await {
                error!(container = %id, error = %err, "rename synchronization failed");
            }
        }
        GatewayEvent::ContainerDeleted { id } => {
            let Some(handle) = registry.find_by_container(id) else {
                debug!(container = %id, "deletion of untracked container");
                return;
            };
            if let Err(err) = handle.on_container_deleted(gateway, registry).await {
                error!(container = %id, error = %err, "group teardown failed");
            }
        }
        GatewayEvent::ChannelMoved { channel, from, to } => {
            let Some(handle) = from.and_then(|id| registry.find_by_container(id)) else {
                return;
            };
            if let Err(err) = handle.on_channel_moved(gateway, channel, from, to).await {
                error!(%channel, error = %err, "escaped-channel cleanup failed");
            }
        }
    }
}

//! Event-to-WebSocket fan-out.
//!
//! [`Broadcaster`] subscribes to the catalog event bus and pushes each
//! event's catalog snapshot to every connected client as a `data_update`.

use std::sync::Arc;

use skudesk_events::CatalogEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::ws::protocol::ServerMessage;
use crate::ws::WsManager;

pub struct Broadcaster {
    ws_manager: Arc<WsManager>,
}

impl Broadcaster {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run until `cancel` fires or the event bus is dropped.
    ///
    /// Every event carries the whole catalog, so after a lag the next
    /// received event brings clients fully up to date.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<CatalogEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Broadcaster cancelled");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => self.forward(&event).await,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Broadcaster lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, broadcaster shutting down");
                        break;
                    }
                },
            }
        }
    }

    async fn forward(&self, event: &CatalogEvent) {
        let message = ServerMessage::data_update(&event.items).to_ws();
        tracing::debug!(
            event_type = event.event_type,
            item_id = event.item_id,
            items = event.items.len(),
            "Broadcasting catalog update"
        );
        self.ws_manager.broadcast(message).await;
    }
}

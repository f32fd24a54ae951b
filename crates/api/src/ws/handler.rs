use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::catalog;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws::manager::WsManager;
use crate::ws::protocol::{ClientMessage, ServerMessage};

/// HTTP handler that upgrades the connection to WebSocket.
///
/// Browsers cannot set headers on WebSocket requests, so the token normally
/// arrives as `?token=...`. After the upgrade the connection is registered
/// with `WsManager` and served by a sender task plus the receive loop.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    user: AuthUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, user))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Dispatches inbound messages on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, state: AppState, user: AuthUser) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, username = %user.username, "WebSocket connected");

    let ws_manager: Arc<WsManager> = Arc::clone(&state.ws_manager);
    let mut rx = ws_manager.add(conn_id.clone(), user.username).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let is_close = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() || is_close {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                dispatch(&state, &conn_id, text.as_str()).await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
}

/// Handle one text frame from a client.
///
/// `get_data` and failures are answered to the sender only. Successful
/// mutations reach every client (the sender included) through the event
/// bus broadcaster.
async fn dispatch(state: &AppState, conn_id: &str, text: &str) {
    let reply = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => {
            let kind = message_kind(&message);
            match apply(state, message).await {
                Ok(Some(items)) => Some(ServerMessage::data_update(&items).to_ws()),
                Ok(None) => None,
                Err(e) => {
                    tracing::info!(conn_id, kind, error = %e, "WebSocket request failed");
                    Some(ServerMessage::error(&e).to_ws())
                }
            }
        }
        Err(e) => {
            let err = AppError::BadRequest(format!("Malformed message: {e}"));
            Some(ServerMessage::error(&err).to_ws())
        }
    };

    if let Some(reply) = reply {
        state.ws_manager.send_to(conn_id, reply).await;
    }
}

/// Run a client request. Returns a catalog to send back to the requester,
/// if the request is answered directly rather than by broadcast.
async fn apply(
    state: &AppState,
    message: ClientMessage,
) -> AppResult<Option<Vec<skudesk_core::item::Item>>> {
    match message {
        ClientMessage::GetData => catalog::snapshot(state).await.map(Some),
        ClientMessage::ImportCsv { rows } => catalog::import_rows(state, &rows).await.map(|_| None),
        ClientMessage::UpdateDescription { id, description } => {
            catalog::update_description(state, id, description)
                .await
                .map(|_| None)
        }
        ClientMessage::RemovePhoto {
            id,
            file_full,
            file_thumb,
        } => catalog::remove_photo(state, id, &file_full, &file_thumb)
            .await
            .map(|_| None),
        ClientMessage::UpdatePhotoOrder { id, new_order } => {
            catalog::reorder_photos(state, id, &new_order)
                .await
                .map(|_| None)
        }
        ClientMessage::ClearData { pin } => catalog::clear(state, &pin).await.map(|_| None),
    }
}

fn message_kind(message: &ClientMessage) -> &'static str {
    match message {
        ClientMessage::GetData => "get_data",
        ClientMessage::ImportCsv { .. } => "import_csv",
        ClientMessage::UpdateDescription { .. } => "update_description",
        ClientMessage::RemovePhoto { .. } => "remove_photo",
        ClientMessage::UpdatePhotoOrder { .. } => "update_photo_order",
        ClientMessage::ClearData { .. } => "clear_data",
    }
}

//! End-to-end WebSocket tests against a real listener.
//!
//! Each test starts the full router plus the event broadcaster, then talks to
//! it with `tokio-tungstenite` clients the way the browser does.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::{import, put_json_auth, TestContext, TEST_PIN};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use skudesk_api::broadcast::Broadcaster;
use skudesk_core::catalog::append_photos;
use skudesk_core::item::Photo;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A running server bound to an ephemeral port.
struct Server {
    ctx: TestContext,
    addr: SocketAddr,
    cancel: CancellationToken,
}

impl Server {
    /// Seed the catalog with `rows`, then start serving. Seeding happens
    /// before the broadcaster subscribes, so clients never see that event.
    async fn start(rows: Value) -> Self {
        let ctx = TestContext::new().await;
        import(&ctx, rows).await;
        let cancel = CancellationToken::new();

        let broadcaster = Broadcaster::new(Arc::clone(&ctx.state.ws_manager));
        tokio::spawn(broadcaster.run(ctx.state.event_bus.subscribe(), cancel.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = ctx.app();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        Self { ctx, addr, cancel }
    }

    /// Connect and wait for the first `get_data` reply, which guarantees the
    /// connection is registered for broadcasts.
    async fn connect(&self) -> Client {
        let url = format!("ws://{}/api/v1/ws?token={}", self.addr, self.ctx.token);
        let (mut client, _) = connect_async(url.as_str()).await.expect("WebSocket connect");

        send(&mut client, json!({ "type": "get_data" })).await;
        let reply = recv(&mut client).await;
        assert_eq!(reply["type"], "data_update");
        client
    }

    /// Attach photos to item 1 straight through the store, files included.
    /// Store writes publish nothing, so connected clients stay quiet.
    async fn seed_photos(&self, names: &[&str]) {
        let photos: Vec<Photo> = names
            .iter()
            .map(|n| Photo::new(format!("{n}.jpg"), format!("thumb_{n}.jpg")))
            .collect();
        for photo in &photos {
            std::fs::write(self.ctx.upload_path(&photo.full), b"full").unwrap();
            std::fs::write(self.ctx.upload_path(&photo.thumb), b"thumb").unwrap();
        }
        self.ctx
            .state
            .catalog
            .update(|items| append_photos(items, 1, photos))
            .await
            .unwrap();
    }
}

fn photo_names(update: &Value) -> Vec<String> {
    update["data"][0]["photos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["full"].as_str().unwrap().to_string())
        .collect()
}

impl Drop for Server {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn send(client: &mut Client, message: Value) {
    client.send(Message::Text(message.to_string())).await.unwrap();
}

/// Next JSON text frame, skipping control frames.
async fn recv(client: &mut Client) -> Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match client.next().await.expect("stream open").expect("frame") {
                Message::Text(text) => {
                    let value: Value = serde_json::from_str(&text).unwrap();
                    return value;
                }
                Message::Ping(_) | Message::Pong(_) => continue,
                other => panic!("unexpected frame: {other:?}"),
            }
        }
    })
    .await
    .expect("message within timeout")
}

/// Assert no text frame arrives for a short while.
async fn assert_silent(client: &mut Client) {
    let next = tokio::time::timeout(Duration::from_millis(300), client.next()).await;
    assert!(next.is_err(), "expected no message, got: {next:?}");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connect_without_token_is_rejected() {
    let server = Server::start(json!([])).await;

    let url = format!("ws://{}/api/v1/ws", server.addr);
    let result = connect_async(url.as_str()).await;

    assert!(result.is_err(), "upgrade without a token must fail");
}

#[tokio::test]
async fn get_data_answers_only_the_requester() {
    let server = Server::start(json!([["A-1", "Lamp"]])).await;

    let mut alice = server.connect().await;
    let mut bob = server.connect().await;

    send(&mut alice, json!({ "type": "get_data" })).await;
    let reply = recv(&mut alice).await;
    assert_eq!(reply["type"], "data_update");
    assert_eq!(reply["data"][0]["sku"], "A-1");
    assert_eq!(reply["summary"]["total"], 1);

    assert_silent(&mut bob).await;
}

#[tokio::test]
async fn mutation_is_broadcast_to_every_client() {
    let server = Server::start(json!([["A-1", "Lamp"]])).await;

    let mut alice = server.connect().await;
    let mut bob = server.connect().await;

    send(
        &mut alice,
        json!({ "type": "update_description", "id": 1, "description": "Brass" }),
    )
    .await;

    for client in [&mut alice, &mut bob] {
        let update = recv(client).await;
        assert_eq!(update["type"], "data_update");
        assert_eq!(update["data"][0]["description"], "Brass");
    }
}

#[tokio::test]
async fn http_mutation_reaches_websocket_clients() {
    let server = Server::start(json!([["A-1", "Lamp"]])).await;

    let mut client = server.connect().await;

    let response = put_json_auth(
        server.ctx.app(),
        "/api/v1/items/1/description",
        &server.ctx.token,
        json!({ "description": "From HTTP" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let update = recv(&mut client).await;
    assert_eq!(update["data"][0]["description"], "From HTTP");
}

#[tokio::test]
async fn remove_photo_over_websocket() {
    let server = Server::start(json!([["A-1", "Lamp"]])).await;
    server.seed_photos(&["a", "b"]).await;

    let mut alice = server.connect().await;
    let mut bob = server.connect().await;

    send(
        &mut alice,
        json!({
            "type": "remove_photo",
            "id": 1,
            "file_full": "a.jpg",
            "file_thumb": "thumb_a.jpg"
        }),
    )
    .await;

    for client in [&mut alice, &mut bob] {
        let update = recv(client).await;
        assert_eq!(update["type"], "data_update");
        assert_eq!(photo_names(&update), ["b.jpg"]);
        assert_silent(client).await;
    }
    assert!(!server.ctx.upload_path("a.jpg").exists());
    assert!(!server.ctx.upload_path("thumb_a.jpg").exists());
}

#[tokio::test]
async fn update_photo_order_over_websocket() {
    let server = Server::start(json!([["A-1", "Lamp"]])).await;
    server.seed_photos(&["a", "b", "c"]).await;

    let mut alice = server.connect().await;
    let mut bob = server.connect().await;

    send(
        &mut alice,
        json!({ "type": "update_photo_order", "id": 1, "new_order": ["c.jpg", "a.jpg"] }),
    )
    .await;

    for client in [&mut alice, &mut bob] {
        let update = recv(client).await;
        assert_eq!(update["type"], "data_update");
        assert_eq!(photo_names(&update), ["c.jpg", "a.jpg", "b.jpg"]);
        assert_silent(client).await;
    }
    let stored = server.ctx.state.catalog.load().await.unwrap();
    assert_eq!(stored[0].photos[0].full, "c.jpg");
}

#[tokio::test]
async fn import_and_clear_over_websocket() {
    let server = Server::start(json!([])).await;
    let mut client = server.connect().await;

    send(
        &mut client,
        json!({ "type": "import_csv", "rows": [["A-1", "Lamp"], ["B-2", "Chair"]] }),
    )
    .await;
    let update = recv(&mut client).await;
    assert_eq!(update["data"].as_array().unwrap().len(), 2);
    assert_eq!(update["summary"]["empty"], 2);

    send(&mut client, json!({ "type": "clear_data", "pin": TEST_PIN })).await;
    let update = recv(&mut client).await;
    assert_eq!(update["data"], json!([]));
    assert!(server.ctx.state.catalog.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn errors_go_only_to_the_sender() {
    let server = Server::start(json!([["A-1", "Lamp"]])).await;

    let mut alice = server.connect().await;
    let mut bob = server.connect().await;

    send(
        &mut alice,
        json!({ "type": "update_description", "id": 42, "description": "x" }),
    )
    .await;
    let reply = recv(&mut alice).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["code"], "NOT_FOUND");

    send(&mut alice, json!({ "type": "clear_data", "pin": "0000" })).await;
    let reply = recv(&mut alice).await;
    assert_eq!(reply["code"], "UNAUTHORIZED");

    assert_silent(&mut bob).await;
    assert_eq!(server.ctx.state.catalog.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_message_is_reported() {
    let server = Server::start(json!([])).await;
    let mut client = server.connect().await;

    client.send(Message::Text("not json".to_string())).await.unwrap();
    let reply = recv(&mut client).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["code"], "BAD_REQUEST");

    send(&mut client, json!({ "type": "launch_rockets" })).await;
    let reply = recv(&mut client).await;
    assert_eq!(reply["code"], "BAD_REQUEST");
}

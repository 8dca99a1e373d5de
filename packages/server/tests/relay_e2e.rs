//! End-to-end tests: a real server on an ephemeral port, driven over WebSocket.

use std::{sync::Arc, time::Duration};

use akari_server::{
    domain::SharedState,
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::Server,
    usecase::{Relay, RelayDispatcher},
};
use akari_shared::time::SystemClock;
use axum::http::HeaderValue;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{net::TcpStream, time::timeout};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Start a server with the given initial state and return its address
async fn start_server(initial_state: SharedState) -> String {
    let relay = Relay::new(
        initial_state,
        Arc::new(WebSocketMessagePusher::new()),
        Arc::new(SystemClock),
    );
    let (handle, _task) = RelayDispatcher::spawn(relay);
    let server = Server::new(handle, HeaderValue::from_static(ALLOWED_ORIGIN));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(server.serve(listener, std::future::pending()));
    addr
}

async fn connect(addr: &str) -> Client {
    let (stream, _response) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    stream
}

/// Next text frame as JSON, skipping control frames
async fn recv_json(client: &mut Client) -> Value {
    loop {
        let msg = timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Assert that nothing arrives within a short window
async fn assert_silent(client: &mut Client) {
    let result = timeout(Duration::from_millis(200), client.next()).await;
    assert!(result.is_err(), "unexpected message: {:?}", result);
}

async fn send_update(client: &mut Client, payload: Value) {
    let frame = json!({"type": "roomUpdate", "payload": payload}).to_string();
    client.send(Message::Text(frame.into())).await.unwrap();
}

fn default_state() -> Value {
    json!({
        "bedroom": {"light1": false, "light2": false},
        "kitchen": {"light1": false, "light2": false},
    })
}

#[tokio::test]
async fn test_concrete_scenario_two_clients() {
    // テスト項目: A の更新が後から接続した B に同期され、以降の更新は A と B の両方に届く
    // given (前提条件):
    let addr = start_server(SharedState::default()).await;
    let mut alice = connect(&addr).await;
    assert_eq!(
        recv_json(&mut alice).await,
        json!({"type": "initialState", "payload": default_state()})
    );

    // when (操作): A が kitchen.light1 = true の全体状態を送信
    let mut updated = default_state();
    updated["kitchen"]["light1"] = json!(true);
    send_update(&mut alice, updated.clone()).await;
    assert_eq!(
        recv_json(&mut alice).await,
        json!({"type": "roomUpdate", "payload": updated})
    );
    let mut bob = connect(&addr).await;

    // then (期待する結果):
    assert_eq!(
        recv_json(&mut bob).await,
        json!({"type": "initialState", "payload": updated})
    );

    let mut next = updated.clone();
    next["bedroom"]["light2"] = json!(true);
    send_update(&mut bob, next.clone()).await;
    let expected = json!({"type": "roomUpdate", "payload": next});
    assert_eq!(recv_json(&mut alice).await, expected);
    assert_eq!(recv_json(&mut bob).await, expected);
}

#[tokio::test]
async fn test_payload_passthrough_to_new_client() {
    // テスト項目: 任意のペイロードが加工されずに新しいクライアントへ渡される
    // given (前提条件):
    let addr = start_server(SharedState::default()).await;
    let mut publisher = connect(&addr).await;
    let _ = recv_json(&mut publisher).await;
    let payload = json!({
        "bedroom": {"light1": true, "light2": false},
        "kitchen": {"light1": false, "light2": true},
    });

    // when (操作):
    send_update(&mut publisher, payload.clone()).await;
    let _ = recv_json(&mut publisher).await;
    let mut newcomer = connect(&addr).await;

    // then (期待する結果):
    assert_eq!(
        recv_json(&mut newcomer).await,
        json!({"type": "initialState", "payload": payload})
    );
}

#[tokio::test]
async fn test_disconnect_does_not_broadcast_or_mutate() {
    // テスト項目: 切断は状態を変えず、残りのクライアントに何も送られない
    // given (前提条件):
    let addr = start_server(SharedState::new(json!({"x": 1}))).await;
    let mut stayer = connect(&addr).await;
    let _ = recv_json(&mut stayer).await;
    let mut leaver = connect(&addr).await;
    let _ = recv_json(&mut leaver).await;

    // when (操作):
    leaver.close(None).await.unwrap();
    drop(leaver);

    // then (期待する結果):
    assert_silent(&mut stayer).await;
    let state: Value = reqwest::get(format!("http://{}/debug/state", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state, json!({"x": 1}));
}

#[tokio::test]
async fn test_invalid_frames_are_ignored() {
    // テスト項目: 不正なフレームは無視され、接続と状態は維持される
    // given (前提条件):
    let addr = start_server(SharedState::default()).await;
    let mut client = connect(&addr).await;
    let _ = recv_json(&mut client).await;

    // when (操作):
    client
        .send(Message::Text("not json".to_string().into()))
        .await
        .unwrap();
    client
        .send(Message::Text(r#"{"type":"chat","payload":1}"#.to_string().into()))
        .await
        .unwrap();

    // then (期待する結果):
    assert_silent(&mut client).await;
    send_update(&mut client, json!(null)).await;
    assert_eq!(
        recv_json(&mut client).await,
        json!({"type": "roomUpdate", "payload": null})
    );
}

#[tokio::test]
async fn test_health_and_connections_endpoints() {
    // テスト項目: ヘルスチェックと接続一覧のエンドポイントが応答する
    // given (前提条件):
    let addr = start_server(SharedState::default()).await;
    let mut client = connect(&addr).await;
    let _ = recv_json(&mut client).await;

    // when (操作):
    let health: Value = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let connections: Value = reqwest::get(format!("http://{}/debug/connections", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health, json!({"status": "ok"}));
    let connections = connections.as_array().unwrap();
    assert_eq!(connections.len(), 1);
    assert!(connections[0]["id"].is_string());
    assert!(connections[0]["connectedAt"].is_string());
}

#[tokio::test]
async fn test_cors_headers() {
    // テスト項目: HTTP は任意のオリジン、WebSocket は設定されたオリジンを許可する
    // given (前提条件):
    let addr = start_server(SharedState::default()).await;
    let http = reqwest::Client::new();

    // when (操作):
    let api = http
        .get(format!("http://{}/api/health", addr))
        .header("Origin", "http://somewhere.example")
        .send()
        .await
        .unwrap();
    let preflight = http
        .request(reqwest::Method::OPTIONS, format!("http://{}/ws", addr))
        .header("Origin", ALLOWED_ORIGIN)
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(
        api.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    assert_eq!(
        preflight
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ALLOWED_ORIGIN)
    );
    let methods = preflight
        .headers()
        .get("access-control-allow-methods")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(methods.contains("GET"));
    assert!(methods.contains("POST"));
}

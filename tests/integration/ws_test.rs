//! Integration tests for the live channel and health endpoints.

mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use repairdesk_api::build_app;
use repairdesk_entity::user::UserRole;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Serve the app on an ephemeral port and return its address.
async fn serve(app: &helpers::TestApp) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_app(app.state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr.to_string()
}

async fn connect(app: &helpers::TestApp, addr: &str, user: &helpers::TestUser) -> Client {
    let url = format!("ws://{addr}/ws?access_token={}", user.token);
    let (client, _) = connect_async(url.as_str()).await.unwrap();

    // Registration happens on the server after the handshake completes.
    for _ in 0..50 {
        if app.state.realtime.connections.is_user_connected(&user.username) {
            return client;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{} never registered", user.username);
}

/// Next JSON text frame, skipping transport pings.
async fn next_json(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Stream ended")
            .expect("Frame error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

#[tokio::test]
async fn test_ws_upgrade_without_token() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/ws", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/ws?access_token=forged", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ws_handshake_rejects_bad_token() {
    let app = helpers::TestApp::new().await;
    let addr = serve(&app).await;

    let result = connect_async(format!("ws://{addr}/ws?access_token=forged").as_str()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_assignment_is_pushed_to_maintainer() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
    let addr = serve(&app).await;
    let mut client = connect(&app, &addr, &wang).await;

    let order_id = app.create_order(&li, "空调不制冷").await;
    let response = app
        .request(
            "POST",
            &format!("/api/orders/{order_id}/assign"),
            Some(json!({ "maintainerId": wang.id })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let pushed = next_json(&mut client).await;
    assert_eq!(pushed["type"], "receive_notification");
    assert_eq!(pushed["message"], "您有新的工单待处理：空调不制冷");
    assert_eq!(pushed["data"]["orderId"], order_id);
    assert_eq!(pushed["data"]["title"], "📢 新工单通知");
}

#[tokio::test]
async fn test_every_connection_of_a_user_receives() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    let addr = serve(&app).await;
    let mut phone = connect(&app, &addr, &admin).await;
    let mut laptop = connect(&app, &addr, &admin).await;

    let order_id = app.create_order(&li, "水管爆了").await;

    for client in [&mut phone, &mut laptop] {
        let pushed = next_json(client).await;
        assert_eq!(pushed["data"]["orderId"], order_id);
        assert_eq!(pushed["message"], "li 提交了新工单：水管爆了");
    }
}

#[tokio::test]
async fn test_ping_gets_pong() {
    let app = helpers::TestApp::new().await;
    let li = app.create_user("li", UserRole::Student).await;
    let addr = serve(&app).await;
    let mut client = connect(&app, &addr, &li).await;

    client
        .send(Message::Text(json!({ "type": "ping" }).to_string().into()))
        .await
        .unwrap();
    let reply = next_json(&mut client).await;
    assert_eq!(reply["type"], "pong");
    assert!(reply["timestamp"].as_i64().unwrap() > 0);

    client
        .send(Message::Text("not json".to_string().into()))
        .await
        .unwrap();
    let reply = next_json(&mut client).await;
    assert_eq!(reply["type"], "error");
}

#[tokio::test]
async fn test_disconnect_unregisters() {
    let app = helpers::TestApp::new().await;
    let li = app.create_user("li", UserRole::Student).await;
    let addr = serve(&app).await;
    let mut client = connect(&app, &addr, &li).await;

    client.close(None).await.unwrap();

    for _ in 0..50 {
        if !app.state.realtime.connections.is_user_connected("li") {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("connection still registered after close");
}

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert!(response.data()["version"].is_string());
}

#[tokio::test]
async fn test_detailed_health_check() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/health/detailed", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["database"], "connected");
    assert_eq!(response.data()["cache"], "connected");
    assert_eq!(response.data()["wsConnections"], 0);
}

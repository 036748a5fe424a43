//! Integration tests for the notification inbox.

mod helpers;

use axum::http::StatusCode;
use serde_json::Value;

use repairdesk_entity::user::UserRole;

async fn inbox(app: &helpers::TestApp, user: &helpers::TestUser, query: &str) -> Vec<Value> {
    let response = app
        .request(
            "GET",
            &format!("/api/notifications{query}"),
            None,
            Some(&user.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.data()["items"].as_array().unwrap().clone()
}

#[tokio::test]
async fn test_unread_count_and_mark_read() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    app.create_order(&li, "灯不亮").await;
    app.create_order(&li, "门坏了").await;

    let items = inbox(&app, &admin, "").await;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|n| n["isRead"] == false));

    let first = items[0]["id"].as_i64().unwrap();
    let response = app
        .request(
            "PUT",
            &format!("/api/notifications/{first}/read"),
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["isRead"], true);
    assert!(!response.data()["readAt"].is_null());

    let response = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.data()["count"], 1);

    let unread = inbox(&app, &admin, "?isRead=false").await;
    assert_eq!(unread.len(), 1);
    assert_ne!(unread[0]["id"], first);

    let read = inbox(&app, &admin, "?isRead=true").await;
    assert_eq!(read.len(), 1);
    assert_eq!(read[0]["id"], first);
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    app.create_order(&li, "水管爆了").await;

    let id = inbox(&app, &admin, "").await[0]["id"].as_i64().unwrap();
    let path = format!("/api/notifications/{id}/read");

    let first = app.request("PUT", &path, None, Some(&admin.token)).await;
    let second = app.request("PUT", &path, None, Some(&admin.token)).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(first.data()["readAt"], second.data()["readAt"]);
}

#[tokio::test]
async fn test_mark_all_read() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    for title in ["一", "二", "三"] {
        app.create_order(&li, title).await;
    }

    let response = app
        .request("PUT", "/api/notifications/read-all", None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["count"], 3);

    let response = app
        .request("PUT", "/api/notifications/read-all", None, Some(&admin.token))
        .await;
    assert_eq!(response.data()["count"], 0);
    assert!(inbox(&app, &admin, "?isRead=false").await.is_empty());
}

#[tokio::test]
async fn test_inbox_is_private() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    app.create_order(&li, "空调坏了").await;

    let id = inbox(&app, &admin, "").await[0]["id"].as_i64().unwrap();
    assert!(inbox(&app, &li, "").await.is_empty());

    let response = app
        .request(
            "PUT",
            &format!("/api/notifications/{id}/read"),
            None,
            Some(&li.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "DELETE",
            &format!("/api/notifications/{id}"),
            None,
            Some(&li.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request(
            "DELETE",
            &format!("/api/notifications/{id}"),
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(inbox(&app, &admin, "").await.is_empty());
}

#[tokio::test]
async fn test_inbox_pagination() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    for i in 0..5 {
        app.create_order(&li, &format!("工单{i}")).await;
    }

    let response = app
        .request(
            "GET",
            "/api/notifications?page=2&pageSize=2",
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total"], 5);
    assert_eq!(response.data()["totalPages"], 3);
    assert_eq!(response.data()["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_inbox_requires_token() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("GET", "/api/notifications/unread-count", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

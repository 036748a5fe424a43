//! Integration tests for the stalled-order sweep.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use repairdesk_core::config::SweeperConfig;
use repairdesk_entity::user::UserRole;
use repairdesk_worker::TimeoutSweeper;

fn sweeper(app: &helpers::TestApp) -> TimeoutSweeper {
    TimeoutSweeper::new(
        app.state.stores.orders.clone(),
        app.state.stores.users.clone(),
        app.state.notification_service.clone(),
        &SweeperConfig {
            threshold_hours: 24,
            ..Default::default()
        },
    )
    .unwrap()
}

async fn timeout_messages(app: &helpers::TestApp, user: &helpers::TestUser) -> Vec<String> {
    let response = app
        .request(
            "GET",
            "/api/notifications?pageSize=100",
            None,
            Some(&user.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.data()["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["type"] == "OrderTimeout")
        .map(|n| n["message"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_stalled_order_reaches_admin_inbox() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    let stale = app.create_order(&li, "暖气不热").await;
    let fresh = app.create_order(&li, "灯不亮").await;
    app.backdate_order(stale, 50).await;
    app.backdate_order(fresh, 2).await;

    let summary = sweeper(&app).check_timeout_orders().await.unwrap();
    assert_eq!(summary.stalled, 1);
    assert_eq!(summary.notified, 1);
    assert_eq!(summary.failed, 0);

    let messages = timeout_messages(&app, &admin).await;
    assert_eq!(messages, vec![format!("工单 #{stale}「暖气不热」已超时2天未处理！")]);
    assert!(timeout_messages(&app, &li).await.is_empty());
}

#[tokio::test]
async fn test_under_two_days_reports_hours() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "门锁坏了").await;
    app.backdate_order(order_id, 30).await;

    sweeper(&app).check_timeout_orders().await.unwrap();

    let messages = timeout_messages(&app, &admin).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with(&format!("工单 #{order_id}「门锁坏了」已超时30.")));
    assert!(messages[0].ends_with("小时未处理！"));
}

#[tokio::test]
async fn test_picked_up_orders_are_skipped() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "网络断了").await;
    app.backdate_order(order_id, 72).await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Processing" })),
            Some(&wang.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let summary = sweeper(&app).check_timeout_orders().await.unwrap();
    assert_eq!(summary.stalled, 0);
    assert!(timeout_messages(&app, &admin).await.is_empty());
}

#[tokio::test]
async fn test_every_run_reminds_again() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "马桶堵了").await;
    app.backdate_order(order_id, 100).await;

    let sweeper = sweeper(&app);
    sweeper.check_timeout_orders().await.unwrap();
    sweeper.check_timeout_orders().await.unwrap();

    assert_eq!(timeout_messages(&app, &admin).await.len(), 2);
}

#[tokio::test]
async fn test_no_admins_means_no_notifications() {
    let app = helpers::TestApp::new().await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "窗户漏风").await;
    app.backdate_order(order_id, 49).await;

    let summary = sweeper(&app).check_timeout_orders().await.unwrap();
    assert_eq!(summary.stalled, 1);
    assert_eq!(summary.notified, 0);
}

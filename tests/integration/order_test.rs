//! Integration tests for the order lifecycle over HTTP.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use repairdesk_entity::user::UserRole;

async fn unread(app: &helpers::TestApp, user: &helpers::TestUser) -> u64 {
    let response = app
        .request(
            "GET",
            "/api/notifications/unread-count",
            None,
            Some(&user.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    response.data()["count"].as_u64().unwrap()
}

#[tokio::test]
async fn test_create_notifies_every_admin() {
    let app = helpers::TestApp::new().await;
    let admin1 = app.create_user("admin1", UserRole::Admin).await;
    let admin2 = app.create_user("admin2", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;

    let order_id = app.create_order(&li, "水龙头漏水").await;

    for admin in [&admin1, &admin2] {
        let response = app
            .request("GET", "/api/notifications", None, Some(&admin.token))
            .await;
        let items = response.data()["items"].as_array().unwrap().clone();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["type"], "OrderCreated");
        assert_eq!(items[0]["relatedOrderId"], order_id);
        assert_eq!(items[0]["message"], "li 提交了新工单：水龙头漏水");
    }
    assert_eq!(unread(&app, &wang).await, 0);
}

#[tokio::test]
async fn test_create_with_image_returns_url() {
    let app = helpers::TestApp::new().await;
    let li = app.create_user("li", UserRole::Student).await;

    let response = app
        .request(
            "POST",
            "/api/orders",
            Some(json!({
                "title": "窗户破了",
                "description": "玻璃裂开",
                "location": "5号楼 101",
                "imageExtension": ".JPG",
            })),
            Some(&li.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let url = response.data()["imageUrl"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".jpg"));
}

#[tokio::test]
async fn test_create_rejects_blank_title() {
    let app = helpers::TestApp::new().await;
    let li = app.create_user("li", UserRole::Student).await;

    let response = app
        .request(
            "POST",
            "/api/orders",
            Some(json!({
                "title": "   ",
                "description": "描述",
                "location": "3号楼",
            })),
            Some(&li.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/orders", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request("GET", "/api/orders", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_role_has_no_permissions() {
    let app = helpers::TestApp::new().await;
    let token = app.token(99, "ghost", "Janitor");

    let response = app.request("GET", "/api/orders", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_full_lifecycle() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
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
    assert_eq!(response.data()["assignedTo"], wang.id);
    assert_eq!(response.data()["status"], "Pending");
    assert_eq!(unread(&app, &wang).await, 1);

    let response = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Processing" })),
            Some(&wang.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "Processing");

    let response = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Completed" })),
            Some(&wang.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "Completed");

    let response = app
        .request("GET", "/api/notifications", None, Some(&li.token))
        .await;
    let messages: Vec<String> = response.data()["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["message"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(messages.len(), 2);
    assert!(messages.contains(&"您的工单「空调不制冷」状态已更新为：Completed".to_string()));
    assert!(messages.contains(&"您的工单「空调不制冷」状态已更新为：Processing".to_string()));

    let response = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Processing" })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn test_cannot_skip_processing() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "门锁坏了").await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Completed", "assignTo": wang.id })),
            Some(&admin.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::PRECONDITION_FAILED);
    assert_eq!(response.body["error"], "PRECONDITION_FAILED");
}

#[tokio::test]
async fn test_admin_must_name_maintainer_for_unassigned_order() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "床板断了").await;
    let path = format!("/api/orders/{order_id}/status");

    let response = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "status": "Processing" })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::PRECONDITION_FAILED);

    let response = app
        .request(
            "PATCH",
            &path,
            Some(json!({ "status": "Processing", "assignTo": wang.id })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["assignedTo"], wang.id);
    assert_eq!(response.data()["status"], "Processing");
    assert_eq!(unread(&app, &wang).await, 1);
    assert_eq!(unread(&app, &li).await, 1);
}

#[tokio::test]
async fn test_maintainer_picks_up_unassigned_order() {
    let app = helpers::TestApp::new().await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "暖气漏水").await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Processing" })),
            Some(&wang.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["assignedTo"], wang.id);
}

#[tokio::test]
async fn test_only_assignee_may_update() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let zhao = app.create_user("zhao", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "插座没电").await;

    app.request(
        "POST",
        &format!("/api/orders/{order_id}/assign"),
        Some(json!({ "maintainerId": wang.id })),
        Some(&admin.token),
    )
    .await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Processing" })),
            Some(&zhao.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_student_cannot_touch_other_students_order() {
    let app = helpers::TestApp::new().await;
    let li = app.create_user("li", UserRole::Student).await;
    let zhang = app.create_user("zhang", UserRole::Student).await;
    let order_id = app.create_order(&li, "衣柜门掉了").await;

    let response = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Processing" })),
            Some(&zhang.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "GET",
            &format!("/api/orders/{order_id}"),
            None,
            Some(&zhang.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // The owner gets past the ownership check but not the assignment rule.
    let response = app
        .request(
            "PATCH",
            &format!("/api/orders/{order_id}/status"),
            Some(json!({ "status": "Processing" })),
            Some(&li.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn test_assign_twice_requires_reassign() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let zhao = app.create_user("zhao", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "热水器坏了").await;
    let assign = format!("/api/orders/{order_id}/assign");

    let response = app
        .request(
            "POST",
            &assign,
            Some(json!({ "maintainerId": wang.id })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            &assign,
            Some(json!({ "maintainerId": zhao.id })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::PRECONDITION_FAILED);

    let response = app
        .request(
            "PUT",
            &format!("/api/orders/{order_id}/reassign"),
            Some(json!({ "maintainerId": zhao.id })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["assignedTo"], zhao.id);

    let response = app
        .request("GET", "/api/notifications", None, Some(&zhao.token))
        .await;
    let items = response.data()["items"].as_array().unwrap().clone();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["type"], "OrderReassigned");
}

#[tokio::test]
async fn test_assign_rejects_non_maintainer() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "风扇不转").await;

    let response = app
        .request(
            "POST",
            &format!("/api/orders/{order_id}/assign"),
            Some(json!({ "maintainerId": li.id })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .request(
            "POST",
            &format!("/api/orders/{order_id}/assign"),
            Some(json!({ "maintainerId": 4242 })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reassign_is_admin_only() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let manager = app.create_user("zhou", UserRole::Manager).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let zhao = app.create_user("zhao", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "网络断了").await;

    let response = app
        .request(
            "POST",
            &format!("/api/orders/{order_id}/assign"),
            Some(json!({ "maintainerId": wang.id })),
            Some(&manager.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "PUT",
            &format!("/api/orders/{order_id}/reassign"),
            Some(json!({ "maintainerId": zhao.id })),
            Some(&manager.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "PUT",
            &format!("/api/orders/{order_id}/reassign"),
            Some(json!({ "maintainerId": zhao.id })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_reassign_unassigned_order_fails() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "马桶堵了").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/orders/{order_id}/reassign"),
            Some(json!({ "maintainerId": wang.id })),
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::PRECONDITION_FAILED);
}

#[tokio::test]
async fn test_delete_cascades_notifications() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    let keep = app.create_order(&li, "台灯坏了").await;
    let gone = app.create_order(&li, "椅子坏了").await;
    assert_eq!(unread(&app, &admin).await, 2);

    let response = app
        .request(
            "DELETE",
            &format!("/api/orders/{gone}"),
            None,
            Some(&li.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "DELETE",
            &format!("/api/orders/{gone}"),
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/notifications", None, Some(&admin.token))
        .await;
    let items = response.data()["items"].as_array().unwrap().clone();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["relatedOrderId"], keep);

    let response = app
        .request("GET", &format!("/api/orders/{gone}"), None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_student_lists_only_own_orders() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    let zhang = app.create_user("zhang", UserRole::Student).await;
    app.create_order(&li, "灯不亮").await;
    app.create_order(&zhang, "门坏了").await;
    app.create_order(&zhang, "窗坏了").await;

    let response = app.request("GET", "/api/orders", None, Some(&li.token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total"], 1);
    assert_eq!(response.data()["items"][0]["creator"], "li");

    let response = app
        .request("GET", "/api/orders", None, Some(&admin.token))
        .await;
    assert_eq!(response.data()["total"], 3);
}

#[tokio::test]
async fn test_listing_sees_new_orders_after_write() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let li = app.create_user("li", UserRole::Student).await;
    app.create_order(&li, "一号").await;

    let response = app
        .request("GET", "/api/orders", None, Some(&admin.token))
        .await;
    assert_eq!(response.data()["total"], 1);

    app.create_order(&li, "二号").await;
    let response = app
        .request("GET", "/api/orders", None, Some(&admin.token))
        .await;
    assert_eq!(response.data()["total"], 2);
}

#[tokio::test]
async fn test_assigned_to_me_and_status_filters() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
    let mine = app.create_order(&li, "分给王师傅").await;
    app.create_order(&li, "没人接").await;

    app.request(
        "POST",
        &format!("/api/orders/{mine}/assign"),
        Some(json!({ "maintainerId": wang.id })),
        Some(&admin.token),
    )
    .await;

    let response = app
        .request(
            "GET",
            "/api/orders?assignedToMe=true",
            None,
            Some(&wang.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total"], 1);
    assert_eq!(response.data()["items"][0]["id"], mine);

    app.request(
        "PATCH",
        &format!("/api/orders/{mine}/status"),
        Some(json!({ "status": "Processing" })),
        Some(&wang.token),
    )
    .await;

    let response = app
        .request(
            "GET",
            "/api/orders?status=Pending",
            None,
            Some(&admin.token),
        )
        .await;
    assert_eq!(response.data()["total"], 1);
    assert_eq!(response.data()["items"][0]["title"], "没人接");
}

#[tokio::test]
async fn test_detail_resolves_assignee_name() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;
    let order_id = app.create_order(&li, "洗衣机坏了").await;

    let response = app
        .request("GET", &format!("/api/orders/{order_id}"), None, Some(&li.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.data()["assignedToName"].is_null());

    app.request(
        "POST",
        &format!("/api/orders/{order_id}/assign"),
        Some(json!({ "maintainerId": wang.id })),
        Some(&admin.token),
    )
    .await;

    let response = app
        .request("GET", &format!("/api/orders/{order_id}"), None, Some(&li.token))
        .await;
    assert_eq!(response.data()["assignedToName"], "wang");
    assert_eq!(response.data()["title"], "洗衣机坏了");
}

#[tokio::test]
async fn test_maintainer_roster() {
    let app = helpers::TestApp::new().await;
    let admin = app.create_user("admin", UserRole::Admin).await;
    let wang = app.create_user("wang", UserRole::Maintainer).await;
    let zhao = app.create_user("zhao", UserRole::Maintainer).await;
    let li = app.create_user("li", UserRole::Student).await;

    let response = app
        .request("GET", "/api/orders/maintainers", None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data().as_array().unwrap().len(), 2);

    // Served from cache until the roster key is dropped.
    app.store.set_user_active(zhao.id, false).await.unwrap();
    let response = app
        .request("GET", "/api/orders/maintainers", None, Some(&admin.token))
        .await;
    assert_eq!(response.data().as_array().unwrap().len(), 2);

    app.state.order_service.invalidate_maintainer_roster().await;
    let response = app
        .request("GET", "/api/orders/maintainers", None, Some(&admin.token))
        .await;
    let roster = response.data().as_array().unwrap().clone();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["id"], wang.id);
    assert_eq!(roster[0]["username"], "wang");

    let response = app
        .request("GET", "/api/orders/maintainers", None, Some(&li.token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

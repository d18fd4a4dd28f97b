//! Order lifecycle, auth gating and the public widget surface.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn orders_get_a_formatted_sequence_number() {
    let app = TestApp::new().await;

    let (status, first) = app
        .post(
            "/api/orders",
            Some(&app.manager_token),
            json!({ "customerName": "ACME LLC", "prepaymentAmount": 20 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["number"].as_str(), Some("ORD-0001"));
    assert_eq!(first["status"], 1);
    assert_eq!(first["customerName"].as_str(), Some("ACME LLC"));

    let (_, second) = app
        .post("/api/orders", Some(&app.manager_token), json!({}))
        .await;
    assert_eq!(second["number"].as_str(), Some("ORD-0002"));
}

#[tokio::test]
async fn requests_without_a_token_are_unauthorized() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/orders", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/orders", Some("not-a-real-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // the widget surface stays open
    let (status, _) = app.get("/api/presets", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/calculators/flyers-color", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn prepayment_flow_reaches_paid_through_the_webhook() {
    let app = TestApp::new().await;

    let (_, order) = app
        .post("/api/orders", Some(&app.manager_token), json!({}))
        .await;
    let order_id = order["id"].as_i64().expect("order id");

    // no amount anywhere: rejected
    let (status, _) = app
        .post(
            &format!("/api/orders/{order_id}/prepay"),
            None,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, paid_order) = app
        .post(
            &format!("/api/orders/{order_id}/prepay"),
            None,
            json!({ "amount": 30 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paid_order["prepaymentStatus"].as_str(), Some("pending"));
    let payment_id = paid_order["paymentId"].as_str().expect("payment id");
    assert!(paid_order["paymentUrl"]
        .as_str()
        .expect("payment url")
        .contains(payment_id));

    let (status, _) = app
        .post(
            "/api/webhooks/bepaid",
            None,
            json!({ "payment_id": payment_id, "status": "paid" }),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, orders) = app.get("/api/orders", Some(&app.manager_token)).await;
    assert_eq!(orders[0]["prepaymentStatus"].as_str(), Some("paid"));

    // a webhook without a payment id is invalid
    let (status, _) = app
        .post("/api/webhooks/bepaid", None, json!({ "status": "paid" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicating_an_order_copies_items_without_touching_stock() {
    let app = TestApp::new().await;
    let paper = app.seed_material("Paper A4", 100.0, None).await;
    app.seed_recipe("Flyers", "Flyers A6, 4+0", paper, 5.0).await;

    let (_, order) = app
        .post("/api/orders", Some(&app.manager_token), json!({}))
        .await;
    let order_id = order["id"].as_i64().expect("order id");
    app.post(
        &format!("/api/orders/{order_id}/items"),
        Some(&app.manager_token),
        json!({
            "type": "Flyers",
            "params": { "description": "Flyers A6, 4+0" },
            "price": 25
        }),
    )
    .await;
    assert_eq!(app.material_quantity(paper).await, 95.0);

    let (status, copy) = app
        .post(
            &format!("/api/orders/{order_id}/duplicate"),
            Some(&app.manager_token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(copy["number"]
        .as_str()
        .expect("copy number")
        .contains("-COPY-"));
    assert_eq!(copy["items"].as_array().map(Vec::len), Some(1));
    assert!(copy["prepaymentStatus"].is_null());

    // the copy is bookkeeping only: stock unchanged, ledger untouched
    assert_eq!(app.material_quantity(paper).await, 95.0);
    assert_eq!(app.moves_for(paper).await.len(), 1);
}

#[tokio::test]
async fn material_administration_is_role_gated() {
    let app = TestApp::new().await;

    let body = json!({ "name": "Laminate film", "unit": "sheet", "quantity": 100 });
    let (status, _) = app
        .post("/api/materials", Some(&app.manager_token), body.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, list) = app
        .post("/api/materials", Some(&app.admin_token), body.clone())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    // duplicate name conflicts
    let (status, _) = app
        .post("/api/materials", Some(&app.admin_token), body)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // reading is open to any authenticated user
    let (status, materials) = app.get("/api/materials", Some(&app.manager_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(materials[0]["name"].as_str(), Some("Laminate film"));
}

#[tokio::test]
async fn manual_spend_writes_the_ledger() {
    let app = TestApp::new().await;
    let paper = app.seed_material("Paper A4", 100.0, None).await;

    let (status, _) = app
        .post(
            "/api/materials/spend",
            Some(&app.manager_token),
            json!({ "materialId": paper, "delta": -5 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, material) = app
        .post(
            "/api/materials/spend",
            Some(&app.admin_token),
            json!({ "materialId": paper, "delta": -5, "reason": "damaged in storage" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(material["quantity"], 95.0);

    let (status, moves) = app
        .get(
            &format!("/api/materials/moves?materialId={paper}"),
            Some(&app.manager_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moves.as_array().map(Vec::len), Some(1));
    assert_eq!(moves[0]["delta"], -5.0);
    assert_eq!(moves[0]["reason"].as_str(), Some("damaged in storage"));
    assert_eq!(moves[0]["material_name"].as_str(), Some("Paper A4"));

    // filtering by another order id matches nothing
    let (_, filtered) = app
        .get(
            &format!("/api/materials/moves?materialId={paper}&orderId=999"),
            Some(&app.manager_token),
        )
        .await;
    assert!(filtered.as_array().expect("array").is_empty());
}

#[tokio::test]
async fn low_stock_and_forecast_track_the_floor() {
    let app = TestApp::new().await;
    app.seed_material("Plenty", 100.0, Some(10.0)).await;
    let scarce = app.seed_material("Scarce", 4.0, Some(10.0)).await;

    let (status, low) = app
        .get("/api/materials/low-stock", Some(&app.manager_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    let low = low.as_array().expect("array");
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["id"].as_i64(), Some(i64::from(scarce)));

    let (status, forecast) = app
        .get("/api/materials/report/forecast", Some(&app.manager_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(forecast[0]["name"].as_str(), Some("Scarce"));
    assert_eq!(forecast[0]["suggested_order"], 2.0);
}

#[tokio::test]
async fn me_and_users_reflect_the_token() {
    let app = TestApp::new().await;

    let (status, me) = app.get("/api/me", Some(&app.manager_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"].as_str(), Some("Manager"));
    assert_eq!(me["role"].as_str(), Some("manager"));

    let (status, users) = app.get("/api/users", Some(&app.manager_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn daily_summary_aggregates_the_day() {
    let app = TestApp::new().await;
    let paper = app.seed_material("Paper A4", 100.0, None).await;
    app.seed_recipe("Flyers", "Flyers A6, 4+0", paper, 1.0).await;

    let (_, order) = app
        .post(
            "/api/orders",
            Some(&app.manager_token),
            json!({ "prepaymentAmount": 10 }),
        )
        .await;
    let order_id = order["id"].as_i64().expect("order id");
    app.post(
        &format!("/api/orders/{order_id}/items"),
        Some(&app.manager_token),
        json!({
            "type": "Flyers",
            "params": { "description": "Flyers A6, 4+0" },
            "price": 2,
            "quantity": 3,
            "sides": 2,
            "sheets": 4,
            "waste": 1
        }),
    )
    .await;

    let today = common::today();
    let (status, summary) = app
        .get(
            &format!("/api/reports/daily/{today}/summary"),
            Some(&app.manager_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["orders_count"], 1);
    assert_eq!(summary["total_revenue"], 6.0);
    assert_eq!(summary["items_qty"], 3);
    assert_eq!(summary["total_clicks"], 16);
    assert_eq!(summary["total_sheets"], 4);
    assert_eq!(summary["total_waste"], 1);
    assert_eq!(summary["prepayment"]["pending_amount"], 10.0);
    assert_eq!(
        summary["materials_spent_top"][0]["material_name"].as_str(),
        Some("Paper A4")
    );
    assert_eq!(summary["materials_spent_top"][0]["spent"], 3.0);
}

#[tokio::test]
async fn order_status_updates_and_recipe_endpoints_work() {
    let app = TestApp::new().await;
    let paper = app.seed_material("Paper A4", 100.0, None).await;

    let (_, order) = app
        .post("/api/orders", Some(&app.manager_token), json!({}))
        .await;
    let order_id = order["id"].as_i64().expect("order id");

    let (status, updated) = app
        .request(
            Method::PUT,
            &format!("/api/orders/{order_id}/status"),
            Some(&app.manager_token),
            Some(json!({ "status": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], 3);

    // recipe write is admin-only, read is authenticated
    let recipe = json!({
        "presetCategory": "Flyers",
        "presetDescription": "Flyers A6, 4+0",
        "materials": [{ "materialId": paper, "qtyPerItem": 0.13 }]
    });
    let (status, _) = app
        .post(
            "/api/product-materials",
            Some(&app.manager_token),
            recipe.clone(),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post("/api/product-materials", Some(&app.admin_token), recipe)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, rows) = app
        .get(
            "/api/product-materials/Flyers/Flyers%20A6%2C%204%2B0",
            Some(&app.manager_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows[0]["materialId"].as_i64(), Some(i64::from(paper)));
    assert_eq!(rows[0]["qtyPerItem"], 0.13);
    assert_eq!(rows[0]["quantity"], 100.0);
}

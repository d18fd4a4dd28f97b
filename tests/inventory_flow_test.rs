//! The inventory-aware item transaction: atomic deduction, rollback on
//! insufficient stock, restitution on delete, proportional adjustment on
//! quantity change.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

async fn create_order(app: &TestApp) -> i64 {
    let (status, body) = app
        .post("/api/orders", Some(&app.manager_token), json!({}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("order id")
}

#[tokio::test]
async fn insufficient_stock_rolls_back_everything() {
    let app = TestApp::new().await;
    let paper = app.seed_material("Paper A4", 100.0, Some(10.0)).await;
    app.seed_recipe("Flyers", "Flyers A6, 4+0", paper, 95.0).await;
    let order_id = create_order(&app).await;

    // 100 - 95 = 5 < 10: rejected even though stock is nominally enough
    let (status, body) = app
        .post(
            &format!("/api/orders/{order_id}/items"),
            Some(&app.manager_token),
            json!({
                "type": "Flyers",
                "params": { "description": "Flyers A6, 4+0" },
                "price": 25,
                "quantity": 1
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains(&paper.to_string()),
        "rejection should name the offending material: {body}"
    );

    // nothing was written
    assert_eq!(app.material_quantity(paper).await, 100.0);
    assert!(app.moves_for(paper).await.is_empty());
    let (_, orders) = app.get("/api/orders", Some(&app.manager_token)).await;
    assert_eq!(orders[0]["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn add_item_deducts_stock_and_appends_one_move() {
    let app = TestApp::new().await;
    let paper = app.seed_material("Paper A4", 100.0, Some(10.0)).await;
    app.seed_recipe("Flyers", "Flyers A6, 4+0", paper, 50.0).await;
    let order_id = create_order(&app).await;

    let (status, item) = app
        .post(
            &format!("/api/orders/{order_id}/items"),
            Some(&app.manager_token),
            json!({
                "type": "Flyers",
                "params": { "description": "Flyers A6, 4+0" },
                "price": 25,
                "quantity": 1,
                "sides": 2,
                "sheets": 10
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["clicks"], 40); // 10 sheets x 2 sides x 2
    assert_eq!(item["orderId"].as_i64(), Some(order_id));

    assert_eq!(app.material_quantity(paper).await, 50.0);
    let moves = app.moves_for(paper).await;
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].delta, -50.0);
    assert_eq!(moves[0].reason.as_deref(), Some("order add item"));
}

#[tokio::test]
async fn delete_item_is_the_inverse_of_add() {
    let app = TestApp::new().await;
    let paper = app.seed_material("Paper A4", 100.0, Some(10.0)).await;
    app.seed_recipe("Flyers", "Flyers A6, 4+0", paper, 50.0).await;
    let order_id = create_order(&app).await;

    let (_, item) = app
        .post(
            &format!("/api/orders/{order_id}/items"),
            Some(&app.manager_token),
            json!({
                "type": "Flyers",
                "params": { "description": "Flyers A6, 4+0" },
                "price": 25
            }),
        )
        .await;
    let item_id = item["id"].as_i64().expect("item id");

    let (status, _) = app
        .delete(
            &format!("/api/orders/{order_id}/items/{item_id}"),
            Some(&app.manager_token),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // stock and ledger sum return to their pre-add values
    assert_eq!(app.material_quantity(paper).await, 100.0);
    assert_eq!(app.ledger_sum(paper).await, 0.0);
    let moves = app.moves_for(paper).await;
    assert_eq!(moves.len(), 2);
    assert_eq!(moves[1].delta, 50.0);
    assert_eq!(moves[1].reason.as_deref(), Some("order delete item"));

    // idempotent: deleting again is still 204 and writes nothing
    let (status, _) = app
        .delete(
            &format!("/api/orders/{order_id}/items/{item_id}"),
            Some(&app.manager_token),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.moves_for(paper).await.len(), 2);
}

#[tokio::test]
async fn quantity_change_moves_stock_by_the_delta() {
    let app = TestApp::new().await;
    let paper = app.seed_material("Paper A4", 100.0, None).await;
    app.seed_recipe("Flyers", "Flyers A6, 4+0", paper, 2.0).await;
    let order_id = create_order(&app).await;

    let (_, item) = app
        .post(
            &format!("/api/orders/{order_id}/items"),
            Some(&app.manager_token),
            json!({
                "type": "Flyers",
                "params": { "description": "Flyers A6, 4+0" },
                "price": 25,
                "quantity": 1
            }),
        )
        .await;
    let item_id = item["id"].as_i64().expect("item id");
    assert_eq!(app.material_quantity(paper).await, 98.0);

    // 1 -> 5: deduct 2 * 4 more
    let (status, updated) = app
        .patch(
            &format!("/api/orders/{order_id}/items/{item_id}"),
            Some(&app.manager_token),
            json!({ "quantity": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["quantity"], 5);
    assert_eq!(app.material_quantity(paper).await, 90.0);

    // 5 -> 2: return 2 * 3
    let (status, updated) = app
        .patch(
            &format!("/api/orders/{order_id}/items/{item_id}"),
            Some(&app.manager_token),
            json!({ "quantity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["quantity"], 2);
    assert_eq!(app.material_quantity(paper).await, 96.0);

    // net ledger delta equals recipe_qty * (final - initial) * -1
    assert_eq!(app.ledger_sum(paper).await, -4.0);
}

#[tokio::test]
async fn quantity_increase_respects_the_stock_floor() {
    let app = TestApp::new().await;
    let paper = app.seed_material("Paper A4", 10.0, Some(5.0)).await;
    app.seed_recipe("Flyers", "Flyers A6, 4+0", paper, 1.0).await;
    let order_id = create_order(&app).await;

    let (_, item) = app
        .post(
            &format!("/api/orders/{order_id}/items"),
            Some(&app.manager_token),
            json!({
                "type": "Flyers",
                "params": { "description": "Flyers A6, 4+0" },
                "price": 25,
                "quantity": 1
            }),
        )
        .await;
    let item_id = item["id"].as_i64().expect("item id");
    assert_eq!(app.material_quantity(paper).await, 9.0);

    // 1 -> 10 would need 9 more; 9 - 9 = 0 < floor 5
    let (status, _) = app
        .patch(
            &format!("/api/orders/{order_id}/items/{item_id}"),
            Some(&app.manager_token),
            json!({ "quantity": 10, "price": 99 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // the whole patch rolled back, price included
    assert_eq!(app.material_quantity(paper).await, 9.0);
    let (_, orders) = app.get("/api/orders", Some(&app.manager_token)).await;
    assert_eq!(orders[0]["items"][0]["price"], 25.0);
    assert_eq!(orders[0]["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn order_deletion_returns_aggregated_consumption() {
    let app = TestApp::new().await;
    let paper = app.seed_material("Paper A4", 100.0, None).await;
    app.seed_recipe("Flyers", "Flyers A6, 4+0", paper, 3.0).await;
    let order_id = create_order(&app).await;

    for _ in 0..2 {
        let (status, _) = app
            .post(
                &format!("/api/orders/{order_id}/items"),
                Some(&app.manager_token),
                json!({
                    "type": "Flyers",
                    "params": { "description": "Flyers A6, 4+0" },
                    "price": 25,
                    "quantity": 2
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    assert_eq!(app.material_quantity(paper).await, 88.0);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/orders/{order_id}"),
            Some(&app.manager_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(app.material_quantity(paper).await, 100.0);
    // two adds plus exactly one aggregated return
    let moves = app.moves_for(paper).await;
    assert_eq!(moves.len(), 3);
    assert_eq!(moves[2].delta, 12.0);
    assert_eq!(moves[2].reason.as_deref(), Some("order delete"));

    let (_, orders) = app.get("/api/orders", Some(&app.manager_token)).await;
    assert!(orders.as_array().expect("array").is_empty());
}

#[tokio::test]
async fn deletion_reverses_the_recipe_not_explicit_components() {
    let app = TestApp::new().await;
    let special = app.seed_material("Special vinyl", 50.0, None).await;
    let recipe_paper = app.seed_material("Paper A4", 50.0, None).await;
    app.seed_recipe("Stickers", "Die-cut stickers", recipe_paper, 1.0)
        .await;
    let order_id = create_order(&app).await;

    // creation consumes the explicit component, not the recipe
    let (status, item) = app
        .post(
            &format!("/api/orders/{order_id}/items"),
            Some(&app.manager_token),
            json!({
                "type": "Stickers",
                "params": { "description": "Die-cut stickers" },
                "price": 20,
                "quantity": 2,
                "components": [{ "materialId": special, "qtyPerItem": 1.5 }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.material_quantity(special).await, 47.0);
    assert_eq!(app.material_quantity(recipe_paper).await, 50.0);

    // deletion reverses through the preset recipe lookup instead
    let item_id = item["id"].as_i64().expect("item id");
    let (status, _) = app
        .delete(
            &format!("/api/orders/{order_id}/items/{item_id}"),
            Some(&app.manager_token),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.material_quantity(special).await, 47.0);
    assert_eq!(app.material_quantity(recipe_paper).await, 52.0);
}

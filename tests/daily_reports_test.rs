//! Daily report lifecycle: created only for today, unique per (date,
//! user), patched in place, deleted explicitly.

mod common;

use axum::http::StatusCode;
use common::{today, TestApp, MANAGER_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn login_opens_todays_report() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "manager@test.local", "password": MANAGER_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"].as_i64(), Some(i64::from(app.manager_id)));
    assert_eq!(body["session_date"].as_str(), Some(today().as_str()));
    let token = body["token"].as_str().expect("token").to_string();

    let (status, report) = app
        .get(&format!("/api/daily/{}", today()), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["orders_count"], 0);
    assert_eq!(report["user_name"].as_str(), Some("Manager"));

    // logging in again does not duplicate the report
    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "manager@test.local", "password": MANAGER_PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .get(&format!("/api/daily/{}", today()), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "manager@test.local", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_report_for_same_date_and_user_conflicts() {
    let app = TestApp::new().await;

    let (status, first) = app
        .post(
            "/api/daily",
            Some(&app.manager_token),
            json!({ "report_date": today(), "orders_count": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["orders_count"], 3);

    let (status, _) = app
        .post(
            "/api/daily",
            Some(&app.manager_token),
            json!({ "report_date": today(), "orders_count": 99 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // the first row is unmodified
    let (_, report) = app
        .get(&format!("/api/daily/{}", today()), Some(&app.manager_token))
        .await;
    assert_eq!(report["orders_count"], 3);
}

#[tokio::test]
async fn reports_cannot_be_created_for_other_dates_or_users() {
    let app = TestApp::new().await;

    let yesterday = (chrono::Utc::now().date_naive() - chrono::Days::new(1)).to_string();
    let (status, _) = app
        .post(
            "/api/daily",
            Some(&app.manager_token),
            json!({ "report_date": yesterday }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // creation for someone else is refused even for admins
    let (status, _) = app
        .post(
            "/api/daily",
            Some(&app.admin_token),
            json!({ "report_date": today(), "user_id": app.manager_id }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/api/daily",
            Some(&app.manager_token),
            json!({ "report_date": "not-a-date" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_updates_aggregates_and_guards_cross_user_access() {
    let app = TestApp::new().await;

    app.post(
        "/api/daily",
        Some(&app.manager_token),
        json!({ "report_date": today() }),
    )
    .await;

    let (status, patched) = app
        .patch(
            &format!("/api/daily/{}", today()),
            Some(&app.manager_token),
            json!({ "orders_count": 7, "total_revenue": 123.5, "cash_actual": 100 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["orders_count"], 7);
    assert_eq!(patched["total_revenue"], 123.5);
    assert!(patched["updated_at"].is_string());

    // an empty patch is a validation error
    let (status, _) = app
        .patch(
            &format!("/api/daily/{}", today()),
            Some(&app.manager_token),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // a manager cannot address another user's report
    let (status, _) = app
        .patch(
            &format!("/api/daily/{}?user_id={}", today(), app.admin_id),
            Some(&app.manager_token),
            json!({ "orders_count": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // an admin can
    let (status, seen) = app
        .get(
            &format!("/api/daily/{}?user_id={}", today(), app.manager_id),
            Some(&app.admin_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seen["orders_count"], 7);
}

#[tokio::test]
async fn reports_are_deleted_by_id() {
    let app = TestApp::new().await;

    let (_, created) = app
        .post(
            "/api/daily",
            Some(&app.manager_token),
            json!({ "report_date": today() }),
        )
        .await;
    let report_id = created["id"].as_i64().expect("report id");

    let (status, _) = app
        .delete(
            &format!("/api/daily-reports/{report_id}"),
            Some(&app.manager_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .get(&format!("/api/daily/{}", today()), Some(&app.manager_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .delete(
            &format!("/api/daily-reports/{report_id}"),
            Some(&app.manager_token),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_report_save_persists_the_snapshot_verbatim() {
    let app = TestApp::new().await;

    app.post(
        "/api/daily",
        Some(&app.manager_token),
        json!({ "report_date": today() }),
    )
    .await;

    // the aggregates are trusted from the caller, not recomputed
    let (status, _) = app
        .post(
            "/api/daily-reports/full",
            Some(&app.manager_token),
            json!({
                "report_date": today(),
                "orders": [{ "id": 1, "number": "ORD-0001" }],
                "report_metadata": { "total_orders": 1, "total_revenue": 55.5 }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, report) = app
        .get(&format!("/api/daily/{}", today()), Some(&app.manager_token))
        .await;
    assert_eq!(report["orders_count"], 1);
    assert_eq!(report["total_revenue"], 55.5);
    let snapshot: serde_json::Value =
        serde_json::from_str(report["snapshot_json"].as_str().expect("snapshot"))
            .expect("snapshot is json");
    assert_eq!(snapshot["orders"][0]["number"], "ORD-0001");

    // saving against a date with no report is a 404, not an implicit create
    let yesterday = (chrono::Utc::now().date_naive() - chrono::Days::new(1)).to_string();
    let (status, _) = app
        .post(
            "/api/daily-reports/full",
            Some(&app.manager_token),
            json!({ "report_date": yesterday, "orders": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_report_read_composes_orders_and_metadata() {
    let app = TestApp::new().await;

    app.post(
        "/api/daily",
        Some(&app.manager_token),
        json!({ "report_date": today() }),
    )
    .await;

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
            "price": 2.5,
            "quantity": 10
        }),
    )
    .await;

    let (status, full) = app
        .get(
            &format!("/api/daily-reports/full/{}", today()),
            Some(&app.manager_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(full["report_metadata"]["total_orders"], 1);
    assert_eq!(full["report_metadata"]["total_revenue"], 25.0);
    assert_eq!(full["orders"][0]["items"][0]["quantity"], 10);
}

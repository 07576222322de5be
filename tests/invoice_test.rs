mod common;

use common::{TestApp, TEST_USER_ID};
use serde_json::json;

async fn seed_product(app: &TestApp, name: &str, upc: &str, stock: i64, price: f64) {
    let response = app
        .create_product(json!({ "name": name, "upc": upc, "stock": stock, "price": price }))
        .await;
    assert_eq!(response.status(), 201);
}

async fn product_stock(app: &TestApp, id: &str) -> i64 {
    let body: serde_json::Value = app
        .client
        .get(format!("{}/products?search={}", app.address, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["products"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == id)
        .expect("product not found")["stock"]
        .as_i64()
        .unwrap()
}

#[tokio::test]
async fn finalize_persists_invoice_and_decrements_stock() {
    let app = TestApp::spawn().await;
    seed_product(&app, "Milk", "111", 10, 25.0).await;
    seed_product(&app, "Bread", "222", 5, 50.0).await;

    let response = app
        .client
        .post(format!("{}/invoices", app.address))
        .header("X-User-ID", TEST_USER_ID)
        .json(&json!({
            "customer": { "name": "Jo", "email": "jo@example.com" },
            "items": [
                { "product_id": "milk", "name": "Milk", "unit_price": 25.0, "quantity": 2 },
                { "product_id": "bread", "name": "Bread", "unit_price": 50.0, "quantity": 1 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    // Totals are recomputed server-side.
    assert_eq!(body["invoice"]["subtotal"], 100.0);
    assert_eq!(body["invoice"]["tax"], 10.0);
    assert_eq!(body["invoice"]["total"], 110.0);
    // Phone was omitted and collapses to the placeholder.
    assert_eq!(body["invoice"]["customer"]["phone"], "N/A");

    let applications = body["stock_applications"].as_array().unwrap();
    assert_eq!(applications.len(), 2);
    assert!(applications.iter().all(|a| a["status"] == "applied"));

    assert_eq!(product_stock(&app, "milk").await, 8);
    assert_eq!(product_stock(&app, "bread").await, 4);

    // The invoice is durably fetchable.
    let invoice_id = body["invoice"]["id"].as_str().unwrap();
    let fetched = app
        .client
        .get(format!("{}/invoices/{}", app.address, invoice_id))
        .send()
        .await
        .unwrap();
    assert_eq!(fetched.status(), 200);
}

#[tokio::test]
async fn finalize_requires_authenticated_user() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/invoices", app.address))
        .json(&json!({
            "items": [{ "product_id": "p", "name": "P", "unit_price": 1.0, "quantity": 1 }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn finalize_rejects_empty_line_item_set() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/invoices", app.address))
        .header("X-User-ID", TEST_USER_ID)
        .json(&json!({ "items": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn finalize_rejects_non_positive_quantity() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/invoices", app.address))
        .header("X-User-ID", TEST_USER_ID)
        .json(&json!({
            "items": [{ "product_id": "p", "name": "P", "unit_price": 1.0, "quantity": 0 }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn duplicate_lines_decrement_once_with_combined_quantity() {
    let app = TestApp::spawn().await;
    seed_product(&app, "Milk", "111", 10, 25.0).await;

    let response = app
        .client
        .post(format!("{}/invoices", app.address))
        .header("X-User-ID", TEST_USER_ID)
        .json(&json!({
            "items": [
                { "product_id": "milk", "name": "Milk", "unit_price": 25.0, "quantity": 2 },
                { "product_id": "milk", "name": "Milk", "unit_price": 25.0, "quantity": 3 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    // Two separate lines survive in the snapshot (no merge)...
    assert_eq!(body["invoice"]["items"].as_array().unwrap().len(), 2);
    // ...but the product is decremented once, by the combined quantity.
    let applications = body["stock_applications"].as_array().unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["quantity"], 5);
    assert_eq!(product_stock(&app, "milk").await, 5);
}

#[tokio::test]
async fn partial_failure_keeps_invoice_and_names_failing_product() {
    let app = TestApp::spawn().await;
    seed_product(&app, "Milk", "111", 10, 25.0).await;
    seed_product(&app, "Bread", "222", 1, 50.0).await;
    // "ghost" is never created.

    let response = app
        .client
        .post(format!("{}/invoices", app.address))
        .header("X-User-ID", TEST_USER_ID)
        .json(&json!({
            "items": [
                { "product_id": "milk", "name": "Milk", "unit_price": 25.0, "quantity": 2 },
                { "product_id": "bread", "name": "Bread", "unit_price": 50.0, "quantity": 3 },
                { "product_id": "ghost", "name": "Ghost", "unit_price": 1.0, "quantity": 1 }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    let applications = body["stock_applications"].as_array().unwrap();

    let by_product = |id: &str| {
        applications
            .iter()
            .find(|a| a["product_id"] == id)
            .unwrap()
            .clone()
    };
    assert_eq!(by_product("milk")["status"], "applied");
    assert_eq!(by_product("bread")["status"], "insufficient_stock");
    assert!(by_product("bread")["detail"]
        .as_str()
        .unwrap()
        .contains("only 1 in stock"));
    assert_eq!(by_product("ghost")["status"], "product_missing");

    // No rollback: the applied decrement stands and the invoice is persisted.
    assert_eq!(product_stock(&app, "milk").await, 8);
    assert_eq!(product_stock(&app, "bread").await, 1);
    let invoice_id = body["invoice"]["id"].as_str().unwrap();
    let fetched = app
        .client
        .get(format!("{}/invoices/{}", app.address, invoice_id))
        .send()
        .await
        .unwrap();
    assert_eq!(fetched.status(), 200);
}

#[tokio::test]
async fn reconcile_replays_only_missing_decrements() {
    let app = TestApp::spawn().await;
    seed_product(&app, "Milk", "111", 10, 25.0).await;
    seed_product(&app, "Bread", "222", 1, 50.0).await;

    let body: serde_json::Value = app
        .client
        .post(format!("{}/invoices", app.address))
        .header("X-User-ID", TEST_USER_ID)
        .json(&json!({
            "items": [
                { "product_id": "milk", "name": "Milk", "unit_price": 25.0, "quantity": 2 },
                { "product_id": "bread", "name": "Bread", "unit_price": 50.0, "quantity": 3 }
            ]
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let invoice_id = body["invoice"]["id"].as_str().unwrap().to_string();

    // Restock bread, then replay.
    app.client
        .patch(format!("{}/products/bread", app.address))
        .json(&json!({ "stock": 5 }))
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = app
        .client
        .post(format!("{}/invoices/{}/reconcile", app.address, invoice_id))
        .header("X-User-ID", TEST_USER_ID)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let applications = body["stock_applications"].as_array().unwrap();
    let by_product = |id: &str| {
        applications
            .iter()
            .find(|a| a["product_id"] == id)
            .unwrap()
            .clone()
    };
    // The previously applied product is not decremented a second time.
    assert_eq!(by_product("milk")["status"], "already_applied");
    assert_eq!(by_product("bread")["status"], "applied");

    assert_eq!(product_stock(&app, "milk").await, 8);
    assert_eq!(product_stock(&app, "bread").await, 2);

    // A further replay is a no-op.
    let body: serde_json::Value = app
        .client
        .post(format!("{}/invoices/{}/reconcile", app.address, invoice_id))
        .header("X-User-ID", TEST_USER_ID)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["stock_applications"]
        .as_array()
        .unwrap()
        .iter()
        .all(|a| a["status"] == "already_applied"));
    assert_eq!(product_stock(&app, "bread").await, 2);
}

#[tokio::test]
async fn reconcile_unknown_invoice_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/invoices/nope/reconcile", app.address))
        .header("X-User-ID", TEST_USER_ID)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn invoices_are_listed_newest_first() {
    let app = TestApp::spawn().await;
    seed_product(&app, "Milk", "111", 100, 25.0).await;

    for _ in 0..2 {
        app.client
            .post(format!("{}/invoices", app.address))
            .header("X-User-ID", TEST_USER_ID)
            .json(&json!({
                "items": [{ "product_id": "milk", "name": "Milk", "unit_price": 25.0, "quantity": 1 }]
            }))
            .send()
            .await
            .unwrap();
    }

    let body: serde_json::Value = app
        .client
        .get(format!("{}/invoices", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["invoices"].as_array().unwrap().len(), 2);
}

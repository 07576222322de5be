mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn create_product_derives_slug_identifier() {
    let app = TestApp::spawn().await;

    let response = app
        .create_product(json!({
            "name": "Fresh Milk 1L!!",
            "upc": "012345",
            "stock": 20,
            "price": 25.0
        }))
        .await;

    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], "fresh-milk-1l");
    assert_eq!(body["stock"], 20);
}

#[tokio::test]
async fn create_product_without_name_uses_upc_identifier() {
    let app = TestApp::spawn().await;

    let response = app
        .create_product(json!({ "upc": "012345", "price": 5.0 }))
        .await;

    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], "product_012345");
}

#[tokio::test]
async fn create_product_requires_upc() {
    let app = TestApp::spawn().await;

    let response = app.create_product(json!({ "name": "No Upc" , "upc": ""})).await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn create_product_rejects_negative_stock_and_price() {
    let app = TestApp::spawn().await;

    let response = app
        .create_product(json!({ "upc": "1", "stock": -1 }))
        .await;
    assert_eq!(response.status(), 422);

    let response = app
        .create_product(json!({ "upc": "1", "price": -0.5 }))
        .await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn duplicate_identifier_overwrites_existing_record() {
    let app = TestApp::spawn().await;

    app.create_product(json!({ "name": "Widget", "upc": "111", "stock": 5, "price": 1.0 }))
        .await;
    app.create_product(json!({ "name": "Widget", "upc": "111", "stock": 8, "price": 2.0 }))
        .await;

    let body: serde_json::Value = app
        .client
        .get(format!("{}/products", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["stock"], 8);
    assert_eq!(body["products"][0]["price"], 2.0);
}

#[tokio::test]
async fn list_filters_by_upc_and_search() {
    let app = TestApp::spawn().await;

    app.create_product(json!({ "name": "Fresh Milk", "upc": "111", "sku": "MILK-1", "price": 2.0 }))
        .await;
    app.create_product(json!({ "name": "Dark Chocolate", "upc": "222", "price": 4.0 }))
        .await;

    // Exact upc match, store-side.
    let body: serde_json::Value = app
        .client
        .get(format!("{}/products?upc=222", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["name"], "Dark Chocolate");

    // Case-insensitive substring over name.
    let body: serde_json::Value = app
        .client
        .get(format!("{}/products?search=fresh", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["products"][0]["name"], "Fresh Milk");

    // Substring over sku.
    let body: serde_json::Value = app
        .client
        .get(format!("{}/products?search=milk-1", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn patch_updates_stock_only() {
    let app = TestApp::spawn().await;

    app.create_product(json!({ "name": "Widget", "upc": "111", "stock": 5, "price": 9.5 }))
        .await;

    let response = app
        .client
        .patch(format!("{}/products/widget", app.address))
        .json(&json!({ "stock": 42 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["stock"], 42);
    assert_eq!(body["price"], 9.5);
    assert_eq!(body["name"], "Widget");
}

#[tokio::test]
async fn patch_unknown_product_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .patch(format!("{}/products/missing", app.address))
        .json(&json!({ "stock": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn patch_with_no_fields_is_bad_request() {
    let app = TestApp::spawn().await;

    app.create_product(json!({ "name": "Widget", "upc": "111" })).await;

    let response = app
        .client
        .patch(format!("{}/products/widget", app.address))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn delete_removes_product() {
    let app = TestApp::spawn().await;

    app.create_product(json!({ "name": "Widget", "upc": "111" })).await;

    let response = app
        .client
        .delete(format!("{}/products/widget", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let response = app
        .client
        .delete(format!("{}/products/widget", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn inventory_overview_reports_low_stock_and_value() {
    let app = TestApp::spawn().await;

    app.create_product(json!({ "name": "A", "upc": "1", "stock": 3, "price": 2.0 }))
        .await;
    app.create_product(json!({ "name": "B", "upc": "2", "stock": 50, "price": 1.0 }))
        .await;

    let body: serde_json::Value = app
        .client
        .get(format!("{}/inventory/overview", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["total_products"], 2);
    assert_eq!(body["low_stock_items"], 1);
    assert_eq!(body["total_value"], 56.0);
}

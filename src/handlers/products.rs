use crate::dtos::{
    CreateProductRequest, InventoryOverviewResponse, ProductListParams, ProductListResponse,
    ProductResponse, UpdateProductRequest,
};
use crate::error::AppError;
use crate::models::Product;
use crate::services::store::ProductChanges;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

/// Stock level below which a product counts as low stock.
const LOW_STOCK_THRESHOLD: i64 = 10;

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = Product::new(
        payload.name.trim().to_string(),
        payload.upc.trim().to_string(),
        payload.sku.filter(|sku| !sku.trim().is_empty()),
        payload.stock,
        payload.price,
        payload.vendor.filter(|vendor| !vendor.trim().is_empty()),
    );
    tracing::info!(product_id = %product.id, upc = %product.upc, "Creating product");
    let response = ProductResponse::from(product.clone());
    state.store.upsert_product(product).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List the catalog.
///
/// `upc` narrows to an exact match at the store; `search` is a read-side
/// substring filter over name, upc and sku applied to the full listed set.
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<impl IntoResponse, AppError> {
    let mut products = state.store.list_products(params.upc.as_deref()).await?;

    if let Some(search) = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        products.retain(|product| {
            product.name.to_lowercase().contains(&needle)
                || product.upc.contains(search)
                || product
                    .sku
                    .as_deref()
                    .is_some_and(|sku| sku.to_lowercase().contains(&needle))
        });
    }

    let total = products.len();
    Ok(Json(ProductListResponse {
        products: products.into_iter().map(ProductResponse::from).collect(),
        total,
    }))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if payload.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "no fields to update"
        )));
    }

    let changes = ProductChanges {
        name: payload.name,
        upc: payload.upc,
        sku: payload.sku,
        stock: payload.stock,
        price: payload.price,
        vendor: payload.vendor,
    };
    let found = state.store.update_product(&id, changes).await?;
    if !found {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "product {} not found",
            id
        )));
    }

    let product = state.store.get_product(&id).await?.ok_or_else(|| {
        AppError::NotFound(anyhow::anyhow!("product {} not found", id))
    })?;
    Ok(Json(ProductResponse::from(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let found = state.store.delete_product(&id).await?;
    if !found {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "product {} not found",
            id
        )));
    }
    tracing::info!(product_id = %id, "Deleted product");
    Ok(StatusCode::NO_CONTENT)
}

/// Read-side fold over the catalog for the dashboard.
pub async fn inventory_overview(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = state.store.list_products(None).await?;
    let overview = InventoryOverviewResponse {
        total_products: products.len(),
        low_stock_items: products
            .iter()
            .filter(|product| product.stock < LOW_STOCK_THRESHOLD)
            .count(),
        total_value: products
            .iter()
            .map(|product| product.price * product.stock as f64)
            .sum(),
    };
    Ok(Json(overview))
}

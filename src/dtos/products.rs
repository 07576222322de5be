use crate::models::Product;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    /// Optional; the identifier falls back to `product_<upc>` when absent.
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 1, message = "upc is required"))]
    pub upc: String,
    pub sku: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: i64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    pub vendor: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub upc: Option<String>,
    pub sku: Option<String>,
    #[validate(range(min = 0, message = "stock must not be negative"))]
    pub stock: Option<i64>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
    pub vendor: Option<String>,
}

impl UpdateProductRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.upc.is_none()
            && self.sku.is_none()
            && self.stock.is_none()
            && self.price.is_none()
            && self.vendor.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    /// Substring filter over name, upc and sku.
    pub search: Option<String>,
    /// Exact-match UPC filter, applied by the store.
    pub upc: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub upc: String,
    pub sku: Option<String>,
    pub stock: i64,
    pub price: f64,
    pub vendor: Option<String>,
    pub created_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            upc: product.upc,
            sku: product.sku,
            stock: product.stock,
            price: product.price,
            vendor: product.vendor,
            created_at: product.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct InventoryOverviewResponse {
    pub total_products: usize,
    pub low_stock_items: usize,
    pub total_value: f64,
}

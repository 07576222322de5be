//! Storage traits for the product catalog, invoices and user profiles.
//!
//! Any document store satisfying these operations suffices; the service
//! ships a MongoDB backend for production and an in-memory backend for
//! development and tests, selected by `STORAGE_BACKEND`.

use crate::error::AppError;
use crate::models::{Invoice, Product, UserProfile};
use async_trait::async_trait;

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoDb;

/// Outcome of one conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockApplication {
    /// Stock was decremented and the invoice recorded against the product.
    Applied,
    /// This invoice already decremented this product; nothing changed.
    AlreadyApplied,
    /// The decrement would drive stock negative; nothing changed.
    InsufficientStock { available: i64 },
    /// No product record with this identifier exists.
    ProductMissing,
}

/// Partial update of a product record. `None` fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub upc: Option<String>,
    pub sku: Option<String>,
    pub stock: Option<i64>,
    pub price: Option<f64>,
    pub vendor: Option<String>,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Create or overwrite the record with the product's identifier.
    /// Duplicate identifiers overwrite by design.
    async fn upsert_product(&self, product: Product) -> Result<(), AppError>;

    /// List all products, optionally narrowed to an exact UPC match.
    async fn list_products(&self, upc: Option<&str>) -> Result<Vec<Product>, AppError>;

    async fn get_product(&self, id: &str) -> Result<Option<Product>, AppError>;

    /// Apply a partial field update. Returns false when no record matched.
    /// The identifier itself is never rewritten, even on a name change.
    async fn update_product(&self, id: &str, changes: ProductChanges) -> Result<bool, AppError>;

    /// Returns false when no record matched.
    async fn delete_product(&self, id: &str) -> Result<bool, AppError>;

    /// Atomically decrement stock by `quantity` for one invoice.
    ///
    /// The decrement is conditional (it refuses to drive stock negative)
    /// and idempotent per invoice: replaying the same invoice against the
    /// same product reports `AlreadyApplied` instead of decrementing twice.
    async fn apply_stock_decrement(
        &self,
        product_id: &str,
        quantity: i64,
        invoice_id: &str,
    ) -> Result<StockApplication, AppError>;
}

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Write-once insert; invoices are never updated or deleted.
    async fn insert_invoice(&self, invoice: Invoice) -> Result<(), AppError>;

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError>;

    async fn get_invoice(&self, id: &str) -> Result<Option<Invoice>, AppError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError>;

    async fn upsert_profile(&self, profile: UserProfile) -> Result<(), AppError>;
}

/// The full storage surface consumed by the application.
#[async_trait]
pub trait Store: ProductStore + InvoiceStore + ProfileStore {
    async fn health_check(&self) -> Result<(), AppError>;
}

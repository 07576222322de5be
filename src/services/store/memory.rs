//! In-memory storage backend for development and tests.
//!
//! Observably equivalent to the MongoDB backend, including the conditional,
//! per-invoice-idempotent stock decrement.

use super::{InvoiceStore, ProductChanges, ProductStore, ProfileStore, StockApplication, Store};
use crate::error::AppError;
use crate::models::{Invoice, Product, UserProfile};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct StoredProduct {
    product: Product,
    applied_invoices: HashSet<String>,
}

#[derive(Debug, Default)]
struct Inner {
    products: HashMap<String, StoredProduct>,
    invoices: HashMap<String, Invoice>,
    profiles: HashMap<String, UserProfile>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn upsert_product(&self, product: Product) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        inner.products.insert(
            product.id.clone(),
            StoredProduct {
                product,
                applied_invoices: HashSet::new(),
            },
        );
        Ok(())
    }

    async fn list_products(&self, upc: Option<&str>) -> Result<Vec<Product>, AppError> {
        let inner = self.inner.read().await;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|stored| upc.map_or(true, |upc| stored.product.upc == upc))
            .map(|stored| stored.product.clone())
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(products)
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.products.get(id).map(|stored| stored.product.clone()))
    }

    async fn update_product(&self, id: &str, changes: ProductChanges) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        let Some(stored) = inner.products.get_mut(id) else {
            return Ok(false);
        };
        if let Some(name) = changes.name {
            stored.product.name = name;
        }
        if let Some(upc) = changes.upc {
            stored.product.upc = upc;
        }
        if let Some(sku) = changes.sku {
            stored.product.sku = Some(sku);
        }
        if let Some(stock) = changes.stock {
            stored.product.stock = stock;
        }
        if let Some(price) = changes.price {
            stored.product.price = price;
        }
        if let Some(vendor) = changes.vendor {
            stored.product.vendor = Some(vendor);
        }
        Ok(true)
    }

    async fn delete_product(&self, id: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        Ok(inner.products.remove(id).is_some())
    }

    async fn apply_stock_decrement(
        &self,
        product_id: &str,
        quantity: i64,
        invoice_id: &str,
    ) -> Result<StockApplication, AppError> {
        let mut inner = self.inner.write().await;
        let Some(stored) = inner.products.get_mut(product_id) else {
            return Ok(StockApplication::ProductMissing);
        };
        if stored.applied_invoices.contains(invoice_id) {
            return Ok(StockApplication::AlreadyApplied);
        }
        if stored.product.stock < quantity {
            return Ok(StockApplication::InsufficientStock {
                available: stored.product.stock,
            });
        }
        stored.product.stock -= quantity;
        stored.applied_invoices.insert(invoice_id.to_string());
        Ok(StockApplication::Applied)
    }
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn insert_invoice(&self, invoice: Invoice) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        inner.invoices.insert(invoice.id.clone(), invoice);
        Ok(())
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let inner = self.inner.read().await;
        let mut invoices: Vec<Invoice> = inner.invoices.values().cloned().collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(invoices)
    }

    async fn get_invoice(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.invoices.get(id).cloned())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.get(user_id).cloned())
    }

    async fn upsert_profile(&self, profile: UserProfile) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        inner.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

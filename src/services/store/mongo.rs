//! MongoDB storage backend.

use super::{InvoiceStore, ProductChanges, ProductStore, ProfileStore, StockApplication, Store};
use crate::error::AppError;
use crate::models::{Invoice, Product, UserProfile};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{FindOptions, IndexOptions, ReplaceOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for inventory-service");

        let upc_index = IndexModel::builder()
            .keys(doc! { "upc": 1 })
            .options(IndexOptions::builder().name("upc_lookup".to_string()).build())
            .build();
        self.products().create_index(upc_index, None).await.map_err(|e| {
            tracing::error!("Failed to create upc index on products collection: {}", e);
            AppError::from(e)
        })?;
        tracing::info!("Created index on products.upc");

        let created_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_sort".to_string())
                    .build(),
            )
            .build();
        self.invoices()
            .create_index(created_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create created_at index on invoices collection: {}",
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created index on invoices.created_at");

        Ok(())
    }

    fn products(&self) -> Collection<Product> {
        self.db.collection("products")
    }

    fn invoices(&self) -> Collection<Invoice> {
        self.db.collection("invoices")
    }

    fn profiles(&self) -> Collection<UserProfile> {
        self.db.collection("profiles")
    }

    /// Untyped view of the products collection, used where reconciliation
    /// bookkeeping (`applied_invoices`) is inspected.
    fn products_raw(&self) -> Collection<Document> {
        self.db.collection("products")
    }
}

#[async_trait]
impl ProductStore for MongoDb {
    async fn upsert_product(&self, product: Product) -> Result<(), AppError> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.products()
            .replace_one(doc! { "_id": &product.id }, &product, options)
            .await?;
        Ok(())
    }

    async fn list_products(&self, upc: Option<&str>) -> Result<Vec<Product>, AppError> {
        let filter = match upc {
            Some(upc) => doc! { "upc": upc },
            None => Document::new(),
        };
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let mut cursor = self.products().find(filter, options).await?;
        let mut products = Vec::new();
        while let Some(product) = cursor.try_next().await? {
            products.push(product);
        }
        Ok(products)
    }

    async fn get_product(&self, id: &str) -> Result<Option<Product>, AppError> {
        Ok(self.products().find_one(doc! { "_id": id }, None).await?)
    }

    async fn update_product(&self, id: &str, changes: ProductChanges) -> Result<bool, AppError> {
        let mut set = Document::new();
        if let Some(name) = changes.name {
            set.insert("name", name);
        }
        if let Some(upc) = changes.upc {
            set.insert("upc", upc);
        }
        if let Some(sku) = changes.sku {
            set.insert("sku", sku);
        }
        if let Some(stock) = changes.stock {
            set.insert("stock", stock);
        }
        if let Some(price) = changes.price {
            set.insert("price", price);
        }
        if let Some(vendor) = changes.vendor {
            set.insert("vendor", vendor);
        }

        let result = self
            .products()
            .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_product(&self, id: &str) -> Result<bool, AppError> {
        let result = self.products().delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn apply_stock_decrement(
        &self,
        product_id: &str,
        quantity: i64,
        invoice_id: &str,
    ) -> Result<StockApplication, AppError> {
        // Single conditional update: only matches when enough stock remains
        // and this invoice has not been applied to this product before.
        let filter = doc! {
            "_id": product_id,
            "stock": { "$gte": quantity },
            "applied_invoices": { "$ne": invoice_id },
        };
        let update = doc! {
            "$inc": { "stock": -quantity },
            "$addToSet": { "applied_invoices": invoice_id },
        };
        let result = self.products_raw().update_one(filter, update, None).await?;
        if result.modified_count == 1 {
            tracing::info!(
                product_id = %product_id,
                quantity = quantity,
                invoice_id = %invoice_id,
                "Applied stock decrement"
            );
            return Ok(StockApplication::Applied);
        }

        // Matched nothing: disambiguate by reading the record back.
        let raw = self
            .products_raw()
            .find_one(doc! { "_id": product_id }, None)
            .await?;
        match raw {
            None => Ok(StockApplication::ProductMissing),
            Some(record) => {
                let already_applied = record
                    .get_array("applied_invoices")
                    .map(|applied| applied.iter().any(|v| v.as_str() == Some(invoice_id)))
                    .unwrap_or(false);
                if already_applied {
                    Ok(StockApplication::AlreadyApplied)
                } else {
                    let available = match record.get("stock") {
                        Some(Bson::Int64(v)) => *v,
                        Some(Bson::Int32(v)) => i64::from(*v),
                        _ => 0,
                    };
                    Ok(StockApplication::InsufficientStock { available })
                }
            }
        }
    }
}

#[async_trait]
impl InvoiceStore for MongoDb {
    async fn insert_invoice(&self, invoice: Invoice) -> Result<(), AppError> {
        self.invoices().insert_one(invoice, None).await?;
        Ok(())
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let mut cursor = self.invoices().find(Document::new(), options).await?;
        let mut invoices = Vec::new();
        while let Some(invoice) = cursor.try_next().await? {
            invoices.push(invoice);
        }
        Ok(invoices)
    }

    async fn get_invoice(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        Ok(self.invoices().find_one(doc! { "_id": id }, None).await?)
    }
}

#[async_trait]
impl ProfileStore for MongoDb {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.profiles().find_one(doc! { "_id": user_id }, None).await?)
    }

    async fn upsert_profile(&self, profile: UserProfile) -> Result<(), AppError> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.profiles()
            .replace_one(doc! { "_id": &profile.id }, &profile, options)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Store for MongoDb {
    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}

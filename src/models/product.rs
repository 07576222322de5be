//! Catalog product record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted catalog entry, keyed by a derived identifier.
///
/// The identifier is assigned exactly once at creation and never changes
/// afterwards, even when the product name is edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub upc: String,
    pub sku: Option<String>,
    pub stock: i64,
    pub price: f64,
    pub vendor: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: String,
        upc: String,
        sku: Option<String>,
        stock: i64,
        price: f64,
        vendor: Option<String>,
    ) -> Self {
        Self {
            id: derive_product_id(&name, &upc),
            name,
            upc,
            sku,
            stock,
            price,
            vendor,
            created_at: Utc::now(),
        }
    }
}

/// Derive the stable product identifier.
///
/// Named products get a slug: lower-cased, every non-alphanumeric run
/// collapsed to a single hyphen, truncated to 50 characters, outer hyphens
/// trimmed. Unnamed products fall back to `product_<upc>`.
pub fn derive_product_id(name: &str, upc: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return format!("product_{}", upc);
    }

    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    slug.truncate(50);
    slug.trim_matches('-').to_string()
}

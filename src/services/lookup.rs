//! Barcode lookup provider client.
//!
//! Read-only gateway to the external product-information source. A provider
//! "not found" is a normal soft-miss outcome; only transport failures and
//! unexpected statuses surface as errors.

use crate::config::LookupSettings;
use crate::error::AppError;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;

#[derive(Clone)]
pub struct BarcodeLookupClient {
    client: Client,
    settings: LookupSettings,
}

/// Normalized product metadata from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInfo {
    pub name: String,
    pub price: f64,
    pub vendor: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Found(ProductInfo),
    /// The provider answered but had no matching record.
    NotFound,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    products: Vec<ProviderProduct>,
}

#[derive(Debug, Deserialize)]
struct ProviderProduct {
    title: Option<String>,
    brand: Option<String>,
    #[serde(default)]
    stores: Vec<ProviderStore>,
}

#[derive(Debug, Deserialize)]
struct ProviderStore {
    price: Option<serde_json::Value>,
}

impl BarcodeLookupClient {
    pub fn new(settings: LookupSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub async fn lookup(&self, code: &str) -> Result<LookupResult, AppError> {
        let url = format!("{}/products", self.settings.base_url);
        let key = self.settings.api_key.expose_secret().as_str();

        let response = self
            .client
            .get(&url)
            .query(&[("barcode", code), ("formatted", "y"), ("key", key)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(code = %code, "Barcode lookup request failed: {}", e);
                AppError::BadGateway(format!("barcode lookup request failed: {}", e))
            })?;

        let status = response.status();
        // The provider reports an unknown barcode as 404; both that and a
        // 2xx body with an empty product array collapse to the same
        // soft-miss outcome.
        if status == StatusCode::NOT_FOUND {
            tracing::info!(code = %code, "Barcode not known to lookup provider");
            return Ok(LookupResult::NotFound);
        }
        if !status.is_success() {
            tracing::error!(code = %code, status = %status, "Barcode lookup provider error");
            return Err(AppError::BadGateway(format!(
                "barcode lookup provider returned {}",
                status
            )));
        }

        let body: ProviderResponse = response.json().await.map_err(|e| {
            tracing::error!(code = %code, "Invalid barcode lookup response body: {}", e);
            AppError::BadGateway(format!("invalid barcode lookup response: {}", e))
        })?;

        let Some(product) = body.products.into_iter().next() else {
            tracing::info!(code = %code, "Barcode lookup returned no products");
            return Ok(LookupResult::NotFound);
        };

        let name = product
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_default();
        let vendor = product
            .brand
            .map(|brand| brand.trim().to_string())
            .filter(|brand| !brand.is_empty());
        // Price comes from the first listed store offer; anything
        // unparseable defaults to 0.
        let price = product
            .stores
            .first()
            .and_then(|store| store.price.as_ref())
            .and_then(parse_price)
            .unwrap_or(0.0);

        tracing::info!(code = %code, name = %name, price = price, "Barcode lookup hit");
        Ok(LookupResult::Found(ProductInfo {
            name,
            price,
            vendor,
        }))
    }
}

fn parse_price(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LookupProduct {
    pub name: String,
    pub price: f64,
    pub vendor: Option<String>,
}

/// Outcome of a barcode lookup.
///
/// `not_found` is a normal result (manual entry required), not an error;
/// `failed` is the retryable transport/provider path. Every variant echoes
/// the scanned code so the caller never has to rescan.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupOutcome {
    Found {
        code: String,
        product: LookupProduct,
    },
    NotFound {
        code: String,
        message: String,
    },
    Failed {
        code: String,
        message: String,
    },
}

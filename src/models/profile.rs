use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompanyType {
    #[default]
    Retail,
    Wholesale,
    Ecommerce,
    Other,
}

/// Per-user profile record, keyed by the upstream user id.
///
/// Written by onboarding; `company_name` and `company_address` are consumed
/// by invoice export for document branding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub company_type: CompanyType,
    pub onboarding_complete: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

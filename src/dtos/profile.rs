use crate::models::{CompanyType, UserProfile};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    #[serde(default)]
    pub company_type: CompanyType,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub first_name: String,
    pub last_name: String,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub company_type: CompanyType,
    pub onboarding_complete: bool,
    pub updated_at: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            company_name: profile.company_name,
            company_address: profile.company_address,
            company_type: profile.company_type,
            onboarding_complete: profile.onboarding_complete,
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

//! Profile contract shapes.
//!
//! Neither `onboarding_status` nor `is_admin` is accepted anywhere here;
//! both are server-assigned.

use serde::Deserialize;
use validator::Validate;

/// Registration payload. The auth subject comes from the authentication
/// collaborator, never from the body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileDraft {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub business_name: String,
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub owner_name: String,
    #[validate(length(min = 7, max = 15, message = "must be 7-15 digits"))]
    pub phone: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(max = 300, message = "must be at most 300 characters"))]
    pub address: Option<String>,
}

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfilePatch {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub business_name: Option<String>,
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub owner_name: Option<String>,
    #[validate(length(min = 7, max = 15, message = "must be 7-15 digits"))]
    pub phone: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 300, message = "must be at most 300 characters"))]
    pub address: Option<String>,
    pub features: Option<Vec<String>>,
}

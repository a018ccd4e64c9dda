//! Loyalty contract shapes.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RewardDraft {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    pub points_required: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RewardPatch {
    #[validate(length(min = 1, max = 120, message = "must be 1-120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    pub points_required: Option<u32>,
    pub is_active: Option<bool>,
}

/// Manual point grant (e.g. a goodwill credit).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PointGrant {
    pub customer_id: Uuid,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub points: i64,
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedeemRequest {
    pub customer_id: Uuid,
    pub reward_id: Uuid,
}

//! Loyalty service: rewards owned by the vendor, point grants and
//! redemptions flowing through the customer chain.

use uuid::Uuid;
use vendo_core::context::TenantContext;
use vendo_core::error::{VendoError, VendoResult};
use vendo_core::models::loyalty::{
    CreateLoyaltyPoint, CreateLoyaltyReward, LoyaltyPoint, LoyaltyReward, UpdateLoyaltyReward,
};
use vendo_core::repository::{
    LoyaltyPointRepository, LoyaltyRewardRepository, PaginatedResult, Pagination,
};

use crate::contract::{self, PointGrant, RedeemRequest, RewardDraft, RewardPatch};

pub struct LoyaltyService<R, P>
where
    R: LoyaltyRewardRepository,
    P: LoyaltyPointRepository,
{
    rewards: R,
    points: P,
}

impl<R, P> LoyaltyService<R, P>
where
    R: LoyaltyRewardRepository,
    P: LoyaltyPointRepository,
{
    pub fn new(rewards: R, points: P) -> Self {
        Self { rewards, points }
    }

    // ----- Rewards -----

    pub async fn create_reward(
        &self,
        ctx: &TenantContext,
        draft: RewardDraft,
    ) -> VendoResult<LoyaltyReward> {
        ctx.require_active()?;
        contract::check(&draft)?;

        self.rewards
            .create(CreateLoyaltyReward {
                vendor_id: ctx.vendor_id,
                name: draft.name,
                description: draft.description,
                points_required: draft.points_required,
            })
            .await
    }

    pub async fn update_reward(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        patch: RewardPatch,
    ) -> VendoResult<LoyaltyReward> {
        ctx.require_active()?;
        contract::check(&patch)?;

        self.rewards
            .update(
                ctx.vendor_id,
                id,
                UpdateLoyaltyReward {
                    name: patch.name,
                    description: patch.description.map(Some),
                    points_required: patch.points_required,
                    is_active: patch.is_active,
                },
            )
            .await
    }

    pub async fn delete_reward(&self, ctx: &TenantContext, id: Uuid) -> VendoResult<()> {
        ctx.require_active()?;
        self.rewards.delete(ctx.vendor_id, id).await
    }

    pub async fn list_rewards(
        &self,
        ctx: &TenantContext,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<LoyaltyReward>> {
        ctx.require_active()?;
        self.rewards.list(ctx.vendor_id, pagination).await
    }

    // ----- Points -----

    /// Manual grant (goodwill credit, promotion).
    pub async fn grant(&self, ctx: &TenantContext, grant: PointGrant) -> VendoResult<LoyaltyPoint> {
        ctx.require_active()?;
        contract::check(&grant)?;

        self.points
            .append(
                ctx.vendor_id,
                CreateLoyaltyPoint {
                    customer_id: grant.customer_id,
                    points: grant.points,
                    reason: grant.reason,
                },
            )
            .await
    }

    /// Redeem a reward against a customer's balance. Insufficient
    /// points is a conflict, not a validation failure.
    pub async fn redeem(
        &self,
        ctx: &TenantContext,
        request: RedeemRequest,
    ) -> VendoResult<LoyaltyPoint> {
        ctx.require_active()?;

        let reward = self.rewards.get(ctx.vendor_id, request.reward_id).await?;
        if !reward.is_active {
            return Err(VendoError::Conflict {
                reason: format!("reward '{}' is not active", reward.name),
            });
        }

        let balance = self
            .points
            .balance(ctx.vendor_id, request.customer_id)
            .await?;
        let required = i64::from(reward.points_required);
        if balance < required {
            return Err(VendoError::Conflict {
                reason: format!(
                    "insufficient loyalty points: have {balance}, need {required}"
                ),
            });
        }

        self.points
            .append(
                ctx.vendor_id,
                CreateLoyaltyPoint {
                    customer_id: request.customer_id,
                    points: -required,
                    reason: format!("redeemed: {}", reward.name),
                },
            )
            .await
    }

    pub async fn balance(&self, ctx: &TenantContext, customer_id: Uuid) -> VendoResult<i64> {
        ctx.require_active()?;
        self.points.balance(ctx.vendor_id, customer_id).await
    }

    pub async fn history(
        &self,
        ctx: &TenantContext,
        customer_id: Uuid,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<LoyaltyPoint>> {
        ctx.require_active()?;
        self.points
            .list_for_customer(ctx.vendor_id, customer_id, pagination)
            .await
    }
}

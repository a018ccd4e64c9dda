//! SurrealDB implementations of [`LoyaltyRewardRepository`] and
//! [`LoyaltyPointRepository`].
//!
//! Points carry no vendor id of their own; every operation first checks
//! that the customer belongs to the calling vendor. A chain miss is
//! reported as the customer not being found, exactly like a direct
//! out-of-scope lookup.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vendo_core::error::VendoResult;
use vendo_core::models::loyalty::{
    CreateLoyaltyPoint, CreateLoyaltyReward, LoyaltyPoint, LoyaltyReward, UpdateLoyaltyReward,
};
use vendo_core::repository::{
    LoyaltyPointRepository, LoyaltyRewardRepository, PaginatedResult, Pagination,
};

use crate::error::DbError;

// -----------------------------------------------------------------------
// Rewards (vendor scope)
// -----------------------------------------------------------------------

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct RewardRow {
    vendor_id: String,
    name: String,
    description: Option<String>,
    points_required: u32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct RewardRowWithId {
    record_id: String,
    vendor_id: String,
    name: String,
    description: Option<String>,
    points_required: u32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RewardRow {
    fn into_reward(self, id: Uuid) -> Result<LoyaltyReward, DbError> {
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(LoyaltyReward {
            id,
            vendor_id,
            name: self.name,
            description: self.description,
            points_required: self.points_required,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl RewardRowWithId {
    fn try_into_reward(self) -> Result<LoyaltyReward, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(LoyaltyReward {
            id,
            vendor_id,
            name: self.name,
            description: self.description,
            points_required: self.points_required,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Row struct for balance queries.
#[derive(Debug, SurrealValue)]
struct BalanceRow {
    total: i64,
}

/// SurrealDB implementation of the LoyaltyReward repository.
#[derive(Clone)]
pub struct SurrealLoyaltyRewardRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealLoyaltyRewardRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> LoyaltyRewardRepository for SurrealLoyaltyRewardRepository<C> {
    async fn create(&self, input: CreateLoyaltyReward) -> VendoResult<LoyaltyReward> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('loyalty_reward', $id) SET \
                 vendor_id = $vendor_id, \
                 name = $name, description = $description, \
                 points_required = $points_required, \
                 is_active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", input.vendor_id.to_string()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("points_required", input.points_required))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<RewardRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "loyalty_reward".into(),
            id: id_str,
        })?;

        Ok(row.into_reward(id)?)
    }

    async fn get(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<LoyaltyReward> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('loyalty_reward', $id) \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RewardRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "loyalty_reward".into(),
            id: id_str,
        })?;

        Ok(row.into_reward(id)?)
    }

    async fn update(
        &self,
        vendor_id: Uuid,
        id: Uuid,
        input: UpdateLoyaltyReward,
    ) -> VendoResult<LoyaltyReward> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.points_required.is_some() {
            sets.push("points_required = $points_required");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('loyalty_reward', $id) SET {} \
             WHERE vendor_id = $vendor_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            // description is Option<Option<String>>: Some(None) = clear
            builder = builder.bind(("description", description));
        }
        if let Some(points_required) = input.points_required {
            builder = builder.bind(("points_required", points_required));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<RewardRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "loyalty_reward".into(),
            id: id_str,
        })?;

        Ok(row.into_reward(id)?)
    }

    async fn delete(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('loyalty_reward', $id) \
                 WHERE vendor_id = $vendor_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RewardRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "loyalty_reward".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<LoyaltyReward>> {
        let vendor_id_str = vendor_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM loyalty_reward \
                 WHERE vendor_id = $vendor_id GROUP ALL",
            )
            .bind(("vendor_id", vendor_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM loyalty_reward \
                 WHERE vendor_id = $vendor_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("vendor_id", vendor_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RewardRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_reward())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

// -----------------------------------------------------------------------
// Points (child scope via customer)
// -----------------------------------------------------------------------

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct PointRow {
    customer_id: String,
    points: i64,
    reason: String,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct PointRowWithId {
    record_id: String,
    customer_id: String,
    points: i64,
    reason: String,
    created_at: DateTime<Utc>,
}

impl PointRow {
    fn into_point(self, id: Uuid) -> Result<LoyaltyPoint, DbError> {
        let customer_id = Uuid::parse_str(&self.customer_id)
            .map_err(|e| DbError::Migration(format!("invalid customer UUID: {e}")))?;
        Ok(LoyaltyPoint {
            id,
            customer_id,
            points: self.points,
            reason: self.reason,
            created_at: self.created_at,
        })
    }
}

impl PointRowWithId {
    fn try_into_point(self) -> Result<LoyaltyPoint, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let customer_id = Uuid::parse_str(&self.customer_id)
            .map_err(|e| DbError::Migration(format!("invalid customer UUID: {e}")))?;
        Ok(LoyaltyPoint {
            id,
            customer_id,
            points: self.points,
            reason: self.reason,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the LoyaltyPoint repository.
#[derive(Clone)]
pub struct SurrealLoyaltyPointRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealLoyaltyPointRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Tenant-chain check: the customer must exist under `vendor_id`.
    async fn assert_customer_in_scope(
        &self,
        vendor_id: Uuid,
        customer_id: Uuid,
    ) -> Result<(), DbError> {
        let customer_id_str = customer_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM type::record('customer', $customer_id) \
                 WHERE vendor_id = $vendor_id GROUP ALL",
            )
            .bind(("customer_id", customer_id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        if rows.first().map(|r| r.total).unwrap_or(0) == 0 {
            return Err(DbError::NotFound {
                entity: "customer".into(),
                id: customer_id_str,
            });
        }

        Ok(())
    }
}

impl<C: Connection> LoyaltyPointRepository for SurrealLoyaltyPointRepository<C> {
    async fn append(&self, vendor_id: Uuid, input: CreateLoyaltyPoint) -> VendoResult<LoyaltyPoint> {
        self.assert_customer_in_scope(vendor_id, input.customer_id)
            .await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('loyalty_point', $id) SET \
                 customer_id = $customer_id, \
                 points = $points, reason = $reason",
            )
            .bind(("id", id_str.clone()))
            .bind(("customer_id", input.customer_id.to_string()))
            .bind(("points", input.points))
            .bind(("reason", input.reason))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<PointRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "loyalty_point".into(),
            id: id_str,
        })?;

        Ok(row.into_point(id)?)
    }

    async fn list_for_customer(
        &self,
        vendor_id: Uuid,
        customer_id: Uuid,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<LoyaltyPoint>> {
        self.assert_customer_in_scope(vendor_id, customer_id)
            .await?;

        let customer_id_str = customer_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM loyalty_point \
                 WHERE customer_id = $customer_id GROUP ALL",
            )
            .bind(("customer_id", customer_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM loyalty_point \
                 WHERE customer_id = $customer_id \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("customer_id", customer_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PointRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_point())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn balance(&self, vendor_id: Uuid, customer_id: Uuid) -> VendoResult<i64> {
        self.assert_customer_in_scope(vendor_id, customer_id)
            .await?;

        let mut result = self
            .db
            .query(
                "SELECT math::sum(points) AS total FROM loyalty_point \
                 WHERE customer_id = $customer_id GROUP ALL",
            )
            .bind(("customer_id", customer_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BalanceRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}

//! SurrealDB implementation of [`ProfileRepository`].
//!
//! Profiles are the only globally-scoped entity: lookups by subject and
//! the admin listing cross tenant boundaries by design.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vendo_core::error::VendoResult;
use vendo_core::models::profile::{CreateProfile, OnboardingStatus, Profile, UpdateProfile};
use vendo_core::repository::{PaginatedResult, Pagination, ProfileRepository};

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ProfileRow {
    subject: String,
    business_name: String,
    owner_name: String,
    phone: String,
    email: String,
    address: Option<String>,
    onboarding_status: String,
    is_admin: bool,
    features: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ProfileRowWithId {
    record_id: String,
    subject: String,
    business_name: String,
    owner_name: String,
    phone: String,
    email: String,
    address: Option<String>,
    onboarding_status: String,
    is_admin: bool,
    features: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_status(s: &str) -> Result<OnboardingStatus, DbError> {
    match s {
        "Pending" => Ok(OnboardingStatus::Pending),
        "Active" => Ok(OnboardingStatus::Active),
        "Rejected" => Ok(OnboardingStatus::Rejected),
        other => Err(DbError::Migration(format!(
            "unknown onboarding status: {other}"
        ))),
    }
}

fn status_to_string(s: OnboardingStatus) -> &'static str {
    match s {
        OnboardingStatus::Pending => "Pending",
        OnboardingStatus::Active => "Active",
        OnboardingStatus::Rejected => "Rejected",
    }
}

impl ProfileRow {
    fn into_profile(self, id: Uuid) -> Result<Profile, DbError> {
        Ok(Profile {
            id,
            subject: self.subject,
            business_name: self.business_name,
            owner_name: self.owner_name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            onboarding_status: parse_status(&self.onboarding_status)?,
            is_admin: self.is_admin,
            features: self.features,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl ProfileRowWithId {
    fn try_into_profile(self) -> Result<Profile, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Profile {
            id,
            subject: self.subject,
            business_name: self.business_name,
            owner_name: self.owner_name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            onboarding_status: parse_status(&self.onboarding_status)?,
            is_admin: self.is_admin,
            features: self.features,
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

/// SurrealDB implementation of the Profile repository.
#[derive(Clone)]
pub struct SurrealProfileRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProfileRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProfileRepository for SurrealProfileRepository<C> {
    async fn create(&self, input: CreateProfile) -> VendoResult<Profile> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('profile', $id) SET \
                 subject = $subject, \
                 business_name = $business_name, \
                 owner_name = $owner_name, \
                 phone = $phone, email = $email, \
                 address = $address, \
                 onboarding_status = 'Pending', \
                 is_admin = false, \
                 features = []",
            )
            .bind(("id", id_str.clone()))
            .bind(("subject", input.subject))
            .bind(("business_name", input.business_name))
            .bind(("owner_name", input.owner_name))
            .bind(("phone", input.phone))
            .bind(("email", input.email))
            .bind(("address", input.address))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> VendoResult<Profile> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('profile', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn get_by_subject(&self, subject: &str) -> VendoResult<Profile> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM profile \
                 WHERE subject = $subject",
            )
            .bind(("subject", subject.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: format!("subject={subject}"),
        })?;

        Ok(row.try_into_profile()?)
    }

    async fn update(&self, id: Uuid, input: UpdateProfile) -> VendoResult<Profile> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.business_name.is_some() {
            sets.push("business_name = $business_name");
        }
        if input.owner_name.is_some() {
            sets.push("owner_name = $owner_name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        if input.features.is_some() {
            sets.push("features = $features");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('profile', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(business_name) = input.business_name {
            builder = builder.bind(("business_name", business_name));
        }
        if let Some(owner_name) = input.owner_name {
            builder = builder.bind(("owner_name", owner_name));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(address) = input.address {
            // address is Option<Option<String>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("address", address));
        }
        if let Some(features) = input.features {
            builder = builder.bind(("features", features));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn set_status(&self, id: Uuid, status: OnboardingStatus) -> VendoResult<Profile> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('profile', $id) SET \
                 onboarding_status = $status, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", status_to_string(status).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn set_admin(&self, id: Uuid, is_admin: bool) -> VendoResult<Profile> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('profile', $id) SET \
                 is_admin = $is_admin, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("is_admin", is_admin))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "profile".into(),
            id: id_str,
        })?;

        Ok(row.into_profile(id)?)
    }

    async fn list(&self, pagination: Pagination) -> VendoResult<PaginatedResult<Profile>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM profile GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM profile \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_profile())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

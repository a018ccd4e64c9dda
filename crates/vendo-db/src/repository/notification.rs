//! SurrealDB implementation of [`NotificationRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;
use vendo_core::error::VendoResult;
use vendo_core::models::notification::{CreateNotification, Notification};
use vendo_core::repository::{NotificationRepository, PaginatedResult, Pagination};

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct NotificationRow {
    vendor_id: String,
    title: String,
    body: String,
    read: bool,
    created_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct NotificationRowWithId {
    record_id: String,
    vendor_id: String,
    title: String,
    body: String,
    read: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_notification(self, id: Uuid) -> Result<Notification, DbError> {
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(Notification {
            id,
            vendor_id,
            title: self.title,
            body: self.body,
            read: self.read,
            created_at: self.created_at,
        })
    }
}

impl NotificationRowWithId {
    fn try_into_notification(self) -> Result<Notification, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let vendor_id = Uuid::parse_str(&self.vendor_id)
            .map_err(|e| DbError::Migration(format!("invalid vendor UUID: {e}")))?;
        Ok(Notification {
            id,
            vendor_id,
            title: self.title,
            body: self.body,
            read: self.read,
            created_at: self.created_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Notification repository.
#[derive(Clone)]
pub struct SurrealNotificationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealNotificationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> NotificationRepository for SurrealNotificationRepository<C> {
    async fn create(&self, input: CreateNotification) -> VendoResult<Notification> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('notification', $id) SET \
                 vendor_id = $vendor_id, \
                 title = $title, body = $body, \
                 read = false",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", input.vendor_id.to_string()))
            .bind(("title", input.title))
            .bind(("body", input.body))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<NotificationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "notification".into(),
            id: id_str,
        })?;

        Ok(row.into_notification(id)?)
    }

    async fn list(
        &self,
        vendor_id: Uuid,
        pagination: Pagination,
    ) -> VendoResult<PaginatedResult<Notification>> {
        let vendor_id_str = vendor_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM notification \
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
                "SELECT meta::id(id) AS record_id, * FROM notification \
                 WHERE vendor_id = $vendor_id \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("vendor_id", vendor_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<NotificationRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_notification())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn mark_read(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<Notification> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('notification', $id) SET \
                 read = true \
                 WHERE vendor_id = $vendor_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<NotificationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "notification".into(),
            id: id_str,
        })?;

        Ok(row.into_notification(id)?)
    }

    async fn unread_count(&self, vendor_id: Uuid) -> VendoResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM notification \
                 WHERE vendor_id = $vendor_id AND read = false \
                 GROUP ALL",
            )
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn delete(&self, vendor_id: Uuid, id: Uuid) -> VendoResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "DELETE type::record('notification', $id) \
                 WHERE vendor_id = $vendor_id RETURN BEFORE",
            )
            .bind(("id", id_str.clone()))
            .bind(("vendor_id", vendor_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<NotificationRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "notification".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }
}

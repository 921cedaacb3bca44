use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Text, Timestamptz};
use diesel_async::pooled_connection::{bb8::Pool, PoolError};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use serde::Serialize;
use shared::{Item, LookupField, NewItem};
use thiserror::Error;

use crate::models::*;
use crate::schema::*;

pub type DbPool = Pool<AsyncPgConnection>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] bb8::RunError<PoolError>),

    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

/// Connectivity probe result.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub current_time: DateTime<Utc>,
    pub pg_version: String,
}

/// Access to the `items` table.
///
/// Listings are ordered newest first by `created_at`, ties broken by
/// descending `id`, so repeated page requests see a stable order.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn recent(&self, limit: i64) -> Result<Vec<Item>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    async fn page(&self, offset: i64, limit: i64) -> Result<Vec<Item>, StoreError>;

    /// Distinct non-null values of `field`, ascending.
    async fn distinct_values(&self, field: LookupField) -> Result<Vec<String>, StoreError>;

    async fn insert(&self, item: NewItem) -> Result<Item, StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    async fn status(&self) -> Result<StoreStatus, StoreError>;
}

/// Every column, newest first with `id` breaking `created_at` ties.
fn newest_first(offset: i64, limit: i64) -> items::BoxedQuery<'static, Pg> {
    items::table
        .into_boxed()
        .order((items::created_at.desc(), items::id.desc()))
        .limit(limit)
        .offset(offset)
}

/// Distinct non-null values of one lookup column, ascending.
fn distinct_column(field: LookupField) -> items::BoxedQuery<'static, Pg, Text> {
    match field {
        LookupField::Shade => items::table
            .into_boxed()
            .select(items::shade)
            .distinct()
            .order(items::shade.asc()),
        LookupField::BoughtFromMill => items::table
            .into_boxed()
            .select(items::bought_from_mill.assume_not_null())
            .filter(items::bought_from_mill.is_not_null())
            .distinct()
            .order(items::bought_from_mill.asc()),
        LookupField::SoldTo => items::table
            .into_boxed()
            .select(items::sold_to)
            .distinct()
            .order(items::sold_to.asc()),
    }
}

pub struct PgItemStore {
    pool: DbPool,
}

impl PgItemStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn recent(&self, limit: i64) -> Result<Vec<Item>, StoreError> {
        let mut conn = self.pool.get().await?;

        let rows = newest_first(0, limit).load::<ItemRow>(&mut conn).await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        let total = items::table.count().get_result::<i64>(&mut conn).await?;
        Ok(total)
    }

    async fn page(&self, offset: i64, limit: i64) -> Result<Vec<Item>, StoreError> {
        let mut conn = self.pool.get().await?;

        let rows = newest_first(offset, limit).load::<ItemRow>(&mut conn).await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn distinct_values(&self, field: LookupField) -> Result<Vec<String>, StoreError> {
        let mut conn = self.pool.get().await?;

        let values = distinct_column(field).load::<String>(&mut conn).await?;
        Ok(values)
    }

    async fn insert(&self, item: NewItem) -> Result<Item, StoreError> {
        let mut conn = self.pool.get().await?;

        let row = diesel::insert_into(items::table)
            .values(NewItemRow::from(item))
            .returning(ItemRow::as_returning())
            .get_result::<ItemRow>(&mut conn)
            .await?;

        Ok(row.into())
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;

        let affected = diesel::delete(items::table.find(id))
            .execute(&mut conn)
            .await?;

        Ok(affected > 0)
    }

    async fn status(&self) -> Result<StoreStatus, StoreError> {
        let mut conn = self.pool.get().await?;

        let (current_time, pg_version) = diesel::select((
            sql::<Timestamptz>("NOW()"),
            sql::<Text>("version()"),
        ))
        .get_result::<(DateTime<Utc>, String)>(&mut conn)
        .await?;

        Ok(StoreStatus {
            current_time,
            pg_version,
        })
    }
}

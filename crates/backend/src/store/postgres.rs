//! Postgres datastore adapter.
//!
//! Documents live in a single `document` table (kind, id-or-name, jsonb
//! data); equality queries filter on a top-level JSON field. Queries are
//! built at runtime because the schema is created by this crate's own
//! embedded migration.

use std::time::Duration;

use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{Datastore, DatastoreError, Key, Kind};

/// Postgres-backed document store.
#[derive(Debug, Clone)]
pub struct PgDatastore {
    pool: PgPool,
}

impl PgDatastore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with the pool defaults used across Hallowmart services.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the connection cannot be established.
    pub async fn connect(database_url: &secrecy::SecretString) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url.expose_secret())
            .await?;
        Ok(Self::new(pool))
    }

    /// Run the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `MigrateError` if a migration fails to apply.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// The underlying pool, for health checks.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Datastore for PgDatastore {
    async fn get(&self, key: &Key) -> Result<Option<Value>, DatastoreError> {
        let row = match key {
            Key::Id(kind, id) => {
                sqlx::query("SELECT data FROM document WHERE kind = $1 AND id = $2")
                    .bind(kind.as_str())
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            Key::Name(kind, name) => {
                sqlx::query("SELECT data FROM document WHERE kind = $1 AND name = $2")
                    .bind(kind.as_str())
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        row.map(|r| r.try_get::<Value, _>("data"))
            .transpose()
            .map_err(DatastoreError::from)
    }

    async fn insert(&self, kind: Kind, doc: &Value) -> Result<i64, DatastoreError> {
        let row = sqlx::query(
            "INSERT INTO document (kind, id, data) \
             VALUES ($1, nextval('document_id_seq'), $2) \
             RETURNING id",
        )
        .bind(kind.as_str())
        .bind(doc)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("id")?)
    }

    async fn put(&self, key: &Key, doc: &Value) -> Result<(), DatastoreError> {
        match key {
            Key::Id(kind, id) => {
                sqlx::query(
                    "INSERT INTO document (kind, id, data) VALUES ($1, $2, $3) \
                     ON CONFLICT (kind, id) WHERE id IS NOT NULL \
                     DO UPDATE SET data = EXCLUDED.data",
                )
                .bind(kind.as_str())
                .bind(id)
                .bind(doc)
                .execute(&self.pool)
                .await?;
            }
            Key::Name(kind, name) => {
                sqlx::query(
                    "INSERT INTO document (kind, name, data) VALUES ($1, $2, $3) \
                     ON CONFLICT (kind, name) WHERE name IS NOT NULL \
                     DO UPDATE SET data = EXCLUDED.data",
                )
                .bind(kind.as_str())
                .bind(name)
                .bind(doc)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    async fn list(&self, kind: Kind) -> Result<Vec<(i64, Value)>, DatastoreError> {
        let rows = sqlx::query(
            "SELECT id, data FROM document \
             WHERE kind = $1 AND id IS NOT NULL \
             ORDER BY id",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                let id: i64 = r.try_get("id")?;
                let data: Value = r.try_get("data")?;
                Ok((id, data))
            })
            .collect()
    }

    async fn query(
        &self,
        kind: Kind,
        field: &str,
        value: &str,
    ) -> Result<Vec<(i64, Value)>, DatastoreError> {
        let rows = sqlx::query(
            "SELECT id, data FROM document \
             WHERE kind = $1 AND id IS NOT NULL AND data->>($2::text) = $3 \
             ORDER BY id",
        )
        .bind(kind.as_str())
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| {
                let id: i64 = r.try_get("id")?;
                let data: Value = r.try_get("data")?;
                Ok((id, data))
            })
            .collect()
    }
}

//! Document store port.
//!
//! The storage backend is a managed key/value document store reached through
//! this narrow port: get-by-key, put-by-key, insert with a store-assigned id,
//! and single-field equality queries. Keeping the port explicit lets the
//! service run against Postgres in production and an in-memory map in tests.
//!
//! There is no optimistic concurrency token and no transaction wrapping:
//! every write replaces the whole document, and concurrent writers to the
//! same key are last-write-wins.

use serde_json::Value;
use thiserror::Error;

mod memory;
mod postgres;

pub use memory::MemoryDatastore;
pub use postgres::PgDatastore;

/// Entity kinds the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    User,
    Product,
    TransactionCounter,
}

impl Kind {
    /// Stable string form used as the `kind` column / map key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Product => "Product",
            Self::TransactionCounter => "TransactionCounter",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document key: kind plus either a store-assigned numeric id or a
/// well-known name (used for singleton documents like the transaction
/// counter).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Id(Kind, i64),
    Name(Kind, String),
}

impl Key {
    /// The kind this key addresses.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Id(kind, _) | Self::Name(kind, _) => *kind,
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(kind, id) => write!(f, "{kind}/{id}"),
            Self::Name(kind, name) => write!(f, "{kind}/{name}"),
        }
    }
}

/// Storage failures surfaced through the port.
#[derive(Debug, Error)]
pub enum DatastoreError {
    /// The backing database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored document could not be decoded.
    #[error("corrupt document at {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

/// The document store port.
///
/// Methods return `Send` futures so the service stays generic over the
/// adapter inside tokio tasks.
pub trait Datastore: Send + Sync + 'static {
    /// Fetch a document by key. Absent keys are `Ok(None)`.
    fn get(
        &self,
        key: &Key,
    ) -> impl Future<Output = Result<Option<Value>, DatastoreError>> + Send;

    /// Insert a new document of `kind`, letting the store assign its
    /// numeric id. Returns the assigned id.
    fn insert(
        &self,
        kind: Kind,
        doc: &Value,
    ) -> impl Future<Output = Result<i64, DatastoreError>> + Send;

    /// Write a full document at `key`, creating or replacing it.
    fn put(
        &self,
        key: &Key,
        doc: &Value,
    ) -> impl Future<Output = Result<(), DatastoreError>> + Send;

    /// Return all id-keyed documents of `kind`, paired with their ids,
    /// in id order.
    fn list(
        &self,
        kind: Kind,
    ) -> impl Future<Output = Result<Vec<(i64, Value)>, DatastoreError>> + Send;

    /// Return all id-keyed documents of `kind` whose top-level `field`
    /// equals `value` (string comparison), paired with their ids.
    fn query(
        &self,
        kind: Kind,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<Vec<(i64, Value)>, DatastoreError>> + Send;
}

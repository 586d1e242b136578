//! Product catalog seeding.
//!
//! The catalog ships as a JSON descriptor keyed by display name. Seeding
//! runs at startup and is idempotent: a product whose display name is
//! already present in the store is left alone, so restarting the backend
//! never duplicates catalog entries.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use hallowmart_core::{Product, ProductId};

use crate::store::{Datastore, DatastoreError, Key, Kind};

/// One catalog descriptor entry; the display name is the map key.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub cost: Decimal,
    pub picture_url: String,
    pub description: String,
}

/// The parsed catalog descriptor, ordered by display name.
pub type Catalog = BTreeMap<String, CatalogEntry>;

/// Failures while loading or applying the catalog.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog descriptor: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Datastore(#[from] DatastoreError),
}

/// Parse a catalog descriptor from its JSON text.
///
/// # Errors
///
/// Returns `SeedError::Parse` if the JSON does not match the descriptor
/// shape.
pub fn parse_catalog(raw: &str) -> Result<Catalog, SeedError> {
    Ok(serde_json::from_str(raw)?)
}

/// Read and apply a catalog descriptor file.
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read or parsed, or if the
/// store rejects a write.
pub async fn seed_from_file<S: Datastore>(store: &S, path: &Path) -> Result<usize, SeedError> {
    let raw = std::fs::read_to_string(path)?;
    let catalog = parse_catalog(&raw)?;
    seed_catalog(store, &catalog).await
}

/// Insert every catalog entry whose display name is not yet present.
///
/// Returns the number of products created. Each new product is inserted,
/// then rewritten with its store-assigned id so the document is
/// self-describing.
///
/// # Errors
///
/// Returns `SeedError::Datastore` if a store operation fails.
pub async fn seed_catalog<S: Datastore>(store: &S, catalog: &Catalog) -> Result<usize, SeedError> {
    let mut created = 0;
    for (display_name, entry) in catalog {
        let existing = store
            .query(Kind::Product, "display_name", display_name)
            .await?;
        if !existing.is_empty() {
            tracing::debug!(display_name, "product already present, skipping");
            continue;
        }

        let mut product = Product {
            id: None,
            display_name: display_name.clone(),
            cost: entry.cost,
            description: entry.description.clone(),
            picture_url: entry.picture_url.clone(),
        };
        let id = store
            .insert(Kind::Product, &serde_json::to_value(&product)?)
            .await?;
        product.id = Some(ProductId::new(id));
        store
            .put(&Key::Id(Kind::Product, id), &serde_json::to_value(&product)?)
            .await?;
        tracing::info!(display_name, id, "seeded product");
        created += 1;
    }
    Ok(created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::dec;

    use crate::store::MemoryDatastore;

    use super::*;

    const CATALOG: &str = r#"
    {
        "pumpkin": {
            "cost": "4.00",
            "picture_url": "/static/img/pumpkin.png",
            "description": "round and orange"
        },
        "scented candle": {
            "cost": "9.99",
            "picture_url": "/static/img/candle.png",
            "description": "a mix of pumpkin spice, bonfire, and vanilla"
        }
    }"#;

    #[test]
    fn test_parse_catalog_reads_entries() {
        let catalog = parse_catalog(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["pumpkin"].cost, dec!(4.00));
        assert_eq!(catalog["scented candle"].picture_url, "/static/img/candle.png");
    }

    #[test]
    fn test_parse_catalog_rejects_malformed_descriptor() {
        assert!(parse_catalog("[1, 2, 3]").is_err());
        assert!(parse_catalog(r#"{"pumpkin": {"cost": "4.00"}}"#).is_err());
    }

    #[tokio::test]
    async fn test_seeding_twice_does_not_duplicate() {
        let store = MemoryDatastore::new();
        let catalog = parse_catalog(CATALOG).unwrap();

        assert_eq!(seed_catalog(&store, &catalog).await.unwrap(), 2);
        assert_eq!(seed_catalog(&store, &catalog).await.unwrap(), 0);

        let products = store.list(Kind::Product).await.unwrap();
        assert_eq!(products.len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_documents_carry_their_assigned_id() {
        let store = MemoryDatastore::new();
        let catalog = parse_catalog(CATALOG).unwrap();
        seed_catalog(&store, &catalog).await.unwrap();

        for (id, doc) in store.list(Kind::Product).await.unwrap() {
            let product: Product = serde_json::from_value(doc).unwrap();
            assert_eq!(product.id, Some(ProductId::new(id)));
        }
    }
}

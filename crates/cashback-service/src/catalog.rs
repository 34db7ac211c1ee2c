//! # Catalog Boundary
//!
//! Brand membership is looked up outside the engine. The service asks a
//! [`BrandLookup`] for each product's brands and hands the engine plain
//! `LineItem`s with the answer already filled in.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use cashback_core::Money;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Something that knows which brands a product belongs to.
///
/// A product with no brands is `Ok` with an empty set; `Err` is reserved
/// for lookups that could not be answered.
pub trait BrandLookup {
    fn brand_ids(&self, product_id: &str, taxonomy: &str) -> Result<BTreeSet<String>, CatalogError>;
}

impl<T: BrandLookup + ?Sized> BrandLookup for &T {
    fn brand_ids(&self, product_id: &str, taxonomy: &str) -> Result<BTreeSet<String>, CatalogError> {
        (**self).brand_ids(product_id, taxonomy)
    }
}

impl<T: BrandLookup + ?Sized> BrandLookup for Arc<T> {
    fn brand_ids(&self, product_id: &str, taxonomy: &str) -> Result<BTreeSet<String>, CatalogError> {
        (**self).brand_ids(product_id, taxonomy)
    }
}

/// A cart or order line before brand resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub line_total: Money,
}

impl CartLine {
    pub fn new(product_id: impl Into<String>, line_total: Money) -> Self {
        CartLine {
            product_id: product_id.into(),
            line_total,
        }
    }
}

/// Brand memberships held in memory, keyed by taxonomy then product.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    taxonomies: HashMap<String, HashMap<String, BTreeSet<String>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an empty taxonomy, so lookups against it succeed.
    pub fn with_taxonomy(mut self, taxonomy: impl Into<String>) -> Self {
        self.taxonomies.entry(taxonomy.into()).or_default();
        self
    }

    /// Adds brands for a product, creating the taxonomy if needed.
    pub fn with_brands<I, S>(mut self, taxonomy: &str, product_id: &str, brand_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(taxonomy, product_id, brand_ids);
        self
    }

    pub fn insert<I, S>(&mut self, taxonomy: &str, product_id: &str, brand_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taxonomies
            .entry(taxonomy.to_string())
            .or_default()
            .entry(product_id.to_string())
            .or_default()
            .extend(brand_ids.into_iter().map(Into::into));
    }
}

impl BrandLookup for InMemoryCatalog {
    fn brand_ids(&self, product_id: &str, taxonomy: &str) -> Result<BTreeSet<String>, CatalogError> {
        let products = self
            .taxonomies
            .get(taxonomy)
            .ok_or_else(|| CatalogError::TaxonomyNotFound(taxonomy.to_string()))?;

        Ok(products.get(product_id).cloned().unwrap_or_default())
    }
}

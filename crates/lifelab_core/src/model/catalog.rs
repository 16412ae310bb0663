//! External category catalog model.
//!
//! # Responsibility
//! - Define the shape of the seed catalog handed in by the content layer.
//! - Expose the title set used by category grouping.
//!
//! # Invariants
//! - The catalog is read-only input; core never loads or mutates seed
//!   content itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// One guided prompt attached to a subcategory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPrompt {
    pub id: Uuid,
    /// Prompt text shown when starting an experiment from the catalog.
    pub text: String,
}

/// Subdivision of a catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSubcategory {
    pub id: Uuid,
    pub title: String,
    /// Guided prompts, possibly empty.
    pub prompts: Vec<CatalogPrompt>,
}

/// Top-level catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCategory {
    pub id: Uuid,
    /// Display title; grouping matches experiment categories against this
    /// string exactly (after trimming).
    pub title: String,
    pub subcategories: Vec<CatalogSubcategory>,
}

/// Full seed catalog as provided by the content layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCatalog {
    pub categories: Vec<CatalogCategory>,
}

impl CategoryCatalog {
    /// Returns the set of known category titles, trimmed.
    pub fn titles(&self) -> BTreeSet<&str> {
        self.categories
            .iter()
            .map(|category| category.title.trim())
            .collect()
    }
}

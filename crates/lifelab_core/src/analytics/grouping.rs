//! Category grouping engine.
//!
//! # Responsibility
//! - Partition records into category boxes: catalog-defined, custom and
//!   uncategorized.
//! - Order boxes for display: populated by recency, empty alphabetically.
//!
//! # Invariants
//! - Every record lands in exactly one box.
//! - Matching against catalog titles is exact on the trimmed category text.
//! - Records sharing identical custom category text share one Custom box.

use crate::model::catalog::CategoryCatalog;
use crate::model::experiment::ExperimentRecord;
use std::collections::BTreeSet;

/// `updated_at` sentinel for boxes with no members.
pub const EMPTY_BOX_UPDATED_AT: i64 = i64::MIN;

/// Display title of the custom box.
pub const CUSTOM_BOX_TITLE: &str = "Custom";

/// Display title of the uncategorized box.
pub const UNCATEGORIZED_BOX_TITLE: &str = "Uncategorized";

/// Which partition a box belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    /// A category known to the external catalog.
    Catalog,
    /// Non-empty categories absent from the catalog.
    Custom,
    /// Records with empty or whitespace-only category.
    Uncategorized,
}

/// One category-grouping bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBox {
    pub kind: BoxKind,
    pub title: String,
    /// Member records in snapshot order.
    pub members: Vec<ExperimentRecord>,
    /// Max member `updated_at`, or [`EMPTY_BOX_UPDATED_AT`] when empty.
    pub updated_at: i64,
    /// Distinct sorted literal category strings; Custom box only.
    pub custom_category_names: Vec<String>,
}

impl CategoryBox {
    fn new(kind: BoxKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            members: Vec::new(),
            updated_at: EMPTY_BOX_UPDATED_AT,
            custom_category_names: Vec::new(),
        }
    }

    fn push(&mut self, record: &ExperimentRecord) {
        self.updated_at = self.updated_at.max(record.updated_at);
        self.members.push(record.clone());
    }
}

/// Partitions the snapshot into sorted category boxes.
///
/// Without a catalog the result degenerates to Custom and Uncategorized
/// only. Populated boxes come first ordered by `updated_at` descending;
/// empty boxes follow ordered alphabetically by title.
pub fn group_by_category(
    snapshot: &[ExperimentRecord],
    catalog: Option<&CategoryCatalog>,
) -> Vec<CategoryBox> {
    let mut catalog_boxes: Vec<CategoryBox> = catalog
        .map(|catalog| {
            catalog
                .categories
                .iter()
                .map(|category| CategoryBox::new(BoxKind::Catalog, category.title.trim()))
                .collect()
        })
        .unwrap_or_default();
    let mut custom_box = CategoryBox::new(BoxKind::Custom, CUSTOM_BOX_TITLE);
    let mut uncategorized_box = CategoryBox::new(BoxKind::Uncategorized, UNCATEGORIZED_BOX_TITLE);
    let mut custom_names: BTreeSet<String> = BTreeSet::new();

    for record in snapshot {
        match record.trimmed_category() {
            None => uncategorized_box.push(record),
            Some(category) => {
                if let Some(catalog_box) = catalog_boxes
                    .iter_mut()
                    .find(|candidate| candidate.title == category)
                {
                    catalog_box.push(record);
                } else {
                    custom_names.insert(category.to_string());
                    custom_box.push(record);
                }
            }
        }
    }

    custom_box.custom_category_names = custom_names.into_iter().collect();

    let mut boxes = catalog_boxes;
    boxes.push(custom_box);
    boxes.push(uncategorized_box);

    // Two-tier sort: populated boxes by recency, empty boxes by title.
    boxes.sort_by(|a, b| match (a.members.is_empty(), b.members.is_empty()) {
        (false, false) => b.updated_at.cmp(&a.updated_at),
        (false, true) => std::cmp::Ordering::Less,
        (true, false) => std::cmp::Ordering::Greater,
        (true, true) => a.title.cmp(&b.title),
    });

    boxes
}

//! Completeness: does every expected asset exist?
//!
//! Expectations are re-derived from the word bank and phrase tables on every
//! call, through the same plan and layout the generator uses. Only existence
//! is checked; an empty or corrupt file counts as present here and is left to
//! [`crate::validate`].

use std::path::Path;

use crate::assets::{self, AssetCategory, AssetLayout, AssetPath};
use crate::error::ConfigError;
use crate::phrases::PhraseTables;
use crate::wordbank::WordBank;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCompleteness {
    pub category: AssetCategory,
    pub expected: usize,
    /// Missing paths in plan order.
    pub missing: Vec<AssetPath>,
}

impl CategoryCompleteness {
    pub fn found(&self) -> usize {
        self.expected - self.missing.len()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletenessReport {
    pub categories: Vec<CategoryCompleteness>,
}

impl CompletenessReport {
    pub fn expected(&self) -> usize {
        self.categories.iter().map(|c| c.expected).sum()
    }

    pub fn found(&self) -> usize {
        self.categories.iter().map(CategoryCompleteness::found).sum()
    }

    pub fn missing(&self) -> impl Iterator<Item = &AssetPath> {
        self.categories.iter().flat_map(|c| c.missing.iter())
    }

    pub fn missing_count(&self) -> usize {
        self.categories.iter().map(|c| c.missing.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.categories.iter().all(CategoryCompleteness::is_complete)
    }
}

/// Every path the generator would write for this bank and these tables.
pub fn expected_paths(
    bank: &WordBank,
    phrases: &PhraseTables,
    layout: &AssetLayout,
) -> Vec<AssetPath> {
    assets::expected_assets(bank, phrases)
        .iter()
        .map(|kind| layout.resolve(kind))
        .collect()
}

pub fn check(
    root: &Path,
    bank: &WordBank,
    phrases: &PhraseTables,
    layout: &AssetLayout,
) -> Result<CompletenessReport, ConfigError> {
    if !root.is_dir() {
        return Err(ConfigError::AssetRootNotFound(root.to_path_buf()));
    }

    let categories = AssetCategory::ALL
        .into_iter()
        .map(|category| {
            let planned = assets::plan(category, bank, phrases);
            let expected = planned.len();
            let missing: Vec<AssetPath> = planned
                .iter()
                .map(|kind| layout.resolve(kind))
                .filter(|path| !path.on_disk(root).is_file())
                .collect();

            log::info!(
                "{}: {}/{} present",
                category.description(),
                expected - missing.len(),
                expected
            );
            for path in &missing {
                log::debug!("Missing {path}");
            }
            CategoryCompleteness {
                category,
                expected,
                missing,
            }
        })
        .collect();

    Ok(CompletenessReport { categories })
}

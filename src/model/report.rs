//! Structured reports returned by batch operations.
//!
//! Batch operations (portable import, duplicate merge pass) never abort
//! wholesale on a single bad row; they accumulate counts and errors and
//! always hand the report back to the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ImportReport {
    pub created: BTreeMap<String, usize>,
    pub updated: BTreeMap<String, usize>,
    pub skipped: BTreeMap<String, usize>,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn created(&mut self, entity: &str) {
        *self.created.entry(entity.to_string()).or_insert(0) += 1;
    }

    pub fn updated(&mut self, entity: &str) {
        *self.updated.entry(entity.to_string()).or_insert(0) += 1;
    }

    pub fn skipped(&mut self, entity: &str) {
        *self.skipped.entry(entity.to_string()).or_insert(0) += 1;
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Fold a per-group report into the run total. Group reports are kept
    /// separate until their transaction commits so a rolled-back group
    /// contributes nothing but its error.
    pub fn absorb(&mut self, other: ImportReport) {
        for (entity, count) in other.created {
            *self.created.entry(entity).or_insert(0) += count;
        }
        for (entity, count) in other.updated {
            *self.updated.entry(entity).or_insert(0) += count;
        }
        for (entity, count) in other.skipped {
            *self.skipped.entry(entity).or_insert(0) += count;
        }
        self.errors.extend(other.errors);
    }

    pub fn created_count(&self, entity: &str) -> usize {
        self.created.get(entity).copied().unwrap_or(0)
    }

    pub fn updated_count(&self, entity: &str) -> usize {
        self.updated.get(entity).copied().unwrap_or(0)
    }

    pub fn skipped_count(&self, entity: &str) -> usize {
        self.skipped.get(entity).copied().unwrap_or(0)
    }

    /// One-line summary stored as the job result message.
    pub fn summary(&self) -> String {
        let created: usize = self.created.values().sum();
        let updated: usize = self.updated.values().sum();
        let skipped: usize = self.skipped.values().sum();
        format!(
            "created {} rows, updated {} rows, skipped {} rows, {} errors",
            created,
            updated,
            skipped,
            self.errors.len()
        )
    }
}

/// Result of one duplicate-reconciliation pass. All-or-nothing: on
/// rollback the pass reports zero merges.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct MergeReport {
    /// Duplicate rows collapsed into a canonical row.
    pub merged: usize,
    /// Team associations left behind because moving them would have put
    /// the same team number on one event twice.
    pub skipped_links: usize,
}

//! Sync reports

use serde::Serialize;

use crate::catalog::Catalog;
use crate::scan::FileSystemDiff;

/// Folder role in the import -> staging -> collection flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Import,
    Staging,
    Collection,
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Import => "import",
            Self::Staging => "staging",
            Self::Collection => "collection",
        };
        f.write_str(name)
    }
}

/// What a sync did to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    /// Catalog rebuilt from a full scan
    Rebuilt,
    /// Changed paths folded into the existing catalog
    Incremental,
    /// Nothing changed on disk
    Unchanged,
}

/// Report from a sync operation
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub role: RoleKind,
    pub action: SyncAction,
    /// Paths on disk matching the previous catalog
    pub unchanged: usize,
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Live items in the resulting catalog
    pub items: usize,
    /// Deleted items retained in the resulting catalog
    pub deleted_items: usize,
    /// Human-readable actions taken
    pub actions: Vec<String>,
}

impl SyncReport {
    pub(crate) fn new(
        role: RoleKind,
        action: SyncAction,
        diff: &FileSystemDiff,
        catalog: &Catalog,
    ) -> Self {
        Self {
            role,
            action,
            unchanged: diff.ok.len(),
            added: diff.add.len(),
            updated: diff.update.len(),
            deleted: diff.delete.len(),
            items: catalog.count(),
            deleted_items: catalog.deleted_count(),
            actions: Vec::new(),
        }
    }

    /// Add an action to the report
    pub fn with_action(mut self, action: String) -> Self {
        self.actions.push(action);
        self
    }
}

/// Result of a successful sync: the persisted catalog, the diff it was
/// reconciled from, and a report.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub catalog: Catalog,
    pub diff: FileSystemDiff,
    pub report: SyncReport,
}

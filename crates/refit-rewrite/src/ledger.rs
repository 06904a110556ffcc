//! Per-unit import bookkeeping.
//!
//! Rewrites do not edit the import list directly. They record requests in a
//! ledger scoped to one pass over one unit; at the end of the pass the
//! ledger is drained into an [`ImportPlan`] for the serialization
//! collaborator, which reconciles it against the rewritten tree. A removal
//! is a hint: an import still referenced after rewriting is retained no
//! matter how often its removal was requested.
//!
//! Requests are idempotent, and a conflicting later request for the same
//! name supersedes the earlier one (last writer wins).

use std::collections::BTreeMap;

/// The requested fate of one import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAction {
    /// The import should be present in the final unit.
    Add,
    /// The import may be dropped if nothing references it.
    Remove,
}

/// One entry of an [`ImportPlan`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImportRequest {
    /// Whether the request concerns a static member import.
    pub is_static: bool,
    /// The qualified name.
    pub name: String,
}

/// The final requested import deltas of one pass, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportPlan {
    /// Imports requested to be added.
    pub additions: Vec<ImportRequest>,
    /// Imports requested to be removed, subject to the reconciler's
    /// still-referenced check.
    pub removals: Vec<ImportRequest>,
}

impl ImportPlan {
    /// Returns whether the plan requests nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// Folds another plan into this one, deduplicating entries.
    pub fn merge(&mut self, other: Self) {
        self.additions.extend(other.additions);
        self.additions.sort();
        self.additions.dedup();
        self.removals.extend(other.removals);
        self.removals.sort();
        self.removals.dedup();
    }
}

/// Pass-scoped record of pending import additions and removals.
#[derive(Debug, Clone, Default)]
pub struct ImportLedger {
    entries: BTreeMap<(bool, String), ImportAction>,
}

impl ImportLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Requests that an import be present.
    pub fn request_add(&mut self, name: &str) {
        self.request(false, name, ImportAction::Add);
    }

    /// Requests that a static member import be present.
    pub fn request_add_static(&mut self, name: &str) {
        self.request(true, name, ImportAction::Add);
    }

    /// Requests that an import be dropped if unreferenced.
    pub fn request_remove(&mut self, name: &str) {
        self.request(false, name, ImportAction::Remove);
    }

    /// Requests that a static member import be dropped if unreferenced.
    pub fn request_remove_static(&mut self, name: &str) {
        self.request(true, name, ImportAction::Remove);
    }

    /// Returns whether no requests have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drains the ledger into its final plan.
    #[must_use]
    pub fn into_plan(self) -> ImportPlan {
        let mut plan = ImportPlan::default();
        for ((is_static, name), action) in self.entries {
            let request = ImportRequest { is_static, name };
            match action {
                ImportAction::Add => plan.additions.push(request),
                ImportAction::Remove => plan.removals.push(request),
            }
        }
        plan
    }

    fn request(&mut self, is_static: bool, name: &str, action: ImportAction) {
        tracing::debug!(name, is_static, ?action, "import request");
        self.entries.insert((is_static, name.to_owned()), action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_idempotent() {
        let mut ledger = ImportLedger::new();
        ledger.request_add("java.util.ArrayList");
        ledger.request_add("java.util.ArrayList");
        ledger.request_remove_static("org.junit.Assert.assertThat");
        ledger.request_remove_static("org.junit.Assert.assertThat");

        let plan = ledger.into_plan();
        assert_eq!(plan.additions.len(), 1);
        assert_eq!(plan.removals.len(), 1);
    }

    #[test]
    fn last_writer_wins_on_conflict() {
        let mut ledger = ImportLedger::new();
        ledger.request_remove("com.google.common.collect.Lists");
        ledger.request_add("com.google.common.collect.Lists");

        let plan = ledger.into_plan();
        assert_eq!(
            plan.additions.first().map(|r| r.name.as_str()),
            Some("com.google.common.collect.Lists")
        );
        assert!(plan.removals.is_empty());
    }

    #[test]
    fn static_and_plain_imports_are_distinct() {
        let mut ledger = ImportLedger::new();
        ledger.request_add("org.assertj.core.api.Assertions");
        ledger.request_add_static("org.assertj.core.api.Assertions.assertThat");

        let plan = ledger.into_plan();
        assert_eq!(plan.additions.len(), 2);
        let statics: Vec<_> = plan.additions.iter().filter(|r| r.is_static).collect();
        assert_eq!(statics.len(), 1);
    }

    #[test]
    fn empty_ledger_yields_empty_plan() {
        let plan = ImportLedger::new().into_plan();
        assert!(plan.is_empty());
    }

    #[test]
    fn merge_deduplicates() {
        let mut ledger_a = ImportLedger::new();
        ledger_a.request_add("java.util.ArrayList");
        let mut ledger_b = ImportLedger::new();
        ledger_b.request_add("java.util.ArrayList");
        ledger_b.request_remove("com.google.common.collect.Lists");

        let mut plan = ledger_a.into_plan();
        plan.merge(ledger_b.into_plan());

        assert_eq!(plan.additions.len(), 1);
        assert_eq!(plan.removals.len(), 1);
    }
}

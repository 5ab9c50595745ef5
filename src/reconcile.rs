//! Blocked-service set reconciliation.
//!
//! AdGuard Home's blocked-services endpoint takes a full replacement list,
//! so incremental block/unblock requests have to be merged with whatever the
//! server currently blocks. [`reconcile`] computes that replacement list as
//! a pure function of the current set and the requested changes.

use std::collections::BTreeSet;

/// Reserved identifier meaning "every service".
///
/// Valid only as an unblock entry; blocking it is refused because that is
/// what disabling protection is for.
pub const ALL_SERVICES: &str = "all";

/// Request to block the reserved "all" identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot block all services")]
pub struct BlockAllError;

/// Requested changes to a server's blocked-service set.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Service IDs to add to the blocked set.
    pub block: Vec<String>,
    /// Service IDs to remove from the blocked set.
    pub permit: Vec<String>,
}

impl ChangeSet {
    /// Build a change set, deduplicating and sorting both lists.
    pub fn new(block: Vec<String>, permit: Vec<String>) -> Self {
        let mut changes = Self { block, permit };
        changes.block.sort();
        changes.block.dedup();
        changes.permit.sort();
        changes.permit.dedup();
        changes
    }

    /// Whether the request asks for no changes at all.
    pub fn is_empty(&self) -> bool {
        self.block.is_empty() && self.permit.is_empty()
    }
}

/// Compute the new blocked-service set from the current one plus a change set.
///
/// Returns a deduplicated, lexicographically sorted list. An empty change set
/// returns the current set unchanged (sorted). Unblocking an ID that is not
/// blocked is a no-op. Unblocking [`ALL_SERVICES`] empties the set regardless
/// of any blocks in the same request.
pub fn reconcile(current: &[String], changes: &ChangeSet) -> Result<Vec<String>, BlockAllError> {
    let mut working: BTreeSet<String> = current.iter().cloned().collect();

    for id in &changes.block {
        if id == ALL_SERVICES {
            return Err(BlockAllError);
        }
        working.insert(id.clone());
    }

    for id in &changes.permit {
        working.remove(id.as_str());
    }

    // "all" in the permit list wins over everything else in the request.
    if changes.permit.iter().any(|id| id == ALL_SERVICES) {
        working.clear();
    }

    Ok(working.into_iter().collect())
}

// ============================================================================
// Tests
// ============================================================================

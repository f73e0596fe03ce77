use std::sync::Arc;

use thiserror::Error;

use stocktrail_core::{DomainError, UnitId};
use stocktrail_units::{ExpectedStatus, InventoryUnit, UnitDraft, UnitEvent, UnitStatus};

/// Unit store operation error.
///
/// These are **infrastructure errors** (storage, uniqueness, optimistic
/// concurrency) as opposed to domain errors (validation, verification).
#[derive(Debug, Error)]
pub enum UnitStoreError {
    /// Conditional status update failed: the unit's current status no longer
    /// matches the expectation, or the requested transition is illegal.
    #[error("status precondition failed: {0}")]
    Conflict(String),

    /// A scannable code is already assigned to another unit.
    #[error("duplicate code: {0}")]
    DuplicateCode(String),

    /// The unit id does not exist in the store.
    #[error("unit not found: {0}")]
    NotFound(String),

    /// The draft could not be materialized into a unit.
    #[error("invalid draft: {0}")]
    InvalidDraft(String),

    /// Backend failure (lock poisoned, connection lost, write failed).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<UnitStoreError> for DomainError {
    fn from(value: UnitStoreError) -> Self {
        match value {
            UnitStoreError::Conflict(msg) => DomainError::already_processed(msg),
            UnitStoreError::NotFound(msg) => DomainError::not_found(msg),
            UnitStoreError::DuplicateCode(msg)
            | UnitStoreError::InvalidDraft(msg)
            | UnitStoreError::Storage(msg) => DomainError::persistence(msg),
        }
    }
}

/// Persisted unit store shared by all three engines.
///
/// Implementations must:
/// - assign unique `UnitId`s at creation and build the box set atomically
/// - enforce scannable-code uniqueness across primary and box codes
/// - apply status updates conditionally (`ExpectedStatus`) in a single commit
/// - keep history append-only
pub trait UnitStore: Send + Sync {
    /// Persist a new unit from a draft. The store owns id assignment; every
    /// created unit starts `in_stock` with its boxes created atomically.
    fn create_unit(&self, draft: UnitDraft) -> Result<InventoryUnit, UnitStoreError>;

    /// Fetch one unit by id.
    fn get_unit(&self, unit_id: UnitId) -> Result<Option<InventoryUnit>, UnitStoreError>;

    /// Resolve a scanned code to a unit, searching both primary codes and box
    /// codes. Returns `None` when nothing matches.
    fn find_by_code(&self, code: &str) -> Result<Option<InventoryUnit>, UnitStoreError>;

    /// List every unit currently in the given status.
    fn list_by_status(&self, status: UnitStatus) -> Result<Vec<InventoryUnit>, UnitStoreError>;

    /// Conditionally transition a unit's status in one atomic commit.
    ///
    /// Fails with `Conflict` if the current status does not match `expected`
    /// or the transition is illegal; no field is left partially updated.
    fn update_status(
        &self,
        unit_id: UnitId,
        expected: ExpectedStatus,
        next: UnitStatus,
    ) -> Result<InventoryUnit, UnitStoreError>;

    /// Append one immutable history event.
    fn append_history(&self, event: UnitEvent) -> Result<(), UnitStoreError>;

    /// Full history for a unit, in append order.
    fn history(&self, unit_id: UnitId) -> Result<Vec<UnitEvent>, UnitStoreError>;
}

impl<S> UnitStore for Arc<S>
where
    S: UnitStore + ?Sized,
{
    fn create_unit(&self, draft: UnitDraft) -> Result<InventoryUnit, UnitStoreError> {
        (**self).create_unit(draft)
    }

    fn get_unit(&self, unit_id: UnitId) -> Result<Option<InventoryUnit>, UnitStoreError> {
        (**self).get_unit(unit_id)
    }

    fn find_by_code(&self, code: &str) -> Result<Option<InventoryUnit>, UnitStoreError> {
        (**self).find_by_code(code)
    }

    fn list_by_status(&self, status: UnitStatus) -> Result<Vec<InventoryUnit>, UnitStoreError> {
        (**self).list_by_status(status)
    }

    fn update_status(
        &self,
        unit_id: UnitId,
        expected: ExpectedStatus,
        next: UnitStatus,
    ) -> Result<InventoryUnit, UnitStoreError> {
        (**self).update_status(unit_id, expected, next)
    }

    fn append_history(&self, event: UnitEvent) -> Result<(), UnitStoreError> {
        (**self).append_history(event)
    }

    fn history(&self, unit_id: UnitId) -> Result<Vec<UnitEvent>, UnitStoreError> {
        (**self).history(unit_id)
    }
}

use std::collections::HashMap;
use std::sync::RwLock;

use stocktrail_core::UnitId;
use stocktrail_units::{ExpectedStatus, InventoryUnit, UnitDraft, UnitEvent, UnitStatus};

use super::r#trait::{UnitStore, UnitStoreError};

/// In-memory unit store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryUnitStore {
    units: RwLock<HashMap<UnitId, InventoryUnit>>,
    /// Every scannable code (primary and box) maps to its owning unit.
    code_index: RwLock<HashMap<String, UnitId>>,
    /// Append-only, across all units.
    history: RwLock<Vec<UnitEvent>>,
}

impl InMemoryUnitStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> UnitStoreError {
        UnitStoreError::Storage("lock poisoned".to_string())
    }
}

impl UnitStore for InMemoryUnitStore {
    fn create_unit(&self, draft: UnitDraft) -> Result<InventoryUnit, UnitStoreError> {
        let unit = InventoryUnit::create(UnitId::new(), draft)
            .map_err(|e| UnitStoreError::InvalidDraft(e.to_string()))?;

        let mut units = self.units.write().map_err(|_| Self::poisoned())?;
        let mut index = self.code_index.write().map_err(|_| Self::poisoned())?;

        // Uniqueness across primary AND box codes, before any write.
        let mut codes = vec![unit.primary_code().to_string()];
        codes.extend(unit.boxes().iter().map(|b| b.qr_code.clone()));
        for code in &codes {
            if index.contains_key(code) {
                return Err(UnitStoreError::DuplicateCode(code.clone()));
            }
        }

        for code in codes {
            index.insert(code, unit.id());
        }
        units.insert(unit.id(), unit.clone());

        Ok(unit)
    }

    fn get_unit(&self, unit_id: UnitId) -> Result<Option<InventoryUnit>, UnitStoreError> {
        let units = self.units.read().map_err(|_| Self::poisoned())?;
        Ok(units.get(&unit_id).cloned())
    }

    fn find_by_code(&self, code: &str) -> Result<Option<InventoryUnit>, UnitStoreError> {
        let index = self.code_index.read().map_err(|_| Self::poisoned())?;
        let Some(unit_id) = index.get(code) else {
            return Ok(None);
        };
        let units = self.units.read().map_err(|_| Self::poisoned())?;
        Ok(units.get(unit_id).cloned())
    }

    fn list_by_status(&self, status: UnitStatus) -> Result<Vec<InventoryUnit>, UnitStoreError> {
        let units = self.units.read().map_err(|_| Self::poisoned())?;
        let mut matching: Vec<InventoryUnit> = units
            .values()
            .filter(|u| u.status() == status)
            .cloned()
            .collect();
        // HashMap iteration order is arbitrary; keep snapshots deterministic.
        matching.sort_by(|a, b| {
            a.checked_in_at()
                .cmp(&b.checked_in_at())
                .then_with(|| a.primary_code().cmp(b.primary_code()))
        });
        Ok(matching)
    }

    fn update_status(
        &self,
        unit_id: UnitId,
        expected: ExpectedStatus,
        next: UnitStatus,
    ) -> Result<InventoryUnit, UnitStoreError> {
        let mut units = self.units.write().map_err(|_| Self::poisoned())?;
        let unit = units
            .get_mut(&unit_id)
            .ok_or_else(|| UnitStoreError::NotFound(unit_id.to_string()))?;

        if !expected.matches(unit.status()) {
            return Err(UnitStoreError::Conflict(format!(
                "unit {} is {}, expected {:?}",
                unit_id,
                unit.status(),
                expected
            )));
        }

        unit.transition(next)
            .map_err(|e| UnitStoreError::Conflict(e.to_string()))?;

        Ok(unit.clone())
    }

    fn append_history(&self, event: UnitEvent) -> Result<(), UnitStoreError> {
        let mut history = self.history.write().map_err(|_| Self::poisoned())?;
        history.push(event);
        Ok(())
    }

    fn history(&self, unit_id: UnitId) -> Result<Vec<UnitEvent>, UnitStoreError> {
        let history = self.history.read().map_err(|_| Self::poisoned())?;
        Ok(history
            .iter()
            .filter(|e| e.unit_id() == unit_id)
            .cloned()
            .collect())
    }
}

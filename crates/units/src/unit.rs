use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktrail_core::{DomainError, DomainResult, ProductId, UnitId, VariantId};

use crate::label;
use crate::status::{StockLocation, UnitStatus};

/// One physical, independently labeled package belonging to a unit.
///
/// Owned exclusively by its parent `InventoryUnit`; deleted only with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitBox {
    /// 1-based sequence number, unique within the parent unit.
    pub box_number: u32,
    /// Copy of the parent's box count, for display/validation.
    pub total_boxes: u32,
    /// Unique scannable code, derived from the parent's primary code.
    pub qr_code: String,
}

/// Fields the registrar hands to the store; the store assigns the `UnitId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDraft {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub primary_code: String,
    pub lot_number: Option<String>,
    pub location: StockLocation,
    pub box_count: u32,
    pub checked_in_at: DateTime<Utc>,
}

/// One purchased/stocked physical object, possibly split across several boxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUnit {
    id: UnitId,
    product_id: ProductId,
    variant_id: Option<VariantId>,
    primary_code: String,
    lot_number: Option<String>,
    location: StockLocation,
    status: UnitStatus,
    boxes: Vec<UnitBox>,
    checked_in_at: DateTime<Utc>,
}

impl InventoryUnit {
    /// Materialize a unit from a draft, creating its box set atomically.
    ///
    /// Every new unit starts `in_stock`. Box codes are derived from the
    /// primary code; `box_number` spans `1..=box_count` with no gaps.
    pub fn create(id: UnitId, draft: UnitDraft) -> DomainResult<Self> {
        if draft.primary_code.trim().is_empty() {
            return Err(DomainError::validation("primary code cannot be empty"));
        }
        if draft.box_count == 0 {
            return Err(DomainError::validation("box count must be at least 1"));
        }

        let boxes = (1..=draft.box_count)
            .map(|n| UnitBox {
                box_number: n,
                total_boxes: draft.box_count,
                qr_code: label::box_qr_code(&draft.primary_code, n),
            })
            .collect();

        Ok(Self {
            id,
            product_id: draft.product_id,
            variant_id: draft.variant_id,
            primary_code: draft.primary_code,
            lot_number: draft.lot_number,
            location: draft.location,
            status: UnitStatus::InStock,
            boxes,
            checked_in_at: draft.checked_in_at,
        })
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn variant_id(&self) -> Option<VariantId> {
        self.variant_id
    }

    pub fn primary_code(&self) -> &str {
        &self.primary_code
    }

    pub fn lot_number(&self) -> Option<&str> {
        self.lot_number.as_deref()
    }

    pub fn location(&self) -> StockLocation {
        self.location
    }

    pub fn status(&self) -> UnitStatus {
        self.status
    }

    pub fn boxes(&self) -> &[UnitBox] {
        &self.boxes
    }

    pub fn box_count(&self) -> u32 {
        self.boxes.len() as u32
    }

    pub fn checked_in_at(&self) -> DateTime<Utc> {
        self.checked_in_at
    }

    pub fn is_in_stock(&self) -> bool {
        self.status.is_in_stock()
    }

    /// Find the box whose scannable code equals `code` (already normalized).
    pub fn find_box_by_code(&self, code: &str) -> Option<&UnitBox> {
        self.boxes.iter().find(|b| b.qr_code == code)
    }

    /// Whether `code` names this unit at all (primary code or any box code).
    pub fn matches_code(&self, code: &str) -> bool {
        self.primary_code == code || self.find_box_by_code(code).is_some()
    }

    /// Mutable descriptive field; does not affect identity or lifecycle.
    pub fn set_lot_number(&mut self, lot_number: Option<String>) {
        self.lot_number = lot_number;
    }

    /// Mutable descriptive field; does not affect identity or lifecycle.
    pub fn set_location(&mut self, location: StockLocation) {
        self.location = location;
    }

    /// Commit a status transition, enforcing the lifecycle state machine.
    ///
    /// This is the only way to change `status`; the store wraps it in a
    /// conditional single-field commit.
    pub fn transition(&mut self, next: UnitStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::unavailable(format!(
                "unit {} cannot move from {} to {}",
                self.id, self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}

//! Item registrar: check-in of received units.

use chrono::Utc;

use stocktrail_catalog::{label_base, ProductRef, VariantRef};
use stocktrail_core::{DomainError, DomainResult};
use stocktrail_store::UnitStore;
use stocktrail_units::{generate_primary_code, InventoryUnit, StockLocation, UnitDraft, UnitEvent};

/// Check-in request, as assembled by the receiving UI.
///
/// `product` is `Option` because selection happens in the UI; a missing
/// product is a validation error here, not a panic there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInInput {
    pub product: Option<ProductRef>,
    pub variant: Option<VariantRef>,
    pub quantity_of_units: u32,
    pub box_count: u32,
    pub lot_number: Option<String>,
    pub location: StockLocation,
}

impl CheckInInput {
    /// One unit, one box — the common case; callers override the rest.
    pub fn new(product: ProductRef, location: StockLocation) -> Self {
        Self {
            product: Some(product),
            variant: None,
            quantity_of_units: 1,
            box_count: 1,
            lot_number: None,
            location,
        }
    }
}

/// Creates inventory units (with their box sets) in the shared store.
#[derive(Debug)]
pub struct Registrar<S> {
    store: S,
}

impl<S> Registrar<S>
where
    S: UnitStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Check in `quantity_of_units` units, each with `box_count` boxes.
    ///
    /// Each unit is an independent transaction: a store failure mid-batch
    /// surfaces `Persistence` but units already created stay created
    /// (at-least-partial-success, deliberate — the physical goods are on the
    /// shelf either way).
    pub fn check_in(&self, input: &CheckInInput) -> DomainResult<Vec<InventoryUnit>> {
        let product = input
            .product
            .as_ref()
            .ok_or_else(|| DomainError::validation("a product must be selected"))?;

        if product.has_variants && input.variant.is_none() {
            return Err(DomainError::validation(format!(
                "product {} has variants; one must be selected",
                product.code
            )));
        }
        if input.quantity_of_units == 0 {
            return Err(DomainError::validation("quantity of units must be at least 1"));
        }
        if input.box_count == 0 {
            return Err(DomainError::validation("box count must be at least 1"));
        }

        let base = label_base(product, input.variant.as_ref());
        let mut created = Vec::with_capacity(input.quantity_of_units as usize);

        for _ in 0..input.quantity_of_units {
            let now = Utc::now();
            let draft = UnitDraft {
                product_id: product.id,
                variant_id: input.variant.as_ref().map(|v| v.id),
                primary_code: generate_primary_code(base, now),
                lot_number: input.lot_number.clone(),
                location: input.location,
                box_count: input.box_count,
                checked_in_at: now,
            };

            let unit = self.store.create_unit(draft).map_err(|e| {
                tracing::error!(
                    product = %product.code,
                    created = created.len(),
                    requested = input.quantity_of_units,
                    "check-in batch aborted: {e}"
                );
                DomainError::from(e)
            })?;

            self.store.append_history(UnitEvent::CheckedIn {
                unit_id: unit.id(),
                primary_code: unit.primary_code().to_string(),
                box_count: unit.box_count(),
                location: unit.location(),
                occurred_at: now,
            })?;

            created.push(unit);
        }

        tracing::info!(
            product = %product.code,
            quantity = created.len(),
            box_count = input.box_count,
            "checked in units"
        );

        Ok(created)
    }
}

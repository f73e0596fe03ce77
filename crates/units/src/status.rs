use serde::{Deserialize, Serialize};

/// Unit status lifecycle.
///
/// `CheckedOut` and `Lost` are terminal. `Reserved` and `Defective` are side
/// states that may be released back to `InStock` out of band; they are never
/// part of the check-out flow itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    InStock,
    CheckedOut,
    Lost,
    Reserved,
    Defective,
}

impl UnitStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UnitStatus::CheckedOut | UnitStatus::Lost)
    }

    pub fn is_in_stock(&self) -> bool {
        matches!(self, UnitStatus::InStock)
    }

    /// Whether a single-call status commit from `self` to `next` is legal.
    pub fn can_transition_to(&self, next: UnitStatus) -> bool {
        if *self == next {
            return false;
        }
        match self {
            UnitStatus::InStock => true,
            UnitStatus::Reserved | UnitStatus::Defective => next == UnitStatus::InStock,
            UnitStatus::CheckedOut | UnitStatus::Lost => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::InStock => "in_stock",
            UnitStatus::CheckedOut => "checked_out",
            UnitStatus::Lost => "lost",
            UnitStatus::Reserved => "reserved",
            UnitStatus::Defective => "defective",
        }
    }
}

impl core::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a unit left stock. Required on submit, no default.
///
/// Every reason transitions the unit to `checked_out`; the reason itself is
/// recorded in the history event. Direct loss reporting (no check-out flow)
/// is a separate operation that transitions to `lost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutReason {
    Sold,
    Used,
    Damaged,
    Lost,
    TransferOut,
}

impl CheckoutReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutReason::Sold => "sold",
            CheckoutReason::Used => "used",
            CheckoutReason::Damaged => "damaged",
            CheckoutReason::Lost => "lost",
            CheckoutReason::TransferOut => "transfer_out",
        }
    }
}

/// Fixed set of storage locations a unit can sit in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLocation {
    Warehouse,
    Showroom,
    ServiceArea,
    InTransit,
}

/// Optimistic concurrency expectation for a unit's status.
///
/// Status updates are conditionally applied: the store rejects the commit if
/// the unit's current status no longer matches. This is the only race guard
/// between two sessions checking out the same unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedStatus {
    /// Skip the check (migrations, administrative fixes).
    Any,
    /// Require the unit to currently be in an exact status.
    Exactly(UnitStatus),
}

impl ExpectedStatus {
    pub fn matches(self, actual: UnitStatus) -> bool {
        match self {
            ExpectedStatus::Any => true,
            ExpectedStatus::Exactly(s) => s == actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_allow_no_transition() {
        for next in [
            UnitStatus::InStock,
            UnitStatus::CheckedOut,
            UnitStatus::Lost,
            UnitStatus::Reserved,
            UnitStatus::Defective,
        ] {
            assert!(!UnitStatus::CheckedOut.can_transition_to(next));
            assert!(!UnitStatus::Lost.can_transition_to(next));
        }
    }

    #[test]
    fn in_stock_transitions_to_every_other_status() {
        for next in [
            UnitStatus::CheckedOut,
            UnitStatus::Lost,
            UnitStatus::Reserved,
            UnitStatus::Defective,
        ] {
            assert!(UnitStatus::InStock.can_transition_to(next));
        }
        assert!(!UnitStatus::InStock.can_transition_to(UnitStatus::InStock));
    }

    #[test]
    fn side_states_only_release_back_to_stock() {
        assert!(UnitStatus::Reserved.can_transition_to(UnitStatus::InStock));
        assert!(UnitStatus::Defective.can_transition_to(UnitStatus::InStock));
        assert!(!UnitStatus::Reserved.can_transition_to(UnitStatus::CheckedOut));
        assert!(!UnitStatus::Defective.can_transition_to(UnitStatus::Lost));
    }

    #[test]
    fn expected_status_matches() {
        assert!(ExpectedStatus::Any.matches(UnitStatus::Lost));
        assert!(ExpectedStatus::Exactly(UnitStatus::InStock).matches(UnitStatus::InStock));
        assert!(!ExpectedStatus::Exactly(UnitStatus::InStock).matches(UnitStatus::CheckedOut));
    }
}

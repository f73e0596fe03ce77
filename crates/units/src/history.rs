use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktrail_core::UnitId;

use crate::status::{CheckoutReason, StockLocation};

/// Immutable history record appended on every lifecycle transition.
///
/// Events are facts: append-only, never edited. The audit trail for a unit is
/// the ordered sequence of its events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitEvent {
    CheckedIn {
        unit_id: UnitId,
        primary_code: String,
        box_count: u32,
        location: StockLocation,
        occurred_at: DateTime<Utc>,
    },
    CheckedOut {
        unit_id: UnitId,
        reason: CheckoutReason,
        notes: String,
        occurred_at: DateTime<Utc>,
    },
    MarkedLost {
        unit_id: UnitId,
        notes: String,
        occurred_at: DateTime<Utc>,
    },
}

impl UnitEvent {
    /// Stable event name/type identifier.
    pub fn event_type(&self) -> &'static str {
        match self {
            UnitEvent::CheckedIn { .. } => "unit.checked_in",
            UnitEvent::CheckedOut { .. } => "unit.checked_out",
            UnitEvent::MarkedLost { .. } => "unit.marked_lost",
        }
    }

    pub fn unit_id(&self) -> UnitId {
        match self {
            UnitEvent::CheckedIn { unit_id, .. }
            | UnitEvent::CheckedOut { unit_id, .. }
            | UnitEvent::MarkedLost { unit_id, .. } => *unit_id,
        }
    }

    /// When the event occurred (business time).
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            UnitEvent::CheckedIn { occurred_at, .. }
            | UnitEvent::CheckedOut { occurred_at, .. }
            | UnitEvent::MarkedLost { occurred_at, .. } => *occurred_at,
        }
    }
}

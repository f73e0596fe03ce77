//! The three inventory lifecycle engines.
//!
//! - `registrar` — creates units (with their box sets) on receipt.
//! - `verification` — drives check-out: every box of a multi-box unit must be
//!   scanned before the status transition is allowed.
//! - `audit` — session-scoped, read-only reconciliation of expected stock
//!   against live scans.
//!
//! The engines never call each other; they are coordinated only through the
//! shared `UnitStore`.

pub mod audit;
pub mod registrar;
pub mod verification;


pub use audit::{AuditEngine, AuditReport, AuditSession, ScanRecord, ScanStatus};
pub use registrar::{CheckInInput, Registrar};
pub use verification::{ResolvedVia, ScanOutcome, VerificationEngine, VerificationSession};

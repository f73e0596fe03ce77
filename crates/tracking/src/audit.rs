//! Stock audit engine: session-scoped, read-only reconciliation.
//!
//! An audit never mutates unit status. It snapshots the in-stock set once,
//! classifies live scans against it, and derives the report on demand.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktrail_core::DomainResult;
use stocktrail_store::UnitStore;
use stocktrail_units::{normalize_code, InventoryUnit, UnitStatus};

/// Classification of one audit scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// Code matched an expected in-stock unit, first time this session.
    Success,
    /// Code was already scanned this session.
    Duplicate,
    /// Code matches nothing expected: a unit not in stock, or no unit at all.
    Unknown,
}

/// One entry of the session scan log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub code: String,
    pub status: ScanStatus,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// On-demand reconciliation report.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditReport {
    pub expected_count: usize,
    pub scanned_count: usize,
    /// Fraction of expected units scanned, in `[0, 1]`; 1.0 for an empty
    /// expected set (vacuous pass).
    pub progress: f64,
    pub missing_units: Vec<InventoryUnit>,
    /// Most recent first.
    pub scan_log: Vec<ScanRecord>,
}

/// One physical counting exercise.
///
/// `expected` is a snapshot taken at session start and never live-updated:
/// units created or transitioned mid-count do not move the goalposts.
#[derive(Debug, Clone)]
pub struct AuditSession {
    expected: Vec<InventoryUnit>,
    scanned: HashSet<String>,
    log: Vec<ScanRecord>,
    started_at: DateTime<Utc>,
}

impl AuditSession {
    fn new(expected: Vec<InventoryUnit>) -> Self {
        Self {
            expected,
            scanned: HashSet::new(),
            log: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Classify one scan. Pure and total: malformed input is `Unknown`,
    /// never an error, and the store is never touched.
    pub fn scan(&mut self, raw_code: &str) -> ScanRecord {
        let timestamp = Utc::now();
        let code = normalize_code(raw_code);

        let (status, message) = if code.is_empty() {
            (ScanStatus::Unknown, "empty scan".to_string())
        } else if self.scanned.contains(&code) {
            (
                ScanStatus::Duplicate,
                format!("{code} was already scanned this session"),
            )
        } else if self.expected.iter().any(|u| u.primary_code() == code) {
            self.scanned.insert(code.clone());
            (ScanStatus::Success, format!("{code} verified in stock"))
        } else {
            (
                ScanStatus::Unknown,
                format!("{code} does not match any expected in-stock unit"),
            )
        };

        let record = ScanRecord {
            code,
            status,
            message,
            timestamp,
        };
        // Most recent first, for display.
        self.log.insert(0, record.clone());
        record
    }

    pub fn expected_units(&self) -> &[InventoryUnit] {
        &self.expected
    }

    pub fn scanned_codes(&self) -> &HashSet<String> {
        &self.scanned
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Most recent first.
    pub fn scan_log(&self) -> &[ScanRecord] {
        &self.log
    }

    /// Fraction of expected units scanned; 1.0 when nothing was expected.
    pub fn progress(&self) -> f64 {
        if self.expected.is_empty() {
            return 1.0;
        }
        self.scanned.len() as f64 / self.expected.len() as f64
    }

    /// Expected units whose primary code has not been scanned yet.
    pub fn missing_units(&self) -> Vec<&InventoryUnit> {
        self.expected
            .iter()
            .filter(|u| !self.scanned.contains(u.primary_code()))
            .collect()
    }

    /// Bundle the derived queries for the UI. Recomputed, never cached.
    pub fn report(&self) -> AuditReport {
        AuditReport {
            expected_count: self.expected.len(),
            scanned_count: self.scanned.len(),
            progress: self.progress(),
            missing_units: self.missing_units().into_iter().cloned().collect(),
            scan_log: self.log.clone(),
        }
    }
}

/// Opens audit sessions against the shared store.
#[derive(Debug)]
pub struct AuditEngine<S> {
    store: S,
}

impl<S> AuditEngine<S>
where
    S: UnitStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Snapshot every in-stock unit into a fresh session.
    pub fn start_session(&self) -> DomainResult<AuditSession> {
        let expected = self.store.list_by_status(UnitStatus::InStock)?;
        tracing::info!(expected = expected.len(), "audit session started");
        Ok(AuditSession::new(expected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use stocktrail_core::ProductId;
    use stocktrail_store::InMemoryUnitStore;
    use stocktrail_units::{ExpectedStatus, StockLocation, UnitDraft};

    fn store_with(codes: &[&str]) -> Arc<InMemoryUnitStore> {
        let store = Arc::new(InMemoryUnitStore::new());
        for code in codes {
            store
                .create_unit(UnitDraft {
                    product_id: ProductId::new(),
                    variant_id: None,
                    primary_code: code.to_string(),
                    lot_number: None,
                    location: StockLocation::Warehouse,
                    box_count: 1,
                    checked_in_at: Utc::now(),
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn scanning_twice_yields_success_then_duplicate() {
        let engine = AuditEngine::new(store_with(&["AAA", "BBB", "CCC"]));
        let mut session = engine.start_session().unwrap();

        assert_eq!(session.scan("AAA").status, ScanStatus::Success);
        assert_eq!(session.scan("AAA").status, ScanStatus::Duplicate);

        let mut missing: Vec<&str> = session
            .missing_units()
            .iter()
            .map(|u| u.primary_code())
            .collect();
        missing.sort();
        assert_eq!(missing, vec!["BBB", "CCC"]);
    }

    #[test]
    fn unknown_codes_never_affect_progress_or_missing() {
        let engine = AuditEngine::new(store_with(&["AAA"]));
        let mut session = engine.start_session().unwrap();

        assert_eq!(session.scan("GHOST").status, ScanStatus::Unknown);
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.missing_units().len(), 1);
        assert!(session.scanned_codes().is_empty());
    }

    #[test]
    fn units_not_in_stock_are_excluded_from_the_snapshot() {
        let store = store_with(&["KEPT", "GONE"]);
        let gone = store.find_by_code("GONE").unwrap().unwrap();
        store
            .update_status(
                gone.id(),
                ExpectedStatus::Exactly(UnitStatus::InStock),
                UnitStatus::CheckedOut,
            )
            .unwrap();

        let engine = AuditEngine::new(store);
        let mut session = engine.start_session().unwrap();
        assert_eq!(session.expected_units().len(), 1);

        // Scanning the checked-out unit is unknown, not a missing reduction.
        assert_eq!(session.scan("GONE").status, ScanStatus::Unknown);
        assert_eq!(session.missing_units().len(), 1);
    }

    #[test]
    fn snapshot_ignores_units_created_after_session_start() {
        let store = store_with(&["AAA"]);
        let engine = AuditEngine::new(store.clone());
        let mut session = engine.start_session().unwrap();

        store
            .create_unit(UnitDraft {
                product_id: ProductId::new(),
                variant_id: None,
                primary_code: "LATE".to_string(),
                lot_number: None,
                location: StockLocation::Warehouse,
                box_count: 1,
                checked_in_at: Utc::now(),
            })
            .unwrap();

        assert_eq!(session.expected_units().len(), 1);
        assert_eq!(session.scan("LATE").status, ScanStatus::Unknown);
    }

    #[test]
    fn progress_is_vacuously_complete_for_an_empty_snapshot() {
        let engine = AuditEngine::new(store_with(&[]));
        let session = engine.start_session().unwrap();
        assert_eq!(session.progress(), 1.0);
        assert!(session.missing_units().is_empty());
    }

    #[test]
    fn scan_normalizes_and_tolerates_garbage() {
        let engine = AuditEngine::new(store_with(&["AAA"]));
        let mut session = engine.start_session().unwrap();

        assert_eq!(session.scan("  aaa \n").status, ScanStatus::Success);
        assert_eq!(session.scan("").status, ScanStatus::Unknown);
        assert_eq!(session.scan("   ").status, ScanStatus::Unknown);
        assert_eq!(session.scan("\u{0}binary\u{7f}").status, ScanStatus::Unknown);
    }

    #[test]
    fn scan_log_is_most_recent_first_and_unbounded() {
        let engine = AuditEngine::new(store_with(&["AAA", "BBB"]));
        let mut session = engine.start_session().unwrap();

        session.scan("AAA");
        session.scan("BBB");
        session.scan("AAA");

        let log = session.scan_log();
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].code, "AAA");
        assert_eq!(log[0].status, ScanStatus::Duplicate);
        assert_eq!(log[2].code, "AAA");
        assert_eq!(log[2].status, ScanStatus::Success);
    }

    #[test]
    fn report_bundles_the_derived_queries() {
        let engine = AuditEngine::new(store_with(&["AAA", "BBB"]));
        let mut session = engine.start_session().unwrap();
        session.scan("AAA");

        let report = session.report();
        assert_eq!(report.expected_count, 2);
        assert_eq!(report.scanned_count, 1);
        assert_eq!(report.progress, 0.5);
        assert_eq!(report.missing_units.len(), 1);
        assert_eq!(report.missing_units[0].primary_code(), "BBB");
        assert_eq!(report.scan_log.len(), 1);
    }

    #[test]
    fn audit_never_mutates_unit_status() {
        let store = store_with(&["AAA", "BBB"]);
        let engine = AuditEngine::new(store.clone());
        let mut session = engine.start_session().unwrap();

        session.scan("AAA");
        session.scan("GHOST");
        session.scan("AAA");

        for code in ["AAA", "BBB"] {
            let unit = store.find_by_code(code).unwrap().unwrap();
            assert_eq!(unit.status(), UnitStatus::InStock);
        }
    }
}

//! Box verification engine: the check-out state machine.
//!
//! A unit leaves stock only after every one of its boxes has been scanned in
//! the current session. Session state is an explicit value object owned by
//! the caller; abandoning it has no persisted effect.

use std::collections::BTreeSet;

use chrono::Utc;

use stocktrail_core::{DomainError, DomainResult, UnitId};
use stocktrail_store::UnitStore;
use stocktrail_units::{
    normalize_code, CheckoutReason, ExpectedStatus, InventoryUnit, UnitEvent, UnitStatus,
};

/// How the target unit was resolved from the first scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedVia {
    PrimaryCode,
    BoxCode(u32),
}

/// Tagged result of one check-out scan.
///
/// Exhaustive on purpose: callers branch on the variant, never on the
/// presence or absence of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// First scan (or a re-scan of the target's own primary label): the
    /// session now has a target unit.
    TargetResolved { via: ResolvedVia },
    /// A box of the target unit was verified for the first time.
    BoxVerified { box_number: u32 },
    /// The box was already verified this session; nothing changed.
    AlreadyVerified { box_number: u32 },
    /// The code belongs to neither the target's boxes nor its primary code.
    /// Partial progress is kept; the caller must `confirm_switch` to discard
    /// it and re-resolve with this code.
    DifferentUnit { code: String },
}

/// Per-check-out session state. Created when a check-out flow opens;
/// discarded on submit, cancel, or confirmed unit switch.
#[derive(Debug, Clone, Default)]
pub struct VerificationSession {
    target: Option<InventoryUnit>,
    verified: BTreeSet<u32>,
}

impl VerificationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&InventoryUnit> {
        self.target.as_ref()
    }

    pub fn verified_box_numbers(&self) -> &BTreeSet<u32> {
        &self.verified
    }

    pub fn verified_count(&self) -> u32 {
        self.verified.len() as u32
    }

    /// Invariant: complete iff every box number of the target is verified.
    pub fn is_complete(&self) -> bool {
        match &self.target {
            Some(t) => self.verified_count() == t.box_count(),
            None => false,
        }
    }

    /// Box numbers still waiting for a scan, ascending.
    pub fn remaining_boxes(&self) -> Vec<u32> {
        match &self.target {
            Some(t) => (1..=t.box_count())
                .filter(|n| !self.verified.contains(n))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Discard all in-memory progress. No persisted effect.
    pub fn reset(&mut self) {
        self.target = None;
        self.verified.clear();
    }

    fn begin(&mut self, unit: InventoryUnit, first_box: Option<u32>) {
        self.verified.clear();
        // Single-box units need no further scans; the resolving scan is the
        // verification.
        if unit.box_count() == 1 {
            self.verified.insert(1);
        } else if let Some(n) = first_box {
            self.verified.insert(n);
        }
        self.target = Some(unit);
    }

    fn note_verified(&mut self, box_number: u32) -> bool {
        self.verified.insert(box_number)
    }
}

/// Drives check-out scans and the final status commit.
#[derive(Debug)]
pub struct VerificationEngine<S> {
    store: S,
}

impl<S> VerificationEngine<S>
where
    S: UnitStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Feed one scanned code into the session.
    ///
    /// Errors (`NotFound`, `Unavailable`) are expected, recoverable
    /// conditions surfaced to the caller; they never invalidate the session.
    pub fn scan(
        &self,
        session: &mut VerificationSession,
        raw_code: &str,
    ) -> DomainResult<ScanOutcome> {
        let code = normalize_code(raw_code);
        if code.is_empty() {
            return Err(DomainError::validation("scanned code is empty"));
        }

        let Some(target) = session.target.as_ref() else {
            return self.resolve_target(session, code);
        };

        if target.primary_code() == code {
            // Re-scan of the current target's main label: harmless no-op.
            return Ok(ScanOutcome::TargetResolved {
                via: ResolvedVia::PrimaryCode,
            });
        }

        let Some(box_number) = target.find_box_by_code(&code).map(|b| b.box_number) else {
            tracing::debug!(code = %code, "scan does not match current unit");
            return Ok(ScanOutcome::DifferentUnit { code });
        };

        if session.note_verified(box_number) {
            Ok(ScanOutcome::BoxVerified { box_number })
        } else {
            Ok(ScanOutcome::AlreadyVerified { box_number })
        }
    }

    /// Abandon the current unit and re-resolve with `raw_code`.
    ///
    /// This is the only way partial progress is discarded in favor of a new
    /// unit; a bare mismatched `scan` never does it implicitly.
    pub fn confirm_switch(
        &self,
        session: &mut VerificationSession,
        raw_code: &str,
    ) -> DomainResult<ScanOutcome> {
        session.reset();
        self.scan(session, raw_code)
    }

    /// Abandon the session entirely. No persisted effect.
    pub fn cancel(&self, session: &mut VerificationSession) {
        session.reset();
    }

    /// Commit the check-out: `in_stock → checked_out`, conditionally.
    ///
    /// Fails with `IncompleteVerification` unless every box is verified, and
    /// with `AlreadyProcessed` if the unit left stock since the session
    /// started (the conditional store commit is the race guard). On a
    /// `Persistence` failure the session is preserved so the caller can retry
    /// without rescanning; on success it is reset.
    pub fn submit(
        &self,
        session: &mut VerificationSession,
        reason: CheckoutReason,
        notes: &str,
    ) -> DomainResult<InventoryUnit> {
        let Some(target) = session.target.as_ref() else {
            return Err(DomainError::incomplete("no unit has been scanned"));
        };
        if !session.is_complete() {
            return Err(DomainError::incomplete(format!(
                "{} of {} boxes verified for {}",
                session.verified_count(),
                target.box_count(),
                target.primary_code()
            )));
        }

        let unit_id = target.id();
        let primary_code = target.primary_code().to_string();

        let updated = self.store.update_status(
            unit_id,
            ExpectedStatus::Exactly(UnitStatus::InStock),
            UnitStatus::CheckedOut,
        )?;

        self.store.append_history(UnitEvent::CheckedOut {
            unit_id,
            reason,
            notes: notes.to_string(),
            occurred_at: Utc::now(),
        })?;

        tracing::info!(
            unit = %primary_code,
            reason = reason.as_str(),
            "unit checked out"
        );

        session.reset();
        Ok(updated)
    }

    /// Direct loss reporting, outside the check-out flow: `in_stock → lost`.
    pub fn mark_lost(&self, unit_id: UnitId, notes: &str) -> DomainResult<InventoryUnit> {
        let updated = self.store.update_status(
            unit_id,
            ExpectedStatus::Exactly(UnitStatus::InStock),
            UnitStatus::Lost,
        )?;

        self.store.append_history(UnitEvent::MarkedLost {
            unit_id,
            notes: notes.to_string(),
            occurred_at: Utc::now(),
        })?;

        tracing::warn!(unit = %updated.primary_code(), "unit marked lost");
        Ok(updated)
    }

    fn resolve_target(
        &self,
        session: &mut VerificationSession,
        code: String,
    ) -> DomainResult<ScanOutcome> {
        let unit = self
            .store
            .find_by_code(&code)?
            .ok_or_else(|| DomainError::not_found(format!("no unit matches code {code}")))?;

        if !unit.is_in_stock() {
            return Err(DomainError::unavailable(format!(
                "unit {} is {}, not in stock",
                unit.primary_code(),
                unit.status()
            )));
        }

        let via = if unit.primary_code() == code {
            ResolvedVia::PrimaryCode
        } else {
            match unit.find_box_by_code(&code) {
                Some(b) => ResolvedVia::BoxCode(b.box_number),
                // find_by_code matched this unit, so the code must be one of
                // its labels; treat anything else as a store inconsistency.
                None => {
                    return Err(DomainError::persistence(format!(
                        "store returned unit {} for code {code} but the unit does not carry it",
                        unit.primary_code()
                    )));
                }
            }
        };

        let first_box = match via {
            ResolvedVia::BoxCode(n) => Some(n),
            ResolvedVia::PrimaryCode => None,
        };
        session.begin(unit, first_box);

        Ok(ScanOutcome::TargetResolved { via })
    }
}

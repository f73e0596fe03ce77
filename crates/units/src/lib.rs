//! Unit/box data model for the inventory lifecycle tracker.
//!
//! This crate contains the persistent shapes shared by all three engines
//! (registrar, verification, audit), implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod history;
pub mod label;
pub mod status;
pub mod unit;

pub use history::UnitEvent;
pub use label::{box_qr_code, generate_primary_code, normalize_code, parse_box_code};
pub use status::{CheckoutReason, ExpectedStatus, StockLocation, UnitStatus};
pub use unit::{InventoryUnit, UnitBox, UnitDraft};

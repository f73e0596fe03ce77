//! Catalog reference types consumed by check-in.
//!
//! The catalog itself (products, variants, pricing) is an external
//! collaborator; this crate only carries the fields check-in reads.

pub mod reference;

pub use reference::{label_base, ProductRef, VariantRef, FALLBACK_LABEL_BASE};

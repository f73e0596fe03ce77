//! Persistence seam for inventory units.
//!
//! The engines only ever talk to the `UnitStore` trait; `InMemoryUnitStore`
//! backs tests and dev. A real SQL/remote implementation is out of scope and
//! plugs in behind the same trait.

pub mod in_memory;
mod r#trait;

pub use in_memory::InMemoryUnitStore;
pub use r#trait::{UnitStore, UnitStoreError};

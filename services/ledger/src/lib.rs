//! Ledger Store
//!
//! Storage abstraction for the two marketplace record families (buy orders
//! and sell offers) with conditional (compare-and-swap) update semantics.
//!
//! **Key Invariants:**
//! - All mutation goes through versioned conditional updates; there is no
//!   read-then-write window for two writers to interleave.
//! - A conditional update either applies fully or returns `VersionConflict`
//!   with no effect.
//! - Records are never deleted.

pub mod memory;
pub mod store;

pub use memory::MemoryLedger;
pub use store::{LedgerStore, StoreError};

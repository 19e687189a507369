//! Types library for the compute capacity marketplace
//!
//! This library provides all core type definitions shared across the
//! marketplace services, ensuring type safety and deterministic behavior.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, OfferId)
//! - `numeric`: Price and quantity types
//! - `buyer`: Buy order lifecycle types
//! - `seller`: Sell offer types
//! - `errors`: Error taxonomy

// Public modules
pub mod buyer;
pub mod errors;
pub mod ids;
pub mod numeric;
pub mod seller;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::buyer::*;
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::seller::*;
}

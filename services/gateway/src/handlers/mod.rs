pub mod buyer;
pub mod quotes;
pub mod seller;

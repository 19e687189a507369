//! Provider capability interface
//!
//! The settlement transaction holds no locks while a call is in flight, so
//! the only contract the engine needs is: the call eventually returns, and
//! failure is a value, not a fault.

use async_trait::async_trait;
use thiserror::Error;

/// Fulfillment call failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider request timed out")]
    Timeout,

    #[error("Provider transport error: {0}")]
    Http(String),

    #[error("Provider rejected request with status {status}")]
    Rejected { status: u16 },

    #[error("Provider returned no completion")]
    EmptyCompletion,
}

/// External text-generation capability
///
/// `max_tokens` is the token budget for the completion; settlement passes
/// the matched demand quantity.
#[async_trait]
pub trait FulfillmentProvider: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u64) -> Result<String, ProviderError>;
}

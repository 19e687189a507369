//! Fulfillment Provider client
//!
//! Invokes an external text-generation capability with a prompt and a token
//! budget. The provider is treated as a slow, fallible, at-least-once-callable
//! dependency: every call resolves deterministically into generated text or a
//! typed failure, never a hang, so the settlement path can rely on a bounded
//! outcome.

pub mod openai;
pub mod provider;

pub use openai::{OpenAiConfig, OpenAiProvider};
pub use provider::{FulfillmentProvider, ProviderError};

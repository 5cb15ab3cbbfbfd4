//! Smart Notes LLM Integration
//!
//! Provider boundary for text generation. The runtime only depends on the
//! [`LLMClient`] request/response shape; provider wire formats stay here.

// Re-export core types
pub use cache::{InMemoryLLMCache, LLMCache};
pub use client::{LLMClient, LLMRequest, LLMResponse};
pub use error::{LLMError, Result};

// Re-export providers
pub use provider::{MockProvider, OpenAIModel, OpenAIProvider};

pub mod cache;
pub mod client;
pub mod error;
pub mod provider;

//! Anthropic answer provider for jobfill.

mod api;
mod prompt;
mod provider;

pub use provider::AnthropicProvider;

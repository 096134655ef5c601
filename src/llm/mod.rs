//! LLM provider setup via rig-core.
//!
//! The dispatch advisory builds a one-shot agent from this client for every
//! planning cycle; the client itself is created once at startup.
//!
//! # Example
//! ```no_run
//! use dispatch_rs::llm::anthropic_client;
//! use secrecy::SecretString;
//!
//! let key = SecretString::from("sk-ant-...");
//! let client = anthropic_client(&key).expect("failed to create Anthropic client");
//! ```

use rig::providers::anthropic::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Create an Anthropic client from a secret API key.
///
/// # Errors
/// Returns `Error::Config` if the underlying HTTP client cannot be built.
pub fn anthropic_client(api_key: &SecretString) -> Result<Client> {
    Client::new(api_key.expose_secret())
        .map_err(|e| Error::Config(format!("failed to create Anthropic client: {e}")))
}

//! Secret handling utilities.
//!
//! Re-exports the secrecy types used for the database URL and the
//! advisory API key.

pub use secrecy::{ExposeSecret, SecretString};

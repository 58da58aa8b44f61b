//! Secret resolution for Botique.
//!
//! Credentials (generation API key, billing keys) come from environment
//! variables and are wrapped in `secrecy::SecretString` immediately so they
//! never appear in logs or Debug output.

pub mod env;

pub use env::EnvSecretProvider;

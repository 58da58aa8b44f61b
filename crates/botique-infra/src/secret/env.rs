//! Environment variable secret provider.
//!
//! A read-only lookup over process environment variables. Values are wrapped
//! in [`SecretString`] at the boundary; callers only get the raw string back
//! by explicitly exposing the secret.

use secrecy::SecretString;

/// Environment variable secret provider.
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    /// Create a new environment variable secret provider.
    pub fn new() -> Self {
        Self
    }

    /// Look up a secret by environment variable name.
    ///
    /// Returns `None` when the variable is unset. A variable with invalid
    /// Unicode is treated as not found rather than an error, since secrets
    /// must be valid strings.
    pub fn get(&self, key: &str) -> Option<SecretString> {
        match std::env::var(key) {
            Ok(val) => Some(SecretString::from(val)),
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => None,
        }
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_env_provider_get_existing() {
        // SAFETY: tests in this module touch distinct variable names and
        // clean up after themselves.
        unsafe { std::env::set_var("BOTIQUE_TEST_SECRET_1", "test-value-123") };

        let provider = EnvSecretProvider::new();
        let result = provider.get("BOTIQUE_TEST_SECRET_1").unwrap();
        assert_eq!(result.expose_secret(), "test-value-123");

        // SAFETY: the var was just set above.
        unsafe { std::env::remove_var("BOTIQUE_TEST_SECRET_1") };
    }

    #[test]
    fn test_env_provider_get_missing() {
        let provider = EnvSecretProvider::new();
        assert!(provider.get("NONEXISTENT_VAR_XYZ_123").is_none());
    }
}

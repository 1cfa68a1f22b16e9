// Secret credential wrapper
// Author: kelexine (https://github.com/kelexine)

use zeroize::Zeroize;

/// An API key or session token.
///
/// Wiped from memory on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct Credential(String);

// Custom Debug impl that never logs the secret
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"[REDACTED]").finish()
    }
}

impl Credential {
    /// Wrap a raw secret, trimming surrounding whitespace.
    /// Returns `None` when nothing is left.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let mut raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            raw.zeroize();
            return None;
        }
        let credential = Self(trimmed.to_string());
        raw.zeroize();
        Some(credential)
    }

    /// Read a credential from an environment variable. Unset and blank
    /// values both yield `None`.
    pub fn from_env(var: &str) -> Option<Self> {
        std::env::var(var).ok().and_then(Self::new)
    }

    /// Borrow the secret for a request header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new("sk-secret-value").unwrap();
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("sk-secret-value"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn test_blank_is_rejected() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   \n").is_none());
        assert_eq!(Credential::new("  key ").unwrap().expose(), "key");
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("PROMPTCRAFT_TEST_CREDENTIAL", "abc");
        assert_eq!(
            Credential::from_env("PROMPTCRAFT_TEST_CREDENTIAL").unwrap().expose(),
            "abc"
        );
        std::env::remove_var("PROMPTCRAFT_TEST_CREDENTIAL");
        assert!(Credential::from_env("PROMPTCRAFT_TEST_CREDENTIAL").is_none());
    }
}

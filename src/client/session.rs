// Client session holding the user's credential
// Author: kelexine (https://github.com/kelexine)

use crate::credential::Credential;
use crate::error::AppError;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Credential for the active session, created on login and wiped on logout.
///
/// Cheap to clone; clones share the same slot, so logging out through one
/// handle is seen by every component holding another.
#[derive(Clone, Default)]
pub struct Session {
    credential: Arc<RwLock<Option<Credential>>>,
}

// Custom Debug impl that never logs the credential
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a credential, replacing any previous one.
    pub fn login(&self, raw: &str) -> Result<(), AppError> {
        let credential = Credential::new(raw)
            .ok_or_else(|| AppError::validation("Please enter your API key to continue."))?;
        *self.credential.write() = Some(credential);
        info!("Session started");
        Ok(())
    }

    /// Drop the credential; its memory is zeroed.
    pub fn logout(&self) {
        if self.credential.write().take().is_some() {
            debug!("Session credential cleared");
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.read().is_some()
    }

    /// A copy of the credential for one request, zeroed when dropped.
    pub fn token(&self) -> Option<Zeroizing<String>> {
        self.credential
            .read()
            .as_ref()
            .map(|c| Zeroizing::new(c.expose().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_logout() {
        let session = Session::new();
        assert!(!session.is_authenticated());

        session.login("  my-key ").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token().unwrap().as_str(), "my-key");

        let shared = session.clone();
        shared.logout();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_blank_login_is_rejected() {
        let session = Session::new();
        let err = session.login("   ").unwrap_err();
        assert_eq!(err.message(), "Please enter your API key to continue.");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_debug_hides_credential() {
        let session = Session::new();
        session.login("super-secret").unwrap();
        let printed = format!("{:?}", session);
        assert!(!printed.contains("super-secret"));
    }
}

//! Injected session state holding the authentication credential.
//!
//! The session is an explicit object handed to the HTTP client at
//! construction time, with an install/teardown lifecycle tied to login
//! and logout. The credential is written once at login and read by every
//! outgoing private request; a server-side 401 tears it down centrally
//! so no stale in-memory state survives.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::schemas::UserProfile;

/// Credentials issued at login.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Bearer token attached to every private request.
    pub access_token: String,
    /// Profile of the authenticated user.
    pub user: UserProfile,
}

/// Shared session handle. Cheap to clone; all clones observe the same
/// credential state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<Credentials>>>,
}

impl Session {
    /// Creates an empty (logged-out) session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs credentials after a successful login.
    pub async fn install(&self, credentials: Credentials) {
        let mut guard = self.inner.write().await;
        *guard = Some(credentials);
    }

    /// Clears the credential. Called on explicit logout and centrally on
    /// any server-side 401.
    pub async fn teardown(&self) {
        let mut guard = self.inner.write().await;
        *guard = None;
    }

    /// Returns the current bearer token, if logged in.
    pub async fn token(&self) -> Option<String> {
        let guard = self.inner.read().await;
        guard.as_ref().map(|c| c.access_token.clone())
    }

    /// Returns the authenticated user profile, if logged in.
    pub async fn user(&self) -> Option<UserProfile> {
        let guard = self.inner.read().await;
        guard.as_ref().map(|c| c.user.clone())
    }

    /// Returns `true` if a credential is installed.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_credentials(token: &str) -> Credentials {
        Credentials {
            access_token: token.to_string(),
            user: UserProfile {
                id: uuid::Uuid::new_v4(),
                full_name: Some("Owner".to_string()),
                phone: None,
            },
        }
    }

    #[tokio::test]
    async fn starts_logged_out() {
        let session = Session::new();
        assert!(!session.is_authenticated().await);
        assert!(session.token().await.is_none());
    }

    #[tokio::test]
    async fn install_then_teardown() {
        let session = Session::new();
        session.install(make_credentials("tok-1")).await;
        assert!(session.is_authenticated().await);
        assert_eq!(session.token().await.as_deref(), Some("tok-1"));

        session.teardown().await;
        assert!(!session.is_authenticated().await);
        assert!(session.token().await.is_none());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let session = Session::new();
        let other = session.clone();
        session.install(make_credentials("tok-2")).await;
        assert_eq!(other.token().await.as_deref(), Some("tok-2"));

        other.teardown().await;
        assert!(!session.is_authenticated().await);
    }
}

//! # Identity Port
//!
//! The identity interface this system consumes but does not implement:
//! `current_user() -> identity | none` and `sign_out()`. Browsing is open to
//! anonymous sessions; checkout and staff operations require a resolvable
//! identity, which the services enforce.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// The caller's role, deciding what operations they may trigger.
///
/// Staff drive order transitions and manage the menu and floor; customers
/// place orders, reserve tables, and otherwise only observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Staff,
    Customer,
}

/// A resolved user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Stable id, recorded as `created_by` on orders.
    pub id: String,
    pub role: Role,
}

impl UserIdentity {
    pub fn is_staff(&self) -> bool {
        self.role == Role::Staff
    }
}

/// The consumed identity interface.
///
/// Implementations are supplied by the embedding surface (auth provider,
/// kiosk session, test fixture).
pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in user, or `None` for an anonymous session.
    fn current_user(&self) -> Option<UserIdentity>;

    /// Ends the session.
    fn sign_out(&self);
}

/// In-process identity holder, for tests and single-session embedders.
#[derive(Debug, Default)]
pub struct SessionIdentity {
    user: Mutex<Option<UserIdentity>>,
}

impl SessionIdentity {
    /// An anonymous session.
    pub fn anonymous() -> Self {
        SessionIdentity::default()
    }

    /// A session already signed in as `user`.
    pub fn signed_in(user: UserIdentity) -> Self {
        SessionIdentity {
            user: Mutex::new(Some(user)),
        }
    }

    /// Signs the session in as `user`.
    pub fn sign_in(&self, user: UserIdentity) {
        *self.user.lock().expect("identity mutex poisoned") = Some(user);
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user.lock().expect("identity mutex poisoned").clone()
    }

    fn sign_out(&self) {
        *self.user.lock().expect("identity mutex poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_identity_lifecycle() {
        let session = SessionIdentity::anonymous();
        assert!(session.current_user().is_none());

        session.sign_in(UserIdentity {
            id: "u1".to_string(),
            role: Role::Customer,
        });
        let user = session.current_user().unwrap();
        assert_eq!(user.id, "u1");
        assert!(!user.is_staff());

        session.sign_out();
        assert!(session.current_user().is_none());
    }
}

//! Who is acting.
//!
//! The identity provider (GitHub sign-in) is outside this crate. Callers turn
//! whatever it reports into an [`AuthContext`] and pass it to each operation.

use crate::errors::{Result, SharucoError};

/// Lowercases and trims a handle so route parameters and screen names match
/// document ids.
pub fn normalize_handle(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The signed-in user, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    handle: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for the provider's screen name. A blank name is anonymous.
    pub fn signed_in(screen_name: impl AsRef<str>) -> Self {
        let handle = normalize_handle(screen_name.as_ref());
        Self {
            handle: (!handle.is_empty()).then_some(handle),
        }
    }

    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.handle.is_some()
    }

    /// Handle of the signed-in user or `Unauthenticated`.
    pub fn require(&self) -> Result<&str> {
        self.handle().ok_or(SharucoError::Unauthenticated)
    }

    pub fn is(&self, handle: &str) -> bool {
        self.handle() == Some(handle)
    }
}

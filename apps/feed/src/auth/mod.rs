//! Authentication seam.
//!
//! Feed and upload services only need to know who is signed in; they take an
//! `AuthProvider` handle instead of reaching for an ambient auth instance.

pub mod session;

pub use session::SessionAuth;

/// Resolves the currently signed-in user
pub trait AuthProvider: Send + Sync {
    /// Returns the signed-in user's id, or `None` when signed out
    fn current_user(&self) -> Option<String>;
}

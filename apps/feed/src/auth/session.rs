use std::sync::RwLock;

use super::AuthProvider;

/// In-process session holding the signed-in user id
#[derive(Debug, Default)]
pub struct SessionAuth {
    user_id: RwLock<Option<String>>,
}

impl SessionAuth {
    /// Creates a signed-out session
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session already signed in as `user_id`
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: RwLock::new(Some(user_id.into())),
        }
    }

    /// Store user id in session. Empty ids are ignored.
    pub fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        if user_id.is_empty() {
            log::warn!("Ignoring sign-in with empty user id");
            return;
        }
        if let Ok(mut slot) = self.user_id.write() {
            *slot = Some(user_id);
        }
    }

    /// Clear session (logout)
    pub fn sign_out(&self) {
        if let Ok(mut slot) = self.user_id.write() {
            *slot = None;
        }
    }
}

impl AuthProvider for SessionAuth {
    fn current_user(&self) -> Option<String> {
        self.user_id.read().ok().and_then(|slot| slot.clone())
    }
}

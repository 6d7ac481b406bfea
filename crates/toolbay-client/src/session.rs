//! The authenticated user, held explicitly instead of as ambient state.
//!
//! Views resolve the viewer once through this model and pass the
//! resulting [`UserRef`] into whatever needs to know who is acting
//! (counterparty display, affordances, booking). No model reads a global.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use toolbay_gateway::Gateway;
use toolbay_shared::types::UserRef;

/// Loads and caches the authenticated user's profile.
#[derive(Clone)]
pub struct SessionModel {
    gateway: Arc<dyn Gateway>,
    user: Arc<RwLock<Option<UserRef>>>,
}

impl SessionModel {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            user: Arc::new(RwLock::new(None)),
        }
    }

    /// Fetch the profile, replacing whatever was held. A failure logs
    /// and leaves the session signed out; the caller renders the
    /// logged-out state.
    pub async fn load(&self) -> Option<UserRef> {
        let profile = match self.gateway.fetch_profile().await {
            Ok(user) => Some(user),
            Err(error) => {
                warn!(%error, "Failed to load profile");
                None
            }
        };

        let mut held = self.user.write().await;
        *held = profile.clone();
        profile
    }

    /// The held user, if signed in.
    pub async fn current_user(&self) -> Option<UserRef> {
        self.user.read().await.clone()
    }

    /// Drop the held user (sign-out).
    pub async fn clear(&self) {
        *self.user.write().await = None;
    }
}

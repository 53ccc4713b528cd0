use tracing::{info, warn};

use crate::api;
use crate::models::UserProfile;
use crate::query_cache::{fetch_or_cached, QueryCache, QueryKey};
use crate::services::RequestClient;

/// Who is signed in, as far as the client knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub loading: bool,
    pub user: Option<UserProfile>,
}

impl SessionState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            user: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            loading: false,
            user: None,
        }
    }

    pub fn signed_in(user: UserProfile) -> Self {
        Self {
            loading: false,
            user: Some(user),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }
}

/// Resolve the session once. Any failure leaves the user signed out;
/// only non-401 failures are worth a warning.
pub async fn load_session<C: RequestClient>(client: &C, cache: &QueryCache) -> SessionState {
    match fetch_or_cached(cache, QueryKey::current_user(), || api::current_user(client)).await {
        Ok(user) => {
            info!("Signed in as user {}", user.id);
            SessionState::signed_in(user)
        }
        Err(e) if e.is_unauthorized() => SessionState::anonymous(),
        Err(e) => {
            warn!("Failed to load session: {}", e);
            SessionState::anonymous()
        }
    }
}

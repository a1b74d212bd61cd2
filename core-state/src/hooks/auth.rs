use super::ViewState;
use crate::store::Store;
use crate::tracker::ActionTracker;
use core_api::{
    ApiClient, AuthApi, ClientError, LoginRequest, RegisterRequest, ResetPasswordRequest,
    Result, UpdateProfileRequest, User, UsersApi,
};
use core_auth::SessionContext;
use tracing::{debug, info};

/// Sign-in state and profile actions
#[derive(Debug, Clone)]
pub struct AuthHook {
    auth: AuthApi,
    users: UsersApi,
    session: SessionContext,
    store: Store,
    tracker: ActionTracker,
}

impl AuthHook {
    pub fn new(client: ApiClient, store: Store) -> Self {
        Self {
            session: client.session().clone(),
            auth: AuthApi::new(client.clone()),
            users: UsersApi::new(client),
            store,
            tracker: ActionTracker::new(),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.store.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<User> {
        let action = self.tracker.begin("login");
        let payload = action.settle(self.auth.login(request).await, "Login failed")?;
        action.commit(|| self.store.set_session(Some(payload.user.clone()), true));
        Ok(payload.user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let action = self.tracker.begin("register");
        let payload = action.settle(self.auth.register(request).await, "Registration failed")?;
        action.commit(|| self.store.set_session(Some(payload.user.clone()), true));
        Ok(payload.user)
    }

    /// Sign out; the local session and store are cleared even when the
    /// backend call fails
    pub async fn logout(&self) -> Result<()> {
        let action = self.tracker.begin("logout");
        let result = self.auth.logout().await;
        self.store.sign_out();
        action.settle(result, "Logout failed")
    }

    pub async fn verify_email(&self, token: &str) -> Result<()> {
        let action = self.tracker.begin("verify_email");
        action.settle(self.auth.verify_email(token).await, "Email verification failed")
    }

    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let action = self.tracker.begin("forgot_password");
        action.settle(
            self.auth.forgot_password(email).await,
            "Failed to send password reset email",
        )
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<()> {
        let action = self.tracker.begin("reset_password");
        let request = ResetPasswordRequest {
            token: token.to_string(),
            password: password.to_string(),
        };
        action.settle(
            self.auth.reset_password(&request).await,
            "Password reset failed",
        )
    }

    /// Fetch a profile; refreshes the signed-in user when the ids match
    pub async fn fetch_profile(&self, user_id: &str) -> Result<User> {
        let action = self.tracker.begin(format!("fetch_profile:{}", user_id));
        let user = action.settle(
            self.users.get_profile(user_id).await,
            "Failed to fetch profile",
        )?;
        action.commit(|| self.refresh_current_user(&user));
        Ok(user)
    }

    pub async fn update_profile(&self, user_id: &str, update: &UpdateProfileRequest) -> Result<User> {
        let action = self.tracker.begin(format!("update_profile:{}", user_id));
        let user = action.settle(
            self.users.update_profile(user_id, update).await,
            "Failed to update profile",
        )?;
        action.commit(|| self.refresh_current_user(&user));
        Ok(user)
    }

    /// Mark the store authenticated when a token is already persisted
    ///
    /// No user is loaded; the host can follow up with [`fetch_profile`]
    /// once it knows the user id.
    ///
    /// [`fetch_profile`]: AuthHook::fetch_profile
    pub async fn restore_session(&self) -> Result<bool> {
        let action = self.tracker.begin("restore_session");
        let has_token = action.settle(
            self.session.has_token().await.map_err(ClientError::from),
            "Failed to restore session",
        )?;

        action.commit(|| {
            if has_token {
                info!("Restored persisted session");
                self.store.set_session(self.store.user(), true);
            } else {
                debug!("No persisted session");
                self.store.set_session(None, false);
            }
        });
        Ok(has_token)
    }

    fn refresh_current_user(&self, user: &User) {
        let is_current = self
            .store
            .read(|s| s.user.as_ref().map_or(false, |u| u.id == user.id));
        if is_current {
            self.store.set_session(Some(user.clone()), true);
        }
    }
}

impl ViewState for AuthHook {
    fn tracker(&self) -> &ActionTracker {
        &self.tracker
    }

    fn store(&self) -> &Store {
        &self.store
    }
}

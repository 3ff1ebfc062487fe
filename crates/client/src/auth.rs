//! Session and authentication facade.
//!
//! Two login routes reach the same destination: password login and the
//! two-step OTP flows (registration and passwordless login). All of
//! them end in a stored token pair plus a cached [`User`]; from then on
//! the transport owns token lifetime (see [`crate::http`]).

use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::debug;

use satchel_core::model::{MessageResponse, OtpPurpose, TokenResponse, User};

use crate::error::ApiResult;
use crate::http::ApiTransport;
use crate::notify::Notifier;
use crate::storage::ClientState;

/// Shared "who is logged in" cell.
///
/// The facade writes it on login and logout; the transport clears it
/// when a session dies mid-request. Clones observe the same cell.
#[derive(Clone, Default)]
pub struct AuthState {
    user: Arc<RwLock<Option<User>>>,
}

impl AuthState {
    /// Snapshot of the cached user.
    pub fn user(&self) -> Option<User> {
        self.user.read().expect("auth state lock poisoned").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .expect("auth state lock poisoned")
            .is_some()
    }

    pub(crate) fn set_user(&self, user: Option<User>) {
        *self.user.write().expect("auth state lock poisoned") = user;
    }
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct OtpRequestPayload<'a> {
    email: &'a str,
    purpose: OtpPurpose,
}

#[derive(Serialize)]
struct RegisterVerifyPayload<'a> {
    email: &'a str,
    code: &'a str,
    password: &'a str,
    full_name: &'a str,
}

#[derive(Serialize)]
struct OtpVerifyPayload<'a> {
    email: &'a str,
    code: &'a str,
}

#[derive(Serialize)]
struct LogoutPayload<'a> {
    refresh_token: &'a str,
}

/// High-level authentication operations.
pub struct AuthFacade {
    transport: Arc<ApiTransport>,
    state: ClientState,
    auth: AuthState,
    notifier: Arc<dyn Notifier>,
}

impl AuthFacade {
    pub(crate) fn new(
        transport: Arc<ApiTransport>,
        state: ClientState,
        auth: AuthState,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            transport,
            state,
            auth,
            notifier,
        }
    }

    /// Password login. On success the token pair is stored and the
    /// user is cached.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        let response: TokenResponse = match self
            .transport
            .post_unauthenticated("/auth/login", &LoginPayload { email, password })
            .await
        {
            Ok(response) => response,
            Err(err) => {
                self.notifier.error(&err.user_message("Login failed"));
                return Err(err);
            }
        };

        let user = self.install_session(response);
        self.notifier.success("Welcome back!");
        Ok(user)
    }

    /// Ask the server to email a one-time code for the given flow.
    pub async fn request_otp(&self, email: &str, purpose: OtpPurpose) -> ApiResult<()> {
        let endpoint = match purpose {
            OtpPurpose::Registration => "/auth/register/request-otp",
            OtpPurpose::Login => "/auth/login/request-otp",
        };
        match self
            .transport
            .post_unauthenticated::<_, MessageResponse>(
                endpoint,
                &OtpRequestPayload { email, purpose },
            )
            .await
        {
            Ok(_) => {
                self.notifier
                    .success("Verification code sent to your email!");
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to send code"));
                Err(err)
            }
        }
    }

    /// Complete registration: verify the emailed code and create the
    /// account in one step. Logs the new user in.
    pub async fn verify_registration(
        &self,
        email: &str,
        code: &str,
        password: &str,
        full_name: &str,
    ) -> ApiResult<User> {
        let payload = RegisterVerifyPayload {
            email,
            code,
            password,
            full_name,
        };
        match self
            .transport
            .post_unauthenticated::<_, TokenResponse>("/auth/register/verify", &payload)
            .await
        {
            Ok(response) => {
                let user = self.install_session(response);
                self.notifier.success("Account created successfully!");
                Ok(user)
            }
            Err(err) => {
                self.notifier.error(&err.user_message("Verification failed"));
                Err(err)
            }
        }
    }

    /// Complete a passwordless login with an emailed code.
    pub async fn verify_login_otp(&self, email: &str, code: &str) -> ApiResult<User> {
        match self
            .transport
            .post_unauthenticated::<_, TokenResponse>(
                "/auth/login/verify-otp",
                &OtpVerifyPayload { email, code },
            )
            .await
        {
            Ok(response) => {
                let user = self.install_session(response);
                self.notifier.success("Welcome back!");
                Ok(user)
            }
            Err(err) => {
                self.notifier.error(&err.user_message("Verification failed"));
                Err(err)
            }
        }
    }

    /// End the session. The server call is best-effort; local state is
    /// wiped wholesale whether or not the server heard about it.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.state.refresh_token() {
            let result: ApiResult<MessageResponse> = self
                .transport
                .post(
                    "/auth/logout",
                    &LogoutPayload {
                        refresh_token: &refresh_token,
                    },
                )
                .await;
            if let Err(err) = result {
                debug!(error = %err, "ignoring logout error");
            }
        }

        self.state.clear_all();
        self.auth.set_user(None);
        self.notifier.success("Logged out successfully");
    }

    /// Restore the session at startup: with no stored token this stays
    /// offline and reports unauthenticated; with one it validates the
    /// token against `/auth/me`. Any failure wipes local state.
    pub async fn check_auth(&self) -> Option<User> {
        if self.state.access_token().is_none() {
            self.auth.set_user(None);
            return None;
        }

        match self.transport.get::<User>("/auth/me").await {
            Ok(user) => {
                self.auth.set_user(Some(user.clone()));
                Some(user)
            }
            Err(err) => {
                debug!(error = %err, "stored session is not usable");
                self.state.clear_all();
                self.auth.set_user(None);
                None
            }
        }
    }

    /// Cached user from the last successful login or [`Self::check_auth`].
    pub fn current_user(&self) -> Option<User> {
        self.auth.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    fn install_session(&self, tokens: TokenResponse) -> User {
        self.state
            .store_token_pair(&tokens.access_token, &tokens.refresh_token);
        self.auth.set_user(Some(tokens.user.clone()));
        tokens.user
    }
}

//! HTTP transport for the satchel API.
//!
//! Wraps [`reqwest`] with base-URL joining, bearer-token injection, and
//! the expired-token recovery policy: a 401 on an authenticated request
//! triggers exactly one token refresh followed by exactly one replay of
//! the original request. A failed refresh, or a second 401, wipes the
//! stored session and surfaces [`ApiError::SessionExpired`]. There are
//! no loops and no further retries.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use satchel_core::model::TokenResponse;

use crate::auth::AuthState;
use crate::config::ClientConfig;
use crate::error::{detail_from_body, ApiError, ApiResult};
use crate::storage::ClientState;

/// Every endpoint lives under this prefix on the configured server.
const API_PREFIX: &str = "/api/v1";

/// Shared request plumbing. One instance per [`crate::Session`]; all
/// stores clone the same `Arc`.
pub struct ApiTransport {
    client: reqwest::Client,
    base_url: String,
    state: ClientState,
    auth: AuthState,
}

#[derive(Serialize)]
struct RefreshPayload<'a> {
    refresh_token: &'a str,
}

impl ApiTransport {
    /// `config.api_url` is the server root (no `/api/v1`); trailing
    /// slashes are tolerated.
    pub fn new(config: &ClientConfig, state: ClientState, auth: AuthState) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self {
            client: builder.build().expect("Failed to build reqwest HTTP client"),
            base_url: format!("{}{}", config.api_url.trim_end_matches('/'), API_PREFIX),
            state,
            auth,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ---- request surface ----

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        self.execute(|| self.client.get(&url)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.url(path);
        self.execute(|| self.client.get(&url).query(query)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        self.execute(|| self.client.post(&url).json(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        self.execute(|| self.client.put(&url).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        self.execute(|| self.client.delete(&url)).await
    }

    /// POST a multipart form. `form` is a builder closure because a
    /// form body is consumed on send and the replay after a token
    /// refresh needs a fresh one.
    pub async fn post_multipart<T, F>(&self, path: &str, form: F) -> ApiResult<T>
    where
        T: DeserializeOwned,
        F: Fn() -> Form,
    {
        let url = self.url(path);
        self.execute(|| self.client.post(&url).multipart(form()))
            .await
    }

    /// POST without bearer injection or refresh handling, for the
    /// endpoints that run before a session exists (login, registration,
    /// OTP, refresh).
    pub async fn post_unauthenticated<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::parse_response(response).await
    }

    // ---- send loop ----

    async fn execute<T, F>(&self, build: F) -> ApiResult<T>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let response = self.send_with_bearer(&build).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::parse_response(response).await;
        }

        // Without a refresh token there is no session to repair; the
        // 401 is an ordinary error response.
        let refresh_token = match self.state.refresh_token() {
            Some(token) => token,
            None => return Self::parse_response(response).await,
        };

        info!("access token rejected; refreshing session");
        if let Err(err) = self.refresh_session(&refresh_token).await {
            debug!(error = %err, "token refresh failed");
            self.reset_session();
            return Err(ApiError::SessionExpired);
        }

        let retry = self.send_with_bearer(&build).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            self.reset_session();
            return Err(ApiError::SessionExpired);
        }
        Self::parse_response(retry).await
    }

    async fn send_with_bearer<F>(&self, build: &F) -> ApiResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut request = build();
        if let Some(token) = self.state.access_token() {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Exchange the refresh token for a fresh pair and store it.
    async fn refresh_session(&self, refresh_token: &str) -> ApiResult<()> {
        let response = self
            .client
            .post(self.url("/auth/refresh"))
            .json(&RefreshPayload { refresh_token })
            .send()
            .await?;
        let tokens: TokenResponse = Self::parse_response(response).await?;
        self.state
            .store_token_pair(&tokens.access_token, &tokens.refresh_token);
        Ok(())
    }

    /// Wipe local session state after an unrecoverable auth failure.
    fn reset_session(&self) {
        warn!("session expired; clearing stored credentials");
        self.state.clear_all();
        self.auth.set_user(None);
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Status`]
    /// carrying the server's `detail` message on failure.
    async fn ensure_success(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: detail_from_body(&body),
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

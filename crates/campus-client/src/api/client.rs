//! REST backend client.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use campus_core::error::AppError;
use campus_core::result::AppResult;
use campus_core::traits::local_store::write_json;
use campus_core::types::UserKey;
use campus_service::{AppContext, SessionUser};
use campus_store::keys;

use super::auth::{WithAuth, check, map_reqwest};
use super::models::{Event, LoginRequest, LoginResponse, NamedEntity, decode_list};
use super::retry::RetryPolicy;

/// Client for the REST backend.
///
/// The bearer token lives in memory and is mirrored to the local store so a
/// new process picks it up.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    ctx: AppContext,
    token: Arc<RwLock<Option<String>>>,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Build a client from the context's configuration.
    pub fn new(ctx: AppContext) -> AppResult<Self> {
        let config = &ctx.config().client;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: RetryPolicy::from_config(config),
            ctx,
            token: Arc::new(RwLock::new(None)),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// The bearer token, from memory or the local store.
    pub async fn token(&self) -> Option<String> {
        if let Some(token) = self.token.read().unwrap_or_else(|e| e.into_inner()).clone() {
            return Some(token);
        }
        let stored = self.ctx.local().get(keys::TOKEN).await.ok().flatten()?;
        let token = stored.trim().trim_matches('"').to_string();
        if token.is_empty() {
            return None;
        }
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.clone());
        Some(token)
    }

    async fn store_token(&self, token: &str) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        if let Err(e) = self.ctx.local().set(keys::TOKEN, token).await {
            warn!(error = %e, "Failed to persist token");
        }
    }

    /// Forget the token in memory and in the local store.
    pub async fn clear_token(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        if let Err(e) = self.ctx.local().remove(keys::TOKEN).await {
            warn!(error = %e, "Failed to remove persisted token");
        }
    }

    /// Authenticate and keep the returned token.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<()> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/login_check"))
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest)?;
        let LoginResponse { token } = check(response)
            .await?
            .json()
            .await
            .map_err(map_reqwest)?;
        self.store_token(&token).await;
        info!(username, "Logged in");
        Ok(())
    }

    /// The authenticated user's profile. A 401 clears the token. On success
    /// the user becomes the session user and is persisted locally.
    pub async fn me(&self) -> AppResult<SessionUser> {
        let token = self
            .token()
            .await
            .ok_or_else(|| AppError::authentication("Not logged in"))?;
        let response = self
            .http
            .get(self.url("/me"))
            .with_auth(Some(&token))
            .send()
            .await
            .map_err(map_reqwest)?;

        // Only 401 means the token itself is bad; 403 keeps it.
        let rejected = response.status() == StatusCode::UNAUTHORIZED;
        let user: SessionUser = match check(response).await {
            Ok(response) => response.json().await.map_err(map_reqwest)?,
            Err(e) if rejected => {
                warn!("Token rejected, clearing it");
                self.clear_token().await;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let local = self.ctx.local().as_ref();
        if let Err(e) = write_json(local, keys::USER, &user).await {
            warn!(error = %e, "Failed to persist user");
        }
        match UserKey::from_value(&user.id) {
            Some(key) => {
                if let Err(e) = local.set(keys::USER_ID, key.as_str()).await {
                    warn!(error = %e, "Failed to persist user id");
                }
            }
            None => warn!(id = %user.id, "Profile has no usable id"),
        }
        self.ctx.sign_in(user.clone());
        debug!(id = %user.id, "Loaded profile");
        Ok(user)
    }

    /// Create an account.
    pub async fn register<T: Serialize + ?Sized>(&self, payload: &T) -> AppResult<Value> {
        let response = self
            .http
            .post(self.url("/register"))
            .json(payload)
            .send()
            .await
            .map_err(map_reqwest)?;
        check(response).await?.json().await.map_err(map_reqwest)
    }

    /// Calendar events of `user`. Transport failures, timeouts and server
    /// errors are retried with backoff.
    pub async fn user_events(&self, user: &UserKey) -> AppResult<Vec<Event>> {
        let url = Url::parse_with_params(&self.url("/get-user-events"), &[("userId", user.as_str())])
            .map_err(|e| AppError::configuration(format!("Invalid backend URL: {e}")))?;
        let token = self.token().await;

        let body: Value = self
            .retry
            .run("get-user-events", || {
                let request = self.http.get(url.clone()).with_auth(token.as_deref());
                async move {
                    let response = request.send().await.map_err(map_reqwest)?;
                    check(response).await?.json().await.map_err(map_reqwest)
                }
            })
            .await?;
        Ok(decode_list("events", body))
    }

    /// Create a calendar event. Errors propagate to the caller.
    pub async fn create_event(&self, event: &Event) -> AppResult<Value> {
        let token = self.token().await;
        let response = self
            .http
            .post(self.url("/create-event"))
            .with_auth(token.as_deref())
            .json(event)
            .send()
            .await
            .map_err(map_reqwest)?;
        check(response).await?.json().await.map_err(map_reqwest)
    }

    /// All formations; empty on any failure.
    pub async fn formations(&self) -> Vec<NamedEntity> {
        self.list("/formations").await
    }

    /// All specializations; empty on any failure.
    pub async fn specializations(&self) -> Vec<NamedEntity> {
        self.list("/specializations").await
    }

    /// All users; empty on any failure.
    pub async fn users(&self) -> Vec<SessionUser> {
        self.list("/users").await
    }

    async fn list<T: DeserializeOwned>(&self, path: &str) -> Vec<T> {
        let token = self.token().await;
        let result = async {
            let response = self
                .http
                .get(self.url(path))
                .with_auth(token.as_deref())
                .send()
                .await
                .map_err(map_reqwest)?;
            check(response)
                .await?
                .json::<Value>()
                .await
                .map_err(map_reqwest)
        }
        .await;

        match result {
            Ok(body) => decode_list(path, body),
            Err(e) => {
                warn!(path, error = %e, "List request failed");
                Vec::new()
            }
        }
    }
}

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use shared_models::auth::{AuthResponse, SessionUser};

use crate::error::ClientError;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A logged-in identity. Dropped (or passed to [`ClinicClient::logout`]) to
/// end the session; the server keeps no session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Self {
            token: response.token,
            user: response.user,
        }
    }
}

pub struct ClinicClient {
    http: Client,
    base_url: String,
}

impl ClinicClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn logout(&self, session: Session) {
        info!("Session for {} ended", session.user.email);
    }

    pub async fn health(&self) -> Result<bool, ClientError> {
        let body: Value = self.execute(self.request(Method::GET, "/health", None)).await?;
        Ok(body["status"] == "ok")
    }

    pub(crate) fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let builder = self.http.request(method, url);
        match session {
            Some(session) => builder.bearer_auth(&session.token),
            None => builder,
        }
    }

    pub(crate) async fn execute<T>(&self, builder: RequestBuilder) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await.map_err(|e| {
            error!("Request failed: {}", e);
            ClientError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body["error"].as_str().map(str::to_string))
                .unwrap_or(text);
            debug!("API error ({}): {}", status, message);
            return Err(ClientError::from_status(status, message));
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Server {
            status: status.as_u16(),
            message: format!("Unexpected response body: {}", e),
        })
    }

    /// Fetch a `{ "<key>": [...], "total": n }` listing.
    pub(crate) async fn execute_list<T>(&self, builder: RequestBuilder, key: &str) -> Result<Vec<T>, ClientError>
    where
        T: DeserializeOwned,
    {
        let mut body: Value = self.execute(builder).await?;
        let items = body.get_mut(key).map(Value::take).unwrap_or(Value::Array(Vec::new()));

        serde_json::from_value(items).map_err(|e| ClientError::Server {
            status: 200,
            message: format!("Unexpected '{}' listing: {}", key, e),
        })
    }

    /// For endpoints that answer `{ "success": true, ... }`.
    pub(crate) async fn execute_ack(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        let _: Value = self.execute(builder).await?;
        Ok(())
    }
}

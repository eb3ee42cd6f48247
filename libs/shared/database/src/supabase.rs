use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::AppError;

/// `Prefer` value asking PostgREST to echo the affected rows.
pub const RETURN_REPRESENTATION: &str = "return=representation";

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        })
    }

    fn get_headers(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();

        let key = HeaderValue::from_str(&self.service_key)
            .map_err(|_| AppError::Internal("Supabase key is not a valid header value".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key))
            .map_err(|_| AppError::Internal("Supabase key is not a valid header value".to_string()))?;

        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            AppError::ExternalService(format!("Database unreachable: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => AppError::ExternalService(format!("Database rejected credentials: {}", error_text)),
                404 => AppError::NotFound(format!("Resource not found: {}", error_text)),
                409 => AppError::Conflict(format!("Duplicate record: {}", error_text)),
                _ => AppError::Database(format!("API error ({}): {}", status, error_text)),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Database(format!("Unexpected response body: {}", e)))
    }

    /// Send a request and have PostgREST return the affected rows.
    pub async fn returning<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
    {
        self.returning_with_prefer(method, path, body, RETURN_REPRESENTATION).await
    }

    pub async fn returning_with_prefer<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        prefer: &'static str,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static(prefer));

        self.request_with_headers(method, path, body, Some(headers)).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

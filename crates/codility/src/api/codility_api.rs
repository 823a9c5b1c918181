//! Codility API client
//!
//! One method per remote operation, each issuing exactly one authenticated
//! request. Successful bodies are handed back untouched as JSON values (or raw
//! bytes for the PDF report); any non-success status becomes
//! [`CodilityError::HttpStatus`]. The client never retries, backs off, or
//! caches anything.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

use crate::api::models::{
    AddCandidatesRequest, EmailCandidatesRequest, EmailTemplateRequest, WhiteboardRequest,
};
use crate::config::ClientConfig;
use crate::core::{CodilityError, Result};

/// Authenticated connection to the Codility API
///
/// Immutable after construction. Cloning is cheap and shares the underlying
/// connection pool.
#[derive(Debug, Clone)]
pub struct CodilityAPI {
    base_url: String,
    client: Client,
    timeout: Option<Duration>,
}

impl CodilityAPI {
    /// Create a client for `base_url` authenticated with `api_key`
    pub fn new<K: Into<String>, U: Into<String>>(api_key: K, base_url: U) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key).with_base_url(base_url))
    }

    /// Create a client from `CODILITY_API_KEY` / `CODILITY_API_URL`
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(CodilityError::Configuration {
                message: "API key must not be empty".to_string(),
                field: Some("api_key".to_string()),
                suggestion: Some("Pass the API key from your Codility account settings".to_string()),
            });
        }

        let base_url = normalize_base_url(&config.base_url)?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|_| {
            CodilityError::Configuration {
                message: "API key contains characters not allowed in an HTTP header".to_string(),
                field: Some("api_key".to_string()),
                suggestion: Some("Check the key for stray whitespace or line breaks".to_string()),
            }
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|source| CodilityError::HttpRequest { url: base_url.clone(), source })?;

        debug!("Codility API client ready for {}", base_url);

        Ok(Self { base_url, client, timeout: config.timeout })
    }

    /// Normalized API root, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an API sub-path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Account

    /// `GET /account/user`
    pub async fn get_user_details(&self) -> Result<Value> {
        self.get_json("/account/user").await
    }

    /// `GET /account/credits`
    pub async fn get_available_credits(&self) -> Result<Value> {
        self.get_json("/account/credits").await
    }

    /// `GET /account/logins`
    pub async fn list_user_logins(&self) -> Result<Value> {
        self.get_json("/account/logins").await
    }

    // CodeLive

    /// `GET /codelive/templates`
    pub async fn list_codelive_templates(&self) -> Result<Value> {
        self.get_json("/codelive/templates").await
    }

    /// `POST /codelive/sessions`
    ///
    /// The body is `template_id` merged with `candidate_info`; keys in
    /// `candidate_info` win on collision.
    pub async fn create_codelive_session(
        &self,
        template_id: &str,
        candidate_info: &Map<String, Value>,
    ) -> Result<Value> {
        let mut payload = Map::new();
        payload.insert("template_id".to_string(), Value::String(template_id.to_string()));
        payload.extend(candidate_info.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.post_json("/codelive/sessions", &payload).await
    }

    /// `POST /codelive/whiteboards`
    pub async fn create_whiteboard(&self, session_id: &str) -> Result<Value> {
        self.post_json("/codelive/whiteboards", &WhiteboardRequest { session_id }).await
    }

    // Email templates

    /// `GET /email/templates`
    pub async fn list_email_templates(&self) -> Result<Value> {
        self.get_json("/email/templates").await
    }

    /// `GET /email/templates/default`
    pub async fn get_default_email_template(&self) -> Result<Value> {
        self.get_json("/email/templates/default").await
    }

    /// `POST /email/templates`
    pub async fn create_email_template(&self, name: &str, subject: &str, body: &str) -> Result<Value> {
        self.post_json("/email/templates", &EmailTemplateRequest { name, subject, body }).await
    }

    // Sessions

    /// `GET /sessions`
    pub async fn list_sessions(&self) -> Result<Value> {
        self.get_json("/sessions").await
    }

    /// `GET /sessions/{id}`
    pub async fn get_session_data(&self, session_id: &str) -> Result<Value> {
        self.get_json(&format!("/sessions/{}", session_id)).await
    }

    /// `GET /sessions/{id}/report/pdf`, returned as raw bytes
    pub async fn get_pdf_report(&self, session_id: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(&format!("/sessions/{}/report/pdf", session_id));
        let response = self.execute(Method::GET, &url, self.client.get(&url)).await?;
        let body = response.bytes().await.map_err(|e| self.transport_error(&url, e))?;
        Ok(body.to_vec())
    }

    /// `GET /sessions/{id}/similarity`
    pub async fn get_similarity_results(&self, session_id: &str) -> Result<Value> {
        self.get_json(&format!("/sessions/{}/similarity", session_id)).await
    }

    /// `POST /sessions/{id}/email`
    pub async fn email_candidates(&self, session_id: &str, email_template_id: &str) -> Result<Value> {
        let payload = EmailCandidatesRequest { template_id: email_template_id };
        self.post_json(&format!("/sessions/{}/email", session_id), &payload).await
    }

    /// `DELETE /sessions/{id}`; any success body is discarded
    pub async fn cancel_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&format!("/sessions/{}", session_id));
        self.execute(Method::DELETE, &url, self.client.delete(&url)).await?;
        Ok(())
    }

    /// `GET /sessions/{id}/embed`
    pub async fn embed_candidate_report(&self, session_id: &str) -> Result<Value> {
        self.get_json(&format!("/sessions/{}/embed", session_id)).await
    }

    // Tests

    /// `GET /tests`
    pub async fn list_tests(&self) -> Result<Value> {
        self.get_json("/tests").await
    }

    /// `GET /tests/{id}`
    pub async fn get_test_details(&self, test_id: &str) -> Result<Value> {
        self.get_json(&format!("/tests/{}", test_id)).await
    }

    /// `GET /tests/{id}/sessions`
    pub async fn list_test_sessions(&self, test_id: &str) -> Result<Value> {
        self.get_json(&format!("/tests/{}/sessions", test_id)).await
    }

    /// `POST /tests/{id}/candidates`
    pub async fn add_candidates<C: Serialize>(&self, test_id: &str, candidates: &[C]) -> Result<Value> {
        let payload = AddCandidatesRequest { candidates };
        self.post_json(&format!("/tests/{}/candidates", test_id), &payload).await
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.endpoint(path);
        let response = self.execute(Method::GET, &url, self.client.get(&url)).await?;
        self.read_json(&url, response).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let url = self.endpoint(path);
        let response = self.execute(Method::POST, &url, self.client.post(&url).json(body)).await?;
        self.read_json(&url, response).await
    }

    /// Send a request and turn any non-success status into an error
    async fn execute(&self, method: Method, url: &str, request: RequestBuilder) -> Result<Response> {
        debug!("Codility API request: {} {}", method, url);
        let response = request.send().await.map_err(|e| self.transport_error(url, e))?;
        let status = response.status();
        debug!("Codility API response: {} {} -> {}", method, url, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CodilityError::HttpStatus {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    /// Parse a success body; an empty body reads as `null`
    async fn read_json(&self, url: &str, response: Response) -> Result<Value> {
        let body = response.bytes().await.map_err(|e| self.transport_error(url, e))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|source| CodilityError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn transport_error(&self, url: &str, error: reqwest::Error) -> CodilityError {
        match self.timeout {
            Some(timeout) if error.is_timeout() => CodilityError::NetworkTimeout {
                url: url.to_string(),
                duration_secs: timeout.as_secs(),
            },
            _ => CodilityError::HttpRequest { url: url.to_string(), source: error },
        }
    }
}

/// Strip trailing slashes and check the root is an absolute URL
fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    url::Url::parse(trimmed).map_err(|source| CodilityError::invalid_url(raw, source))?;
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slashes() {
        let api = CodilityAPI::new("key", "https://codility.com/api//").unwrap();
        assert_eq!(api.base_url(), "https://codility.com/api");
        assert_eq!(api.endpoint("/tests"), "https://codility.com/api/tests");
    }

    #[test]
    fn empty_key_is_a_configuration_error() {
        match CodilityAPI::new("  ", "https://codility.com/api") {
            Err(CodilityError::Configuration { field, .. }) => assert_eq!(field.as_deref(), Some("api_key")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn key_with_line_break_is_rejected() {
        assert!(matches!(
            CodilityAPI::new("abc\ndef", "https://codility.com/api"),
            Err(CodilityError::Configuration { .. })
        ));
    }

    #[test]
    fn relative_base_url_is_rejected() {
        match CodilityAPI::new("key", "codility.com/api") {
            Err(CodilityError::InvalidUrl { url, .. }) => assert_eq!(url, "codility.com/api"),
            other => panic!("Expected InvalidUrl error, got {:?}", other),
        }
    }

    #[test]
    fn debug_output_does_not_leak_key() {
        let api = CodilityAPI::new("super-secret-key", "https://codility.com/api").unwrap();
        assert!(!format!("{:?}", api).contains("super-secret-key"));
    }
}

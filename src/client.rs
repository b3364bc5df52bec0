//! GitLab API client.
//!
//! Low-level HTTP transport that handles authentication, request construction
//! and response interpretation. Resource-specific operations live on service
//! types such as [`ExternalStatusChecksService`](crate::ExternalStatusChecksService).

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{GitLabError, Result};
use crate::response::ResponseMeta;
use crate::service::ExternalStatusChecksService;

const DEFAULT_API_URL: &str = "https://gitlab.com/api/v4";
const USER_AGENT: &str = concat!("glstatus/", env!("CARGO_PKG_VERSION"));
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Low-level GitLab API client.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use glstatus::GitLabClient;
///
/// # fn example() -> glstatus::Result<()> {
/// // Create from environment variables
/// let client = GitLabClient::from_env()?;
///
/// // Or configure manually
/// let client = GitLabClient::new("glpat-xxxx", "https://gitlab.example.com/api/v4")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GitLabClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
}

impl std::fmt::Debug for GitLabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GitLabClient {
    /// Create a client from environment variables.
    ///
    /// Uses `GITLAB_TOKEN` for authentication and optionally `GITLAB_API_URL`
    /// for the versioned API root (defaults to `https://gitlab.com/api/v4`).
    ///
    /// # Errors
    ///
    /// Returns an error if `GITLAB_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("GITLAB_TOKEN").map_err(|_| {
            GitLabError::ConfigMissing("GITLAB_TOKEN environment variable not set".to_string())
        })?;

        let base_url = env::var("GITLAB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(&token, &base_url)
    }

    /// Create a new client with the provided token and API root.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal, project or group access token
    /// * `base_url` - Versioned API root (e.g., `https://gitlab.com/api/v4`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with / so relative paths join below it
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(GitLabError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Operations on external status checks.
    pub fn external_status_checks(&self) -> ExternalStatusChecksService<'_> {
        ExternalStatusChecksService::new(self)
    }

    /// Build an authenticated request for `path` relative to the API root.
    ///
    /// Options are encoded as a query string for `GET` and `HEAD`, and as a
    /// JSON body for every other method.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not form a valid URL or the options
    /// cannot be encoded.
    pub fn build_request<O: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        options: Option<&O>,
    ) -> Result<Request> {
        let url = self.base_url.join(path)?;
        let encode_as_query = method == Method::GET || method == Method::HEAD;

        let mut builder = self
            .http
            .request(method, url)
            .header(TOKEN_HEADER, &self.token);

        if let Some(options) = options {
            builder = if encode_as_query {
                builder.query(options)
            } else {
                builder.json(options)
            };
        }

        builder.build().map_err(GitLabError::RequestBuild)
    }

    /// Send a request and discard the response body.
    #[tracing::instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, request: Request) -> Result<ResponseMeta> {
        let (_, meta) = self.send(request).await?;
        Ok(meta)
    }

    /// Send a request and decode the JSON response body into `T`.
    #[tracing::instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<(T, ResponseMeta)> {
        let (response, meta) = self.send(request).await?;

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(source) => {
                return Err(GitLabError::BodyRead {
                    source,
                    response: Box::new(meta),
                })
            }
        };
        match serde_json::from_slice(&body) {
            Ok(value) => Ok((value, meta)),
            Err(source) => Err(GitLabError::Decode {
                source,
                response: Box::new(meta),
            }),
        }
    }

    async fn send(&self, request: Request) -> Result<(Response, ResponseMeta)> {
        let response = self
            .http
            .execute(request)
            .await
            .map_err(GitLabError::HttpError)?;

        let meta = ResponseMeta::from_parts(response.status(), response.headers());
        tracing::debug!(status = meta.status, "received response");

        Self::check_response(response, meta).await
    }

    /// Check response status and convert errors.
    async fn check_response(
        response: Response,
        meta: ResponseMeta,
    ) -> Result<(Response, ResponseMeta)> {
        let status = response.status();

        if status.is_success() {
            return Ok((response, meta));
        }

        // Handle rate limiting
        if status.as_u16() == 429 {
            return Err(GitLabError::RateLimited {
                retry_after_secs: meta.rate_limit.retry_after,
                response: Box::new(meta),
            });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(GitLabError::ApiError {
            message,
            status_code: status.as_u16(),
            response: Box::new(meta),
        })
    }

    /// Extract error message from a failed response.
    ///
    /// GitLab reports errors as `{"message": ...}` or `{"error": ...}`, where
    /// `message` may itself be an object of field errors.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            match json.get("message") {
                Some(serde_json::Value::String(msg)) => return msg.clone(),
                Some(other) if !other.is_null() => return other.to_string(),
                _ => {}
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body
        }
    }
}

//! Core Flow API client implementation.

use std::time::Duration;

use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{ClientError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("cluster-autoscaler-flow/", env!("CARGO_PKG_VERSION"));

/// A client for the Flow API.
///
/// The client is cheap to clone; clones share the connection pool.
///
/// # Example
///
/// ```no_run
/// use flow_client::{Client, Cursor};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("https://api.flow.ch/")?.with_token("my-token");
/// let nodes = client.list_nodes(42, Cursor::all()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    /// Base URL of the Flow API.
    base_url: String,
    /// HTTP client.
    http: HttpClient,
    /// Bearer token.
    token: Option<String>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Client {
    /// Create a new client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not http(s) or the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            http: build_http(DEFAULT_TIMEOUT)?,
            token: None,
        })
    }

    /// Set the access token, sent as `Authorization: Bearer <token>`.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Execute a GET request with query parameters.
    pub(crate) async fn get<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<Response> {
        let url = self.url(path);
        debug!(method = "GET", url = %url, "Flow API request");
        let response = self
            .with_auth(self.http.get(&url).query(query))
            .send()
            .await?;
        check_status(response).await
    }

    /// Execute a PUT request with a JSON body and decode the JSON response.
    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        debug!(method = "PUT", url = %url, "Flow API request");
        let response = self
            .with_auth(self.http.put(&url).json(body))
            .send()
            .await?;
        let response = check_status(response).await?;
        decode(response).await
    }

    /// Execute a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!(method = "DELETE", url = %url, "Flow API request");
        let response = self.with_auth(self.http.delete(&url)).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

fn build_http(timeout: Duration) -> Result<HttpClient> {
    Ok(HttpClient::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?)
}

/// Turn non-2xx responses into [`ClientError::Api`].
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or(body);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Decode a JSON body, keeping serde's error for diagnostics.
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

//! Core HTTP client with compression and connector credentials.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBuilder, RequestMethod};
use crate::response::Response;

/// HTTP client for Salesforce APIs.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct SfHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl SfHttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent);

        // Configure compression
        if config.accept_compressed {
            builder = builder.gzip(true).deflate(true);
        } else {
            builder = builder.gzip(false).deflate(false);
        }

        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a request builder for the given method.
    pub fn request(&self, method: RequestMethod, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// Execute a request: exactly one HTTP round trip.
    ///
    /// Any response the server produces is returned, whatever its status.
    /// Only failures to obtain a response (invalid URL, DNS, connect,
    /// timeout) are errors.
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let url = url::Url::parse(&request.url)?;

        let mut req = self.inner.request(request.method.to_reqwest(), url);

        // Connector credentials
        if let Some(ref token) = self.config.bearer_token {
            req = req.bearer_auth(token);
        }

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if self.config.accept_compressed {
            req = req.header("Accept-Encoding", "gzip, deflate");
        }

        if self.config.enable_tracing {
            debug!(
                method = %request.method,
                url = %request.url,
                "Sending request"
            );
        }

        let response = req.send().await?;

        if self.config.enable_tracing {
            let status = response.status().as_u16();
            let content_length = response.content_length();

            if response.status().is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(Response::new(response))
    }

    /// Execute a request and return the response.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = SfHttpClient::default_client().unwrap();
        assert!(client.config().accept_compressed);
    }

    #[tokio::test]
    async fn test_successful_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":true}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();

        let response = client
            .send(client.request(RequestMethod::Get, format!("{}/test", mock_server.uri())).accept_json())
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.status_text(), "OK");
    }

    #[tokio::test]
    async fn test_post_sends_bearer_token_and_no_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/secure"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::new(
            ClientConfig::builder()
                .with_bearer_token("test-token")
                .build(),
        )
        .unwrap();

        let response = client
            .send(client.request(RequestMethod::Post, format!("{}/secure", mock_server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        let received = mock_server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string(r#"{"error":"missing"}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();

        let response = client
            .send(client.request(RequestMethod::Get, format!("{}/missing", mock_server.uri())))
            .await
            .unwrap();

        assert!(!response.is_success());
        assert_eq!(response.status(), 404);
        assert_eq!(response.status_text(), "Not Found");
        assert_eq!(response.text().await.unwrap(), r#"{"error":"missing"}"#);
    }

    #[tokio::test]
    async fn test_no_retry_on_503() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/unavailable"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();

        let response = client
            .send(client.request(RequestMethod::Get, format!("{}/unavailable", mock_server.uri())))
            .await
            .unwrap();

        assert_eq!(response.status(), 503);
    }

    #[tokio::test]
    async fn test_api_usage_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/limits"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Sforce-Limit-Info", "api-usage=25/15000")
                    .set_body_string("{}"),
            )
            .mount(&mock_server)
            .await;

        let client = SfHttpClient::default_client().unwrap();
        let response = client
            .send(client.request(RequestMethod::Get, format!("{}/limits", mock_server.uri())))
            .await
            .unwrap();

        let usage = response.api_usage().unwrap();
        assert_eq!(usage.used, 25);
        assert_eq!(usage.limit, 15000);
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind and drop a listener to get a port nothing is listening on.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = SfHttpClient::new(
            ClientConfig::builder()
                .with_connect_timeout(Duration::from_secs(2))
                .build(),
        )
        .unwrap();

        let err = client
            .send(client.request(RequestMethod::Get, format!("http://127.0.0.1:{port}/x")))
            .await
            .unwrap_err();

        assert!(err.is_transport(), "unexpected error kind: {:?}", err.kind);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let client = SfHttpClient::default_client().unwrap();
        let err = client.send(client.request(RequestMethod::Get, "not a url")).await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidUrl(_)));
    }
}

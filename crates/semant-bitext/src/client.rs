//! HTTP client for the Bitext scoring endpoint.
//!
//! Wraps `reqwest` with the form-encoded POST the service expects and turns
//! the reply into a [`ServiceReply`]. Each call issues exactly one request;
//! there is no retry.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode, Url};
use semant_core::config::DEFAULT_BITEXT_ENDPOINT;

use crate::error::BitextError;
use crate::request::SentimentRequest;
use crate::response::{parse_body, SentimentPayload};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// What the service answered for one document.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceReply {
    /// Status 200 or 202 with a parsed body.
    Scored(SentimentPayload),
    /// Any other HTTP status. The body is not read.
    Rejected(StatusCode),
}

/// Client for the Bitext sentiment service.
///
/// Use [`BitextClient::new`] for the hosted endpoint or
/// [`BitextClient::with_endpoint`] to point at another server (wiremock in
/// tests).
pub struct BitextClient {
    client: Client,
    endpoint: Url,
}

impl BitextClient {
    /// Creates a client for the hosted endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`BitextError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, BitextError> {
        Self::with_endpoint(DEFAULT_BITEXT_ENDPOINT, timeout_secs, user_agent)
    }

    /// Creates a client for a custom endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`BitextError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`BitextError::InvalidEndpoint`] if
    /// `endpoint` is not a valid http(s) URL.
    pub fn with_endpoint(
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, BitextError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let parsed = Url::parse(endpoint).map_err(|e| BitextError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BitextError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            client,
            endpoint: parsed,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts one document and parses the reply.
    ///
    /// # Errors
    ///
    /// - [`BitextError::Http`] on network failure, timeout, or body read failure.
    /// - [`BitextError::UnknownEncoding`] if the body declares an encoding
    ///   label that does not resolve.
    /// - [`BitextError::Xml`] / [`BitextError::Malformed`] if the body is not
    ///   the expected XML document.
    pub async fn analyze(
        &self,
        request: &SentimentRequest<'_>,
    ) -> Result<ServiceReply, BitextError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(request.to_form_body())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::ACCEPTED {
            return Ok(ServiceReply::Rejected(status));
        }

        let body = response.bytes().await?;
        let payload = parse_body(&body)?;
        Ok(ServiceReply::Scored(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_parses() {
        let client = BitextClient::new(30, "semant-test").expect("client should build");
        assert_eq!(client.endpoint().host_str(), Some("svc9.bitext.com"));
        assert_eq!(client.endpoint().path(), "/WS_NOps_Val/Service.aspx");
    }

    #[test]
    fn rejects_unparseable_endpoint() {
        let result = BitextClient::with_endpoint("not a url", 30, "semant-test");
        assert!(matches!(result, Err(BitextError::InvalidEndpoint { .. })));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let result = BitextClient::with_endpoint("ftp://example.com/score", 30, "semant-test");
        let Err(BitextError::InvalidEndpoint { reason, .. }) = result else {
            panic!("expected InvalidEndpoint");
        };
        assert!(reason.contains("ftp"), "reason: {reason}");
    }
}

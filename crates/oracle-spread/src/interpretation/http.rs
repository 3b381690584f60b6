//! HTTP transport for the interpretation backend.

use crate::config::InterpretationConfig;

use super::{InterpretationRequest, InterpretationResponse, InterpretationTransport, TransportError};

/// Sends interpretation requests over HTTP with `reqwest`.
///
/// The client-level timeout bounds the whole round trip, so a hung backend
/// resolves as [`TransportError::Timeout`] rather than stalling the session.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Build a transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be constructed.
    pub fn new(config: &InterpretationConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// The URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl InterpretationTransport for HttpTransport {
    async fn send(
        &self,
        request: &InterpretationRequest,
        token: &str,
    ) -> Result<String, TransportError> {
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        if !resp.status().is_success() {
            return Err(TransportError::Status(resp.status().as_u16()));
        }

        let body: InterpretationResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Decode(e.to_string())
            }
        })?;
        Ok(body.interpretation)
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}

//! Blocking HTTP transport used for every API round-trip.
//!
//! The dataset only ever needs "GET this URL with these query parameters and give me
//! the body", so that is the whole [`HttpTransport`] contract. [`ReqwestTransport`] is
//! the production implementation; tests swap in canned payloads.

pub mod error;

use crate::http::error::HttpError;
use log::{info, warn};
use reqwest::blocking::Client;

const USER_AGENT: &str = concat!("agrometeo-rs/", env!("CARGO_PKG_VERSION"));

/// A synchronous request/response capability.
///
/// Implementations must not retry: a failed request is reported to the caller as-is.
pub trait HttpTransport {
    /// Issues a GET request against `url` with the given query parameters and returns
    /// the response body as text.
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, HttpError>;
}

/// [`HttpTransport`] backed by a `reqwest` blocking client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, HttpError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(HttpError::ClientBuild)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, HttpError> {
        info!("Requesting {} ({} query parameters)", url, query.len());

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| HttpError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    HttpError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    HttpError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        response
            .text()
            .map_err(|e| HttpError::Body(url.to_string(), e))
    }
}

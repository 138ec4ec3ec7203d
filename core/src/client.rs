//! Stateless HTTP request builder and response parser for the character API.
//!
//! # Design
//! `CharacterClient` holds only a `base_url` and carries no mutable state
//! between calls. Fetching is split into `build_fetch_characters`, which
//! produces an `HttpRequest`, and `parse_fetch_characters`, which consumes an
//! `HttpResponse`. The host executes the round trip in between, or hands a
//! `Transport` to `fetch_characters` to do all three steps in one call.

use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Character, CharacterEnvelope};

/// Public endpoint the screen reads from when no base URL is given.
pub const DEFAULT_BASE_URL: &str = "https://api.disneyapi.dev";

/// Synchronous, stateless client for the character API.
#[derive(Debug, Clone)]
pub struct CharacterClient {
    base_url: String,
}

impl Default for CharacterClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl CharacterClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_fetch_characters(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/character", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Any non-2xx status is a `Network` error; 4xx and 5xx are not told
    /// apart. The `data` array is returned in upstream order.
    pub fn parse_fetch_characters(&self, response: HttpResponse) -> Result<Vec<Character>, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Network {
                status: response.status,
            });
        }
        let envelope: CharacterEnvelope =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))?;
        debug!(count = envelope.data.len(), "decoded character envelope");
        Ok(envelope.data)
    }

    /// Build, execute through `transport`, and parse. One round trip per call.
    pub fn fetch_characters<T: Transport + ?Sized>(&self, transport: &T) -> Result<Vec<Character>, ApiError> {
        let request = self.build_fetch_characters();
        debug!(method = request.method.as_str(), path = %request.path, "fetching characters");
        let response = transport.execute(request)?;
        self.parse_fetch_characters(response)
    }
}

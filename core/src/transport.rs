//! Seam between the pure core and whatever performs the actual I/O.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round trip on behalf of the core.
///
/// Implementations return every completed response as data, including 4xx
/// and 5xx; status interpretation belongs to `CharacterClient`. Only a round
/// trip that never completed maps to `ApiError::Transport`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

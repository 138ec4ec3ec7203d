//! Core of the character browser screen.
//!
//! # Overview
//! Builds the `GET /character` request and parses its response without
//! touching the network (host-does-IO pattern), keeps the screen's view
//! state, and turns that state into a render model the host draws.
//!
//! # Design
//! - `CharacterClient` is stateless; it holds only `base_url`.
//! - Fetching is split into `build_*` and `parse_*` so the I/O boundary is
//!   explicit. `Transport` lets synchronous hosts and tests plug the round
//!   trip in directly.
//! - `CharacterScreen` is the single owner of view state. Results of a fetch
//!   are applied through a `LoadTicket`, so a fetch that outlives its mount
//!   is dropped.
//! - `ScreenView` is derived from the screen on demand; nothing caches it.

pub mod client;
pub mod error;
pub mod http;
pub mod render;
pub mod screen;
pub mod transport;
pub mod types;

pub use client::{CharacterClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use render::{CharacterRow, FeaturedPanel, FilmsSection, ScreenView};
pub use screen::{CharacterScreen, LoadOutcome, LoadTicket, ScreenPhase};
pub use transport::Transport;
pub use types::{Character, CharacterEnvelope};

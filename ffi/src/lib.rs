//! C-ABI wrapper around `character-core`.
//!
//! # Overview
//! Exposes the character screen through `extern "C"` functions so a native
//! mobile shell can drive it: mount, execute the returned request with the
//! platform HTTP stack, report the response, randomize, and draw the view.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - The host owns all I/O. `character_screen_mount` hands out the request
//!   and a ticket; the result comes back through `character_screen_complete`
//!   (response received) or `character_screen_fail` (round trip rejected).
//! - The C caller owns all returned pointers and must call the matching
//!   `character_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use character_core::{
    ApiError, Character, CharacterClient, CharacterScreen, HttpResponse, LoadTicket, ScreenView,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use types::*;

/// Read a borrowed C string. Null and invalid UTF-8 read as `None`.
fn read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

/// Fallback result for an entry point whose body panicked.
fn caught_panic(entry: &str) -> *mut FfiLoadResult {
    tracing::warn!(entry, "panic caught at FFI boundary");
    FfiLoadResult::panic(&format!("panic in {entry}"))
}

/// Turn the host's response into a fetch result. A body that is not UTF-8
/// only matters when the status says there is a payload to decode.
fn parse_response(client: &CharacterClient, resp: &FfiHttpResponse) -> Result<Vec<Character>, ApiError> {
    let body = if resp.body.is_null() {
        Ok("")
    } else {
        unsafe { CStr::from_ptr(resp.body) }.to_str()
    };
    match body {
        Ok(body) => client.parse_fetch_characters(HttpResponse::new(resp.status, body)),
        Err(_) => {
            let response = HttpResponse::new(resp.status, "");
            if response.is_success() {
                return Err(ApiError::Decode("response body is not valid UTF-8".to_string()));
            }
            client.parse_fetch_characters(response)
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Install a `tracing` subscriber that writes to stderr, filtered by
/// `RUST_LOG` (default `character_core=info`). Later calls are no-ops.
#[unsafe(no_mangle)]
pub extern "C" fn character_init_logging() {
    let _ = catch_unwind(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "character_core=info".into());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

// ---------------------------------------------------------------------------
// Screen lifecycle
// ---------------------------------------------------------------------------

/// Create a screen that reads characters from `base_url`.
///
/// `base_url` null means the public API. `seed` 0 seeds the randomizer from
/// OS entropy; any other value makes picks reproducible.
/// The caller must free the returned pointer with `character_screen_free`.
#[unsafe(no_mangle)]
pub extern "C" fn character_screen_new(base_url: *const c_char, seed: u64) -> *mut FfiCharacterScreen {
    catch_unwind(|| {
        let client = match read_str(base_url) {
            Some(url) => CharacterClient::new(url),
            None if base_url.is_null() => CharacterClient::default(),
            None => return std::ptr::null_mut(),
        };
        let rng = if seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(seed)
        };
        Box::into_raw(Box::new(FfiCharacterScreen {
            client,
            screen: CharacterScreen::new(),
            rng,
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a screen created by `character_screen_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn character_screen_free(screen: *mut FfiCharacterScreen) {
    if !screen.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(screen) });
        });
    }
}

/// Run the mount effect: the screen enters `Loading` and the request to
/// execute is returned, with its ticket written to `out_ticket`.
///
/// Returns null if an argument is null or the screen is already mounted.
/// The caller must free the returned pointer with `character_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn character_screen_mount(
    screen: *mut FfiCharacterScreen,
    out_ticket: *mut u64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if screen.is_null() || out_ticket.is_null() {
            return std::ptr::null_mut();
        }
        let screen = unsafe { &mut *screen };
        let Some(ticket) = screen.screen.mount() else {
            return std::ptr::null_mut();
        };
        unsafe { *out_ticket = ticket.generation() };
        FfiHttpRequest::from_core(screen.client.build_fetch_characters())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Report the response to the request returned by `character_screen_mount`.
///
/// The caller must free the returned pointer with `character_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn character_screen_complete(
    screen: *mut FfiCharacterScreen,
    ticket: u64,
    response: *const FfiHttpResponse,
) -> *mut FfiLoadResult {
    catch_unwind(|| {
        if screen.is_null() {
            return FfiLoadResult::null_arg("screen");
        }
        if response.is_null() {
            return FfiLoadResult::null_arg("response");
        }
        let screen = unsafe { &mut *screen };
        let result = parse_response(&screen.client, unsafe { &*response });
        let outcome = screen
            .screen
            .complete_load(LoadTicket::from_generation(ticket), result);
        FfiLoadResult::from_outcome(outcome)
    })
    .unwrap_or_else(|_| caught_panic("character_screen_complete"))
}

/// Report that the request could not be executed at all (no connection,
/// TLS failure, ...). `message` may be null.
///
/// The caller must free the returned pointer with `character_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn character_screen_fail(
    screen: *mut FfiCharacterScreen,
    ticket: u64,
    message: *const c_char,
) -> *mut FfiLoadResult {
    catch_unwind(|| {
        if screen.is_null() {
            return FfiLoadResult::null_arg("screen");
        }
        let screen = unsafe { &mut *screen };
        let message = read_str(message).unwrap_or("request failed").to_string();
        let outcome = screen
            .screen
            .complete_load(LoadTicket::from_generation(ticket), Err(ApiError::Transport(message)));
        FfiLoadResult::from_outcome(outcome)
    })
    .unwrap_or_else(|_| caught_panic("character_screen_fail"))
}

/// Tear the screen down. Any outstanding ticket becomes stale.
#[unsafe(no_mangle)]
pub extern "C" fn character_screen_unmount(screen: *mut FfiCharacterScreen) {
    if !screen.is_null() {
        let _ = catch_unwind(|| {
            unsafe { &mut *screen }.screen.unmount();
        });
    }
}

/// Current lifecycle phase. Null reads as `Idle`.
#[unsafe(no_mangle)]
pub extern "C" fn character_screen_phase(screen: *const FfiCharacterScreen) -> FfiScreenPhase {
    catch_unwind(|| {
        if screen.is_null() {
            return FfiScreenPhase::Idle;
        }
        unsafe { &*screen }.screen.phase().into()
    })
    .unwrap_or(FfiScreenPhase::Idle)
}

/// Feature a random loaded character. Returns false when there is nothing
/// to pick from.
#[unsafe(no_mangle)]
pub extern "C" fn character_screen_randomize(screen: *mut FfiCharacterScreen) -> bool {
    catch_unwind(|| {
        if screen.is_null() {
            return false;
        }
        let FfiCharacterScreen { screen, rng, .. } = unsafe { &mut *screen };
        screen.randomize_featured(rng).is_some()
    })
    .unwrap_or(false)
}

/// Snapshot the render model for the current state.
///
/// Returns null if `screen` is null.
/// The caller must free the returned pointer with `character_free_view`.
#[unsafe(no_mangle)]
pub extern "C" fn character_screen_render(screen: *const FfiCharacterScreen) -> *mut FfiScreenView {
    catch_unwind(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let screen = unsafe { &*screen };
        FfiScreenView::from_core(&ScreenView::from(&screen.screen))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by `character_screen_mount`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn character_free_request(req: *mut FfiHttpRequest) {
    if !req.is_null() {
        let _ = catch_unwind(|| FfiHttpRequest::free(req));
    }
}

/// Free a result returned by `character_screen_complete` or
/// `character_screen_fail`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn character_free_result(result: *mut FfiLoadResult) {
    if !result.is_null() {
        let _ = catch_unwind(|| FfiLoadResult::free(result));
    }
}

/// Free a view returned by `character_screen_render`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn character_free_view(view: *mut FfiScreenView) {
    if !view.is_null() {
        let _ = catch_unwind(|| FfiScreenView::free(view));
    }
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn character_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c_string(s));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

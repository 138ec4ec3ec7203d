//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of `Vec`,
//! null instead of `None`, and enums with explicit discriminants.
//! Conversion and release helpers live here to keep `lib.rs` focused on the
//! `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use character_core::render::{CharacterRow, FeaturedPanel, FilmsSection, ScreenView};
use character_core::{ApiError, CharacterClient, CharacterScreen, HttpMethod, LoadOutcome, ScreenPhase};
use rand::rngs::StdRng;

/// Opaque handle to a screen. C callers receive a pointer to this and pass
/// it back into every `character_screen_*` function.
pub struct FfiCharacterScreen {
    pub(crate) client: CharacterClient,
    pub(crate) screen: CharacterScreen,
    pub(crate) rng: StdRng,
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// Heap C string owned by the caller. Interior NULs are dropped.
pub(crate) fn c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', "")).unwrap_or_default().into_raw()
}

pub(crate) fn c_string_opt(s: Option<&str>) -> *mut c_char {
    s.map_or(std::ptr::null_mut(), c_string)
}

/// Release a string made by `c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Leak `items` as a C array. Empty input yields null.
fn leak_vec<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    let mut items = items.into_boxed_slice();
    let ptr = items.as_mut_ptr();
    std::mem::forget(items);
    (ptr, len)
}

/// Take back an array made by `leak_vec`.
fn reclaim_vec<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Returned by `character_screen_mount`. The host executes it and reports
/// back through `character_screen_complete` or `character_screen_fail`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: character_core::HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = leak_vec(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: c_string(&req.path),
            headers,
            headers_len,
            body: c_string_opt(req.body.as_deref()),
        }))
    }

    pub(crate) fn free(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        for h in reclaim_vec(req.headers, req.headers_len) {
            free_c_string(h.key);
            free_c_string(h.value);
        }
    }
}

/// An HTTP response described as C-compatible plain data.
///
/// The host builds this on its own stack after executing the request. The
/// FFI layer reads but never frees these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Load result
// ---------------------------------------------------------------------------

/// Lifecycle phase as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiScreenPhase {
    Idle = 0,
    Loading = 1,
    Ready = 2,
}

impl From<ScreenPhase> for FfiScreenPhase {
    fn from(p: ScreenPhase) -> Self {
        match p {
            ScreenPhase::Idle => FfiScreenPhase::Idle,
            ScreenPhase::Loading => FfiScreenPhase::Loading,
            ScreenPhase::Ready => FfiScreenPhase::Ready,
        }
    }
}

/// What a load report did to the screen.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiLoadOutcome {
    Loaded = 0,
    Empty = 1,
    /// The fetch failed; the screen shows an empty list.
    Failed = 2,
    /// Stale ticket or no fetch in flight; the screen is unchanged.
    Discarded = 3,
    /// The call itself was rejected (null argument, caught panic).
    Rejected = 4,
}

/// Error codes returned in `FfiLoadResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Network = 1,
    Decode = 2,
    Transport = 3,
    NullArg = 4,
    Panic = 5,
}

/// Result envelope for `character_screen_complete` / `character_screen_fail`.
///
/// `count` is set for `Loaded`. For `Failed` and `Rejected`, `error_code`
/// names the category and `error_message` is a human-readable C string;
/// otherwise `error_message` is null.
#[repr(C)]
pub struct FfiLoadResult {
    pub outcome: FfiLoadOutcome,
    pub count: u32,
    pub error_code: FfiErrorCode,
    pub http_status: u16,
    pub error_message: *mut c_char,
}

impl FfiLoadResult {
    fn boxed(
        outcome: FfiLoadOutcome,
        count: u32,
        error_code: FfiErrorCode,
        http_status: u16,
        msg: Option<&str>,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiLoadResult {
            outcome,
            count,
            error_code,
            http_status,
            error_message: c_string_opt(msg),
        }))
    }

    pub(crate) fn from_outcome(outcome: Option<LoadOutcome>) -> *mut Self {
        match outcome {
            None => Self::boxed(FfiLoadOutcome::Discarded, 0, FfiErrorCode::Ok, 0, None),
            Some(LoadOutcome::Empty) => Self::boxed(FfiLoadOutcome::Empty, 0, FfiErrorCode::Ok, 0, None),
            Some(LoadOutcome::Loaded { count }) => {
                Self::boxed(FfiLoadOutcome::Loaded, count as u32, FfiErrorCode::Ok, 0, None)
            }
            Some(LoadOutcome::Failed(err)) => {
                let code = match err {
                    ApiError::Network { .. } => FfiErrorCode::Network,
                    ApiError::Decode(_) => FfiErrorCode::Decode,
                    ApiError::Transport(_) => FfiErrorCode::Transport,
                };
                let status = err.status().unwrap_or(0);
                Self::boxed(FfiLoadOutcome::Failed, 0, code, status, Some(&err.to_string()))
            }
        }
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        let msg = format!("null argument: {name}");
        Self::boxed(FfiLoadOutcome::Rejected, 0, FfiErrorCode::NullArg, 0, Some(&msg))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiLoadOutcome::Rejected, 0, FfiErrorCode::Panic, 0, Some(msg))
    }

    pub(crate) fn free(result: *mut Self) {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
    }
}

// ---------------------------------------------------------------------------
// Render model
// ---------------------------------------------------------------------------

/// The highlighted panel. `avatar_url` is null when there is no image.
#[repr(C)]
pub struct FfiFeaturedPanel {
    pub label: *mut c_char,
    pub avatar_url: *mut c_char,
    pub name: *mut c_char,
    pub button_label: *mut c_char,
}

/// The "Featured In" block of a row. `more_label` is null when every title
/// is listed.
#[repr(C)]
pub struct FfiFilmsSection {
    pub label: *mut c_char,
    pub titles: *mut *mut c_char,
    pub titles_len: u32,
    pub remaining: u32,
    pub more_label: *mut c_char,
}

/// One list row. `films` is null when the character has no films.
#[repr(C)]
pub struct FfiCharacterRow {
    pub key: *mut c_char,
    pub avatar_url: *mut c_char,
    pub name: *mut c_char,
    pub films: *mut FfiFilmsSection,
}

/// Everything the host draws for one frame.
///
/// While `loading` is true only `loading_message` is set. Otherwise
/// `featured` may be null and `rows` holds `rows_len` entries.
#[repr(C)]
pub struct FfiScreenView {
    pub loading: bool,
    pub loading_message: *mut c_char,
    pub featured: *mut FfiFeaturedPanel,
    pub rows: *mut FfiCharacterRow,
    pub rows_len: u32,
}

impl FfiFeaturedPanel {
    fn from_core(panel: &FeaturedPanel) -> *mut Self {
        Box::into_raw(Box::new(FfiFeaturedPanel {
            label: c_string(panel.label),
            avatar_url: c_string_opt(panel.avatar_url.as_deref()),
            name: c_string(&panel.name),
            button_label: c_string(panel.button_label),
        }))
    }

    fn free(panel: *mut Self) {
        let panel = unsafe { Box::from_raw(panel) };
        free_c_string(panel.label);
        free_c_string(panel.avatar_url);
        free_c_string(panel.name);
        free_c_string(panel.button_label);
    }
}

impl FfiFilmsSection {
    fn from_core(films: &FilmsSection) -> *mut Self {
        let titles: Vec<*mut c_char> = films.titles.iter().map(|t| c_string(t)).collect();
        let (titles, titles_len) = leak_vec(titles);
        Box::into_raw(Box::new(FfiFilmsSection {
            label: c_string(films.label),
            titles,
            titles_len,
            remaining: films.remaining as u32,
            more_label: c_string_opt(films.more_label().as_deref()),
        }))
    }

    fn free(films: *mut Self) {
        let films = unsafe { Box::from_raw(films) };
        free_c_string(films.label);
        free_c_string(films.more_label);
        for title in reclaim_vec(films.titles, films.titles_len) {
            free_c_string(title);
        }
    }
}

impl FfiCharacterRow {
    fn from_core(row: &CharacterRow) -> Self {
        FfiCharacterRow {
            key: c_string(&row.key),
            avatar_url: c_string_opt(row.avatar_url.as_deref()),
            name: c_string(&row.name),
            films: row
                .films
                .as_ref()
                .map_or(std::ptr::null_mut(), FfiFilmsSection::from_core),
        }
    }

    fn free_fields(&self) {
        free_c_string(self.key);
        free_c_string(self.avatar_url);
        free_c_string(self.name);
        if !self.films.is_null() {
            FfiFilmsSection::free(self.films);
        }
    }
}

impl FfiScreenView {
    pub(crate) fn from_core(view: &ScreenView) -> *mut Self {
        let ffi_view = match view {
            ScreenView::Loading { message } => FfiScreenView {
                loading: true,
                loading_message: c_string(message),
                featured: std::ptr::null_mut(),
                rows: std::ptr::null_mut(),
                rows_len: 0,
            },
            ScreenView::Ready { featured, rows } => {
                let rows: Vec<FfiCharacterRow> = rows.iter().map(FfiCharacterRow::from_core).collect();
                let (rows, rows_len) = leak_vec(rows);
                FfiScreenView {
                    loading: false,
                    loading_message: std::ptr::null_mut(),
                    featured: featured
                        .as_ref()
                        .map_or(std::ptr::null_mut(), FfiFeaturedPanel::from_core),
                    rows,
                    rows_len,
                }
            }
        };
        Box::into_raw(Box::new(ffi_view))
    }

    pub(crate) fn free(view: *mut Self) {
        let view = unsafe { Box::from_raw(view) };
        free_c_string(view.loading_message);
        if !view.featured.is_null() {
            FfiFeaturedPanel::free(view.featured);
        }
        for row in reclaim_vec(view.rows, view.rows_len) {
            row.free_fields();
        }
    }
}

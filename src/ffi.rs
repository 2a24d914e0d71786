//! C-compatible FFI API for cross-language bindings.
//!
//! # ABI Contract
//!
//! All exported functions use `extern "C"` calling convention and `#[no_mangle]`
//! to ensure stable symbol names. Diagram configurations cross the boundary as
//! UTF-8 JSON (the serde form of [`DiagramConfig`]); missing sections take
//! their defaults, so `{}` is the factory diagram.
//!
//! ## Memory management
//! - Buffers returned by `dd_*` functions are allocated on the Rust heap.
//! - Callers **must** free them with `dd_free_buffer` / `dd_free_string`.
//! - Passing a null pointer to a free function is a no-op.
//!
//! ## Error handling
//! - Functions return a `c_int`: `0` on success, otherwise the same code the
//!   `diamond` binary exits with ([`DiagramError::exit_code`]): `2` when the
//!   configuration has an invalid dimension, `1` for any other failure.
//! - Error details can be retrieved via `dd_last_error`.
//!
//! ## Thread safety
//! - The error slot is thread-local, so it is safe to call from multiple
//!   threads.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::slice;

use crate::config::DiagramConfig;
use crate::error::DiagramError;
use crate::layout::compute_layout;
use crate::pipeline::{generate_preview_pdf, generate_svg};
use crate::render_model::RenderModel;
use crate::svg::render_svg;

pub const DD_OK: c_int = 0;
pub const DD_UNEXPECTED: c_int = 1;
pub const DD_INVALID_DIMENSION: c_int = 2;

thread_local! {
    static LAST_ERROR: RefCell<Option<(c_int, CString)>> = const { RefCell::new(None) };
}

fn set_last_error(code: c_int, msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok().map(|cs| (code, cs));
    });
}

fn fail(err: &DiagramError) -> c_int {
    let code = err.exit_code() as c_int;
    set_last_error(code, &err.to_string());
    code
}

/// # Safety
/// `ptr` must point to `len` readable bytes.
unsafe fn read_str<'a>(ptr: *const u8, len: u32) -> Result<&'a str, DiagramError> {
    let bytes = slice::from_raw_parts(ptr, len as usize);
    std::str::from_utf8(bytes).map_err(|e| DiagramError::Unexpected(format!("Invalid UTF-8: {e}")))
}

/// # Safety
/// `out_buf` and `out_len` must be valid for writes.
unsafe fn hand_out_buffer(bytes: Vec<u8>, out_buf: *mut *mut u8, out_len: *mut u32) {
    let len = bytes.len() as u32;
    let buf = bytes.into_boxed_slice();
    *out_buf = Box::into_raw(buf) as *mut u8;
    *out_len = len;
}

// ---------------------------------------------------------------------------
// Core API
// ---------------------------------------------------------------------------

/// Generate an SVG document from a JSON diagram configuration.
///
/// # Parameters
/// - `json_ptr`, `json_len`: UTF-8 configuration JSON (not necessarily null-terminated)
/// - `out_buf`, `out_len`: on success, receive the heap-allocated SVG bytes
///
/// # Returns
/// `0` on success, non-zero on error. On error, call `dd_last_error`.
///
/// # Safety
/// - `json_ptr` must point to `json_len` valid bytes.
/// - `out_buf` and `out_len` must be valid pointers.
/// - The caller must free `*out_buf` by calling `dd_free_buffer`.
#[no_mangle]
pub unsafe extern "C" fn dd_generate_svg(
    json_ptr: *const u8,
    json_len: u32,
    out_buf: *mut *mut u8,
    out_len: *mut u32,
) -> c_int {
    if json_ptr.is_null() || out_buf.is_null() || out_len.is_null() {
        set_last_error(DD_UNEXPECTED, "Null pointer argument");
        return DD_UNEXPECTED;
    }

    let result = read_str(json_ptr, json_len)
        .and_then(DiagramConfig::from_json)
        .and_then(|cfg| generate_svg(&cfg));

    match result {
        Ok((svg, _)) => {
            hand_out_buffer(svg.into_bytes(), out_buf, out_len);
            DD_OK
        }
        Err(e) => fail(&e),
    }
}

/// Generate a single-page PDF preview from a JSON diagram configuration.
///
/// # Safety
/// Same as `dd_generate_svg`.
#[no_mangle]
pub unsafe extern "C" fn dd_generate_preview_pdf(
    json_ptr: *const u8,
    json_len: u32,
    out_buf: *mut *mut u8,
    out_len: *mut u32,
) -> c_int {
    if json_ptr.is_null() || out_buf.is_null() || out_len.is_null() {
        set_last_error(DD_UNEXPECTED, "Null pointer argument");
        return DD_UNEXPECTED;
    }

    let result = read_str(json_ptr, json_len)
        .and_then(DiagramConfig::from_json)
        .and_then(|cfg| generate_preview_pdf(&cfg));

    match result {
        Ok((bytes, _)) => {
            hand_out_buffer(bytes, out_buf, out_len);
            DD_OK
        }
        Err(e) => fail(&e),
    }
}

/// Compute only the render model. Returns it as a null-terminated JSON string.
///
/// # Safety
/// - `json_ptr` must point to `json_len` valid bytes.
/// - `*out_json_ptr` must be freed with `dd_free_string`.
#[no_mangle]
pub unsafe extern "C" fn dd_compute_layout_json(
    json_ptr: *const u8,
    json_len: u32,
    out_json_ptr: *mut *mut c_char,
) -> c_int {
    if json_ptr.is_null() || out_json_ptr.is_null() {
        set_last_error(DD_UNEXPECTED, "Null pointer argument");
        return DD_UNEXPECTED;
    }

    let result = read_str(json_ptr, json_len)
        .and_then(DiagramConfig::from_json)
        .and_then(|cfg| compute_layout(&cfg));

    match result {
        Ok(model) => match CString::new(model.to_json()) {
            Ok(cs) => {
                *out_json_ptr = cs.into_raw();
                DD_OK
            }
            Err(_) => fail(&DiagramError::Unexpected("JSON contained null byte".into())),
        },
        Err(e) => fail(&e),
    }
}

/// Render an SVG from a previously computed render model JSON string.
///
/// This allows computing the layout once and emitting it separately.
///
/// # Safety
/// `model_json` must be a valid null-terminated string; `out_buf` and
/// `out_len` must be valid pointers.
#[no_mangle]
pub unsafe extern "C" fn dd_render_svg_from_model(
    model_json: *const c_char,
    out_buf: *mut *mut u8,
    out_len: *mut u32,
) -> c_int {
    if model_json.is_null() || out_buf.is_null() || out_len.is_null() {
        set_last_error(DD_UNEXPECTED, "Null pointer argument");
        return DD_UNEXPECTED;
    }

    let result = CStr::from_ptr(model_json)
        .to_str()
        .map_err(|e| DiagramError::Unexpected(format!("Invalid UTF-8 in JSON: {e}")))
        .and_then(RenderModel::from_json);

    match result {
        Ok(model) => {
            hand_out_buffer(render_svg(&model).into_bytes(), out_buf, out_len);
            DD_OK
        }
        Err(e) => fail(&e),
    }
}

// ---------------------------------------------------------------------------
// Memory management
// ---------------------------------------------------------------------------

/// Free a buffer returned by `dd_generate_svg` (or similar).
///
/// # Safety
/// `buf` must have been returned by a previous `dd_*` call, and `len` must be
/// the corresponding length.
#[no_mangle]
pub unsafe extern "C" fn dd_free_buffer(buf: *mut u8, len: u32) {
    if !buf.is_null() {
        let _ = Box::from_raw(slice::from_raw_parts_mut(buf, len as usize));
    }
}

/// Free a string returned by `dd_compute_layout_json`.
///
/// # Safety
/// `s` must have been returned by Rust's `CString::into_raw`.
#[no_mangle]
pub unsafe extern "C" fn dd_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Retrieve the last error message. Returns a null-terminated string.
///
/// The returned pointer is valid until the next failing `dd_*` call on the
/// same thread. The caller should **not** free this pointer.
///
/// Returns null if no error has occurred.
#[no_mangle]
pub extern "C" fn dd_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        let borrow = e.borrow();
        match borrow.as_ref() {
            Some((_, cs)) => cs.as_ptr(),
            None => ptr::null(),
        }
    })
}

/// Status code of the last error (`2` or `1`), or `0` if none occurred.
#[no_mangle]
pub extern "C" fn dd_last_error_kind() -> c_int {
    LAST_ERROR.with(|e| {
        let borrow = e.borrow();
        borrow.as_ref().map_or(DD_OK, |(code, _)| *code)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn last_error() -> String {
        unsafe { CStr::from_ptr(dd_last_error()) }
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn ffi_generate_svg() {
        let json = b"{}";
        let mut out_buf: *mut u8 = ptr::null_mut();
        let mut out_len: u32 = 0;

        let rc = unsafe { dd_generate_svg(json.as_ptr(), json.len() as u32, &mut out_buf, &mut out_len) };

        assert_eq!(rc, DD_OK, "Expected success");
        assert!(!out_buf.is_null());
        let bytes = unsafe { slice::from_raw_parts(out_buf, out_len as usize) };
        assert!(bytes.starts_with(b"<?xml"));
        assert!(std::str::from_utf8(bytes).unwrap().contains("Discover"));

        unsafe { dd_free_buffer(out_buf, out_len) };
    }

    #[test]
    fn ffi_generate_preview_pdf() {
        let json = br#"{"header": {"title": null, "subtitle": null}}"#;
        let mut out_buf: *mut u8 = ptr::null_mut();
        let mut out_len: u32 = 0;

        let rc = unsafe {
            dd_generate_preview_pdf(json.as_ptr(), json.len() as u32, &mut out_buf, &mut out_len)
        };

        assert_eq!(rc, DD_OK);
        let bytes = unsafe { slice::from_raw_parts(out_buf, out_len as usize) };
        assert_eq!(&bytes[0..5], b"%PDF-");
        unsafe { dd_free_buffer(out_buf, out_len) };
    }

    #[test]
    fn ffi_invalid_dimension() {
        let json = br#"{"canvas": {"width": 100, "height": 600, "margin": 60, "gap": 20}}"#;
        let mut out_buf: *mut u8 = ptr::null_mut();
        let mut out_len: u32 = 0;

        let rc = unsafe { dd_generate_svg(json.as_ptr(), json.len() as u32, &mut out_buf, &mut out_len) };

        assert_eq!(rc, DD_INVALID_DIMENSION);
        assert_eq!(dd_last_error_kind(), DD_INVALID_DIMENSION);
        assert!(last_error().contains("margin"));
        assert!(out_buf.is_null());
    }

    #[test]
    fn ffi_bad_json_is_unexpected() {
        let json = b"{not json";
        let mut json_ptr: *mut c_char = ptr::null_mut();

        let rc = unsafe { dd_compute_layout_json(json.as_ptr(), json.len() as u32, &mut json_ptr) };

        assert_eq!(rc, DD_UNEXPECTED);
        assert!(last_error().contains("JSON"));
    }

    #[test]
    fn ffi_layout_then_render() {
        let configs: [&str; 4] = [
            "{}",
            r#"{"canvas": {"width": 801, "height": 601}}"#,
            r#"{"canvas": {"width": 2019.5882415616331, "height": 1094.7627063553547,
                "margin": 48.05878740494918, "gap": 9.447494291387276}}"#,
            r#"{"canvas": {"width": 333.3333333333333, "height": 233.33333333333334,
                "margin": 0.1, "gap": 0.7}, "header": {"title": null, "subtitle": null}}"#,
        ];

        for json in configs {
            let mut model_ptr: *mut c_char = ptr::null_mut();
            let rc = unsafe { dd_compute_layout_json(json.as_ptr(), json.len() as u32, &mut model_ptr) };
            assert_eq!(rc, DD_OK);

            let model_json = unsafe { CStr::from_ptr(model_ptr) }.to_str().unwrap();
            assert!(model_json.contains("header_height"));

            let mut out_buf: *mut u8 = ptr::null_mut();
            let mut out_len: u32 = 0;
            let rc = unsafe { dd_render_svg_from_model(model_ptr, &mut out_buf, &mut out_len) };
            assert_eq!(rc, DD_OK);

            let direct = generate_svg(&DiagramConfig::from_json(json).unwrap()).unwrap().0;
            let via_model = unsafe { slice::from_raw_parts(out_buf, out_len as usize) };
            assert_eq!(std::str::from_utf8(via_model).unwrap(), direct, "config {json}");

            unsafe {
                dd_free_buffer(out_buf, out_len);
                dd_free_string(model_ptr);
            }
        }
    }

    #[test]
    fn ffi_codes_match_cli_exit_codes() {
        assert_eq!(DD_INVALID_DIMENSION, DiagramError::invalid("gap", "too wide").exit_code());
        assert_eq!(DD_UNEXPECTED, DiagramError::Unexpected("boom".into()).exit_code());
    }

    #[test]
    fn ffi_null_input() {
        let mut out_buf: *mut u8 = ptr::null_mut();
        let mut out_len: u32 = 0;

        let rc = unsafe { dd_generate_svg(ptr::null(), 0, &mut out_buf, &mut out_len) };

        assert_ne!(rc, DD_OK, "Should fail on null input");
    }
}

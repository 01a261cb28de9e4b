//! FFI bindings for commit signals
//!
//! This module provides C-compatible functions for calling the library from other languages.
//! All functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `csig_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use chrono::DateTime;

use crate::classifier::classify;
use crate::config::AnalysisConfig;
use crate::pipeline::{commits_to_report, SignalProcessor};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Analyse a JSON array of commits and return the report JSON.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `csig_free_string`.
/// - Returns NULL on error; call `csig_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn csig_commits_to_report(json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match commits_to_report(json_str) {
        Ok(report) => string_to_cstr(&report),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Classify a single commit and return the classification JSON.
///
/// # Safety
/// - `message`, `author_name`, `author_email` and `timestamp` must be valid
///   null-terminated C strings. `timestamp` is RFC3339.
/// - Returns a newly allocated string that must be freed with `csig_free_string`.
/// - Returns NULL on error; call `csig_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn csig_classify(
    message: *const c_char,
    author_name: *const c_char,
    author_email: *const c_char,
    timestamp: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let message_str = match cstr_to_string(message) {
        Some(s) => s,
        None => {
            set_last_error("Invalid message string pointer");
            return ptr::null_mut();
        }
    };

    let name_str = match cstr_to_string(author_name) {
        Some(s) => s,
        None => {
            set_last_error("Invalid author_name string pointer");
            return ptr::null_mut();
        }
    };

    let email_str = match cstr_to_string(author_email) {
        Some(s) => s,
        None => {
            set_last_error("Invalid author_email string pointer");
            return ptr::null_mut();
        }
    };

    let ts_str = match cstr_to_string(timestamp) {
        Some(s) => s,
        None => {
            set_last_error("Invalid timestamp string pointer");
            return ptr::null_mut();
        }
    };

    let ts = match DateTime::parse_from_rfc3339(&ts_str) {
        Ok(ts) => ts,
        Err(e) => {
            set_last_error(&format!("Invalid timestamp '{}': {}", ts_str, e));
            return ptr::null_mut();
        }
    };

    let result = classify(&message_str, &name_str, &email_str, ts);
    match serde_json::to_string(&result) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a SignalProcessor
pub struct SignalProcessorHandle {
    processor: SignalProcessor,
}

/// Create a new SignalProcessor.
///
/// # Safety
/// - `config_json` is an `AnalysisConfig` JSON document, or NULL for defaults.
/// - Returns a pointer to a newly allocated SignalProcessor.
/// - Must be freed with `csig_processor_free`.
/// - Returns NULL on error; call `csig_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn csig_processor_new(
    config_json: *const c_char,
) -> *mut SignalProcessorHandle {
    clear_last_error();

    let config = if config_json.is_null() {
        AnalysisConfig::default()
    } else {
        let json_str = match cstr_to_string(config_json) {
            Some(s) => s,
            None => {
                set_last_error("Invalid config string pointer");
                return ptr::null_mut();
            }
        };
        match AnalysisConfig::from_json(&json_str) {
            Ok(config) => config,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    };

    match SignalProcessor::with_config(config) {
        Ok(processor) => Box::into_raw(Box::new(SignalProcessorHandle { processor })),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a SignalProcessor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `csig_processor_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn csig_processor_free(processor: *mut SignalProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Ingest a JSON array of commits into a processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `csig_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns the number of new commits, or -1 on error.
/// - On error, call `csig_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn csig_processor_ingest(
    processor: *mut SignalProcessorHandle,
    json: *const c_char,
) -> i64 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }

    let handle = &mut *processor;

    let json_str = match cstr_to_string(json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return -1;
        }
    };

    match handle.processor.ingest(&json_str) {
        Ok(added) => added as i64,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Build the report for everything a processor has ingested.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `csig_processor_new`.
/// - Returns a newly allocated string that must be freed with `csig_free_string`.
/// - Returns NULL on error; call `csig_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn csig_processor_report(
    processor: *mut SignalProcessorHandle,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }

    let handle = &*processor;

    match handle.processor.report() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Drop every commit a processor has ingested.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `csig_processor_new`, or NULL.
#[no_mangle]
pub unsafe extern "C" fn csig_processor_clear(processor: *mut SignalProcessorHandle) {
    if let Some(handle) = processor.as_mut() {
        handle.processor.clear();
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by csig functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a csig function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn csig_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next csig function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn csig_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn csig_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    fn sample_commits_json() -> CString {
        CString::new(
            r#"[
                {
                    "sha": "a1",
                    "date": "2025-02-10T10:00:00Z",
                    "message": "Add CLI\n\nCo-Authored-By: Claude <noreply@anthropic.com>",
                    "author_name": "Dev",
                    "author_email": "dev@example.com"
                },
                {
                    "sha": "b2",
                    "date": "2025-02-10T10:20:00Z",
                    "message": "Fix typo",
                    "author_name": "Dev",
                    "author_email": "dev@example.com"
                }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ffi_commits_to_report() {
        let json = sample_commits_json();

        unsafe {
            let result = csig_commits_to_report(json.as_ptr());
            assert!(!result.is_null());

            let result_str = CStr::from_ptr(result).to_str().unwrap();
            assert!(result_str.contains("report_version"));
            assert!(result_str.contains("\"claude\""));

            csig_free_string(result);
        }
    }

    #[test]
    fn test_ffi_classify() {
        let message = CString::new("Refactor\n\n🤖 Generated with Claude Code").unwrap();
        let name = CString::new("Dev").unwrap();
        let email = CString::new("dev@example.com").unwrap();
        let ts = CString::new("2025-02-10T10:00:00+01:00").unwrap();

        unsafe {
            let result = csig_classify(message.as_ptr(), name.as_ptr(), email.as_ptr(), ts.as_ptr());
            assert!(!result.is_null());

            let parsed: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(parsed["is_ai_assisted"], true);
            assert_eq!(parsed["agent"], "claude");
            assert_eq!(parsed["confidence"], "medium");

            csig_free_string(result);

            let bad_ts = CString::new("yesterday").unwrap();
            let result =
                csig_classify(message.as_ptr(), name.as_ptr(), email.as_ptr(), bad_ts.as_ptr());
            assert!(result.is_null());
            assert!(!csig_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_processor_lifecycle() {
        unsafe {
            let processor = csig_processor_new(ptr::null());
            assert!(!processor.is_null());

            let json = sample_commits_json();
            assert_eq!(csig_processor_ingest(processor, json.as_ptr()), 2);
            assert_eq!(csig_processor_ingest(processor, json.as_ptr()), 0);

            let report = csig_processor_report(processor);
            assert!(!report.is_null());
            let parsed: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(report).to_str().unwrap()).unwrap();
            assert_eq!(parsed["summary"]["total_commits"], 2);
            assert_eq!(parsed["temporal"]["session_count"], 1);
            csig_free_string(report);

            csig_processor_clear(processor);
            assert_eq!(csig_processor_ingest(processor, json.as_ptr()), 2);

            csig_processor_free(processor);
        }
    }

    #[test]
    fn test_ffi_processor_config() {
        let config = CString::new(r#"{"session_gap_minutes": 10}"#).unwrap();
        let bad_config = CString::new(r#"{"patterns": [{"agent": "cline", "keywords": ["("]}]}"#)
            .unwrap();

        unsafe {
            let processor = csig_processor_new(config.as_ptr());
            assert!(!processor.is_null());

            let json = sample_commits_json();
            csig_processor_ingest(processor, json.as_ptr());
            let report = csig_processor_report(processor);
            let parsed: serde_json::Value =
                serde_json::from_str(CStr::from_ptr(report).to_str().unwrap()).unwrap();
            assert_eq!(parsed["temporal"]["session_count"], 2);
            csig_free_string(report);
            csig_processor_free(processor);

            let rejected = csig_processor_new(bad_config.as_ptr());
            assert!(rejected.is_null());
            assert!(!csig_last_error().is_null());
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        unsafe {
            let invalid_json = CString::new("not json").unwrap();

            let result = csig_commits_to_report(invalid_json.as_ptr());
            assert!(result.is_null());

            let error = csig_last_error();
            assert!(!error.is_null());

            let error_str = CStr::from_ptr(error).to_str().unwrap();
            assert!(!error_str.is_empty());

            assert_eq!(csig_processor_ingest(ptr::null_mut(), invalid_json.as_ptr()), -1);
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = csig_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert!(!version_str.is_empty());
        }
    }
}

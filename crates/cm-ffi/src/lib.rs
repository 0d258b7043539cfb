//! C FFI bindings for cm-core
//!
//! This crate exposes an editing session to a host grid (Qt or another C/C++
//! toolkit). The host forwards its cell-changed and row-appended events and
//! mirrors the writes it gets back.

use cm_core::{Column, EditSession, SessionConfig, TableKind};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;

/// Opaque handle to an editing session
pub struct FfiSession {
    inner: EditSession,
}

/// Borrow a C string as UTF-8, or None if null or invalid
unsafe fn str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    CStr::from_ptr(s).to_str().ok()
}

fn into_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s)
        .map(|s| s.into_raw())
        .unwrap_or(ptr::null_mut())
}

fn open_session(root: &str, model: &str) -> cm_core::Result<EditSession> {
    let scan_result = cm_core::scan_models(&[root])?;
    let package = scan_result.require_model(model)?;
    let loaded = cm_core::load_package(package)?;
    Ok(EditSession::new(loaded.tables, SessionConfig::default()))
}

/// Open an editing session over the model named `model` found under `root`
///
/// # Safety
/// - `root` and `model` must be valid C strings
/// - Returns null on error
#[no_mangle]
pub unsafe extern "C" fn cm_session_open(root: *const c_char, model: *const c_char) -> *mut FfiSession {
    let (Some(root), Some(model)) = (str_arg(root), str_arg(model)) else {
        return ptr::null_mut();
    };

    match open_session(root, model) {
        Ok(session) => Box::into_raw(Box::new(FfiSession { inner: session })),
        Err(_) => ptr::null_mut(),
    }
}

/// Free a session
///
/// # Safety
/// - `session` must be a valid pointer returned by `cm_session_open` or null
#[no_mangle]
pub unsafe extern "C" fn cm_free_session(session: *mut FfiSession) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Forward a cell edit the grid has already displayed
///
/// Returns the outcome as JSON: `{"accepted", "writes", "message"}`.
///
/// # Safety
/// - `session` must be a valid pointer returned by `cm_session_open`
/// - `table`, `column`, `old` and `new` must be valid C strings
/// - Returns null on a contract violation (unknown table, row or column)
/// - Caller must free the returned string with `cm_free_string`
#[no_mangle]
pub unsafe extern "C" fn cm_session_cell_edit(
    session: *mut FfiSession,
    table: *const c_char,
    row: usize,
    column: *const c_char,
    old: *const c_char,
    new: *const c_char,
) -> *mut c_char {
    if session.is_null() {
        return ptr::null_mut();
    }
    let (Some(table), Some(column), Some(old), Some(new)) =
        (str_arg(table), str_arg(column), str_arg(old), str_arg(new))
    else {
        return ptr::null_mut();
    };
    let (Ok(table), Ok(column)) = (table.parse::<TableKind>(), column.parse::<Column>()) else {
        return ptr::null_mut();
    };

    match (*session).inner.on_cell_edit(table, row, column, old, new) {
        Ok(outcome) => match serde_json::to_string(&outcome) {
            Ok(json) => into_c_string(json),
            Err(_) => ptr::null_mut(),
        },
        Err(_) => ptr::null_mut(),
    }
}

/// Forward a row the grid has appended at index `row`
///
/// Returns 0 on success, -1 on error.
///
/// # Safety
/// - `session` must be a valid pointer returned by `cm_session_open`
/// - `table` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn cm_session_row_appended(
    session: *mut FfiSession,
    table: *const c_char,
    row: usize,
) -> c_int {
    if session.is_null() {
        return -1;
    }
    let Some(table) = str_arg(table).and_then(|t| t.parse::<TableKind>().ok()) else {
        return -1;
    };

    match (*session).inner.on_row_appended(table, row) {
        Ok(_) => 0,
        Err(_) => -1,
    }
}

/// Get the row count of a table
///
/// # Safety
/// - `session` must be a valid pointer returned by `cm_session_open`
/// - `table` must be a valid C string
#[no_mangle]
pub unsafe extern "C" fn cm_session_row_count(session: *const FfiSession, table: *const c_char) -> usize {
    if session.is_null() {
        return 0;
    }
    str_arg(table)
        .and_then(|t| t.parse::<TableKind>().ok())
        .map(|t| (*session).inner.tables().row_count(t))
        .unwrap_or(0)
}

/// Get a cell value as the session holds it
///
/// # Safety
/// - `session` must be a valid pointer returned by `cm_session_open`
/// - `table` and `column` must be valid C strings
/// - Returns null if the row or column is out of range
/// - Caller must free the returned string with `cm_free_string`
#[no_mangle]
pub unsafe extern "C" fn cm_session_cell(
    session: *const FfiSession,
    table: *const c_char,
    row: usize,
    column: *const c_char,
) -> *mut c_char {
    if session.is_null() {
        return ptr::null_mut();
    }
    let (Some(table), Some(column)) = (str_arg(table), str_arg(column)) else {
        return ptr::null_mut();
    };
    let (Ok(table), Ok(column)) = (table.parse::<TableKind>(), column.parse::<Column>()) else {
        return ptr::null_mut();
    };

    (*session)
        .inner
        .tables()
        .cell(table, row, column)
        .map(into_c_string)
        .unwrap_or(ptr::null_mut())
}

/// Get the diagnostic of the most recent event, e.g. "Error : Minimum > Maximum."
///
/// # Safety
/// - `session` must be a valid pointer returned by `cm_session_open`
/// - Returns null when the last event produced no diagnostic
/// - Caller must free the returned string with `cm_free_string`
#[no_mangle]
pub unsafe extern "C" fn cm_session_last_message(session: *const FfiSession) -> *mut c_char {
    if session.is_null() {
        return ptr::null_mut();
    }

    (*session)
        .inner
        .last_message()
        .map(|m| into_c_string(m.display_message()))
        .unwrap_or(ptr::null_mut())
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a cm_* function or null
#[no_mangle]
pub unsafe extern "C" fn cm_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

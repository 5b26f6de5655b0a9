// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Response resolution
//!
//! Decides whether an HTTP response is a failure and renders failure
//! lines. Two sources are consulted:
//! - a fixed table of status codes whose meaning does not depend on the
//!   body (403, 412, 413, 500, 501);
//! - the vendor error schema, an `@Message.ExtendedInfo` array found at
//!   `/error/@Message.ExtendedInfo` or `/@Message.ExtendedInfo`.
//!
//! Each extended-info entry is rendered as
//! `[Severity] Message Resolution: Resolution`.

use crate::Error;
use http::StatusCode;
use serde_json::Map;
use serde_json::Value as JsonValue;

/// Message for HTTP 403.
pub const NO_PRIVILEGE: &str =
    "Failure: you do not have the required permissions to perform this operation";
/// Message for HTTP 412.
pub const PRECONDITION_FAILED: &str =
    "Failure: the resource was modified by another request, please try again";
/// Message for HTTP 413.
pub const ENTITY_TOO_LARGE: &str = "Failure: the request entity is too large";
/// Message for HTTP 500.
pub const INTERNAL_SERVICE_ERROR: &str =
    "Failure: the request failed due to an internal service error";
/// Message for HTTP 501.
pub const NOT_SUPPORTED: &str = "Failure: the server did not support the functionality required";

const EXTENDED_INFO_PATHS: [&str; 2] = ["/error/@Message.ExtendedInfo", "/@Message.ExtendedInfo"];
const SEVERITY_OK: &str = "OK";

/// Result of resolving a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Not a failure; continue as success.
    Success,
    /// Failure identified by status code alone.
    StatusFailure(String),
    /// Failure described by extended-info entries.
    VendorFailure(Vec<String>),
}

impl Resolution {
    /// Convert a failed resolution into an [`Error`].
    #[must_use]
    pub fn into_error(self, status: StatusCode) -> Option<Error> {
        match self {
            Self::Success => None,
            Self::StatusFailure(message) => Some(Error::HttpStatus {
                status,
                messages: vec![message],
            }),
            Self::VendorFailure(messages) => Some(Error::Vendor { status, messages }),
        }
    }
}

/// Fixed message for status codes that bypass body parsing.
#[must_use]
pub fn status_message(status: StatusCode) -> Option<&'static str> {
    match status {
        StatusCode::FORBIDDEN => Some(NO_PRIVILEGE),
        StatusCode::PRECONDITION_FAILED => Some(PRECONDITION_FAILED),
        StatusCode::PAYLOAD_TOO_LARGE => Some(ENTITY_TOO_LARGE),
        StatusCode::INTERNAL_SERVER_ERROR => Some(INTERNAL_SERVICE_ERROR),
        StatusCode::NOT_IMPLEMENTED => Some(NOT_SUPPORTED),
        _ => None,
    }
}

/// Resolve a response whose status is not successful.
///
/// # Errors
///
/// Returns [`Error::Internal`] when an extended-info entry lacks
/// severity, message or resolution.
pub fn resolve_failure(status: StatusCode, body: &[u8]) -> Result<Resolution, Error> {
    if let Some(message) = status_message(status) {
        return Ok(Resolution::StatusFailure(message.to_string()));
    }
    let Some(entries) = extended_info(body)? else {
        return Ok(Resolution::StatusFailure(format!(
            "Failure: the request failed with HTTP status {}",
            status.as_u16()
        )));
    };
    if entries.is_empty() || (entries.len() == 1 && severity(&entries[0]) == Some(SEVERITY_OK)) {
        return Ok(Resolution::Success);
    }
    entries
        .iter()
        .map(render)
        .collect::<Result<Vec<_>, _>>()
        .map(Resolution::VendorFailure)
}

/// Resolve a successful response that may still report failed items in
/// its extended info (for example a PATCH of several properties where
/// some were rejected). Entries with `OK` severity are informational.
///
/// # Errors
///
/// Returns [`Error::Internal`] when a non-OK entry lacks severity,
/// message or resolution.
pub fn resolve_partial_failure(body: &[u8]) -> Result<Resolution, Error> {
    let Some(entries) = extended_info(body)? else {
        return Ok(Resolution::Success);
    };
    let failures = entries
        .iter()
        .filter(|entry| severity(entry) != Some(SEVERITY_OK))
        .map(render)
        .collect::<Result<Vec<_>, _>>()?;
    if failures.is_empty() {
        Ok(Resolution::Success)
    } else {
        Ok(Resolution::VendorFailure(failures))
    }
}

/// Resolve any response, choosing the failure or partial-failure path by
/// status class.
///
/// # Errors
///
/// Returns [`Error::Internal`] for an unknown error format.
pub fn resolve(status: StatusCode, body: &[u8]) -> Result<Resolution, Error> {
    if status.is_success() {
        resolve_partial_failure(body)
    } else {
        resolve_failure(status, body)
    }
}

/// Resolve any response: `Ok(())` if it should be treated as success.
///
/// # Errors
///
/// Returns the resolved failure as [`Error::HttpStatus`] or
/// [`Error::Vendor`], or [`Error::Internal`] for an unknown error format.
pub fn check(status: StatusCode, body: &[u8]) -> Result<(), Error> {
    resolve(status, body)?
        .into_error(status)
        .map_or(Ok(()), Err)
}

fn extended_info(body: &[u8]) -> Result<Option<Vec<Map<String, JsonValue>>>, Error> {
    let Ok(doc) = serde_json::from_slice::<JsonValue>(body) else {
        return Ok(None);
    };
    let Some(info) = EXTENDED_INFO_PATHS
        .iter()
        .find_map(|path| doc.pointer(path))
    else {
        return Ok(None);
    };
    let JsonValue::Array(items) = info else {
        return Err(unknown_format());
    };
    items
        .iter()
        .map(|item| item.as_object().cloned().ok_or_else(unknown_format))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn severity(entry: &Map<String, JsonValue>) -> Option<&str> {
    entry
        .get("Severity")
        .or_else(|| entry.get("MessageSeverity"))
        .and_then(JsonValue::as_str)
}

fn render(entry: &Map<String, JsonValue>) -> Result<String, Error> {
    let field = |name: &str| entry.get(name).and_then(JsonValue::as_str);
    match (severity(entry), field("Message"), field("Resolution")) {
        (Some(severity), Some(message), Some(resolution)) => {
            Ok(format!("[{severity}] {message} Resolution: {resolution}"))
        }
        _ => Err(unknown_format()),
    }
}

fn unknown_format() -> Error {
    Error::Internal("unknown error response format".into())
}

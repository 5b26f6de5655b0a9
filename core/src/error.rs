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

//! Error type shared by every layer of the client.
//!
//! Lower layers build the most specific variant they can; upper layers
//! propagate it with `?` and never re-wrap. [`Error::messages`] gives the
//! print-ready lines of the failure envelope.

use crate::mapping::MappingError;
use http::StatusCode;
use serde_json::Error as JsonError;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::time::Duration;

/// Boxed transport error.
pub type TransportError = Box<dyn StdError + Send + Sync + 'static>;

/// Process exit code for success.
pub const EXIT_OK: u8 = 0;
/// Process exit code for failures reported by the BMC.
pub const EXIT_FAILURE: u8 = 1;
/// Process exit code for invalid user input.
pub const EXIT_INVALID_ARGUMENT: u8 = 2;
/// Process exit code for connection failures.
pub const EXIT_TRANSPORT: u8 = 3;
/// Process exit code for internal errors.
pub const EXIT_INTERNAL: u8 = 4;

/// Client errors.
#[derive(Debug)]
pub enum Error {
    /// Connection, TLS or timeout failure of the HTTP layer.
    Transport { url: String, source: TransportError },
    /// Failure identified by HTTP status code.
    HttpStatus {
        status: StatusCode,
        messages: Vec<String>,
    },
    /// Failure described by the `@Message.ExtendedInfo` of the response.
    Vendor {
        status: StatusCode,
        messages: Vec<String>,
    },
    /// Asynchronous task finished in a failed state.
    TaskFailure(Vec<String>),
    /// Asynchronous task did not reach a terminal state in time.
    TaskTimeout { task: String, elapsed: Duration },
    /// Response did not have the shape a mapping table expects.
    Mapping(MappingError),
    /// Response body is not valid JSON.
    BadJson { url: String, source: JsonError },
    /// Programming or unexpected-format error.
    Internal(String),
    /// Invalid user input.
    InvalidArgument(String),
    /// Requested object does not exist on the BMC.
    NotFound(String),
}

impl Error {
    /// Print-ready lines for the failure envelope.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Transport { url, source } => vec![format!(
                "Failure: failed to communicate with the BMC ({url}): {source}"
            )],
            Self::HttpStatus { messages, .. }
            | Self::Vendor { messages, .. }
            | Self::TaskFailure(messages) => messages.clone(),
            Self::TaskTimeout { task, elapsed } => vec![format!(
                "Failure: task {task} did not finish within {} seconds",
                elapsed.as_secs()
            )],
            Self::Mapping(err) => vec![format!("Failure: unexpected response format: {err}")],
            Self::BadJson { url, source } => vec![format!(
                "Failure: the BMC returned malformed JSON for {url}: {source}"
            )],
            Self::Internal(reason) => vec![format!("Failure: {reason}")],
            Self::InvalidArgument(reason) => vec![format!("Error: {reason}")],
            Self::NotFound(what) => vec![format!("Failure: {what} does not exist")],
        }
    }

    /// Whether repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::HttpStatus { status, .. } | Self::Vendor { status, .. } => {
                status.is_server_error() && *status != StatusCode::NOT_IMPLEMENTED
            }
            _ => false,
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::HttpStatus { .. }
            | Self::Vendor { .. }
            | Self::TaskFailure(_)
            | Self::TaskTimeout { .. }
            | Self::NotFound(_) => EXIT_FAILURE,
            Self::InvalidArgument(_) => EXIT_INVALID_ARGUMENT,
            Self::Transport { .. } => EXIT_TRANSPORT,
            Self::Mapping(_) | Self::BadJson { .. } | Self::Internal(_) => EXIT_INTERNAL,
        }
    }
}

impl From<MappingError> for Error {
    fn from(err: MappingError) -> Self {
        Self::Mapping(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport { source, .. } => Some(source.as_ref()),
            Self::BadJson { source, .. } => Some(source),
            Self::Mapping(err) => Some(err),
            _ => None,
        }
    }
}

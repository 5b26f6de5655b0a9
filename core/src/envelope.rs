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

//! `{"State": ..., "Message": [...]}` output document.

use crate::Error;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Generic success sentence for commands without data output.
pub const SUCCESS_MESSAGE: &str = "Success: successfully completed request";

/// Outcome of the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum State {
    Success,
    Failure,
}

/// Document printed once per invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    #[serde(rename = "State")]
    pub state: State,
    #[serde(rename = "Message")]
    pub message: Vec<JsonValue>,
}

impl Envelope {
    /// Success carrying command output as the only message.
    #[must_use]
    pub fn success(data: JsonValue) -> Self {
        Self {
            state: State::Success,
            message: vec![data],
        }
    }

    /// Success carrying a sentence.
    #[must_use]
    pub fn success_message(text: impl Into<String>) -> Self {
        Self::success(JsonValue::String(text.into()))
    }

    /// Failure with one line per message.
    #[must_use]
    pub fn failure(messages: Vec<String>) -> Self {
        Self {
            state: State::Failure,
            message: messages.into_iter().map(JsonValue::String).collect(),
        }
    }

    /// Pretty-printed JSON text.
    #[must_use]
    pub fn to_json_pretty(&self) -> String {
        // Serializing plain strings and JSON values cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_else(|_| {
            String::from(r#"{"State": "Failure", "Message": ["Failure: internal error"]}"#)
        })
    }
}

impl From<&Error> for Envelope {
    fn from(err: &Error) -> Self {
        Self::failure(err.messages())
    }
}

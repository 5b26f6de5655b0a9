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

//! Typed projection of a Redfish `Task` resource.
//!
//! A [`RedfishTask`] is built from a fetched task document and never
//! updated: the poller builds a new one from every response.

use crate::mapping::convert;
use crate::Error;
use crate::ODataId;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

/// Generic line for a failed task that carries no message.
pub const UNKNOWN_TASK_FAILURE: &str = "Failure: the task failed with an unknown error";

/// `TaskState` of a Redfish task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    New,
    Starting,
    Running,
    Suspended,
    Interrupted,
    Pending,
    Stopping,
    Completed,
    Killed,
    Exception,
    Service,
    Cancelling,
    Cancelled,
    /// Vendor `OK` state, reported as finished successfully.
    Ok,
    /// Any value not listed above. Never finished.
    Unknown(String),
}

impl TaskState {
    /// Terminal state: `OK`, `Completed`, `Exception`, `Interrupted` or
    /// `Killed`.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(
            self,
            Self::Ok | Self::Completed | Self::Exception | Self::Interrupted | Self::Killed
        )
    }

    /// Terminal state that means success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Ok | Self::Completed)
    }

    /// State as reported by the BMC.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::Suspended => "Suspended",
            Self::Interrupted => "Interrupted",
            Self::Pending => "Pending",
            Self::Stopping => "Stopping",
            Self::Completed => "Completed",
            Self::Killed => "Killed",
            Self::Exception => "Exception",
            Self::Service => "Service",
            Self::Cancelling => "Cancelling",
            Self::Cancelled => "Cancelled",
            Self::Ok => "OK",
            Self::Unknown(other) => other,
        }
    }
}

impl From<&str> for TaskState {
    fn from(value: &str) -> Self {
        match value {
            "New" => Self::New,
            "Starting" => Self::Starting,
            "Running" => Self::Running,
            "Suspended" => Self::Suspended,
            "Interrupted" => Self::Interrupted,
            "Pending" => Self::Pending,
            "Stopping" => Self::Stopping,
            "Completed" => Self::Completed,
            "Killed" => Self::Killed,
            "Exception" => Self::Exception,
            "Service" => Self::Service,
            "Cancelling" => Self::Cancelling,
            "Cancelled" => Self::Cancelled,
            "OK" => Self::Ok,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl Display for TaskState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.as_str().fmt(f)
    }
}

/// Message attached to a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskMessage {
    #[serde(rename = "MessageId")]
    pub id: Option<String>,
    #[serde(rename = "Message")]
    pub text: Option<String>,
    #[serde(rename = "Severity")]
    pub severity: Option<String>,
    #[serde(rename = "MessageSeverity")]
    pub message_severity: Option<String>,
    #[serde(rename = "Resolution")]
    pub resolution: Option<String>,
}

impl TaskMessage {
    /// `Severity`, falling back to `MessageSeverity`.
    #[must_use]
    pub fn severity(&self) -> Option<&str> {
        self.severity
            .as_deref()
            .or(self.message_severity.as_deref())
    }

    /// `[Severity] Message Resolution: Resolution` when all three are
    /// present, the bare message text otherwise.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match (self.severity(), &self.text, &self.resolution) {
            (Some(severity), Some(text), Some(resolution)) => {
                Some(format!("[{severity}] {text} Resolution: {resolution}"))
            }
            (_, Some(text), _) => Some(text.clone()),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct TaskDocument {
    #[serde(rename = "@odata.id")]
    odata_id: Option<String>,
    #[serde(rename = "Id", default)]
    id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "TaskState")]
    state: Option<String>,
    #[serde(rename = "StartTime")]
    start_time: Option<String>,
    #[serde(rename = "PercentComplete")]
    percent_complete: Option<JsonValue>,
    #[serde(rename = "Messages")]
    messages: Option<Messages>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Messages {
    One(TaskMessage),
    Many(Vec<TaskMessage>),
}

/// Snapshot of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedfishTask {
    pub url: ODataId,
    pub id: String,
    pub name: String,
    pub state: TaskState,
    pub start_time: Option<String>,
    /// Completion percentage without the `%` sign.
    pub percentage: Option<String>,
    pub message: Option<TaskMessage>,
}

impl RedfishTask {
    /// Project a task document. The completion percentage is read from
    /// `/Oem/<oem_name>/TaskPercentage`, falling back to `PercentComplete`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the document has no `@odata.id` or
    /// `TaskState`, or a field has an unexpected type.
    pub fn from_json(task: &JsonValue, oem_name: &str) -> Result<Self, Error> {
        let doc: TaskDocument = serde_path_to_error::deserialize(task)
            .map_err(|err| Error::Internal(format!("unexpected task format: {err}")))?;
        let url = doc
            .odata_id
            .ok_or_else(|| Error::Internal("task has no @odata.id".into()))?;
        let state = doc
            .state
            .ok_or_else(|| Error::Internal(format!("task {url} has no TaskState")))?;
        let oem_percentage = task
            .pointer(&format!("/Oem/{oem_name}/TaskPercentage"))
            .cloned();
        let percentage = oem_percentage
            .filter(|v| !v.is_null())
            .or(doc.percent_complete.filter(|v| !v.is_null()))
            .map(|v| match convert::percentage(v.clone()) {
                Ok(number) => number.to_string(),
                Err(_) => v.as_str().map_or_else(|| v.to_string(), str::to_string),
            });
        let message = doc.messages.and_then(|messages| match messages {
            Messages::One(message) => Some(message),
            Messages::Many(mut list) => list.pop(),
        });
        Ok(Self {
            url: ODataId::from(url),
            id: doc.id,
            name: doc.name,
            state: TaskState::from(state.as_str()),
            start_time: doc.start_time,
            percentage,
            message,
        })
    }

    /// Progress line: percentage if known, the message text otherwise.
    #[must_use]
    pub fn progress_line(&self) -> Option<String> {
        self.percentage
            .as_ref()
            .map(|p| format!("{} Progress: {p}% complete.", self.name))
            .or_else(|| self.message.as_ref().and_then(|m| m.text.clone()))
    }

    /// Failure lines for a task that finished unsuccessfully.
    #[must_use]
    pub fn failure_messages(&self) -> Vec<String> {
        vec![self
            .message
            .as_ref()
            .and_then(TaskMessage::render)
            .unwrap_or_else(|| UNKNOWN_TASK_FAILURE.to_string())]
    }
}

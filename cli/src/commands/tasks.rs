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


//! `gettask`.

use serde_json::Value as JsonValue;
use utool_bmc_http::HttpClient;
use utool_core::mapping::convert;
use utool_core::Envelope;
use utool_core::Error;
use utool_core::MappingError;
use utool_core::Rule;
use utool_core::Transform;
use utool_redfish::Redfish;

const TASKS: &str = "TaskService/Tasks";

const TASK: &[Rule] = &[
    Rule::new("/Id", "Id"),
    Rule::new("/Name", "Name"),
    Rule::new("/TaskState", "State"),
    Rule::new("/StartTime", "StartTime"),
    Rule::new("/Oem/${Oem}/TaskPercentage", "Percentage")
        .transform(Transform::Custom(percentage)),
];

/// Numeric percentage when it parses, the reported value otherwise.
fn percentage(value: &JsonValue) -> Result<Option<JsonValue>, MappingError> {
    Ok(Some(
        convert::percentage(value.clone()).unwrap_or_else(|_| value.clone()),
    ))
}

/// `gettask`: every task known to the task service.
///
/// # Errors
///
/// Returns the first request or mapping failure.
pub async fn get_task<C: HttpClient>(redfish: &Redfish<C>) -> Result<Envelope, Error> {
    let tasks = redfish.get(TASKS).await?;
    let tasks = redfish.get_members(&tasks, TASK).await?;
    Ok(Envelope::success(JsonValue::Array(tasks)))
}

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

use super::MappingError;
use serde_json::Number;
use serde_json::Value as JsonValue;

/// `"45%"`, `"45"` or `45` become the number `45`.
///
/// # Errors
///
/// Returns [`MappingError::UnexpectedValue`] for anything else.
pub fn percentage(value: JsonValue) -> Result<JsonValue, MappingError> {
    match value {
        JsonValue::Number(_) => Ok(value),
        JsonValue::String(ref text) => text
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<u64>()
            .map(JsonValue::from)
            .map_err(|_| unexpected("percentage", value.clone())),
        _ => Err(unexpected("percentage", value)),
    }
}

/// Round a number to two decimal places.
///
/// # Errors
///
/// Returns [`MappingError::UnexpectedValue`] if the value is not a number.
pub fn round2(value: JsonValue) -> Result<JsonValue, MappingError> {
    let Some(number) = value.as_f64() else {
        return Err(unexpected("number", value));
    };
    if value.is_i64() || value.is_u64() {
        return Ok(value);
    }
    Number::from_f64((number * 100.0).round() / 100.0)
        .map(JsonValue::Number)
        .ok_or_else(|| unexpected("finite number", value))
}

/// Convert a MiB capacity into GiB, rounded to two decimal places.
///
/// # Errors
///
/// Returns [`MappingError::UnexpectedValue`] if the value is not a number.
pub fn mib_to_gib(value: JsonValue) -> Result<JsonValue, MappingError> {
    let Some(mib) = value.as_f64() else {
        return Err(unexpected("number", value));
    };
    round2(JsonValue::from(mib / 1024.0))
}

/// Render scalars as strings.
///
/// # Errors
///
/// Returns [`MappingError::UnexpectedValue`] for arrays and objects.
pub fn to_string(value: JsonValue) -> Result<JsonValue, MappingError> {
    match value {
        JsonValue::String(_) => Ok(value),
        JsonValue::Number(n) => Ok(JsonValue::String(n.to_string())),
        JsonValue::Bool(b) => Ok(JsonValue::String(b.to_string())),
        other => Err(unexpected("scalar", other)),
    }
}

fn unexpected(expected: &'static str, value: JsonValue) -> MappingError {
    MappingError::UnexpectedValue { expected, value }
}

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

//! OData identifiers
//!
//! Minimal wrappers for identifiers the client reads from BMC documents:
//! - [`ODataId`]: value of `@odata.id`, the canonical resource path (opaque string)
//! - [`ODataETag`]: value of the `ETag` header or `@odata.etag` (opaque string)
//!
//! Example
//! ```rust
//! use utool_core::ODataId;
//!
//! let root = ODataId::service_root();
//! assert_eq!(root.to_string(), "/redfish/v1");
//! ```

use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// JSON property holding the resource path.
pub const ODATA_ID: &str = "@odata.id";

/// JSON property holding the entity tag.
pub const ODATA_ETAG: &str = "@odata.etag";

/// Type for `@odata.id` identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ODataId(String);

impl ODataId {
    /// Redfish service root id.
    #[must_use]
    pub fn service_root() -> Self {
        Self("/redfish/v1".into())
    }

    /// Read `@odata.id` of a JSON document.
    #[must_use]
    pub fn from_value(v: &JsonValue) -> Option<Self> {
        v.get(ODATA_ID)
            .and_then(JsonValue::as_str)
            .map(|id| Self(id.to_string()))
    }

    /// Last non-empty path segment. For `/redfish/v1/Systems/1` it is `1`.
    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        self.0.rsplit('/').find(|segment| !segment.is_empty())
    }

    /// Path as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ODataId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ODataId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for ODataId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

/// Type for `@odata.etag` identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ODataETag(String);

impl ODataETag {
    /// Read `@odata.etag` of a JSON document.
    #[must_use]
    pub fn from_value(v: &JsonValue) -> Option<Self> {
        v.get(ODATA_ETAG)
            .and_then(JsonValue::as_str)
            .filter(|etag| !etag.is_empty())
            .map(|etag| Self(etag.to_string()))
    }

    /// Tag as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ODataETag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for ODataETag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

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

use url::Url;
use utool_core::Error;
use utool_core::OEM_PLACEHOLDER;
use utool_core::SYSTEM_ID_PLACEHOLDER;

/// Prefix of every Redfish resource path.
pub const REDFISH_PREFIX: &str = "/redfish/v1";

/// Base URL of a Redfish service.
///
/// Resolves the resource templates used by command handlers
/// (`Systems/%s/Storages`, `/redfish/v1/Managers/1`, absolute task URLs)
/// into request URLs.
#[derive(Debug, Clone)]
pub struct RedfishEndpoint {
    base_url: Url,
}

impl RedfishEndpoint {
    /// Create a new `RedfishEndpoint` from a base URL
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Base URL (scheme, host and port).
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `template` into a request URL.
    ///
    /// `%s` is replaced with `system_id` and `${Oem}` with `oem_name`.
    /// Absolute `http(s)://` URLs are used verbatim; other templates get
    /// the `/redfish/v1` prefix unless they already carry it. Query
    /// strings are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the result is not a valid URL.
    pub fn resolve(&self, template: &str, system_id: &str, oem_name: &str) -> Result<Url, Error> {
        let resource = template
            .replace(SYSTEM_ID_PLACEHOLDER, system_id)
            .replace(OEM_PLACEHOLDER, oem_name);
        let invalid = |err: url::ParseError| {
            Error::InvalidArgument(format!("invalid resource URL {resource}: {err}"))
        };
        if resource.starts_with("https://") || resource.starts_with("http://") {
            return Url::parse(&resource).map_err(invalid);
        }
        let path = if resource.starts_with(REDFISH_PREFIX) {
            resource.clone()
        } else {
            format!("{REDFISH_PREFIX}/{}", resource.trim_start_matches('/'))
        };
        self.base_url.join(&path).map_err(invalid)
    }
}

impl From<Url> for RedfishEndpoint {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

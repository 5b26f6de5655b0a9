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

//! Connection context of one invocation.
//!
//! A [`RedfishServer`] starts as a bootstrap context (base URL and
//! credentials only) and becomes final once discovery has learned the
//! system id and the OEM vendor name. The final context is never mutated.

use crate::BmcCredentials;
use url::ParseError;
use url::Url;

/// Connection context: where the BMC is, how to authenticate and what
/// discovery learned about it.
#[derive(Debug, Clone)]
pub struct RedfishServer {
    base_url: Url,
    credentials: BmcCredentials,
    system_id: String,
    oem_name: String,
    quiet: bool,
}

impl RedfishServer {
    /// Context used for the discovery requests. System id and OEM name
    /// are empty until [`RedfishServer::discovered`] is called.
    #[must_use]
    pub const fn bootstrap(base_url: Url, credentials: BmcCredentials, quiet: bool) -> Self {
        Self {
            base_url,
            credentials,
            system_id: String::new(),
            oem_name: String::new(),
            quiet,
        }
    }

    /// Final context with discovered system id and OEM vendor name.
    #[must_use]
    pub fn discovered(self, system_id: String, oem_name: String) -> Self {
        Self {
            system_id,
            oem_name,
            ..self
        }
    }

    /// Build `https://host:port`. IPv6 literals are bracketed and the
    /// default HTTPS port is omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if host is not a valid URL host.
    pub fn base_url_for(host: &str, port: u16) -> Result<Url, ParseError> {
        let host = host.trim();
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_string()
        };
        Url::parse(&format!("https://{host}:{port}"))
    }

    /// Base URL of the BMC (scheme, host and port).
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Credentials for Basic authentication.
    #[must_use]
    pub const fn credentials(&self) -> &BmcCredentials {
        &self.credentials
    }

    /// Discovered system id (empty before discovery).
    #[must_use]
    pub fn system_id(&self) -> &str {
        &self.system_id
    }

    /// Discovered OEM vendor name (empty before discovery).
    #[must_use]
    pub fn oem_name(&self) -> &str {
        &self.oem_name
    }

    /// Suppress progress output.
    #[must_use]
    pub const fn quiet(&self) -> bool {
        self.quiet
    }
}

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


//! Configuration file.
//!
//! Optional TOML file tuning the HTTP transport and the task poller:
//!
//! ```toml
//! [http]
//! connect-timeout = 10
//! timeout = 30
//! upload-timeout = 600
//! verify-certificates = false
//!
//! [task]
//! interval = 1
//! retry-budget = 60
//! deadline = 3600
//! ```
//!
//! All durations are in seconds. A `deadline` of 0 disables it.

use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use utool_bmc_http::reqwest::ClientParams;
use utool_core::Error;
use utool_redfish::PollSettings;

/// Whole configuration file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub http: HttpConfig,
    pub task: TaskConfig,
}

/// `[http]` section.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct HttpConfig {
    pub connect_timeout: u64,
    pub timeout: u64,
    pub upload_timeout: u64,
    pub user_agent: Option<String>,
    pub verify_certificates: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: 10,
            timeout: 30,
            upload_timeout: 600,
            user_agent: None,
            verify_certificates: false,
        }
    }
}

/// `[task]` section.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TaskConfig {
    pub interval: u64,
    pub retry_budget: u32,
    pub deadline: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            interval: 1,
            retry_budget: 60,
            deadline: 3600,
        }
    }
}

impl Config {
    /// Read the configuration from `path`. No path, or a path that does
    /// not exist, gives the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the file cannot be read or is
    /// not a valid configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).map_err(|err| {
                Error::InvalidArgument(format!("configuration file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no configuration file at {}", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(Error::InvalidArgument(format!(
                "cannot read configuration file {}: {err}",
                path.display()
            ))),
        }
    }

    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl HttpConfig {
    /// Transport parameters.
    #[must_use]
    pub fn client_params(&self) -> ClientParams {
        let params = ClientParams::new()
            .connect_timeout(Duration::from_secs(self.connect_timeout))
            .timeout(Duration::from_secs(self.timeout))
            .accept_invalid_certs(!self.verify_certificates);
        match &self.user_agent {
            Some(user_agent) => params.user_agent(user_agent.clone()),
            None => params,
        }
    }

    #[must_use]
    pub const fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout)
    }
}

impl TaskConfig {
    /// Poller parameters.
    #[must_use]
    pub const fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.interval),
            retry_budget: self.retry_budget,
            deadline: if self.deadline == 0 {
                None
            } else {
                Some(Duration::from_secs(self.deadline))
            },
        }
    }
}

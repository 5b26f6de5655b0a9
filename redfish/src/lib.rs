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

//! Redfish client for HUAWEI / xFusion BMCs.
//!
//! ```rust,no_run
//! use utool_bmc_http::reqwest::Client;
//! use utool_core::mapping::Rule;
//! use utool_core::BmcCredentials;
//! use utool_core::RedfishServer;
//! use utool_redfish::connect;
//!
//! const HEALTH: &[Rule] = &[Rule::new("/Status/Health", "Health")];
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let base_url = RedfishServer::base_url_for("192.168.1.100", 443)?;
//! let credentials = BmcCredentials::new("Administrator".into(), "password".into());
//! let redfish = connect(Client::new()?, base_url, credentials, false).await?;
//! let health = redfish.get_mapped("Systems/%s", HEALTH).await?;
//! # Ok(())
//! # }
//! ```

/// Request orchestration.
pub mod bmc;
/// Server discovery.
pub mod service_root;
/// Task polling.
pub mod task;

#[doc(inline)]
pub use bmc::Redfish;
#[doc(inline)]
pub use service_root::connect;
#[doc(inline)]
pub use service_root::discover;
#[doc(inline)]
pub use task::PollSettings;
#[doc(inline)]
pub use task::TaskPoller;

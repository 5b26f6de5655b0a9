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

//! Server discovery.
//!
//! Before any command runs, the client learns two facts about the BMC:
//! the id of the computer system (last segment of the first member of
//! `/redfish/v1/Systems`) and the OEM vendor name (first key of `Oem` in
//! the service root). Both are fixed for the rest of the invocation.

use crate::Redfish;
use serde_json::Value as JsonValue;
use tracing::info;
use url::Url;
use utool_bmc_http::HttpBmc;
use utool_bmc_http::HttpClient;
use utool_core::BmcCredentials;
use utool_core::Error;
use utool_core::ODataId;
use utool_core::RedfishServer;

/// Path of the computer system collection.
pub const SYSTEMS: &str = "/redfish/v1/Systems";

/// Discover the system id and OEM name of the BMC behind `bmc`.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the BMC reports no computer system or no
/// OEM section, and any request failure.
pub async fn discover<C: HttpClient>(bmc: HttpBmc<C>) -> Result<Redfish<C>, Error> {
    let redfish = Redfish::new(bmc);

    let systems = redfish.get(SYSTEMS).await?;
    let system_id = system_id(&systems)?;

    let root = redfish.get(ODataId::service_root().as_str()).await?;
    let oem_name = oem_name(&root)?;

    info!("discovered system {system_id} of {oem_name} BMC");
    Ok(redfish.into_discovered(system_id, oem_name))
}

/// Build a request builder for `base_url` and run discovery.
///
/// # Errors
///
/// See [`discover`].
pub async fn connect<C: HttpClient>(
    client: C,
    base_url: Url,
    credentials: BmcCredentials,
    quiet: bool,
) -> Result<Redfish<C>, Error> {
    let server = RedfishServer::bootstrap(base_url, credentials, quiet);
    discover(HttpBmc::new(client, server)).await
}

fn system_id(systems: &JsonValue) -> Result<String, Error> {
    systems
        .get("Members")
        .and_then(JsonValue::as_array)
        .and_then(|members| members.first())
        .and_then(ODataId::from_value)
        .as_ref()
        .and_then(ODataId::last_segment)
        .map(str::to_string)
        .ok_or_else(|| Error::NotFound("computer system".into()))
}

fn oem_name(root: &JsonValue) -> Result<String, Error> {
    root.get("Oem")
        .and_then(JsonValue::as_object)
        .and_then(|oem| oem.keys().next())
        .cloned()
        .ok_or_else(|| Error::NotFound("OEM vendor information".into()))
}

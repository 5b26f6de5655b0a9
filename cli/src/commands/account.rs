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


//! BMC user accounts.

use clap::Args;
use serde_json::Value as JsonValue;
use tracing::info;
use utool_bmc_http::HttpClient;
use utool_core::envelope::SUCCESS_MESSAGE;
use utool_core::Envelope;
use utool_core::Error;
use utool_core::Rule;
use utool_redfish::Redfish;

const ACCOUNTS: &str = "AccountService/Accounts";

const USER: &[Rule] = &[
    Rule::new("/Id", "Id"),
    Rule::new("/UserName", "UserName"),
    Rule::new("/RoleId", "RoleId"),
    Rule::new("/Locked", "Locked"),
    Rule::new("/Enabled", "Enabled"),
    Rule::new("/Oem/${Oem}/LoginInterface", "LoginInterface"),
];

const USER_LINK: &[Rule] = &[
    Rule::new("/UserName", "UserName"),
    Rule::new("/@odata.id", "Link"),
];

/// `getuser`.
///
/// # Errors
///
/// Returns the first request or mapping failure.
pub async fn get_user<C: HttpClient>(redfish: &Redfish<C>) -> Result<Envelope, Error> {
    let accounts = redfish.get(ACCOUNTS).await?;
    let users = redfish.get_members(&accounts, USER).await?;
    Ok(Envelope::success(JsonValue::Array(users)))
}

#[derive(Args, Debug)]
pub struct DelUserArgs {
    /// Name of the user to delete.
    #[arg(short = 'N', long = "name")]
    pub name: String,
}

/// `deluser`: find the account by user name and delete it.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if no account has that user name, and
/// request failures.
pub async fn del_user<C: HttpClient>(
    redfish: &Redfish<C>,
    args: &DelUserArgs,
) -> Result<Envelope, Error> {
    if args.name.is_empty() {
        return Err(Error::InvalidArgument("user name must not be empty".into()));
    }
    let accounts = redfish.get(ACCOUNTS).await?;
    let users = redfish.get_members(&accounts, USER_LINK).await?;
    let link = users
        .iter()
        .find(|user| user["UserName"] == args.name.as_str())
        .and_then(|user| user["Link"].as_str())
        .ok_or_else(|| Error::NotFound(format!("user {}", args.name)))?;
    info!("deleting account {link}");
    redfish.delete(link).await?;
    Ok(Envelope::success_message(SUCCESS_MESSAGE))
}

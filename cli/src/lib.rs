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


//! `utool` command-line client.
//!
//! One invocation runs one command: parse options, read the optional
//! configuration file, discover the BMC, run the handler and print one
//! `{"State": ..., "Message": [...]}` envelope.

/// Command-line options.
pub mod cli;
/// Command handlers.
pub mod commands;
/// Configuration file.
pub mod config;
/// Log subscriber setup.
pub mod logging;

#[doc(inline)]
pub use cli::Cli;
#[doc(inline)]
pub use config::Config;

use utool_bmc_http::reqwest::Client;
use utool_bmc_http::HttpBmc;
use utool_core::BmcCredentials;
use utool_core::Envelope;
use utool_core::Error;
use utool_core::RedfishServer;
use utool_redfish::discover;

/// Connect to the BMC and run the selected command.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for a bad address, discovery
/// failures and the command's failure.
pub async fn run(cli: &Cli, config: &Config) -> Result<Envelope, Error> {
    let base_url = RedfishServer::base_url_for(&cli.host, cli.port)
        .map_err(|err| Error::InvalidArgument(format!("invalid BMC address {}: {err}", cli.host)))?;
    let client = Client::shared(config.http.client_params())
        .map_err(|err| Error::Internal(format!("cannot initialize HTTP client: {err}")))?;
    let credentials = BmcCredentials::new(cli.username.clone(), cli.password.clone());
    let server = RedfishServer::bootstrap(base_url, credentials, cli.quiet);
    let bmc = HttpBmc::new(client, server).with_upload_timeout(config.http.upload_timeout());
    let redfish = discover(bmc).await?;
    cli.command.run(&redfish, config.task.poll_settings()).await
}

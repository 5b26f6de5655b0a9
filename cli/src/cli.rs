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


//! Command-line options.

use crate::commands::Command;
use clap::Parser;
use std::path::PathBuf;

/// Default HTTPS port of the BMC.
pub const DEFAULT_PORT: u16 = 443;

/// Redfish client for HUAWEI / xFusion server BMCs.
#[derive(Parser, Debug)]
#[command(name = "utool", version)]
#[command(about = "Manage HUAWEI / xFusion servers through the BMC Redfish interface", long_about = None)]
pub struct Cli {
    /// BMC address (host name, IPv4 or IPv6 literal).
    #[clap(short = 'H', long, env = "UTOOL_HOST")]
    pub host: String,

    /// BMC HTTPS port.
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// BMC user name.
    #[clap(short = 'U', long, env = "UTOOL_USERNAME")]
    pub username: String,

    /// BMC password.
    #[clap(short = 'P', long, env = "UTOOL_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Do not print task progress.
    #[clap(short, long)]
    pub quiet: bool,

    /// Log verbosity: once for debug, twice for trace.
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Configuration file.
    #[clap(short, long, env = "UTOOL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr.
    #[clap(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

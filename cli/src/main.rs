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


use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use utool_cli::logging;
use utool_cli::Cli;
use utool_cli::Config;
use utool_core::error::EXIT_OK;
use utool_core::Envelope;
use utool_core::Error;

async fn invoke(cli: &Cli) -> Result<Envelope, Error> {
    logging::init(cli.debug, cli.log_file.as_deref())?;
    let config = Config::load(cli.config.as_deref())?;
    utool_cli::run(cli, &config).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let (envelope, code) = match invoke(&cli).await {
        Ok(envelope) => (envelope, EXIT_OK),
        Err(err) => {
            error!("command failed: {err}");
            (Envelope::from(&err), err.exit_code())
        }
    };
    println!("{}", envelope.to_json_pretty());
    ExitCode::from(code)
}

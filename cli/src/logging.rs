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


//! Log subscriber.
//!
//! Logs go to stderr (or an appended file) so stdout only carries the
//! output envelope and the task progress line.

use std::fs::File;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use utool_core::Error;

/// Filter for `-d` repeated `debug` times. `RUST_LOG` directives apply
/// on top of the default.
///
/// # Errors
///
/// Returns [`Error::Internal`] if a built-in directive does not parse.
pub fn env_filter(debug: u8) -> Result<EnvFilter, Error> {
    let directive = |text: &str| -> Result<Directive, Error> {
        text.parse()
            .map_err(|err| Error::Internal(format!("log directive {text}: {err}")))
    };
    let mut env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
        .add_directive(directive("rustls=warn")?)
        .add_directive(directive("hyper=warn")?)
        .add_directive(directive("hyper_util=warn")?)
        .add_directive(directive("h2=warn")?);
    if debug != 0 {
        env_filter = env_filter.add_directive(
            match debug {
                1 => LevelFilter::DEBUG,
                _ => LevelFilter::TRACE,
            }
            .into(),
        );
    }
    Ok(env_filter)
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the log file cannot be opened
/// and [`Error::Internal`] if a subscriber is already installed.
pub fn init(debug: u8, log_file: Option<&Path>) -> Result<(), Error> {
    let file = log_file.map(open).transpose()?;
    let (stderr_layer, file_layer) = match file {
        Some(file) => (
            None,
            Some(
                fmt::Layer::default()
                    .compact()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            ),
        ),
        None => (
            Some(
                fmt::Layer::default()
                    .compact()
                    .with_writer(std::io::stderr),
            ),
            None,
        ),
    };
    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(env_filter(debug)?)
        .try_init()
        .map_err(|err| Error::Internal(format!("cannot initialize logging: {err}")))
}

fn open(path: &Path) -> Result<File, Error> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| Error::InvalidArgument(format!("log file {}: {err}", path.display())))
}

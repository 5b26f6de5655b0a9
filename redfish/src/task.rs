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

//! Asynchronous task polling.
//!
//! Long-running BMC operations (firmware update, exports) answer with a
//! `Task` resource. [`TaskPoller`] re-fetches it at a fixed interval
//! until it reaches a terminal state:
//!
//! - `OK` / `Completed`: success, the last snapshot is returned;
//! - `Exception` / `Interrupted` / `Killed`: [`Error::TaskFailure`] with
//!   the task message rendered like an HTTP extended-info entry;
//! - any other state: poll again.
//!
//! Transient fetch failures consume a bounded retry budget. A wall-clock
//! deadline bounds tasks that never leave a non-terminal state.

use crate::Redfish;
use serde_json::Value as JsonValue;
use std::io::Write as _;
use std::time::Duration;
use tokio::time::sleep;
use tokio::time::Instant;
use tracing::debug;
use tracing::warn;
use utool_bmc_http::HttpClient;
use utool_core::Error;
use utool_core::RedfishTask;

/// Polling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Pause between two fetches.
    pub interval: Duration,
    /// Transient fetch failures tolerated by `wait_until_finished`.
    pub retry_budget: u32,
    /// Give up on a task still running after this long.
    pub deadline: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            retry_budget: 60,
            deadline: Some(Duration::from_secs(3600)),
        }
    }
}

/// Sink of progress lines.
pub trait Progress {
    /// Show `line`, replacing the previous one.
    fn report(&mut self, line: &str);
    /// Polling is over.
    fn finish(&mut self);
}

/// Progress on stdout, each line overwriting the previous one.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    quiet: bool,
    width: usize,
}

impl ConsoleProgress {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet, width: 0 }
    }

    fn render(&mut self, line: &str) -> String {
        let pad = self.width.saturating_sub(line.chars().count());
        self.width = line.chars().count();
        format!("\r{line}{}", " ".repeat(pad))
    }
}

impl Progress for ConsoleProgress {
    fn report(&mut self, line: &str) {
        if self.quiet {
            return;
        }
        let text = self.render(line);
        let mut stdout = std::io::stdout().lock();
        // Progress is best effort; the final envelope reports the outcome.
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn finish(&mut self) {
        if self.quiet || self.width == 0 {
            return;
        }
        self.width = 0;
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(b"\n");
        let _ = stdout.flush();
    }
}

/// What the poller waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Until {
    Finished,
    Started,
}

/// Classification of one task snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Not terminal yet.
    Polling(RedfishTask),
    /// Finished successfully, or started when waiting for the start.
    Done(RedfishTask),
    /// Finished in a failed state.
    Failed(RedfishTask),
}

impl PollState {
    fn classify(task: RedfishTask, until: Until) -> Self {
        if task.state.is_finished() {
            if task.state.is_success() {
                Self::Done(task)
            } else {
                Self::Failed(task)
            }
        } else if until == Until::Started && task.percentage.is_some() {
            Self::Done(task)
        } else {
            Self::Polling(task)
        }
    }
}

/// Poller of one task at a time.
pub struct TaskPoller<'a, C: HttpClient, P: Progress> {
    redfish: &'a Redfish<C>,
    settings: PollSettings,
    progress: P,
}

impl<'a, C: HttpClient> TaskPoller<'a, C, ConsoleProgress> {
    /// Poller with default settings printing progress to the console
    /// unless the invocation is quiet.
    pub fn new(redfish: &'a Redfish<C>) -> Self {
        let quiet = redfish.server().quiet();
        Self::with_progress(redfish, PollSettings::default(), ConsoleProgress::new(quiet))
    }
}

impl<'a, C: HttpClient, P: Progress> TaskPoller<'a, C, P> {
    pub const fn with_progress(redfish: &'a Redfish<C>, settings: PollSettings, progress: P) -> Self {
        Self {
            redfish,
            settings,
            progress,
        }
    }

    #[must_use]
    pub fn settings(self, settings: PollSettings) -> Self {
        Self { settings, ..self }
    }

    /// Progress sink.
    pub const fn progress(&self) -> &P {
        &self.progress
    }

    /// Poll until the task finishes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskFailure`] if the task failed,
    /// [`Error::TaskTimeout`] when the deadline passes, the last fetch
    /// error once the retry budget is spent, and any non-retryable fetch
    /// error immediately.
    pub async fn wait_until_finished(&mut self, task: &JsonValue) -> Result<RedfishTask, Error> {
        let budget = self.settings.retry_budget;
        self.poll(task, Until::Finished, budget).await
    }

    /// Poll until the task reports a completion percentage or finishes.
    /// Fetch failures are fatal.
    ///
    /// # Errors
    ///
    /// See [`TaskPoller::wait_until_finished`].
    pub async fn wait_until_started(&mut self, task: &JsonValue) -> Result<RedfishTask, Error> {
        self.poll(task, Until::Started, 0).await
    }

    async fn poll(
        &mut self,
        task: &JsonValue,
        until: Until,
        mut budget: u32,
    ) -> Result<RedfishTask, Error> {
        let started = Instant::now();
        let oem_name = self.redfish.server().oem_name();
        let mut snapshot = RedfishTask::from_json(task, oem_name)?;
        loop {
            debug!("task {} is {}", snapshot.url, snapshot.state);
            if let Some(line) = snapshot.progress_line() {
                self.progress.report(&line);
            }
            let task = match PollState::classify(snapshot, until) {
                PollState::Done(task) => {
                    self.progress.finish();
                    return Ok(task);
                }
                PollState::Failed(task) => {
                    self.progress.finish();
                    return Err(Error::TaskFailure(task.failure_messages()));
                }
                PollState::Polling(task) => task,
            };
            let elapsed = started.elapsed();
            if self.settings.deadline.is_some_and(|deadline| elapsed >= deadline) {
                self.progress.finish();
                return Err(Error::TaskTimeout {
                    task: task.url.to_string(),
                    elapsed,
                });
            }
            sleep(self.settings.interval).await;
            let doc = loop {
                match self.redfish.get(task.url.as_str()).await {
                    Ok(doc) => break doc,
                    Err(err) if err.is_retryable() && budget > 0 => {
                        budget -= 1;
                        warn!("fetching task {} failed, {budget} retries left: {err}", task.url);
                        sleep(self.settings.interval).await;
                    }
                    Err(err) => {
                        self.progress.finish();
                        return Err(err);
                    }
                }
            };
            snapshot = RedfishTask::from_json(&doc, oem_name)?;
        }
    }
}

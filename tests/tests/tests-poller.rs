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


use http::Method;
use http::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::test;
use utool_core::Error;
use utool_core::TaskState;
use utool_redfish::PollSettings;
use utool_redfish::TaskPoller;
use utool_tests::base::failed_task;
use utool_tests::base::task;
use utool_tests::base::TASK;
use utool_tests::redfish;
use utool_tests::Bmc;
use utool_tests::Expect;
use utool_tests::RecordingProgress;
use utool_tests::TestError;

fn settings(retry_budget: u32, deadline: Option<Duration>) -> PollSettings {
    PollSettings {
        interval: Duration::from_secs(1),
        retry_budget,
        deadline,
    }
}

// Running -> Running -> Completed takes exactly two fetches.
#[test(start_paused = true)]
async fn converges_on_completion() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get(TASK, task("Running", Some("60%"))));
    bmc.expect(Expect::get(TASK, task("Completed", Some("100%"))));
    let redfish = redfish(&bmc);
    let mut poller =
        TaskPoller::with_progress(&redfish, PollSettings::default(), RecordingProgress::default());

    let done = poller
        .wait_until_finished(&task("Running", Some("10%")))
        .await?;
    assert_eq!(done.state, TaskState::Completed);
    assert_eq!(bmc.count(&Method::GET), 2);
    assert_eq!(
        poller.progress().lines,
        vec![
            "Upgrade Task Progress: 10% complete.",
            "Upgrade Task Progress: 60% complete.",
            "Upgrade Task Progress: 100% complete.",
        ]
    );
    assert_eq!(poller.progress().finished, 1);
    Ok(())
}

#[test(start_paused = true)]
async fn failed_task_reports_message() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get(
        TASK,
        failed_task("The image file is invalid.", "Upload a valid image."),
    ));
    let redfish = redfish(&bmc);
    let mut poller =
        TaskPoller::with_progress(&redfish, PollSettings::default(), RecordingProgress::default());
    let err = poller
        .wait_until_finished(&task("Running", Some("5%")))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TaskFailure(_)));
    assert_eq!(
        err.messages(),
        vec!["[Warning] The image file is invalid. Resolution: Upload a valid image.".to_string()]
    );
    assert!(!err.is_retryable());
}

// A task already finished is never fetched.
#[test(start_paused = true)]
async fn finished_task_is_not_fetched() {
    let bmc = Arc::new(Bmc::default());
    let redfish = redfish(&bmc);
    let mut poller =
        TaskPoller::with_progress(&redfish, PollSettings::default(), RecordingProgress::default());
    let err = poller
        .wait_until_finished(&task("Killed", None))
        .await
        .unwrap_err();
    assert_eq!(
        err.messages(),
        vec![utool_core::task::UNKNOWN_TASK_FAILURE.to_string()]
    );
    assert!(bmc.requests().is_empty());
}

#[test(start_paused = true)]
async fn transient_failures_are_retried() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::failure(Method::GET, TASK, TestError("reset")));
    bmc.expect(Expect::respond(
        Method::GET,
        TASK,
        StatusCode::SERVICE_UNAVAILABLE,
        "",
    ));
    bmc.expect(Expect::get(TASK, task("Completed", None)));
    let redfish = redfish(&bmc);
    let mut poller =
        TaskPoller::with_progress(&redfish, settings(2, None), RecordingProgress::default());
    poller.wait_until_finished(&task("Running", None)).await?;
    assert_eq!(bmc.count(&Method::GET), 3);
    Ok(())
}

// With a budget of 2 the third consecutive failure is returned.
#[test(start_paused = true)]
async fn retry_budget_exhaustion() {
    let bmc = Arc::new(Bmc::default());
    for _ in 0..3 {
        bmc.expect(Expect::failure(Method::GET, TASK, TestError("timeout")));
    }
    bmc.expect(Expect::get(TASK, task("Completed", None)));
    let redfish = redfish(&bmc);
    let mut poller =
        TaskPoller::with_progress(&redfish, settings(2, None), RecordingProgress::default());
    let err = poller
        .wait_until_finished(&task("Running", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert_eq!(bmc.count(&Method::GET), 3);
    assert_eq!(bmc.remaining(), 1);
    assert_eq!(poller.progress().finished, 1);
}

#[test(start_paused = true)]
async fn non_retryable_failure_is_fatal() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::respond(Method::GET, TASK, StatusCode::NOT_FOUND, ""));
    bmc.expect(Expect::get(TASK, task("Completed", None)));
    let redfish = redfish(&bmc);
    let mut poller =
        TaskPoller::with_progress(&redfish, settings(10, None), RecordingProgress::default());
    let err = poller
        .wait_until_finished(&task("Running", None))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status, .. } if status == StatusCode::NOT_FOUND));
    assert_eq!(bmc.count(&Method::GET), 1);
}

#[test(start_paused = true)]
async fn deadline_stops_stuck_task() {
    let bmc = Arc::new(Bmc::default());
    for _ in 0..5 {
        bmc.expect(Expect::get(TASK, task("Running", Some("50%"))));
    }
    let redfish = redfish(&bmc);
    let mut poller = TaskPoller::with_progress(
        &redfish,
        settings(60, Some(Duration::from_secs(3))),
        RecordingProgress::default(),
    );
    let err = poller
        .wait_until_finished(&task("Running", Some("50%")))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TaskTimeout { .. }));
    assert_eq!(bmc.count(&Method::GET), 3);
    assert_eq!(err.exit_code(), 1);
}

// Waiting for the start returns as soon as a percentage shows up.
#[test(start_paused = true)]
async fn wait_until_started() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get(TASK, task("Starting", None)));
    bmc.expect(Expect::get(TASK, task("Running", Some("1%"))));
    bmc.expect(Expect::get(TASK, task("Completed", None)));
    let redfish = redfish(&bmc);
    let mut poller =
        TaskPoller::with_progress(&redfish, PollSettings::default(), RecordingProgress::default());
    let started = poller.wait_until_started(&task("New", None)).await?;
    assert_eq!(started.state, TaskState::Running);
    assert_eq!(started.percentage.as_deref(), Some("1"));
    assert_eq!(bmc.count(&Method::GET), 2);
    Ok(())
}

#[test(start_paused = true)]
async fn wait_until_started_has_no_retries() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::failure(Method::GET, TASK, TestError("reset")));
    let redfish = redfish(&bmc);
    let mut poller =
        TaskPoller::with_progress(&redfish, PollSettings::default(), RecordingProgress::default());
    let err = poller
        .wait_until_started(&task("Starting", None))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(bmc.count(&Method::GET), 1);
}

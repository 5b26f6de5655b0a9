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
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::test;
use utool_cli::commands::account::DelUserArgs;
use utool_cli::commands::firmware::FwUpdateArgs;
use utool_cli::commands::firmware::ATTEMPTS;
use utool_cli::commands::system::BootDevice;
use utool_cli::commands::system::BootDeviceArgs;
use utool_cli::commands::system::BootEffective;
use utool_cli::commands::system::PowerControlArgs;
use utool_cli::commands::system::ResetType;
use utool_cli::commands::Command;
use utool_core::envelope::SUCCESS_MESSAGE;
use utool_core::Envelope;
use utool_core::Error;
use utool_core::State;
use utool_redfish::PollSettings;
use utool_tests::base::collection;
use utool_tests::base::failed_task;
use utool_tests::base::task;
use utool_tests::base::SYSTEM;
use utool_tests::base::TASK;
use utool_tests::redfish;
use utool_tests::Bmc;
use utool_tests::Expect;
use utool_tests::TestError;
use utool_tests::ODATA_ID;
use utool_tests::UPLOAD_TIMEOUT;

const ACCOUNTS: &str = "/redfish/v1/AccountService/Accounts";
const SIMPLE_UPDATE: &str = "/redfish/v1/UpdateService/Actions/UpdateService.SimpleUpdate";

async fn run(bmc: &Arc<Bmc>, command: Command) -> Result<Envelope, Error> {
    let settings = PollSettings {
        interval: Duration::from_secs(1),
        retry_budget: 0,
        deadline: None,
    };
    command.run(&redfish(bmc), settings).await
}

fn success(envelope: &Envelope) -> &serde_json::Value {
    assert_eq!(envelope.state, State::Success);
    assert_eq!(envelope.message.len(), 1);
    &envelope.message[0]
}

#[test]
async fn getproduct() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get(
        SYSTEM,
        json!({
            ODATA_ID: SYSTEM,
            "Model": "2288H V5",
            "Manufacturer": "Huawei",
            "SerialNumber": "2102311TYBN0J3000293",
            "UUID": "877AA970-58F9-8432-E811-80345C184638",
            "HostName": "node-17",
            "AssetTag": "rack-3",
            "PowerState": "On",
            "IndicatorLED": "Off",
            "Status": { "State": "Enabled", "Health": "OK" },
            "Oem": { "Huawei": { "DeviceOwnerID": "owner", "DeviceSlotID": "1" } },
        }),
    ));
    let envelope = run(&bmc, Command::GetProduct).await?;
    assert_eq!(
        success(&envelope),
        &json!({
            "ProductName": "2288H V5",
            "Manufacturer": "Huawei",
            "SerialNumber": "2102311TYBN0J3000293",
            "UUID": "877AA970-58F9-8432-E811-80345C184638",
            "HostName": "node-17",
            "AssetTag": "rack-3",
            "DeviceOwnerID": "owner",
            "DeviceSlotID": "1",
            "PowerState": "On",
            "UIDLight": "Off",
            "Health": "OK",
        })
    );
    Ok(())
}

#[test]
async fn gethealth() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get(
        SYSTEM,
        json!({
            "Status": { "Health": "OK", "HealthRollup": "Critical" },
            "ProcessorSummary": { "Status": { "HealthRollup": "OK" } },
            "MemorySummary": { "Status": { "HealthRollup": "Critical" } },
        }),
    ));
    let envelope = run(&bmc, Command::GetHealth).await?;
    assert_eq!(
        success(&envelope),
        &json!({ "System": "Critical", "Processor": "OK", "Memory": "Critical" })
    );
    Ok(())
}

#[test]
async fn getraid_walks_raid_storages() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get(
        "/redfish/v1/Systems/1/Storages",
        collection(
            "/redfish/v1/Systems/1/Storages",
            &[
                "/redfish/v1/Systems/1/Storages/RAIDStorage0",
                "/redfish/v1/Systems/1/Storages/1",
            ],
        ),
    ));
    bmc.expect(Expect::get(
        "/redfish/v1/Systems/1/Storages/RAIDStorage0",
        json!({
            "Id": "RAIDStorage0",
            "Name": "RAIDStorage0",
            "Drives": [{ ODATA_ID: "/redfish/v1/Chassis/1/Drives/HDDPlaneDisk0" }],
            "StorageControllers": [{
                "MemberId": "0",
                "Name": "RAID Card1 Controller",
                "Manufacturer": "LSI",
                "Model": "SAS3108",
                "FirmwareVersion": "4.660.00-8140",
                "SupportedRAIDTypes": ["RAID0", "RAID1", "RAID5"],
                "Oem": { "Huawei": { "Mode": "RAID", "MemorySizeMiB": 1024 } },
                "Status": { "Health": "OK" },
            }],
        }),
    ));
    let envelope = run(&bmc, Command::GetRaid).await?;
    assert_eq!(
        success(&envelope),
        &json!([{
            "Id": "RAIDStorage0",
            "Name": "RAIDStorage0",
            "DriveCount": 1,
            "Controllers": [{
                "MemberId": "0",
                "Name": "RAID Card1 Controller",
                "Manufacturer": "LSI",
                "Model": "SAS3108",
                "FirmwareVersion": "4.660.00-8140",
                "SupportedRAIDLevels": ["RAID0", "RAID1", "RAID5"],
                "Mode": "RAID",
                "CacheGiB": 1.0,
                "Health": "OK",
            }],
        }])
    );
    assert_eq!(bmc.count(&Method::GET), 2);
    Ok(())
}

#[test]
async fn getpsu() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get(
        "/redfish/v1/Chassis/1/Power",
        json!({
            "PowerControl": [{ "PowerConsumedWatts": 180 }],
            "PowerSupplies": [
                {
                    "MemberId": "0",
                    "Name": "PS1",
                    "PowerSupplyType": "AC",
                    "PowerCapacityWatts": 900,
                    "LineInputVoltage": 221.5,
                    "PowerOutputWatts": 85.25,
                    "Status": { "State": "Enabled", "Health": "OK" },
                },
                { "MemberId": "1", "Name": "PS2", "Status": { "State": "Absent" } },
            ],
        }),
    ));
    let envelope = run(&bmc, Command::GetPsu).await?;
    let output = success(&envelope);
    assert_eq!(output["PowerConsumedWatts"], 180);
    assert_eq!(output["PowerSupplies"].as_array().map(Vec::len), Some(1));
    assert_eq!(output["PowerSupplies"][0]["OutputPowerWatts"], json!(85.25));
    assert_eq!(output["PowerSupplies"][0]["Type"], "AC");
    Ok(())
}

#[test]
async fn getuser() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    let member = format!("{ACCOUNTS}/2");
    bmc.expect(Expect::get(ACCOUNTS, collection(ACCOUNTS, &[member.as_str()])));
    bmc.expect(Expect::get(
        &member,
        json!({
            "Id": "2",
            "UserName": "Administrator",
            "RoleId": "Administrator",
            "Locked": false,
            "Enabled": true,
            "Oem": { "Huawei": { "LoginInterface": ["Web", "SSH", "Redfish"] } },
        }),
    ));
    let envelope = run(&bmc, Command::GetUser).await?;
    assert_eq!(
        success(&envelope),
        &json!([{
            "Id": "2",
            "UserName": "Administrator",
            "RoleId": "Administrator",
            "Locked": false,
            "Enabled": true,
            "LoginInterface": ["Web", "SSH", "Redfish"],
        }])
    );
    Ok(())
}

#[test]
async fn gettask_reads_oem_percentage() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get(
        "/redfish/v1/TaskService/Tasks",
        collection("/redfish/v1/TaskService/Tasks", &[TASK]),
    ));
    bmc.expect(Expect::get(TASK, task("Running", Some("35%"))));
    let envelope = run(&bmc, Command::GetTask).await?;
    assert_eq!(
        success(&envelope),
        &json!([{
            "Id": "1",
            "Name": "Upgrade Task",
            "State": "Running",
            "StartTime": "2024-03-01T10:00:00+08:00",
            "Percentage": 35,
        }])
    );
    Ok(())
}

#[test]
async fn powercontrol() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::post(
        "/redfish/v1/Systems/1/Actions/ComputerSystem.Reset",
        json!({ "ResetType": "ForceRestart" }),
        json!({}),
    ));
    let envelope = run(
        &bmc,
        Command::PowerControl(PowerControlArgs {
            reset_type: ResetType::ForceRestart,
        }),
    )
    .await?;
    assert_eq!(success(&envelope), SUCCESS_MESSAGE);
    Ok(())
}

#[test]
async fn setbootdevice_uses_etag() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get_with_etag(SYSTEM, "W/\"0a1b\"", json!({ ODATA_ID: SYSTEM })));
    bmc.expect(Expect::patch(
        SYSTEM,
        json!({ "Boot": { "BootSourceOverrideTarget": "Cd", "BootSourceOverrideEnabled": "Once" } }),
        json!({}),
    ));
    let envelope = run(
        &bmc,
        Command::SetBootDevice(BootDeviceArgs {
            device: BootDevice::Cd,
            effective: BootEffective::Once,
            mode: None,
        }),
    )
    .await?;
    assert_eq!(envelope.state, State::Success);
    assert_eq!(bmc.requests()[1].if_match.as_deref(), Some("W/\"0a1b\""));
    Ok(())
}

#[test]
async fn deluser_deletes_matching_account() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    let members = [format!("{ACCOUNTS}/2"), format!("{ACCOUNTS}/3")];
    let links: Vec<&str> = members.iter().map(String::as_str).collect();
    bmc.expect(Expect::get(ACCOUNTS, collection(ACCOUNTS, &links)));
    bmc.expect(Expect::get(
        &members[0],
        json!({ ODATA_ID: members[0], "UserName": "Administrator" }),
    ));
    bmc.expect(Expect::get(
        &members[1],
        json!({ ODATA_ID: members[1], "UserName": "operator" }),
    ));
    bmc.expect(Expect::delete(&members[1]));
    let envelope = run(
        &bmc,
        Command::DelUser(DelUserArgs {
            name: "operator".into(),
        }),
    )
    .await?;
    assert_eq!(success(&envelope), SUCCESS_MESSAGE);
    assert_eq!(bmc.remaining(), 0);
    Ok(())
}

#[test]
async fn deluser_unknown_user() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get(ACCOUNTS, collection(ACCOUNTS, &[])));
    let err = run(
        &bmc,
        Command::DelUser(DelUserArgs {
            name: "ghost".into(),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.messages(), vec!["Failure: user ghost does not exist".to_string()]);
    assert_eq!(Envelope::from(&err).state, State::Failure);
    assert_eq!(bmc.count(&Method::DELETE), 0);
}

fn fwupdate() -> Command {
    Command::FwUpdate(FwUpdateArgs {
        image_uri: "sftp://root:pw@10.0.0.2/cpldimage.hpm".into(),
        protocol: None,
    })
}

fn update_body() -> serde_json::Value {
    json!({ "ImageURI": "sftp://root:pw@10.0.0.2/cpldimage.hpm", "TransferProtocol": "SFTP" })
}

#[test(start_paused = true)]
async fn fwupdate_polls_to_completion() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::post(SIMPLE_UPDATE, update_body(), task("Running", Some("0%"))));
    bmc.expect(Expect::get(TASK, task("Running", Some("70%"))));
    bmc.expect(Expect::get(TASK, task("Completed", Some("100%"))));
    let envelope = run(&bmc, fwupdate()).await?;
    assert_eq!(success(&envelope), SUCCESS_MESSAGE);
    assert_eq!(bmc.remaining(), 0);
    let requests = bmc.requests();
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].timeout, Some(UPLOAD_TIMEOUT));
    assert!(requests[1..].iter().all(|r| r.timeout.is_none()));
    Ok(())
}

// A transport failure while polling restarts the whole cycle.
#[test(start_paused = true)]
async fn fwupdate_retries_whole_cycle() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::post(SIMPLE_UPDATE, update_body(), task("Running", Some("0%"))));
    bmc.expect(Expect::failure(Method::GET, TASK, TestError("BMC rebooting")));
    bmc.expect(Expect::post(SIMPLE_UPDATE, update_body(), task("Running", Some("0%"))));
    bmc.expect(Expect::get(TASK, task("Completed", Some("100%"))));
    run(&bmc, fwupdate()).await?;
    assert_eq!(bmc.count(&Method::POST), 2);
    Ok(())
}

#[test(start_paused = true)]
async fn fwupdate_gives_up_after_attempts() {
    let bmc = Arc::new(Bmc::default());
    for _ in 0..ATTEMPTS {
        bmc.expect(Expect::respond(
            Method::POST,
            SIMPLE_UPDATE,
            StatusCode::SERVICE_UNAVAILABLE,
            "",
        ));
    }
    let err = run(&bmc, fwupdate()).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(bmc.count(&Method::POST), ATTEMPTS as usize);
    assert_eq!(bmc.remaining(), 0);
}

// Task failures are final.
#[test(start_paused = true)]
async fn fwupdate_task_failure_is_not_retried() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::post(SIMPLE_UPDATE, update_body(), task("Running", Some("0%"))));
    bmc.expect(Expect::get(
        TASK,
        failed_task("The image file is invalid.", "Upload a valid image."),
    ));
    let err = run(&bmc, fwupdate()).await.unwrap_err();
    assert!(matches!(err, Error::TaskFailure(_)));
    assert_eq!(bmc.count(&Method::POST), 1);
}

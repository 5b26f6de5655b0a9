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
use tokio::test;
use utool_core::resolver::NO_PRIVILEGE;
use utool_core::Error;
use utool_core::Rule;
use utool_tests::base::collection;
use utool_tests::base::SYSTEM;
use utool_tests::redfish;
use utool_tests::Bmc;
use utool_tests::Expect;
use utool_tests::TestError;
use utool_tests::ODATA_ID;

const DRIVE: &[Rule] = &[
    Rule::new("/Id", "Id"),
    Rule::new("/CapacityBytes", "Capacity"),
];

// 403 is resolved from the status alone, whatever the body says.
#[test]
async fn forbidden_is_fixed_message() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::respond(
        Method::GET,
        SYSTEM,
        StatusCode::FORBIDDEN,
        r#"{"error": {"@Message.ExtendedInfo": [{"Severity": "OK", "Message": "m", "Resolution": "r"}]}}"#,
    ));
    let err = redfish(&bmc).get("Systems/%s").await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status, .. } if status == StatusCode::FORBIDDEN));
    assert_eq!(err.messages(), vec![NO_PRIVILEGE.to_string()]);
    assert_eq!(err.exit_code(), 1);
}

// A single OK entry on a 4xx response is a success.
#[test]
async fn single_ok_entry_is_success() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    let body = json!({ "error": { "@Message.ExtendedInfo": [{
        "MessageId": "Base.1.0.Success",
        "Severity": "OK",
        "Message": "Successfully Completed Request",
        "Resolution": "None",
    }] } });
    bmc.expect(Expect::respond(
        Method::POST,
        "/redfish/v1/Systems/1/Actions/ComputerSystem.Reset",
        StatusCode::BAD_REQUEST,
        &body.to_string(),
    ));
    let response = redfish(&bmc)
        .post(
            "Systems/%s/Actions/ComputerSystem.Reset",
            &json!({ "ResetType": "On" }),
        )
        .await?;
    assert_eq!(response, body);
    assert_eq!(bmc.requests()[0].timeout, None);
    Ok(())
}

// Every failed entry becomes one message line.
#[test]
async fn vendor_failure_lists_entries() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::respond(
        Method::POST,
        "/redfish/v1/AccountService/Accounts",
        StatusCode::BAD_REQUEST,
        r#"{"error": {"@Message.ExtendedInfo": [
            {"Severity": "Warning", "Message": "The user name already exists.", "Resolution": "Choose another name."},
            {"Severity": "Critical", "Message": "The password is too simple.", "Resolution": "Use a complex password."}
        ]}}"#,
    ));
    let err = redfish(&bmc)
        .post("AccountService/Accounts", &json!({ "UserName": "root" }))
        .await
        .unwrap_err();
    assert_eq!(
        err.messages(),
        vec![
            "[Warning] The user name already exists. Resolution: Choose another name.".to_string(),
            "[Critical] The password is too simple. Resolution: Use a complex password.".to_string(),
        ]
    );
}

// 200 with failed items in the extended info is a failure.
#[test]
async fn partial_failure_on_success_status() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get(
        SYSTEM,
        json!({
            ODATA_ID: SYSTEM,
            "@Message.ExtendedInfo": [
                { "Severity": "OK", "Message": "AssetTag set.", "Resolution": "None" },
                { "Severity": "Warning", "Message": "HostName rejected.", "Resolution": "Check the value." },
            ],
        }),
    ));
    let err = redfish(&bmc).get("Systems/%s").await.unwrap_err();
    assert!(matches!(err, Error::Vendor { status, .. } if status == StatusCode::OK));
    assert_eq!(
        err.messages(),
        vec!["[Warning] HostName rejected. Resolution: Check the value.".to_string()]
    );
}

#[test]
async fn generic_status_failure() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::respond(
        Method::GET,
        "/redfish/v1/Chassis/9",
        StatusCode::NOT_FOUND,
        "",
    ));
    let err = redfish(&bmc).get("Chassis/9").await.unwrap_err();
    assert_eq!(
        err.messages(),
        vec!["Failure: the request failed with HTTP status 404".to_string()]
    );
    assert!(!err.is_retryable());
}

#[test]
async fn malformed_extended_info_is_internal() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::respond(
        Method::GET,
        SYSTEM,
        StatusCode::BAD_REQUEST,
        r#"{"error": {"@Message.ExtendedInfo": [{"Severity": "Warning", "Message": "no resolution"}]}}"#,
    ));
    let err = redfish(&bmc).get("Systems/%s").await.unwrap_err();
    assert!(matches!(err, Error::Internal(_)));
}

#[test]
async fn transport_failure_is_retryable() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::failure(Method::GET, SYSTEM, TestError("connection reset")));
    let err = redfish(&bmc).get("Systems/%s").await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert!(err.is_retryable());
    assert_eq!(err.exit_code(), 3);
}

#[test]
async fn mapped_get() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect::get(
        SYSTEM,
        json!({
            "Status": { "Health": "Warning" },
            "Oem": { "Huawei": { "BootupSequence": ["Hdd", "Cd", "Pxe", "Others"] } },
        }),
    ));
    const RULES: &[Rule] = &[
        Rule::new("/Status/Health", "Health"),
        Rule::new("/Oem/${Oem}/BootupSequence/0", "FirstBootDevice"),
    ];
    let output = redfish(&bmc).get_mapped("Systems/%s", RULES).await?;
    assert_eq!(
        serde_json::Value::Object(output),
        json!({ "Health": "Warning", "FirstBootDevice": "Hdd" })
    );
    Ok(())
}

// Members are fetched in order and mapped one by one.
#[test]
async fn members_in_order() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    let drives = collection(
        "/redfish/v1/Chassis/1/Drives",
        &[
            "/redfish/v1/Chassis/1/Drives/HDDPlaneDisk0",
            "/redfish/v1/Chassis/1/Drives/HDDPlaneDisk1",
        ],
    );
    bmc.expect(Expect::get(
        "/redfish/v1/Chassis/1/Drives/HDDPlaneDisk0",
        json!({ "Id": "HDDPlaneDisk0", "CapacityBytes": 1_200_000_000_000_u64 }),
    ));
    bmc.expect(Expect::get(
        "/redfish/v1/Chassis/1/Drives/HDDPlaneDisk1",
        json!({ "Id": "HDDPlaneDisk1" }),
    ));
    let members = redfish(&bmc).get_members(&drives, DRIVE).await?;
    assert_eq!(
        members,
        vec![
            json!({ "Id": "HDDPlaneDisk0", "Capacity": 1_200_000_000_000_u64 }),
            json!({ "Id": "HDDPlaneDisk1", "Capacity": null }),
        ]
    );
    assert_eq!(bmc.remaining(), 0);
    Ok(())
}

// A failing member aborts the walk; later members are never requested.
#[test]
async fn members_abort_on_first_failure() {
    let bmc = Arc::new(Bmc::default());
    let links = json!([
        { ODATA_ID: "/redfish/v1/Chassis/1/Drives/HDDPlaneDisk0" },
        { ODATA_ID: "/redfish/v1/Chassis/1/Drives/HDDPlaneDisk1" },
        { ODATA_ID: "/redfish/v1/Chassis/1/Drives/HDDPlaneDisk2" },
    ]);
    bmc.expect(Expect::get(
        "/redfish/v1/Chassis/1/Drives/HDDPlaneDisk0",
        json!({ "Id": "HDDPlaneDisk0" }),
    ));
    bmc.expect(Expect::respond(
        Method::GET,
        "/redfish/v1/Chassis/1/Drives/HDDPlaneDisk1",
        StatusCode::INTERNAL_SERVER_ERROR,
        "",
    ));
    bmc.expect(Expect::get(
        "/redfish/v1/Chassis/1/Drives/HDDPlaneDisk2",
        json!({ "Id": "HDDPlaneDisk2" }),
    ));
    let err = redfish(&bmc).get_members(&links, DRIVE).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(bmc.count(&Method::GET), 2);
    assert_eq!(bmc.remaining(), 1);
}

#[test]
async fn empty_collection() -> Result<(), Error> {
    let bmc = Arc::new(Bmc::default());
    let members = redfish(&bmc)
        .get_members(&collection("/redfish/v1/Chassis/1/Drives", &[]), DRIVE)
        .await?;
    assert!(members.is_empty());
    assert!(bmc.requests().is_empty());
    Ok(())
}

#[test]
async fn non_json_body() {
    let bmc = Arc::new(Bmc::default());
    bmc.expect(Expect {
        request: utool_bmc_mock::ExpectedRequest {
            method: Method::GET,
            uri: SYSTEM.into(),
            body: None,
        },
        response: Ok(utool_bmc_http::RawResponse::new(
            StatusCode::OK,
            b"<html>maintenance</html>".to_vec(),
        )),
    });
    let err = redfish(&bmc).get("Systems/%s").await.unwrap_err();
    assert!(matches!(err, Error::BadJson { .. }));
    assert_eq!(err.exit_code(), 4);
}

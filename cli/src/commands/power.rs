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


//! `getpsu`.

use serde_json::Value as JsonValue;
use utool_bmc_http::HttpClient;
use utool_core::mapping::convert;
use utool_core::Envelope;
use utool_core::Error;
use utool_core::Rule;
use utool_core::Transform;
use utool_redfish::Redfish;

const POWER: &str = "Chassis/1/Power";

const POWER_RULES: &[Rule] = &[
    Rule::new("/PowerControl/0/PowerConsumedWatts", "PowerConsumedWatts")
        .transform(Transform::Convert(convert::round2)),
    Rule::new("/PowerSupplies", "PowerSupplies")
        .nested(SUPPLY)
        .filter(present),
];

const SUPPLY: &[Rule] = &[
    Rule::new("/MemberId", "Id"),
    Rule::new("/Name", "Name"),
    Rule::new("/Manufacturer", "Manufacturer"),
    Rule::new("/Model", "Model"),
    Rule::new("/SerialNumber", "SerialNumber"),
    Rule::new("/FirmwareVersion", "FirmwareVersion"),
    Rule::new("/PowerSupplyType", "Type"),
    Rule::new("/PowerCapacityWatts", "RatedPowerWatts"),
    Rule::new("/LineInputVoltage", "InputVoltage").transform(Transform::Convert(convert::round2)),
    Rule::new("/PowerOutputWatts", "OutputPowerWatts")
        .transform(Transform::Convert(convert::round2)),
    Rule::new("/Status/Health", "Health"),
];

fn present(supply: &JsonValue) -> bool {
    supply.pointer("/Status/State").and_then(JsonValue::as_str) != Some("Absent")
}

/// `getpsu`: power consumption and every installed power supply.
///
/// # Errors
///
/// Returns request and mapping failures.
pub async fn get_psu<C: HttpClient>(redfish: &Redfish<C>) -> Result<Envelope, Error> {
    let power = redfish.get_mapped(POWER, POWER_RULES).await?;
    Ok(Envelope::success(JsonValue::Object(power)))
}

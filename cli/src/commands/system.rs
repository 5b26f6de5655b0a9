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


//! Computer system commands: product information, health, power and
//! boot override.

use clap::Args;
use clap::ValueEnum;
use serde_json::json;
use serde_json::Value as JsonValue;
use utool_bmc_http::HttpClient;
use utool_core::envelope::SUCCESS_MESSAGE;
use utool_core::Envelope;
use utool_core::Error;
use utool_core::MappingError;
use utool_core::Rule;
use utool_core::Transform;
use utool_redfish::Redfish;

const SYSTEM: &str = "Systems/%s";
const RESET: &str = "Systems/%s/Actions/ComputerSystem.Reset";

const UID_LIGHT: &[(&str, &str)] = &[("Lit", "On")];

const PRODUCT: &[Rule] = &[
    Rule::new("/Model", "ProductName"),
    Rule::new("/Manufacturer", "Manufacturer"),
    Rule::new("/SerialNumber", "SerialNumber"),
    Rule::new("/UUID", "UUID"),
    Rule::new("/HostName", "HostName"),
    Rule::new("/AssetTag", "AssetTag"),
    Rule::new("/Oem/${Oem}/DeviceOwnerID", "DeviceOwnerID"),
    Rule::new("/Oem/${Oem}/DeviceSlotID", "DeviceSlotID"),
    Rule::new("/PowerState", "PowerState"),
    Rule::new("/IndicatorLED", "UIDLight").transform(Transform::Rename(UID_LIGHT)),
    Rule::new("/Status/Health", "Health"),
];

const HEALTH: &[Rule] = &[
    Rule::new("", "System")
        .root()
        .transform(Transform::Custom(overall_health)),
    Rule::new("/ProcessorSummary/Status/HealthRollup", "Processor"),
    Rule::new("/MemorySummary/Status/HealthRollup", "Memory"),
];

/// Worse of the system's own health and its rollup.
fn overall_health(system: &JsonValue) -> Result<Option<JsonValue>, MappingError> {
    let mut worst: Option<(u8, &JsonValue)> = None;
    for path in ["/Status/Health", "/Status/HealthRollup"] {
        let Some(health) = system.pointer(path).filter(|v| !v.is_null()) else {
            continue;
        };
        let rank = match health.as_str() {
            Some("OK") => 0,
            Some("Warning") => 1,
            Some("Critical") => 2,
            _ => {
                return Err(MappingError::UnexpectedValue {
                    expected: "OK, Warning or Critical",
                    value: health.clone(),
                })
            }
        };
        if worst.map_or(true, |(worst, _)| rank > worst) {
            worst = Some((rank, health));
        }
    }
    Ok(Some(worst.map_or(JsonValue::Null, |(_, health)| health.clone())))
}

/// `getproduct`.
///
/// # Errors
///
/// Returns request and mapping failures.
pub async fn get_product<C: HttpClient>(redfish: &Redfish<C>) -> Result<Envelope, Error> {
    let product = redfish.get_mapped(SYSTEM, PRODUCT).await?;
    Ok(Envelope::success(JsonValue::Object(product)))
}

/// `gethealth`.
///
/// # Errors
///
/// Returns request and mapping failures.
pub async fn get_health<C: HttpClient>(redfish: &Redfish<C>) -> Result<Envelope, Error> {
    let health = redfish.get_mapped(SYSTEM, HEALTH).await?;
    Ok(Envelope::success(JsonValue::Object(health)))
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetType {
    #[value(name = "On")]
    On,
    #[value(name = "ForceOff")]
    ForceOff,
    #[value(name = "GracefulShutdown")]
    GracefulShutdown,
    #[value(name = "ForceRestart")]
    ForceRestart,
    #[value(name = "Nmi")]
    Nmi,
    #[value(name = "ForcePowerCycle")]
    ForcePowerCycle,
}

impl ResetType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "On",
            Self::ForceOff => "ForceOff",
            Self::GracefulShutdown => "GracefulShutdown",
            Self::ForceRestart => "ForceRestart",
            Self::Nmi => "Nmi",
            Self::ForcePowerCycle => "ForcePowerCycle",
        }
    }
}

#[derive(Args, Debug)]
pub struct PowerControlArgs {
    /// Power action.
    #[arg(short = 'T', long = "type", value_enum)]
    pub reset_type: ResetType,
}

/// `powercontrol`.
///
/// # Errors
///
/// Returns the request failure.
pub async fn power_control<C: HttpClient>(
    redfish: &Redfish<C>,
    args: &PowerControlArgs,
) -> Result<Envelope, Error> {
    redfish
        .post(RESET, &json!({ "ResetType": args.reset_type.as_str() }))
        .await?;
    Ok(Envelope::success_message(SUCCESS_MESSAGE))
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootDevice {
    #[value(name = "None")]
    None,
    #[value(name = "Pxe")]
    Pxe,
    #[value(name = "Hdd")]
    Hdd,
    #[value(name = "Cd")]
    Cd,
    #[value(name = "BiosSetup")]
    BiosSetup,
    #[value(name = "Floppy")]
    Floppy,
}

impl BootDevice {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Pxe => "Pxe",
            Self::Hdd => "Hdd",
            Self::Cd => "Cd",
            Self::BiosSetup => "BiosSetup",
            Self::Floppy => "Floppy",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootEffective {
    #[value(name = "Once")]
    Once,
    #[value(name = "Continuous")]
    Continuous,
    #[value(name = "Disabled")]
    Disabled,
}

impl BootEffective {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Once => "Once",
            Self::Continuous => "Continuous",
            Self::Disabled => "Disabled",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootMode {
    #[value(name = "Legacy")]
    Legacy,
    #[value(name = "UEFI")]
    Uefi,
}

impl BootMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "Legacy",
            Self::Uefi => "UEFI",
        }
    }
}

#[derive(Args, Debug)]
pub struct BootDeviceArgs {
    /// Boot device.
    #[arg(short = 'D', long, value_enum)]
    pub device: BootDevice,
    /// How long the override stays in effect.
    #[arg(short = 'E', long, value_enum, default_value_t = BootEffective::Once)]
    pub effective: BootEffective,
    /// Boot mode; unchanged when omitted.
    #[arg(short = 'M', long, value_enum)]
    pub mode: Option<BootMode>,
}

impl BootDeviceArgs {
    /// `PATCH` body of the computer system.
    #[must_use]
    pub fn request_body(&self) -> JsonValue {
        let mut boot = json!({
            "BootSourceOverrideTarget": self.device.as_str(),
            "BootSourceOverrideEnabled": self.effective.as_str(),
        });
        if let Some(mode) = self.mode {
            boot["BootSourceOverrideMode"] = mode.as_str().into();
        }
        json!({ "Boot": boot })
    }
}

/// `setbootdevice`. The system resource is fetched first for its `ETag`.
///
/// # Errors
///
/// Returns the failure of the `ETag` fetch or of the update.
pub async fn set_boot_device<C: HttpClient>(
    redfish: &Redfish<C>,
    args: &BootDeviceArgs,
) -> Result<Envelope, Error> {
    redfish.patch(SYSTEM, &args.request_body()).await?;
    Ok(Envelope::success_message(SUCCESS_MESSAGE))
}

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


//! `getraid`.

use serde_json::json;
use serde_json::Value as JsonValue;
use utool_bmc_http::HttpClient;
use utool_core::mapping::convert;
use utool_core::Envelope;
use utool_core::Error;
use utool_core::MappingError;
use utool_core::Rule;
use utool_core::Transform;
use utool_redfish::bmc::member_links;
use utool_redfish::Redfish;

const STORAGES: &str = "Systems/%s/Storages";

/// Storage resources backed by a RAID controller.
const RAID_PREFIX: &str = "RAIDStorage";

const STORAGE: &[Rule] = &[
    Rule::new("/Id", "Id"),
    Rule::new("/Name", "Name"),
    Rule::new("/Drives", "DriveCount").transform(Transform::Custom(count)),
    Rule::new("/StorageControllers", "Controllers").nested(CONTROLLER),
];

const CONTROLLER: &[Rule] = &[
    Rule::new("/MemberId", "MemberId"),
    Rule::new("/Name", "Name"),
    Rule::new("/Manufacturer", "Manufacturer"),
    Rule::new("/Model", "Model"),
    Rule::new("/FirmwareVersion", "FirmwareVersion"),
    Rule::new("/SupportedRAIDTypes", "SupportedRAIDLevels"),
    Rule::new("/Oem/${Oem}/Mode", "Mode"),
    Rule::new("/Oem/${Oem}/MemorySizeMiB", "CacheGiB")
        .transform(Transform::Convert(convert::mib_to_gib)),
    Rule::new("/Status/Health", "Health"),
];

fn count(links: &JsonValue) -> Result<Option<JsonValue>, MappingError> {
    match links {
        JsonValue::Null => Ok(Some(0.into())),
        JsonValue::Array(links) => Ok(Some(links.len().into())),
        other => Err(MappingError::UnexpectedValue {
            expected: "array",
            value: other.clone(),
        }),
    }
}

/// `getraid`: every RAID storage with its controllers.
///
/// # Errors
///
/// Returns the first request or mapping failure.
pub async fn get_raid<C: HttpClient>(redfish: &Redfish<C>) -> Result<Envelope, Error> {
    let collection = redfish.get(STORAGES).await?;
    let raid = member_links(&collection)?
        .into_iter()
        .filter(|link| {
            link.last_segment()
                .is_some_and(|id| id.starts_with(RAID_PREFIX))
        })
        .map(|link| json!({ "@odata.id": link.as_str() }))
        .collect();
    let storages = redfish
        .get_members(&JsonValue::Array(raid), STORAGE)
        .await?;
    Ok(Envelope::success(JsonValue::Array(storages)))
}

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


//! Command handlers.
//!
//! Each handler is a short composition of Redfish calls and a static
//! mapping table, generic over the transport so it runs the same against
//! a real BMC and the mock.

pub mod account;
pub mod firmware;
pub mod power;
pub mod storage;
pub mod system;
pub mod tasks;

use clap::Subcommand;
use utool_bmc_http::HttpClient;
use utool_core::Envelope;
use utool_core::Error;
use utool_redfish::PollSettings;
use utool_redfish::Redfish;

/// Supported commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query product information of the server.
    #[command(name = "getproduct")]
    GetProduct,
    /// Query the overall health of the server.
    #[command(name = "gethealth")]
    GetHealth,
    /// Query RAID controllers.
    #[command(name = "getraid")]
    GetRaid,
    /// Query power supplies.
    #[command(name = "getpsu")]
    GetPsu,
    /// Query BMC user accounts.
    #[command(name = "getuser")]
    GetUser,
    /// Query BMC tasks.
    #[command(name = "gettask")]
    GetTask,
    /// Power the system on or off, or reset it.
    #[command(name = "powercontrol")]
    PowerControl(system::PowerControlArgs),
    /// Set the boot source override.
    #[command(name = "setbootdevice")]
    SetBootDevice(system::BootDeviceArgs),
    /// Delete a BMC user account.
    #[command(name = "deluser")]
    DelUser(account::DelUserArgs),
    /// Update firmware from an image URI and wait for the task to finish.
    #[command(name = "fwupdate")]
    FwUpdate(firmware::FwUpdateArgs),
}

impl Command {
    /// Run the command against a discovered BMC.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the command.
    pub async fn run<C: HttpClient>(
        &self,
        redfish: &Redfish<C>,
        settings: PollSettings,
    ) -> Result<Envelope, Error> {
        match self {
            Self::GetProduct => system::get_product(redfish).await,
            Self::GetHealth => system::get_health(redfish).await,
            Self::GetRaid => storage::get_raid(redfish).await,
            Self::GetPsu => power::get_psu(redfish).await,
            Self::GetUser => account::get_user(redfish).await,
            Self::GetTask => tasks::get_task(redfish).await,
            Self::PowerControl(args) => system::power_control(redfish, args).await,
            Self::SetBootDevice(args) => system::set_boot_device(redfish, args).await,
            Self::DelUser(args) => account::del_user(redfish, args).await,
            Self::FwUpdate(args) => firmware::update(redfish, args, settings).await,
        }
    }
}

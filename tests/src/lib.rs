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


//! This is tests support lib.


#[doc(inline)]
pub use error::TestError;

/// Used in tests for `@odata.id` fields.
pub const ODATA_ID: &str = "@odata.id";

/// Base URL of the mocked BMC.
pub const BASE_URL: &str = "https://bmc.test";
/// System id reported by the mocked BMC.
pub const SYSTEM_ID: &str = "1";
/// OEM vendor name reported by the mocked BMC.
pub const OEM: &str = "Huawei";
/// Upload timeout of the request builder talking to the mocked BMC.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(600);

use std::sync::Arc;
use std::time::Duration;
use url::Url;
use utool_bmc_http::HttpBmc;
use utool_bmc_mock::Bmc as MockBmc;
use utool_bmc_mock::Expect as MockExpect;
use utool_core::BmcCredentials;
use utool_core::RedfishServer;
use utool_redfish::task::Progress;
use utool_redfish::Redfish;

pub type Bmc = MockBmc<TestError>;
pub type Expect = MockExpect<TestError>;

/// Pre-discovery context of the mocked BMC.
pub fn server() -> RedfishServer {
    let base_url = Url::parse(BASE_URL).expect("valid url");
    let credentials = BmcCredentials::new("Administrator".into(), "Admin@9000".into());
    RedfishServer::bootstrap(base_url, credentials, true)
}

/// Request builder talking to `bmc`, not discovered yet.
pub fn http_bmc(bmc: &Arc<Bmc>) -> HttpBmc<Arc<Bmc>> {
    HttpBmc::new(bmc.clone(), server()).with_upload_timeout(UPLOAD_TIMEOUT)
}

/// Redfish client of `bmc` as if discovery found system `1` of a
/// HUAWEI BMC.
pub fn redfish(bmc: &Arc<Bmc>) -> Redfish<Arc<Bmc>> {
    Redfish::new(http_bmc(bmc)).into_discovered(SYSTEM_ID.into(), OEM.into())
}

/// Progress sink remembering every line.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub lines: Vec<String>,
    pub finished: usize,
}

impl Progress for RecordingProgress {
    fn report(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn finish(&mut self) {
        self.finished += 1;
    }
}

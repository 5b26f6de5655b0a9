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

//! Transport-independent building blocks of the utool Redfish client.
//!
//! - [`RedfishServer`]: immutable per-invocation connection context.
//! - [`Error`]: the error sum type shared by every layer.
//! - [`Envelope`]: the `{State, Message}` document printed to the user.
//! - [`resolver`]: decides whether an HTTP response is a failure.
//! - [`mapping`]: declarative source-path to target-key projection.
//! - [`task`]: typed projection of a Redfish `Task` resource.

/// BMC credentials.
pub mod credentials;
/// Output envelope.
pub mod envelope;
/// Error type.
pub mod error;
/// Declarative mapping engine.
pub mod mapping;
/// Types for `@odata.id` and `@odata.etag`.
pub mod odata;
/// HTTP response resolution.
pub mod resolver;
/// Connection context.
pub mod server;
/// Redfish task projection.
pub mod task;

#[doc(inline)]
pub use credentials::BmcCredentials;
#[doc(inline)]
pub use envelope::Envelope;
#[doc(inline)]
pub use envelope::State;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use mapping::Mapper;
#[doc(inline)]
pub use mapping::MappingError;
#[doc(inline)]
pub use mapping::Rule;
#[doc(inline)]
pub use mapping::Transform;
#[doc(inline)]
pub use odata::ODataETag;
#[doc(inline)]
pub use odata::ODataId;
#[doc(inline)]
pub use server::RedfishServer;
#[doc(inline)]
pub use task::RedfishTask;
#[doc(inline)]
pub use task::TaskState;

/// Placeholder substituted with the discovered OEM vendor name.
pub const OEM_PLACEHOLDER: &str = "${Oem}";

/// Placeholder substituted with the discovered system id.
pub const SYSTEM_ID_PLACEHOLDER: &str = "%s";

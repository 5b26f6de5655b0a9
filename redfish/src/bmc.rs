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

//! Request orchestration on top of the HTTP request builder.
//!
//! Every call sends one request, resolves the response and parses the
//! body, so handlers only ever see success JSON or an [`Error`].

use http::HeaderMap;
use serde_json::Value as JsonValue;
use tracing::debug;
use utool_bmc_http::HttpBmc;
use utool_bmc_http::HttpClient;
use utool_bmc_http::RawResponse;
use utool_core::mapping::JsonObject;
use utool_core::resolver;
use utool_core::Error;
use utool_core::Mapper;
use utool_core::ODataId;
use utool_core::RedfishServer;
use utool_core::Rule;

/// Redfish client of one BMC.
pub struct Redfish<C: HttpClient> {
    bmc: HttpBmc<C>,
}

impl<C: HttpClient> Redfish<C> {
    pub const fn new(bmc: HttpBmc<C>) -> Self {
        Self { bmc }
    }

    /// Connection context.
    pub const fn server(&self) -> &RedfishServer {
        self.bmc.server()
    }

    /// Mapper substituting the discovered OEM vendor name.
    pub fn mapper(&self) -> Mapper<'_> {
        Mapper::new(self.server().oem_name())
    }

    /// Replace the bootstrap context with the discovered one.
    #[must_use]
    pub fn into_discovered(self, system_id: String, oem_name: String) -> Self {
        Self {
            bmc: self.bmc.into_discovered(system_id, oem_name),
        }
    }

    /// `GET` a resource.
    ///
    /// # Errors
    ///
    /// Returns transport errors, resolved HTTP failures and
    /// [`Error::BadJson`] for a non-JSON body.
    pub async fn get(&self, template: &str) -> Result<JsonValue, Error> {
        let response = self.bmc.get(template).await?;
        Self::process(template, &response)
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// See [`Redfish::get`].
    pub async fn post(&self, template: &str, body: &JsonValue) -> Result<JsonValue, Error> {
        let response = self.bmc.post(template, body).await?;
        Self::process(template, &response)
    }

    /// `POST` with the upload timeout.
    ///
    /// # Errors
    ///
    /// See [`Redfish::get`].
    pub async fn post_upload(&self, template: &str, body: &JsonValue) -> Result<JsonValue, Error> {
        let response = self.bmc.post_upload(template, body).await?;
        Self::process(template, &response)
    }

    /// `PATCH` a resource, fetching its `ETag` first.
    ///
    /// # Errors
    ///
    /// See [`Redfish::get`].
    pub async fn patch(&self, template: &str, body: &JsonValue) -> Result<JsonValue, Error> {
        self.patch_with_headers(template, body, HeaderMap::new())
            .await
    }

    /// `PATCH` a resource with extra headers. An `If-Match` header among
    /// them suppresses the `ETag` fetch.
    ///
    /// # Errors
    ///
    /// See [`Redfish::get`].
    pub async fn patch_with_headers(
        &self,
        template: &str,
        body: &JsonValue,
        headers: HeaderMap,
    ) -> Result<JsonValue, Error> {
        let response = self.bmc.patch(template, body, headers).await?;
        Self::process(template, &response)
    }

    /// `PUT` a resource, fetching its `ETag` first.
    ///
    /// # Errors
    ///
    /// See [`Redfish::get`].
    pub async fn put(&self, template: &str, body: &JsonValue) -> Result<JsonValue, Error> {
        let response = self.bmc.put(template, body, HeaderMap::new()).await?;
        Self::process(template, &response)
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// See [`Redfish::get`].
    pub async fn delete(&self, template: &str) -> Result<JsonValue, Error> {
        let response = self.bmc.delete(template).await?;
        Self::process(template, &response)
    }

    /// `GET` a resource and map it with `rules`.
    ///
    /// # Errors
    ///
    /// See [`Redfish::get`]; mapping failures are [`Error::Mapping`].
    pub async fn get_mapped(&self, template: &str, rules: &[Rule]) -> Result<JsonObject, Error> {
        let mut target = JsonObject::new();
        self.get_into(template, &mut target, rules).await?;
        Ok(target)
    }

    /// `GET` a resource and map it into `target`.
    ///
    /// # Errors
    ///
    /// See [`Redfish::get_mapped`].
    pub async fn get_into(
        &self,
        template: &str,
        target: &mut JsonObject,
        rules: &[Rule],
    ) -> Result<(), Error> {
        let source = self.get(template).await?;
        Ok(self.mapper().map_into(&source, target, rules)?)
    }

    /// Fetch every member of a collection and map each with `rules`.
    ///
    /// `collection` is either a collection document (object with
    /// `Members`) or a bare array of `{"@odata.id": ...}` links. Members
    /// are fetched one by one, in order; the first failure aborts the
    /// whole operation.
    ///
    /// # Errors
    ///
    /// Returns the first fetch or mapping failure, or [`Error::Internal`]
    /// for a malformed link list.
    pub async fn get_members(
        &self,
        collection: &JsonValue,
        rules: &[Rule],
    ) -> Result<Vec<JsonValue>, Error> {
        let links = member_links(collection)?;
        let mut members = Vec::with_capacity(links.len());
        for link in links {
            let member = self.get(link.as_str()).await?;
            members.push(JsonValue::Object(self.mapper().map(&member, rules)?));
        }
        Ok(members)
    }

    fn process(template: &str, response: &RawResponse) -> Result<JsonValue, Error> {
        resolver::check(response.status, &response.body)?;
        response.json().map_err(|source| {
            debug!("{template}: body is not JSON: {source}");
            Error::BadJson {
                url: template.to_string(),
                source,
            }
        })
    }
}

/// `@odata.id` of every member of a collection document or link array.
///
/// # Errors
///
/// Returns [`Error::Internal`] if there is no member array or a member
/// has no `@odata.id`.
pub fn member_links(collection: &JsonValue) -> Result<Vec<ODataId>, Error> {
    let links = match collection {
        JsonValue::Array(links) => links,
        JsonValue::Object(doc) => match doc.get("Members") {
            Some(JsonValue::Array(links)) => links,
            None | Some(JsonValue::Null) => return Ok(Vec::new()),
            Some(_) => return Err(Error::Internal("collection Members is not an array".into())),
        },
        _ => return Err(Error::Internal("collection is neither an object nor an array".into())),
    };
    links
        .iter()
        .map(|link| {
            ODataId::from_value(link)
                .ok_or_else(|| Error::Internal("collection member has no @odata.id".into()))
        })
        .collect()
}

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

//! HTTP request builder.
//!
//! [`HttpBmc`] turns resource templates into authenticated JSON requests
//! executed by an [`HttpClient`]. Conditional updates (`PATCH`/`PUT`)
//! fetch the resource `ETag` first unless the caller supplied `If-Match`.

pub mod endpoint;

#[cfg(feature = "reqwest")]
pub mod reqwest;

use http::header;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::StatusCode;
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing::info;
use tracing::warn;
use url::Url;
use utool_core::resolver;
use utool_core::BmcCredentials;
use utool_core::Error;
use utool_core::ODataETag;
use utool_core::RedfishServer;

#[doc(inline)]
pub use endpoint::RedfishEndpoint;

const APPLICATION_JSON: &str = "application/json";

/// One HTTP request.
#[derive(Debug)]
pub struct Request<'a> {
    pub method: Method,
    pub url: Url,
    pub credentials: &'a BmcCredentials,
    pub headers: HeaderMap,
    pub body: Option<&'a JsonValue>,
    /// Overrides the client total timeout.
    pub timeout: Option<Duration>,
}

/// Response as received, before any interpretation.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: StatusCode,
    pub etag: Option<ODataETag>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Response with status and body only.
    #[must_use]
    pub fn new(status: StatusCode, body: Vec<u8>) -> Self {
        Self {
            status,
            content_length: u64::try_from(body.len()).ok(),
            body,
            ..Self::default()
        }
    }

    /// Set the `ETag` header value.
    #[must_use]
    pub fn with_etag(self, etag: ODataETag) -> Self {
        Self {
            etag: Some(etag),
            ..self
        }
    }

    /// Body as JSON. An empty body is `null`.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the body is not JSON.
    pub fn json(&self) -> Result<JsonValue, serde_json::Error> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            Ok(JsonValue::Null)
        } else {
            serde_json::from_slice(&self.body)
        }
    }

    /// `ETag` header, falling back to `@odata.etag` of the body.
    #[must_use]
    pub fn etag_or_body(&self) -> Option<ODataETag> {
        self.etag.clone().or_else(|| {
            self.json()
                .ok()
                .as_ref()
                .and_then(ODataETag::from_value)
        })
    }
}

/// Transport executing HTTP requests.
pub trait HttpClient: Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    /// Execute one request and return the response whatever its status.
    fn execute(
        &self,
        request: Request<'_>,
    ) -> impl Future<Output = Result<RawResponse, Self::Error>> + Send;
}

impl<T: HttpClient> HttpClient for Arc<T> {
    type Error = T::Error;

    fn execute(
        &self,
        request: Request<'_>,
    ) -> impl Future<Output = Result<RawResponse, Self::Error>> + Send {
        self.as_ref().execute(request)
    }
}

/// HTTP request builder bound to one BMC.
///
/// # Examples
///
/// ```rust,no_run
/// use utool_bmc_http::HttpBmc;
/// use utool_bmc_http::reqwest::Client;
/// use utool_core::BmcCredentials;
/// use utool_core::RedfishServer;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let base_url = RedfishServer::base_url_for("192.168.1.100", 443)?;
/// let credentials = BmcCredentials::new("admin".to_string(), "password".to_string());
/// let server = RedfishServer::bootstrap(base_url, credentials, false);
/// let bmc = HttpBmc::new(Client::new()?, server);
/// let root = bmc.get("/").await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpBmc<C: HttpClient> {
    client: C,
    endpoint: RedfishEndpoint,
    server: RedfishServer,
    custom_headers: HeaderMap,
    upload_timeout: Option<Duration>,
}

impl<C: HttpClient> HttpBmc<C> {
    /// Create a request builder for `server`.
    pub fn new(client: C, server: RedfishServer) -> Self {
        Self::with_custom_headers(client, server, HeaderMap::new())
    }

    /// Create a request builder adding `custom_headers` to every request.
    pub fn with_custom_headers(client: C, server: RedfishServer, custom_headers: HeaderMap) -> Self {
        Self {
            client,
            endpoint: RedfishEndpoint::new(server.base_url().clone()),
            server,
            custom_headers,
            upload_timeout: None,
        }
    }

    /// Total timeout for [`HttpBmc::post_upload`].
    #[must_use]
    pub fn with_upload_timeout(self, upload_timeout: Duration) -> Self {
        Self {
            upload_timeout: Some(upload_timeout),
            ..self
        }
    }

    /// Connection context.
    pub const fn server(&self) -> &RedfishServer {
        &self.server
    }

    /// Replace the bootstrap context with the discovered one.
    #[must_use]
    pub fn into_discovered(self, system_id: String, oem_name: String) -> Self {
        Self {
            server: self.server.discovered(system_id, oem_name),
            ..self
        }
    }

    /// Request URL for a resource template.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an invalid URL.
    pub fn resolve(&self, template: &str) -> Result<Url, Error> {
        self.endpoint
            .resolve(template, self.server.system_id(), self.server.oem_name())
    }

    /// `GET` a resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if no response was received.
    pub async fn get(&self, template: &str) -> Result<RawResponse, Error> {
        let url = self.resolve(template)?;
        self.send(Method::GET, url, HeaderMap::new(), None, None).await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if no response was received.
    pub async fn post(&self, template: &str, body: &JsonValue) -> Result<RawResponse, Error> {
        let url = self.resolve(template)?;
        self.send(Method::POST, url, HeaderMap::new(), Some(body), None)
            .await
    }

    /// `POST` with the upload timeout, for requests that make the BMC
    /// transfer large files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if no response was received.
    pub async fn post_upload(&self, template: &str, body: &JsonValue) -> Result<RawResponse, Error> {
        let url = self.resolve(template)?;
        self.send(
            Method::POST,
            url,
            HeaderMap::new(),
            Some(body),
            self.upload_timeout,
        )
        .await
    }

    /// `PATCH` a resource. Without an `If-Match` header in `headers` the
    /// resource is fetched first and its `ETag` is used.
    ///
    /// # Errors
    ///
    /// Returns the resolved failure of the `ETag` fetch, or
    /// [`Error::Transport`] if no response was received.
    pub async fn patch(
        &self,
        template: &str,
        body: &JsonValue,
        headers: HeaderMap,
    ) -> Result<RawResponse, Error> {
        self.conditional(Method::PATCH, template, body, headers)
            .await
    }

    /// `PUT` a resource, with the same `If-Match` handling as
    /// [`HttpBmc::patch`].
    ///
    /// # Errors
    ///
    /// Returns the resolved failure of the `ETag` fetch, or
    /// [`Error::Transport`] if no response was received.
    pub async fn put(
        &self,
        template: &str,
        body: &JsonValue,
        headers: HeaderMap,
    ) -> Result<RawResponse, Error> {
        self.conditional(Method::PUT, template, body, headers).await
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if no response was received.
    pub async fn delete(&self, template: &str) -> Result<RawResponse, Error> {
        let url = self.resolve(template)?;
        self.send(Method::DELETE, url, HeaderMap::new(), None, None)
            .await
    }

    async fn conditional(
        &self,
        method: Method,
        template: &str,
        body: &JsonValue,
        mut headers: HeaderMap,
    ) -> Result<RawResponse, Error> {
        let url = self.resolve(template)?;
        if !headers.contains_key(header::IF_MATCH) {
            let current = self
                .send(Method::GET, url.clone(), HeaderMap::new(), None, None)
                .await?;
            resolver::check(current.status, &current.body)?;
            match current.etag_or_body() {
                Some(etag) => {
                    let value = HeaderValue::from_str(etag.as_str()).map_err(|err| {
                        Error::Internal(format!("invalid ETag {etag}: {err}"))
                    })?;
                    headers.insert(header::IF_MATCH, value);
                }
                None => warn!("{url} has no ETag, sending {method} without If-Match"),
            }
        }
        self.send(method, url, headers, Some(body), None).await
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Option<&JsonValue>,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, Error> {
        let mut all_headers = self.custom_headers.clone();
        all_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_JSON),
        );
        all_headers.insert(header::ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        all_headers.extend(headers);

        info!("{method} {url}");
        if let Some(body) = body {
            debug!("TX {method} {url} {body}");
        }

        let request = Request {
            method,
            url: url.clone(),
            credentials: self.server.credentials(),
            headers: all_headers,
            body,
            timeout,
        };
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| Error::Transport {
                url: url.to_string(),
                source: Box::new(err),
            })?;

        if response.body.is_empty() {
            debug!("RX {}", response.status);
        } else {
            debug!(
                "RX {} {}",
                response.status,
                String::from_utf8_lossy(&response.body)
            );
        }
        Ok(response)
    }
}

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

use crate::HttpClient;
use crate::RawResponse;
use crate::Request;
use http::header;
use std::sync::OnceLock;
use std::time::Duration;
use utool_core::ODataETag;

#[derive(Debug)]
pub enum BmcError {
    ReqwestError(reqwest::Error),
}

impl From<reqwest::Error> for BmcError {
    fn from(value: reqwest::Error) -> Self {
        Self::ReqwestError(value)
    }
}

#[allow(clippy::absolute_paths)]
impl std::fmt::Display for BmcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReqwestError(e) if e.is_timeout() => write!(f, "request timed out: {e}"),
            Self::ReqwestError(e) if e.is_connect() => write!(f, "connection failed: {e}"),
            Self::ReqwestError(e) => write!(f, "HTTP client error: {e}"),
        }
    }
}

#[allow(clippy::absolute_paths)]
impl std::error::Error for BmcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReqwestError(e) => Some(e),
        }
    }
}

/// Configuration parameters for the reqwest HTTP client.
///
/// # Examples
///
/// ```rust
/// use utool_bmc_http::reqwest::ClientParams;
/// use std::time::Duration;
///
/// let params = ClientParams::new()
///     .timeout(Duration::from_secs(30))
///     .connect_timeout(Duration::from_secs(10))
///     .user_agent("utool/0.1")
///     .accept_invalid_certs(true);
/// ```
#[derive(Debug, Clone)]
pub struct ClientParams {
    /// HTTP request timeout
    pub timeout: Option<Duration>,
    /// TCP connection timeout
    pub connect_timeout: Option<Duration>,
    /// User-Agent header value
    pub user_agent: Option<String>,
    /// Whether to accept invalid TLS certificates
    pub accept_invalid_certs: bool,
    /// Maximum number of HTTP redirects to follow
    pub max_redirects: Option<usize>,
}

impl Default for ClientParams {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: Some(format!("utool/{}", env!("CARGO_PKG_VERSION"))),
            // BMCs ship self-signed certificates.
            accept_invalid_certs: true,
            max_redirects: Some(10),
        }
    }
}

impl ClientParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    #[must_use]
    pub const fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }
}

/// [`HttpClient`] implementation using reqwest.
///
/// # Examples
///
/// ```rust,no_run
/// use utool_bmc_http::reqwest::Client;
/// use utool_bmc_http::reqwest::ClientParams;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Create with default settings
/// let client = Client::new()?;
///
/// // Or with custom parameters
/// let params = ClientParams::new().timeout(Duration::from_secs(60));
/// let client = Client::with_params(params)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    client: reqwest::Client,
}

static SHARED: OnceLock<Client> = OnceLock::new();

#[allow(clippy::missing_errors_doc)]
#[allow(clippy::absolute_paths)]
impl Client {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_params(ClientParams::default())
    }

    pub fn with_params(params: ClientParams) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();

        if let Some(timeout) = params.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(connect_timeout) = params.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        if let Some(user_agent) = params.user_agent {
            builder = builder.user_agent(user_agent);
        }

        if params.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(max_redirects) = params.max_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::limited(max_redirects));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Process-wide client, built once with `params` on first use.
    /// Later calls return the same client and ignore `params`.
    pub fn shared(params: ClientParams) -> Result<Self, reqwest::Error> {
        if let Some(client) = SHARED.get() {
            return Ok(client.clone());
        }
        let client = Self::with_params(params)?;
        Ok(SHARED.get_or_init(|| client).clone())
    }
}

impl HttpClient for Client {
    type Error = BmcError;

    async fn execute(&self, request: Request<'_>) -> Result<RawResponse, Self::Error> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .basic_auth(
                &request.credentials.username,
                Some(request.credentials.password()),
            )
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let (etag, content_type) = {
            let header_str = |name: header::HeaderName| {
                response
                    .headers()
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            (
                header_str(header::ETAG).map(ODataETag::from),
                header_str(header::CONTENT_TYPE),
            )
        };
        let content_length = response.content_length();
        // BMCs send useful error descriptions as JSON, read the body whatever the status.
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status,
            etag,
            content_type,
            content_length,
            body,
        })
    }
}

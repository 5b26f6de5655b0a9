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

//! Expectations for Bmc Mock.

use http::Method;
use http::StatusCode;
use serde_json::from_str;
use serde_json::to_vec;
use serde_json::Value as JsonValue;
use std::fmt::Display;
use utool_bmc_http::RawResponse;
use utool_core::ODataETag;

pub type Response<E> = Result<RawResponse, E>;

/// Request expected by BMC.
#[derive(Debug, Clone)]
pub struct ExpectedRequest {
    pub method: Method,
    /// Path and query of the request URL.
    pub uri: String,
    /// Expected JSON body. `None` matches any body.
    pub body: Option<JsonValue>,
}

/// Expectation for the tests.
#[derive(Debug)]
pub struct Expect<E> {
    pub request: ExpectedRequest,
    pub response: Response<E>,
}

fn json(text: impl Display) -> JsonValue {
    from_str(&text.to_string()).expect("invalid json")
}

fn json_response(status: StatusCode, body: &JsonValue) -> RawResponse {
    RawResponse::new(status, to_vec(body).expect("json serializable"))
}

impl<E> Expect<E> {
    fn new(method: Method, uri: impl Display, body: Option<JsonValue>, response: RawResponse) -> Self {
        Expect {
            request: ExpectedRequest {
                method,
                uri: uri.to_string(),
                body,
            },
            response: Ok(response),
        }
    }

    pub fn get(uri: impl Display, response: impl Display) -> Self {
        Self::new(
            Method::GET,
            uri,
            None,
            json_response(StatusCode::OK, &json(response)),
        )
    }

    pub fn get_with_etag(uri: impl Display, etag: &str, response: impl Display) -> Self {
        Self::new(
            Method::GET,
            uri,
            None,
            json_response(StatusCode::OK, &json(response))
                .with_etag(ODataETag::from(etag.to_string())),
        )
    }

    pub fn post(uri: impl Display, request: impl Display, response: impl Display) -> Self {
        Self::new(
            Method::POST,
            uri,
            Some(json(request)),
            json_response(StatusCode::OK, &json(response)),
        )
    }

    pub fn patch(uri: impl Display, request: impl Display, response: impl Display) -> Self {
        Self::new(
            Method::PATCH,
            uri,
            Some(json(request)),
            json_response(StatusCode::OK, &json(response)),
        )
    }

    pub fn put(uri: impl Display, request: impl Display, response: impl Display) -> Self {
        Self::new(
            Method::PUT,
            uri,
            Some(json(request)),
            json_response(StatusCode::OK, &json(response)),
        )
    }

    pub fn delete(uri: impl Display) -> Self {
        Self::new(
            Method::DELETE,
            uri,
            None,
            RawResponse::new(StatusCode::NO_CONTENT, Vec::new()),
        )
    }

    /// Any request with `method` and `uri`, answered with `status` and a
    /// JSON (or empty) body.
    pub fn respond(method: Method, uri: impl Display, status: StatusCode, body: &str) -> Self {
        let response = if body.is_empty() {
            RawResponse::new(status, Vec::new())
        } else {
            json_response(status, &json(body))
        };
        Self::new(method, uri, None, response)
    }

    /// Transport failure.
    pub fn failure(method: Method, uri: impl Display, err: E) -> Self {
        Expect {
            request: ExpectedRequest {
                method,
                uri: uri.to_string(),
                body: None,
            },
            response: Err(err),
        }
    }

    /// Replace the response status.
    #[must_use]
    pub fn status(self, status: StatusCode) -> Self {
        Expect {
            response: self.response.map(|r| RawResponse { status, ..r }),
            ..self
        }
    }
}

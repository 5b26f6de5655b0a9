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

pub mod expect;

#[doc(inline)]
pub use expect::Expect;
pub use expect::ExpectedRequest;

use http::header::IF_MATCH;
use http::Method;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;
use utool_bmc_http::HttpClient;
use utool_bmc_http::RawResponse;
use utool_bmc_http::Request;

#[derive(Debug)]
pub enum Error {
    ErrorResponse(Box<dyn StdError + Send + Sync>),
    MutexLock(String),
    NothingIsExpected(Method, String),
    Unexpected(Method, String, Option<String>, ExpectedRequest),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::ErrorResponse(err) => write!(f, "response: {err}"),
            Self::MutexLock(err) => write!(f, "lock error: {err}"),
            Self::NothingIsExpected(method, uri) => {
                write!(f, "nothing is expected to happen but {method} {uri} happened")
            }
            Self::Unexpected(method, uri, body, expected) => {
                write!(
                    f,
                    "unexpected {method} {uri}; json: {} expected: {expected:?}",
                    body.as_deref().unwrap_or("<none>")
                )
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::ErrorResponse(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl Error {
    pub fn mutex_lock<T>(err: PoisonError<T>) -> Self {
        Self::MutexLock(err.to_string())
    }
}

/// Request as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: String,
    pub if_match: Option<String>,
    pub body: Option<JsonValue>,
    pub timeout: Option<Duration>,
}

/// Mock BMC answering requests from a queue of expectations, in order.
pub struct Bmc<E> {
    expect: Mutex<VecDeque<Expect<E>>>,
    history: Mutex<Vec<RecordedRequest>>,
}

impl<E> Default for Bmc<E> {
    fn default() -> Self {
        Self {
            expect: Mutex::new(VecDeque::new()),
            history: Mutex::new(Vec::new()),
        }
    }
}

impl<E> Bmc<E> {
    /// Append an expectation to the queue.
    pub fn expect(&self, exp: Expect<E>) {
        let expect: &mut VecDeque<Expect<E>> = &mut self.expect.lock().expect("not poisoned");
        expect.push_back(exp);
    }

    /// Number of expectations not consumed yet.
    pub fn remaining(&self) -> usize {
        self.expect.lock().expect("not poisoned").len()
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.history.lock().expect("not poisoned").clone()
    }

    /// Number of received requests with `method`.
    pub fn count(&self, method: &Method) -> usize {
        self.history
            .lock()
            .expect("not poisoned")
            .iter()
            .filter(|r| r.method == *method)
            .count()
    }

    pub fn debug_expect(&self) {
        let expect: &VecDeque<Expect<E>> = &self.expect.lock().expect("not poisoned");
        println!("Expectations (total: {})", expect.len());
        for v in expect {
            println!("{:#?}", v.request);
        }
    }

    fn record(&self, request: &Request<'_>) -> Result<RecordedRequest, Error> {
        let uri = match request.url.query() {
            Some(query) => format!("{}?{query}", request.url.path()),
            None => request.url.path().to_string(),
        };
        let recorded = RecordedRequest {
            method: request.method.clone(),
            uri,
            if_match: request
                .headers
                .get(IF_MATCH)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: request.body.cloned(),
            timeout: request.timeout,
        };
        self.history
            .lock()
            .map_err(Error::mutex_lock)?
            .push(recorded.clone());
        Ok(recorded)
    }
}

impl<E> HttpClient for Bmc<E>
where
    E: StdError + Send + Sync + 'static,
{
    type Error = Error;

    async fn execute(&self, request: Request<'_>) -> Result<RawResponse, Self::Error> {
        let received = self.record(&request)?;
        let expect = self
            .expect
            .lock()
            .map_err(Error::mutex_lock)?
            .pop_front()
            .ok_or_else(|| Error::NothingIsExpected(received.method.clone(), received.uri.clone()))?;
        let body_matches = expect
            .request
            .body
            .as_ref()
            .map_or(true, |body| Some(body) == received.body.as_ref());
        match expect {
            Expect { request, response }
                if request.method == received.method && request.uri == received.uri && body_matches =>
            {
                response.map_err(|err| Error::ErrorResponse(Box::new(err)))
            }
            Expect { request, .. } => Err(Error::Unexpected(
                received.method,
                received.uri,
                received.body.map(|b| b.to_string()),
                request,
            )),
        }
    }
}

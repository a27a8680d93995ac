// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Structured diagnostics emitted while signing and sending requests.

use std::fmt::Debug;
use std::time::Duration;

use http::Method;
use http::StatusCode;

use crate::Error;

/// An event emitted by the signer or the signed client.
///
/// Sensitive values are masked before an event is built: observers only ever
/// see the masked form of signatures and nonces.
#[derive(Debug)]
pub enum SignEvent<'a> {
    /// A request has been signed and is about to be handed to transport.
    Signed {
        /// Request method.
        method: &'a Method,
        /// Full request url.
        url: &'a str,
        /// Canonical string with the nonce masked.
        canonical: &'a str,
        /// Request headers with signature and nonce masked.
        headers: &'a [(String, String)],
    },
    /// A nonce was produced from a degraded random source.
    InsecureRandomFallback {
        /// Request method.
        method: &'a Method,
        /// Full request url.
        url: &'a str,
    },
    /// Transport returned a response with a success status.
    Finished {
        /// Request method.
        method: &'a Method,
        /// Full request url.
        url: &'a str,
        /// Response status.
        status: StatusCode,
        /// Time spent in transport.
        elapsed: Duration,
    },
    /// Transport failed or returned a non-success status.
    Failed {
        /// Request method.
        method: &'a Method,
        /// Full request url.
        url: &'a str,
        /// Response status, if a response was received.
        status: Option<StatusCode>,
        /// The error reported upward.
        error: &'a Error,
        /// Time spent in transport.
        elapsed: Duration,
    },
}

/// Observe receives [`SignEvent`]s.
///
/// Implementations must not block; they are called inline on every request.
pub trait Observe: Debug + Send + Sync + 'static {
    /// Handle an event.
    fn observe(&self, event: &SignEvent<'_>);
}

/// NoopObserver drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observe for NoopObserver {
    fn observe(&self, _: &SignEvent<'_>) {}
}

/// LogObserver renders events through the `log` facade.
///
/// | Event | Level |
/// |---|---|
/// | `Signed` | debug |
/// | `Finished` | info |
/// | `InsecureRandomFallback` | warn |
/// | `Failed` | error |
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observe for LogObserver {
    fn observe(&self, event: &SignEvent<'_>) {
        match event {
            SignEvent::Signed {
                method,
                url,
                canonical,
                headers,
            } => {
                log::debug!(
                    "[REQ] {method} {url} canonical: {} headers: {headers:?}",
                    canonical.replace('\n', "\\n")
                );
            }
            SignEvent::InsecureRandomFallback { method, url } => {
                log::warn!(
                    "[RNG] {method} {url}: nonce drawn from a non-secure random source, replay protection is weakened"
                );
            }
            SignEvent::Finished {
                method,
                url,
                status,
                elapsed,
            } => {
                log::info!("[RES] {method} {url} • {status} • {elapsed:?}");
            }
            SignEvent::Failed {
                method,
                url,
                status,
                error,
                elapsed,
            } => match status {
                Some(status) => {
                    log::error!("[ERR] {method} {url} • {status} • {elapsed:?}: {error}")
                }
                None => log::error!("[NET] {method} {url} • {elapsed:?}: {error:?}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observers_accept_every_event() {
        let method = Method::GET;
        let err = Error::unexpected("HTTP 401: signature mismatch");
        let headers = vec![("X-Nonce".to_string(), "123e…4000".to_string())];
        let events = [
            SignEvent::Signed {
                method: &method,
                url: "https://api.example.com/airports_list",
                canonical: "GET\n/airports_list\n\ne3b0\n1759243458\n123e…4000\nv1",
                headers: &headers,
            },
            SignEvent::InsecureRandomFallback {
                method: &method,
                url: "https://api.example.com/airports_list",
            },
            SignEvent::Finished {
                method: &method,
                url: "https://api.example.com/airports_list",
                status: StatusCode::OK,
                elapsed: Duration::from_millis(12),
            },
            SignEvent::Failed {
                method: &method,
                url: "https://api.example.com/airports_list",
                status: Some(StatusCode::UNAUTHORIZED),
                error: &err,
                elapsed: Duration::from_millis(12),
            },
        ];

        for event in &events {
            NoopObserver.observe(event);
            LogObserver.observe(event);
        }
    }
}

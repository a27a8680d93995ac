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

//! Core components for signing API requests.
//!
//! This crate provides the foundational types and traits for the reqseal ecosystem:
//! the deterministic pieces a client and a verifying server must compute identically,
//! and the capabilities the signer is wired with at start-up.
//!
//! ## Overview
//!
//! - **Encoding**: RFC 3986 percent-encoding and a stable, sorted query string ([`encode`])
//! - **Hashing**: SHA-256 body digests, HMAC-SHA256 and lenient key decoding ([`hash`])
//! - **Freshness**: UUID v4 nonces ([`nonce`]) and epoch / RFC 3339 timestamps ([`time`])
//! - **Context**: A container that holds implementations for HTTP sending, environment access, crypto and diagnostics
//! - **Traits**: Abstract interfaces for credential loading (`ProvideCredential`)
//!
//! ## Example
//!
//! ```
//! use reqseal_core::encode::Query;
//! use reqseal_core::hash::{hex_sha256, EMPTY_SHA256_HEX};
//!
//! let query = Query::new()
//!     .with("q", "hamed")
//!     .with("page", 1)
//!     .with("limit", 20);
//!
//! assert_eq!(query.canonical(), "limit=20&page=1&q=hamed");
//! assert_eq!(hex_sha256(b""), EMPTY_SHA256_HEX);
//! ```
//!
//! ## Traits
//!
//! - [`HttpSend`]: For sending HTTP requests
//! - [`Env`]: For environment variable access
//! - [`CryptoProvider`]: For digests, MACs and randomness
//! - [`Observe`]: For structured diagnostics of signed requests
//! - [`ProvideCredential`]: For loading credentials from various sources
//! - [`SigningCredential`]: For validating credentials

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod encode;
pub mod hash;
pub mod nonce;
pub mod observe;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod context;
pub use context::Context;
pub use context::Env;
pub use context::HttpSend;
pub use context::NoopEnv;
pub use context::NoopHttpSend;
pub use context::OsEnv;
pub use context::StaticEnv;

mod crypto;
pub use crypto::CryptoProvider;
pub use crypto::Entropy;
pub use crypto::FallbackCrypto;
pub use crypto::NoopCryptoProvider;
pub use crypto::OsCrypto;

pub use observe::{LogObserver, NoopObserver, Observe, SignEvent};

mod api;
pub use api::{ProvideCredential, ProvideCredentialChain, SigningCredential};

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

//! HMAC-SHA256 request signing for reqseal.
//!
//! This crate signs API requests with a canonical HMAC envelope: every request
//! carries a client id, a key version, a timestamp, a single-use nonce and a
//! signature over a seven line canonical string.
//!
//! ## Overview
//!
//! The canonical string joins, with `\n` and no trailing newline:
//!
//! ```text
//! METHOD
//! /path
//! sorted=encoded&query=string
//! hex sha256 of the body
//! epoch seconds
//! uuid v4 nonce
//! key version
//! ```
//!
//! The signature is `base64(HMAC-SHA256(secret, canonical))` and travels in
//! `X-Signature` next to `X-Client-Id`, `X-Key-Version`, `X-Date` and
//! `X-Nonce`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use reqseal_core::encode::Query;
//! use reqseal_core::{Context, LogObserver, OsCrypto, OsEnv, Result};
//! use reqseal_hmac::{Client, Config};
//! use reqseal_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv)
//!         .with_crypto(OsCrypto)
//!         .with_observer(LogObserver);
//!
//!     // Reads REQSEAL_API_BASE, REQSEAL_CLIENT_ID and REQSEAL_SECRET_V1.
//!     let client = Client::load(ctx, Config::default()).await?;
//!
//!     let airports: serde_json::Value = client
//!         .get("/airports_list", Query::new().with("q", "tehran").with("limit", 20))
//!         .await?;
//!     println!("{airports}");
//!     Ok(())
//! }
//! ```
//!
//! ## Credential Sources
//!
//! ### Environment Variables
//!
//! ```bash
//! export REQSEAL_API_BASE=https://api.example.com
//! export REQSEAL_CLIENT_ID=web
//! export REQSEAL_KEY_VERSION=v1           # Optional, default to v1
//! export REQSEAL_SECRET_V1=base64-secret  # One per key version
//! export REQSEAL_DATE_HEADER=rfc3339      # Optional, default to epoch
//! ```
//!
//! ### Static
//!
//! ```no_run
//! use reqseal_hmac::StaticCredentialProvider;
//!
//! let provider = StaticCredentialProvider::new("web").with_secret("v1", "c2VjcmV0");
//! ```

mod constants;
pub use constants::{X_CLIENT_ID, X_DATE, X_KEY_VERSION, X_NONCE, X_SIGNATURE};

mod config;
pub use config::{Config, DateMode};

mod credential;
pub use credential::{Credential, KeyRing, Secret};

mod canonical;
pub use canonical::{CanonicalParts, CanonicalString};

mod sign_request;
pub use sign_request::{sign, ApiRequest, RequestSigner, SignedEnvelope};

mod client;
pub use client::Client;

mod provide_credential;
pub use provide_credential::*;

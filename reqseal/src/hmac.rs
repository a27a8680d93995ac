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

//! HMAC request signing with convenience APIs
//!
//! This module re-exports the HMAC signing types along with a shortcut to
//! build a client from env.

pub use reqseal_hmac::*;

#[cfg(feature = "default-context")]
use crate::{default_context, Result};

/// Create a client from env with the default context.
///
/// Reads `REQSEAL_API_BASE`, `REQSEAL_CLIENT_ID`, `REQSEAL_KEY_VERSION`,
/// `REQSEAL_DATE_HEADER` and `REQSEAL_SECRET_<VERSION>`.
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> reqseal_core::Result<()> {
/// use reqseal::encode::Query;
///
/// let client = reqseal::hmac::default_client().await?;
/// let regions: serde_json::Value = client.get("/regions", Query::new()).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub async fn default_client() -> Result<Client> {
    Client::load(default_context(), Config::default()).await
}

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

//! Example: query a signed API with credentials from env.
//!
//! ```bash
//! export REQSEAL_API_BASE=https://api.example.com
//! export REQSEAL_CLIENT_ID=web
//! export REQSEAL_SECRET_V1=base64-secret
//! RUST_LOG=debug cargo run --example airports -- tehran
//! ```

use reqseal_core::encode::Query;
use reqseal_core::{Context, FallbackCrypto, LogObserver, OsEnv};
use reqseal_hmac::{Client, Config};
use reqseal_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let q = std::env::args().nth(1).unwrap_or_else(|| "tehran".to_string());

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
        .with_crypto(FallbackCrypto::new())
        .with_observer(LogObserver);

    let client = Client::load(ctx, Config::default()).await?;

    let airports: serde_json::Value = client
        .get(
            "/airports_list",
            Query::new().with("q", q).with("page", 1).with("limit", 20),
        )
        .await?;
    println!("{}", serde_json::to_string_pretty(&airports)?);

    let metar: serde_json::Value = client
        .post_json("/wx/metar", &serde_json::json!({"icao": "OIII", "hours": 2}))
        .await?;
    println!("{}", serde_json::to_string_pretty(&metar)?);

    Ok(())
}

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

use async_trait::async_trait;
use reqseal_core::hash::{hmac_sha256, sha256};
use reqseal_core::nonce::fresh_nonce;
use reqseal_core::{Context, CryptoProvider, Entropy, Error, OsCrypto, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

// A provider that counts how often it is asked for randomness, delegating
// the actual work to the OS provider.
#[derive(Debug, Default)]
struct CountingCrypto {
    draws: AtomicUsize,
}

#[async_trait]
impl CryptoProvider for CountingCrypto {
    async fn sha256(&self, content: &[u8]) -> Result<[u8; 32]> {
        Ok(sha256(content))
    }

    async fn hmac_sha256(&self, key: &[u8], content: &[u8]) -> Result<[u8; 32]> {
        if key.is_empty() {
            return Err(Error::missing_key_material("refusing to sign with an empty key"));
        }
        Ok(hmac_sha256(key, content))
    }

    fn fill_random(&self, buf: &mut [u8]) -> Result<Entropy> {
        self.draws.fetch_add(1, Ordering::Relaxed);
        OsCrypto.fill_random(buf)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let ctx = Context::new().with_crypto(CountingCrypto::default());

    let nonce = fresh_nonce(ctx.crypto())?;
    println!("nonce: {} ({:?})", nonce.as_str(), nonce.entropy());

    let digest = ctx.hex_sha256(b"{\"icao\":\"OIII\"}").await?;
    println!("body digest: {digest}");

    let signature = ctx.base64_hmac_sha256(b"demo-key", digest.as_bytes()).await?;
    println!("signature: {signature}");

    Ok(())
}

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

//! Nonce related utils.

use uuid::Builder;

use crate::CryptoProvider;
use crate::Entropy;
use crate::Result;

/// A freshly drawn, single-use nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce {
    value: String,
    entropy: Entropy,
}

impl Nonce {
    /// The canonical UUID v4 text: `xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx`.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Quality of the randomness behind this nonce.
    pub fn entropy(&self) -> Entropy {
        self.entropy
    }

    /// Consume the nonce into its text form.
    pub fn into_string(self) -> String {
        self.value
    }
}

/// Draw 128 random bits from `crypto` and format them as a UUID v4.
pub fn fresh_nonce(crypto: &dyn CryptoProvider) -> Result<Nonce> {
    let mut bytes = [0u8; 16];
    let entropy = crypto.fill_random(&mut bytes)?;

    Ok(Nonce {
        value: format_uuid_v4(bytes),
        entropy,
    })
}

/// Format random bytes as a lowercase hyphenated UUID v4.
///
/// The version nibble is forced to `0100` and the variant bits to `10`.
pub fn format_uuid_v4(bytes: [u8; 16]) -> String {
    Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
}

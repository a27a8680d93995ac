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

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};

use reqseal_core::hash::decode_key_material;
use reqseal_core::utils::Redact;
use reqseal_core::{Error, Result, SigningCredential};

/// A decoded HMAC secret.
///
/// The encoded form is kept only to render a masked hint in diagnostics.
#[derive(Clone)]
pub struct Secret {
    encoded: String,
    bytes: Vec<u8>,
}

impl Secret {
    /// Decode a secret from its base64 or base64url form.
    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = decode_key_material(encoded)?;
        Ok(Self {
            encoded: encoded.trim().to_string(),
            bytes,
        })
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", Redact::from(&self.encoded))
    }
}

/// KeyRing maps key versions to decoded secrets.
#[derive(Clone, Default)]
pub struct KeyRing {
    keys: BTreeMap<String, Secret>,
}

impl KeyRing {
    /// Create an empty key ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and add the secret for `version`.
    ///
    /// A blank secret counts as absent and is skipped. A secret that does not
    /// decode fails with `ConfigInvalid` naming the version.
    pub fn insert(&mut self, version: &str, encoded: &str) -> Result<()> {
        if encoded.trim().is_empty() {
            return Ok(());
        }

        let version = version.to_ascii_lowercase();
        let secret = Secret::decode(encoded).map_err(|e| {
            Error::config_invalid(format!("invalid HMAC secret for key version {version}"))
                .with_source(e)
        })?;
        self.keys.insert(version, secret);
        Ok(())
    }

    /// Builder flavor of [`KeyRing::insert`].
    pub fn with(mut self, version: &str, encoded: &str) -> Result<Self> {
        self.insert(version, encoded)?;
        Ok(self)
    }

    /// Get the secret for `version`.
    pub fn get(&self, version: &str) -> Option<&Secret> {
        self.keys.get(&version.to_ascii_lowercase())
    }

    /// Get the secret for `version`, failing with `MissingKeyMaterial`.
    pub fn secret(&self, version: &str) -> Result<&Secret> {
        self.get(version).ok_or_else(|| {
            Error::missing_key_material(format!(
                "missing HMAC secret for key version {version}"
            ))
        })
    }

    /// Key versions held, sorted.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Number of secrets held.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no secret is held.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Debug for KeyRing {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.keys.iter()).finish()
    }
}

/// Credential that holds the client id and its versioned secrets.
#[derive(Clone, Default)]
pub struct Credential {
    /// Client id sent in `X-Client-Id`.
    pub client_id: String,
    /// Versioned HMAC secrets.
    pub keys: KeyRing,
}

impl Credential {
    /// Create a credential without secrets.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            keys: KeyRing::new(),
        }
    }

    /// Decode and add the secret for `version`.
    pub fn with_secret(mut self, version: &str, encoded: &str) -> Result<Self> {
        self.keys.insert(version, encoded)?;
        Ok(self)
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.client_id)
            .field("keys", &self.keys)
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.client_id.is_empty() && !self.keys.is_empty()
    }
}

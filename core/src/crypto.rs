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

//! Crypto capability used while signing.

use std::fmt::Debug;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rand::rngs::OsRng;
use rand::rngs::StdRng;
use rand::RngCore;
use rand::SeedableRng;

use crate::hash;
use crate::Error;
use crate::Result;

/// Quality of the randomness returned by [`CryptoProvider::fill_random`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entropy {
    /// Drawn from a cryptographically secure source.
    Secure,
    /// Drawn from a non-secure generator because no secure source was
    /// available.
    ///
    /// Values built from it weaken replay protection and must be surfaced
    /// to operators.
    Degraded,
}

impl Entropy {
    /// Returns true if the randomness came from a secure source.
    pub fn is_secure(&self) -> bool {
        matches!(self, Entropy::Secure)
    }
}

/// CryptoProvider computes digests and MACs and draws randomness.
///
/// The provider is selected once when building the [`Context`](crate::Context).
/// Digest and MAC are async so providers backed by an asynchronous engine can
/// suspend; dropping the returned future cancels the operation.
#[async_trait::async_trait]
pub trait CryptoProvider: Debug + Send + Sync + 'static {
    /// SHA-256 digest of `content`.
    async fn sha256(&self, content: &[u8]) -> Result<[u8; 32]>;

    /// HMAC-SHA256 of `content` keyed by `key`.
    async fn hmac_sha256(&self, key: &[u8], content: &[u8]) -> Result<[u8; 32]>;

    /// Fill `buf` with random bytes, reporting their quality.
    fn fill_random(&self, buf: &mut [u8]) -> Result<Entropy>;
}

/// OsCrypto draws randomness from the operating system only.
///
/// If the OS source is unavailable, [`fill_random`](CryptoProvider::fill_random)
/// fails with [`ErrorKind::InsecureRandomFallback`](crate::ErrorKind::InsecureRandomFallback)
/// instead of degrading.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsCrypto;

#[async_trait::async_trait]
impl CryptoProvider for OsCrypto {
    async fn sha256(&self, content: &[u8]) -> Result<[u8; 32]> {
        Ok(hash::sha256(content))
    }

    async fn hmac_sha256(&self, key: &[u8], content: &[u8]) -> Result<[u8; 32]> {
        Ok(hash::hmac_sha256(key, content))
    }

    fn fill_random(&self, buf: &mut [u8]) -> Result<Entropy> {
        OsRng.try_fill_bytes(buf).map_err(|e| {
            Error::insecure_random("secure random source is unavailable").with_source(e)
        })?;
        Ok(Entropy::Secure)
    }
}

/// FallbackCrypto prefers the OS random source, and falls back to a
/// clock-seeded PRNG when it is unavailable.
///
/// The fallback is reported as [`Entropy::Degraded`], never hidden. Only use
/// it where the OS source is known to be missing.
#[derive(Debug, Clone, Copy)]
pub struct FallbackCrypto {
    os_random: bool,
}

impl Default for FallbackCrypto {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackCrypto {
    /// Create a FallbackCrypto that tries the OS source first.
    pub fn new() -> Self {
        Self { os_random: true }
    }

    /// Create a FallbackCrypto that never touches the OS source.
    ///
    /// Every random draw is [`Entropy::Degraded`].
    pub fn without_os_random() -> Self {
        Self { os_random: false }
    }

    fn degraded_rng() -> StdRng {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        StdRng::seed_from_u64(nanos ^ ((std::process::id() as u64) << 32))
    }
}

#[async_trait::async_trait]
impl CryptoProvider for FallbackCrypto {
    async fn sha256(&self, content: &[u8]) -> Result<[u8; 32]> {
        Ok(hash::sha256(content))
    }

    async fn hmac_sha256(&self, key: &[u8], content: &[u8]) -> Result<[u8; 32]> {
        Ok(hash::hmac_sha256(key, content))
    }

    fn fill_random(&self, buf: &mut [u8]) -> Result<Entropy> {
        if self.os_random && OsRng.try_fill_bytes(buf).is_ok() {
            return Ok(Entropy::Secure);
        }

        Self::degraded_rng().fill_bytes(buf);
        Ok(Entropy::Degraded)
    }
}

/// NoopCryptoProvider is a no-op implementation that always returns an error.
///
/// This is used when no crypto provider is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCryptoProvider;

#[async_trait::async_trait]
impl CryptoProvider for NoopCryptoProvider {
    async fn sha256(&self, _content: &[u8]) -> Result<[u8; 32]> {
        Err(Error::unexpected(
            "sha256 not supported: no crypto provider configured",
        ))
    }

    async fn hmac_sha256(&self, _key: &[u8], _content: &[u8]) -> Result<[u8; 32]> {
        Err(Error::unexpected(
            "hmac not supported: no crypto provider configured",
        ))
    }

    fn fill_random(&self, _buf: &mut [u8]) -> Result<Entropy> {
        Err(Error::insecure_random(
            "random not supported: no crypto provider configured",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn test_providers_agree_on_digests() {
        let providers: Vec<Box<dyn CryptoProvider>> =
            vec![Box::new(OsCrypto), Box::new(FallbackCrypto::new())];

        for p in providers {
            assert_eq!(
                hex::encode(p.sha256(b"").await.unwrap()),
                hash::EMPTY_SHA256_HEX
            );
            assert_eq!(
                hash::base64_encode(
                    &p.hmac_sha256(b"key", b"The quick brown fox jumps over the lazy dog")
                        .await
                        .unwrap()
                ),
                "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg="
            );
        }
    }

    #[test]
    fn test_os_crypto_is_secure() {
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        assert_eq!(OsCrypto.fill_random(&mut a).unwrap(), Entropy::Secure);
        assert_eq!(OsCrypto.fill_random(&mut b).unwrap(), Entropy::Secure);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fallback_crypto_reports_degraded() {
        let mut buf = [0u8; 16];
        let entropy = FallbackCrypto::without_os_random()
            .fill_random(&mut buf)
            .unwrap();

        assert_eq!(entropy, Entropy::Degraded);
        assert!(!entropy.is_secure());
    }

    #[test]
    fn test_fallback_crypto_prefers_os() {
        let mut buf = [0u8; 16];
        assert_eq!(
            FallbackCrypto::new().fill_random(&mut buf).unwrap(),
            Entropy::Secure
        );
    }

    #[tokio::test]
    async fn test_noop_crypto_fails() {
        let mut buf = [0u8; 16];
        let err = NoopCryptoProvider.fill_random(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsecureRandomFallback);
        assert!(NoopCryptoProvider.sha256(b"").await.is_err());
    }
}

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

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderName, CONTENT_TYPE};
use http::uri::PathAndQuery;
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;

use reqseal_core::encode::{Query, QueryValue};
use reqseal_core::nonce::fresh_nonce;
use reqseal_core::time::{format_epoch_seconds, format_rfc3339, now, parse_epoch_seconds, DateTime};
use reqseal_core::utils::Redact;
use reqseal_core::{Context, Error, Result, SignEvent};

use crate::canonical::{CanonicalParts, CanonicalString};
use crate::config::{Config, DateMode};
use crate::constants::*;
use crate::credential::Credential;

/// An API call before it is signed.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Query,
    body: Bytes,
}

impl ApiRequest {
    /// Create a request for `method` and `path`.
    ///
    /// `path` must start with `/` and carry no query; parameters go through
    /// [`ApiRequest::with_query`] or [`ApiRequest::with_param`].
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::new(),
            body: Bytes::new(),
        }
    }

    /// Create a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Replace the query parameters.
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Set a single query parameter. A later value for the same key wins.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.set(key, value);
        self
    }

    /// Replace the body with raw bytes.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Replace the body with the JSON serialization of `value`.
    pub fn with_json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value).map_err(|e| {
            Error::encoding_failure("failed to serialize request body as json").with_source(e)
        })?;
        self.body = Bytes::from(body);
        Ok(self)
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// A request carrying its signature headers, ready for transport.
#[derive(Clone)]
pub struct SignedEnvelope {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Bytes,
    canonical: CanonicalString,
    canonical_redacted: String,
}

impl SignedEnvelope {
    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full request url.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request headers including the signature headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body bytes, exactly the bytes that were digested.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The string that was signed.
    pub fn canonical(&self) -> &CanonicalString {
        &self.canonical
    }

    /// The signed string with the nonce masked.
    pub fn canonical_redacted(&self) -> &str {
        &self.canonical_redacted
    }

    /// Headers as `(name, value)` pairs with signature and nonce masked.
    pub fn masked_headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| {
                let v = v.to_str().unwrap_or_default();
                let v = if k == X_SIGNATURE || k == X_NONCE {
                    Redact::from(v).to_string()
                } else {
                    v.to_string()
                };
                (k.as_str().to_string(), v)
            })
            .collect()
    }

    /// Convert into an [`http::Request`].
    pub fn into_request(self) -> Result<http::Request<Bytes>> {
        let mut req = http::Request::builder()
            .method(self.method)
            .uri(self.url)
            .body(self.body)?;
        *req.headers_mut() = self.headers;
        Ok(req)
    }
}

impl Debug for SignedEnvelope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedEnvelope")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.masked_headers())
            .field("body_len", &self.body.len())
            .field("canonical", &self.canonical_redacted)
            .finish()
    }
}

/// Compute the base64 HMAC-SHA256 signature of `message` keyed by `key`.
///
/// An empty key is refused with `MissingKeyMaterial`.
pub async fn sign(ctx: &Context, key: &[u8], message: &str) -> Result<String> {
    if key.is_empty() {
        return Err(Error::missing_key_material(
            "refusing to sign with an empty HMAC secret",
        ));
    }
    ctx.base64_hmac_sha256(key, message.as_bytes()).await
}

/// RequestSigner turns an [`ApiRequest`] into a [`SignedEnvelope`].
#[derive(Debug)]
pub struct RequestSigner {
    config: Arc<Config>,
    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for `config`.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config, time: None }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn get_time(&self) -> DateTime {
        self.time.unwrap_or_else(now)
    }

    /// The config this signer was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sign `req` with `cred`.
    ///
    /// Nonce and timestamp are drawn once and shared by the canonical string
    /// and the headers. If no secret exists for the configured key version
    /// this fails with `MissingKeyMaterial` and no envelope is produced.
    pub async fn sign(
        &self,
        ctx: &Context,
        req: ApiRequest,
        cred: &Credential,
    ) -> Result<SignedEnvelope> {
        let ApiRequest {
            method,
            path,
            query,
            body,
        } = req;

        let method = Method::from_bytes(method.as_str().to_ascii_uppercase().as_bytes())?;
        validate_path(&path)?;

        let query = query.canonical();
        let url = self.config.url(&path, &query);
        let body_digest_hex = ctx.hex_sha256(&body).await?;

        let epoch_seconds = format_epoch_seconds(self.get_time());
        let nonce = fresh_nonce(ctx.crypto())?;
        if !nonce.entropy().is_secure() {
            ctx.observe(&SignEvent::InsecureRandomFallback {
                method: &method,
                url: &url,
            });
        }

        let key_version = self.config.key_version().to_string();
        let parts = CanonicalParts {
            method: method.as_str().to_string(),
            path,
            query,
            body_digest_hex,
            epoch_seconds,
            nonce: nonce.into_string(),
            key_version,
        };
        let canonical = parts.build();

        let secret = cred.keys.secret(&parts.key_version)?;
        let signature = sign(ctx, secret.as_bytes(), canonical.as_str()).await?;

        let date = match self.config.date_mode() {
            DateMode::Epoch => parts.epoch_seconds.clone(),
            DateMode::Rfc3339 => format_rfc3339(parse_epoch_seconds(&parts.epoch_seconds)?),
        };

        let mut headers = HeaderMap::with_capacity(6);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        headers.insert(
            HeaderName::from_static(X_CLIENT_ID),
            HeaderValue::from_str(&cred.client_id)?,
        );
        headers.insert(
            HeaderName::from_static(X_KEY_VERSION),
            HeaderValue::from_str(&parts.key_version)?,
        );
        headers.insert(HeaderName::from_static(X_DATE), HeaderValue::from_str(&date)?);
        headers.insert(
            HeaderName::from_static(X_NONCE),
            HeaderValue::from_str(&parts.nonce)?,
        );
        let mut signature: HeaderValue = signature.parse()?;
        signature.set_sensitive(true);
        headers.insert(HeaderName::from_static(X_SIGNATURE), signature);

        let envelope = SignedEnvelope {
            method,
            url,
            headers,
            body,
            canonical_redacted: parts.build_redacted(),
            canonical,
        };

        ctx.observe(&SignEvent::Signed {
            method: &envelope.method,
            url: &envelope.url,
            canonical: &envelope.canonical_redacted,
            headers: &envelope.masked_headers(),
        });

        Ok(envelope)
    }
}

fn validate_path(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(Error::request_invalid(format!(
            "request path must start with '/': {path:?}"
        )));
    }
    if path.contains(&['?', '#'][..]) {
        return Err(Error::request_invalid(format!(
            "request path must not carry a query or fragment: {path:?}"
        )));
    }
    path.parse::<PathAndQuery>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use reqseal_core::hash::{self, EMPTY_SHA256_HEX};
    use reqseal_core::{CryptoProvider, Entropy, ErrorKind, FallbackCrypto, Observe, OsCrypto};
    use std::sync::Mutex;

    const NONCE: &str = "123e4567-e89b-42d3-a456-426614174000";
    const ZERO_KEY: &str = "AAAAAAAAAAAAAAAAAAAAAA==";

    /// Returns fixed random bytes so the nonce is predictable.
    #[derive(Debug)]
    struct FixedCrypto(Entropy);

    #[async_trait]
    impl CryptoProvider for FixedCrypto {
        async fn sha256(&self, content: &[u8]) -> Result<[u8; 32]> {
            Ok(hash::sha256(content))
        }

        async fn hmac_sha256(&self, key: &[u8], content: &[u8]) -> Result<[u8; 32]> {
            Ok(hash::hmac_sha256(key, content))
        }

        fn fill_random(&self, buf: &mut [u8]) -> Result<Entropy> {
            let bytes = hex_literal(NONCE);
            buf.copy_from_slice(&bytes[..buf.len()]);
            Ok(self.0)
        }
    }

    fn hex_literal(uuid: &str) -> Vec<u8> {
        let s: String = uuid.chars().filter(|c| *c != '-').collect();
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[derive(Debug, Default, Clone)]
    struct RecordingObserver(Arc<Mutex<Vec<String>>>);

    impl Observe for RecordingObserver {
        fn observe(&self, event: &SignEvent<'_>) {
            let name = match event {
                SignEvent::Signed { canonical, .. } => format!("signed:{canonical}"),
                SignEvent::InsecureRandomFallback { .. } => "insecure".to_string(),
                SignEvent::Finished { status, .. } => format!("finished:{status}"),
                SignEvent::Failed { .. } => "failed".to_string(),
            };
            self.0.lock().unwrap().push(name);
        }
    }

    fn fixed_time() -> DateTime {
        parse_epoch_seconds("1759243458").unwrap()
    }

    fn ctx() -> Context {
        Context::new().with_crypto(FixedCrypto(Entropy::Secure))
    }

    fn signer(config: Config) -> RequestSigner {
        RequestSigner::new(Arc::new(config)).with_time(fixed_time())
    }

    fn cred(secret: &str) -> Credential {
        Credential::new("web").with_secret("v1", secret).unwrap()
    }

    fn airports() -> ApiRequest {
        ApiRequest::get("/airportslist")
            .with_param("q", "hamed")
            .with_param("page", 1)
            .with_param("limit", 20)
    }

    #[tokio::test]
    async fn test_sign_airports_list() -> anyhow::Result<()> {
        let signer = signer(Config::default().with_base_url("https://api.example.com/"));

        let envelope = signer.sign(&ctx(), airports(), &cred(ZERO_KEY)).await?;

        assert_eq!(
            envelope.canonical().as_str(),
            format!(
                "GET\n/airportslist\nlimit=20&page=1&q=hamed\n{EMPTY_SHA256_HEX}\n1759243458\n{NONCE}\nv1"
            )
        );
        assert_eq!(
            envelope.url(),
            "https://api.example.com/airportslist?limit=20&page=1&q=hamed"
        );

        let headers = envelope.headers();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[X_CLIENT_ID], "web");
        assert_eq!(headers[X_KEY_VERSION], "v1");
        assert_eq!(headers[X_DATE], "1759243458");
        assert_eq!(headers[X_NONCE], NONCE);
        assert_eq!(
            headers[X_SIGNATURE],
            "QrgunhwdNlr5S/QYpLgP5EYVjWIJdMV8aoFf4FWTU0c="
        );
        assert!(headers[X_SIGNATURE].is_sensitive());

        Ok(())
    }

    #[derive(serde::Serialize)]
    struct MetarQuery {
        icao: &'static str,
        hours: u32,
    }

    #[tokio::test]
    async fn test_sign_post_json() -> anyhow::Result<()> {
        let signer = signer(Config::default());
        let req = ApiRequest::post("/wx/metar").with_json(&MetarQuery {
            icao: "OIII",
            hours: 2,
        })?;

        let envelope = signer.sign(&ctx(), req, &cred(ZERO_KEY)).await?;

        assert_eq!(envelope.body().as_ref(), br#"{"icao":"OIII","hours":2}"#);
        assert_eq!(
            envelope.canonical().as_str().split('\n').nth(3),
            Some("a702e7e19d01e714bae128b8e8845afb168a63ec9c678572cd376b992ec5be0d")
        );
        assert_eq!(
            envelope.headers()[X_SIGNATURE],
            "RrQWXvzq8yWN2gRPaGoeitUV1LZ5k7WaEjSXb7koBtE="
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_one_byte_key_change() -> anyhow::Result<()> {
        let signer = signer(Config::default());

        let envelope = signer
            .sign(&ctx(), airports(), &cred("AAAAAAAAAAAAAAAAAAAAAQ=="))
            .await?;

        assert_eq!(
            envelope.headers()[X_SIGNATURE],
            "jQCJ0PasZvhMcs027bbcgLhLehUkFc69IOnDdEkpINU="
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_url_safe_key_matches_standard_key() -> anyhow::Result<()> {
        let signer = signer(Config::default());

        let standard = signer
            .sign(&ctx(), airports(), &cred("+/+/+/+/+/+/+/+/+/+/+A=="))
            .await?;
        let url_safe = signer
            .sign(&ctx(), airports(), &cred("-_-_-_-_-_-_-_-_-_-_-A"))
            .await?;

        assert_eq!(
            standard.headers()[X_SIGNATURE],
            url_safe.headers()[X_SIGNATURE]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_missing_key_version() {
        let signer = signer(Config::default().with_key_version("v2"));

        let err = signer
            .sign(&ctx(), airports(), &cred(ZERO_KEY))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingKeyMaterial);
        assert!(err.to_string().contains("v2"));
    }

    #[tokio::test]
    async fn test_sign_rfc3339_date() -> anyhow::Result<()> {
        let signer = signer(Config::default().with_date_mode(DateMode::Rfc3339));

        let envelope = signer.sign(&ctx(), airports(), &cred(ZERO_KEY)).await?;

        assert_eq!(envelope.headers()[X_DATE], "2025-09-30T14:44:18.000Z");
        // The canonical string keeps epoch seconds, so the signature is unchanged.
        assert_eq!(
            envelope.headers()[X_SIGNATURE],
            "QrgunhwdNlr5S/QYpLgP5EYVjWIJdMV8aoFf4FWTU0c="
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_lowercase_method() -> anyhow::Result<()> {
        let signer = signer(Config::default());
        let req = ApiRequest::new(Method::from_bytes(b"get")?, "/airportslist")
            .with_query(airports().query().clone());

        let envelope = signer.sign(&ctx(), req, &cred(ZERO_KEY)).await?;

        assert_eq!(envelope.method(), Method::GET);
        assert_eq!(
            envelope.headers()[X_SIGNATURE],
            "QrgunhwdNlr5S/QYpLgP5EYVjWIJdMV8aoFf4FWTU0c="
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_rejects_bad_path() {
        let signer = signer(Config::default());

        for path in ["airportslist", "/airportslist?q=hamed", "/a#b", "/a b"] {
            let err = signer
                .sign(&ctx(), ApiRequest::get(path), &cred(ZERO_KEY))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RequestInvalid, "{path}");
        }
    }

    #[tokio::test]
    async fn test_sign_draws_fresh_nonce() -> anyhow::Result<()> {
        let ctx = Context::new().with_crypto(OsCrypto);
        let signer = signer(Config::default());

        let a = signer.sign(&ctx, airports(), &cred(ZERO_KEY)).await?;
        let b = signer.sign(&ctx, airports(), &cred(ZERO_KEY)).await?;

        assert_ne!(a.headers()[X_NONCE], b.headers()[X_NONCE]);
        assert_ne!(a.headers()[X_SIGNATURE], b.headers()[X_SIGNATURE]);

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_reports_degraded_entropy() -> anyhow::Result<()> {
        let observer = RecordingObserver::default();
        let ctx = Context::new()
            .with_crypto(FallbackCrypto::without_os_random())
            .with_observer(observer.clone());

        signer(Config::default())
            .sign(&ctx, airports(), &cred(ZERO_KEY))
            .await?;

        let events = observer.0.lock().unwrap().clone();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], "insecure");
        assert!(events[1].starts_with("signed:GET\n/airportslist\n"));

        Ok(())
    }

    #[tokio::test]
    async fn test_signed_event_masks_nonce() -> anyhow::Result<()> {
        let observer = RecordingObserver::default();
        let ctx = ctx().with_observer(observer.clone());

        signer(Config::default())
            .sign(&ctx, airports(), &cred(ZERO_KEY))
            .await?;

        let events = observer.0.lock().unwrap().clone();
        assert_eq!(events.len(), 1);
        assert!(events[0].contains("\n123e…4000\n"));
        assert!(!events[0].contains(NONCE));

        Ok(())
    }

    #[tokio::test]
    async fn test_envelope_debug_masks_secrets() -> anyhow::Result<()> {
        let envelope = signer(Config::default())
            .sign(&ctx(), airports(), &cred(ZERO_KEY))
            .await?;
        let out = format!("{envelope:?}");

        assert!(!out.contains("QrgunhwdNlr5S/QYpLgP5EYVjWIJdMV8aoFf4FWTU0c="));
        assert!(!out.contains(NONCE));
        assert!(out.contains("Qrgu…U0c="));

        Ok(())
    }

    #[tokio::test]
    async fn test_into_request() -> anyhow::Result<()> {
        let envelope = signer(Config::default().with_base_url("https://api.example.com"))
            .sign(&ctx(), airports(), &cred(ZERO_KEY))
            .await?;

        let req = envelope.into_request()?;
        assert_eq!(req.method(), Method::GET);
        assert_eq!(
            req.uri().to_string(),
            "https://api.example.com/airportslist?limit=20&page=1&q=hamed"
        );
        assert_eq!(req.headers().len(), 6);
        assert!(req.body().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_is_deterministic() -> anyhow::Result<()> {
        let key = [0u8; 16];

        let first = sign(&ctx(), &key, "GET\n/airportslist").await?;
        let second = sign(&ctx(), &key, "GET\n/airportslist").await?;
        let changed = sign(&ctx(), &key, "GET\n/airportslisu").await?;

        assert_eq!(first, second);
        assert_ne!(first, changed);

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_with_empty_key() {
        let err = sign(&ctx(), b"", "GET").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingKeyMaterial);
    }
}

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

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use reqseal_core::encode::Query;
use reqseal_core::{Context, Error, ProvideCredential, Result, SignEvent, SigningCredential};

use crate::config::Config;
use crate::credential::Credential;
use crate::provide_credential::DefaultCredentialProvider;
use crate::sign_request::{ApiRequest, RequestSigner, SignedEnvelope};

/// Client signs requests and hands them to the configured [`HttpSend`](reqseal_core::HttpSend).
///
/// The credential is loaded once when the client is built and stays
/// read-only afterwards, so a client can be shared across tasks.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    signer: Arc<RequestSigner>,
    credential: Arc<Credential>,
}

impl Client {
    /// Create a client with an already loaded credential.
    ///
    /// Fails with `CredentialInvalid` if the client id is empty or no secret
    /// is present.
    pub fn new(ctx: Context, config: Arc<Config>, credential: Credential) -> Result<Self> {
        if !credential.is_valid() {
            return Err(Error::credential_invalid(
                "credential must carry a client id and at least one secret",
            ));
        }

        Ok(Self {
            ctx,
            signer: Arc::new(RequestSigner::new(config)),
            credential: Arc::new(credential),
        })
    }

    /// Load config and credential through the default provider chain.
    ///
    /// `config` is merged with env values first; explicit fields win.
    pub async fn load(ctx: Context, config: Config) -> Result<Self> {
        let config = Arc::new(config.from_env(&ctx)?);
        let provider = DefaultCredentialProvider::with_config(config.clone());
        Self::load_with(ctx, config, &provider).await
    }

    /// Load the credential from `provider`.
    pub async fn load_with(
        ctx: Context,
        config: Arc<Config>,
        provider: &impl ProvideCredential<Credential = Credential>,
    ) -> Result<Self> {
        let credential = provider
            .provide_credential(&ctx)
            .await?
            .ok_or_else(|| Error::credential_invalid("no credential found for the client"))?;

        Self::new(ctx, config, credential)
    }

    #[cfg(test)]
    fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = Arc::new(signer);
        self
    }

    /// The context this client uses.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The config this client signs with.
    pub fn config(&self) -> &Config {
        self.signer.config()
    }

    /// Sign `req` without sending it.
    pub async fn sign(&self, req: ApiRequest) -> Result<SignedEnvelope> {
        self.signer.sign(&self.ctx, req, &self.credential).await
    }

    /// Sign and send `req`, returning the raw response.
    ///
    /// A non-success status is not an error here; it is reported to the
    /// observer and returned as is.
    pub async fn send(&self, req: ApiRequest) -> Result<http::Response<Bytes>> {
        let envelope = self.sign(req).await?;
        let method = envelope.method().clone();
        let url = envelope.url().to_string();

        let start = Instant::now();
        let resp = match self.ctx.http_send(envelope.into_request()?).await {
            Ok(resp) => resp,
            Err(err) => {
                self.ctx.observe(&SignEvent::Failed {
                    method: &method,
                    url: &url,
                    status: None,
                    error: &err,
                    elapsed: start.elapsed(),
                });
                return Err(err);
            }
        };
        let elapsed = start.elapsed();

        let status = resp.status();
        if status.is_success() {
            self.ctx.observe(&SignEvent::Finished {
                method: &method,
                url: &url,
                status,
                elapsed,
            });
        } else {
            let err = status_error(status, resp.body());
            self.ctx.observe(&SignEvent::Failed {
                method: &method,
                url: &url,
                status: Some(status),
                error: &err,
                elapsed,
            });
        }

        Ok(resp)
    }

    /// Sign and send `req`, decoding a JSON response.
    ///
    /// A non-success status fails with `Unexpected` and the message
    /// `HTTP <status>: <body>`.
    pub async fn send_json<T: DeserializeOwned>(&self, req: ApiRequest) -> Result<T> {
        let resp = self.send(req).await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(status, resp.body()));
        }

        serde_json::from_slice(resp.body()).map_err(|e| {
            Error::unexpected(format!("failed to decode response body as json: {e}"))
                .with_source(e)
        })
    }

    /// `GET path?query` decoding a JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query) -> Result<T> {
        self.send_json(ApiRequest::get(path).with_query(query)).await
    }

    /// `POST path` with a JSON body, decoding a JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(ApiRequest::new(Method::POST, path).with_json(body)?)
            .await
    }
}

fn status_error(status: StatusCode, body: &[u8]) -> Error {
    let text = String::from_utf8_lossy(body);
    let text = if text.trim().is_empty() {
        status.canonical_reason().unwrap_or_default()
    } else {
        text.as_ref()
    };
    Error::unexpected(format!("HTTP {}: {}", status.as_u16(), text))
}

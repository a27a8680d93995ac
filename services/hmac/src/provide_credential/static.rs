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

use crate::Credential;
use async_trait::async_trait;
use reqseal_core::{Context, ProvideCredential, Result};
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};

use reqseal_core::utils::Redact;

/// StaticCredentialProvider provides a fixed client id and secrets.
///
/// Secrets are decoded when the credential is provided, so a malformed secret
/// surfaces from [`ProvideCredential::provide_credential`].
#[derive(Clone)]
pub struct StaticCredentialProvider {
    client_id: String,
    secrets: BTreeMap<String, String>,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider for `client_id`.
    pub fn new(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            secrets: BTreeMap::new(),
        }
    }

    /// Add an encoded secret for `version`.
    pub fn with_secret(mut self, version: &str, secret: &str) -> Self {
        self.secrets.insert(version.to_string(), secret.to_string());
        self
    }
}

impl Debug for StaticCredentialProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let secrets: BTreeMap<_, _> = self
            .secrets
            .iter()
            .map(|(k, v)| (k.as_str(), Redact::from(v)))
            .collect();

        f.debug_struct("StaticCredentialProvider")
            .field("client_id", &self.client_id)
            .field("secrets", &secrets)
            .finish()
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        let mut cred = Credential::new(self.client_id.clone());
        for (version, secret) in &self.secrets {
            cred.keys.insert(version, secret)?;
        }
        Ok(Some(cred))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqseal_core::ErrorKind;

    #[tokio::test]
    async fn test_static_credential_provider() -> anyhow::Result<()> {
        let provider = StaticCredentialProvider::new("web")
            .with_secret("v1", "AAAAAAAAAAAAAAAAAAAAAA==")
            .with_secret("v2", "AAAAAAAAAAAAAAAAAAAAAQ==");

        let cred = provider
            .provide_credential(&Context::new())
            .await?
            .expect("static provider always returns a credential");
        assert_eq!(cred.client_id, "web");
        assert_eq!(cred.keys.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_static_credential_provider_malformed_secret() {
        let provider = StaticCredentialProvider::new("web").with_secret("v1", "***");

        let err = provider
            .provide_credential(&Context::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_static_credential_provider_debug() {
        let provider =
            StaticCredentialProvider::new("web").with_secret("v1", "AAAAAAAAAAAAAAAAAAAAAQ==");
        let out = format!("{provider:?}");

        assert!(!out.contains("AAAAAAAAAAAAAAAAAAAAAQ=="));
    }
}

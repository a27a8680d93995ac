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

use crate::config::secrets_from_env;
use crate::{constants::*, Credential};
use async_trait::async_trait;
use reqseal_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `REQSEAL_CLIENT_ID`: The client id
/// - `REQSEAL_SECRET_<VERSION>`: One secret per key version, e.g. `REQSEAL_SECRET_V1`
///
/// Returns `None` if the client id is absent or no secret is set. Secret
/// names that differ only in case must carry the same value.
#[derive(Debug, Default)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let envs = ctx.env_vars();

        let Some(client_id) = envs.get(REQSEAL_CLIENT_ID).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        let mut cred = Credential::new(client_id);
        for (version, secret) in secrets_from_env(&envs)? {
            cred.keys.insert(&version, &secret)?;
        }

        if cred.keys.is_empty() {
            return Ok(None);
        }
        Ok(Some(cred))
    }
}

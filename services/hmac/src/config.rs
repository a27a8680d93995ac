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

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use reqseal_core::utils::Redact;
use reqseal_core::{Context, Error, Result};

use crate::constants::*;

/// How the `X-Date` header is rendered.
///
/// The canonical string always carries epoch seconds; this only selects the
/// header form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateMode {
    /// Decimal seconds since the Unix epoch, e.g. `1759243458`.
    #[default]
    Epoch,
    /// RFC 3339 UTC with milliseconds, e.g. `2025-09-30T14:44:18.000Z`.
    Rfc3339,
}

impl FromStr for DateMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "epoch" => Ok(DateMode::Epoch),
            "rfc3339" | "iso" => Ok(DateMode::Rfc3339),
            v => Err(Error::config_invalid(format!(
                "unknown date header mode {v:?}, expected epoch or rfc3339"
            ))),
        }
    }
}

impl Display for DateMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DateMode::Epoch => f.write_str("epoch"),
            DateMode::Rfc3339 => f.write_str("rfc3339"),
        }
    }
}

/// Config carries all the configuration for the signed client.
#[derive(Clone, Default)]
pub struct Config {
    /// `base_url` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`REQSEAL_API_BASE`]
    pub base_url: Option<String>,
    /// `client_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`REQSEAL_CLIENT_ID`]
    pub client_id: Option<String>,
    /// `key_version` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`REQSEAL_KEY_VERSION`]
    /// - default to `v1`
    pub key_version: Option<String>,
    /// Encoded secrets keyed by key version.
    ///
    /// Env values named `REQSEAL_SECRET_<VERSION>` fill versions that are not
    /// set here. Versions are stored lowercased.
    pub secrets: BTreeMap<String, String>,
    /// `date_mode` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`REQSEAL_DATE_HEADER`]
    /// - default to [`DateMode::Epoch`]
    pub date_mode: Option<DateMode>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let secrets: BTreeMap<_, _> = self
            .secrets
            .iter()
            .map(|(k, v)| (k.as_str(), Redact::from(v)))
            .collect();

        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("key_version", &self.key_version)
            .field("secrets", &secrets)
            .field("date_mode", &self.date_mode)
            .finish()
    }
}

impl Config {
    /// Set the api base url.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the client id.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the key version used for signing.
    pub fn with_key_version(mut self, key_version: impl Into<String>) -> Self {
        self.key_version = Some(key_version.into());
        self
    }

    /// Add an encoded secret for `version`.
    pub fn with_secret(mut self, version: impl AsRef<str>, secret: impl Into<String>) -> Self {
        self.secrets
            .insert(version.as_ref().to_ascii_lowercase(), secret.into());
        self
    }

    /// Set the `X-Date` header mode.
    pub fn with_date_mode(mut self, mode: DateMode) -> Self {
        self.date_mode = Some(mode);
        self
    }

    /// Load config from env.
    ///
    /// Fields that are already set win over env values. Returns
    /// [`ErrorKind::ConfigInvalid`](reqseal_core::ErrorKind::ConfigInvalid) if
    /// [`REQSEAL_DATE_HEADER`] names an unknown mode.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        let envs = ctx.env_vars();

        if let Some(v) = envs.get(REQSEAL_API_BASE) {
            self.base_url.get_or_insert(v.clone());
        }
        if let Some(v) = envs.get(REQSEAL_CLIENT_ID) {
            self.client_id.get_or_insert(v.clone());
        }
        if let Some(v) = envs.get(REQSEAL_KEY_VERSION) {
            self.key_version.get_or_insert(v.clone());
        }
        if self.date_mode.is_none() {
            if let Some(v) = envs.get(REQSEAL_DATE_HEADER) {
                self.date_mode = Some(v.parse()?);
            }
        }

        for (version, secret) in secrets_from_env(&envs)? {
            self.secrets.entry(version).or_insert(secret);
        }

        Ok(self)
    }

    /// The api base url with trailing `/` removed, empty if unset.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
    }

    /// The key version used for signing.
    pub fn key_version(&self) -> &str {
        match self.key_version.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => DEFAULT_KEY_VERSION,
        }
    }

    /// The `X-Date` header mode.
    pub fn date_mode(&self) -> DateMode {
        self.date_mode.unwrap_or_default()
    }

    /// Join base url, path and canonical query into the request url.
    pub fn url(&self, path: &str, query: &str) -> String {
        let base = self.base_url();
        let mut url = String::with_capacity(base.len() + path.len() + query.len() + 1);
        url.push_str(base);
        url.push_str(path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        url
    }
}

/// Collect non-blank `REQSEAL_SECRET_<VERSION>` values keyed by lowercased
/// version.
///
/// Names that differ only in case, like `REQSEAL_SECRET_V1` and
/// `REQSEAL_SECRET_v1`, must agree on the value or the load fails with
/// `ConfigInvalid`.
pub(crate) fn secrets_from_env(
    envs: &HashMap<String, String>,
) -> Result<BTreeMap<String, String>> {
    let mut names: Vec<&String> = envs
        .keys()
        .filter(|k| {
            k.strip_prefix(REQSEAL_SECRET_PREFIX)
                .is_some_and(|v| !v.is_empty())
        })
        .collect();
    names.sort();

    let mut found: BTreeMap<String, (&str, &str)> = BTreeMap::new();
    for name in names {
        let value = envs[name].as_str();
        if value.trim().is_empty() {
            continue;
        }
        let version = name[REQSEAL_SECRET_PREFIX.len()..].to_ascii_lowercase();
        match found.get(&version) {
            Some((first, existing)) if *existing != value => {
                return Err(Error::config_invalid(format!(
                    "{first} and {name} set different secrets for key version {version}"
                )));
            }
            Some(_) => {}
            None => {
                found.insert(version, (name.as_str(), value));
            }
        }
    }

    Ok(found
        .into_iter()
        .map(|(version, (_, value))| (version, value.to_string()))
        .collect())
}

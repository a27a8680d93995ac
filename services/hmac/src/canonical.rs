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

use std::fmt;
use std::fmt::Write;

use reqseal_core::utils::Redact;

/// The seven fields covered by the signature.
///
/// The field order is part of the wire contract and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalParts {
    /// HTTP method, uppercased when built.
    pub method: String,
    /// Literal request path, used verbatim.
    pub path: String,
    /// Sorted, encoded query string. May be empty.
    pub query: String,
    /// Lowercase hex SHA-256 of the body bytes.
    pub body_digest_hex: String,
    /// Seconds since the Unix epoch, decimal.
    pub epoch_seconds: String,
    /// UUID v4 nonce.
    pub nonce: String,
    /// Key version selecting the secret, e.g. `v1`.
    pub key_version: String,
}

impl CanonicalParts {
    /// Build the canonical string.
    ///
    /// ## Format
    ///
    /// ```text
    /// METHOD + "\n" +
    /// Path + "\n" +
    /// CanonicalQuery + "\n" +
    /// HexSha256(Body) + "\n" +
    /// EpochSeconds + "\n" +
    /// Nonce + "\n" +
    /// KeyVersion
    /// ```
    ///
    /// There is no trailing newline. The verifier recomputes this string from
    /// the request it receives, so the output must match byte for byte.
    pub fn build(&self) -> CanonicalString {
        CanonicalString(self.render(&self.nonce))
    }

    /// Build the canonical string with the nonce masked, for diagnostics.
    pub fn build_redacted(&self) -> String {
        self.render(&Redact::from(&self.nonce).to_string())
    }

    fn render(&self, nonce: &str) -> String {
        let mut s = String::with_capacity(
            self.method.len()
                + self.path.len()
                + self.query.len()
                + self.body_digest_hex.len()
                + self.epoch_seconds.len()
                + nonce.len()
                + self.key_version.len()
                + 6,
        );

        // Writing into a String never fails.
        let _ = write!(
            s,
            "{}\n{}\n{}\n{}\n{}\n{}\n{}",
            self.method.to_ascii_uppercase(),
            self.path,
            self.query,
            self.body_digest_hex,
            self.epoch_seconds,
            nonce,
            self.key_version
        );
        s
    }
}

/// The string that is signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalString(String);

impl CanonicalString {
    /// View as str.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqseal_core::hash::EMPTY_SHA256_HEX;

    fn airports_parts() -> CanonicalParts {
        CanonicalParts {
            method: "GET".to_string(),
            path: "/airportslist".to_string(),
            query: "limit=20&page=1&q=hamed".to_string(),
            body_digest_hex: EMPTY_SHA256_HEX.to_string(),
            epoch_seconds: "1759243458".to_string(),
            nonce: "123e4567-e89b-42d3-a456-426614174000".to_string(),
            key_version: "v1".to_string(),
        }
    }

    #[test]
    fn test_build() {
        assert_eq!(
            airports_parts().build().as_str(),
            "GET\n/airportslist\nlimit=20&page=1&q=hamed\ne3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855\n1759243458\n123e4567-e89b-42d3-a456-426614174000\nv1"
        );
    }

    #[test]
    fn test_build_is_pure() {
        let parts = airports_parts();
        assert_eq!(parts.build(), parts.build());
        assert_eq!(parts.clone().build(), parts.build());
    }

    #[test]
    fn test_build_has_seven_lines_and_no_trailing_newline() {
        let mut parts = airports_parts();
        parts.query = String::new();
        let s = parts.build().into_string();

        assert!(!s.ends_with('\n'));
        assert_eq!(s.split('\n').count(), 7);
        assert_eq!(s.split('\n').nth(2), Some(""));
    }

    #[test]
    fn test_build_uppercases_method() {
        let mut parts = airports_parts();
        parts.method = "get".to_string();

        assert_eq!(parts.build(), airports_parts().build());
    }

    #[test]
    fn test_build_changes_with_every_field() {
        let base = airports_parts().build();
        let mutations: Vec<fn(&mut CanonicalParts)> = vec![
            |p| p.method = "POST".to_string(),
            |p| p.path = "/airports_list".to_string(),
            |p| p.query = "limit=20&page=2&q=hamed".to_string(),
            |p| p.body_digest_hex = "0".repeat(64),
            |p| p.epoch_seconds = "1759243459".to_string(),
            |p| p.nonce = "123e4567-e89b-42d3-a456-426614174001".to_string(),
            |p| p.key_version = "v2".to_string(),
            |p| std::mem::swap(&mut p.path, &mut p.query),
            |p| std::mem::swap(&mut p.epoch_seconds, &mut p.key_version),
        ];

        for mutate in mutations {
            let mut parts = airports_parts();
            mutate(&mut parts);
            assert_ne!(parts.build(), base, "{parts:?}");
        }
    }

    #[test]
    fn test_build_redacted_masks_nonce() {
        let redacted = airports_parts().build_redacted();

        assert!(redacted.contains("\n123e…4000\n"));
        assert!(!redacted.contains("426614174000"));
    }
}

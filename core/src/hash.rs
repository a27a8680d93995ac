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

//! Hash related utils.

use crate::Error;
use base64::alphabet;
use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::general_purpose::GeneralPurposeConfig;
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hmac::Hmac;
use hmac::Mac;
use sha2::Digest;
use sha2::Sha256;

/// SHA-256 of the empty input, lowercase hex.
///
/// This is the body digest of every request that carries no body.
pub const EMPTY_SHA256_HEX: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Standard alphabet engine that ignores non-zero trailing bits, the way
/// browser `atob` does.
const BASE64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

/// Normalize standard or URL-safe base64, padded or not, into padded
/// standard base64.
///
/// Whitespace is dropped, `-` becomes `+`, `_` becomes `/` and `=` is
/// appended until the length is a multiple of 4.
pub fn normalize_base64(content: &str) -> String {
    let mut s: String = content
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    let pad = (4 - s.len() % 4) % 4;
    s.extend(std::iter::repeat('=').take(pad));
    s
}

/// Decode key material as it arrives from configuration.
///
/// Both standard and URL-safe alphabets are accepted, with or without
/// padding. Non-zero trailing bits in the last symbol are ignored.
pub fn decode_key_material(content: &str) -> crate::Result<Vec<u8>> {
    BASE64_LENIENT
        .decode(normalize_base64(content))
        .map_err(|e| Error::config_invalid("key material is not valid base64").with_source(e))
}

/// SHA256 hash.
pub fn sha256(content: &[u8]) -> [u8; 32] {
    Sha256::digest(content).into()
}

/// Hex encoded SHA256 hash.
///
/// Use this function instead of `hex::encode(sha256(content))` can reduce
/// extra copy.
pub fn hex_sha256(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content).as_slice())
}

/// HMAC with SHA256 hash.
pub fn hmac_sha256(key: &[u8], content: &[u8]) -> [u8; 32] {
    // SAFETY: HMAC's new_from_slice always returns Ok - it handles any key length
    let mut h = Hmac::<Sha256>::new_from_slice(key).unwrap();
    h.update(content);

    h.finalize().into_bytes().into()
}

/// Base64 encoded HMAC with SHA256 hash.
pub fn base64_hmac_sha256(key: &[u8], content: &[u8]) -> String {
    base64_encode(&hmac_sha256(key, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_hex_sha256_empty() {
        assert_eq!(hex_sha256(b""), EMPTY_SHA256_HEX);
    }

    #[test_case(b"abc", "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"; "abc")]
    #[test_case(br#"{"icao":"OIII","hours":2}"#, "a702e7e19d01e714bae128b8e8845afb168a63ec9c678572cd376b992ec5be0d"; "json body")]
    fn test_hex_sha256(input: &[u8], expected: &str) {
        let actual = hex_sha256(input);
        assert_eq!(actual, expected);
        assert_eq!(actual.len(), 64);
        assert!(actual
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_base64_hmac_sha256() {
        assert_eq!(
            base64_hmac_sha256(b"key", b"The quick brown fox jumps over the lazy dog"),
            "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg="
        );
    }

    #[test_case("AAAAAAAAAAAAAAAAAAAAAA==", "AAAAAAAAAAAAAAAAAAAAAA=="; "already padded")]
    #[test_case("AAAAAAAAAAAAAAAAAAAAAA", "AAAAAAAAAAAAAAAAAAAAAA=="; "missing padding")]
    #[test_case("-_-_-_-_-_-_-_-_-_-_-A", "+/+/+/+/+/+/+/+/+/+/+A=="; "url safe")]
    #[test_case("  AAAA\nAAA ", "AAAAAAA="; "whitespace")]
    #[test_case("", ""; "empty")]
    fn test_normalize_base64(input: &str, expected: &str) {
        assert_eq!(normalize_base64(input), expected);
    }

    #[test]
    fn test_decode_key_material() {
        assert_eq!(
            decode_key_material("AAAAAAAAAAAAAAAAAAAAAA").unwrap(),
            vec![0u8; 16]
        );
        assert_eq!(
            hex::encode(decode_key_material("-_-_-_-_-_-_-_-_-_-_-A").unwrap()),
            "fbffbffbffbffbffbffbffbffbffbff8"
        );

        let err = decode_key_material("not*base64").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test_case("AAAAAAAAAAAAAAAAAAAAAB==", vec![0u8; 16]; "padded")]
    #[test_case("AAAAAAAAAAAAAAAAAAAAAP", vec![0u8; 16]; "unpadded")]
    #[test_case("AB==", vec![0u8]; "single byte")]
    fn test_decode_key_material_ignores_trailing_bits(input: &str, expected: Vec<u8>) {
        assert!(BASE64_STANDARD.decode(normalize_base64(input)).is_err());
        assert_eq!(decode_key_material(input).unwrap(), expected);
    }
}

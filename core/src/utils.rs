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

//! Utility functions and types.

use std::fmt::Debug;
use std::fmt::Display;

/// Redacts a string by keeping only the first and last four characters.
///
/// - If the input string has 8 characters or fewer, it is entirely redacted.
/// - Otherwise only the first four and the last four characters are kept,
///   joined by `…`.
///
/// This is the only form in which signatures, nonces and secrets may be
/// emitted to logs.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            None => Redact(""),
            Some(v) => Redact(v),
        }
    }
}

impl Display for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.chars().count();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length <= 8 {
            f.write_str("****")
        } else {
            let head: String = self.0.chars().take(4).collect();
            let tail: String = self.0.chars().skip(length - 4).collect();
            f.write_str(&head)?;
            f.write_str("…")?;
            f.write_str(&tail)
        }
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact() {
        let cases = vec![
            ("Short", "****"),
            ("12345678", "****"),
            ("123456789", "1234…6789"),
            ("QrgunhwdNlr5S/QYpLgP5EYVjWIJdMV8aoFf4FWTU0c=", "Qrgu…U0c="),
            ("123e4567-e89b-42d3-a456-426614174000", "123e…4000"),
            ("", "EMPTY"),
            ("سلام دنیا عزیز", "سلام…عزیز"),
        ];

        for (input, expected) in cases {
            assert_eq!(
                format!("{:?}", Redact(input)),
                expected,
                "Failed on input: {}",
                input
            );
            assert_eq!(Redact::from(input).to_string(), expected);
        }
    }

    #[test]
    fn test_redact_option() {
        assert_eq!(format!("{:?}", Redact::from(&None::<String>)), "EMPTY");
        assert_eq!(
            format!("{:?}", Redact::from(&Some("secret-value".to_string()))),
            "secr…alue"
        );
    }
}

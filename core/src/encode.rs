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

//! RFC 3986 percent-encoding and query canonicalization.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

/// AsciiSet for [RFC 3986](https://www.rfc-editor.org/rfc/rfc3986#section-2.3)
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
///
/// Unlike most URI component encoders, `!`, `'`, `(`, `)` and `*` are encoded as well.
pub static RFC3986_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode the UTF-8 bytes of `s` with uppercase hex digits.
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, &RFC3986_ENCODE_SET).to_string()
}

/// Percent-decode `s`, replacing invalid UTF-8 sequences.
pub fn percent_decode(s: &str) -> Cow<'_, str> {
    percent_decode_str(s).decode_utf8_lossy()
}

/// A scalar query parameter value.
///
/// `Null` and empty strings are dropped during canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Absent value.
    Null,
    /// String value.
    Str(String),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    UInt(u64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
}

impl QueryValue {
    /// Returns true if this value is dropped from the canonical query.
    pub fn is_absent(&self) -> bool {
        match self {
            QueryValue::Null => true,
            QueryValue::Str(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Null => Ok(()),
            QueryValue::Str(v) => f.write_str(v),
            QueryValue::Int(v) => write!(f, "{v}"),
            QueryValue::UInt(v) => write!(f, "{v}"),
            QueryValue::Bool(v) => write!(f, "{v}"),
            QueryValue::Float(v) => f.write_str(&render_float(*v)),
        }
    }
}

/// Render a float the way ECMAScript `Number#toString` does.
///
/// Digits are the shortest round-trip form. Plain notation is used for
/// decimal exponents in `-6..21`, scientific notation (`1e+21`, `1.5e-7`)
/// outside of it. `-0` renders as `0`.
fn render_float(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest digits as `d[.ddd]e<exp>`.
    let sci = format!("{:e}", v.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let n = exp + 1;

    let mut s = String::with_capacity(digits.len() + 8);
    if v < 0.0 {
        s.push('-');
    }
    if k <= n && n <= 21 {
        s.push_str(&digits);
        s.extend(std::iter::repeat('0').take((n - k) as usize));
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        s.push_str(int);
        s.push('.');
        s.push_str(frac);
    } else if -6 < n && n <= 0 {
        s.push_str("0.");
        s.extend(std::iter::repeat('0').take((-n) as usize));
        s.push_str(&digits);
    } else {
        let (first, rest) = digits.split_at(1);
        s.push_str(first);
        if !rest.is_empty() {
            s.push('.');
            s.push_str(rest);
        }
        s.push('e');
        s.push(if n - 1 < 0 { '-' } else { '+' });
        s.push_str(&(n - 1).abs().to_string());
    }
    s
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Str(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Str(v)
    }
}

impl From<&String> for QueryValue {
    fn from(v: &String) -> Self {
        QueryValue::Str(v.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

impl From<f32> for QueryValue {
    /// Widens through the shortest decimal form of the `f32`, so `0.1f32`
    /// renders as `0.1`.
    fn from(v: f32) -> Self {
        QueryValue::Float(v.to_string().parse().unwrap_or(v as f64))
    }
}

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        QueryValue::Float(v)
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($t:ty),+) => {
        $(
            impl From<$t> for QueryValue {
                fn from(v: $t) -> Self {
                    QueryValue::$variant(v as $target)
                }
            }
        )+
    };
}

impl_from_int!(Int, i64, i8, i16, i32, i64);
impl_from_int!(UInt, u64, u8, u16, u32, u64, usize);

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(QueryValue::Null)
    }
}

/// Query parameters of a request.
///
/// Behaves as a mapping: setting the same key twice keeps the last value.
/// Keys are kept in byte-wise order, so the insertion order never leaks
/// into [`Query::canonical`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    params: BTreeMap<String, QueryValue>,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, consuming and returning the query.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a parameter.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.params.insert(key.into(), value.into());
    }

    /// Get a parameter.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.params.get(key)
    }

    /// Number of parameters, including absent ones.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Build the canonical query string.
    ///
    /// See [`canonical_query`].
    pub fn canonical(&self) -> String {
        canonical_query(self.params.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (k, v) in iter {
            query.set(k, v);
        }
        query
    }
}

/// Build a stable query string.
///
/// - entries with an absent value (null or empty string) are dropped
/// - the rest are sorted by key with byte-wise ascending comparison
/// - every key and value is encoded by [`percent_encode`]
///
/// ```shell
/// [(q, hamed), (page, 1), (limit, 20)] => "limit=20&page=1&q=hamed"
/// ```
///
/// Empty input yields an empty string.
pub fn canonical_query<'a>(params: impl IntoIterator<Item = (&'a str, &'a QueryValue)>) -> String {
    let mut entries: Vec<(&str, &QueryValue)> = params
        .into_iter()
        .filter(|(_, v)| !v.is_absent())
        .collect();
    // Stable, so duplicate keys keep their input order.
    entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

    let mut s = String::with_capacity(16);
    for (idx, (k, v)) in entries.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }

        s.push_str(&percent_encode(k));
        s.push('=');
        s.push_str(&percent_encode(&v.to_string()));
    }

    s
}

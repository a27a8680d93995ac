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

//! Time related utils.

use chrono::SecondsFormat;
use chrono::TimeZone;
use chrono::Utc;

use crate::Error;
use crate::Result;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
///
/// The wall clock is read on every call.
pub fn now() -> DateTime {
    Utc::now()
}

/// Seconds since the Unix epoch as a decimal string: "1759243458"
pub fn format_epoch_seconds(t: DateTime) -> String {
    t.timestamp().to_string()
}

/// Seconds since the Unix epoch of now, as a decimal string.
pub fn now_epoch_seconds() -> String {
    format_epoch_seconds(now())
}

/// Format time into RFC 3339 with millisecond precision: "2025-09-30T14:44:18.000Z"
pub fn format_rfc3339(t: DateTime) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a decimal epoch seconds string back into time.
pub fn parse_epoch_seconds(s: &str) -> Result<DateTime> {
    let secs: i64 = s
        .parse()
        .map_err(|e| Error::request_invalid(format!("invalid epoch seconds: {s}")).with_source(e))?;
    if secs < 0 {
        return Err(Error::request_invalid(format!(
            "epoch seconds must not be negative: {s}"
        )));
    }

    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| Error::request_invalid(format!("epoch seconds out of range: {s}")))
}

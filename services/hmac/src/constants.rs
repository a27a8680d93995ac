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

// Headers attached to every signed request.
pub const X_CLIENT_ID: &str = "x-client-id";
pub const X_KEY_VERSION: &str = "x-key-version";
pub const X_DATE: &str = "x-date";
pub const X_NONCE: &str = "x-nonce";
pub const X_SIGNATURE: &str = "x-signature";

pub const CONTENT_TYPE_JSON: &str = "application/json";

// Env values used to configure the signer.
pub const REQSEAL_API_BASE: &str = "REQSEAL_API_BASE";
pub const REQSEAL_CLIENT_ID: &str = "REQSEAL_CLIENT_ID";
pub const REQSEAL_KEY_VERSION: &str = "REQSEAL_KEY_VERSION";
pub const REQSEAL_DATE_HEADER: &str = "REQSEAL_DATE_HEADER";
/// Secrets live in `REQSEAL_SECRET_<VERSION>`, e.g. `REQSEAL_SECRET_V1`.
pub const REQSEAL_SECRET_PREFIX: &str = "REQSEAL_SECRET_";

pub const DEFAULT_KEY_VERSION: &str = "v1";

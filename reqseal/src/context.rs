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

use reqseal_core::{Context, LogObserver, OsCrypto, OsEnv};
use reqseal_http_send_reqwest::ReqwestHttpSend;

/// Create a context with the components most users want:
///
/// - reqwest based HTTP sending
/// - OS environment
/// - OS randomness, failing instead of degrading
/// - diagnostics through the `log` facade
pub fn default_context() -> Context {
    Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
        .with_crypto(OsCrypto)
        .with_observer(LogObserver)
}

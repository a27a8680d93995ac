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

use std::sync::Arc;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use reqseal_core::encode::Query;
use reqseal_core::{Context, OsCrypto};
use reqseal_hmac::{ApiRequest, CanonicalParts, Config, Credential, RequestSigner};

criterion_group!(benches, bench);
criterion_main!(benches);

pub fn bench(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("must success");

    let mut group = c.benchmark_group("hmac");

    group.bench_function("canonical_query", |b| {
        let query = Query::new()
            .with("q", "tehran")
            .with("page", 1)
            .with("limit", 20)
            .with("country", "IR")
            .with("name", "مهرآباد");

        b.iter(|| query.canonical())
    });

    group.bench_function("canonical_string", |b| {
        let parts = CanonicalParts {
            method: "GET".to_string(),
            path: "/airports_list".to_string(),
            query: "limit=20&page=1&q=tehran".to_string(),
            body_digest_hex: reqseal_core::hash::EMPTY_SHA256_HEX.to_string(),
            epoch_seconds: "1759243458".to_string(),
            nonce: "123e4567-e89b-42d3-a456-426614174000".to_string(),
            key_version: "v1".to_string(),
        };

        b.iter(|| parts.build())
    });

    group.bench_function("sign_get", |b| {
        let ctx = Context::new().with_crypto(OsCrypto);
        let cred = Credential::new("bench")
            .with_secret("v1", "AAAAAAAAAAAAAAAAAAAAAA==")
            .expect("secret must be valid");
        let signer = RequestSigner::new(Arc::new(
            Config::default().with_base_url("https://api.example.com"),
        ));

        b.to_async(&runtime).iter(|| async {
            let req = ApiRequest::get("/airports_list")
                .with_param("q", "tehran")
                .with_param("limit", 20);
            signer.sign(&ctx, req, &cred).await.expect("must success")
        })
    });

    group.bench_function("sign_post_json", |b| {
        let ctx = Context::new().with_crypto(OsCrypto);
        let cred = Credential::new("bench")
            .with_secret("v1", "AAAAAAAAAAAAAAAAAAAAAA==")
            .expect("secret must be valid");
        let signer = RequestSigner::new(Arc::new(Config::default()));
        let body = serde_json::json!({"icao": "OIII", "hours": 2});

        b.to_async(&runtime).iter(|| async {
            let req = ApiRequest::post("/wx/metar")
                .with_json(&body)
                .expect("body must serialize");
            signer.sign(&ctx, req, &cred).await.expect("must success")
        })
    });

    group.finish();
}

use credhub_sdk::{select, Auth, ClientBuilder, Credential, CredentialValue, VersionSelection};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use std::time::Duration;
use tokio::runtime::Runtime;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn versions(count: usize) -> Vec<Credential> {
    (0..count)
        .map(|i| {
            let mut cred = Credential::new("/bench", CredentialValue::Password(format!("pw-{}", i)));
            cred.id = i.to_string();
            // Scrambled, with duplicate timestamps
            cred.created = format!("2020-01-01T00:{:02}:00Z", (i * 7) % 60);
            cred
        })
        .collect()
}

fn user_credential() -> serde_json::Value {
    json!({
        "id": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
        "name": "/bench/user",
        "type": "user",
        "version_created_at": "2020-01-01T00:00:00Z",
        "value": {
            "username": "me",
            "password": "super-secret",
            "password_hash": "h"
        }
    })
}

/// Create a mock server with a latest-version endpoint
async fn setup_mock_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [user_credential()]}))
                .set_delay(Duration::from_millis(5)), // Simulate network latency
        )
        .mount(&server)
        .await;

    server
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");

    for size in [10usize, 100, 1000] {
        let input = versions(size);

        group.bench_with_input(BenchmarkId::new("all", size), &input, |b, input| {
            b.iter(|| select(black_box(input.clone()), VersionSelection::All))
        });

        group.bench_with_input(BenchmarkId::new("most_recent_5", size), &input, |b, input| {
            b.iter(|| select(black_box(input.clone()), VersionSelection::MostRecent(5)))
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let raw = user_credential();

    c.bench_function("decode_user_fresh", |b| {
        b.iter(|| {
            let cred: Credential = serde_json::from_value(black_box(raw.clone())).unwrap();
            cred.as_user().map(|u| u.username.len()).unwrap()
        })
    });

    let cred: Credential = serde_json::from_value(raw.clone()).unwrap();
    c.bench_function("decode_user_memoized", |b| {
        b.iter(|| black_box(&cred).as_user().map(|u| u.username.len()).unwrap())
    });
}

fn bench_get_latest(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(setup_mock_server());

    let client = ClientBuilder::new(server.uri())
        .auth(Auth::bearer("bench-token"))
        .allow_insecure_http()
        .build()
        .unwrap();

    c.bench_function("get_latest_by_name", |b| {
        b.iter(|| {
            rt.block_on(async {
                client
                    .get_latest_by_name(black_box("/bench/user"))
                    .await
                    .unwrap()
            })
        })
    });
}

criterion_group!(benches, bench_select, bench_decode, bench_get_latest);
criterion_main!(benches);

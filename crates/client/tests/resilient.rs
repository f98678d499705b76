use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::header::HeaderMap;
use tokio::net::TcpListener;

use client::{CircuitState, ClientConfig, ClientError, ResilientClient};

#[derive(Clone, Default)]
struct Hits {
    failing: Arc<AtomicU32>,
    ok: Arc<AtomicU32>,
    missing: Arc<AtomicU32>,
}

async fn failing(State(hits): State<Hits>) -> StatusCode {
    hits.failing.fetch_add(1, Ordering::SeqCst);
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn ok(State(hits): State<Hits>) -> Json<serde_json::Value> {
    hits.ok.fetch_add(1, Ordering::SeqCst);
    Json(serde_json::json!({"status": "ok"}))
}

async fn missing(State(hits): State<Hits>) -> StatusCode {
    hits.missing.fetch_add(1, Ordering::SeqCst);
    StatusCode::NOT_FOUND
}

async fn start_stub() -> (String, String, Hits) {
    let hits = Hits::default();
    let app = Router::new()
        .route("/fail", get(failing).post(failing))
        .route("/ok", get(ok))
        .route("/missing", get(missing))
        .route("/echo", post(ok))
        .with_state(hits.clone());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind stub");
    let addr: SocketAddr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("stub server error: {}", e);
        }
    });
    (
        format!("http://{}:{}", addr.ip(), addr.port()),
        format!("{}:{}", addr.ip(), addr.port()),
        hits,
    )
}

fn test_config() -> ClientConfig {
    ClientConfig {
        max_attempts: 3,
        backoff_base_ms: 5,
        attempt_timeout_ms: 1_000,
        failure_threshold: 3,
        cooldown_ms: 200,
    }
}

#[tokio::test]
async fn retries_then_opens_breaker_and_short_circuits() {
    let (base, host, hits) = start_stub().await;
    let client = ResilientClient::new(test_config()).expect("client");

    // one logical call, three failing attempts
    let err = client
        .get(&format!("{base}/fail"), HeaderMap::new())
        .await
        .expect_err("should exhaust retries");
    assert!(matches!(err, ClientError::Unavailable { attempts: 3, .. }));
    assert_eq!(hits.failing.load(Ordering::SeqCst), 3);
    assert_eq!(client.breaker().state_of(&host), CircuitState::Open);

    // breaker open: rejected before any network attempt
    let err = client
        .get(&format!("{base}/ok"), HeaderMap::new())
        .await
        .expect_err("breaker should be open");
    assert!(matches!(err, ClientError::CircuitOpen(_)));
    assert_eq!(hits.ok.load(Ordering::SeqCst), 0);

    // after the cooldown the next call goes through and resets the entry
    tokio::time::sleep(Duration::from_millis(250)).await;
    let resp = client
        .get(&format!("{base}/ok"), HeaderMap::new())
        .await
        .expect("call after cooldown");
    assert!(resp.status().is_success());
    assert_eq!(hits.ok.load(Ordering::SeqCst), 1);
    assert_eq!(client.breaker().state_of(&host), CircuitState::Closed);
    assert_eq!(client.breaker().failures(&host), 0);
}

#[tokio::test]
async fn backoff_delays_are_monotonically_increasing() {
    let (base, _host, hits) = start_stub().await;
    let cfg = ClientConfig {
        backoff_base_ms: 30,
        ..test_config()
    };
    let client = ResilientClient::new(cfg).expect("client");

    let started = std::time::Instant::now();
    let _ = client.get(&format!("{base}/fail"), HeaderMap::new()).await;
    // 30 + 60 + 90 ms of linear backoff
    assert!(started.elapsed() >= Duration::from_millis(180));
    assert_eq!(hits.failing.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn client_errors_are_definitive_and_not_retried() {
    let (base, host, hits) = start_stub().await;
    let client = ResilientClient::new(test_config()).expect("client");

    let resp = client
        .get(&format!("{base}/missing"), HeaderMap::new())
        .await
        .expect("4xx is returned, not raised");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(hits.missing.load(Ordering::SeqCst), 1);

    // definitive responses still count toward the breaker
    assert_eq!(client.breaker().failures(&host), 1);
}

#[tokio::test]
async fn success_clears_accumulated_failures() {
    let (base, host, hits) = start_stub().await;
    let client = ResilientClient::new(test_config()).expect("client");

    let _ = client.get(&format!("{base}/missing"), HeaderMap::new()).await;
    let _ = client.get(&format!("{base}/missing"), HeaderMap::new()).await;
    assert_eq!(client.breaker().failures(&host), 2);

    let resp = client
        .get(&format!("{base}/ok"), HeaderMap::new())
        .await
        .expect("ok call");
    assert!(resp.status().is_success());
    assert_eq!(client.breaker().failures(&host), 0);
    assert!(hits.ok.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn unreachable_host_maps_to_unavailable() {
    // nothing listens on this port
    let client = ResilientClient::new(ClientConfig {
        backoff_base_ms: 1,
        attempt_timeout_ms: 300,
        ..test_config()
    })
    .expect("client");

    let err = client
        .get("http://127.0.0.1:9/none", HeaderMap::new())
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err, ClientError::Unavailable { .. }));
}

//! # ネットワークテスト用共通ヘルパー
//!
//! HTTPストレージブリッジのプロトコルを模したモックサーバー。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Json;

/// モックブリッジが受け付けるアカウント
pub const MOCK_ACCOUNT: &str = "alice@example.com";

/// モックブリッジがアクセスを許可するスペース
pub const MOCK_SPACE_DID: &str = "did:key:z6MkSpace";

/// モックブリッジの状態。`approve_after` 回目のポーリングで承認する。
struct MockBridge {
    polls: AtomicUsize,
    approve_after: usize,
    final_status: &'static str,
}

/// モックブリッジを起動し、ベースURL（末尾スラッシュ付き）を返す。
///
/// ログインは `alice@example.com` のみ、スペースは `did:key:z6MkSpace` のみ受け付ける。
pub async fn start_mock_bridge(approve_after: usize, final_status: &'static str) -> String {
    let state = Arc::new(MockBridge {
        polls: AtomicUsize::new(0),
        approve_after,
        final_status,
    });

    let app = axum::Router::new()
        .route(
            "/auth/login",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["email"], MOCK_ACCOUNT);
                Json(serde_json::json!({ "requestId": "req-1" }))
            }),
        )
        .route(
            "/auth/login/{id}",
            get(
                |State(s): State<Arc<MockBridge>>, Path(id): Path<String>| async move {
                    assert_eq!(id, "req-1");
                    let n = s.polls.fetch_add(1, Ordering::SeqCst) + 1;
                    if n < s.approve_after {
                        Json(serde_json::json!({ "status": "pending" }))
                    } else {
                        Json(serde_json::json!({ "status": s.final_status, "token": "tok-1" }))
                    }
                },
            ),
        )
        .route(
            "/spaces/{did}",
            get(|headers: HeaderMap, Path(did): Path<String>| async move {
                let auth = headers.get("authorization").unwrap().to_str().unwrap();
                assert_eq!(auth, "Bearer tok-1");
                if did == MOCK_SPACE_DID {
                    (StatusCode::OK, "{}")
                } else {
                    (StatusCode::FORBIDDEN, "no access")
                }
            }),
        )
        .route(
            "/upload",
            post(|headers: HeaderMap, body: axum::body::Bytes| async move {
                assert_eq!(headers["authorization"], "Bearer tok-1");
                assert_eq!(headers["x-space-did"], MOCK_SPACE_DID);
                assert_eq!(headers["x-name"], "my%20file.bin");
                if body.as_ref() == b"quota" {
                    return (StatusCode::PAYMENT_REQUIRED, "quota exceeded".to_string());
                }
                (
                    StatusCode::OK,
                    serde_json::json!({ "cid": format!("bafy{}", body.len()) }).to_string(),
                )
            }),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    format!("http://127.0.0.1:{port}/")
}

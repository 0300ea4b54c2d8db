//! # GET /health

use axum::Json;
use w3vault_types::OkResponse;

/// GET /health — ヘルスチェック。
/// ストアやネットワークの状態に関係なく常に `{ "ok": true }` を返す。
pub async fn handle_health() -> Json<OkResponse> {
    Json(OkResponse::new())
}

//! # Gateway エラー型
//!
//! 全エンドポイントで共通のエラー型。レスポンスは `{ "error": "..." }` 形式。

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use w3vault_types::ErrorResponse;

use crate::network::NetworkError;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// 不正なリクエスト（必須フィールド欠落、Base64デコード失敗、JSONパース失敗）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),
    /// レコードが存在しない
    #[error("not found")]
    NotFound,
    /// リクエストボディが上限を超えている
    #[error("リクエストボディが上限を超えています: {0}")]
    PayloadTooLarge(String),
    /// ストレージネットワークへのアップロード失敗。メッセージはそのまま返す。
    #[error("{0}")]
    Upstream(String),
    /// レコードストア操作に失敗
    #[error("レコードストア操作に失敗: {0}")]
    Storage(String),
    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Upstream(_)
            | GatewayError::Storage(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge(rejection.body_text())
        } else {
            GatewayError::BadRequest(rejection.body_text())
        }
    }
}

impl From<NetworkError> for GatewayError {
    fn from(e: NetworkError) -> Self {
        GatewayError::Upstream(e.to_string())
    }
}

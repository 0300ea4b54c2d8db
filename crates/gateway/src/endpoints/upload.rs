//! # POST /upload
//!
//! クライアント側で暗号化済みのペイロードをストレージネットワークにアップロードする。
//! `POST /ipfs/upload` も同じハンドラ。

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use w3vault_types::{UploadRequest, UploadResponse};

use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::extract::ApiJson;
use crate::validation::{decode_payload, non_empty};

/// 検証済みのアップロード要求。
#[derive(Debug)]
struct ValidatedUpload {
    record_id: String,
    file_name: String,
    bytes: Vec<u8>,
}

/// リクエストを検証し、ペイロードをデコードする。
fn validate(body: UploadRequest) -> Result<ValidatedUpload, GatewayError> {
    let record_id = non_empty(body.record_id);
    let encoded = non_empty(body.data_base64).or_else(|| non_empty(body.bytes_base64));

    let (Some(record_id), Some(encoded)) = (record_id, encoded) else {
        return Err(GatewayError::BadRequest(
            "recordId と dataBase64/bytesBase64 は必須です".to_string(),
        ));
    };

    let bytes = decode_payload(&encoded)?;
    let file_name = non_empty(body.name).unwrap_or_else(|| format!("{record_id}.bin"));

    Ok(ValidatedUpload {
        record_id,
        file_name,
        bytes,
    })
}

/// POST /upload — ストレージネットワークへのアップロード。
///
/// 検証に失敗した場合はネットワーク呼び出しを行わずに400を返す。
/// アップロード失敗は再試行せず、エラーメッセージを含めて500を返す。
pub async fn handle_upload(
    State(state): State<Arc<GatewayState>>,
    ApiJson(body): ApiJson<UploadRequest>,
) -> Result<Json<UploadResponse>, GatewayError> {
    let upload = validate(body)?;

    let result = state
        .uploader
        .upload(upload.bytes, &upload.file_name)
        .await
        .inspect_err(|e| {
            tracing::error!(record_id = %upload.record_id, error = %e, "アップロードに失敗");
        })?;

    tracing::info!(
        record_id = %upload.record_id,
        cid = %result.content_id,
        size = result.byte_size,
        "アップロード完了"
    );

    Ok(Json(UploadResponse {
        ok: true,
        cid: result.content_id,
        url: result.retrieval_url,
        size: result.byte_size,
    }))
}

//! # Key wrap マニフェスト
//!
//! - `POST /keywraps` — マニフェストの保存（同じrecordIdは上書き）
//! - `GET /keywraps/{record_id}` — マニフェストの取得

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use w3vault_types::{KeyWrapRecord, KeyWrapSaveRequest, OkResponse};

use super::now_millis;
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::extract::ApiJson;
use crate::store::RecordKey;
use crate::validation::RequiredFields;

/// POST /keywraps — Key wrapマニフェストの保存。
pub async fn handle_save_keywrap(
    State(state): State<Arc<GatewayState>>,
    ApiJson(body): ApiJson<KeyWrapSaveRequest>,
) -> Result<Json<OkResponse>, GatewayError> {
    let mut fields = RequiredFields::new();
    let record_id = fields.text("recordId", body.record_id);
    let cid = fields.text("cid", body.cid);
    let manifest = fields.value("manifest", body.manifest);
    fields.finish()?;

    // TODO: 書き込み元の認証（ユーザーDIDまたはUCANトークンへの紐付け）
    let record = KeyWrapRecord {
        record_id: record_id.clone(),
        cid,
        manifest,
        ts: now_millis()?,
    };
    let value = serde_json::to_value(&record)
        .map_err(|e| GatewayError::Internal(format!("レコードのシリアライズに失敗: {e}")))?;

    state.records.put(&RecordKey::Wrap(record_id), value).await?;
    Ok(Json(OkResponse::new()))
}

/// GET /keywraps/{record_id} — Key wrapマニフェストの取得。
pub async fn handle_get_keywrap(
    State(state): State<Arc<GatewayState>>,
    Path(record_id): Path<String>,
) -> Result<Json<KeyWrapRecord>, GatewayError> {
    let value = state
        .records
        .get(&RecordKey::Wrap(record_id))
        .await?
        .ok_or(GatewayError::NotFound)?;

    let record = serde_json::from_value(value)
        .map_err(|e| GatewayError::Internal(format!("レコードのデシリアライズに失敗: {e}")))?;
    Ok(Json(record))
}

//! # Recovery（パスフレーズで暗号化されたURKのバックアップ）
//!
//! - `POST /recovery/urk/save` — バックアップの保存（同じDIDは上書き）
//! - `GET /recovery/urk/{did}` — バックアップの取得
//!
//! Gatewayは暗号文・KDFパラメータを不透明な値として保存するだけで、復号は行わない。

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use w3vault_types::{OkResponse, RecoveryRecord, RecoverySaveRequest};

use super::now_millis;
use crate::config::GatewayState;
use crate::error::GatewayError;
use crate::extract::ApiJson;
use crate::store::RecordKey;
use crate::validation::RequiredFields;

/// 8つの必須フィールドを検証し、保存用レコードを構築する。
fn validate(body: RecoverySaveRequest, ts: u64) -> Result<RecoveryRecord, GatewayError> {
    let mut fields = RequiredFields::new();
    let record = RecoveryRecord {
        user_did: fields.text("userDid", body.user_did),
        urk_wrapped: fields.text("urkWrapped", body.urk_wrapped),
        salt: fields.text("salt", body.salt),
        nonce: fields.text("nonce", body.nonce),
        kdf: fields.text("kdf", body.kdf),
        iter: fields.count("iter", body.iter),
        aad: fields.text("aad", body.aad),
        v: fields.value("v", body.v),
        ts,
    };
    fields.finish()?;
    Ok(record)
}

/// POST /recovery/urk/save — URKバックアップの保存。
pub async fn handle_save_recovery(
    State(state): State<Arc<GatewayState>>,
    ApiJson(body): ApiJson<RecoverySaveRequest>,
) -> Result<Json<OkResponse>, GatewayError> {
    let record = validate(body, now_millis()?)?;
    let key = RecordKey::Recovery(record.user_did.clone());
    let value = serde_json::to_value(&record)
        .map_err(|e| GatewayError::Internal(format!("レコードのシリアライズに失敗: {e}")))?;

    state.records.put(&key, value).await?;
    Ok(Json(OkResponse::new()))
}

/// GET /recovery/urk/{did} — URKバックアップの取得。
pub async fn handle_get_recovery(
    State(state): State<Arc<GatewayState>>,
    Path(did): Path<String>,
) -> Result<Json<RecoveryRecord>, GatewayError> {
    let value = state
        .records
        .get(&RecordKey::Recovery(did))
        .await?
        .ok_or(GatewayError::NotFound)?;

    let record = serde_json::from_value(value)
        .map_err(|e| GatewayError::Internal(format!("レコードのデシリアライズに失敗: {e}")))?;
    Ok(Json(record))
}

//! # Gatewayエンドポイント
//!
//! - `GET /health` — ヘルスチェック
//! - `POST /upload`, `POST /ipfs/upload` — ストレージネットワークへのアップロード
//! - `POST /keywraps`, `GET /keywraps/{record_id}` — Key wrapマニフェストの保存・取得
//! - `POST /recovery/urk/save`, `GET /recovery/urk/{did}` — URKバックアップの保存・取得

pub mod health;
pub mod keywraps;
pub mod recovery;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use health::handle_health;
pub use keywraps::{handle_get_keywrap, handle_save_keywrap};
pub use recovery::{handle_get_recovery, handle_save_recovery};
pub use upload::handle_upload;

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::GatewayError;

/// 現在時刻（UNIXミリ秒）
pub(crate) fn now_millis() -> Result<u64, GatewayError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| GatewayError::Internal(format!("時刻取得失敗: {e}")))?;
    Ok(elapsed.as_millis() as u64)
}

//! # W3Vault 共有型定義
//!
//! Gatewayとクライアントの間でやり取りされるJSON構造をRust構造体として提供する。
//!
//! ## エンコーディング規則
//! - フィールド名はcamelCase（既存クライアントとの互換性のため）
//! - Base64: アップロードするバイナリデータ（クライアント側で暗号化済み）
//! - タイムスタンプ `ts`: UNIXエポックからのミリ秒

use serde::{Deserialize, Deserializer, Serialize};

/// ID系フィールドを文字列として受け取る。
///
/// 数値のIDは10進表記の文字列に変換する（`123` → `"123"`）。
/// `null` と `0` は未指定として扱う。
fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "IDは文字列または数値である必要があります: {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// 共通レスポンス
// ---------------------------------------------------------------------------

/// 成功レスポンス `{ "ok": true }`。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    /// `ok: true` のレスポンスを構築する。
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// エラーレスポンス `{ "error": "..." }`。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// エラーメッセージ（上流エラーの場合はそのままの文言）
    pub error: String,
}

// ---------------------------------------------------------------------------
// アップロード
// ---------------------------------------------------------------------------

/// POST /upload のリクエスト。
///
/// `dataBase64` と `bytesBase64` は同じ意味のエイリアスで、
/// 空でない方（`dataBase64` 優先）が使われる。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// 呼び出し側が採番したレコードID（数値も可）
    #[serde(default, deserialize_with = "id_string")]
    pub record_id: Option<String>,
    /// アップロード時のファイル名。省略時は `<recordId>.bin`
    #[serde(default)]
    pub name: Option<String>,
    /// Base64エンコードされた暗号化済みペイロード
    #[serde(default)]
    pub data_base64: Option<String>,
    /// `data_base64` のエイリアス
    #[serde(default)]
    pub bytes_base64: Option<String>,
}

/// POST /upload のレスポンス。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub ok: bool,
    /// コンテンツ識別子（CID）
    pub cid: String,
    /// ゲートウェイ経由の取得URL
    pub url: String,
    /// デコード後のペイロードのバイト長
    pub size: u64,
}

// ---------------------------------------------------------------------------
// Key wrap マニフェスト
// ---------------------------------------------------------------------------

/// POST /keywraps のリクエスト。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyWrapSaveRequest {
    #[serde(default, deserialize_with = "id_string")]
    pub record_id: Option<String>,
    #[serde(default)]
    pub cid: Option<String>,
    /// 鍵のラップ方法を記述する不透明なJSON
    #[serde(default)]
    pub manifest: Option<serde_json::Value>,
}

/// 保存されたKey wrapレコード。GET /keywraps/{recordId} でそのまま返却される。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyWrapRecord {
    pub record_id: String,
    pub cid: String,
    pub manifest: serde_json::Value,
    /// 保存時刻（UNIXミリ秒）
    pub ts: u64,
}

// ---------------------------------------------------------------------------
// Recovery (パスフレーズで暗号化されたURKのバックアップ)
// ---------------------------------------------------------------------------

/// POST /recovery/urk/save のリクエスト。
///
/// ワイヤ上のフィールド名は短縮形（`userDid`, `urkWrapped`, `kdf`, `iter`, `aad`, `v`）。
/// 説明的な名前（`userIdentity`, `wrappedKey` 等）もエイリアスとして受け付ける。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoverySaveRequest {
    #[serde(default, alias = "userIdentity", deserialize_with = "id_string")]
    pub user_did: Option<String>,
    #[serde(default, alias = "wrappedKey")]
    pub urk_wrapped: Option<String>,
    #[serde(default)]
    pub salt: Option<String>,
    #[serde(default)]
    pub nonce: Option<String>,
    #[serde(default, alias = "kdfAlgorithm")]
    pub kdf: Option<String>,
    #[serde(default, alias = "kdfIterations")]
    pub iter: Option<u64>,
    #[serde(default, alias = "additionalAuthData")]
    pub aad: Option<String>,
    /// スキーマバージョン。文字列・数値のどちらも受け付ける
    #[serde(default, alias = "schemaVersion")]
    pub v: Option<serde_json::Value>,
}

/// 保存されたRecoveryレコード。GET /recovery/urk/{did} でそのまま返却される。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRecord {
    pub user_did: String,
    pub urk_wrapped: String,
    pub salt: String,
    pub nonce: String,
    pub kdf: String,
    pub iter: u64,
    pub aad: String,
    pub v: serde_json::Value,
    /// 保存時刻（UNIXミリ秒）
    pub ts: u64,
}

//! # 入力検証
//!
//! 必須フィールドの検証とBase64ペイロードのデコード。
//! 偽値（欠落、`null`、空文字列、`0`、`false`）はすべて欠落として扱う。

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::GatewayError;

/// パディング有無と末尾の余剰ビットを問わないデコード設定
const LENIENT: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent)
    .with_decode_allow_trailing_bits(true);

/// パディング有無を問わない標準アルファベットのエンジン
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// パディング有無を問わないURLセーフアルファベットのエンジン
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// JSON値が真値かどうか。
pub(crate) fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// 空でない文字列を取り出す。
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// 必須フィールドを集めて検証する。
///
/// 欠落していたフィールドはすべて記録され、`finish` で一つのエラーにまとめられる。
#[derive(Debug, Default)]
pub(crate) struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 空でない文字列フィールド。
    pub(crate) fn text(&mut self, name: &'static str, value: Option<String>) -> String {
        match non_empty(value) {
            Some(s) => s,
            None => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    /// 1以上の整数フィールド。
    pub(crate) fn count(&mut self, name: &'static str, value: Option<u64>) -> u64 {
        match value.filter(|n| *n != 0) {
            Some(n) => n,
            None => {
                self.missing.push(name);
                0
            }
        }
    }

    /// 真値の任意JSONフィールド。
    pub(crate) fn value(
        &mut self,
        name: &'static str,
        value: Option<serde_json::Value>,
    ) -> serde_json::Value {
        match value.filter(is_truthy) {
            Some(v) => v,
            None => {
                self.missing.push(name);
                serde_json::Value::Null
            }
        }
    }

    /// 欠落フィールドがあれば `BadRequest` を返す。
    pub(crate) fn finish(self) -> Result<(), GatewayError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(GatewayError::BadRequest(format!(
                "必須フィールドがありません: {}",
                self.missing.join(", ")
            )))
        }
    }
}

/// Base64ペイロードをデコードする。
/// 標準・URLセーフどちらのアルファベットも、パディング有無も受け付ける。
/// 改行を含む折り返し済みの入力に対応するため、ASCII空白はすべて読み飛ばす。
pub(crate) fn decode_payload(encoded: &str) -> Result<Vec<u8>, GatewayError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD_LENIENT
        .decode(&compact)
        .or_else(|_| URL_SAFE_LENIENT.decode(&compact))
        .map_err(|e| GatewayError::BadRequest(format!("ペイロードのBase64デコードに失敗: {e}")))
}

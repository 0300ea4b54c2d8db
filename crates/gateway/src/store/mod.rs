//! # レコードストア
//!
//! Key wrapマニフェストとRecoveryレコードを保持するキーバリューストアの抽象インターフェース。
//! インメモリ実装は `memory` サブモジュールを参照。
//!
//! キーは `wrap:<recordId>` または `recovery:<userDid>` の形式で、
//! 固定プレフィックスにより名前空間が衝突することはない。

pub mod memory;

pub use memory::MemoryRecordStore;

use std::fmt;

use crate::error::GatewayError;

/// 名前空間付きのレコードキー。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// Key wrapマニフェスト（`wrap:<recordId>`）
    Wrap(String),
    /// Recoveryレコード（`recovery:<userDid>`）
    Recovery(String),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Wrap(id) => write!(f, "wrap:{id}"),
            RecordKey::Recovery(did) => write!(f, "recovery:{did}"),
        }
    }
}

/// レコードストアの抽象インターフェース。
///
/// レコードは不透明なJSON値として保存される。書き込みは無条件の上書き（last write wins）で、
/// 同一プロセス内の後続の `get` から見える。
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// レコードを保存する。既存のレコードは上書きされる。
    async fn put(&self, key: &RecordKey, record: serde_json::Value) -> Result<(), GatewayError>;

    /// レコードを取得する。存在しなければ `None`。
    async fn get(&self, key: &RecordKey) -> Result<Option<serde_json::Value>, GatewayError>;

    /// レコードが存在するか。
    async fn exists(&self, key: &RecordKey) -> Result<bool, GatewayError>;
}

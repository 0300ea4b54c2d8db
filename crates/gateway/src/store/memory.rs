//! # インメモリレコードストア
//!
//! プロセス存続期間のみ有効なレコードストア。容量制限・有効期限・退避はない。

use std::collections::HashMap;
use std::sync::RwLock;

use super::{RecordKey, RecordStore};
use crate::error::GatewayError;

/// `HashMap` をロックで包んだレコードストア。
pub struct MemoryRecordStore {
    records: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemoryRecordStore {
    /// 空のストアを作成する。
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> GatewayError {
    GatewayError::Storage(format!("ロックが汚染されています: {e}"))
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put(&self, key: &RecordKey, record: serde_json::Value) -> Result<(), GatewayError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        guard.insert(key.to_string(), record);
        tracing::debug!(key = %key, records = guard.len(), "レコードを保存");
        Ok(())
    }

    async fn get(&self, key: &RecordKey) -> Result<Option<serde_json::Value>, GatewayError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.get(&key.to_string()).cloned())
    }

    async fn exists(&self, key: &RecordKey) -> Result<bool, GatewayError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.contains_key(&key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_then_get() {
        let store = MemoryRecordStore::new();
        let key = RecordKey::Wrap("r1".into());

        assert_eq!(store.get(&key).await.unwrap(), None);
        assert!(!store.exists(&key).await.unwrap());

        store.put(&key, json!({"cid": "a"})).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some(json!({"cid": "a"})));
        assert!(store.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = MemoryRecordStore::new();
        let key = RecordKey::Recovery("did:key:abc".into());

        store.put(&key, json!({"v": 1})).await.unwrap();
        store.put(&key, json!({"v": 2})).await.unwrap();

        assert_eq!(store.get(&key).await.unwrap(), Some(json!({"v": 2})));
    }

    /// 同じIDでも名前空間が違えば別レコード
    #[tokio::test]
    async fn test_namespaces_do_not_collide() {
        let store = MemoryRecordStore::new();
        store
            .put(&RecordKey::Wrap("same".into()), json!("wrap"))
            .await
            .unwrap();
        store
            .put(&RecordKey::Recovery("same".into()), json!("recovery"))
            .await
            .unwrap();

        assert_eq!(
            store.get(&RecordKey::Wrap("same".into())).await.unwrap(),
            Some(json!("wrap"))
        );
        assert_eq!(
            store.get(&RecordKey::Recovery("same".into())).await.unwrap(),
            Some(json!("recovery"))
        );
    }
}

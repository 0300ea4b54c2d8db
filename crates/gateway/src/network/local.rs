//! # ローカル開発用ストレージネットワーク
//!
//! ネットワークに接続しない `StorageNetwork` 実装。
//! 認証は即座に成功し、CIDはペイロードからローカルに計算する（CIDv1, raw, sha2-256）。
//! 実ネットワークに同じバイト列をアップロードした場合と同じCIDになる。

use cid::multihash::Multihash;
use cid::Cid;
use sha2::{Digest, Sha256};

use super::{check_space_did, MemorySessionStore, NetworkError, StorageNetwork};

/// multicodec: raw
const RAW_CODEC: u64 = 0x55;
/// multicodec: sha2-256
const SHA2_256_CODE: u64 = 0x12;

/// バイト列のCIDv1（raw, sha2-256）を計算する。
pub fn raw_cid(bytes: &[u8]) -> Result<Cid, NetworkError> {
    let digest = Sha256::digest(bytes);
    let hash = Multihash::<64>::wrap(SHA2_256_CODE, &digest)
        .map_err(|e| NetworkError::InvalidResponse(format!("multihashの構築に失敗: {e}")))?;
    Ok(Cid::new_v1(RAW_CODEC, hash))
}

/// ローカル開発用ストレージネットワーク。
#[derive(Default)]
pub struct LocalNetwork {
    session: MemorySessionStore,
}

impl LocalNetwork {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StorageNetwork for LocalNetwork {
    fn name(&self) -> &str {
        "local"
    }

    async fn authenticate(&self, account: &str) -> Result<(), NetworkError> {
        tracing::warn!(account = %account, "ローカルモード: ログイン承認をスキップします（開発環境用）");
        self.session.set_login(account, "local".to_string())
    }

    async fn select_space(&self, space_did: &str) -> Result<(), NetworkError> {
        check_space_did(space_did)?;
        self.session.token()?;
        self.session.set_space(space_did)
    }

    async fn upload_bytes(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, NetworkError> {
        self.session.token()?;
        self.session.space()?;
        let cid = raw_cid(&bytes)?;
        tracing::debug!(cid = %cid, file_name = %file_name, "ローカルモード: CIDを計算");
        Ok(cid.to_string())
    }
}

//! # エンドポイントテスト用共通ヘルパー
//!
//! 呼び出し回数を記録するモックストレージネットワークと、テスト用の共有状態。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::GatewayState;
use crate::network::{NetworkError, StorageNetwork};
use crate::store::MemoryRecordStore;
use crate::uploader::BlobUploader;

/// テスト用の取得URLホスト
pub const TEST_GATEWAY_HOST: &str = "ipfs.test.link";

/// テスト用のモックストレージネットワーク。
/// ネットワーク接続なしで、バイト長から決まるダミーCIDを返す。
pub struct MockNetwork {
    uploads: AtomicUsize,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self {
            uploads: AtomicUsize::new(0),
            failure: None,
            delay: None,
        }
    }

    /// 常に指定メッセージで失敗するモック。
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// アップロードに遅延を入れる。
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// `len` バイトのアップロードに対して返されるCID。
    pub fn cid_for(len: usize) -> String {
        format!("bafymock{len}")
    }

    /// `upload_bytes` が呼ばれた回数。
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StorageNetwork for MockNetwork {
    fn name(&self) -> &str {
        "mock"
    }

    async fn authenticate(&self, _account: &str) -> Result<(), NetworkError> {
        Ok(())
    }

    async fn select_space(&self, _space_did: &str) -> Result<(), NetworkError> {
        Ok(())
    }

    async fn upload_bytes(&self, bytes: Vec<u8>, _file_name: &str) -> Result<String, NetworkError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(NetworkError::Http(message.clone())),
            None => Ok(Self::cid_for(bytes.len())),
        }
    }
}

/// 指定ネットワークを使うテスト用GatewayStateを構築する。
pub fn test_state_with(network: Arc<MockNetwork>) -> Arc<GatewayState> {
    Arc::new(GatewayState {
        uploader: BlobUploader::new(network, TEST_GATEWAY_HOST, Duration::from_secs(5)),
        records: Box::new(MemoryRecordStore::new()),
        space_did: "did:key:z6MkTestSpace".to_string(),
    })
}

/// テスト用GatewayStateを構築し、モックネットワークとともに返す。
pub fn test_state() -> (Arc<GatewayState>, Arc<MockNetwork>) {
    let network = Arc::new(MockNetwork::new());
    (test_state_with(network.clone()), network)
}

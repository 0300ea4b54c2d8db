//! # Blobアップローダー
//!
//! ストレージネットワークへの単一のアップロード呼び出しを包み、
//! CIDと取得URLを返す。失敗時の再試行は行わない。

use std::sync::Arc;
use std::time::Duration;

use crate::error::GatewayError;
use crate::network::{NetworkError, StorageNetwork};

/// アップロード結果。呼び出し元に返された時点で所有権は終わる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// コンテンツ識別子
    pub content_id: String,
    /// `https://<cid>.<gateway_host>/<URLエンコードされたファイル名>`
    pub retrieval_url: String,
    /// アップロードしたバイト数
    pub byte_size: u64,
}

/// Blobアップローダー。
pub struct BlobUploader {
    network: Arc<dyn StorageNetwork>,
    /// 取得URLに使うゲートウェイホスト（例: `ipfs.w3s.link`）
    gateway_host: String,
    /// アップロード呼び出しのタイムアウト
    timeout: Duration,
}

impl BlobUploader {
    pub fn new(network: Arc<dyn StorageNetwork>, gateway_host: &str, timeout: Duration) -> Self {
        Self {
            network,
            gateway_host: gateway_host.to_string(),
            timeout,
        }
    }

    /// CIDとファイル名から取得URLを組み立てる。ネットワーク呼び出しは行わない。
    pub fn retrieval_url(&self, content_id: &str, file_name: &str) -> String {
        format!(
            "https://{content_id}.{}/{}",
            self.gateway_host,
            urlencoding::encode(file_name)
        )
    }

    /// バイト列をアップロードする。
    /// タイムアウトを含むすべての失敗は `GatewayError::Upstream` になる。
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<UploadResult, GatewayError> {
        let byte_size = bytes.len() as u64;

        let content_id =
            match tokio::time::timeout(self.timeout, self.network.upload_bytes(bytes, file_name))
                .await
            {
                Ok(result) => result?,
                Err(_) => return Err(NetworkError::UploadTimeout(self.timeout.as_secs()).into()),
            };

        Ok(UploadResult {
            retrieval_url: self.retrieval_url(&content_id, file_name),
            content_id,
            byte_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_helpers::MockNetwork;

    #[test]
    fn test_retrieval_url_encodes_file_name() {
        let uploader = BlobUploader::new(
            Arc::new(MockNetwork::new()),
            "ipfs.w3s.link",
            Duration::from_secs(1),
        );
        assert_eq!(
            uploader.retrieval_url("bafyX", "r1.bin"),
            "https://bafyX.ipfs.w3s.link/r1.bin"
        );
        assert_eq!(
            uploader.retrieval_url("bafyX", "a b/c.bin"),
            "https://bafyX.ipfs.w3s.link/a%20b%2Fc.bin"
        );
    }

    #[tokio::test]
    async fn test_upload_reports_size_and_url() {
        let network = Arc::new(MockNetwork::new());
        let uploader = BlobUploader::new(network.clone(), "gw.test", Duration::from_secs(1));

        let result = uploader.upload(vec![0u8; 42], "blob.bin").await.unwrap();
        assert_eq!(result.byte_size, 42);
        assert_eq!(result.content_id, MockNetwork::cid_for(42));
        assert_eq!(
            result.retrieval_url,
            format!("https://{}.gw.test/blob.bin", MockNetwork::cid_for(42))
        );
        assert_eq!(network.uploads(), 1);
    }

    #[tokio::test]
    async fn test_upload_failure_is_upstream_error() {
        let network = Arc::new(MockNetwork::failing("auth expired"));
        let uploader = BlobUploader::new(network, "gw.test", Duration::from_secs(1));

        let err = uploader.upload(b"x".to_vec(), "x.bin").await.unwrap_err();
        assert!(matches!(err, GatewayError::Upstream(_)));
        assert!(err.to_string().contains("auth expired"));
    }

    #[tokio::test]
    async fn test_upload_timeout_is_upstream_error() {
        let network = Arc::new(MockNetwork::new().with_delay(Duration::from_millis(500)));
        let uploader = BlobUploader::new(network, "gw.test", Duration::from_millis(20));

        let err = uploader.upload(b"x".to_vec(), "x.bin").await.unwrap_err();
        assert!(matches!(err, GatewayError::Upstream(_)));
        assert!(err.to_string().contains("タイムアウト"));
    }
}

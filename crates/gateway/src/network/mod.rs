//! # ストレージネットワーク
//!
//! コンテンツアドレス型ストレージネットワークのクライアントを抽象化するトレイト。
//! 環境変数 `W3_NETWORK` で実装を切り替える。
//!
//! 現在の実装:
//! - `bridge` — HTTPストレージブリッジ経由（本番用）
//! - `local` — ネットワークに接続せずCIDをローカル計算（開発用）

pub mod bridge;
pub mod local;
pub mod session;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use bridge::BridgeClient;
pub use local::LocalNetwork;
pub use session::MemorySessionStore;

/// ストレージネットワーク操作のエラー。
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// 認証が完了していない
    #[error("ストレージネットワークに認証されていません")]
    NotAuthenticated,
    /// アップロード先スペースが選択されていない
    #[error("アップロード先のスペースが選択されていません")]
    NoSpaceSelected,
    /// スペースIDが不正
    #[error("不正なスペースID: {0}")]
    InvalidSpace(String),
    /// ログイン承認が拒否・失効した
    #[error("ログインが承認されませんでした: {0}")]
    LoginRejected(String),
    /// ログイン承認待ちがタイムアウトした
    #[error("ログイン承認待ちがタイムアウトしました ({0}秒)")]
    LoginTimeout(u64),
    /// アップロードがタイムアウトした
    #[error("アップロードがタイムアウトしました ({0}秒)")]
    UploadTimeout(u64),
    /// HTTP通信失敗
    #[error("HTTP通信に失敗: {0}")]
    Http(String),
    /// ネットワーク側がエラーを返した
    #[error("ストレージネットワークがエラーを返しました: HTTP {status} - {body}")]
    Rejected { status: u16, body: String },
    /// 応答の形式が不正
    #[error("不正な応答: {0}")]
    InvalidResponse(String),
    /// セッションストアの操作に失敗
    #[error("セッションストア操作に失敗: {0}")]
    Session(String),
}

/// ストレージネットワーククライアントのトレイト。
///
/// 起動時に `authenticate` → `select_space` の順で一度だけ呼ばれ、
/// 以降はリクエストごとに `upload_bytes` が呼ばれる。
#[async_trait::async_trait]
pub trait StorageNetwork: Send + Sync {
    /// 実装名（ログ用）
    fn name(&self) -> &str;

    /// アカウントを認証する。
    /// 外部での承認（メールのログインリンク等）が完了するまでブロックする場合がある。
    async fn authenticate(&self, account: &str) -> Result<(), NetworkError>;

    /// 以降のアップロード先となるスペースを選択する。
    async fn select_space(&self, space_did: &str) -> Result<(), NetworkError>;

    /// バイト列をアップロードし、コンテンツ識別子（CID）を返す。
    async fn upload_bytes(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, NetworkError>;
}

/// スペースIDの形式を検証する（`did:` で始まること）。
pub(crate) fn check_space_did(space_did: &str) -> Result<(), NetworkError> {
    match space_did.strip_prefix("did:") {
        Some(rest) if !rest.is_empty() => Ok(()),
        _ => Err(NetworkError::InvalidSpace(space_did.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_space_did() {
        assert!(check_space_did("did:key:z6MkSpace").is_ok());
        assert!(check_space_did("did:").is_err());
        assert!(check_space_did("z6MkSpace").is_err());
    }
}

//! # Gateway設定・共有状態
//!
//! 環境変数（`.env` を含む）からの設定読み込みとGatewayの共有状態の定義。

use std::net::SocketAddr;
use std::time::Duration;

use clap::builder::{NonEmptyStringValueParser, RangedU64ValueParser};
use clap::{Parser, ValueEnum};

use crate::store::RecordStore;
use crate::uploader::BlobUploader;

/// JSONボディの上限（20 MiB）
pub const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// ストレージネットワーク実装の選択。
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NetworkMode {
    /// HTTPストレージブリッジ経由
    Bridge,
    /// ネットワークに接続せずCIDをローカル計算（開発用）
    Local,
}

/// Gatewayの起動設定。
#[derive(Debug, Clone, Parser)]
#[command(name = "w3vault-gateway", version, about = "W3Vault upload and key-wrap gateway")]
pub struct GatewayConfig {
    /// ストレージネットワークのアカウント（メールアドレス）
    #[arg(long, env = "W3_EMAIL", value_parser = NonEmptyStringValueParser::new())]
    pub email: String,

    /// アップロード先スペースのDID
    #[arg(long, env = "W3_SPACE_DID", value_parser = NonEmptyStringValueParser::new())]
    pub space_did: String,

    /// 待ち受けポート
    #[arg(long, env = "PORT", default_value_t = 8787)]
    pub port: u16,

    /// 待ち受けホスト
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "W3_NETWORK", value_enum, default_value_t = NetworkMode::Bridge)]
    pub network: NetworkMode,

    /// ストレージブリッジのベースURL
    #[arg(long, env = "W3_BRIDGE_URL", default_value = "http://127.0.0.1:8788")]
    pub bridge_url: String,

    /// 取得URLに使うゲートウェイホスト
    #[arg(long, env = "W3_GATEWAY_HOST", default_value = "ipfs.w3s.link")]
    pub gateway_host: String,

    /// アップロード呼び出しのタイムアウト（秒、1以上）
    #[arg(
        long,
        env = "UPLOAD_TIMEOUT_SECS",
        default_value_t = 120,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub upload_timeout_secs: u64,

    /// ログイン承認待ちのタイムアウト（秒、1以上）
    #[arg(
        long,
        env = "LOGIN_TIMEOUT_SECS",
        default_value_t = 900,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub login_timeout_secs: u64,

    /// JSONボディの最大バイト数（1以上）
    #[arg(
        long,
        env = "MAX_BODY_BYTES",
        default_value_t = DEFAULT_MAX_BODY_BYTES,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_body_bytes: usize,
}

impl GatewayConfig {
    /// 待ち受けアドレス。
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("不正な待ち受けアドレス {}:{}: {e}", self.host, self.port))
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }
}

/// Gatewayの共有状態。起動時に一度だけ構築され、以降は読み取り専用。
pub struct GatewayState {
    /// Blobアップローダー（認証済みストレージネットワークを包む）
    pub uploader: BlobUploader,
    /// レコードストア（トレイトで抽象化）
    pub records: Box<dyn RecordStore>,
    /// アクティブなスペースのDID
    pub space_did: String,
}

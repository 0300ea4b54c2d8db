//! # W3Vault Gateway
//!
//! クライアントから暗号化済みファイルを受け取りコンテンツアドレス型ストレージネットワークへ転送し、
//! 付随するメタデータ（Key wrapマニフェスト、暗号化されたRecoveryバックアップ）を保持するGateway。
//!
//! ## 起動シーケンス
//! 1. 設定読み込み（`W3_EMAIL`, `W3_SPACE_DID` は必須）
//! 2. 空のセッションストアでストレージネットワーククライアントを構築
//! 3. アカウント認証（メールでのログイン承認を待つ）
//! 4. アップロード先スペースの選択
//! 5. 待ち受け開始
//!
//! 1〜4のいずれかが失敗した場合は待ち受けを開始せずに終了する。
//!
//! ## API エンドポイント
//! - `GET /health` — ヘルスチェック
//! - `POST /upload`, `POST /ipfs/upload` — アップロード
//! - `POST /keywraps`, `GET /keywraps/{record_id}` — Key wrapマニフェスト
//! - `POST /recovery/urk/save`, `GET /recovery/urk/{did}` — URKバックアップ

mod config;
mod endpoints;
mod error;
mod extract;
mod network;
mod store;
mod uploader;
mod validation;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use clap::Parser;

use crate::config::{GatewayConfig, GatewayState, NetworkMode};
use crate::network::{BridgeClient, LocalNetwork, StorageNetwork};
use crate::store::MemoryRecordStore;
use crate::uploader::BlobUploader;

/// ルーターを構築する。
fn build_router(state: Arc<GatewayState>, max_body_bytes: usize) -> axum::Router {
    axum::Router::new()
        .route("/health", get(endpoints::handle_health))
        .route("/upload", post(endpoints::handle_upload))
        .route("/ipfs/upload", post(endpoints::handle_upload))
        .route("/keywraps", post(endpoints::handle_save_keywrap))
        .route("/keywraps/{record_id}", get(endpoints::handle_get_keywrap))
        .route("/recovery/urk/save", post(endpoints::handle_save_recovery))
        .route("/recovery/urk/{did}", get(endpoints::handle_get_recovery))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// ストレージネットワークに接続し、認証とスペース選択を済ませる。
async fn connect_network(config: &GatewayConfig) -> anyhow::Result<Arc<dyn StorageNetwork>> {
    let network: Arc<dyn StorageNetwork> = match config.network {
        NetworkMode::Bridge => {
            let http_client = reqwest::Client::builder()
                .timeout(config.upload_timeout())
                .build()?;
            Arc::new(BridgeClient::new(
                &config.bridge_url,
                http_client,
                config.login_timeout(),
            ))
        }
        NetworkMode::Local => Arc::new(LocalNetwork::new()),
    };
    tracing::info!(network = network.name(), "ストレージネットワークに接続します");

    network
        .authenticate(&config.email)
        .await
        .map_err(|e| anyhow::anyhow!("アカウント認証に失敗 ({}): {e}", config.email))?;
    network
        .select_space(&config.space_did)
        .await
        .map_err(|e| anyhow::anyhow!("スペース選択に失敗 ({}): {e}", config.space_did))?;

    Ok(network)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::parse();
    let addr = config.listen_addr()?;

    let network = connect_network(&config).await?;

    let state = Arc::new(GatewayState {
        uploader: BlobUploader::new(network, &config.gateway_host, config.upload_timeout()),
        records: Box::new(MemoryRecordStore::new()),
        space_did: config.space_did.clone(),
    });

    let app = build_router(state.clone(), config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("w3アップローダーを http://{} で起動します", listener.local_addr()?);
    tracing::info!(space = %state.space_did, "アクティブなスペース");

    axum::serve(listener, app).await?;

    Ok(())
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------

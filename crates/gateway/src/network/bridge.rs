//! # HTTPストレージブリッジクライアント
//!
//! ストレージネットワークへのHTTPブリッジを使う `StorageNetwork` 実装。
//!
//! ## プロトコル
//! - `POST {base}/auth/login` `{ "email" }` → `{ "requestId" }`
//! - `GET {base}/auth/login/{requestId}` → `{ "status": "pending" | "approved" | "rejected" | "expired", "token"? }`
//! - `GET {base}/spaces/{did}`（Bearer認証）→ 2xxならスペースにアクセス可能
//! - `POST {base}/upload`（Bearer認証, `X-Space-DID`, `X-Name`, 生バイト列）→ `{ "cid" }`

use std::time::{Duration, Instant};

use serde::Deserialize;

use super::{check_space_did, MemorySessionStore, NetworkError, StorageNetwork};

/// ログイン承認のポーリング間隔（デフォルト）
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginStarted {
    request_id: String,
}

#[derive(Debug, Deserialize)]
struct LoginStatus {
    status: String,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadAccepted {
    cid: String,
}

/// HTTPブリッジ経由のストレージネットワーククライアント。
pub struct BridgeClient {
    /// ブリッジのベースURL（末尾スラッシュなし）
    base_url: String,
    http_client: reqwest::Client,
    session: MemorySessionStore,
    login_timeout: Duration,
    poll_interval: Duration,
}

impl BridgeClient {
    /// 新しいBridgeClientを作成する。セッションは空の状態から始まる。
    pub fn new(base_url: &str, http_client: reqwest::Client, login_timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            session: MemorySessionStore::new(),
            login_timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// ログイン承認のポーリング間隔を変更する。
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// レスポンスのステータスを確認し、本文を返す。
    async fn read_body(response: reqwest::Response) -> Result<String, NetworkError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NetworkError::Http(format!("レスポンス読み取り失敗: {e}")))?;
        if !status.is_success() {
            return Err(NetworkError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn parse<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, NetworkError> {
        serde_json::from_str(body)
            .map_err(|e| NetworkError::InvalidResponse(format!("{e}: {body}")))
    }

    async fn start_login(&self, account: &str) -> Result<String, NetworkError> {
        let response = self
            .http_client
            .post(format!("{}/auth/login", self.base_url))
            .json(&serde_json::json!({ "email": account }))
            .send()
            .await
            .map_err(|e| NetworkError::Http(format!("ログイン要求の送信失敗: {e}")))?;
        let body = Self::read_body(response).await?;
        Ok(Self::parse::<LoginStarted>(&body)?.request_id)
    }

    async fn poll_login(&self, request_id: &str) -> Result<LoginStatus, NetworkError> {
        let response = self
            .http_client
            .get(format!(
                "{}/auth/login/{}",
                self.base_url,
                urlencoding::encode(request_id)
            ))
            .send()
            .await
            .map_err(|e| NetworkError::Http(format!("ログイン状態の取得失敗: {e}")))?;
        let body = Self::read_body(response).await?;
        Self::parse(&body)
    }
}

#[async_trait::async_trait]
impl StorageNetwork for BridgeClient {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn authenticate(&self, account: &str) -> Result<(), NetworkError> {
        let request_id = self.start_login(account).await?;
        tracing::info!(
            account = %account,
            "ログインリンクを送信しました。メールで承認されるまで待機します"
        );

        let deadline = Instant::now() + self.login_timeout;
        loop {
            let status = self.poll_login(&request_id).await?;
            match status.status.as_str() {
                "approved" => {
                    let token = status.token.ok_or_else(|| {
                        NetworkError::InvalidResponse("承認済みログインにtokenがありません".into())
                    })?;
                    self.session.set_login(account, token)?;
                    tracing::info!(account = %account, "ストレージネットワークに認証しました");
                    return Ok(());
                }
                "pending" => {}
                other => return Err(NetworkError::LoginRejected(other.to_string())),
            }

            if Instant::now() + self.poll_interval > deadline {
                return Err(NetworkError::LoginTimeout(self.login_timeout.as_secs()));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn select_space(&self, space_did: &str) -> Result<(), NetworkError> {
        check_space_did(space_did)?;
        let token = self.session.token()?;

        let response = self
            .http_client
            .get(format!(
                "{}/spaces/{}",
                self.base_url,
                urlencoding::encode(space_did)
            ))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| NetworkError::Http(format!("スペース確認の送信失敗: {e}")))?;
        Self::read_body(response).await?;

        self.session.set_space(space_did)?;
        tracing::info!(
            account = ?self.session.account()?,
            space = %space_did,
            "アップロード先スペースを選択しました"
        );
        Ok(())
    }

    async fn upload_bytes(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, NetworkError> {
        let token = self.session.token()?;
        let space = self.session.space()?;

        let response = self
            .http_client
            .post(format!("{}/upload", self.base_url))
            .bearer_auth(token)
            .header("X-Space-DID", space)
            .header("X-Name", urlencoding::encode(file_name).into_owned())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| NetworkError::Http(format!("アップロード送信失敗: {e}")))?;
        let body = Self::read_body(response).await?;
        Ok(Self::parse::<UploadAccepted>(&body)?.cid)
    }
}

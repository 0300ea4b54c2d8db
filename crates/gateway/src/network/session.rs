//! # インメモリセッションストア
//!
//! 認証済みセッションの資格情報を保持する。永続化はせず、プロセス再起動のたびに再認証する。

use std::sync::RwLock;

use super::NetworkError;

#[derive(Debug, Default, Clone)]
struct Session {
    account: Option<String>,
    token: Option<String>,
    space: Option<String>,
}

/// プロセスごとに新しく作られる資格情報ストア。
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Session>,
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> NetworkError {
    NetworkError::Session(format!("ロックが汚染されています: {e}"))
}

impl MemorySessionStore {
    /// 空のセッションストアを作成する。
    pub fn new() -> Self {
        Self::default()
    }

    /// 認証済みアカウントとトークンを記録する。
    pub fn set_login(&self, account: &str, token: String) -> Result<(), NetworkError> {
        let mut guard = self.inner.write().map_err(poisoned)?;
        guard.account = Some(account.to_string());
        guard.token = Some(token);
        Ok(())
    }

    /// アクティブなスペースを記録する。
    pub fn set_space(&self, space_did: &str) -> Result<(), NetworkError> {
        let mut guard = self.inner.write().map_err(poisoned)?;
        guard.space = Some(space_did.to_string());
        Ok(())
    }

    /// 認証済みアカウント。
    pub fn account(&self) -> Result<Option<String>, NetworkError> {
        Ok(self.inner.read().map_err(poisoned)?.account.clone())
    }

    /// 認証トークン。未認証なら `NotAuthenticated`。
    pub fn token(&self) -> Result<String, NetworkError> {
        self.inner
            .read()
            .map_err(poisoned)?
            .token
            .clone()
            .ok_or(NetworkError::NotAuthenticated)
    }

    /// アクティブなスペース。未選択なら `NoSpaceSelected`。
    pub fn space(&self) -> Result<String, NetworkError> {
        self.inner
            .read()
            .map_err(poisoned)?
            .space
            .clone()
            .ok_or(NetworkError::NoSpaceSelected)
    }
}

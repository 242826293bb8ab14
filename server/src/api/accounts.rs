//! アカウントAPI
//!
//! POST /register, POST /login, GET /accounts, GET /balance
//!
//! アカウントはメモリ上に保持する。ログイン成功時にClaimsを埋める。

use crate::api::{write_error, write_json, AccountError};
use crate::audit::middleware::AuditedHandler;
use crate::audit::sink::ResponseSink;
use async_trait::async_trait;
use audit_relay_common::auth::{Claims, UserRole};
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::{Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// リクエストボディの上限（1MiB）
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// ログインで発行するClaimsの有効期間（時間）
const CLAIMS_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
struct Account {
    password_hash: String,
    role: UserRole,
    balance: i64,
}

/// メモリ上のアカウントストア
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl AccountStore {
    /// 空のストアを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// アカウントを登録する
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(username) {
            return Err(AccountError::AlreadyExists(username.to_string()));
        }
        accounts.insert(
            username.to_string(),
            Account {
                password_hash: hash_password(password),
                role,
                balance: 0,
            },
        );
        Ok(())
    }

    /// 資格情報を検証し、ロールを返す
    pub async fn verify(&self, username: &str, password: &str) -> Result<UserRole, AccountError> {
        let accounts = self.accounts.read().await;
        match accounts.get(username) {
            Some(account) if account.password_hash == hash_password(password) => Ok(account.role),
            _ => Err(AccountError::InvalidCredentials),
        }
    }

    /// 残高を取得する
    pub async fn balance(&self, username: &str) -> Result<i64, AccountError> {
        self.accounts
            .read()
            .await
            .get(username)
            .map(|account| account.balance)
            .ok_or_else(|| AccountError::NotFound(username.to_string()))
    }

    /// 残高を設定する
    ///
    /// 残高を変更するルートはないため、デモ用ストアへの初期投入にのみ使う。
    pub async fn set_balance(&self, username: &str, balance: i64) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(username)
            .ok_or_else(|| AccountError::NotFound(username.to_string()))?;
        account.balance = balance;
        Ok(())
    }

    /// ユーザー名順のアカウント一覧
    pub async fn list(&self) -> Vec<AccountSummary> {
        let mut summaries: Vec<AccountSummary> = self
            .accounts
            .read()
            .await
            .iter()
            .map(|(username, account)| AccountSummary {
                username: username.clone(),
                role: account.role,
            })
            .collect();
        summaries.sort_by(|a, b| a.username.cmp(&b.username));
        summaries
    }
}

fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// アカウント概要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// ユーザー名
    pub username: String,
    /// ロール
    pub role: UserRole,
}

/// 登録リクエスト
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// ユーザー名
    pub username: String,
    /// パスワード
    pub password: String,
    /// ロール（省略時は user）
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// ログインリクエスト
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// ユーザー名
    pub username: String,
    /// パスワード
    pub password: String,
}

/// 残高照会のクエリ
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// ユーザー名
    pub user: Option<String>,
}

/// 残高レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// ユーザー名
    pub user: String,
    /// 残高
    pub balance: i64,
}

fn require_method(actual: &Method, expected: Method) -> Result<(), AccountError> {
    if *actual == expected {
        Ok(())
    } else {
        Err(AccountError::MethodNotAllowed)
    }
}

async fn read_json<T: DeserializeOwned>(request: Request<Body>) -> Result<T, AccountError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| AccountError::InvalidRequest(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| AccountError::InvalidRequest(e.to_string()))
}

/// POST /register - アカウント登録
pub struct RegisterHandler {
    store: Arc<AccountStore>,
}

impl RegisterHandler {
    /// ストアを共有してハンドラーを作成
    pub fn new(store: Arc<AccountStore>) -> Self {
        Self { store }
    }

    async fn handle(&self, request: Request<Body>) -> Result<AccountSummary, AccountError> {
        require_method(request.method(), Method::POST)?;
        let req: RegisterRequest = read_json(request).await?;
        if req.username.trim().is_empty() || req.password.is_empty() {
            return Err(AccountError::InvalidRequest(
                "username and password are required".to_string(),
            ));
        }
        let role = req.role.unwrap_or(UserRole::User);
        self.store.register(&req.username, &req.password, role).await?;
        info!(username = %req.username, role = %role, "account registered");
        Ok(AccountSummary {
            username: req.username,
            role,
        })
    }
}

#[async_trait]
impl AuditedHandler for RegisterHandler {
    async fn call(
        &self,
        sink: &mut dyn ResponseSink,
        request: Request<Body>,
        _claims: &mut Claims,
    ) {
        match self.handle(request).await {
            Ok(summary) => write_json(sink, StatusCode::CREATED, &summary),
            Err(e) => write_error(sink, &e),
        }
    }
}

/// POST /login - ログイン（Claimsを設定）
pub struct LoginHandler {
    store: Arc<AccountStore>,
}

impl LoginHandler {
    /// ストアを共有してハンドラーを作成
    pub fn new(store: Arc<AccountStore>) -> Self {
        Self { store }
    }

    async fn handle(&self, request: Request<Body>) -> Result<AccountSummary, AccountError> {
        require_method(request.method(), Method::POST)?;
        let req: LoginRequest = read_json(request).await?;
        let role = self.store.verify(&req.username, &req.password).await?;
        Ok(AccountSummary {
            username: req.username,
            role,
        })
    }
}

#[async_trait]
impl AuditedHandler for LoginHandler {
    async fn call(
        &self,
        sink: &mut dyn ResponseSink,
        request: Request<Body>,
        claims: &mut Claims,
    ) {
        match self.handle(request).await {
            Ok(summary) => {
                claims.sub = summary.username.clone();
                claims.role = Some(summary.role);
                claims.exp = (Utc::now() + Duration::hours(CLAIMS_TTL_HOURS)).timestamp() as usize;
                write_json(sink, StatusCode::OK, &summary);
            }
            Err(e) => write_error(sink, &e),
        }
    }
}

/// GET /accounts - アカウント一覧
pub struct AccountsHandler {
    store: Arc<AccountStore>,
}

impl AccountsHandler {
    /// ストアを共有してハンドラーを作成
    pub fn new(store: Arc<AccountStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuditedHandler for AccountsHandler {
    async fn call(
        &self,
        sink: &mut dyn ResponseSink,
        request: Request<Body>,
        _claims: &mut Claims,
    ) {
        if let Err(e) = require_method(request.method(), Method::GET) {
            write_error(sink, &e);
            return;
        }
        let accounts = self.store.list().await;
        write_json(sink, StatusCode::OK, &accounts);
    }
}

/// GET /balance?user=<name> - 残高照会
pub struct BalanceHandler {
    store: Arc<AccountStore>,
}

impl BalanceHandler {
    /// ストアを共有してハンドラーを作成
    pub fn new(store: Arc<AccountStore>) -> Self {
        Self { store }
    }

    async fn handle(&self, method: &Method, query: &str) -> Result<BalanceResponse, AccountError> {
        require_method(method, Method::GET)?;
        let query: BalanceQuery = serde_urlencoded::from_str(query)
            .map_err(|e| AccountError::InvalidRequest(e.to_string()))?;
        let user = query
            .user
            .filter(|user| !user.is_empty())
            .ok_or_else(|| AccountError::InvalidRequest("user is required".to_string()))?;
        let balance = self.store.balance(&user).await?;
        Ok(BalanceResponse { user, balance })
    }
}

#[async_trait]
impl AuditedHandler for BalanceHandler {
    async fn call(
        &self,
        sink: &mut dyn ResponseSink,
        request: Request<Body>,
        _claims: &mut Claims,
    ) {
        let query = request.uri().query().unwrap_or_default().to_string();
        match self.handle(request.method(), &query).await {
            Ok(balance) => write_json(sink, StatusCode::OK, &balance),
            Err(e) => write_error(sink, &e),
        }
    }
}

//! 認証コンテキストの型定義
//!
//! 監査レイヤーはClaimsを生成して受け渡すだけで、中身は解釈しない。

use serde::{Deserialize, Serialize};

/// ユーザーロール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// 管理者
    Admin,
    /// 一般ユーザー
    User,
}

impl UserRole {
    /// UserRoleを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// リクエストスコープのClaims
///
/// リクエストごとにゼロ値で生成され、ラップされたハンドラーが必要に応じて埋める。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// ユーザーID（未認証なら空文字列）
    pub sub: String,
    /// ユーザーロール
    pub role: Option<UserRole>,
    /// 有効期限（Unix timestamp）
    pub exp: usize,
}

impl Claims {
    /// ハンドラーが認証情報を設定したか
    pub fn is_authenticated(&self) -> bool {
        !self.sub.is_empty()
    }
}

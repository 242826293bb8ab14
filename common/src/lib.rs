//! Audit Relay Common Library
//!
//! サーバーとテストで共有する設定・エラー・認証コンテキスト型

#![warn(missing_docs)]

/// 認証コンテキスト（Claims）
pub mod auth;

/// 設定管理
pub mod config;

/// エラー型定義
pub mod error;

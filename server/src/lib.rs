//! Audit Relay Server
//!
//! HTTPハンドラーをラップし、リクエスト/レスポンスの監査ログを記録するサーバー

#![warn(missing_docs)]

/// 監査ログシステム
pub mod audit;

/// REST APIハンドラー
pub mod api;

/// CLI定義
pub mod cli;

/// 起動時設定
pub mod config;

/// ロギング初期化ユーティリティ
pub mod logging;

/// ルートテーブルとルーター構築
pub mod routes;

/// サーバー起動
pub mod server;

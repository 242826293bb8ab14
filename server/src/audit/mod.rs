//! 監査ログシステム
//!
//! ラップしたハンドラーのリクエスト/レスポンスを記録し、1リクエスト1ファイルで書き出す

/// 監査レコードの型定義
pub mod types;

/// リクエストスナップショット
pub mod snapshot;

/// レスポンスシンク（キャプチャ/実レスポンス）
pub mod sink;

/// 監査ログファイルの書き出し
pub mod writer;

/// 監査ログデコレーター
pub mod middleware;

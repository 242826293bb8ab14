//! ルートテーブルとルーター構築
//!
//! 各ルートのハンドラーを監査デコレーターで包んでaxumのRouterに登録する

use crate::audit::middleware::{serve_audited, AuditedHandler};
use crate::audit::writer::LogPersister;
use axum::{body::Body, http::Request, routing::any, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// パスとハンドラーの対応表（登録順を保持）
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: Vec<(String, Arc<dyn AuditedHandler>)>,
}

impl RouteTable {
    /// 空のルートテーブルを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ルートを追加
    pub fn route(mut self, path: impl Into<String>, handler: impl AuditedHandler) -> Self {
        let handler: Arc<dyn AuditedHandler> = Arc::new(handler);
        self.routes.push((path.into(), handler));
        self
    }

    /// 登録済みパスを登録順に返す
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(path, _)| path.as_str())
    }

    /// 登録数
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.paths()).finish()
    }
}

/// ルートテーブルからRouterを作成
///
/// 全ルートが同じ `LogPersister` を共有する。
pub fn create_router(route_table: RouteTable, persister: Arc<LogPersister>) -> Router {
    route_table
        .routes
        .into_iter()
        .fold(Router::new(), |router, (path, handler)| {
            let persister = persister.clone();
            router.route(
                &path,
                any(move |request: Request<Body>| {
                    let handler = handler.clone();
                    let persister = persister.clone();
                    async move { serve_audited(handler.as_ref(), &persister, request).await }
                }),
            )
        })
        .layer(TraceLayer::new_for_http())
}

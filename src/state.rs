use axum::extract::FromRef;

use crate::{
    auth::TokenKeys,
    storage::{DBPool, SqlxStore},
};

/// 应用程序上下文
///
/// [`AppState`] 封装了数据库连接池和令牌签名密钥，提供统一访问入口。
/// 两者在启动时构造一次，之后只读。
#[derive(Clone, FromRef)]
pub struct AppState {
    pool: DBPool,
    tokens: TokenKeys,
}

impl AppState {
    /// 创建一个新的 [`AppState`] 实例
    pub fn new(pool: DBPool, tokens: TokenKeys) -> Self {
        Self { pool, tokens }
    }

    /// 获取仓储对象
    pub fn storage(&self) -> SqlxStore {
        SqlxStore::new(self.pool.clone())
    }

    /// 获取查询对象
    pub fn querier(&self) -> &DBPool {
        &self.pool
    }

    /// 获取令牌签名密钥
    pub fn tokens(&self) -> &TokenKeys {
        &self.tokens
    }
}

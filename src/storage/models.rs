use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::types::Json;
use uuid::Uuid;

/// 作者行
///
/// 不包含密码哈希，可安全嵌入任何响应。
#[derive(Debug, Deserialize, sqlx::FromRow)]
pub struct AuthorRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 登录凭证行，只在认证路径上使用
///
/// `password_hash` 为空表示该作者没有凭证（通过
/// `POST /articles/authors` 创建），无法登录。
#[derive(Debug, sqlx::FromRow)]
pub struct CredentialRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
}

/// 文章行，源字段与派生字段齐平
#[derive(Debug, Deserialize, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// 原始 Markdown
    pub content: String,
    pub slug: String,
    /// 由 content 派生的安全 HTML
    pub sanitized_html: String,
    pub author_id: Uuid,
    /// 文章持有的评论引用，按追加顺序排列
    pub comment_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 保存路径以行中已保存的字段为基准判断变化
impl From<ArticleRow> for crate::content::Article {
    fn from(row: ArticleRow) -> Self {
        Self {
            title: row.title,
            description: row.description,
            content: row.content,
            slug: row.slug,
            sanitized_html: row.sanitized_html,
        }
    }
}

/// 文章详情，作者已联表填充
///
/// 评论列表由 [`Querier`](super::Querier) 单独查询后组装。
#[derive(Debug, sqlx::FromRow)]
pub struct ArticleDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub slug: String,
    pub sanitized_html: String,
    /// 联表得到的作者，参见 [`AuthorRow`]
    pub author: Option<Json<AuthorRow>>,
    pub comment_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 单条评论，作者已填充
#[derive(Debug, sqlx::FromRow)]
pub struct CommentDetail {
    pub id: Uuid,
    pub content: String,
    pub article_id: Uuid,
    /// 可选作者，参见 [`AuthorRow`]
    pub author: Option<Json<AuthorRow>>,
    pub created_at: DateTime<Utc>,
}

/// 评论平铺列表项，作者和所属文章都已填充
///
/// 文章删除后评论可能悬挂，此时 `article` 为空。
#[derive(Debug, sqlx::FromRow)]
pub struct CommentListItem {
    pub id: Uuid,
    pub content: String,
    pub author: Option<Json<AuthorRow>>,
    pub article: Option<Json<ArticleRow>>,
    pub created_at: DateTime<Utc>,
}

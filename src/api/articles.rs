use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::Query;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{Error, Result};

use crate::content::{Article, ArticleDraft, AuthorDraft, CommentDraft};
use crate::state::AppState;
use crate::storage::{
    ArticleDetail, ArticleRow, AuthorRow, CommentDetail, CommentListItem, DBPool, Querier, Store,
};

/// 配置文章相关路由。
///
/// 路由包括：
/// - `GET/POST /articles`：文章列表、创建文章
/// - `GET/POST /articles/authors`：作者列表、创建作者（无凭证）
/// - `GET /articles/comments`：评论平铺列表
/// - `GET/PUT/DELETE /articles/{id}`：单篇文章
/// - `POST /articles/{id}/comments`：创建评论
///
/// 固定子路径与 `{id}` 并存；axum 静态段优先于参数段匹配。
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/articles", get(article_list).post(article_create))
        .route("/articles/authors", get(author_list).post(author_create))
        .route("/articles/comments", get(comment_list))
        .route(
            "/articles/{id}",
            get(article_get).put(article_update).delete(article_delete),
        )
        .route("/articles/{id}/comments", post(comment_create))
}

/// 作者响应体，永远不含密码哈希。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorBody {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AuthorRow> for AuthorBody {
    fn from(row: AuthorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            bio: row.bio,
            created_at: row.created_at,
        }
    }
}

/// 评论响应体，作者已填充，所属文章以 id 引用。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub id: Uuid,
    pub content: String,
    pub article: Uuid,
    pub author: Option<AuthorBody>,
    pub created_at: DateTime<Utc>,
}

impl From<CommentDetail> for CommentBody {
    fn from(c: CommentDetail) -> Self {
        Self {
            id: c.id,
            content: c.content,
            article: c.article_id,
            author: c.author.map(|a| a.0.into()),
            created_at: c.created_at,
        }
    }
}

/// 完整文章响应体，作者和评论（含评论作者）都已填充。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBody {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub slug: String,
    pub sanitized_html: String,
    pub author: Option<AuthorBody>,
    pub comments: Vec<CommentBody>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleBody {
    /// 由详情行和评论索引组装，评论按文章持有的引用顺序排列。
    fn assemble(detail: ArticleDetail, index: &mut HashMap<Uuid, CommentDetail>) -> Self {
        let comments = detail
            .comment_ids
            .iter()
            .filter_map(|id| index.remove(id))
            .map(CommentBody::from)
            .collect();

        Self {
            id: detail.id,
            title: detail.title,
            description: detail.description,
            content: detail.content,
            slug: detail.slug,
            sanitized_html: detail.sanitized_html,
            author: detail.author.map(|a| a.0.into()),
            comments,
            created_at: detail.created_at,
            updated_at: detail.updated_at,
        }
    }
}

/// 未填充的文章引用，评论平铺列表嵌套使用。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRefBody {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub slug: String,
    pub sanitized_html: String,
    pub author: Uuid,
    pub comments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ArticleRow> for ArticleRefBody {
    fn from(row: ArticleRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            content: row.content,
            slug: row.slug,
            sanitized_html: row.sanitized_html,
            author: row.author_id,
            comments: row.comment_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// 评论平铺列表项，作者和所属文章都已填充。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentFeedBody {
    pub id: Uuid,
    pub content: String,
    pub author: Option<AuthorBody>,
    pub article: Option<ArticleRefBody>,
    pub created_at: DateTime<Utc>,
}

impl From<CommentListItem> for CommentFeedBody {
    fn from(c: CommentListItem) -> Self {
        Self {
            id: c.id,
            content: c.content,
            author: c.author.map(|a| a.0.into()),
            article: c.article.map(|a| a.0.into()),
            created_at: c.created_at,
        }
    }
}

/// 查询参数，用于文章列表分页。
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListParams {
    limit: Option<i32>,
    page: i32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: None,
            page: 1,
        }
    }
}

/// 批量取回并索引多篇文章的评论。
async fn comment_index(
    pool: &DBPool,
    articles: &[ArticleDetail],
) -> Result<HashMap<Uuid, CommentDetail>> {
    let ids: Vec<Uuid> = articles.iter().map(|a| a.id).collect();
    let comments = pool.comments_for_articles(&ids).await?;
    Ok(comments.into_iter().map(|c| (c.id, c)).collect())
}

/// 获取文章列表，按创建时间倒序。
///
/// 作者和评论（含评论作者）都已填充，支持可选分页。
async fn article_list(
    Query(params): Query<ListParams>,
    State(pool): State<DBPool>,
) -> Result<Json<Vec<ArticleBody>>> {
    let articles = pool.article_list(params.limit, params.page).await?;
    let mut index = comment_index(&pool, &articles).await?;

    Ok(Json(
        articles
            .into_iter()
            .map(|a| ArticleBody::assemble(a, &mut index))
            .collect(),
    ))
}

/// 根据 id 获取单篇文章。
///
/// 文章不存在时返回 404。
async fn article_get(
    Path(id): Path<Uuid>,
    State(pool): State<DBPool>,
) -> Result<Json<ArticleBody>> {
    let detail = pool
        .article_detail(id)
        .await?
        .ok_or(Error::NotFound("Article not found"))?;
    let mut index = comment_index(&pool, std::slice::from_ref(&detail)).await?;

    Ok(Json(ArticleBody::assemble(detail, &mut index)))
}

/// 创建文章请求体。
#[derive(Debug, Deserialize)]
pub struct CreateArticle {
    title: String,
    description: String,
    content: String,
    author: Uuid,
}

/// 创建文章。
///
/// 保存路径在写入前派生 slug 和 sanitized_html，
/// 校验失败整体中止，不产生部分写入。
async fn article_create(
    State(app): State<AppState>,
    Json(payload): Json<CreateArticle>,
) -> Result<(StatusCode, Json<ArticleBody>)> {
    let querier = app.querier();

    if querier.author_row(payload.author).await?.is_none() {
        return Err(Error::Validation("Author does not exist"));
    }

    let article = ArticleDraft::new(payload.title, payload.description, payload.content)?.build();

    let id = Uuid::new_v4();
    let mut store = app.storage();
    store.insert_article(id, payload.author, &article);
    store.commit().await?;

    let detail = querier
        .article_detail(id)
        .await?
        .ok_or(Error::NotFound("Article not found"))?;

    Ok((
        StatusCode::CREATED,
        Json(ArticleBody::assemble(detail, &mut HashMap::new())),
    ))
}

/// 更新文章请求体。
#[derive(Debug, Deserialize)]
pub struct UpdateArticle {
    title: String,
    description: String,
    content: String,
}

/// 整体更新文章的标题、摘要和正文。
///
/// 走与创建相同的保存路径：标题变化才重算 slug，
/// 正文变化才重算 sanitized_html。
async fn article_update(
    Path(id): Path<Uuid>,
    State(app): State<AppState>,
    Json(payload): Json<UpdateArticle>,
) -> Result<Json<ArticleBody>> {
    let querier = app.querier();

    let row = querier
        .article_row(id)
        .await?
        .ok_or(Error::NotFound("Article not found"))?;
    let saved = Article::from(row);

    let updated =
        ArticleDraft::new(payload.title, payload.description, payload.content)?.rebuild(&saved);

    let mut store = app.storage();
    store.update_article(id, &updated);
    store.commit().await?;

    let detail = querier
        .article_detail(id)
        .await?
        .ok_or(Error::NotFound("Article not found"))?;
    let mut index = comment_index(querier, std::slice::from_ref(&detail)).await?;

    Ok(Json(ArticleBody::assemble(detail, &mut index)))
}

/// 删除文章。
///
/// 文章不存在时重定向回列表而不是报错；
/// 已有评论不级联删除，允许悬挂。
async fn article_delete(Path(id): Path<Uuid>, State(app): State<AppState>) -> Result<Response> {
    if app.querier().article_row(id).await?.is_none() {
        return Ok(Redirect::to("/articles").into_response());
    }

    let mut store = app.storage();
    store.delete_article(id);
    store.commit().await?;

    Ok(Json(json!({ "message": "Article deleted successfully" })).into_response())
}

/// 创建评论请求体，作者可选。
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    content: String,
    author: Option<Uuid>,
}

/// 在指定文章下创建评论。
///
/// 评论插入和文章引用追加在同一事务中提交。
/// 返回填充后的评论和更新后的文章。
async fn comment_create(
    Path(id): Path<Uuid>,
    State(app): State<AppState>,
    Json(payload): Json<CreateComment>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let querier = app.querier();

    if querier.article_row(id).await?.is_none() {
        return Err(Error::NotFound("Article not found"));
    }

    let draft = CommentDraft::new(payload.content, payload.author)?;

    let comment_id = Uuid::new_v4();
    let mut store = app.storage();
    store
        .insert_comment(comment_id, id, &draft)
        .append_comment(id, comment_id);
    store.commit().await?;

    let comment = querier
        .comment_detail(comment_id)
        .await?
        .map(CommentBody::from)
        .ok_or(Error::NotFound("Comment not found"))?;

    let detail = querier
        .article_detail(id)
        .await?
        .ok_or(Error::NotFound("Article not found"))?;
    let mut index = comment_index(querier, std::slice::from_ref(&detail)).await?;
    let article = ArticleBody::assemble(detail, &mut index);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Comment added successfully",
            "comment": comment,
            "article": article,
        })),
    ))
}

/// 获取所有作者，按姓名升序。
async fn author_list(State(pool): State<DBPool>) -> Result<Json<Vec<AuthorBody>>> {
    let authors = pool.authors().await?;
    Ok(Json(authors.into_iter().map(AuthorBody::from).collect()))
}

/// 创建作者请求体，此路径不接受密码。
#[derive(Debug, Deserialize)]
pub struct CreateAuthor {
    name: String,
    email: String,
}

/// 创建没有登录凭证的作者。
async fn author_create(
    State(app): State<AppState>,
    Json(payload): Json<CreateAuthor>,
) -> Result<(StatusCode, Json<AuthorBody>)> {
    let draft = AuthorDraft::new(payload.name, payload.email, None)?;

    let id = Uuid::new_v4();
    let mut store = app.storage();
    store.insert_author(id, &draft, None);
    store.commit().await?;

    let author = app
        .querier()
        .author_row(id)
        .await?
        .ok_or(Error::NotFound("Author not found"))?;

    Ok((StatusCode::CREATED, Json(author.into())))
}

/// 获取评论平铺列表，按创建时间倒序。
async fn comment_list(State(pool): State<DBPool>) -> Result<Json<Vec<CommentFeedBody>>> {
    let comments = pool.comment_feed().await?;
    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

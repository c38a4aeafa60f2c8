use uuid::Uuid;

use super::{ArticleDetail, ArticleRow, AuthorRow, CommentDetail, CommentListItem, CredentialRow, DBPool};

/// 用于查询文章、作者和评论数据
///
/// 填充引用（populate）在这里完成：详情查询联表作者，
/// 评论按所属文章批量取回后由调用方按引用列表排序。
pub trait Querier: Send + Sync {
    type Error;

    /// 查询单个文章详情，作者已填充
    ///
    /// 文章不存在时返回 `None`。
    fn article_detail(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ArticleDetail>, Self::Error>>;

    /// 查询文章原始行，保存路径和存在性检查使用
    fn article_row(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ArticleRow>, Self::Error>>;

    /// 按创建时间倒序查询文章列表，作者已填充
    ///
    /// `limit` 为空时返回全部。
    fn article_list(
        &self,
        limit: Option<i32>,
        page: i32,
    ) -> impl std::future::Future<Output = Result<Vec<ArticleDetail>, Self::Error>>;

    /// 批量取回属于指定文章的评论，作者已填充
    ///
    /// 返回顺序未定义，由调用方按文章的引用列表排序。
    fn comments_for_articles(
        &self,
        articles: &[Uuid],
    ) -> impl std::future::Future<Output = Result<Vec<CommentDetail>, Self::Error>>;

    /// 查询单条评论，作者已填充
    fn comment_detail(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<CommentDetail>, Self::Error>>;

    /// 按创建时间倒序查询评论平铺列表，作者和文章都已填充
    fn comment_feed(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<CommentListItem>, Self::Error>>;

    /// 按姓名升序查询作者列表
    fn authors(&self) -> impl std::future::Future<Output = Result<Vec<AuthorRow>, Self::Error>>;

    /// 查询单个作者
    fn author_row(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<AuthorRow>, Self::Error>>;

    /// 按邮箱查询登录凭证
    fn credential_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<CredentialRow>, Self::Error>>;
}

impl Querier for DBPool {
    type Error = sqlx::Error;

    async fn article_detail(&self, id: Uuid) -> Result<Option<ArticleDetail>, Self::Error> {
        let result = sqlx::query_as::<_, ArticleDetail>(
            r#"
            SELECT a.id, a.title, a.description, a.content, a.slug, a.sanitized_html,
                   to_jsonb(au) AS author, a.comment_ids, a.created_at, a.updated_at
            FROM articles a
            LEFT JOIN authors au ON au.id = a.author_id
            WHERE a.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self)
        .await?;
        Ok(result)
    }

    async fn article_row(&self, id: Uuid) -> Result<Option<ArticleRow>, Self::Error> {
        sqlx::query_as::<_, ArticleRow>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(self)
            .await
    }

    async fn article_list(
        &self,
        limit: Option<i32>,
        page: i32,
    ) -> Result<Vec<ArticleDetail>, Self::Error> {
        let mut builder = sqlx::QueryBuilder::new(
            r#"
            SELECT a.id, a.title, a.description, a.content, a.slug, a.sanitized_html,
                   to_jsonb(au) AS author, a.comment_ids, a.created_at, a.updated_at
            FROM articles a
            LEFT JOIN authors au ON au.id = a.author_id
            ORDER BY a.created_at DESC
            "#,
        );

        if let Some(limit) = limit {
            let offset = (page.max(1) - 1) * limit;
            builder.push(" LIMIT ").push_bind(limit);
            builder.push(" OFFSET ").push_bind(offset);
        }

        let query = builder.build_query_as::<ArticleDetail>();
        let result = query.fetch_all(self).await?;
        Ok(result)
    }

    async fn comments_for_articles(
        &self,
        articles: &[Uuid],
    ) -> Result<Vec<CommentDetail>, Self::Error> {
        sqlx::query_as::<_, CommentDetail>(
            r#"
            SELECT c.id, c.content, c.article_id, to_jsonb(au) AS author, c.created_at
            FROM comments c
            LEFT JOIN authors au ON au.id = c.author_id
            WHERE c.article_id = ANY($1)
            "#,
        )
        .bind(articles)
        .fetch_all(self)
        .await
    }

    async fn comment_detail(&self, id: Uuid) -> Result<Option<CommentDetail>, Self::Error> {
        sqlx::query_as::<_, CommentDetail>(
            r#"
            SELECT c.id, c.content, c.article_id, to_jsonb(au) AS author, c.created_at
            FROM comments c
            LEFT JOIN authors au ON au.id = c.author_id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self)
        .await
    }

    async fn comment_feed(&self) -> Result<Vec<CommentListItem>, Self::Error> {
        sqlx::query_as::<_, CommentListItem>(
            r#"
            SELECT c.id, c.content, to_jsonb(au) AS author, to_jsonb(a) AS article, c.created_at
            FROM comments c
            LEFT JOIN authors au ON au.id = c.author_id
            LEFT JOIN articles a ON a.id = c.article_id
            ORDER BY c.created_at DESC
            "#,
        )
        .fetch_all(self)
        .await
    }

    async fn authors(&self) -> Result<Vec<AuthorRow>, Self::Error> {
        sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT id, name, email, bio, created_at
            FROM authors
            ORDER BY name
            "#,
        )
        .fetch_all(self)
        .await
    }

    async fn author_row(&self, id: Uuid) -> Result<Option<AuthorRow>, Self::Error> {
        sqlx::query_as::<_, AuthorRow>(
            "SELECT id, name, email, bio, created_at FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self)
        .await
    }

    async fn credential_by_email(&self, email: &str) -> Result<Option<CredentialRow>, Self::Error> {
        sqlx::query_as::<_, CredentialRow>(
            "SELECT id, name, email, password_hash FROM authors WHERE email = $1",
        )
        .bind(email.to_owned())
        .fetch_optional(self)
        .await
    }
}

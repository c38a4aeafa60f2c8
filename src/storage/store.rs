use uuid::Uuid;

use crate::{
    content::{Article, AuthorDraft, CommentDraft},
    error,
    storage::DBPool,
};

/// 提供文章、作者和评论的写入接口
///
/// 写入先排队，[`commit`](Store::commit) 在单个事务中执行，
/// 任何一条失败都会整体回滚。评论插入和父文章引用追加因此共享
/// 同一个事务，不会留下未挂接的评论。
pub trait Store: Send {
    /// 清空所有表
    fn clean(&mut self) -> &mut Self;
    /// 插入作者；注册路径传入密码哈希，其余路径传 `None`
    fn insert_author(
        &mut self,
        id: Uuid,
        draft: &AuthorDraft,
        password_hash: Option<&str>,
    ) -> &mut Self;
    /// 插入新文章，派生字段已由保存管线计算
    fn insert_article(&mut self, id: Uuid, author: Uuid, article: &Article) -> &mut Self;
    /// 覆盖文章的源字段和派生字段，更新 updated_at
    fn update_article(&mut self, id: Uuid, article: &Article) -> &mut Self;
    /// 删除指定文章，悬挂的评论原样保留
    fn delete_article(&mut self, id: Uuid) -> &mut Self;
    /// 插入评论
    fn insert_comment(&mut self, id: Uuid, article: Uuid, draft: &CommentDraft) -> &mut Self;
    /// 把评论引用追加到文章持有的列表末尾
    fn append_comment(&mut self, article: Uuid, comment: Uuid) -> &mut Self;
    /// 提交更改
    fn commit(self) -> impl std::future::Future<Output = Result<(), error::Error>>;
}

/// sqlx 的 [`Store`] 实现
pub struct SqlxStore {
    pool: DBPool,
    queries: Vec<sqlx::query::Query<'static, sqlx::Postgres, sqlx::postgres::PgArguments>>,
}

impl SqlxStore {
    pub fn new(pool: DBPool) -> Self {
        Self {
            pool,
            queries: Default::default(),
        }
    }
}

impl Store for SqlxStore {
    fn clean(&mut self) -> &mut Self {
        let query = sqlx::query("TRUNCATE TABLE comments, articles, authors");
        self.queries.push(query);
        self
    }

    fn insert_author(
        &mut self,
        id: Uuid,
        draft: &AuthorDraft,
        password_hash: Option<&str>,
    ) -> &mut Self {
        let q = sqlx::query(
            r#"
            INSERT INTO authors (id, name, email, password_hash, bio, created_at)
            VALUES ($1, $2, $3, $4, $5, now())
            "#,
        )
        .bind(id)
        .bind(draft.name.to_owned())
        .bind(draft.email.to_owned())
        .bind(password_hash.map(str::to_owned))
        .bind(draft.bio.to_owned());

        self.queries.push(q);
        self
    }

    fn insert_article(&mut self, id: Uuid, author: Uuid, article: &Article) -> &mut Self {
        let q = sqlx::query(
            "
            INSERT INTO articles
                (id, title, description, content, author_id, slug, sanitized_html,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
            ",
        )
        .bind(id)
        .bind(article.title.to_owned())
        .bind(article.description.to_owned())
        .bind(article.content.to_owned())
        .bind(author)
        .bind(article.slug.to_owned())
        .bind(article.sanitized_html.to_owned());

        self.queries.push(q);
        self
    }

    fn update_article(&mut self, id: Uuid, article: &Article) -> &mut Self {
        let q = sqlx::query(
            "
            UPDATE articles
            SET title = $2,
                description = $3,
                content = $4,
                slug = $5,
                sanitized_html = $6,
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(article.title.to_owned())
        .bind(article.description.to_owned())
        .bind(article.content.to_owned())
        .bind(article.slug.to_owned())
        .bind(article.sanitized_html.to_owned());

        self.queries.push(q);
        self
    }

    fn delete_article(&mut self, id: Uuid) -> &mut Self {
        let q = sqlx::query("DELETE FROM articles WHERE id = $1").bind(id);
        self.queries.push(q);
        self
    }

    fn insert_comment(&mut self, id: Uuid, article: Uuid, draft: &CommentDraft) -> &mut Self {
        let q = sqlx::query(
            r#"
            INSERT INTO comments (id, content, article_id, author_id, created_at)
            VALUES ($1, $2, $3, $4, now())
            "#,
        )
        .bind(id)
        .bind(draft.content.to_owned())
        .bind(article)
        .bind(draft.author);

        self.queries.push(q);
        self
    }

    fn append_comment(&mut self, article: Uuid, comment: Uuid) -> &mut Self {
        // 追加引用等同于对文章的一次保存，更新 updated_at
        let q = sqlx::query(
            r#"
            UPDATE articles
            SET comment_ids = array_append(comment_ids, $2),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(article)
        .bind(comment);

        self.queries.push(q);
        self
    }

    async fn commit(mut self) -> Result<(), error::Error> {
        let mut tx = self.pool.begin().await?;

        for q in self.queries.drain(..) {
            q.execute(tx.as_mut()).await?;
        }

        Ok(tx.commit().await?)
    }
}

use crate::error::{Error, Result};

use super::{markdown, slug};

/// 校验通过、尚未派生 slug 和 HTML 的文章输入
#[derive(Debug)]
pub struct ArticleDraft {
    title: String,
    description: String,
    content: String,
}

/// 保存路径的产物：源字段加上派生字段
///
/// slug 始终由最近一次保存的标题派生，sanitized_html 始终由最近一次
/// 保存的正文派生。两者只在对应源字段变化时重新计算。
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub content: String,
    pub slug: String,
    pub sanitized_html: String,
}

impl ArticleDraft {
    /// 校验字段约束，任一失败都会在写入前中止保存
    ///
    /// - 标题至少 3 个字符
    /// - 摘要必填，最多 200 个字符
    /// - 正文必填
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self> {
        let title = title.into();
        let description = description.into();
        let content = content.into();

        if title.trim().chars().count() < 3 {
            return Err(Error::Validation("Title must be at least 3 characters"));
        }
        if description.trim().is_empty() {
            return Err(Error::Validation("Description is required"));
        }
        if description.chars().count() > 200 {
            return Err(Error::Validation(
                "Description must be at most 200 characters",
            ));
        }
        if content.trim().is_empty() {
            return Err(Error::Validation("Content is required"));
        }

        Ok(Self {
            title,
            description,
            content,
        })
    }

    /// 构建新文章，总是计算 slug 和 sanitized_html
    pub fn build(self) -> Article {
        let slug = slug::slugify(&self.title);
        let sanitized_html = markdown::render_sanitized(&self.content);

        Article {
            title: self.title,
            description: self.description,
            content: self.content,
            slug,
            sanitized_html,
        }
    }

    /// 基于已保存的文章构建更新
    ///
    /// 标题未变化时保留原 slug，正文未变化时保留原 sanitized_html，
    /// 与每次保存都重算的 [`build`](Self::build) 相对。
    pub fn rebuild(self, saved: &Article) -> Article {
        let slug = if self.title == saved.title {
            saved.slug.clone()
        } else {
            slug::slugify(&self.title)
        };

        let sanitized_html = if self.content == saved.content {
            saved.sanitized_html.clone()
        } else {
            markdown::render_sanitized(&self.content)
        };

        Article {
            title: self.title,
            description: self.description,
            content: self.content,
            slug,
            sanitized_html,
        }
    }
}

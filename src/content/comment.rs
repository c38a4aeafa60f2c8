use uuid::Uuid;

use crate::error::{Error, Result};

/// 校验通过的评论输入
///
/// 评论必须挂在已存在的文章上，这一点由创建路径在写入前检查；
/// 作者可选。
#[derive(Debug)]
pub struct CommentDraft {
    pub content: String,
    pub author: Option<Uuid>,
}

impl CommentDraft {
    /// 校验评论内容：必填，最多 500 个字符
    pub fn new(content: impl Into<String>, author: Option<Uuid>) -> Result<Self> {
        let content = content.into();

        if content.trim().is_empty() {
            return Err(Error::Validation("Comment content is required"));
        }
        if content.chars().count() > 500 {
            return Err(Error::Validation(
                "Comment content must be at most 500 characters",
            ));
        }

        Ok(Self { content, author })
    }
}

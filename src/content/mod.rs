mod article;
mod author;
mod comment;
mod markdown;
mod slug;

pub use self::{
    article::{Article, ArticleDraft},
    author::AuthorDraft,
    comment::CommentDraft,
    markdown::render_sanitized,
    slug::slugify,
};

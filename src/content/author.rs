use crate::error::{Error, Result};

/// 校验通过的作者输入
///
/// 密码不在这里处理：注册路径先哈希，再与草稿一起落库；
/// `POST /articles/authors` 创建的作者没有凭证。
#[derive(Debug)]
pub struct AuthorDraft {
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
}

impl AuthorDraft {
    /// 校验姓名、邮箱格式和简介长度（最多 600 个字符）
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        bio: Option<String>,
    ) -> Result<Self> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(Error::Validation("Name is required"));
        }
        if !is_valid_email(&email) {
            return Err(Error::Validation("Please use a valid email address"));
        }
        if let Some(bio) = &bio {
            if bio.chars().count() > 600 {
                return Err(Error::Validation("Bio must be at most 600 characters"));
            }
        }

        Ok(Self { name, email, bio })
    }
}

/// 邮箱格式检查，等价于 `\S+@\S+\.\S+`
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

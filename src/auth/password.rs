use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;

use crate::error::Result;

/// 对明文密码做加盐单向哈希，返回 PHC 格式字符串
///
/// 数据库只存哈希，明文在此之后不再出现。
pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(OsRng);
    let hash = Argon2::default().hash_password(plain.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// 校验明文密码与存储的哈希是否匹配
///
/// 比较由 argon2 内部以常数时间完成；哈希损坏视为不匹配。
pub fn verify_password(plain: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret123").expect("hash should succeed");

        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_garbage_hash() {
        assert!(!verify_password("secret123", "not-a-phc-string"));
    }
}

use std::env;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// 令牌负载：作者标识与 1 小时过期时间
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub exp: i64,
}

/// 进程级签名密钥，启动时加载一次，运行期间不轮换
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// 从环境变量 `ACCESS_TOKEN_SECRET` 创建签名密钥
    ///
    /// - Panics
    ///
    /// 如果环境变量未设置，会 panic
    pub fn from_env() -> Self {
        let secret = env::var("ACCESS_TOKEN_SECRET").expect("ACCESS_TOKEN_SECRET not set");
        Self::from_secret(secret.as_bytes())
    }

    /// 签发 HS256 令牌，有效期 1 小时
    pub fn sign(&self, id: Uuid, name: &str, email: &str) -> Result<String> {
        let claims = Claims {
            id,
            name: name.to_owned(),
            email: email.to_owned(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };

        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding,
        )?)
    }

    /// 校验令牌签名和过期时间，返回负载
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

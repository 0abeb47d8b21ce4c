use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
//
// 令牌由外部身份提供方签发，这里只做验签和取值。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,          // IdP 侧的稳定用户标识
    pub email: String,        // 邮箱
    pub name: Option<String>, // 显示名
    pub role: String,         // 用户角色: student / teacher / admin
    pub exp: usize,           // Expiration time (时间戳)
    pub iat: usize,           // Issued at (签发时间)
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    /// 验证令牌签名与有效期，返回 Claims
    pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        let secret = Self::get_secret();
        let decoding_key = DecodingKey::from_secret(secret.as_ref());

        let mut validation = Validation::default();
        validation.leeway = config.jwt.leeway_secs;

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}

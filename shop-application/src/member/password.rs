use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use shop_domain::error::DomainError;
use uuid::Uuid;

use crate::error::AppResult;

/// 口令编码器：注册时编码，登录时比对
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw: &str) -> AppResult<String>;

    fn matches(&self, raw: &str, encoded: &str) -> bool;
}

/// Argon2id 编码，结果为 PHC 字符串（`$argon2id$v=19$...`），盐随机生成
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordEncoder;

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> AppResult<String> {
        let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
            .map_err(|e| DomainError::invalid_argument(format!("password salt: {e}")))?;

        let hash = Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| DomainError::invalid_argument(format!("password hashing: {e}")))?;

        Ok(hash.to_string())
    }

    // 比对由 argon2 以常数时间完成
    fn matches(&self, raw: &str, encoded: &str) -> bool {
        match PasswordHash::new(encoded) {
            Ok(parsed) => Argon2::default()
                .verify_password(raw.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

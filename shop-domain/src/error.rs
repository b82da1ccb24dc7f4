//! 领域层统一错误定义
//!
//! 聚焦查找、输入校验、状态流转、库存、数据完整性与持久化等最小必要集合，
//! 便于在应用层统一转换与分类。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 查找 ---
    #[error("not found: {entity} {id}")]
    NotFound { entity: &'static str, id: String },

    // --- 输入与领域规则 ---
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
    #[error("out of stock: item={item_id}, requested={requested}, available={available}")]
    OutOfStock {
        item_id: String,
        requested: u32,
        available: u32,
    },
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    // --- 数据完整性/持久化 ---
    #[error("integrity violation: {reason}")]
    IntegrityViolation { reason: String },
    #[error("version conflict: expected={expected}, actual={actual}")]
    VersionConflict { expected: usize, actual: usize },
    #[error("repository error: {reason}")]
    Repository { reason: String },

    // --- 通用 ---
    #[error("parse error: {reason}")]
    Parse { reason: String },
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        DomainError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        DomainError::InvalidState {
            reason: reason.into(),
        }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        DomainError::Conflict {
            reason: reason.into(),
        }
    }

    pub fn integrity(reason: impl Into<String>) -> Self {
        DomainError::IntegrityViolation {
            reason: reason.into(),
        }
    }

    pub fn repository(reason: impl Into<String>) -> Self {
        DomainError::Repository {
            reason: reason.into(),
        }
    }

    /// 是否属于服务端故障（数据损坏或存储异常），而非调用方输入问题
    pub fn is_server_fault(&self) -> bool {
        matches!(
            self,
            DomainError::IntegrityViolation { .. }
                | DomainError::VersionConflict { .. }
                | DomainError::Repository { .. }
        )
    }
}

impl From<uuid::Error> for DomainError {
    fn from(err: uuid::Error) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_faults_are_classified() {
        assert!(DomainError::integrity("missing image").is_server_fault());
        assert!(DomainError::repository("io").is_server_fault());
        assert!(
            DomainError::VersionConflict {
                expected: 2,
                actual: 1
            }
            .is_server_fault()
        );

        assert!(!DomainError::not_found("order", "o-1").is_server_fault());
        assert!(!DomainError::invalid_argument("quantity").is_server_fault());
        assert!(!DomainError::invalid_state("cancelled").is_server_fault());
    }

    #[test]
    fn uuid_parse_error_converts() {
        let err: DomainError = uuid::Uuid::parse_str("not-a-uuid").unwrap_err().into();
        match err {
            DomainError::Parse { .. } => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn messages_carry_context() {
        let err = DomainError::OutOfStock {
            item_id: "i-1".into(),
            requested: 5,
            available: 2,
        };
        assert_eq!(
            err.to_string(),
            "out of stock: item=i-1, requested=5, available=2"
        );
        assert_eq!(
            DomainError::not_found("item", 42).to_string(),
            "not found: item 42"
        );
    }
}

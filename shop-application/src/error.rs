use shop_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("authorization: {0}")]
    Authorization(String),

    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: command={command}")]
    AlreadyRegisteredCommand { command: &'static str },

    #[error("handler already registered: query={query}")]
    AlreadyRegisteredQuery { query: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// 是否属于服务端故障（应记录并以 5xx 类响应呈现，而非提示用户修正输入）
    pub fn is_server_fault(&self) -> bool {
        match self {
            AppError::Domain(err) => err.is_server_fault(),
            AppError::Validation(_) | AppError::Authorization(_) => false,
            _ => true,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Domain(DomainError::NotFound { .. }))
    }
}

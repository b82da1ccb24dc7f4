use bon::Builder;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// 请求的业务语境：链路追踪号与登录会员
#[derive(Builder, Default, Debug, Clone, Serialize, Deserialize)]
pub struct BusinessContext {
    /// 贯穿一次请求的追踪号，写入总线日志
    correlation_id: Option<String>,
    /// 登录会员的邮箱；匿名请求为空
    member_email: Option<String>,
}

impl BusinessContext {
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn member_email(&self) -> Option<&str> {
        self.member_email.as_deref()
    }
}

/// 一次命令/查询调用的上下文
///
/// 经总线调用订单流程时，操作者即 `member_email` 对应的会员：
/// ```rust
/// use shop_application::context::{AppContext, BusinessContext};
///
/// let ctx = AppContext {
///     biz: BusinessContext::builder()
///         .correlation_id("req-42".to_string())
///         .member_email("alice@shop.test".to_string())
///         .build(),
/// };
/// assert_eq!(ctx.member_email().unwrap(), "alice@shop.test");
/// assert!(AppContext::default().member_email().is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub biz: BusinessContext,
}

impl AppContext {
    /// 以已登录会员身份构造上下文，并分配新的追踪号
    pub fn member(email: impl Into<String>) -> Self {
        Self {
            biz: BusinessContext::builder()
                .correlation_id(Uuid::new_v4().to_string())
                .member_email(email.into())
                .build(),
        }
    }

    /// 当前会员邮箱；匿名调用返回授权错误
    pub fn member_email(&self) -> Result<&str, AppError> {
        self.biz
            .member_email()
            .ok_or_else(|| AppError::Authorization("login required".to_string()))
    }
}

use crate::{command::Command, context::AppContext, error::AppError};
use async_trait::async_trait;

/// 命令总线：按命令类型找到已注册的处理器并执行
///
/// 未注册的命令返回 `HandlerNotFound`。
#[async_trait]
pub trait CommandBus: Send + Sync {
    async fn dispatch<C: Command>(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError>;
}

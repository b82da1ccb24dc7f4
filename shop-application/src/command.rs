use async_trait::async_trait;

use crate::{context::AppContext, error::AppError};

/// 写操作请求，如 `PlaceOrder`、`CancelOrder`
///
/// `NAME` 是稳定的路由与日志名，采用 `领域.动作` 形式（`order.place`）；
/// `Output` 为执行结果，通常是新建实体的标识，无结果时为 `()`。
pub trait Command: Send + Sync + 'static {
    const NAME: &'static str;

    type Output: Send + 'static;
}

/// 命令处理器，一个服务可为多个命令实现
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError>;
}

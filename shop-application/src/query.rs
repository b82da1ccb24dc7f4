use async_trait::async_trait;

use crate::{context::AppContext, dto::Dto, error::AppError};

/// 只读请求，如 `OrderHistory`；处理器只开启只读事务
pub trait Query: Send + Sync + 'static {
    const NAME: &'static str;

    type Dto: Dto;
}

#[async_trait]
pub trait QueryHandler<Q>: Send + Sync
where
    Q: Query,
{
    async fn handle(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError>;
}

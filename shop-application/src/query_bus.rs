use crate::{context::AppContext, error::AppError, query::Query};
use async_trait::async_trait;

/// 查询总线：按查询类型路由，返回该查询声明的 DTO
#[async_trait]
pub trait QueryBus: Send + Sync {
    async fn dispatch<Q: Query>(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError>;
}

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::AppContext;
use crate::error::AppError;
use crate::query::{Query, QueryHandler};
use crate::query_bus::QueryBus;
use crate::registry::{BoxAnySend, HandlerRegistry, erase};

/// 进程内查询总线，与 `InMemoryCommandBus` 共用同一套登记表
#[derive(Default)]
pub struct InMemoryQueryBus {
    registry: HandlerRegistry,
}

impl InMemoryQueryBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<Q, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let erased = erase(move |msg, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                let q = msg.downcast::<Q>().map_err(|_| AppError::TypeMismatch {
                    expected: Q::NAME,
                    found: "unknown",
                })?;
                let dto = handler.handle(ctx, *q).await?;
                Ok(Box::new(dto) as BoxAnySend)
            })
        });

        if !self.registry.insert::<Q>(Q::NAME, erased) {
            return Err(AppError::AlreadyRegisteredQuery { query: Q::NAME });
        }
        Ok(())
    }

    pub fn registered_queries(&self) -> Vec<&'static str> {
        self.registry.names()
    }
}

#[async_trait]
impl QueryBus for InMemoryQueryBus {
    async fn dispatch<Q: Query>(&self, ctx: &AppContext, q: Q) -> Result<Q::Dto, AppError> {
        tracing::debug!(
            query = Q::NAME,
            correlation_id = ctx.biz.correlation_id(),
            "dispatching query"
        );

        self.registry.call::<Q, Q::Dto>(Q::NAME, ctx, q).await
    }
}

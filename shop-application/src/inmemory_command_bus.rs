use std::sync::Arc;

use async_trait::async_trait;

use crate::command::{Command, CommandHandler};
use crate::command_bus::CommandBus;
use crate::context::AppContext;
use crate::error::AppError;
use crate::registry::{BoxAnySend, HandlerRegistry, erase};

/// 进程内命令总线
///
/// 每种命令只允许一个处理器；同一个服务可以为多种命令分别注册。
#[derive(Default)]
pub struct InMemoryCommandBus {
    registry: HandlerRegistry,
}

impl InMemoryCommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册命令处理器；同一命令重复注册返回错误
    pub fn register<C, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let erased = erase(move |msg, ctx| {
            let handler = handler.clone();

            Box::pin(async move {
                // 键与闭包出自同一泛型 C，正常情况下不会失败
                let cmd = msg.downcast::<C>().map_err(|_| AppError::TypeMismatch {
                    expected: C::NAME,
                    found: "unknown",
                })?;
                let out = handler.handle(ctx, *cmd).await?;
                Ok(Box::new(out) as BoxAnySend)
            })
        });

        if !self.registry.insert::<C>(C::NAME, erased) {
            return Err(AppError::AlreadyRegisteredCommand { command: C::NAME });
        }
        Ok(())
    }

    pub fn registered_commands(&self) -> Vec<&'static str> {
        self.registry.names()
    }
}

#[async_trait]
impl CommandBus for InMemoryCommandBus {
    async fn dispatch<C: Command>(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError> {
        tracing::debug!(
            command = C::NAME,
            correlation_id = ctx.biz.correlation_id(),
            "dispatching command"
        );

        self.registry.call::<C, C::Output>(C::NAME, ctx, cmd).await
    }
}

//! 总线共用的处理器登记表
//!
//! 以消息类型的 `TypeId` 为键保存类型擦除后的处理函数；
//! 消息与结果都以 `Box<dyn Any + Send>` 传递，调用端负责还原结果类型。

use std::any::{Any, TypeId, type_name};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::{context::AppContext, error::AppError};

pub(crate) type BoxAnySend = Box<dyn Any + Send>;

pub(crate) type ErasedFuture<'a> =
    Pin<Box<dyn Future<Output = Result<BoxAnySend, AppError>> + Send + 'a>>;

pub(crate) type ErasedHandler =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a AppContext) -> ErasedFuture<'a> + Send + Sync>;

// 借助泛型约束推导闭包的高阶生命周期签名
pub(crate) fn erase<F>(f: F) -> ErasedHandler
where
    F: for<'a> Fn(BoxAnySend, &'a AppContext) -> ErasedFuture<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Default)]
pub(crate) struct HandlerRegistry {
    entries: DashMap<TypeId, (&'static str, ErasedHandler)>,
}

impl HandlerRegistry {
    /// 登记消息 `M` 的处理函数；已存在时保留原条目并返回 `false`
    pub(crate) fn insert<M: Any>(&self, name: &'static str, handler: ErasedHandler) -> bool {
        match self.entries.entry(TypeId::of::<M>()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert((name, handler));
                true
            }
        }
    }

    /// 调用消息 `M` 的处理函数，并将结果还原为 `Out`
    pub(crate) async fn call<M, Out>(
        &self,
        name: &'static str,
        ctx: &AppContext,
        msg: M,
    ) -> Result<Out, AppError>
    where
        M: Send + 'static,
        Out: 'static,
    {
        let handler = self
            .entries
            .get(&TypeId::of::<M>())
            .map(|entry| entry.1.clone())
            .ok_or(AppError::HandlerNotFound(name))?;

        let out = handler(Box::new(msg), ctx).await?;

        out.downcast::<Out>()
            .map(|out| *out)
            .map_err(|_| AppError::TypeMismatch {
                expected: type_name::<Out>(),
                found: "unknown",
            })
    }

    pub(crate) fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.value().0).collect()
    }
}

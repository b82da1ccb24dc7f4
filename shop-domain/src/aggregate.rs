//! 聚合根的状态迁移协议
//!
//! 命令先经 `execute` 判定是否允许（拒绝时不产生任何事件），
//! 再由 `apply` 把事件落到状态上并推进版本。订单的取消即按此流转。
//!
use crate::entity::Entity;
use serde::{Serialize, de::DeserializeOwned};
use std::error::Error;

/// 聚合根接口
pub trait Aggregate: Entity + Serialize + DeserializeOwned + Send + Sync {
    const TYPE: &'static str;

    type Command;
    type Event;
    type Error: Error + Send + Sync + 'static;

    /// 纯判定：校验当前状态并给出事件，不修改自身
    fn execute(&self, command: Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// 事件必须来自 `execute`，应用过程不会失败
    fn apply(&mut self, event: &Self::Event);

    /// 执行命令并依次应用产生的事件，返回已应用的事件
    fn handle(&mut self, command: Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = self.execute(command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }
}

//! 持久化协议（persist）
//!
//! 定义按实体拆分的访问接口与显式事务边界：
//! - 会员、商品、商品图片与订单仓储（`MemberRepository` 等）；
//! - 分页请求与分页结果（`PageRequest`、`Page`）；
//! - 工作单元（`UnitOfWork`）与事务（`Transaction`）：一次业务操作一个事务，
//!   `commit` 之前的写入对外不可见，丢弃事务即回滚。
//!
//! 该模块只描述协议，具体存储后端由上层提供实现并注入；
//! `inmemory` 特性下附带一个串行化的内存实现（`InMemoryStore`）。
//!
mod page;
mod repository;

#[cfg(feature = "inmemory")]
mod inmemory;

pub use page::{Direction, Page, PageRequest};
pub use repository::{
    ItemImgRepository, ItemRepository, MemberRepository, OrderRepository, Transaction, TxMode,
    UnitOfWork,
};

#[cfg(feature = "inmemory")]
pub use inmemory::{InMemoryStore, InMemoryTransaction};

//! 网店应用层（shop-application）
//!
//! 以应用服务编排领域模型与事务边界：
//! - 订单流程（`order`）：下单、订单历史、归属校验与取消；
//! - 会员注册与认证（`member`）、商品登记与详情（`item`）；
//! - 命令/查询总线（`InMemoryCommandBus`、`InMemoryQueryBus`）：
//!   以 `AppContext` 携带操作者信息，将接口层请求路由到对应服务；
//! - 配置（`config`）与统一错误（`error`）。
//!
pub mod command;
pub mod command_bus;
pub mod config;
pub mod context;
pub mod dto;
pub mod error;
pub mod inmemory_command_bus;
pub mod inmemory_query_bus;
pub mod item;
pub mod member;
pub mod order;
pub mod query;
pub mod query_bus;
mod registry;

pub use inmemory_command_bus::InMemoryCommandBus;
pub use inmemory_query_bus::InMemoryQueryBus;

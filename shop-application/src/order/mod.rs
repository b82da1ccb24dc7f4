//! 订单流程：下单、订单历史、归属校验与取消
//!
//! `OrderService` 既可直接调用，也作为命令/查询处理器注册到总线上；
//! 经总线调用时以 `AppContext` 中的会员邮箱作为操作者。
//!
pub mod command;
pub mod dto;
pub mod query;
pub mod service;

pub use command::{CancelOrder, OrderLine, PlaceOrder, PlaceOrders};
pub use dto::{OrderHistDto, OrderItemDto, OwnershipDto};
pub use query::{OrderHistory, OrderOwnership};
pub use service::OrderService;

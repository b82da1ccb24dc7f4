use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shop_domain::model::{ItemId, OrderId};
use shop_domain::persist::UnitOfWork;
use tracing::warn;

use crate::command::{Command, CommandHandler};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::order::service::OrderService;

/// 一条下单请求行：商品与数量
///
/// 数量保留接口层的原始有符号值，在服务内统一校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub count: i64,
}

impl OrderLine {
    pub fn new(item_id: ItemId, count: i64) -> Self {
        Self { item_id, count }
    }
}

/// 单件下单
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrder {
    pub item_id: ItemId,
    pub count: i64,
}

impl Command for PlaceOrder {
    const NAME: &'static str = "order.place";
    type Output = OrderId;
}

/// 购物车批量下单
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrders {
    pub lines: Vec<OrderLine>,
}

impl Command for PlaceOrders {
    const NAME: &'static str = "order.place_many";
    type Output = OrderId;
}

/// 取消订单，仅订单所属会员可执行
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CancelOrder {
    pub order_id: OrderId,
}

impl Command for CancelOrder {
    const NAME: &'static str = "order.cancel";
    type Output = ();
}

#[async_trait]
impl<U> CommandHandler<PlaceOrder> for OrderService<U>
where
    U: UnitOfWork + 'static,
{
    async fn handle(&self, ctx: &AppContext, cmd: PlaceOrder) -> AppResult<OrderId> {
        let email = ctx.member_email()?;
        self.place_order(cmd.item_id, cmd.count, email).await
    }
}

#[async_trait]
impl<U> CommandHandler<PlaceOrders> for OrderService<U>
where
    U: UnitOfWork + 'static,
{
    async fn handle(&self, ctx: &AppContext, cmd: PlaceOrders) -> AppResult<OrderId> {
        let email = ctx.member_email()?;
        self.place_orders(cmd.lines, email).await
    }
}

#[async_trait]
impl<U> CommandHandler<CancelOrder> for OrderService<U>
where
    U: UnitOfWork + 'static,
{
    async fn handle(&self, ctx: &AppContext, cmd: CancelOrder) -> AppResult<()> {
        let email = ctx.member_email()?;

        if !self.validate_ownership(cmd.order_id, email).await? {
            warn!(order_id = %cmd.order_id, member = %email, "cancel rejected: not the owner");
            return Err(AppError::Authorization(
                "no permission to cancel this order".to_string(),
            ));
        }

        self.cancel_order(cmd.order_id).await
    }
}

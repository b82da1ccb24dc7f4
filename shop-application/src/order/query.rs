use async_trait::async_trait;
use serde::Deserialize;
use shop_domain::model::OrderId;
use shop_domain::persist::{Page, UnitOfWork};

use crate::context::AppContext;
use crate::error::AppResult;
use crate::order::dto::{OrderHistDto, OwnershipDto};
use crate::order::service::OrderService;
use crate::query::{Query, QueryHandler};

/// 当前会员的订单历史；`size` 缺省时取配置的默认页大小
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OrderHistory {
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub size: Option<usize>,
}

impl Query for OrderHistory {
    const NAME: &'static str = "order.history";
    type Dto = Page<OrderHistDto>;
}

/// 订单是否属于当前会员
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderOwnership {
    pub order_id: OrderId,
}

impl Query for OrderOwnership {
    const NAME: &'static str = "order.ownership";
    type Dto = OwnershipDto;
}

#[async_trait]
impl<U> QueryHandler<OrderHistory> for OrderService<U>
where
    U: UnitOfWork + 'static,
{
    async fn handle(&self, ctx: &AppContext, q: OrderHistory) -> AppResult<Page<OrderHistDto>> {
        let email = ctx.member_email()?;
        let pageable = self.page_request(q.page, q.size)?;
        self.list_order_history(email, pageable).await
    }
}

#[async_trait]
impl<U> QueryHandler<OrderOwnership> for OrderService<U>
where
    U: UnitOfWork + 'static,
{
    async fn handle(&self, ctx: &AppContext, q: OrderOwnership) -> AppResult<OwnershipDto> {
        let email = ctx.member_email()?;
        let owned = self.validate_ownership(q.order_id, email).await?;
        Ok(OwnershipDto {
            order_id: q.order_id,
            owned,
        })
    }
}

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::Utc;
use shop_domain::aggregate::Aggregate;
use shop_domain::entity::Entity;
use shop_domain::error::{DomainError, DomainResult};
use shop_domain::model::{Item, ItemId, Order, OrderCommand, OrderEvent, OrderId, OrderItem};
use shop_domain::persist::{
    ItemImgRepository, ItemRepository, MemberRepository, OrderRepository, Page, PageRequest,
    Transaction, TxMode, UnitOfWork,
};
use shop_domain::value_object::Quantity;
use tracing::{debug, info};

use crate::config::PagingConfig;
use crate::error::AppResult;
use crate::order::command::OrderLine;
use crate::order::dto::{OrderHistDto, OrderItemDto};

/// 订单流程服务
///
/// 每个操作在一个事务内完成：写操作以 `ReadWrite` 开启，成功后显式提交；
/// 任一步骤出错时事务随之丢弃，不留下任何部分写入。
pub struct OrderService<U> {
    uow: U,
    paging: PagingConfig,
}

impl<U: UnitOfWork> OrderService<U> {
    pub fn new(uow: U, paging: PagingConfig) -> Self {
        Self { uow, paging }
    }

    /// 按配置补全页大小，生成分页请求
    pub fn page_request(&self, page: usize, size: Option<usize>) -> AppResult<PageRequest> {
        let size = size.unwrap_or(self.paging.default_size);
        Ok(PageRequest::new(page, size)?)
    }

    /// 单件下单
    pub async fn place_order(
        &self,
        item_id: ItemId,
        count: i64,
        member_email: &str,
    ) -> AppResult<OrderId> {
        self.place_orders(vec![OrderLine::new(item_id, count)], member_email)
            .await
    }

    /// 多件下单：所有订单行归入同一订单
    ///
    /// 任何一行的商品不存在或库存不足时整体失败，不落库任何订单。
    /// 同一商品出现在多行时共用同一份库存。
    #[tracing::instrument(
        name = "order.place",
        skip_all,
        fields(member = %member_email, lines = lines.len())
    )]
    pub async fn place_orders(
        &self,
        lines: Vec<OrderLine>,
        member_email: &str,
    ) -> AppResult<OrderId> {
        if lines.is_empty() {
            return Err(DomainError::invalid_argument("an order needs at least one line").into());
        }
        let counts = lines
            .iter()
            .map(|line| Quantity::new(line.count))
            .collect::<DomainResult<Vec<_>>>()?;

        let mut tx = self.uow.begin(TxMode::ReadWrite).await?;

        let mut items: HashMap<ItemId, Item> = HashMap::new();
        for line in &lines {
            if let Entry::Vacant(slot) = items.entry(line.item_id) {
                let item = tx
                    .find_item(&line.item_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("item", line.item_id))?;
                slot.insert(item);
            }
        }

        let member = tx
            .find_member_by_email(member_email)
            .await?
            .ok_or_else(|| DomainError::not_found("member", member_email))?;

        let mut order_items = Vec::with_capacity(lines.len());
        for (line, count) in lines.iter().zip(counts) {
            let item = items
                .get_mut(&line.item_id)
                .ok_or_else(|| DomainError::not_found("item", line.item_id))?;
            order_items.push(OrderItem::create(item, count)?);
        }

        for item in items.into_values() {
            tx.save_item(item).await?;
        }

        let order = Order::create(&member, order_items, Utc::now())?;
        let order_id = *order.id();
        let total = order.total_price();
        tx.save_order(order).await?;
        tx.commit().await?;

        info!(%order_id, %total, "order placed");
        Ok(order_id)
    }

    /// 会员订单历史（只读）
    ///
    /// 页大小超过配置上限时截断。每条订单行都需要能找到商品及其代表图，
    /// 否则视为数据完整性错误。
    #[tracing::instrument(
        name = "order.history",
        skip_all,
        fields(member = %member_email, page = pageable.page(), size = pageable.size())
    )]
    pub async fn list_order_history(
        &self,
        member_email: &str,
        pageable: PageRequest,
    ) -> AppResult<Page<OrderHistDto>> {
        let pageable = pageable.clamp_size(self.paging.max_size);
        let tx = self.uow.begin(TxMode::ReadOnly).await?;

        let orders = tx.find_orders(member_email, &pageable).await?;
        let total = tx.count_orders(member_email).await?;

        let mut content = Vec::with_capacity(orders.len());
        for order in &orders {
            let mut dto = OrderHistDto::from_order(order);

            for line in order.order_items() {
                let item = tx.find_item(line.item_id()).await?.ok_or_else(|| {
                    DomainError::integrity(format!(
                        "order {} references missing item {}",
                        order.id(),
                        line.item_id()
                    ))
                })?;
                let img = tx
                    .find_item_img_by_representative(line.item_id(), true)
                    .await?
                    .ok_or_else(|| {
                        DomainError::integrity(format!(
                            "item {} has no representative image",
                            line.item_id()
                        ))
                    })?;

                dto.add_order_item(OrderItemDto::new(line, item.name(), img.img_url()));
            }

            content.push(dto);
        }

        debug!(returned = content.len(), total, "order history loaded");
        Ok(Page::new(content, pageable, total))
    }

    /// 判断订单是否属于该邮箱对应的会员（邮箱精确比较，区分大小写）
    #[tracing::instrument(
        name = "order.ownership",
        skip_all,
        fields(order_id = %order_id, member = %member_email)
    )]
    pub async fn validate_ownership(
        &self,
        order_id: OrderId,
        member_email: &str,
    ) -> AppResult<bool> {
        let tx = self.uow.begin(TxMode::ReadOnly).await?;

        let order = tx
            .find_order(&order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("order", order_id))?;
        let current = tx
            .find_member_by_email(member_email)
            .await?
            .ok_or_else(|| DomainError::not_found("member", member_email))?;
        let owner = tx.find_member(order.member_id()).await?.ok_or_else(|| {
            DomainError::integrity(format!(
                "order {order_id} belongs to missing member {}",
                order.member_id()
            ))
        })?;

        Ok(current.email() == owner.email())
    }

    /// 取消订单并归还各订单行的库存
    ///
    /// 已取消的订单再次取消返回 `InvalidState`。
    #[tracing::instrument(name = "order.cancel", skip_all, fields(order_id = %order_id))]
    pub async fn cancel_order(&self, order_id: OrderId) -> AppResult<()> {
        let mut tx = self.uow.begin(TxMode::ReadWrite).await?;

        let mut order = tx
            .find_order(&order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("order", order_id))?;

        let events = order.handle(OrderCommand::Cancel)?;
        for event in &events {
            match event {
                OrderEvent::Cancelled { restocks, .. } => {
                    for restock in restocks {
                        restock_item(&mut tx, &restock.item_id, restock.count).await?;
                    }
                }
            }
        }

        tx.save_order(order).await?;
        tx.commit().await?;

        info!(%order_id, "order cancelled");
        Ok(())
    }
}

async fn restock_item<T: Transaction>(
    tx: &mut T,
    item_id: &ItemId,
    count: Quantity,
) -> AppResult<()> {
    let mut item = tx.find_item(item_id).await?.ok_or_else(|| {
        DomainError::integrity(format!(
            "cancelled order references missing item {item_id}"
        ))
    })?;
    item.add_stock(count)?;
    tx.save_item(item).await?;
    Ok(())
}

//! 订单聚合
//!
//! `Order` 是聚合根，独占其 `OrderItem` 列表；订单行在下单时以商品当前价格做快照，
//! 之后商品改价不影响历史订单。状态只允许 `ORDER → CANCEL` 单向流转。
//!
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::model::{Item, ItemId, Member, MemberId, OrderId};
use crate::value_object::{Money, Quantity, Version};

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Order,
    Cancel,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Order => f.write_str("ORDER"),
            OrderStatus::Cancel => f.write_str("CANCEL"),
        }
    }
}

/// 订单行快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    item_id: ItemId,
    order_price: Money,
    count: Quantity,
}

impl OrderItem {
    /// 以商品当前价格生成订单行，并从商品库存中扣减对应数量
    pub fn create(item: &mut Item, count: Quantity) -> DomainResult<Self> {
        item.remove_stock(count)?;

        Ok(Self {
            item_id: *item.id(),
            order_price: item.price(),
            count,
        })
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    /// 下单时的单价
    pub fn order_price(&self) -> Money {
        self.order_price
    }

    pub fn count(&self) -> Quantity {
        self.count
    }

    pub fn total_price(&self) -> Money {
        self.order_price.times(self.count)
    }
}

/// 订单聚合根
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOrder")]
pub struct Order {
    id: OrderId,
    version: Version,
    member_id: MemberId,
    ordered_at: DateTime<Utc>,
    status: OrderStatus,
    order_items: Vec<OrderItem>,
}

impl Order {
    /// 为会员创建新订单，订单行至少一条
    pub fn create(
        member: &Member,
        order_items: Vec<OrderItem>,
        ordered_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        ensure_order_items(&order_items)?;

        Ok(Self {
            id: OrderId::new(),
            version: Version::new(),
            member_id: *member.id(),
            ordered_at,
            status: OrderStatus::Order,
            order_items,
        })
    }

    pub fn member_id(&self) -> &MemberId {
        &self.member_id
    }

    pub fn ordered_at(&self) -> DateTime<Utc> {
        self.ordered_at
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancel
    }

    pub fn order_items(&self) -> &[OrderItem] {
        &self.order_items
    }

    /// 订单总价，始终由订单行推导
    pub fn total_price(&self) -> Money {
        self.order_items.iter().map(OrderItem::total_price).sum()
    }
}

fn ensure_order_items(order_items: &[OrderItem]) -> DomainResult<()> {
    if order_items.is_empty() {
        return Err(DomainError::invalid_argument(
            "an order needs at least one order item",
        ));
    }
    Ok(())
}

/// 反序列化时的原始形态，校验订单行非空后才还原为 `Order`
#[derive(Deserialize)]
struct RawOrder {
    id: OrderId,
    version: Version,
    member_id: MemberId,
    ordered_at: DateTime<Utc>,
    status: OrderStatus,
    order_items: Vec<OrderItem>,
}

impl TryFrom<RawOrder> for Order {
    type Error = DomainError;

    fn try_from(raw: RawOrder) -> Result<Self, Self::Error> {
        ensure_order_items(&raw.order_items)?;

        Ok(Self {
            id: raw.id,
            version: raw.version,
            member_id: raw.member_id,
            ordered_at: raw.ordered_at,
            status: raw.status,
            order_items: raw.order_items,
        })
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

/// 订单命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderCommand {
    Cancel,
}

/// 取消订单时需归还的库存
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restock {
    pub item_id: ItemId,
    pub count: Quantity,
}

/// 订单事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    Cancelled {
        aggregate_version: Version,
        restocks: Vec<Restock>,
    },
}

impl Aggregate for Order {
    const TYPE: &'static str = "order";

    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = DomainError;

    fn execute(&self, command: Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::Cancel => {
                if self.is_cancelled() {
                    return Err(DomainError::invalid_state(format!(
                        "order {} is already cancelled",
                        self.id
                    )));
                }

                let restocks = self
                    .order_items
                    .iter()
                    .map(|line| Restock {
                        item_id: line.item_id,
                        count: line.count,
                    })
                    .collect();

                Ok(vec![OrderEvent::Cancelled {
                    aggregate_version: self.version.next(),
                    restocks,
                }])
            }
        }
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::Cancelled {
                aggregate_version, ..
            } => {
                self.status = OrderStatus::Cancel;
                self.version = *aggregate_version;
            }
        }
    }
}

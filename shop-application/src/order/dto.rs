use serde::Serialize;
use shop_domain::entity::Entity;
use shop_domain::model::{Order, OrderId, OrderItem, OrderStatus};
use shop_domain::value_object::Money;

use crate::dto::Dto;

/// 订单历史中的一条订单
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderHistDto {
    pub order_id: OrderId,
    /// 下单时间，`yyyy-MM-dd HH:mm`
    pub order_date: String,
    pub order_status: OrderStatus,
    pub total_price: Money,
    pub order_items: Vec<OrderItemDto>,
}

impl OrderHistDto {
    /// 以订单头信息构造，订单行随后逐条追加
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: *order.id(),
            order_date: order.ordered_at().format("%Y-%m-%d %H:%M").to_string(),
            order_status: order.status(),
            total_price: order.total_price(),
            order_items: Vec::with_capacity(order.order_items().len()),
        }
    }

    pub fn add_order_item(&mut self, item: OrderItemDto) {
        self.order_items.push(item);
    }
}

impl Dto for OrderHistDto {}

/// 订单行视图：商品名、数量、下单单价与代表图地址
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemDto {
    pub item_name: String,
    pub count: u32,
    pub order_price: Money,
    pub img_url: String,
}

impl OrderItemDto {
    pub fn new(line: &OrderItem, item_name: impl Into<String>, img_url: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            count: line.count().value(),
            order_price: line.order_price(),
            img_url: img_url.into(),
        }
    }
}

/// 订单归属校验结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OwnershipDto {
    pub order_id: OrderId,
    pub owned: bool,
}

impl Dto for OwnershipDto {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shop_domain::model::{Item, Member};
    use shop_domain::value_object::Quantity;

    #[test]
    fn hist_dto_formats_date_and_serializes_flat() {
        let member = Member::register("Alice", "alice@shop.test", "s$h", "Seoul").unwrap();
        let mut mug = Item::new("Mug", 12, 3, "").unwrap();
        let line = OrderItem::create(&mut mug, Quantity::new(2).unwrap()).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 59).unwrap();
        let order = Order::create(&member, vec![line.clone()], at).unwrap();

        let mut dto = OrderHistDto::from_order(&order);
        dto.add_order_item(OrderItemDto::new(&line, mug.name(), "/img/mug.png"));

        assert_eq!(dto.order_date, "2024-03-09 14:05");
        assert_eq!(dto.total_price.amount(), 24);

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["order_status"], "ORDER");
        assert_eq!(json["order_items"][0]["item_name"], "Mug");
        assert_eq!(json["order_items"][0]["count"], 2);
        assert_eq!(json["order_items"][0]["order_price"], 12);
        assert_eq!(json["order_items"][0]["img_url"], "/img/mug.png");
    }
}

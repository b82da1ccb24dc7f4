use serde::Serialize;
use shop_domain::entity::Entity;
use shop_domain::model::{Item, ItemId, ItemImg};
use shop_domain::value_object::Money;

use crate::dto::Dto;

/// 商品详情
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDto {
    pub item_id: ItemId,
    pub name: String,
    pub price: Money,
    pub stock: u32,
    pub detail: String,
    /// 按登记顺序排列的全部图片地址
    pub img_urls: Vec<String>,
    pub representative_img_url: Option<String>,
}

impl ItemDto {
    pub fn new(item: &Item, imgs: &[ItemImg]) -> Self {
        Self {
            item_id: *item.id(),
            name: item.name().to_string(),
            price: item.price(),
            stock: item.stock(),
            detail: item.detail().to_string(),
            img_urls: imgs.iter().map(|img| img.img_url().to_string()).collect(),
            representative_img_url: imgs
                .iter()
                .find(|img| img.is_representative())
                .map(|img| img.img_url().to_string()),
        }
    }
}

impl Dto for ItemDto {}

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::model::{ItemId, ItemImgId};
use crate::value_object::{Money, Quantity, Version};

/// 可售商品
///
/// 价格为正，库存为非负整数；库存的每次变动都会推进版本号。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawItem")]
pub struct Item {
    id: ItemId,
    version: Version,
    name: String,
    price: Money,
    stock: u32,
    detail: String,
}

impl Item {
    pub fn new(
        name: impl Into<String>,
        price: i64,
        stock: i64,
        detail: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let price = Money::new(price)?;
        ensure_listing(&name, price)?;

        let stock = u32::try_from(stock)
            .map_err(|_| DomainError::invalid_argument(format!("invalid stock: {stock}")))?;

        Ok(Self {
            id: ItemId::new(),
            version: Version::new(),
            name,
            price,
            stock,
            detail: detail.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// 扣减库存；库存不足时返回 `OutOfStock` 且不做任何修改
    pub fn remove_stock(&mut self, quantity: Quantity) -> DomainResult<()> {
        let requested = quantity.value();
        let remaining = self
            .stock
            .checked_sub(requested)
            .ok_or_else(|| DomainError::OutOfStock {
                item_id: self.id.to_string(),
                requested,
                available: self.stock,
            })?;

        self.stock = remaining;
        self.version = self.version.next();
        Ok(())
    }

    /// 归还库存（订单取消时）
    pub fn add_stock(&mut self, quantity: Quantity) -> DomainResult<()> {
        self.stock = self
            .stock
            .checked_add(quantity.value())
            .ok_or_else(|| {
                DomainError::invalid_state(format!("stock overflow on item {}", self.id))
            })?;
        self.version = self.version.next();
        Ok(())
    }
}

fn ensure_listing(name: &str, price: Money) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::invalid_argument("item name is required"));
    }
    if !price.is_positive() {
        return Err(DomainError::invalid_argument("item price must be > 0"));
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawItem {
    id: ItemId,
    version: Version,
    name: String,
    price: Money,
    stock: u32,
    detail: String,
}

impl TryFrom<RawItem> for Item {
    type Error = DomainError;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        ensure_listing(&raw.name, raw.price)?;

        Ok(Self {
            id: raw.id,
            version: raw.version,
            name: raw.name,
            price: raw.price,
            stock: raw.stock,
            detail: raw.detail,
        })
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

/// 商品图片
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawItemImg")]
pub struct ItemImg {
    id: ItemImgId,
    item_id: ItemId,
    ori_img_name: String,
    img_url: String,
    representative: bool,
}

impl ItemImg {
    pub fn new(
        item_id: ItemId,
        ori_img_name: impl Into<String>,
        img_url: impl Into<String>,
        representative: bool,
    ) -> DomainResult<Self> {
        let img_url = img_url.into();
        ensure_img_url(&img_url)?;

        Ok(Self {
            id: ItemImgId::new(),
            item_id,
            ori_img_name: ori_img_name.into(),
            img_url,
            representative,
        })
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn ori_img_name(&self) -> &str {
        &self.ori_img_name
    }

    pub fn img_url(&self) -> &str {
        &self.img_url
    }

    pub fn is_representative(&self) -> bool {
        self.representative
    }
}

impl Entity for ItemImg {
    type Id = ItemImgId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> Version {
        Version::new()
    }
}

fn ensure_img_url(img_url: &str) -> DomainResult<()> {
    if img_url.trim().is_empty() {
        return Err(DomainError::invalid_argument("image url is required"));
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawItemImg {
    id: ItemImgId,
    item_id: ItemId,
    ori_img_name: String,
    img_url: String,
    representative: bool,
}

impl TryFrom<RawItemImg> for ItemImg {
    type Error = DomainError;

    fn try_from(raw: RawItemImg) -> Result<Self, Self::Error> {
        ensure_img_url(&raw.img_url)?;

        Ok(Self {
            id: raw.id,
            item_id: raw.item_id,
            ori_img_name: raw.ori_img_name,
            img_url: raw.img_url,
            representative: raw.representative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qty(n: i64) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[test]
    fn new_item_validates_price_and_stock() {
        assert!(Item::new("Mug", 0, 1, "").is_err());
        assert!(Item::new("Mug", -5, 1, "").is_err());
        assert!(Item::new("Mug", 5, -1, "").is_err());
        assert!(Item::new("", 5, 1, "").is_err());

        let item = Item::new("Mug", 12_000, 3, "ceramic").unwrap();
        assert_eq!(item.price().amount(), 12_000);
        assert_eq!(item.stock(), 3);
    }

    #[test]
    fn remove_stock_is_all_or_nothing() {
        let mut item = Item::new("Mug", 100, 3, "").unwrap();

        item.remove_stock(qty(2)).unwrap();
        assert_eq!(item.stock(), 1);
        assert_eq!(item.version().value(), 1);

        match item.remove_stock(qty(2)).unwrap_err() {
            DomainError::OutOfStock {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(item.stock(), 1);
        assert_eq!(item.version().value(), 1);
    }

    #[test]
    fn add_stock_restores() {
        let mut item = Item::new("Mug", 100, 0, "").unwrap();
        item.add_stock(qty(4)).unwrap();
        assert_eq!(item.stock(), 4);
    }

    #[test]
    fn image_requires_url() {
        let item_id = ItemId::new();
        assert!(ItemImg::new(item_id, "a.png", " ", true).is_err());

        let img = ItemImg::new(item_id, "a.png", "/images/item/a.png", true).unwrap();
        assert!(img.is_representative());
        assert_eq!(img.item_id(), &item_id);
    }

    #[test]
    fn deserialization_applies_listing_rules() {
        let item = Item::new("Mug", 100, 2, "").unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(serde_json::from_value::<Item>(json.clone()).unwrap(), item);

        let mut free = json.clone();
        free["price"] = serde_json::json!(0);
        assert!(serde_json::from_value::<Item>(free).is_err());

        let mut unnamed = json;
        unnamed["name"] = serde_json::json!("  ");
        assert!(serde_json::from_value::<Item>(unnamed).is_err());

        let img = ItemImg::new(*item.id(), "a.png", "/images/item/a.png", false).unwrap();
        let mut blank = serde_json::to_value(&img).unwrap();
        blank["img_url"] = serde_json::json!("");
        assert!(serde_json::from_value::<ItemImg>(blank).is_err());
    }
}

//! 商品登记与详情
pub mod dto;
pub mod service;

pub use dto::ItemDto;
pub use service::{ImageUpload, ItemDetail, ItemForm, ItemService, RegisterItem};

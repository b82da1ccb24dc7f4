//! 网店领域模型
//!
//! - `Member`：会员，按邮箱唯一；
//! - `Item` / `ItemImg`：商品及其图片，每个商品有且仅有一张代表图；
//! - `Order` / `OrderItem`：订单聚合根及其独占的订单行快照。
//!
mod ids;
mod item;
mod member;
mod order;

pub use ids::{ItemId, ItemImgId, MemberId, OrderId};
pub use item::{Item, ItemImg};
pub use member::{Member, Role};
pub use order::{Order, OrderCommand, OrderEvent, OrderItem, OrderStatus, Restock};

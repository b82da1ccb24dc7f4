use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DomainResult;
use crate::model::{Item, ItemId, ItemImg, Member, MemberId, Order, OrderId};
use crate::persist::PageRequest;

#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn find_member(&self, id: &MemberId) -> DomainResult<Option<Member>>;

    async fn find_member_by_email(&self, email: &str) -> DomainResult<Option<Member>>;

    /// 插入或覆盖会员；邮箱与其他会员重复时返回 `Conflict`
    async fn save_member(&mut self, member: Member) -> DomainResult<()>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn find_item(&self, id: &ItemId) -> DomainResult<Option<Item>>;

    async fn save_item(&mut self, item: Item) -> DomainResult<()>;
}

#[async_trait]
pub trait ItemImgRepository: Send + Sync {
    /// 按登记顺序返回商品的全部图片
    async fn find_item_imgs(&self, item_id: &ItemId) -> DomainResult<Vec<ItemImg>>;

    /// 按代表图标记查找商品图片（`representative = true` 即代表图）
    async fn find_item_img_by_representative(
        &self,
        item_id: &ItemId,
        representative: bool,
    ) -> DomainResult<Option<ItemImg>>;

    async fn save_item_img(&mut self, img: ItemImg) -> DomainResult<()>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_order(&self, id: &OrderId) -> DomainResult<Option<Order>>;

    /// 插入或覆盖订单（连同其订单行）；比已存版本更旧的写入返回 `VersionConflict`
    async fn save_order(&mut self, order: Order) -> DomainResult<()>;

    /// 按会员邮箱分页查询订单，按下单时间排序
    async fn find_orders(&self, email: &str, page: &PageRequest) -> DomainResult<Vec<Order>>;

    /// 与 `find_orders` 相同过滤条件下的订单总数
    async fn count_orders(&self, email: &str) -> DomainResult<u64>;
}

/// 事务模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxMode {
    /// 只读事务，任何写入都会被拒绝
    ReadOnly,
    ReadWrite,
}

/// 一次业务操作的事务
///
/// 在事务上通过各仓储接口读写；`commit` 之前的写入对其他事务不可见。
/// 未提交即被丢弃的事务视为回滚。
#[async_trait]
pub trait Transaction:
    MemberRepository + ItemRepository + ItemImgRepository + OrderRepository
{
    fn mode(&self) -> TxMode;

    async fn commit(self) -> DomainResult<()>;

    async fn rollback(self) -> DomainResult<()>;
}

/// 工作单元：开启事务的入口
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    type Tx: Transaction + 'static;

    async fn begin(&self, mode: TxMode) -> DomainResult<Self::Tx>;
}

#[async_trait]
impl<U> UnitOfWork for Arc<U>
where
    U: UnitOfWork + ?Sized,
{
    type Tx = U::Tx;

    async fn begin(&self, mode: TxMode) -> DomainResult<Self::Tx> {
        (**self).begin(mode).await
    }
}

//! 内存版事务存储（InMemoryStore）
//!
//! 基于 `tokio::sync::Mutex` 的轻量存储，满足 `UnitOfWork` 协议：
//! - `begin`：获取整库互斥锁并持有至事务结束，事务之间串行化执行；
//! - 读写事务在副本上修改，`commit` 时整体替换，丢弃事务即回滚；
//! - 只读事务直接读取已提交数据，拒绝任何写入。
//!
//! 保存时执行与关系库相同的约束检查：会员邮箱唯一、外键存在、
//! 每个商品至多一张代表图、订单/商品版本不可回退。
//!
//! 典型用途：测试环境、示例与本地开发。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::model::{Item, ItemId, ItemImg, Member, MemberId, Order, OrderId};
use crate::persist::{
    Direction, ItemImgRepository, ItemRepository, MemberRepository, OrderRepository, PageRequest,
    Transaction, TxMode, UnitOfWork,
};
use crate::value_object::Version;

#[derive(Debug, Clone, Default)]
struct Tables {
    members: HashMap<MemberId, Member>,
    items: HashMap<ItemId, Item>,
    // 按登记顺序
    item_imgs: Vec<ItemImg>,
    // 按首次保存顺序
    orders: Vec<Order>,
}

impl Tables {
    fn member_by_email(&self, email: &str) -> Option<&Member> {
        self.members.values().find(|m| m.email() == email)
    }
}

/// 简单的内存事务存储实现
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnitOfWork for InMemoryStore {
    type Tx = InMemoryTransaction;

    async fn begin(&self, mode: TxMode) -> DomainResult<Self::Tx> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let working = match mode {
            TxMode::ReadOnly => None,
            TxMode::ReadWrite => Some((*guard).clone()),
        };

        Ok(InMemoryTransaction {
            guard,
            working,
            mode,
        })
    }
}

/// `InMemoryStore` 上的事务
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    // 只读事务为 None
    working: Option<Tables>,
    mode: TxMode,
}

impl InMemoryTransaction {
    fn view(&self) -> &Tables {
        match &self.working {
            Some(tables) => tables,
            None => &*self.guard,
        }
    }

    fn working_mut(&mut self) -> DomainResult<&mut Tables> {
        self.working
            .as_mut()
            .ok_or_else(|| DomainError::repository("write attempted in a read-only transaction"))
    }
}

// 写入的版本不得落后于已提交版本
fn check_version(stored: Version, incoming: Version) -> DomainResult<()> {
    if incoming < stored {
        return Err(DomainError::VersionConflict {
            expected: stored.value(),
            actual: incoming.value(),
        });
    }
    Ok(())
}

#[async_trait]
impl MemberRepository for InMemoryTransaction {
    async fn find_member(&self, id: &MemberId) -> DomainResult<Option<Member>> {
        Ok(self.view().members.get(id).cloned())
    }

    async fn find_member_by_email(&self, email: &str) -> DomainResult<Option<Member>> {
        Ok(self.view().member_by_email(email).cloned())
    }

    async fn save_member(&mut self, member: Member) -> DomainResult<()> {
        let tables = self.working_mut()?;

        if let Some(other) = tables.member_by_email(member.email()) {
            if other.id() != member.id() {
                return Err(DomainError::conflict(format!(
                    "email already registered: {}",
                    member.email()
                )));
            }
        }

        tables.members.insert(*member.id(), member);
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for InMemoryTransaction {
    async fn find_item(&self, id: &ItemId) -> DomainResult<Option<Item>> {
        Ok(self.view().items.get(id).cloned())
    }

    async fn save_item(&mut self, item: Item) -> DomainResult<()> {
        let tables = self.working_mut()?;

        if let Some(stored) = tables.items.get(item.id()) {
            check_version(stored.version(), item.version())?;
        }

        tables.items.insert(*item.id(), item);
        Ok(())
    }
}

#[async_trait]
impl ItemImgRepository for InMemoryTransaction {
    async fn find_item_imgs(&self, item_id: &ItemId) -> DomainResult<Vec<ItemImg>> {
        Ok(self
            .view()
            .item_imgs
            .iter()
            .filter(|img| img.item_id() == item_id)
            .cloned()
            .collect())
    }

    async fn find_item_img_by_representative(
        &self,
        item_id: &ItemId,
        representative: bool,
    ) -> DomainResult<Option<ItemImg>> {
        Ok(self
            .view()
            .item_imgs
            .iter()
            .find(|img| img.item_id() == item_id && img.is_representative() == representative)
            .cloned())
    }

    async fn save_item_img(&mut self, img: ItemImg) -> DomainResult<()> {
        let tables = self.working_mut()?;

        if !tables.items.contains_key(img.item_id()) {
            return Err(DomainError::integrity(format!(
                "image {} references unknown item {}",
                img.id(),
                img.item_id()
            )));
        }

        let duplicate_representative = img.is_representative()
            && tables.item_imgs.iter().any(|other| {
                other.item_id() == img.item_id()
                    && other.is_representative()
                    && other.id() != img.id()
            });
        if duplicate_representative {
            return Err(DomainError::integrity(format!(
                "item {} already has a representative image",
                img.item_id()
            )));
        }

        match tables.item_imgs.iter_mut().find(|other| other.id() == img.id()) {
            Some(slot) => *slot = img,
            None => tables.item_imgs.push(img),
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryTransaction {
    async fn find_order(&self, id: &OrderId) -> DomainResult<Option<Order>> {
        Ok(self.view().orders.iter().find(|o| o.id() == id).cloned())
    }

    async fn save_order(&mut self, order: Order) -> DomainResult<()> {
        let tables = self.working_mut()?;

        if !tables.members.contains_key(order.member_id()) {
            return Err(DomainError::integrity(format!(
                "order {} references unknown member {}",
                order.id(),
                order.member_id()
            )));
        }
        if let Some(line) = order
            .order_items()
            .iter()
            .find(|line| !tables.items.contains_key(line.item_id()))
        {
            return Err(DomainError::integrity(format!(
                "order {} references unknown item {}",
                order.id(),
                line.item_id()
            )));
        }

        match tables.orders.iter_mut().find(|o| o.id() == order.id()) {
            Some(slot) => {
                check_version(slot.version(), order.version())?;
                *slot = order;
            }
            None => tables.orders.push(order),
        }
        Ok(())
    }

    async fn find_orders(&self, email: &str, page: &PageRequest) -> DomainResult<Vec<Order>> {
        let tables = self.view();
        let Some(member) = tables.member_by_email(email) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<&Order> = tables
            .orders
            .iter()
            .filter(|o| o.member_id() == member.id())
            .collect();

        // 稳定排序：同一时间戳的订单按保存顺序（降序时后保存者在前）
        match page.direction() {
            Direction::Desc => {
                matched.reverse();
                matched.sort_by(|a, b| b.ordered_at().cmp(&a.ordered_at()));
            }
            Direction::Asc => matched.sort_by_key(|o| o.ordered_at()),
        }

        Ok(matched
            .into_iter()
            .skip(page.offset())
            .take(page.size())
            .cloned()
            .collect())
    }

    async fn count_orders(&self, email: &str) -> DomainResult<u64> {
        let tables = self.view();
        let Some(member) = tables.member_by_email(email) else {
            return Ok(0);
        };

        Ok(tables
            .orders
            .iter()
            .filter(|o| o.member_id() == member.id())
            .count() as u64)
    }
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    fn mode(&self) -> TxMode {
        self.mode
    }

    async fn commit(self) -> DomainResult<()> {
        let InMemoryTransaction {
            mut guard, working, ..
        } = self;

        if let Some(tables) = working {
            *guard = tables;
        }
        Ok(())
    }

    async fn rollback(self) -> DomainResult<()> {
        drop(self);
        Ok(())
    }
}

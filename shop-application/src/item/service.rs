use async_trait::async_trait;
use bon::Builder;
use serde::{Deserialize, Serialize};
use shop_domain::entity::Entity;
use shop_domain::error::DomainError;
use shop_domain::model::{Item, ItemId, ItemImg};
use shop_domain::persist::{
    ItemImgRepository, ItemRepository, MemberRepository, Transaction, TxMode, UnitOfWork,
};
use tracing::{info, warn};

use crate::command::{Command, CommandHandler};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::item::dto::ItemDto;
use crate::query::{Query, QueryHandler};

/// 已上传的商品图片
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    pub original_name: String,
    pub url: String,
}

impl ImageUpload {
    pub fn new(original_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            url: url.into(),
        }
    }
}

/// 商品登记表单；第一张图片作为代表图
#[derive(Debug, Clone, Builder, Deserialize)]
#[builder(on(String, into))]
pub struct ItemForm {
    pub name: String,
    pub price: i64,
    pub stock: i64,
    #[builder(default)]
    #[serde(default)]
    pub detail: String,
    #[builder(default)]
    #[serde(default)]
    pub images: Vec<ImageUpload>,
}

pub struct ItemService<U> {
    uow: U,
}

impl<U: UnitOfWork> ItemService<U> {
    pub fn new(uow: U) -> Self {
        Self { uow }
    }

    /// 登记商品及其图片
    pub async fn register_item(&self, form: ItemForm) -> AppResult<ItemId> {
        self.register(form, None).await
    }

    /// 以 `registrar` 的名义登记商品；角色校验与写入在同一事务内完成
    pub async fn register_item_as(&self, registrar: &str, form: ItemForm) -> AppResult<ItemId> {
        self.register(form, Some(registrar)).await
    }

    #[tracing::instrument(
        name = "item.register",
        skip_all,
        fields(name = %form.name, images = form.images.len())
    )]
    async fn register(&self, form: ItemForm, registrar: Option<&str>) -> AppResult<ItemId> {
        if form.images.is_empty() {
            return Err(DomainError::invalid_argument("the first item image is required").into());
        }

        let item = Item::new(form.name, form.price, form.stock, form.detail)?;
        let item_id = *item.id();

        let mut tx = self.uow.begin(TxMode::ReadWrite).await?;

        if let Some(email) = registrar {
            match tx.find_member_by_email(email).await? {
                Some(member) if member.is_admin() => {}
                _ => {
                    warn!(email, "item registration rejected: admin role required");
                    return Err(AppError::Authorization("admin role required".to_string()));
                }
            }
        }

        tx.save_item(item).await?;

        for (idx, upload) in form.images.into_iter().enumerate() {
            let img = ItemImg::new(item_id, upload.original_name, upload.url, idx == 0)?;
            tx.save_item_img(img).await?;
        }

        tx.commit().await?;

        info!(%item_id, "item registered");
        Ok(item_id)
    }

    /// 商品详情（含全部图片地址）
    pub async fn item_detail(&self, item_id: ItemId) -> AppResult<ItemDto> {
        let tx = self.uow.begin(TxMode::ReadOnly).await?;

        let item = tx
            .find_item(&item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("item", item_id))?;
        let imgs = tx.find_item_imgs(&item_id).await?;

        Ok(ItemDto::new(&item, &imgs))
    }
}

/// 商品登记命令（管理员）
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterItem {
    pub form: ItemForm,
}

impl Command for RegisterItem {
    const NAME: &'static str = "item.register";
    type Output = ItemId;
}

#[async_trait]
impl<U> CommandHandler<RegisterItem> for ItemService<U>
where
    U: UnitOfWork + 'static,
{
    async fn handle(&self, ctx: &AppContext, cmd: RegisterItem) -> AppResult<ItemId> {
        self.register_item_as(ctx.member_email()?, cmd.form).await
    }
}

/// 商品详情查询，匿名可用
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ItemDetail {
    pub item_id: ItemId,
}

impl Query for ItemDetail {
    const NAME: &'static str = "item.detail";
    type Dto = ItemDto;
}

#[async_trait]
impl<U> QueryHandler<ItemDetail> for ItemService<U>
where
    U: UnitOfWork + 'static,
{
    async fn handle(&self, _ctx: &AppContext, q: ItemDetail) -> AppResult<ItemDto> {
        self.item_detail(q.item_id).await
    }
}

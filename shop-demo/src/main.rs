use std::sync::Arc;

use anyhow::Context;
use shop_application::command_bus::CommandBus;
use shop_application::config::ShopConfig;
use shop_application::context::AppContext;
use shop_application::item::{ImageUpload, ItemDetail, ItemForm, ItemService, RegisterItem};
use shop_application::member::{MemberForm, MemberService, RegisterMember};
use shop_application::order::{
    CancelOrder, OrderHistory, OrderLine, OrderOwnership, OrderService, PlaceOrder, PlaceOrders,
};
use shop_application::query_bus::QueryBus;
use shop_application::{InMemoryCommandBus, InMemoryQueryBus};
use shop_domain::persist::InMemoryStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

// `SHOP_LOG` 已在加载配置时并入 `logging.filter`
fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn member_form(name: &str, email: &str, address: &str) -> MemberForm {
    MemberForm::builder()
        .name(name)
        .email(email)
        .password("pa55word")
        .address(address)
        .build()
}

fn item_form(name: &str, price: i64, stock: i64) -> ItemForm {
    ItemForm::builder()
        .name(name)
        .price(price)
        .stock(stock)
        .detail(format!("{name} from the demo catalogue"))
        .images(vec![
            ImageUpload::new(format!("{name}.png"), format!("/images/item/{name}.png")),
            ImageUpload::new(format!("{name}-side.png"), format!("/images/item/{name}-side.png")),
        ])
        .build()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = ShopConfig::load().context("loading shop config")?;
    init_tracing(&config.logging.filter);
    info!(?config, "shop demo starting");

    let store = InMemoryStore::new();
    let orders = Arc::new(OrderService::new(store.clone(), config.paging.clone()));
    let members = Arc::new(MemberService::new(store.clone()));
    let items = Arc::new(ItemService::new(store.clone()));

    let commands = InMemoryCommandBus::new();
    commands.register::<PlaceOrder, _>(orders.clone())?;
    commands.register::<PlaceOrders, _>(orders.clone())?;
    commands.register::<CancelOrder, _>(orders.clone())?;
    commands.register::<RegisterMember, _>(members.clone())?;
    commands.register::<RegisterItem, _>(items.clone())?;

    let queries = InMemoryQueryBus::new();
    queries.register::<OrderHistory, _>(orders.clone())?;
    queries.register::<OrderOwnership, _>(orders)?;
    queries.register::<ItemDetail, _>(items)?;

    let anonymous = AppContext::default();
    let admin = AppContext::member("admin@shop.test");
    let alice = AppContext::member("alice@shop.test");
    let bob = AppContext::member("bob@shop.test");

    members
        .register_admin(member_form("Admin", "admin@shop.test", "HQ"))
        .await?;
    for (name, email, address) in [
        ("Alice", "alice@shop.test", "Seoul"),
        ("Bob", "bob@shop.test", "Busan"),
    ] {
        commands
            .dispatch(
                &anonymous,
                RegisterMember {
                    form: member_form(name, email, address),
                },
            )
            .await?;
    }

    let mug = commands
        .dispatch(&admin, RegisterItem { form: item_form("mug", 12_000, 10) })
        .await?;
    let pen = commands
        .dispatch(&admin, RegisterItem { form: item_form("pen", 1_500, 100) })
        .await?;

    let single = commands
        .dispatch(&alice, PlaceOrder { item_id: mug, count: 2 })
        .await?;
    let cart = commands
        .dispatch(
            &alice,
            PlaceOrders {
                lines: vec![OrderLine::new(mug, 1), OrderLine::new(pen, 3)],
            },
        )
        .await?;
    info!(%single, %cart, "orders placed");

    let history = queries
        .dispatch(&alice, OrderHistory { page: 0, size: None })
        .await?;
    println!("{}", serde_json::to_string_pretty(&history)?);

    let ownership = queries
        .dispatch(&bob, OrderOwnership { order_id: single })
        .await?;
    println!("{}", serde_json::to_string_pretty(&ownership)?);

    if let Err(err) = commands
        .dispatch(&bob, CancelOrder { order_id: single })
        .await
    {
        warn!(%err, "bob cannot cancel alice's order");
    }

    commands
        .dispatch(&alice, CancelOrder { order_id: single })
        .await?;

    let history = queries
        .dispatch(&alice, OrderHistory { page: 0, size: None })
        .await?;
    println!("{}", serde_json::to_string_pretty(&history)?);

    let detail = queries
        .dispatch(&anonymous, ItemDetail { item_id: mug })
        .await?;
    println!("{}", serde_json::to_string_pretty(&detail)?);

    Ok(())
}

use std::sync::Arc;

use shop_application::command_bus::CommandBus;
use shop_application::config::PagingConfig;
use shop_application::context::AppContext;
use shop_application::error::AppError;
use shop_application::item::{ImageUpload, ItemDetail, ItemForm, ItemService, RegisterItem};
use shop_application::member::{MemberForm, MemberService, RegisterMember};
use shop_application::order::{
    CancelOrder, OrderHistory, OrderLine, OrderOwnership, OrderService, PlaceOrder, PlaceOrders,
};
use shop_application::query_bus::QueryBus;
use shop_application::{InMemoryCommandBus, InMemoryQueryBus};
use shop_domain::entity::Entity;
use shop_domain::error::DomainError;
use shop_domain::model::{Item, ItemId, Order, OrderId, OrderStatus};
use shop_domain::persist::{
    InMemoryStore, ItemRepository, OrderRepository, PageRequest, Transaction, TxMode, UnitOfWork,
};

const ALICE: &str = "alice@shop.test";
const BOB: &str = "bob@shop.test";
const ADMIN: &str = "admin@shop.test";

struct Shop {
    store: InMemoryStore,
    orders: Arc<OrderService<InMemoryStore>>,
    commands: InMemoryCommandBus,
    queries: InMemoryQueryBus,
}

impl Shop {
    async fn open() -> Self {
        let store = InMemoryStore::new();
        let orders = Arc::new(OrderService::new(store.clone(), PagingConfig::default()));
        let members = Arc::new(MemberService::new(store.clone()));
        let items = Arc::new(ItemService::new(store.clone()));

        let commands = InMemoryCommandBus::new();
        commands.register::<PlaceOrder, _>(orders.clone()).unwrap();
        commands.register::<PlaceOrders, _>(orders.clone()).unwrap();
        commands.register::<CancelOrder, _>(orders.clone()).unwrap();
        commands.register::<RegisterMember, _>(members.clone()).unwrap();
        commands.register::<RegisterItem, _>(items.clone()).unwrap();

        let queries = InMemoryQueryBus::new();
        queries.register::<OrderHistory, _>(orders.clone()).unwrap();
        queries.register::<OrderOwnership, _>(orders.clone()).unwrap();
        queries.register::<ItemDetail, _>(items).unwrap();

        for (name, email) in [("Alice", ALICE), ("Bob", BOB)] {
            commands
                .dispatch(
                    &AppContext::default(),
                    RegisterMember {
                        form: member_form(name, email),
                    },
                )
                .await
                .unwrap();
        }
        members
            .register_admin(member_form("Admin", ADMIN))
            .await
            .unwrap();

        Self {
            store,
            orders,
            commands,
            queries,
        }
    }

    async fn add_item(&self, name: &str, price: i64, stock: i64) -> ItemId {
        let form = ItemForm::builder()
            .name(name)
            .price(price)
            .stock(stock)
            .images(vec![ImageUpload::new(
                format!("{name}.png"),
                format!("/images/{name}.png"),
            )])
            .build();
        self.commands
            .dispatch(&AppContext::member(ADMIN), RegisterItem { form })
            .await
            .unwrap()
    }

    async fn order(&self, id: &OrderId) -> Option<Order> {
        let tx = self.store.begin(TxMode::ReadOnly).await.unwrap();
        tx.find_order(id).await.unwrap()
    }

    async fn order_count(&self, email: &str) -> u64 {
        let tx = self.store.begin(TxMode::ReadOnly).await.unwrap();
        tx.count_orders(email).await.unwrap()
    }

    async fn stock(&self, id: &ItemId) -> u32 {
        let tx = self.store.begin(TxMode::ReadOnly).await.unwrap();
        tx.find_item(id).await.unwrap().unwrap().stock()
    }
}

fn member_form(name: &str, email: &str) -> MemberForm {
    MemberForm::builder()
        .name(name)
        .email(email)
        .password("pa55word")
        .address("Seoul")
        .build()
}

fn assert_domain(err: AppError, pred: impl Fn(&DomainError) -> bool) {
    match &err {
        AppError::Domain(inner) if pred(inner) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn place_order_creates_one_order_with_one_line() {
    let shop = Shop::open().await;
    let mug = shop.add_item("mug", 10, 5).await;

    let order_id = shop.orders.place_order(mug, 2, ALICE).await.unwrap();

    let order = shop.order(&order_id).await.unwrap();
    assert_eq!(order.status(), OrderStatus::Order);
    assert_eq!(order.order_items().len(), 1);
    let line = &order.order_items()[0];
    assert_eq!(line.item_id(), &mug);
    assert_eq!(line.count().value(), 2);
    assert_eq!(line.order_price().amount(), 10);
    assert_eq!(shop.order_count(ALICE).await, 1);
    assert_eq!(shop.stock(&mug).await, 3);
}

#[tokio::test]
async fn unknown_item_or_member_persists_nothing() {
    let shop = Shop::open().await;
    let mug = shop.add_item("mug", 10, 5).await;

    let err = shop
        .orders
        .place_order(ItemId::new(), 1, ALICE)
        .await
        .unwrap_err();
    assert_domain(err, |e| matches!(e, DomainError::NotFound { entity: "item", .. }));

    let err = shop
        .orders
        .place_order(mug, 1, "ghost@shop.test")
        .await
        .unwrap_err();
    assert_domain(err, |e| matches!(e, DomainError::NotFound { entity: "member", .. }));

    assert_eq!(shop.order_count(ALICE).await, 0);
    assert_eq!(shop.stock(&mug).await, 5);
}

#[tokio::test]
async fn place_orders_is_all_or_nothing() {
    let shop = Shop::open().await;
    let mug = shop.add_item("mug", 10, 5).await;
    let pen = shop.add_item("pen", 5, 5).await;

    let err = shop
        .orders
        .place_orders(
            vec![OrderLine::new(mug, 1), OrderLine::new(ItemId::new(), 1)],
            ALICE,
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(shop.order_count(ALICE).await, 0);
    assert_eq!(shop.stock(&mug).await, 5);

    let order_id = shop
        .orders
        .place_orders(vec![OrderLine::new(mug, 2), OrderLine::new(pen, 1)], ALICE)
        .await
        .unwrap();
    let order = shop.order(&order_id).await.unwrap();
    assert_eq!(order.order_items().len(), 2);
    assert_eq!(order.total_price().amount(), 25);
}

#[tokio::test]
async fn out_of_stock_persists_nothing() {
    let shop = Shop::open().await;
    let mug = shop.add_item("mug", 10, 1).await;
    let pen = shop.add_item("pen", 5, 5).await;

    let err = shop
        .orders
        .place_orders(vec![OrderLine::new(pen, 2), OrderLine::new(mug, 2)], ALICE)
        .await
        .unwrap_err();
    assert_domain(err, |e| {
        matches!(
            e,
            DomainError::OutOfStock {
                requested: 2,
                available: 1,
                ..
            }
        )
    });

    assert_eq!(shop.order_count(ALICE).await, 0);
    assert_eq!(shop.stock(&mug).await, 1);
    assert_eq!(shop.stock(&pen).await, 5);
}

#[tokio::test]
async fn cancel_restores_stock_and_rejects_repeat() {
    let shop = Shop::open().await;
    let mug = shop.add_item("mug", 10, 5).await;
    let order_id = shop.orders.place_order(mug, 3, ALICE).await.unwrap();
    assert_eq!(shop.stock(&mug).await, 2);

    shop.orders.cancel_order(order_id).await.unwrap();

    let order = shop.order(&order_id).await.unwrap();
    assert_eq!(order.status(), OrderStatus::Cancel);
    assert_eq!(order.version().value(), 1);
    assert_eq!(shop.stock(&mug).await, 5);

    let err = shop.orders.cancel_order(order_id).await.unwrap_err();
    assert_domain(err, |e| matches!(e, DomainError::InvalidState { .. }));
    assert_eq!(shop.stock(&mug).await, 5);

    let err = shop.orders.cancel_order(OrderId::new()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn ownership_follows_owner_email() {
    let shop = Shop::open().await;
    let mug = shop.add_item("mug", 10, 5).await;
    let order_id = shop.orders.place_order(mug, 1, ALICE).await.unwrap();

    assert!(shop.orders.validate_ownership(order_id, ALICE).await.unwrap());
    assert!(!shop.orders.validate_ownership(order_id, BOB).await.unwrap());
    assert!(
        shop.orders
            .validate_ownership(OrderId::new(), ALICE)
            .await
            .unwrap_err()
            .is_not_found()
    );

    let dto = shop
        .queries
        .dispatch(&AppContext::member(BOB), OrderOwnership { order_id })
        .await
        .unwrap();
    assert!(!dto.owned);
}

#[tokio::test]
async fn history_pages_newest_first() {
    let shop = Shop::open().await;
    let mug = shop.add_item("mug", 10, 50).await;
    let pen = shop.add_item("pen", 5, 50).await;

    let mut placed = Vec::new();
    for _ in 0..5 {
        placed.push(
            shop.orders
                .place_orders(vec![OrderLine::new(mug, 1), OrderLine::new(pen, 2)], ALICE)
                .await
                .unwrap(),
        );
    }
    shop.orders.place_order(mug, 1, BOB).await.unwrap();

    let page = shop
        .orders
        .list_order_history(ALICE, PageRequest::new(0, 4).unwrap())
        .await
        .unwrap();
    assert_eq!(page.total_elements(), 5);
    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.content().len(), 4);
    assert!(page.has_next());
    assert_eq!(page.content()[0].order_id, placed[4]);
    for dto in page.content() {
        assert_eq!(dto.order_items.len(), 2);
        assert_eq!(dto.total_price.amount(), 20);
        assert_eq!(dto.order_items[0].img_url, "/images/mug.png");
    }

    let last = shop
        .queries
        .dispatch(
            &AppContext::member(ALICE),
            OrderHistory {
                page: 1,
                size: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(last.content().len(), 1);
    assert_eq!(last.content()[0].order_id, placed[0]);
    assert!(!last.has_next());
}

#[tokio::test]
async fn zero_page_size_from_the_wire_is_rejected() {
    let shop = Shop::open().await;
    let mug = shop.add_item("mug", 10, 5).await;
    shop.orders.place_order(mug, 1, ALICE).await.unwrap();

    let query: OrderHistory = serde_json::from_str(r#"{"page":0,"size":0}"#).unwrap();
    let err = shop
        .queries
        .dispatch(&AppContext::member(ALICE), query)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Domain(DomainError::InvalidArgument { .. })));

    assert!(serde_json::from_str::<PageRequest>(r#"{"page":0,"size":0}"#).is_err());
}

#[tokio::test]
async fn missing_representative_image_is_an_integrity_fault() {
    let shop = Shop::open().await;
    let bare = Item::new("bare", 7, 3, "").unwrap();
    let bare_id = *bare.id();
    {
        let mut tx = shop.store.begin(TxMode::ReadWrite).await.unwrap();
        tx.save_item(bare).await.unwrap();
        tx.commit().await.unwrap();
    }
    shop.orders.place_order(bare_id, 1, ALICE).await.unwrap();

    let err = shop
        .orders
        .list_order_history(ALICE, PageRequest::new(0, 4).unwrap())
        .await
        .unwrap_err();
    assert!(err.is_server_fault());
    assert_domain(err, |e| matches!(e, DomainError::IntegrityViolation { .. }));
}

#[tokio::test]
async fn bus_cancel_is_limited_to_the_owner() {
    let shop = Shop::open().await;
    let mug = shop.add_item("mug", 10, 5).await;

    let order_id = shop
        .commands
        .dispatch(&AppContext::member(ALICE), PlaceOrder { item_id: mug, count: 1 })
        .await
        .unwrap();

    let err = shop
        .commands
        .dispatch(&AppContext::member(BOB), CancelOrder { order_id })
        .await
        .unwrap_err();
    match err {
        AppError::Authorization(msg) => assert_eq!(msg, "no permission to cancel this order"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        shop.order(&order_id).await.unwrap().status(),
        OrderStatus::Order
    );

    let err = shop
        .commands
        .dispatch(&AppContext::default(), CancelOrder { order_id })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    shop.commands
        .dispatch(&AppContext::member(ALICE), CancelOrder { order_id })
        .await
        .unwrap();
    assert_eq!(
        shop.order(&order_id).await.unwrap().status(),
        OrderStatus::Cancel
    );
}

#[tokio::test]
async fn only_admins_register_items() {
    let shop = Shop::open().await;
    let form = ItemForm::builder()
        .name("mug")
        .price(10)
        .stock(1)
        .images(vec![ImageUpload::new("mug.png", "/images/mug.png")])
        .build();

    let err = shop
        .commands
        .dispatch(&AppContext::member(ALICE), RegisterItem { form })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Authorization(_)));

    let mug = shop.add_item("mug", 10, 1).await;
    let dto = shop
        .queries
        .dispatch(&AppContext::default(), ItemDetail { item_id: mug })
        .await
        .unwrap();
    assert_eq!(dto.representative_img_url.as_deref(), Some("/images/mug.png"));
}

#[tokio::test]
async fn duplicate_member_is_a_conflict() {
    let shop = Shop::open().await;
    let err = shop
        .commands
        .dispatch(
            &AppContext::default(),
            RegisterMember {
                form: member_form("Alice again", ALICE),
            },
        )
        .await
        .unwrap_err();
    assert_domain(err, |e| matches!(e, DomainError::Conflict { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_cancels_succeed_once() {
    let shop = Shop::open().await;
    let mug = shop.add_item("mug", 10, 5).await;
    let order_id = shop.orders.place_order(mug, 2, ALICE).await.unwrap();

    let a = tokio::spawn({
        let orders = shop.orders.clone();
        async move { orders.cancel_order(order_id).await }
    });
    let b = tokio::spawn({
        let orders = shop.orders.clone();
        async move { orders.cancel_order(order_id).await }
    });
    let results = [a.await.unwrap(), b.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(shop.stock(&mug).await, 5);
}

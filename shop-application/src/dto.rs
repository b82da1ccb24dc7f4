use serde::Serialize;
use shop_domain::persist::Page;

/// 查询结果的输出形态
///
/// 只携带展示所需的字段（如订单行的商品名与代表图地址），不暴露领域实体本身。
pub trait Dto: Serialize + Send + Sync + 'static {}

impl<T: Dto> Dto for Page<T> {}

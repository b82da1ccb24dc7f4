//! 实体：带标识与版本的领域对象（会员、商品、商品图片、订单）
//!
use crate::value_object::Version;
use std::{fmt::Display, hash::Hash, str::FromStr};

pub trait Entity: Send + Sync {
    /// 标识可与字符串互转，便于出现在错误信息与接口参数中
    type Id: FromStr + Clone + Display + Eq + Hash + Send + Sync;

    fn id(&self) -> &Self::Id;

    /// 存储据此拒绝过期写入
    fn version(&self) -> Version;
}

//! 值对象：数量、金额与实体版本
//!
//! 构造即校验，非法值无法被创建出来。
//!

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

pub trait ValueObject {
    type Error;

    fn validate(&self) -> Result<(), Self::Error>;
}

/// 实体版本，从 0 开始，每次状态变更加一
///
/// ```
/// use shop_domain::value_object::Version;
///
/// let created = Version::new();
/// let cancelled = created.next();
/// assert!(created.is_new());
/// assert_eq!(cancelled.value(), 1);
/// assert!(cancelled > created);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(usize);

impl Version {
    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn from_value(value: usize) -> Self {
        Self(value)
    }

    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub const fn value(&self) -> usize {
        self.0
    }

    pub fn is_new(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// 订购/库存变动数量，恒为正整数
///
/// 接收来自接口层的有符号原始值，零与负数在构造时即被拒绝。
///
/// ```
/// use shop_domain::value_object::Quantity;
///
/// assert_eq!(Quantity::new(3).unwrap().value(), 3);
/// assert!(Quantity::new(0).is_err());
/// assert!(Quantity::new(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(raw: i64) -> DomainResult<Self> {
        let value = u32::try_from(raw)
            .map_err(|_| DomainError::invalid_argument(format!("quantity out of range: {raw}")))?;
        let quantity = Self(value);
        quantity.validate()?;
        Ok(quantity)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl ValueObject for Quantity {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.0 == 0 {
            return Err(DomainError::invalid_argument("quantity must be > 0"));
        }
        Ok(())
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<Quantity> for i64 {
    fn from(quantity: Quantity) -> Self {
        i64::from(quantity.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 金额（最小货币单位的非负整数）
///
/// 加法与按数量相乘均为饱和运算。
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn new(amount: i64) -> DomainResult<Self> {
        let money = Self(amount);
        money.validate()?;
        Ok(money)
    }

    pub const fn amount(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// 单价 × 数量
    pub fn times(&self, quantity: Quantity) -> Money {
        Money(self.0.saturating_mul(i64::from(quantity.value())))
    }
}

impl ValueObject for Money {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.0 < 0 {
            return Err(DomainError::invalid_argument(format!(
                "amount must be >= 0, got {}",
                self.0
            )));
        }
        Ok(())
    }
}

impl TryFrom<i64> for Money {
    type Error = DomainError;

    fn try_from(amount: i64) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Money> for i64 {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

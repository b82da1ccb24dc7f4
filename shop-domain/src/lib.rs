//! 网店领域层（shop-domain）
//!
//! 以 DDD 为中心组织网店的核心模型与持久化协议：
//! - 实体（`entity`）、聚合（`aggregate`）与值对象（`value_object`）抽象
//! - 会员、商品、商品图片与订单模型（`model`），订单为聚合根并独占其订单行
//! - 仓储与事务协议（`persist`）：按实体拆分的访问接口、分页请求与显式事务边界
//!
//! 本 crate 不依赖具体存储，仅定义领域接口与最小必要的错误类型；
//! 默认特性 `inmemory` 额外提供一个串行化的内存事务存储，用于测试与示例。
//!
//! 典型用法：
//! 1. 通过 `UnitOfWork::begin` 开启事务；
//! 2. 借助事务上的仓储方法解析实体并构建/变更聚合；
//! 3. 显式保存聚合后 `commit`，任何错误路径上丢弃事务即回滚。
//!
pub mod aggregate;
pub mod entity;
pub mod error;
pub mod model;
pub mod persist;
pub mod value_object;

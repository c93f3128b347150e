//! Sea-ORM 实体定义
//!
//! 表结构归外部迁移工具管理，这里只定义数据访问所需的实体。

pub mod kv_data;
pub mod session;
pub mod shortener_analytics;
pub mod shortener_data;
pub mod site_analytics;
pub mod site_data;

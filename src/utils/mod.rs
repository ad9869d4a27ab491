//! # 工具模块
//!
//! 这个模块包含各种工具函数和实用程序：
//!
//! - 资源引用的URL规范化
//! - URL协议检测
//!
//! # 模块组织
//!
//! - `url` - URL处理、资源引用规范化等工具函数

pub mod url;

// Re-export commonly used items for convenience
pub use url::{is_url_and_has_protocol, normalize_resource_url, Url};

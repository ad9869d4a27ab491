//! # Webarchiver Library
//!
//! 将网页及其引用的图片、脚本和样式表保存为单一的 `.webarchive` 文件。
//!
//! ## 模块组织
//!
//! - `core` - 归档流程、选项与错误类型
//! - `env` - 环境变量配置
//! - `network` - HTTP 传输与并发资源下载
//! - `parsers` - HTML 解析与资源定位
//! - `utils` - URL 规范化等工具函数
//! - `builders` - 归档文档模型与 `.webarchive` 编码

pub mod builders;
pub mod core;
pub mod env;
pub mod network;
pub mod parsers;
pub mod utils;

// Re-export commonly used items for convenience
pub use builders::{read_webarchive, serialize_webarchive, ArchiveDocument, FetchedResource};
pub use self::core::*;
pub use network::*;
pub use parsers::*;
pub use utils::*;

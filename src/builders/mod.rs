//! # 构建器模块
//!
//! 这个模块包含归档文档模型及其输出格式：
//!
//! - 归档文档组装
//! - `.webarchive` 二进制plist编码与读取
//!
//! # 模块组织
//!
//! - `document` - 主资源与子资源模型、组装逻辑
//! - `webarchive` - 二进制plist序列化与反序列化

pub mod document;
pub mod webarchive;

// Re-export commonly used items for convenience
pub use document::{ArchiveDocument, FetchedResource, MainResource};
pub use webarchive::{read_webarchive, serialize_webarchive, WebArchiveError};

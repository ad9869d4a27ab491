//! HTML解析和处理模块
//!
//! - `dom`: 解码、解析与基础DOM查询
//! - `metadata`: 文档元数据（标题）
//! - `parser`: `<link rel>` 类型解析
//! - `locator`: 资源引用定位与规范化

pub mod dom;
pub mod locator;
pub mod metadata;
pub mod parser;

// 重新导出主要的公共 API
pub use dom::{decode_html, find_nodes, get_node_attr, get_node_name, get_node_text, html_to_dom};
pub use locator::{locate_resources, ElementSelector, ResourceKind};
pub use metadata::{get_title, PageMetadata};
pub use parser::{parse_link_type, LinkType};

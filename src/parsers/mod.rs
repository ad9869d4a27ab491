//! # 解析器模块
//!
//! 这个模块包含解析网页并找出其依赖资源的功能：
//!
//! - HTML解码与DOM解析
//! - 页面元数据提取
//! - 图片、脚本、样式表引用定位
//!
//! # 模块组织
//!
//! - `html` - HTML文档解析、DOM查询、元数据与资源定位

pub mod html;

// Re-export commonly used items for convenience
pub use html::{
    decode_html, get_title, html_to_dom, locate_resources, PageMetadata, ResourceKind,
};

//! HTML 文档元数据处理模块
//!
//! 从解析后的文档中提取随归档一同返回给调用方的页面元数据。
//! 元数据不会写入 `.webarchive` 容器本身。

use markup5ever_rcdom::Handle;

use super::dom::{find_nodes, get_node_text};

/// 页面元数据
///
/// 与归档字节一起返回给调用方的附加信息。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageMetadata {
    /// `<head><title>` 的文本内容
    pub title: Option<String>,
}

impl PageMetadata {
    /// 从文档根节点提取元数据
    pub fn from_document(document: &Handle) -> Self {
        Self {
            title: get_title(document),
        }
    }
}

/// 获取文档标题
///
/// 只查看 `<html><head>` 下的第一个 `<title>` 标签，返回其文本内容。
///
/// # 示例
///
/// ```
/// use webarchiver::parsers::html::{get_title, html_to_dom};
///
/// let dom = html_to_dom("<html><head><title>This is a test</title></head></html>").unwrap();
/// assert_eq!(get_title(&dom.document).as_deref(), Some("This is a test"));
/// ```
pub fn get_title(node: &Handle) -> Option<String> {
    find_nodes(node, &["html", "head", "title"])
        .first()
        .and_then(get_node_text)
}

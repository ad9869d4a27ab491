//! HTML 链接类型解析
//!
//! 解析 `<link>` 元素的 `rel` 属性，用于识别样式表等链接关系。

/// HTML链接类型枚举
///
/// 表示HTML `<link>` 元素中 `rel` 属性的不同类型值。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkType {
    /// 备用版本链接
    Alternate,
    /// 网站图标
    Icon,
    /// 预加载资源
    Preload,
    /// CSS样式表
    Stylesheet,
}

/// 解析HTML链接的rel属性值
///
/// 支持多个空格分隔的rel值，不区分大小写，不支持的值会被忽略。
///
/// ```
/// use webarchiver::parsers::html::parser::{parse_link_type, LinkType};
///
/// assert_eq!(
///     parse_link_type("preload STYLESHEET"),
///     vec![LinkType::Preload, LinkType::Stylesheet]
/// );
/// ```
pub fn parse_link_type(link_attr_rel_value: &str) -> Vec<LinkType> {
    let mut types: Vec<LinkType> = vec![];

    for link_attr_rel_type in link_attr_rel_value.split_whitespace() {
        if link_attr_rel_type.eq_ignore_ascii_case("alternate") {
            types.push(LinkType::Alternate);
        } else if link_attr_rel_type.eq_ignore_ascii_case("icon") {
            types.push(LinkType::Icon);
        } else if link_attr_rel_type.eq_ignore_ascii_case("preload") {
            types.push(LinkType::Preload);
        } else if link_attr_rel_type.eq_ignore_ascii_case("stylesheet") {
            types.push(LinkType::Stylesheet);
        }
    }

    types
}

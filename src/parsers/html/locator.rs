//! 资源定位模块
//!
//! 在解析后的文档中查找需要下载的图片、脚本和样式表引用，
//! 并把它们规范化为绝对 URL。整个过程不涉及网络访问。

use std::fmt;

use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::utils::url::{normalize_resource_url, Url};

use super::dom::{find_nodes, get_node_attr};
use super::parser::{parse_link_type, LinkType};

/// Category of subresource referenced by a page
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Image,
    Script,
    Stylesheet,
}

impl ResourceKind {
    /// All kinds, in the order their references are reported
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Image,
        ResourceKind::Script,
        ResourceKind::Stylesheet,
    ];

    /// Structural selector matching the elements of this kind
    pub fn selector(self) -> ElementSelector {
        match self {
            ResourceKind::Image => ElementSelector {
                element: "img",
                attribute: "src",
                link_type: None,
            },
            ResourceKind::Script => ElementSelector {
                element: "script",
                attribute: "src",
                link_type: None,
            },
            ResourceKind::Stylesheet => ElementSelector {
                element: "link",
                attribute: "href",
                link_type: Some(LinkType::Stylesheet),
            },
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResourceKind::Image => write!(f, "image"),
            ResourceKind::Script => write!(f, "script"),
            ResourceKind::Stylesheet => write!(f, "stylesheet"),
        }
    }
}

/// Matches elements by name that carry a given attribute, optionally
/// restricted to `<link>` elements with a given `rel` type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementSelector {
    pub element: &'static str,
    pub attribute: &'static str,
    pub link_type: Option<LinkType>,
}

impl ElementSelector {
    /// Evaluates the selector against the document, returning the raw
    /// attribute values of every match in document order
    pub fn select(&self, document: &Handle) -> Vec<String> {
        find_nodes(document, &[self.element])
            .iter()
            .filter(|node| match self.link_type {
                Some(link_type) => parse_link_type(&get_node_attr(node, "rel").unwrap_or_default())
                    .contains(&link_type),
                None => true,
            })
            .filter_map(|node| get_node_attr(node, self.attribute))
            .collect()
    }
}

/// Lists the absolute URLs of every enabled kind of resource in the document
///
/// Images come first, then scripts, then stylesheets, each in document order.
/// References that cannot be normalized are dropped and duplicates are kept.
pub fn locate_resources(document: &Handle, base_url: &Url, kinds: &[ResourceKind]) -> Vec<String> {
    let mut resources: Vec<String> = Vec::new();

    for kind in ResourceKind::ALL.iter().filter(|kind| kinds.contains(kind)) {
        let raw_values = kind.selector().select(document);
        let found = raw_values.len();
        let before = resources.len();

        resources.extend(
            raw_values
                .iter()
                .filter_map(|raw_value| normalize_resource_url(base_url, raw_value)),
        );

        debug!(
            kind = %kind,
            found,
            kept = resources.len() - before,
            "located resource references"
        );
    }

    resources
}

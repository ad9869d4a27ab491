//! 归档文档模型
//!
//! `ArchiveDocument` 由一个主资源和零个或多个子资源组成，
//! 一次性组装完成后交给序列化器，之后不再修改。

use std::collections::HashMap;

/// MIME type recorded for the main resource
pub const MAIN_RESOURCE_MIME_TYPE: &str = "text/html";
/// Text encoding recorded for the main resource
pub const MAIN_RESOURCE_TEXT_ENCODING: &str = "UTF-8";

/// One successfully fetched subresource
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FetchedResource {
    pub url: String,
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

/// The archived page itself
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MainResource {
    pub url: String,
    pub mime_type: String,
    pub text_encoding: String,
    pub frame_name: String,
    pub data: Vec<u8>,
}

impl MainResource {
    pub fn new(url: &str, data: Vec<u8>) -> Self {
        Self {
            url: url.to_string(),
            mime_type: MAIN_RESOURCE_MIME_TYPE.to_string(),
            text_encoding: MAIN_RESOURCE_TEXT_ENCODING.to_string(),
            frame_name: String::new(),
            data,
        }
    }
}

/// Main resource plus its subresources, ready for serialization
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveDocument {
    pub main_resource: MainResource,
    pub subresources: Vec<FetchedResource>,
}

impl ArchiveDocument {
    /// Builds the document from the main page and the fetched resource mapping
    ///
    /// Subresources are ordered by URL so that identical inputs always
    /// produce identical archives.
    pub fn assemble(
        main_url: &str,
        main_data: Vec<u8>,
        resources: HashMap<String, FetchedResource>,
    ) -> Self {
        let mut subresources: Vec<FetchedResource> = resources.into_values().collect();
        subresources.sort_by(|a, b| a.url.cmp(&b.url));

        Self {
            main_resource: MainResource::new(main_url, main_data),
            subresources,
        }
    }

    /// Subresources sorted by URL, for order-insensitive comparisons
    pub fn sorted_subresources(&self) -> Vec<&FetchedResource> {
        let mut subresources: Vec<&FetchedResource> = self.subresources.iter().collect();
        subresources.sort_by(|a, b| a.url.cmp(&b.url));
        subresources
    }

    /// Human-readable outline of the document with data blobs elided
    pub fn describe(&self) -> String {
        let main = &self.main_resource;
        let mut description = format!(
            "{{\n  WebMainResource: {{\n    WebResourceURL: {},\n    WebResourceMIMEType: {},\n    \
             WebResourceTextEncodingName: {},\n    WebResourceFrameName: {:?},\n    \
             WebResourceData: <{} bytes>,\n  }},\n  WebSubresources: [\n",
            main.url,
            main.mime_type,
            main.text_encoding,
            main.frame_name,
            main.data.len()
        );
        for resource in &self.subresources {
            description.push_str(&format!(
                "    {{ WebResourceURL: {}, WebResourceMIMEType: {}, WebResourceData: <{} bytes> }},\n",
                resource.url,
                resource.mime_type.as_deref().unwrap_or("-"),
                resource.data.len()
            ));
        }
        description.push_str("  ],\n}");

        description
    }
}

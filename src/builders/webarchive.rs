//! `.webarchive` 编码与读取
//!
//! 归档以二进制 plist 存储，键名与 Safari/WebKit 生成的文件一致：
//!
//! ```text
//! {
//!   WebMainResource: {
//!     WebResourceURL, WebResourceMIMEType, WebResourceTextEncodingName,
//!     WebResourceFrameName, WebResourceData
//!   },
//!   WebSubresources: [
//!     { WebResourceURL, WebResourceMIMEType (if known), WebResourceData }, ...
//!   ]
//! }
//! ```

use std::io::Cursor;

use plist::{Dictionary, Value};
use thiserror::Error;

use super::document::{ArchiveDocument, FetchedResource, MainResource};

pub const WEB_MAIN_RESOURCE: &str = "WebMainResource";
pub const WEB_SUBRESOURCES: &str = "WebSubresources";
pub const WEB_RESOURCE_URL: &str = "WebResourceURL";
pub const WEB_RESOURCE_MIME_TYPE: &str = "WebResourceMIMEType";
pub const WEB_RESOURCE_TEXT_ENCODING_NAME: &str = "WebResourceTextEncodingName";
pub const WEB_RESOURCE_FRAME_NAME: &str = "WebResourceFrameName";
pub const WEB_RESOURCE_DATA: &str = "WebResourceData";

/// Errors encoding or reading a `.webarchive`
#[derive(Debug, Error)]
pub enum WebArchiveError {
    #[error("failed to encode property list: {0}")]
    Encode(#[source] plist::Error),

    #[error("failed to decode property list: {0}")]
    Decode(#[source] plist::Error),

    #[error("missing key \"{0}\"")]
    MissingKey(&'static str),

    #[error("unexpected value type for key \"{0}\"")]
    UnexpectedType(&'static str),
}

/// Encodes the document as a binary property list
pub fn serialize_webarchive(document: &ArchiveDocument) -> Result<Vec<u8>, WebArchiveError> {
    let mut webarchive = Dictionary::new();
    webarchive.insert(
        WEB_MAIN_RESOURCE.to_string(),
        Value::Dictionary(main_resource_to_dictionary(&document.main_resource)),
    );
    webarchive.insert(
        WEB_SUBRESOURCES.to_string(),
        Value::Array(
            document
                .subresources
                .iter()
                .map(|resource| Value::Dictionary(subresource_to_dictionary(resource)))
                .collect(),
        ),
    );

    let mut buf: Vec<u8> = Vec::new();
    Value::Dictionary(webarchive)
        .to_writer_binary(&mut buf)
        .map_err(WebArchiveError::Encode)?;

    Ok(buf)
}

/// Reads a `.webarchive` (binary or XML property list) back into a document
pub fn read_webarchive(data: &[u8]) -> Result<ArchiveDocument, WebArchiveError> {
    let value = Value::from_reader(Cursor::new(data)).map_err(WebArchiveError::Decode)?;
    let webarchive = value
        .as_dictionary()
        .ok_or(WebArchiveError::UnexpectedType("root"))?;

    let main_resource = get_dictionary(webarchive, WEB_MAIN_RESOURCE)?;
    let main_resource = MainResource {
        url: get_string(main_resource, WEB_RESOURCE_URL)?,
        mime_type: get_string(main_resource, WEB_RESOURCE_MIME_TYPE)?,
        text_encoding: get_optional_string(main_resource, WEB_RESOURCE_TEXT_ENCODING_NAME)?
            .unwrap_or_default(),
        frame_name: get_optional_string(main_resource, WEB_RESOURCE_FRAME_NAME)?
            .unwrap_or_default(),
        data: get_data(main_resource, WEB_RESOURCE_DATA)?,
    };

    // 没有子资源的归档可能完全省略该键
    let subresources = match webarchive.get(WEB_SUBRESOURCES) {
        None => Vec::new(),
        Some(value) => value
            .as_array()
            .ok_or(WebArchiveError::UnexpectedType(WEB_SUBRESOURCES))?
            .iter()
            .map(|item| {
                let resource = item
                    .as_dictionary()
                    .ok_or(WebArchiveError::UnexpectedType(WEB_SUBRESOURCES))?;
                Ok(FetchedResource {
                    url: get_string(resource, WEB_RESOURCE_URL)?,
                    mime_type: get_optional_string(resource, WEB_RESOURCE_MIME_TYPE)?,
                    data: get_data(resource, WEB_RESOURCE_DATA)?,
                })
            })
            .collect::<Result<Vec<_>, WebArchiveError>>()?,
    };

    Ok(ArchiveDocument {
        main_resource,
        subresources,
    })
}

fn main_resource_to_dictionary(main_resource: &MainResource) -> Dictionary {
    let mut dictionary = Dictionary::new();
    dictionary.insert(
        WEB_RESOURCE_URL.to_string(),
        Value::String(main_resource.url.clone()),
    );
    dictionary.insert(
        WEB_RESOURCE_MIME_TYPE.to_string(),
        Value::String(main_resource.mime_type.clone()),
    );
    dictionary.insert(
        WEB_RESOURCE_TEXT_ENCODING_NAME.to_string(),
        Value::String(main_resource.text_encoding.clone()),
    );
    dictionary.insert(
        WEB_RESOURCE_FRAME_NAME.to_string(),
        Value::String(main_resource.frame_name.clone()),
    );
    dictionary.insert(
        WEB_RESOURCE_DATA.to_string(),
        Value::Data(main_resource.data.clone()),
    );
    dictionary
}

fn subresource_to_dictionary(resource: &FetchedResource) -> Dictionary {
    let mut dictionary = Dictionary::new();
    dictionary.insert(
        WEB_RESOURCE_URL.to_string(),
        Value::String(resource.url.clone()),
    );
    if let Some(mime_type) = &resource.mime_type {
        dictionary.insert(
            WEB_RESOURCE_MIME_TYPE.to_string(),
            Value::String(mime_type.clone()),
        );
    }
    dictionary.insert(
        WEB_RESOURCE_DATA.to_string(),
        Value::Data(resource.data.clone()),
    );
    dictionary
}

fn get_dictionary<'a>(
    dictionary: &'a Dictionary,
    key: &'static str,
) -> Result<&'a Dictionary, WebArchiveError> {
    dictionary
        .get(key)
        .ok_or(WebArchiveError::MissingKey(key))?
        .as_dictionary()
        .ok_or(WebArchiveError::UnexpectedType(key))
}

fn get_string(dictionary: &Dictionary, key: &'static str) -> Result<String, WebArchiveError> {
    get_optional_string(dictionary, key)?.ok_or(WebArchiveError::MissingKey(key))
}

fn get_optional_string(
    dictionary: &Dictionary,
    key: &'static str,
) -> Result<Option<String>, WebArchiveError> {
    match dictionary.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_string()
            .map(|value| Some(value.to_string()))
            .ok_or(WebArchiveError::UnexpectedType(key)),
    }
}

fn get_data(dictionary: &Dictionary, key: &'static str) -> Result<Vec<u8>, WebArchiveError> {
    dictionary
        .get(key)
        .ok_or(WebArchiveError::MissingKey(key))?
        .as_data()
        .map(<[u8]>::to_vec)
        .ok_or(WebArchiveError::UnexpectedType(key))
}

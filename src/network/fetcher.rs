//! 单个资源下载
//!
//! 任何失败（无效 URL、非 200 状态码、传输错误、超时）都只记录日志，返回 `None`。

use tracing::{debug, warn};
use url::Url;

use crate::builders::document::FetchedResource;

use super::session::HttpTransport;

/// Fetches one subresource, isolating its failure from the caller
///
/// Only a response with status exactly 200 counts as success. The returned
/// resource keeps `url` exactly as given.
pub async fn fetch_resource<T>(transport: &T, url: &str) -> Option<FetchedResource>
where
    T: HttpTransport + ?Sized,
{
    let parsed_url = match Url::parse(url) {
        Ok(parsed_url) => parsed_url,
        Err(error) => {
            warn!(url, %error, "resource URL invalid");
            return None;
        }
    };

    match transport.get(&parsed_url).await {
        Ok(response) if response.status == 200 => {
            debug!(
                url,
                mime_type = response.mime_type.as_deref().unwrap_or("-"),
                bytes = response.body.len(),
                "resource downloaded"
            );
            Some(FetchedResource {
                url: url.to_string(),
                mime_type: response.mime_type,
                data: response.body,
            })
        }
        Ok(response) => {
            warn!(url, status = response.status, "resource failed");
            None
        }
        Err(error) => {
            warn!(url, %error, "resource failed");
            None
        }
    }
}

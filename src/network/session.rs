//! HTTP 会话
//!
//! `HttpTransport` 抽象了"对一个 URL 发起 GET 请求"这一能力，
//! `Session` 是基于 reqwest 的默认实现。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use thiserror::Error;
use url::Url;

use crate::core::{parse_content_type, ArchiveOptions};

/// Default `User-Agent` sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("webarchiver/", env!("CARGO_PKG_VERSION"));

/// Errors produced by an [`HttpTransport`]
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Completed HTTP response, whatever its status
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Bare media type of the `Content-Type` header, if the server sent one
    pub mime_type: Option<String>,
    pub body: Vec<u8>,
}

/// Something that can perform GET requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport configured from [`ArchiveOptions`]
#[derive(Clone, Debug)]
pub struct Session {
    client: reqwest::Client,
}

impl Session {
    pub fn new(options: &ArchiveOptions) -> Result<Self, TransportError> {
        let mut header_map = HeaderMap::new();
        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        header_map.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| TransportError::Other(format!("invalid user agent: {e}")))?,
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(header_map)
            .danger_accept_invalid_certs(options.insecure);

        if options.timeout > 0 {
            builder = builder.timeout(Duration::from_secs(options.timeout));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl HttpTransport for Session {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status().as_u16();
        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_type);
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            mime_type,
            body,
        })
    }
}

use std::fmt;
use std::io;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::builders::document::ArchiveDocument;
use crate::builders::webarchive::{serialize_webarchive, WebArchiveError};
use crate::network::orchestrator::{FetchOrchestrator, DEFAULT_MAX_CONCURRENT_FETCHES};
use crate::network::session::{HttpTransport, Session, TransportError};
use crate::parsers::html::{decode_html, html_to_dom, locate_resources, PageMetadata, ResourceKind};

/// Encoding the main page must be valid in
const DOCUMENT_ENCODING: &str = "utf-8";

/// Default per-request timeout, in seconds
pub const DEFAULT_TIMEOUT: u64 = 60;

/// Fatal failure of an archive operation
///
/// Each variant names the stage that failed. Failures of individual
/// subresources are never reported here.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("invalid URL \"{url}\": {reason}")]
    UrlInvalid { url: String, reason: String },

    #[error("failed to fetch HTML: {0}")]
    FetchHtmlError(String),

    #[error("HTML is not valid {0}")]
    HtmlInvalid(String),

    #[error("failed to parse HTML document: {0}")]
    DocumentParseFailure(#[source] io::Error),

    #[error("failed to serialize webarchive: {0}")]
    SerializationFailed(#[from] WebArchiveError),
}

/// Fieldless counterpart of [`ArchiveError`], for matching on the failed stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveErrorKind {
    UrlInvalid,
    FetchHtmlError,
    HtmlInvalid,
    DocumentParseFailure,
    SerializationFailed,
}

impl ArchiveError {
    pub fn kind(&self) -> ArchiveErrorKind {
        match self {
            ArchiveError::UrlInvalid { .. } => ArchiveErrorKind::UrlInvalid,
            ArchiveError::FetchHtmlError(_) => ArchiveErrorKind::FetchHtmlError,
            ArchiveError::HtmlInvalid(_) => ArchiveErrorKind::HtmlInvalid,
            ArchiveError::DocumentParseFailure(_) => ArchiveErrorKind::DocumentParseFailure,
            ArchiveError::SerializationFailed(_) => ArchiveErrorKind::SerializationFailed,
        }
    }
}

/// Stages an archive operation passes through, in order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveStage {
    FetchingMainPage,
    ParsingHtml,
    LocatingResources,
    FetchingResources,
    Assembling,
    Serializing,
}

impl fmt::Display for ArchiveStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ArchiveStage::FetchingMainPage => "fetching main page",
            ArchiveStage::ParsingHtml => "parsing HTML",
            ArchiveStage::LocatingResources => "locating resources",
            ArchiveStage::FetchingResources => "fetching resources",
            ArchiveStage::Assembling => "assembling",
            ArchiveStage::Serializing => "serializing",
        };
        write!(f, "{name}")
    }
}

/// Configuration options for archiving
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Accept invalid TLS certificates
    pub insecure: bool,
    /// Limit on simultaneous subresource fetches, `0` for no limit
    pub max_concurrent_fetches: usize,
    pub no_css: bool,
    pub no_images: bool,
    pub no_js: bool,
    /// Per-request timeout in seconds, `0` for none
    pub timeout: u64,
    pub user_agent: Option<String>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            insecure: false,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            no_css: false,
            no_images: false,
            no_js: false,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }
}

impl ArchiveOptions {
    /// Resource kinds enabled by these options
    pub fn resource_kinds(&self) -> Vec<ResourceKind> {
        let mut kinds = Vec::with_capacity(3);
        if !self.no_images {
            kinds.push(ResourceKind::Image);
        }
        if !self.no_js {
            kinds.push(ResourceKind::Script);
        }
        if !self.no_css {
            kinds.push(ResourceKind::Stylesheet);
        }
        kinds
    }
}

/// Result of a successful archive operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchivedPage {
    /// Serialized `.webarchive` bytes
    pub data: Vec<u8>,
    pub metadata: PageMetadata,
}

/// The main page and the resource URLs it references
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageResources {
    pub url: Url,
    /// Raw bytes of the main page
    pub data: Vec<u8>,
    pub metadata: PageMetadata,
    pub resources: Vec<String>,
}

/// Turns web pages into `.webarchive` files
///
/// # Examples
///
/// ```no_run
/// use webarchiver::core::{ArchiveOptions, Archiver};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let archiver = Archiver::new(ArchiveOptions::default())?;
/// let page = archiver.archive_page("https://example.com/").await?;
///
/// std::fs::write("example.webarchive", &page.data)?;
/// println!("{:?}", page.metadata.title);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Archiver {
    transport: Arc<dyn HttpTransport>,
    options: ArchiveOptions,
    cancellation: CancellationToken,
}

impl Archiver {
    /// Creates an archiver that fetches over HTTP with a [`Session`]
    pub fn new(options: ArchiveOptions) -> Result<Self, TransportError> {
        let session = Session::new(&options)?;
        Ok(Self::with_transport(Arc::new(session), options))
    }

    /// Creates an archiver on top of any [`HttpTransport`]
    pub fn with_transport(transport: Arc<dyn HttpTransport>, options: ArchiveOptions) -> Self {
        Self {
            transport,
            options,
            cancellation: CancellationToken::new(),
        }
    }

    /// Abandons in-flight fetches once `cancellation` is triggered
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    /// Fetches and parses the page, returning the resources it references
    pub async fn resource_urls(&self, url: &str) -> Result<PageResources, ArchiveError> {
        let target_url = Url::parse(url).map_err(|e| {
            fail(
                ArchiveStage::FetchingMainPage,
                ArchiveError::UrlInvalid {
                    url: url.to_string(),
                    reason: e.to_string(),
                },
            )
        })?;

        debug!(stage = %ArchiveStage::FetchingMainPage, url = %target_url);
        let data = self
            .fetch_main_page(&target_url)
            .await
            .map_err(|e| fail(ArchiveStage::FetchingMainPage, e))?;

        let (metadata, resources) =
            locate_page_resources(&data, &target_url, &self.options.resource_kinds())?;

        info!(
            url = %target_url,
            title = metadata.title.as_deref().unwrap_or("-"),
            resources = resources.len(),
            "page parsed"
        );

        Ok(PageResources {
            url: target_url,
            data,
            metadata,
            resources,
        })
    }

    /// Archives the page at `url`
    ///
    /// Subresources that cannot be fetched are left out of the archive
    /// without failing the operation.
    pub async fn archive_page(&self, url: &str) -> Result<ArchivedPage, ArchiveError> {
        let page = self.resource_urls(url).await?;

        debug!(stage = %ArchiveStage::FetchingResources, count = page.resources.len());
        let resources = FetchOrchestrator::new(Arc::clone(&self.transport))
            .with_max_concurrent_fetches(self.options.max_concurrent_fetches)
            .with_cancellation(self.cancellation.clone())
            .fetch_all(&page.resources)
            .await;

        debug!(stage = %ArchiveStage::Assembling);
        let document = ArchiveDocument::assemble(page.url.as_str(), page.data, resources);
        debug!("webarchive: {}", document.describe());

        debug!(stage = %ArchiveStage::Serializing);
        let data = serialize_webarchive(&document)
            .map_err(|e| fail(ArchiveStage::Serializing, e.into()))?;

        info!(
            url = %page.url,
            subresources = document.subresources.len(),
            bytes = data.len(),
            "page archived"
        );

        Ok(ArchivedPage {
            data,
            metadata: page.metadata,
        })
    }

    /// Blocking variant of [`Archiver::archive_page`] for synchronous callers
    ///
    /// Must not be called from within an async runtime.
    pub fn archive_page_blocking(&self, url: &str) -> Result<ArchivedPage, ArchiveError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| ArchiveError::FetchHtmlError(format!("failed to start runtime: {e}")))?;

        runtime.block_on(self.archive_page(url))
    }

    async fn fetch_main_page(&self, url: &Url) -> Result<Vec<u8>, ArchiveError> {
        let result = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                return Err(ArchiveError::FetchHtmlError("cancelled".to_string()));
            }
            result = self.transport.get(url) => result,
        };
        let response = result.map_err(|e| ArchiveError::FetchHtmlError(e.to_string()))?;

        if response.status != 200 {
            return Err(ArchiveError::FetchHtmlError(format!(
                "server responded with status {}",
                response.status
            )));
        }

        Ok(response.body)
    }
}

/// Parses the main page, then extracts its metadata and resource URLs
///
/// Kept synchronous: the DOM cannot be held across an await point.
fn locate_page_resources(
    data: &[u8],
    base_url: &Url,
    kinds: &[ResourceKind],
) -> Result<(PageMetadata, Vec<String>), ArchiveError> {
    debug!(stage = %ArchiveStage::ParsingHtml, bytes = data.len());
    let html = decode_html(data, DOCUMENT_ENCODING).ok_or_else(|| {
        fail(
            ArchiveStage::ParsingHtml,
            ArchiveError::HtmlInvalid(DOCUMENT_ENCODING.to_uppercase()),
        )
    })?;
    let dom = html_to_dom(&html)
        .map_err(|e| fail(ArchiveStage::ParsingHtml, ArchiveError::DocumentParseFailure(e)))?;

    let metadata = PageMetadata::from_document(&dom.document);

    debug!(stage = %ArchiveStage::LocatingResources);
    let resources = locate_resources(&dom.document, base_url, kinds);

    Ok((metadata, resources))
}

fn fail(stage: ArchiveStage, error: ArchiveError) -> ArchiveError {
    warn!(stage = %stage, %error, "archiving failed");
    error
}

/// Archives `url` with a default HTTP session
pub async fn archive_page(url: &str, options: ArchiveOptions) -> Result<ArchivedPage, ArchiveError> {
    let archiver = Archiver::new(options)
        .map_err(|e| fail(ArchiveStage::FetchingMainPage, ArchiveError::FetchHtmlError(e.to_string())))?;
    archiver.archive_page(url).await
}

/// Extracts the lowercased bare media type from a Content-Type header value
///
/// Parameters such as `charset` are ignored. Returns `None` when no media
/// type is present.
pub fn parse_content_type(content_type: &str) -> Option<String> {
    let media_type = content_type.split(';').next()?.trim().to_lowercase();

    if media_type.is_empty() {
        None
    } else {
        Some(media_type)
    }
}

/// Formats output path with title substitution and sanitization
pub fn format_output_path(path: &str, document_title: Option<&str>) -> String {
    let datetime: &str = &Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let title = document_title.unwrap_or("");

    path.replace("%timestamp%", &datetime.replace(':', "_"))
        .replace(
            "%title%",
            title
                .replace(['/', '\\'], "_")
                .replace('<', "[")
                .replace('>', "]")
                .replace(':', " - ")
                .replace('\"', "")
                .replace('|', "-")
                .replace('?', "")
                .trim_start_matches('.'),
        )
        .replace("%extension%", "webarchive")
}

// 集成测试公共模块
//
// 提供内存中的 HTTP 传输替身和测试页面

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use webarchiver::network::{HttpResponse, HttpTransport, TransportError};
use webarchiver::Url;

pub const FIXTURE_URL: &str = "https://100.com/test.html";

/// Resources referenced by the test page that should be archived
pub const FIXTURE_RESOURCES: [&str; 9] = [
    "https://1.com/1/1.js",
    "http://2.com/2/2.js",
    "https://100.com/3/3.js",
    "https://100.com/1/1.css",
    "https://2.com/2/2.css",
    "http://3.com/3/3.css",
    "https://100.com/assets/images/avatar.jpg",
    "http://2.com/assets/images/avatar.jpg",
    "https://1.com/assets/images/avatar.jpg",
];

pub fn fixture_html() -> Vec<u8> {
    include_bytes!("../_data_/basic/test.html").to_vec()
}

pub fn sorted(items: &[&str]) -> Vec<String> {
    let mut items: Vec<String> = items.iter().map(|item| item.to_string()).collect();
    items.sort();
    items
}

/// In-memory transport serving canned responses after a random delay
///
/// Unknown URLs fail with a transport error.
#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<String, HttpResponse>,
    max_latency_ms: u64,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves the test page and every resource it references
    pub fn fixture() -> Self {
        let mut transport = Self::new().with_page(FIXTURE_URL, "text/html", fixture_html());
        for url in FIXTURE_RESOURCES {
            transport = transport.with_page(url, mime_type_for(url), url.as_bytes().to_vec());
        }
        transport
    }

    pub fn with_page(mut self, url: &str, mime_type: &str, body: Vec<u8>) -> Self {
        self.routes.insert(
            route_key(url),
            HttpResponse {
                status: 200,
                mime_type: Some(mime_type.to_string()),
                body,
            },
        );
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.routes.insert(
            route_key(url),
            HttpResponse {
                status,
                mime_type: Some("text/html".to_string()),
                body: b"<html><body>error</body></html>".to_vec(),
            },
        );
        self
    }

    pub fn without(mut self, url: &str) -> Self {
        self.routes.remove(&route_key(url));
        self
    }

    pub fn with_latency(mut self, max_latency_ms: u64) -> Self {
        self.max_latency_ms = max_latency_ms;
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());

        let delay = rand::thread_rng().gen_range(0..=self.max_latency_ms);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        self.routes
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| TransportError::Other(format!("connection refused: {url}")))
    }
}

fn route_key(url: &str) -> String {
    Url::parse(url).unwrap().to_string()
}

fn mime_type_for(url: &str) -> &'static str {
    if url.ends_with(".js") {
        "application/javascript"
    } else if url.ends_with(".css") {
        "text/css"
    } else {
        "image/jpeg"
    }
}

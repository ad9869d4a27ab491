pub use url::Url;

/// Schemes a resource reference may carry to be fetched as-is
const FETCHABLE_SCHEMES: &[&str] = &["http", "https"];

/// Scheme prefixed to protocol-relative references (`//host/path`)
const DEFAULT_SCHEME: &str = "https";

/// Checks whether the given string parses as an absolute URL with a scheme
pub fn is_url_and_has_protocol(input: &str) -> bool {
    match Url::parse(input) {
        Ok(parsed_url) => !parsed_url.scheme().is_empty(),
        Err(_) => false,
    }
}

/// Turns a raw `src`/`href` attribute value into an absolute URL string
///
/// Rules, applied in order:
///
/// 1. `http:`/`https:` references are kept as-is
/// 2. protocol-relative references (`//host/path`) get the `https:` scheme
/// 3. root-relative references (`/path`) get the scheme and authority of `base_url`
/// 4. anything else (relative paths, `data:`, `javascript:` and so on) is dropped
///
/// # Examples
///
/// ```
/// use webarchiver::utils::url::{normalize_resource_url, Url};
///
/// let base_url = Url::parse("https://h.com/x").unwrap();
///
/// assert_eq!(
///     normalize_resource_url(&base_url, "/a/b.png"),
///     Some("https://h.com/a/b.png".to_string())
/// );
/// assert_eq!(
///     normalize_resource_url(&base_url, "//c.com/d.js"),
///     Some("https://c.com/d.js".to_string())
/// );
/// assert_eq!(normalize_resource_url(&base_url, "a/b.png"), None);
/// ```
pub fn normalize_resource_url(base_url: &Url, raw_value: &str) -> Option<String> {
    let value = raw_value.trim();

    if value.is_empty() {
        return None;
    }

    if let Some(rest) = value.strip_prefix("//") {
        if rest.is_empty() {
            return None;
        }
        return Some(format!("{DEFAULT_SCHEME}:{value}"));
    }

    if value.starts_with('/') {
        let host = base_url.host_str()?;
        return Some(match base_url.port() {
            Some(port) => format!("{}://{}:{}{}", base_url.scheme(), host, port, value),
            None => format!("{}://{}{}", base_url.scheme(), host, value),
        });
    }

    if is_url_and_has_protocol(value) {
        let scheme_end = value.find(':')?;
        let scheme = value[..scheme_end].to_ascii_lowercase();
        if FETCHABLE_SCHEMES.contains(&scheme.as_str()) {
            return Some(value.to_string());
        }
    }

    // 相对路径不会基于页面路径解析
    None
}

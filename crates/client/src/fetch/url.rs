//! URL canonicalization and manifest path resolution.

/// Error type for URL handling failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("manifest path must be origin-relative: {0}")]
    NotOriginRelative(String),
}

/// Canonicalize a URL string so equivalent spellings share one cache key.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Default scheme to https:// if missing
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url_str = if trimmed.contains("://") { trimmed.to_string() } else { format!("https://{trimmed}") };

    let mut parsed = url::Url::parse(&url_str).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    let lowered = parsed.host_str().map(str::to_lowercase);
    if let Some(host) = lowered {
        parsed.set_host(Some(&host)).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Resolve an origin-relative manifest path (`/css/style.css`) against the
/// configured origin, canonicalizing the result.
pub fn resolve(origin: &url::Url, path: &str) -> Result<url::Url, UrlError> {
    if !path.starts_with('/') {
        return Err(UrlError::NotOriginRelative(path.to_string()));
    }

    let joined = origin.join(path).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    canonicalize(joined.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_basic() {
        let url = canonicalize("https://app.example").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("app.example"));
    }

    #[test]
    fn test_canonicalize_default_scheme() {
        let url = canonicalize("app.example").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("app.example"));
    }

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("https://APP.EXAMPLE/CSS/style.css").unwrap();
        assert_eq!(url.host_str(), Some("app.example"));
        // Path case is meaningful and survives.
        assert_eq!(url.path(), "/CSS/style.css");
    }

    #[test]
    fn test_canonicalize_remove_fragment() {
        let url = canonicalize("https://app.example/pedidos#section").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.path(), "/pedidos");
    }

    #[test]
    fn test_canonicalize_preserve_query() {
        let url = canonicalize("https://app.example/busca?a=1&b=2").unwrap();
        assert_eq!(url.query(), Some("a=1&b=2"));
    }

    #[test]
    fn test_canonicalize_trim_whitespace() {
        let url = canonicalize("  https://app.example  ").unwrap();
        assert_eq!(url.as_str(), "https://app.example/");
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        let result = canonicalize("");
        assert!(matches!(result, Err(UrlError::Empty)));
    }

    #[test]
    fn test_canonicalize_http_allowed() {
        let url = canonicalize("http://localhost:8000").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_equivalent_spellings_share_canonical_form() {
        let plain = canonicalize("https://app.example/css/style.css").unwrap();
        let cased = canonicalize("HTTPS://APP.EXAMPLE/css/style.css").unwrap();
        let fragment = canonicalize("https://app.example/css/style.css#top").unwrap();
        assert_eq!(plain, cased);
        assert_eq!(plain, fragment);
    }

    #[test]
    fn test_resolve_root() {
        let origin = url::Url::parse("https://app.example").unwrap();
        let url = resolve(&origin, "/").unwrap();
        assert_eq!(url.as_str(), "https://app.example/");
    }

    #[test]
    fn test_resolve_nested_path() {
        let origin = url::Url::parse("https://app.example").unwrap();
        let url = resolve(&origin, "/css/style.css").unwrap();
        assert_eq!(url.as_str(), "https://app.example/css/style.css");
    }

    #[test]
    fn test_resolve_keeps_origin_port() {
        let origin = url::Url::parse("http://localhost:8000").unwrap();
        let url = resolve(&origin, "/js/app.js").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/js/app.js");
    }

    #[test]
    fn test_resolve_rejects_relative_path() {
        let origin = url::Url::parse("https://app.example").unwrap();
        let result = resolve(&origin, "css/style.css");
        assert!(matches!(result, Err(UrlError::NotOriginRelative(_))));
    }
}

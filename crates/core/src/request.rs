//! Request model and document/asset classification.

/// The two caching classes a request can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Navigations and other HTML loads; served network-first so content
    /// stays fresh whenever the network can deliver it.
    Document,
    /// Styles, scripts, images and everything else; served cache-first
    /// because they rarely change within a cache version.
    Asset,
}

/// A request as handed to the worker by its host.
///
/// Deliberately host-independent: method and URL as plain strings plus the
/// declared `Accept` header, which is all classification needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// HTTP method, matched case-insensitively.
    pub method: String,
    /// Absolute request URL.
    pub url: String,
    /// Value of the `Accept` header, if the host provided one.
    pub accept: Option<String>,
}

impl ResourceRequest {
    /// Convenience constructor for a GET request.
    pub fn get(url: impl Into<String>, accept: Option<&str>) -> Self {
        Self { method: "GET".to_string(), url: url.into(), accept: accept.map(String::from) }
    }

    /// Whether this request uses the GET method.
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Classify by the declared accepted content type.
    ///
    /// A request advertising `text/html` is a document; everything else,
    /// including a missing `Accept` header, is an asset.
    pub fn class(&self) -> RequestClass {
        match &self.accept {
            Some(accept) if accept.contains("text/html") => RequestClass::Document,
            _ => RequestClass::Asset,
        }
    }
}

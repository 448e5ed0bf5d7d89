//! Request-addressed storage keys.

use sha2::{Digest, Sha256};

/// Identity of a cacheable request: method plus canonical URL.
///
/// The URL should already be canonical (see squall-client) so that
/// equivalent spellings land on the same entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestKey {
    pub method: String,
    pub url: String,
}

impl RequestKey {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self { method: method.into(), url: url.into() }
    }

    /// SHA-256 hex digest used as the storage key.
    ///
    /// Method and URL are delimited before hashing so differently split
    /// pairs can never collide.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.method.as_bytes());
        hasher.update(b"\n");
        hasher.update(self.url.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable() {
        let a = RequestKey::new("GET", "https://app.example/css/style.css").digest();
        let b = RequestKey::new("GET", "https://app.example/css/style.css").digest();
        assert_eq!(a, b);
    }

    #[test]
    fn test_digest_depends_on_method() {
        let get = RequestKey::new("GET", "https://app.example/").digest();
        let head = RequestKey::new("HEAD", "https://app.example/").digest();
        assert_ne!(get, head);
    }

    #[test]
    fn test_digest_depends_on_url() {
        let root = RequestKey::new("GET", "https://app.example/").digest();
        let page = RequestKey::new("GET", "https://app.example/pedidos").digest();
        assert_ne!(root, page);
    }

    #[test]
    fn test_digest_format() {
        let digest = RequestKey::new("GET", "https://app.example/").digest();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

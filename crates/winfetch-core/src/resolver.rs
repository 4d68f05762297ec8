//! Resolver interface for turning lookup constraints into a download URL.
//!
//! The download step only depends on `ResolvedTarget`; it does not know
//! whether the URL came from the vendor catalog or from heuristic discovery.

/// Final output of a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub url: String,
    /// Declared size in bytes; only known when a catalog entry supplied it.
    pub size_bytes: Option<u64>,
}

impl ResolvedTarget {
    pub fn new(url: impl Into<String>, size_bytes: Option<u64>) -> Self {
        Self {
            url: url.into(),
            size_bytes,
        }
    }
}

/// Implemented by the catalog and heuristic resolvers.
pub trait Resolver {
    fn resolve(&self) -> anyhow::Result<ResolvedTarget>;
}

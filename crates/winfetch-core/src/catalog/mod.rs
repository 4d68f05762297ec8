//! Catalog resolver: vendor catalog CAB → products.xml → matching record.
//!
//! Downloads the catalog archive into a temporary file, extracts the products
//! document through the extraction chain, and returns the first record (in
//! document order) matching the query. The resolver keeps no state between
//! calls; the catalog content alone decides the result.

mod extract;
mod parse;
mod query;

pub use extract::{extract_document, scan_embedded_xml, ExtractionMethod, PRODUCTS_FILE};
pub use parse::{parse_products, ProductRecord};
pub use query::{find_match, MatchQuery};

use crate::error::WinfetchError;
use crate::progress::DownloadProgress;
use crate::resolver::{ResolvedTarget, Resolver};
use crate::tools::ToolSet;
use crate::transport::Transport;
use anyhow::Result;
use std::path::PathBuf;

/// Resolves an edition through the vendor catalog.
pub struct CatalogResolver<'a> {
    transport: &'a dyn Transport,
    tools: &'a ToolSet,
    catalog_url: String,
    query: MatchQuery,
    scratch_dir: Option<PathBuf>,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        tools: &'a ToolSet,
        catalog_url: impl Into<String>,
        query: MatchQuery,
    ) -> Self {
        Self {
            transport,
            tools,
            catalog_url: catalog_url.into(),
            query,
            scratch_dir: None,
        }
    }

    /// Stage the catalog archive in `dir` instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    fn fetch_document(&self) -> Result<String> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("winfetch-catalog-").suffix(".cab");
        // Removed when dropped, on every return path below.
        let archive = match &self.scratch_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        tracing::info!(url = %self.catalog_url, "fetching catalog");
        let bytes = self
            .transport
            .fetch_to_file(&self.catalog_url, archive.path(), &mut |_: &DownloadProgress| {})
            .map_err(|e| WinfetchError::transfer("catalog download", format!("{e:#}")))?;
        tracing::debug!(bytes, path = %archive.path().display(), "catalog archive staged");

        let document = extract_document(archive.path(), self.tools)?;
        Ok(document)
    }
}

impl Resolver for CatalogResolver<'_> {
    fn resolve(&self) -> Result<ResolvedTarget> {
        let document = self.fetch_document()?;
        let records = parse_products(&document)?;

        let (record, url) = find_match(&records, &self.query).ok_or_else(|| {
            WinfetchError::NoMatchingRecord {
                query: self.query.clone(),
            }
        })?;

        tracing::info!(
            query = %self.query,
            url = %url,
            size = ?record.size,
            "catalog entry found"
        );
        Ok(ResolvedTarget::new(url, record.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::fake::FakeTransport;

    const CATALOG_URL: &str = "https://catalog.example/products.cab";

    fn archive_with(document: &str) -> Vec<u8> {
        let mut bytes = b"MSCF\x00\x00\x00\x00".to_vec();
        bytes.extend_from_slice(document.as_bytes());
        bytes.extend_from_slice(b"\x00\x00trailing");
        bytes
    }

    fn resolve_in(dir: &std::path::Path, transport: &FakeTransport) -> Result<ResolvedTarget> {
        let tools = ToolSet::none();
        CatalogResolver::new(
            transport,
            &tools,
            CATALOG_URL,
            MatchQuery::new("en-us", "EnterpriseN", "x64"),
        )
        .with_scratch_dir(dir)
        .resolve()
    }

    fn scratch_is_empty(dir: &std::path::Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn single_record_catalog_resolves() {
        let doc = r#"<?xml version="1.0"?><Products><File>
            <LanguageCode>en-us</LanguageCode>
            <Edition>EnterpriseN</Edition>
            <Architecture>x64</Architecture>
            <FilePath>https://example/x.esd</FilePath>
            <Size>4294967296</Size>
        </File></Products>"#;
        let transport = FakeTransport::new().with_file(CATALOG_URL, archive_with(doc));
        let dir = tempfile::tempdir().unwrap();

        let target = resolve_in(dir.path(), &transport).unwrap();
        assert_eq!(target.url, "https://example/x.esd");
        assert_eq!(target.size_bytes, Some(4_294_967_296));
        assert!(scratch_is_empty(dir.path()));
    }

    #[test]
    fn empty_catalog_names_query() {
        let doc = r#"<?xml version="1.0"?><Products></Products>"#;
        let transport = FakeTransport::new().with_file(CATALOG_URL, archive_with(doc));
        let dir = tempfile::tempdir().unwrap();

        let err = resolve_in(dir.path(), &transport).unwrap_err();
        match err.downcast_ref::<WinfetchError>() {
            Some(WinfetchError::NoMatchingRecord { query }) => {
                assert_eq!(query, &MatchQuery::new("en-us", "EnterpriseN", "x64"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("EnterpriseN"));
        assert!(scratch_is_empty(dir.path()));
    }

    #[test]
    fn unextractable_archive_cleans_up() {
        let transport = FakeTransport::new().with_file(CATALOG_URL, b"MSCF compressed".to_vec());
        let dir = tempfile::tempdir().unwrap();

        let err = resolve_in(dir.path(), &transport).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WinfetchError>(),
            Some(WinfetchError::DocumentNotExtractable { .. })
        ));
        assert!(scratch_is_empty(dir.path()));
    }

    #[test]
    fn failed_catalog_download_is_transfer_failure() {
        let transport = FakeTransport::new();
        let dir = tempfile::tempdir().unwrap();

        let err = resolve_in(dir.path(), &transport).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WinfetchError>(),
            Some(WinfetchError::TransferFailure { .. })
        ));
        assert!(scratch_is_empty(dir.path()));
    }

    #[test]
    fn resolving_twice_gives_same_url() {
        let doc = r#"<?xml version="1.0"?><Products>
            <File><LanguageCode>en-us</LanguageCode><Edition>EnterpriseN</Edition>
                <Architecture>x64</Architecture><FilePath>https://example/a.esd</FilePath></File>
            <File><LanguageCode>en-us</LanguageCode><Edition>EnterpriseN</Edition>
                <Architecture>x64</Architecture><FilePath>https://example/b.esd</FilePath></File>
        </Products>"#;
        let transport = FakeTransport::new().with_file(CATALOG_URL, archive_with(doc));
        let dir = tempfile::tempdir().unwrap();

        let first = resolve_in(dir.path(), &transport).unwrap();
        let second = resolve_in(dir.path(), &transport).unwrap();
        assert_eq!(first.url, "https://example/a.esd");
        assert_eq!(first, second);
        assert!(first.size_bytes.is_none());
    }
}

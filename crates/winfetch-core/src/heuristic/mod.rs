//! Heuristic resolver: best-effort URL discovery without a catalog.
//!
//! Three stages, each tried only when the previous one found nothing:
//!
//! 1. API probing: GET known endpoints, take the first embedded URL with the
//!    target extension, or the first link identifier whose redirect lands on
//!    one.
//! 2. Pattern guessing: HEAD every base path × file name, first success wins.
//! 3. Known-good fallback: return the configured redirect link.
//!
//! Every probe is sequential with a short timeout. Any probe error counts as
//! a miss, so discovery itself never fails; the result is only a candidate
//! and the download that follows may still fail.

mod api;
mod patterns;

pub use api::{direct_urls, link_ids};
pub use patterns::candidates;

use crate::config::{HeuristicConfig, ProbeConfig};
use crate::fallback::{first_found, Attempt, Step};
use crate::resolver::{ResolvedTarget, Resolver};
use crate::transport::{ProbeMethod, Transport};
use std::time::Duration;

/// Discovery stage, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ApiProbe,
    PatternGuess,
    KnownGood,
}

impl Stage {
    pub const CHAIN: [Stage; 3] = [Stage::ApiProbe, Stage::PatternGuess, Stage::KnownGood];
}

/// Resolves an image URL by probing live endpoints.
pub struct HeuristicResolver<'a> {
    transport: &'a dyn Transport,
    config: &'a HeuristicConfig,
    probe: &'a ProbeConfig,
}

impl<'a> HeuristicResolver<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        config: &'a HeuristicConfig,
        probe: &'a ProbeConfig,
    ) -> Self {
        Self {
            transport,
            config,
            probe,
        }
    }

    fn timeout(&self) -> Duration {
        self.probe.timeout()
    }

    /// Runs all stages; always returns a URL.
    pub fn discover(&self) -> ResolvedTarget {
        let url = match first_found(&Stage::CHAIN, self) {
            Some((stage, url)) => {
                tracing::info!(stage, %url, "heuristic discovery result");
                url
            }
            None => self.config.fallback_url.clone(),
        };
        ResolvedTarget::new(url, None)
    }

    fn probe_apis(&self) -> Attempt<String> {
        let ext = self.config.target_extension.as_str();
        let headers = [
            ("User-Agent", self.probe.user_agent.as_str()),
            ("Accept", "application/json"),
            ("X-Requested-With", "XMLHttpRequest"),
        ];

        for endpoint in &self.config.api_endpoints {
            let body = match self.transport.get_text(endpoint, &headers, self.timeout()) {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("API endpoint unavailable: {}", e);
                    continue;
                }
            };

            if let Some(url) = direct_urls(&body, ext).first() {
                tracing::info!(%endpoint, %url, "found direct URL in API response");
                return Attempt::Found(url.to_string());
            }

            for id in link_ids(&body) {
                let link = format!("{}{}", self.config.link_redirect_base, id);
                tracing::debug!(%link, "testing link identifier");
                match self.transport.probe(&link, ProbeMethod::Head, self.timeout()) {
                    Ok(resp) if resp.status < 400 && resp.effective_url.contains(ext) => {
                        tracing::info!(%link, target = %resp.effective_url, "link identifier resolves to image");
                        return Attempt::Found(link);
                    }
                    Ok(resp) => {
                        tracing::debug!(%link, status = resp.status, target = %resp.effective_url, "link identifier is not an image");
                    }
                    Err(e) => tracing::debug!("link probe failed: {}", e),
                }
            }
        }
        Attempt::skip("no candidates from API endpoints")
    }

    fn guess_patterns(&self) -> Attempt<String> {
        for candidate in candidates(&self.config.base_paths, &self.config.file_names) {
            match self.transport.probe(&candidate, ProbeMethod::Head, self.timeout()) {
                Ok(resp) if resp.is_success() => {
                    tracing::info!(%candidate, "CDN pattern hit");
                    return Attempt::Found(candidate);
                }
                Ok(resp) => tracing::debug!(%candidate, status = resp.status, "CDN pattern miss"),
                Err(e) => tracing::debug!("CDN probe failed: {}", e),
            }
        }
        Attempt::skip("no CDN pattern responded")
    }
}

impl Step<HeuristicResolver<'_>, String> for Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::ApiProbe => "api-probe",
            Stage::PatternGuess => "pattern-guess",
            Stage::KnownGood => "known-good",
        }
    }

    fn attempt(&self, resolver: &HeuristicResolver<'_>) -> Attempt<String> {
        match self {
            Stage::ApiProbe => resolver.probe_apis(),
            Stage::PatternGuess => resolver.guess_patterns(),
            Stage::KnownGood => {
                tracing::info!("using fallback link");
                Attempt::Found(resolver.config.fallback_url.clone())
            }
        }
    }
}

impl Resolver for HeuristicResolver<'_> {
    fn resolve(&self) -> anyhow::Result<ResolvedTarget> {
        Ok(self.discover())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::fake::FakeTransport;

    const API_1: &str = "https://api.example/one";
    const API_2: &str = "https://api.example/two";
    const FALLBACK: &str = "https://go.example/fwlink/?LinkID=1";

    fn config() -> HeuristicConfig {
        HeuristicConfig {
            target_extension: ".iso".to_string(),
            api_endpoints: vec![API_1.to_string(), API_2.to_string()],
            link_redirect_base: "https://go.example/fwlink/?LinkID=".to_string(),
            base_paths: vec![
                "https://cdn-a.example/".to_string(),
                "https://cdn-b.example/".to_string(),
            ],
            file_names: vec!["first.iso".to_string(), "second.iso".to_string()],
            fallback_url: FALLBACK.to_string(),
        }
    }

    fn discover(transport: &FakeTransport) -> ResolvedTarget {
        let cfg = config();
        let probe = ProbeConfig::default();
        HeuristicResolver::new(transport, &cfg, &probe).discover()
    }

    #[test]
    fn direct_url_in_api_response_wins() {
        let transport = FakeTransport::new()
            .with_text(API_1, r#"{"download":"https://cdn.example/Win_x64.iso","other":"https://cdn.example/b.iso"}"#);
        let target = discover(&transport);
        assert_eq!(target.url, "https://cdn.example/Win_x64.iso");
        assert!(target.size_bytes.is_none());
        assert!(!transport.called("GET", API_2));
        assert!(!transport.called("HEAD", "https://cdn-a.example/first.iso"));
    }

    #[test]
    fn failing_endpoint_is_skipped() {
        let transport = FakeTransport::new().with_text(API_2, r#""https://cdn.example/two.iso""#);
        let target = discover(&transport);
        assert!(transport.called("GET", API_1));
        assert_eq!(target.url, "https://cdn.example/two.iso");
    }

    #[test]
    fn link_identifier_accepted_when_redirect_lands_on_image() {
        let transport = FakeTransport::new()
            .with_text(API_1, "see LinkID=111 or LinkID=222")
            .with_probe("https://go.example/fwlink/?LinkID=111", 200, "https://cdn.example/page.html")
            .with_probe("https://go.example/fwlink/?LinkID=222", 200, "https://cdn.example/eval.iso");
        let target = discover(&transport);
        assert_eq!(target.url, "https://go.example/fwlink/?LinkID=222");
        assert!(transport.called("HEAD", "https://go.example/fwlink/?LinkID=111"));
        assert!(!transport.called("GET", API_2));
    }

    #[test]
    fn link_identifier_with_error_status_is_rejected() {
        let transport = FakeTransport::new()
            .with_text(API_1, "LinkID=333")
            .with_probe("https://go.example/fwlink/?LinkID=333", 404, "https://cdn.example/gone.iso")
            .with_probe("https://cdn-a.example/second.iso", 200, "https://cdn-a.example/second.iso");
        let target = discover(&transport);
        assert_eq!(target.url, "https://cdn-a.example/second.iso");
    }

    #[test]
    fn pattern_stage_returns_first_success_in_base_major_order() {
        let transport = FakeTransport::new()
            .with_probe("https://cdn-a.example/first.iso", 404, "https://cdn-a.example/first.iso")
            .with_probe("https://cdn-b.example/first.iso", 200, "https://cdn-b.example/first.iso")
            .with_probe("https://cdn-a.example/second.iso", 200, "https://cdn-a.example/second.iso");
        let target = discover(&transport);
        assert_eq!(target.url, "https://cdn-a.example/second.iso");
        assert!(!transport.called("HEAD", "https://cdn-b.example/first.iso"));
    }

    #[test]
    fn pattern_hit_prevents_fallback() {
        let transport = FakeTransport::new()
            .with_probe("https://cdn-b.example/second.iso", 200, "https://cdn-b.example/second.iso");
        let target = discover(&transport);
        assert_eq!(target.url, "https://cdn-b.example/second.iso");
        assert_ne!(target.url, FALLBACK);
    }

    #[test]
    fn everything_failing_returns_fallback() {
        let transport = FakeTransport::new().with_text(API_1, "nothing useful");
        let target = discover(&transport);
        assert_eq!(target.url, FALLBACK);
        assert!(target.size_bytes.is_none());
        // Two endpoints, then the full cartesian product.
        assert_eq!(transport.calls.borrow().len(), 2 + 4);
    }

    #[test]
    fn resolver_trait_never_fails() {
        let transport = FakeTransport::new();
        let cfg = config();
        let probe = ProbeConfig::default();
        let resolver = HeuristicResolver::new(&transport, &cfg, &probe);
        assert_eq!(resolver.resolve().unwrap().url, FALLBACK);
    }
}

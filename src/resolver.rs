//! Endpoint resolution
//!
//! The resolution state machine: manual short-circuit, cache read, ranked
//! candidate sweep, cache write, static fallback. `resolve` never fails by
//! contract: the client must always have *a* base URL to attempt requests
//! against, so every probe and cache error is absorbed and the manual URL
//! is the terminal answer. Availability is favored over correctness; the
//! returned URL may still be dead.

use crate::cache::{now_ms, CacheStore, FileCache, ResolvedEndpoint, CACHE_KEY};
use crate::config::ResolverConfig;
use crate::discovery::build_candidates;
use crate::error::Result;
use crate::probe::{first_live, HealthProbe, HttpProber};
use tokio::sync::Mutex;

/// Backend base URL resolver.
///
/// Construct once with its configuration, a prober and a cache store;
/// `resolve` is then callable any number of times. Concurrent calls are
/// serialized so a slow sweep is not duplicated; cache writes themselves
/// stay last-write-wins.
pub struct EndpointResolver<P, C> {
    config: ResolverConfig,
    prober: P,
    cache: C,
    resolving: Mutex<()>,
}

impl EndpointResolver<HttpProber, FileCache> {
    /// Resolver with the default HTTP prober and file-backed cache.
    pub fn from_config(config: ResolverConfig) -> Result<Self> {
        let prober = HttpProber::new(config.probe_timeout())?;
        Ok(Self::new(config, prober, FileCache::open_default()))
    }
}

impl<P: HealthProbe, C: CacheStore> EndpointResolver<P, C> {
    /// Create a resolver from its parts.
    pub fn new(config: ResolverConfig, prober: P, cache: C) -> Self {
        Self {
            config,
            prober,
            cache,
            resolving: Mutex::new(()),
        }
    }

    /// The resolver's configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the backend base URL.
    pub async fn resolve(&self) -> String {
        self.resolve_inner(true).await
    }

    /// Resolve ignoring any cached entry. The result is still cached.
    pub async fn resolve_fresh(&self) -> String {
        self.resolve_inner(false).await
    }

    async fn resolve_inner(&self, use_cache: bool) -> String {
        let _guard = self.resolving.lock().await;

        if self.config.manual_override {
            let url = self.config.manual_base_url();
            tracing::info!("manual override set, using {} unprobed", url);
            self.store(&url);
            return url;
        }

        if use_cache {
            match self.cache.load(CACHE_KEY) {
                Ok(Some(entry)) if entry.is_fresh(self.config.ttl(), now_ms()) => {
                    tracing::debug!(
                        "cache hit: {} ({}s old)",
                        entry.base_url,
                        entry.age(now_ms()).as_secs()
                    );
                    return entry.base_url;
                }
                Ok(Some(entry)) => {
                    tracing::debug!("cache entry expired: {}", entry.base_url);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("cache read failed: {}", e);
                }
            }
        }

        let candidates = build_candidates(&self.config);
        tracing::info!(
            "probing {} candidates ({})",
            candidates.len(),
            self.config.strategy
        );

        let winner = first_live(
            &self.prober,
            &candidates,
            self.config.strategy,
            self.config.fanout_concurrency,
        )
        .await;

        if let Some(candidate) = winner {
            let url = self.config.base_url_for(&candidate.host);
            tracing::info!(
                "resolved backend at {} ({})",
                url,
                candidate.tier.display_name()
            );
            self.store(&url);
            return url;
        }

        let url = self.config.manual_base_url();
        tracing::warn!("no candidate answered, falling back to {}", url);
        url
    }

    /// The cached entry, fresh or stale.
    pub fn cached(&self) -> Option<ResolvedEndpoint> {
        self.cache.load(CACHE_KEY).ok().flatten()
    }

    fn store(&self, url: &str) {
        if let Err(e) = self.cache.store(CACHE_KEY, &ResolvedEndpoint::new(url)) {
            tracing::warn!("cache write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::Platform;
    use crate::error::ProbeError;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Prober that counts calls and answers only for one host on /health.
    struct CountingProbe {
        live_host: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl CountingProbe {
        fn dead() -> Self {
            Self {
                live_host: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn live_on(host: &'static str) -> Self {
            Self {
                live_host: Some(host),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl HealthProbe for CountingProbe {
        fn check(
            &self,
            probe_root: &str,
            path: &str,
        ) -> impl Future<Output = std::result::Result<(), ProbeError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let live = self
                .live_host
                .map(|h| probe_root == format!("http://{}:5000", h) && path == "/health")
                .unwrap_or(false);
            async move {
                if live {
                    Ok(())
                } else {
                    Err(ProbeError::Network("connection refused".to_string()))
                }
            }
        }
    }

    fn test_config() -> ResolverConfig {
        ResolverConfig::default()
            .with_manual_host("192.168.1.100")
            .with_platform(Platform::AndroidEmulator)
    }

    #[tokio::test]
    async fn test_manual_override_skips_probing() {
        let resolver =
            EndpointResolver::new(test_config().with_manual_override(true), CountingProbe::dead(), MemoryCache::new());

        let url = resolver.resolve().await;
        assert_eq!(url, "http://192.168.1.100:5000/api");
        assert_eq!(resolver.prober.calls(), 0);
        // the synthesized URL is cached
        assert_eq!(resolver.cached().unwrap().base_url, url);
    }

    #[tokio::test]
    async fn test_fresh_cache_hit_skips_probing() {
        let cache = MemoryCache::new();
        cache
            .store(
                CACHE_KEY,
                &ResolvedEndpoint::with_timestamp("http://10.0.2.2:5000/api", now_ms()),
            )
            .unwrap();

        let resolver = EndpointResolver::new(test_config(), CountingProbe::dead(), cache);

        let url = resolver.resolve().await;
        assert_eq!(url, "http://10.0.2.2:5000/api");
        assert_eq!(resolver.prober.calls(), 0);
    }

    #[tokio::test]
    async fn test_stale_cache_triggers_probing() {
        let cache = MemoryCache::new();
        let stale = now_ms().saturating_sub(10 * 60 * 1000);
        cache
            .store(
                CACHE_KEY,
                &ResolvedEndpoint::with_timestamp("http://10.0.2.2:5000/api", stale),
            )
            .unwrap();

        let resolver = EndpointResolver::new(test_config(), CountingProbe::dead(), cache);

        resolver.resolve().await;
        assert!(resolver.prober.calls() > 0);
    }

    #[tokio::test]
    async fn test_total_failure_falls_back_to_manual_url() {
        let resolver =
            EndpointResolver::new(test_config(), CountingProbe::dead(), MemoryCache::new());

        let url = resolver.resolve().await;
        assert_eq!(url, "http://192.168.1.100:5000/api");
        // nothing answered, so nothing was cached
        assert!(resolver.cached().is_none());
    }

    #[tokio::test]
    async fn test_success_is_cached_with_api_prefix() {
        let resolver = EndpointResolver::new(
            test_config(),
            CountingProbe::live_on("10.0.2.2"),
            MemoryCache::new(),
        );

        let url = resolver.resolve().await;
        assert_eq!(url, "http://10.0.2.2:5000/api");
        assert_eq!(resolver.cached().unwrap().base_url, url);
    }

    #[tokio::test]
    async fn test_resolve_fresh_ignores_cache_read() {
        let cache = MemoryCache::new();
        cache
            .store(
                CACHE_KEY,
                &ResolvedEndpoint::with_timestamp("http://10.0.3.2:5000/api", now_ms()),
            )
            .unwrap();

        let resolver =
            EndpointResolver::new(test_config(), CountingProbe::live_on("10.0.2.2"), cache);

        let url = resolver.resolve_fresh().await;
        assert_eq!(url, "http://10.0.2.2:5000/api");
        assert!(resolver.prober.calls() > 0);
    }
}

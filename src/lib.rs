//! apiscout - Backend endpoint discovery and connectivity resolver
//!
//! A Rust library and CLI that figures out which base URL a client should
//! use to reach its backend API: a manually configured address first, then
//! a ranked list of heuristically generated candidates, each validated with
//! a lightweight multi-path health probe. Successful resolutions are cached
//! with a TTL, and resolution never fails: when nothing answers, the
//! manually configured URL is returned so the client always has something
//! to try.
//!
//! # Example
//!
//! ```rust,no_run
//! use apiscout::{EndpointResolver, Platform, ResolverConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ResolverConfig::default()
//!         .with_manual_host("192.168.1.100")
//!         .with_port(5000)
//!         .with_platform(Platform::Desktop);
//!
//!     let resolver = EndpointResolver::from_config(config)?;
//!     let base_url = resolver.resolve().await;
//!
//!     println!("backend at {}", base_url);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod probe;
pub mod resolver;
pub mod url;

// Re-exports for convenience
pub use cache::{CacheStore, FileCache, MemoryCache, ResolvedEndpoint, CACHE_KEY};
pub use config::{ConfigFile, Platform, ProbeStrategy, ResolverConfig};
pub use discovery::{build_candidates, Candidate, CandidateTier};
pub use error::{CacheError, ConfigError, Error, ProbeError, Result, UrlError};
pub use probe::{HealthProbe, HttpProber, HEALTH_PATHS};
pub use resolver::EndpointResolver;
pub use url::build_url;

//! Resolver configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Client platform, selects the known-good candidate host list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// Android emulator (host machine reachable via loopback aliases)
    AndroidEmulator,
    /// iOS simulator (shares the host loopback)
    IosSimulator,
    /// Desktop or web client
    Desktop,
}

impl Platform {
    /// Detect the platform of the running binary.
    pub fn detect() -> Self {
        if cfg!(target_os = "android") {
            Platform::AndroidEmulator
        } else if cfg!(target_os = "ios") {
            Platform::IosSimulator
        } else {
            Platform::Desktop
        }
    }

    /// Human-readable platform name
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::AndroidEmulator => "Android emulator",
            Platform::IosSimulator => "iOS simulator",
            Platform::Desktop => "Desktop",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::detect()
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "android" | "android-emulator" => Ok(Platform::AndroidEmulator),
            "ios" | "ios-simulator" => Ok(Platform::IosSimulator),
            "desktop" | "web" => Ok(Platform::Desktop),
            _ => Err(ConfigError::InvalidPlatform(s.to_string())),
        }
    }
}

/// How candidate/path pairs are probed.
///
/// `Sequential` reproduces the strict nested-loop behavior: worst-case
/// latency is candidates x paths x timeout. `FanOut` keeps candidates in
/// rank order but races each candidate's health paths with bounded
/// concurrency, first success wins and the rest are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeStrategy {
    #[default]
    Sequential,
    FanOut,
}

impl FromStr for ProbeStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(ProbeStrategy::Sequential),
            "fanout" | "fan-out" => Ok(ProbeStrategy::FanOut),
            _ => Err(ConfigError::InvalidStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStrategy::Sequential => write!(f, "sequential"),
            ProbeStrategy::FanOut => write!(f, "fan-out"),
        }
    }
}

/// Configuration for the endpoint resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Trust the manual host unconditionally and skip all probing.
    ///
    /// Developer escape hatch: the returned URL is synthesized, never
    /// verified. Not meant for production configs.
    #[serde(default)]
    pub manual_override: bool,

    /// Manually configured backend host, also the terminal fallback
    #[serde(default = "default_manual_host")]
    pub manual_host: String,

    /// Backend port
    #[serde(default = "default_port")]
    pub port: u16,

    /// API path prefix appended to resolved base URLs
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Platform candidate list to include
    #[serde(default)]
    pub platform: Platform,

    /// Cache entry time-to-live in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Per-probe timeout in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Probe sequencing policy
    #[serde(default)]
    pub strategy: ProbeStrategy,

    /// Max concurrent path probes per candidate (fan-out strategy only)
    #[serde(default = "default_fanout_concurrency")]
    pub fanout_concurrency: usize,

    /// Subnet prefix for the sweep (e.g. "192.168.1"); derived from the
    /// first detected interface address when unset
    #[serde(default)]
    pub sweep_prefix: Option<String>,

    /// Sweep size: last octet runs 1..=N
    #[serde(default = "default_sweep_hosts")]
    pub sweep_hosts: u8,

    /// Additional hosts to try, ranked with the platform defaults
    #[serde(default)]
    pub extra_hosts: Vec<String>,
}

fn default_manual_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_probe_timeout_ms() -> u64 {
    1000
}

fn default_fanout_concurrency() -> usize {
    4
}

fn default_sweep_hosts() -> u8 {
    10
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            manual_override: false,
            manual_host: default_manual_host(),
            port: default_port(),
            api_prefix: default_api_prefix(),
            platform: Platform::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
            strategy: ProbeStrategy::default(),
            fanout_concurrency: default_fanout_concurrency(),
            sweep_prefix: None,
            sweep_hosts: default_sweep_hosts(),
            extra_hosts: Vec::new(),
        }
    }
}

impl ResolverConfig {
    /// Builder-style setter for manual_override
    pub fn with_manual_override(mut self, manual: bool) -> Self {
        self.manual_override = manual;
        self
    }

    /// Builder-style setter for manual_host
    pub fn with_manual_host(mut self, host: impl Into<String>) -> Self {
        self.manual_host = host.into();
        self
    }

    /// Builder-style setter for port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder-style setter for api_prefix
    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Builder-style setter for platform
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Builder-style setter for cache_ttl_secs
    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    /// Builder-style setter for probe_timeout_ms
    pub fn with_probe_timeout_ms(mut self, ms: u64) -> Self {
        self.probe_timeout_ms = ms;
        self
    }

    /// Builder-style setter for strategy
    pub fn with_strategy(mut self, strategy: ProbeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builder-style setter for sweep_prefix
    pub fn with_sweep_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.sweep_prefix = Some(prefix.into());
        self
    }

    /// Builder-style setter for extra_hosts
    pub fn with_extra_hosts(mut self, hosts: Vec<String>) -> Self {
        self.extra_hosts = hosts;
        self
    }

    /// Cache TTL as a duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Per-probe timeout as a duration
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Probe root for a host: scheme, host and port, no API prefix.
    ///
    /// Health paths already spell their own `/api` variants.
    pub fn probe_root(&self, host: &str) -> String {
        format!("http://{}:{}", host, self.port)
    }

    /// Full base URL for a host, API prefix included
    pub fn base_url_for(&self, host: &str) -> String {
        format!("http://{}:{}{}", host, self.port, self.api_prefix)
    }

    /// The manually configured base URL, also the terminal fallback
    pub fn manual_base_url(&self) -> String {
        self.base_url_for(&self.manual_host)
    }
}

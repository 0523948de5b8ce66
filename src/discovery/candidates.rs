//! Candidate address generation
//!
//! Builds the ranked list of hosts a resolution pass will probe. Rank order
//! encodes trust: addresses we detected on this machine first, then the
//! configured host, then platform known-good hosts, then the brute-force
//! subnet sweep, then router gateways.

use crate::config::ResolverConfig;
use crate::discovery::{defaults, interfaces};
use std::collections::HashSet;
use std::net::Ipv4Addr;

/// Priority tier a candidate was generated from, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CandidateTier {
    /// Address of a local network interface
    Detected,
    /// Manually configured host
    Manual,
    /// Platform known-good host or configured extra host
    PlatformDefault,
    /// Brute-force local subnet sweep
    SubnetSweep,
    /// Router default gateway
    Gateway,
}

impl CandidateTier {
    /// Human-readable tier name
    pub fn display_name(&self) -> &'static str {
        match self {
            CandidateTier::Detected => "Detected interface",
            CandidateTier::Manual => "Manual host",
            CandidateTier::PlatformDefault => "Platform default",
            CandidateTier::SubnetSweep => "Subnet sweep",
            CandidateTier::Gateway => "Gateway",
        }
    }
}

/// A network location the resolver considers probing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Host (IP address or name)
    pub host: String,
    /// Backend port
    pub port: u16,
    /// Tier the candidate was generated from
    pub tier: CandidateTier,
}

impl Candidate {
    /// Create a candidate
    pub fn new(host: impl Into<String>, port: u16, tier: CandidateTier) -> Self {
        Self {
            host: host.into(),
            port,
            tier,
        }
    }

    /// Probe root for this candidate: scheme, host and port, no API prefix.
    /// Health paths are root-relative and spell their own `/api` variants.
    pub fn probe_root(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Build the ranked candidate list using detected interface addresses.
pub fn build_candidates(config: &ResolverConfig) -> Vec<Candidate> {
    let detected = interfaces::local_ipv4_addrs();
    build_candidates_with(config, &detected)
}

/// Build the ranked candidate list from explicit detected addresses.
///
/// Duplicated hosts are kept once, at their highest-priority position.
pub fn build_candidates_with(config: &ResolverConfig, detected: &[Ipv4Addr]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let port = config.port;

    for ip in detected {
        candidates.push(Candidate::new(ip.to_string(), port, CandidateTier::Detected));
    }

    candidates.push(Candidate::new(
        config.manual_host.clone(),
        port,
        CandidateTier::Manual,
    ));

    for host in defaults::platform_hosts(config.platform) {
        candidates.push(Candidate::new(host, port, CandidateTier::PlatformDefault));
    }
    for host in &config.extra_hosts {
        candidates.push(Candidate::new(
            host.clone(),
            port,
            CandidateTier::PlatformDefault,
        ));
    }

    // Sweep prefix: explicit config wins, else derive from the first
    // detected address. No prefix, no sweep.
    let prefix = config
        .sweep_prefix
        .clone()
        .or_else(|| detected.first().map(|ip| interfaces::subnet_prefix(*ip)));
    if let Some(prefix) = prefix {
        for octet in 1..=config.sweep_hosts {
            candidates.push(Candidate::new(
                format!("{}.{}", prefix, octet),
                port,
                CandidateTier::SubnetSweep,
            ));
        }
    }

    for host in defaults::gateway_hosts() {
        candidates.push(Candidate::new(host, port, CandidateTier::Gateway));
    }

    dedup_by_host(candidates)
}

/// Keep the first occurrence of each host, preserving order.
fn dedup_by_host(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.host.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;

    fn test_config() -> ResolverConfig {
        ResolverConfig::default()
            .with_manual_host("192.168.1.100")
            .with_platform(Platform::AndroidEmulator)
            .with_sweep_prefix("192.168.1")
    }

    #[test]
    fn test_rank_order() {
        let detected = [Ipv4Addr::new(192, 168, 1, 23)];
        let candidates = build_candidates_with(&test_config(), &detected);

        let tiers: Vec<_> = candidates.iter().map(|c| c.tier).collect();
        let mut sorted = tiers.clone();
        sorted.sort();
        assert_eq!(tiers, sorted, "candidates must come out in tier order");

        assert_eq!(candidates[0].host, "192.168.1.23");
        assert_eq!(candidates[0].tier, CandidateTier::Detected);
        assert_eq!(candidates[1].host, "192.168.1.100");
        assert_eq!(candidates[1].tier, CandidateTier::Manual);
    }

    #[test]
    fn test_dedup_keeps_highest_priority() {
        // manual host collides with a sweep address
        let config = test_config().with_manual_host("192.168.1.3");
        let candidates = build_candidates_with(&config, &[]);

        let hits: Vec<_> = candidates.iter().filter(|c| c.host == "192.168.1.3").collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].tier, CandidateTier::Manual);
    }

    #[test]
    fn test_sweep_range() {
        let candidates = build_candidates_with(&test_config(), &[]);
        let sweep: Vec<_> = candidates
            .iter()
            .filter(|c| c.tier == CandidateTier::SubnetSweep)
            .collect();

        assert_eq!(sweep.len(), 10);
        assert_eq!(sweep[0].host, "192.168.1.1");
        assert_eq!(sweep[9].host, "192.168.1.10");
    }

    #[test]
    fn test_sweep_prefix_derived_from_detected() {
        let config = ResolverConfig::default().with_platform(Platform::Desktop);
        let detected = [Ipv4Addr::new(10, 1, 7, 99)];
        let candidates = build_candidates_with(&config, &detected);

        assert!(candidates
            .iter()
            .any(|c| c.tier == CandidateTier::SubnetSweep && c.host == "10.1.7.5"));
    }

    #[test]
    fn test_no_detected_and_no_prefix_skips_sweep() {
        let config = ResolverConfig::default().with_platform(Platform::Desktop);
        let candidates = build_candidates_with(&config, &[]);

        assert!(!candidates
            .iter()
            .any(|c| c.tier == CandidateTier::SubnetSweep));
    }

    #[test]
    fn test_extra_hosts_included() {
        let config = test_config().with_extra_hosts(vec!["172.16.0.9".to_string()]);
        let candidates = build_candidates_with(&config, &[]);

        assert!(candidates
            .iter()
            .any(|c| c.host == "172.16.0.9" && c.tier == CandidateTier::PlatformDefault));
    }

    #[test]
    fn test_candidate_probe_root() {
        let candidate = Candidate::new("10.0.2.2", 5000, CandidateTier::PlatformDefault);
        assert_eq!(candidate.probe_root(), "http://10.0.2.2:5000");
    }
}

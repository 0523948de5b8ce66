//! Probe sweep strategies
//!
//! Candidates are always tried in rank order; the strategy only decides how
//! a single candidate's health paths are issued. Sequential reproduces the
//! strict nested loop, so worst-case latency is candidates x paths x
//! timeout. Fan-out races each candidate's paths with bounded concurrency.

use crate::config::ProbeStrategy;
use crate::discovery::Candidate;
use futures::stream::{self, StreamExt};
use super::{HealthProbe, HEALTH_PATHS};

/// Probe candidates in rank order and return the first live one.
pub async fn first_live<P: HealthProbe>(
    prober: &P,
    candidates: &[Candidate],
    strategy: ProbeStrategy,
    concurrency: usize,
) -> Option<Candidate> {
    match strategy {
        ProbeStrategy::Sequential => sequential(prober, candidates).await,
        ProbeStrategy::FanOut => fan_out(prober, candidates, concurrency).await,
    }
}

async fn sequential<P: HealthProbe>(prober: &P, candidates: &[Candidate]) -> Option<Candidate> {
    for candidate in candidates {
        let root = candidate.probe_root();
        for path in HEALTH_PATHS {
            match prober.check(&root, path).await {
                Ok(()) => {
                    tracing::info!("{} answered on {:?}", root, path);
                    return Some(candidate.clone());
                }
                Err(e) => {
                    tracing::debug!("probe {}{} failed: {}", root, path, e);
                }
            }
        }
    }
    None
}

async fn fan_out<P: HealthProbe>(
    prober: &P,
    candidates: &[Candidate],
    concurrency: usize,
) -> Option<Candidate> {
    let concurrency = concurrency.max(1);

    for candidate in candidates {
        let root = candidate.probe_root();
        let mut probes = stream::iter(HEALTH_PATHS.iter().map(|path| {
            let root = root.clone();
            async move { (*path, prober.check(&root, path).await) }
        }))
        .buffer_unordered(concurrency);

        while let Some((path, result)) = probes.next().await {
            match result {
                Ok(()) => {
                    tracing::info!("{} answered on {:?}", root, path);
                    // dropping the stream cancels in-flight probes
                    return Some(candidate.clone());
                }
                Err(e) => {
                    tracing::debug!("probe {}{} failed: {}", root, path, e);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::CandidateTier;
    use crate::error::ProbeError;
    use std::future::Future;
    use std::sync::Mutex;

    /// Prober answering only for one host, on one path.
    struct ScriptedProbe {
        live_host: &'static str,
        live_path: &'static str,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedProbe {
        fn new(live_host: &'static str, live_path: &'static str) -> Self {
            Self {
                live_host,
                live_path,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn probed_roots(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(root, _)| root.clone())
                .collect()
        }
    }

    impl HealthProbe for ScriptedProbe {
        fn check(
            &self,
            probe_root: &str,
            path: &str,
        ) -> impl Future<Output = Result<(), ProbeError>> + Send {
            self.calls
                .lock()
                .unwrap()
                .push((probe_root.to_string(), path.to_string()));
            let live = probe_root.contains(self.live_host) && path == self.live_path;
            async move {
                if live {
                    Ok(())
                } else {
                    Err(ProbeError::Network("connection refused".to_string()))
                }
            }
        }
    }

    fn candidates(hosts: &[&str]) -> Vec<Candidate> {
        hosts
            .iter()
            .map(|h| Candidate::new(*h, 5000, CandidateTier::PlatformDefault))
            .collect()
    }

    #[tokio::test]
    async fn test_sequential_first_success_wins() {
        let prober = ScriptedProbe::new("10.0.0.3", "/ping");
        let list = candidates(&["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4"]);

        let winner = first_live(&prober, &list, ProbeStrategy::Sequential, 1)
            .await
            .unwrap();
        assert_eq!(winner.host, "10.0.0.3");

        // later candidates are never probed
        let roots = prober.probed_roots();
        assert!(!roots.iter().any(|r| r.contains("10.0.0.4")));
        // the winning candidate stops at its live path
        assert_eq!(roots.last().unwrap(), "http://10.0.0.3:5000");
    }

    #[tokio::test]
    async fn test_sequential_exhausts_paths_before_moving_on() {
        let prober = ScriptedProbe::new("10.0.0.2", "/health");
        let list = candidates(&["10.0.0.1", "10.0.0.2"]);

        first_live(&prober, &list, ProbeStrategy::Sequential, 1).await;

        let dead_probes = prober
            .probed_roots()
            .iter()
            .filter(|r| r.contains("10.0.0.1"))
            .count();
        assert_eq!(dead_probes, HEALTH_PATHS.len());
    }

    #[tokio::test]
    async fn test_sequential_total_failure() {
        let prober = ScriptedProbe::new("none", "/health");
        let list = candidates(&["10.0.0.1", "10.0.0.2"]);

        let winner = first_live(&prober, &list, ProbeStrategy::Sequential, 1).await;
        assert!(winner.is_none());
        assert_eq!(prober.probed_roots().len(), 2 * HEALTH_PATHS.len());
    }

    #[tokio::test]
    async fn test_fan_out_finds_live_candidate() {
        let prober = ScriptedProbe::new("10.0.0.2", "/api/status");
        let list = candidates(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]);

        let winner = first_live(&prober, &list, ProbeStrategy::FanOut, 3)
            .await
            .unwrap();
        assert_eq!(winner.host, "10.0.0.2");
        assert!(!prober.probed_roots().iter().any(|r| r.contains("10.0.0.3")));
    }

    #[tokio::test]
    async fn test_fan_out_total_failure() {
        let prober = ScriptedProbe::new("none", "/health");
        let list = candidates(&["10.0.0.1"]);

        let winner = first_live(&prober, &list, ProbeStrategy::FanOut, 4).await;
        assert!(winner.is_none());
    }
}

//! Candidate address discovery

mod candidates;
mod defaults;
mod interfaces;

pub use candidates::{build_candidates, build_candidates_with, Candidate, CandidateTier};
pub use defaults::{gateway_hosts, platform_hosts};
pub use interfaces::{local_ipv4_addrs, subnet_prefix};

//! Default candidate hosts
//!
//! Known-good backend hosts per client platform, plus the router addresses
//! probed as a last resort. Ordering within each list matters: earlier hosts
//! are tried first.

use crate::config::Platform;

/// Get known-good hosts for a platform
pub fn platform_hosts(platform: Platform) -> Vec<&'static str> {
    match platform {
        Platform::AndroidEmulator => android_hosts(),
        Platform::IosSimulator => simulator_hosts(),
        Platform::Desktop => desktop_hosts(),
    }
}

/// Android emulator loopback aliases for the host machine
fn android_hosts() -> Vec<&'static str> {
    vec![
        // Stock emulator maps the host's loopback here
        "10.0.2.2",
        // Genymotion uses its own alias
        "10.0.3.2",
    ]
}

/// iOS simulator shares the host loopback
fn simulator_hosts() -> Vec<&'static str> {
    vec!["127.0.0.1", "localhost"]
}

/// Desktop/web clients talk to a local backend directly
fn desktop_hosts() -> Vec<&'static str> {
    vec!["127.0.0.1", "localhost"]
}

/// Common router/default-gateway addresses, probed after the subnet sweep
pub fn gateway_hosts() -> Vec<&'static str> {
    vec!["192.168.0.1", "192.168.1.1", "10.0.0.1"]
}

//! Network interface introspection

use std::net::IpAddr;
use std::net::Ipv4Addr;

/// Returns local non-loopback IPv4 addresses, excluding link-local (169.254.x.x).
pub fn local_ipv4_addrs() -> Vec<Ipv4Addr> {
    if_addrs::get_if_addrs()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|iface| {
            if iface.is_loopback() {
                return None;
            }
            match iface.addr.ip() {
                IpAddr::V4(ip) => {
                    // Skip link-local (169.254.x.x)
                    if ip.octets()[0] == 169 && ip.octets()[1] == 254 {
                        return None;
                    }
                    Some(ip)
                }
                _ => None,
            }
        })
        .collect()
}

/// First three octets of an address, e.g. "192.168.1"
pub fn subnet_prefix(ip: Ipv4Addr) -> String {
    let octets = ip.octets();
    format!("{}.{}.{}", octets[0], octets[1], octets[2])
}

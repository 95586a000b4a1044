mod generator;
mod oui;

use std::net::Ipv4Addr;

use pnet::util::MacAddr;

use crate::vendor::VendorProfile;

pub use generator::generate;
pub use oui::Oui;

/// Snapshot of the identity produced by one rotation. Each rotation builds a
/// new one; nothing is carried over except what the loop copies in.
#[derive(Debug, Clone)]
pub struct IdentityState {
    pub sequence: u64,
    pub interface: String,
    pub mac: MacAddr,
    pub vendor: Option<&'static VendorProfile>,
    pub ssid: Option<String>,
    pub ip: Option<Ipv4Addr>,
    /// Hostname successfully applied for this rotation
    pub hostname: Option<String>,
    /// Default TTL successfully applied for this rotation
    pub ttl: Option<u8>,
}

impl IdentityState {
    pub fn new(
        sequence: u64,
        interface: &str,
        mac: MacAddr,
        vendor: Option<&'static VendorProfile>,
        ssid: Option<String>,
    ) -> Self {
        Self {
            sequence,
            interface: interface.to_string(),
            mac,
            vendor,
            ssid,
            ip: None,
            hostname: None,
            ttl: None,
        }
    }
}

//! The only seam touching the operating system: applying MAC, hostname and TTL
//! changes, and reading back SSID, IPv4 address and the current MAC.

mod system;

use std::fmt;
use std::net::Ipv4Addr;

use pnet::util::MacAddr;

use crate::error::IdentityError;

pub use system::{LinkTool, SystemEnvironment, interface_exists};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Mac { interface: String, mac: MacAddr },
    Hostname(String),
    Ttl(u8),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Mac { interface, mac } => write!(f, "MAC {interface} → {mac}"),
            Directive::Hostname(hostname) => write!(f, "hostname → {hostname}"),
            Directive::Ttl(ttl) => write!(f, "TTL → {ttl}"),
        }
    }
}

pub trait NetworkEnvironment {
    /// Apply a change; `CommandFailure` when the platform command fails
    fn apply(&mut self, directive: &Directive) -> Result<(), IdentityError>;
    fn current_ssid(&self) -> Option<String>;
    fn current_ip(&self, interface: &str) -> Option<Ipv4Addr>;
    fn current_mac(&self, interface: &str) -> Option<MacAddr>;
}

//! Believability scoring. Seven binary checks with fixed weights summing to 100;
//! a check either awards its full weight or nothing.

use std::fmt;

use pnet::util::MacAddr;

use crate::identity::{IdentityState, Oui};
use crate::vendor::classify_interface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    VendorAffinity,
    VendorOui,
    Ttl,
    Hostname,
    PersistentIdentity,
    MacQuality,
    IpAcquired,
}

impl Check {
    /// Evaluation and display order
    pub const ALL: [Check; 7] = [
        Check::VendorAffinity,
        Check::VendorOui,
        Check::Ttl,
        Check::Hostname,
        Check::PersistentIdentity,
        Check::MacQuality,
        Check::IpAcquired,
    ];

    pub fn weight(&self) -> u8 {
        match self {
            Check::VendorAffinity => 20,
            Check::VendorOui => 20,
            Check::Ttl => 15,
            Check::Hostname => 15,
            Check::PersistentIdentity => 10,
            Check::MacQuality => 10,
            Check::IpAcquired => 10,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Check::VendorAffinity => "Vendor affinity matches interface type",
            Check::VendorOui => "Valid vendor OUI",
            Check::Ttl => "TTL matches vendor profile",
            Check::Hostname => "Hostname matches vendor style",
            Check::PersistentIdentity => "Persistent network identity",
            Check::MacQuality => "MAC quality",
            Check::IpAcquired => "IP acquisition success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckResult {
    pub check: Check,
    pub awarded: u8,
}

impl CheckResult {
    #[allow(dead_code)]
    pub fn passed(&self) -> bool {
        self.awarded > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub checks: Vec<CheckResult>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        let sum: u32 = self.checks.iter().map(|c| u32::from(c.awarded)).sum();
        sum.min(100) as u8
    }

    #[allow(dead_code)]
    pub fn awarded(&self, check: Check) -> u8 {
        self.checks
            .iter()
            .find(|c| c.check == check)
            .map_or(0, |c| c.awarded)
    }
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/100 (", self.total())?;
        for (i, result) in self.checks.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}/{}", result.check.name(), result.awarded, result.check.weight())?;
        }
        write!(f, ")")
    }
}

/// Broadcast addresses and low octets that are all identical or step by one
/// (`00:00:00`, `01:02:03`, `ff:fe:fd`) look synthetic.
pub fn is_quality_mac(mac: &MacAddr) -> bool {
    if mac.is_broadcast() {
        return false;
    }
    let tail = [mac.3, mac.4, mac.5];
    let identical = tail[0] == tail[1] && tail[1] == tail[2];
    let ascending =
        tail[0].checked_add(1) == Some(tail[1]) && tail[1].checked_add(1) == Some(tail[2]);
    let descending =
        tail[0].checked_sub(1) == Some(tail[1]) && tail[1].checked_sub(1) == Some(tail[2]);
    !(identical || ascending || descending)
}

fn evaluate(
    check: Check,
    identity: &IdentityState,
    had_persistent_match: bool,
    ip_acquired: bool,
) -> bool {
    let vendor = identity.vendor;
    match check {
        Check::VendorAffinity => {
            vendor.is_some_and(|v| v.prefers(classify_interface(&identity.interface)))
        }
        Check::VendorOui => vendor.is_some_and(|v| v.has_oui(&Oui::of(&identity.mac))),
        Check::Ttl => vendor.is_some_and(|v| identity.ttl == Some(v.ttl)),
        Check::Hostname => vendor.is_some_and(|v| {
            identity
                .hostname
                .as_deref()
                .is_some_and(|h| v.hostname_style.matches(h))
        }),
        Check::PersistentIdentity => had_persistent_match,
        Check::MacQuality => is_quality_mac(&identity.mac),
        Check::IpAcquired => ip_acquired,
    }
}

pub fn score(
    identity: &IdentityState,
    had_persistent_match: bool,
    ip_acquired: bool,
) -> ScoreBreakdown {
    let checks = Check::ALL
        .iter()
        .map(|&check| CheckResult {
            check,
            awarded: if evaluate(check, identity, had_persistent_match, ip_acquired) {
                check.weight()
            } else {
                0
            },
        })
        .collect();
    ScoreBreakdown { checks }
}

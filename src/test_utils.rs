use std::net::Ipv4Addr;

use pnet::util::MacAddr;

use crate::environment::{Directive, NetworkEnvironment};
use crate::error::IdentityError;
use crate::rotation::StopSignal;

/// Scriptable stand-in for the host network. Records every directive it is
/// asked to apply; outside dry-run mode a MAC change updates `mac`.
pub struct FakeEnvironment {
    pub applied: Vec<Directive>,
    pub mac: Option<MacAddr>,
    pub ssid: Option<String>,
    pub ip: Option<Ipv4Addr>,
    pub dry_run: bool,
    pub fail_mac_changes: bool,
    interrupt: Option<(usize, StopSignal)>,
}

impl FakeEnvironment {
    pub fn new(mac: MacAddr) -> Self {
        Self {
            applied: Vec::new(),
            mac: Some(mac),
            ssid: None,
            ip: None,
            dry_run: false,
            fail_mac_changes: false,
            interrupt: None,
        }
    }

    pub fn dry_run(mac: MacAddr) -> Self {
        Self {
            dry_run: true,
            ..Self::new(mac)
        }
    }

    /// Trigger `stop` once this many MAC changes have been applied
    pub fn interrupt_after(mut self, mac_changes: usize, stop: StopSignal) -> Self {
        self.interrupt = Some((mac_changes, stop));
        self
    }

    pub fn applied_macs(&self) -> Vec<MacAddr> {
        self.applied
            .iter()
            .filter_map(|d| match d {
                Directive::Mac { mac, .. } => Some(*mac),
                _ => None,
            })
            .collect()
    }

    pub fn applied_hostnames(&self) -> Vec<String> {
        self.applied
            .iter()
            .filter_map(|d| match d {
                Directive::Hostname(hostname) => Some(hostname.clone()),
                _ => None,
            })
            .collect()
    }
}

impl NetworkEnvironment for FakeEnvironment {
    fn apply(&mut self, directive: &Directive) -> Result<(), IdentityError> {
        self.applied.push(directive.clone());

        if let Directive::Mac { mac, .. } = directive {
            if let Some((after, stop)) = &self.interrupt
                && self.applied_macs().len() == *after
            {
                stop.trigger();
            }
            if self.fail_mac_changes {
                return Err(IdentityError::CommandFailure(format!("refused {}", directive)));
            }
            if !self.dry_run {
                self.mac = Some(*mac);
            }
        }
        Ok(())
    }

    fn current_ssid(&self) -> Option<String> {
        self.ssid.clone()
    }

    fn current_ip(&self, _interface: &str) -> Option<Ipv4Addr> {
        self.ip
    }

    fn current_mac(&self, _interface: &str) -> Option<MacAddr> {
        self.mac
    }
}

mod tests {
    use super::*;

    #[test]
    fn test_fake_records_without_changing_in_dry_run() {
        let original = MacAddr::new(0x00, 0x11, 0x22, 0x33, 0x44, 0x55);
        let next = MacAddr::new(0x02, 0x11, 0x22, 0x33, 0x44, 0x56);

        let mut dry = FakeEnvironment::dry_run(original);
        dry.apply(&Directive::Mac { interface: "eth0".into(), mac: next }).unwrap();
        assert_eq!(dry.current_mac("eth0"), Some(original));
        assert_eq!(dry.applied_macs(), vec![next]);

        let mut live = FakeEnvironment::new(original);
        live.apply(&Directive::Mac { interface: "eth0".into(), mac: next }).unwrap();
        assert_eq!(live.current_mac("eth0"), Some(next));
    }

    #[test]
    fn test_fake_interrupt_after() {
        let stop = StopSignal::new();
        let mut env = FakeEnvironment::new(MacAddr::zero()).interrupt_after(2, stop.clone());
        let mac = MacAddr::new(0x02, 0, 0, 0, 0, 1);

        env.apply(&Directive::Mac { interface: "eth0".into(), mac }).unwrap();
        env.apply(&Directive::Ttl(64)).unwrap();
        assert!(!stop.is_triggered());
        env.apply(&Directive::Mac { interface: "eth0".into(), mac }).unwrap();
        assert!(stop.is_triggered());
    }
}

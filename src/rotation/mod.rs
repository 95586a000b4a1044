//! Rotation loop. Each iteration selects a vendor, generates and applies a MAC,
//! applies the vendor fingerprint, waits for the link to settle, reads the IP,
//! scores the result and sleeps until the next rotation or an interrupt.

mod event_log;
mod stop;

use std::io::Write;
use std::time::Duration;

use pnet::util::MacAddr;
use rand::rngs::StdRng;

use crate::config::RotationConfig;
use crate::environment::{Directive, NetworkEnvironment};
use crate::error::IdentityError;
use crate::identity::IdentityState;
use crate::scoring::{ScoreBreakdown, score};
use crate::selector::select;
use crate::store::ProfileStore;
use crate::vendor::VendorProfile;

pub use event_log::EventLog;
pub use stop::StopSignal;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationSummary {
    pub rotations: u64,
    pub failed: u64,
    pub last_score: Option<u8>,
    pub restored: bool,
}

pub struct Rotator<E: NetworkEnvironment, S: ProfileStore> {
    config: RotationConfig,
    env: E,
    store: S,
    log: EventLog,
    rng: StdRng,
    original_mac: Option<MacAddr>,
    restored: bool,
}

impl<E: NetworkEnvironment, S: ProfileStore> Rotator<E, S> {
    /// Records the interface's current MAC for restore-on-exit
    pub fn new(config: RotationConfig, env: E, store: S, mut log: EventLog, rng: StdRng) -> Self {
        let original_mac = env.current_mac(&config.interface);
        match original_mac {
            Some(mac) => log.record(&format!("Original MAC → {}", mac)),
            None => log.record(&format!(
                "Original MAC of {} unknown, nothing to restore on exit",
                config.interface
            )),
        }

        Self {
            config,
            env,
            store,
            log,
            rng,
            original_mac,
            restored: false,
        }
    }

    #[allow(dead_code)]
    pub fn original_mac(&self) -> Option<MacAddr> {
        self.original_mac
    }

    #[allow(dead_code)]
    pub fn env(&self) -> &E {
        &self.env
    }

    #[allow(dead_code)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rotate until the configured count is reached or `stop` fires, then
    /// restore the original MAC if enabled
    pub fn run(&mut self, stop: &StopSignal) -> RotationSummary {
        let mut summary = RotationSummary::default();
        self.log.record(&format!("Vendor mode → {}", self.config.mode));

        let mut sequence = 0u64;
        while !stop.is_triggered() {
            sequence += 1;
            match self.rotate(sequence, stop) {
                Ok(breakdown) => {
                    summary.rotations += 1;
                    summary.last_score = Some(breakdown.total());
                }
                Err(e) => {
                    summary.failed += 1;
                    self.log.record(&format!("[{}] Rotation failed: {}", sequence, e));
                }
            }

            if self.config.count != 0 && sequence >= self.config.count {
                break;
            }
            if self.sleep(stop) {
                break;
            }
        }

        summary.restored = self.restore();
        self.log.flush();
        summary
    }

    fn rotate(
        &mut self,
        sequence: u64,
        stop: &StopSignal,
    ) -> Result<ScoreBreakdown, IdentityError> {
        let interface = self.config.interface.clone();
        let ssid = self.env.current_ssid();
        let selection = select(&self.config.mode, &interface, ssid.as_deref(), &mut self.store)?;
        if let Some(e) = &selection.store_error {
            self.log.record(&format!("[{}] Profile store save failed: {}", sequence, e));
        }

        let mac = selection.generate_mac(&mut self.rng);
        let mut identity = IdentityState::new(sequence, &interface, mac, selection.vendor, ssid);
        if let Some(ssid) = &identity.ssid {
            self.log.record(&format!("[{}] SSID → {}", sequence, ssid));
        }

        let vendor_label = selection.vendor.map_or("none", |v| v.name);
        self.log.record(&format!("[{}] MAC → {} (vendor: {})", sequence, mac, vendor_label));
        self.env.apply(&Directive::Mac {
            interface: interface.clone(),
            mac,
        })?;

        if let Some(profile) = selection.vendor {
            self.apply_fingerprint(profile, &mut identity);
        }

        stop.wait_timeout(self.config.settle_delay);
        identity.ip = self.env.current_ip(&interface);
        match identity.ip {
            Some(ip) => self.log.record(&format!("[{}] IP → {}", sequence, ip)),
            None => self.log.record(&format!("[{}] IP → none", sequence)),
        }

        let breakdown = score(&identity, selection.persistent_match, identity.ip.is_some());
        self.log.record(&format!("[{}] Believability score → {}", sequence, breakdown));
        Ok(breakdown)
    }

    /// Hostname and TTL failures cost score points but do not fail the rotation
    fn apply_fingerprint(&mut self, profile: &VendorProfile, identity: &mut IdentityState) {
        let sequence = identity.sequence;

        let hostname = profile.hostname_style.generate(&mut self.rng);
        match self.env.apply(&Directive::Hostname(hostname.clone())) {
            Ok(()) => {
                self.log.record(&format!("[{}] Hostname → {}", sequence, hostname));
                identity.hostname = Some(hostname);
            }
            Err(e) => self.log.record(&format!("[{}] Hostname change failed: {}", sequence, e)),
        }

        match self.env.apply(&Directive::Ttl(profile.ttl)) {
            Ok(()) => {
                self.log.record(&format!("[{}] TTL → {}", sequence, profile.ttl));
                identity.ttl = Some(profile.ttl);
            }
            Err(e) => self.log.record(&format!("[{}] TTL change failed: {}", sequence, e)),
        }
    }

    /// Returns true when interrupted
    fn sleep(&self, stop: &StopSignal) -> bool {
        if !self.config.countdown {
            return stop.wait_timeout(self.config.interval);
        }

        let mut remaining = self.config.interval;
        while !remaining.is_zero() {
            print!("\rNext rotation in {:>4}s ", remaining.as_secs_f64().ceil() as u64);
            let _ = std::io::stdout().flush();

            let tick = remaining.min(Duration::from_secs(1));
            if stop.wait_timeout(tick) {
                println!();
                return true;
            }
            remaining -= tick;
        }
        println!();
        false
    }

    /// Runs at most once; restore failures are logged and swallowed
    fn restore(&mut self) -> bool {
        if !self.config.restore_on_exit || self.restored {
            return false;
        }
        self.restored = true;

        let Some(original) = self.original_mac else {
            return false;
        };

        self.log.record(&format!("Restoring MAC → {}", original));
        let directive = Directive::Mac {
            interface: self.config.interface.clone(),
            mac: original,
        };
        if let Err(e) = self.env.apply(&directive) {
            self.log.record(&format!("Restore failed: {}", e));
        }
        true
    }
}

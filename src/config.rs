use std::path::PathBuf;
use std::time::Duration;

use crate::error::IdentityError;
use crate::selector::VendorMode;
use crate::store::default_profiles_path;
use crate::vendor;

pub const DEFAULT_INTERVAL_SECS: u64 = 60;
/// Time for DHCP to settle after the link comes back up
pub const DEFAULT_SETTLE_SECS: u64 = 2;

#[derive(Debug, Clone)]
pub struct RotationConfig {
    pub interface: String,
    pub interval: Duration,
    /// 0 rotates until interrupted
    pub count: u64,
    pub mode: VendorMode,
    pub dry_run: bool,
    pub restore_on_exit: bool,
    pub log_path: Option<PathBuf>,
    pub countdown: bool,
    pub settle_delay: Duration,
    pub profiles_path: PathBuf,
}

impl RotationConfig {
    pub fn new(interface: &str) -> Self {
        Self {
            interface: interface.trim().to_string(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            count: 0,
            mode: VendorMode::Auto,
            dry_run: false,
            restore_on_exit: true,
            log_path: None,
            countdown: false,
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_SECS),
            profiles_path: default_profiles_path(),
        }
    }

    pub fn validate(&self) -> Result<(), IdentityError> {
        if self.interface.is_empty() {
            return Err(IdentityError::InvalidConfig("interface name is empty".to_string()));
        }
        if self.interval.is_zero() {
            return Err(IdentityError::InvalidConfig(
                "interval must be greater than zero".to_string(),
            ));
        }
        if let VendorMode::Manual(name) = &self.mode {
            vendor::lookup(name)?;
        }
        Ok(())
    }
}

//! Network identity selection. Picks the vendor profile (or bare prefix) for a
//! rotation from the vendor mode, the interface name and the current SSID.

use log::{debug, warn};
use pnet::util::MacAddr;
use rand::Rng;

use crate::error::IdentityError;
use crate::identity::{Oui, generate};
use crate::store::ProfileStore;
use crate::vendor::{self, VendorProfile, classify_interface, preferred_for};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorMode {
    /// Interface + network based; reuses and records per-SSID choices
    Auto,
    Manual(String),
    CustomOui(Oui),
    FullyRandom,
}

impl std::fmt::Display for VendorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VendorMode::Auto => write!(f, "auto"),
            VendorMode::Manual(name) => write!(f, "manual ({name})"),
            VendorMode::CustomOui(oui) => write!(f, "custom OUI ({oui})"),
            VendorMode::FullyRandom => write!(f, "fully random"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    pub vendor: Option<&'static VendorProfile>,
    pub prefix: Option<Oui>,
    pub fully_random: bool,
    /// Vendor came from an earlier stored entry for this SSID
    pub persistent_match: bool,
    /// Set when the new SSID mapping could not be written out; the in-memory
    /// mapping still holds
    pub store_error: Option<String>,
}

impl SelectionResult {
    fn from_vendor(profile: &'static VendorProfile, persistent_match: bool) -> Self {
        Self {
            vendor: Some(profile),
            prefix: None,
            fully_random: false,
            persistent_match,
            store_error: None,
        }
    }

    fn custom(prefix: Oui) -> Self {
        Self {
            vendor: None,
            prefix: Some(prefix),
            fully_random: false,
            persistent_match: false,
            store_error: None,
        }
    }

    fn random() -> Self {
        Self {
            vendor: None,
            prefix: None,
            fully_random: true,
            persistent_match: false,
            store_error: None,
        }
    }

    /// Generate a MAC for this selection: one of the vendor's OUIs, the custom
    /// prefix, or a locally administered random address
    pub fn generate_mac<R: Rng>(&self, rng: &mut R) -> MacAddr {
        let prefix = match self.vendor {
            Some(profile) => profile.random_oui(rng),
            None => self.prefix,
        };
        generate(prefix, rng)
    }
}

/// Select the identity source for one rotation. Only `Auto` touches the store.
pub fn select(
    mode: &VendorMode,
    interface: &str,
    ssid: Option<&str>,
    store: &mut dyn ProfileStore,
) -> Result<SelectionResult, IdentityError> {
    match mode {
        VendorMode::Auto => Ok(select_auto(interface, ssid, store)),
        VendorMode::Manual(name) => {
            let profile = vendor::lookup(name)?;
            Ok(SelectionResult::from_vendor(profile, false))
        }
        VendorMode::CustomOui(prefix) => Ok(SelectionResult::custom(*prefix)),
        VendorMode::FullyRandom => Ok(SelectionResult::random()),
    }
}

fn select_auto(
    interface: &str,
    ssid: Option<&str>,
    store: &mut dyn ProfileStore,
) -> SelectionResult {
    let ssid = ssid.map(str::trim).filter(|s| !s.is_empty());

    if let Some(ssid) = ssid
        && let Some(stored) = store.get(ssid)
    {
        match vendor::lookup(&stored) {
            Ok(profile) => return SelectionResult::from_vendor(profile, true),
            Err(_) => {
                warn!("Stored vendor {:?} for {:?} is unknown, reclassifying", stored, ssid)
            }
        }
    }

    let kind = classify_interface(interface);
    let Some(profile) = preferred_for(kind) else {
        debug!("No vendor affinity for {} interface {}, using random MAC", kind, interface);
        return SelectionResult::random();
    };

    let mut result = SelectionResult::from_vendor(profile, false);
    if let Some(ssid) = ssid
        && store.put(ssid, profile.key)
        && let Err(e) = store.save()
    {
        debug!("Failed to persist vendor for {:?}: {}", ssid, e);
        result.store_error = Some(e.to_string());
    }
    result
}

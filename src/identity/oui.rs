//! Organizationally Unique Identifier (first three octets of a MAC address).

use std::fmt;
use std::str::FromStr;

use pnet::util::MacAddr;

use crate::error::IdentityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Oui([u8; 3]);

impl Oui {
    pub const fn new(a: u8, b: u8, c: u8) -> Self {
        Oui([a, b, c])
    }

    pub fn octets(&self) -> [u8; 3] {
        self.0
    }

    /// True when the MAC address begins with exactly this prefix
    pub fn matches(&self, mac: &MacAddr) -> bool {
        mac.0 == self.0[0] && mac.1 == self.0[1] && mac.2 == self.0[2]
    }

    pub fn of(mac: &MacAddr) -> Self {
        Oui([mac.0, mac.1, mac.2])
    }
}

impl fmt::Display for Oui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}:{:02x}:{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

/// Accepts `aa:bb:cc`, `aa-bb-cc` or `aabbcc`, any case
impl FromStr for Oui {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || IdentityError::InvalidPrefix(trimmed.to_string());

        let parts: Vec<&str> = if trimmed.contains(':') {
            trimmed.split(':').collect()
        } else if trimmed.contains('-') {
            trimmed.split('-').collect()
        } else if trimmed.len() == 6 && trimmed.is_ascii() {
            vec![&trimmed[0..2], &trimmed[2..4], &trimmed[4..6]]
        } else {
            return Err(invalid());
        };

        if parts.len() != 3 {
            return Err(invalid());
        }

        let mut octets = [0u8; 3];
        for (octet, part) in octets.iter_mut().zip(parts) {
            if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        Ok(Oui(octets))
    }
}

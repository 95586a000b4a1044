use pnet::util::MacAddr;
use rand::Rng;

use super::oui::Oui;

/// Generate a MAC address, either behind a fixed OUI or fully random.
/// Fully random addresses get the locally administered bit set and the
/// multicast bit cleared on the first octet.
pub fn generate<R: Rng>(prefix: Option<Oui>, rng: &mut R) -> MacAddr {
    let mut bytes = [0u8; 6];
    rng.fill(&mut bytes[..]);

    match prefix {
        Some(oui) => bytes[..3].copy_from_slice(&oui.octets()),
        None => bytes[0] = (bytes[0] | 0x02) & !0x01,
    }

    MacAddr::from(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_mac_address_bits() {
        for seed in 0..2000u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mac = generate(None, &mut rng);
            assert!(mac.0 & 0x02 != 0, "locally administered bit not set: {mac}");
            assert!(mac.0 & 0x01 == 0, "multicast bit set: {mac}");
            assert!(mac.is_local() && mac.is_unicast());
        }
    }

    #[test]
    fn test_prefixed_mac_preserves_oui() {
        let prefixes = [
            Oui::new(0x3c, 0xfd, 0xfe),
            Oui::new(0x00, 0x50, 0x56),
            // Multicast-looking prefix is kept as-is when supplied
            Oui::new(0xff, 0xff, 0xff),
        ];
        for seed in 0..500u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            for oui in prefixes {
                let mac = generate(Some(oui), &mut rng);
                assert_eq!([mac.0, mac.1, mac.2], oui.octets());
                assert!(oui.matches(&mac));
            }
        }
    }

    #[test]
    fn test_same_seed_same_mac() {
        let a = generate(None, &mut StdRng::seed_from_u64(7));
        let b = generate(None, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}

/// MAC address normalization and burned-in heuristics.
///
/// Addresses are compared in one canonical form, uppercase hex with every
/// separator stripped, so `00:50:56`, `00-50-56` and `005056` are the same.
use std::sync::OnceLock;

use crate::defaults::{AdapterSignature, ADAPTER_SIGNATURES, UNKNOWN_ADAPTER};

/// Address reported by listings that could not read the hardware address.
/// Treated as burned-in.
pub const UNKNOWN_ADDRESS: &str = "UNKNOWN";

/// Strip everything but hex digits and uppercase the rest.
pub fn normalize(address: &str) -> String {
    address
        .chars()
        .filter(char::is_ascii_hexdigit)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Separator-free form of an address, e.g. `"00:50:56:C0:00:08"` → `"005056C00008"`.
pub fn plain_mac(address: &str) -> String {
    normalize(address)
}

/// Colon-separated form of an address, e.g. `"00-50-56-c0-00-08"` → `"00:50:56:C0:00:08"`.
///
/// Input without a single hex digit is returned verbatim.
pub fn pretty_print_mac(address: &str) -> String {
    let plain = normalize(address);
    if plain.is_empty() {
        return address.to_string();
    }

    let mut pretty = String::with_capacity(plain.len() + plain.len() / 2);
    for (i, c) in plain.chars().enumerate() {
        if i > 0 && i % 2 == 0 {
            pretty.push(':');
        }
        pretty.push(c);
    }
    pretty
}

/// Adapter signatures plus the non-burned mask set derived from them.
///
/// Built in two phases: every mask is collected before the table is usable,
/// so signature order only affects classification precedence.
#[derive(Debug)]
pub struct AdapterTable {
    signatures: &'static [AdapterSignature],
    masks: Vec<&'static str>,
}

impl AdapterTable {
    /// Build a table. The first signature is the fallback for unmatched
    /// addresses and is never matched by prefix.
    pub fn new(signatures: &'static [AdapterSignature]) -> Self {
        let masks = signatures
            .iter()
            .filter(|sig| sig.is_non_burned_mask && !sig.mac_prefix.is_empty())
            .map(|sig| sig.mac_prefix)
            .collect();

        Self { signatures, masks }
    }

    /// The table over [`ADAPTER_SIGNATURES`], built on first use.
    pub fn builtin() -> &'static AdapterTable {
        static TABLE: OnceLock<AdapterTable> = OnceLock::new();
        TABLE.get_or_init(|| AdapterTable::new(ADAPTER_SIGNATURES))
    }

    /// Registered non-burned prefixes, in table order.
    pub fn masks(&self) -> &[&'static str] {
        &self.masks
    }

    /// First signature whose prefix starts the normalized address, or the
    /// fallback signature.
    pub fn find(&self, address: &str) -> &'static AdapterSignature {
        let Some((fallback, known)) = self.signatures.split_first() else {
            return &UNKNOWN_ADAPTER;
        };

        let plain = normalize(address);
        let found = known
            .iter()
            .find(|sig| !sig.mac_prefix.is_empty() && plain.starts_with(sig.mac_prefix));

        match found {
            Some(sig) => {
                if crate::debug_enabled() {
                    log::debug!("adapter {address:?} matched {} ({})", sig.name, sig.mac_prefix);
                }
                sig
            }
            None => {
                if crate::debug_enabled() {
                    log::debug!("adapter {address:?} matched no prefix, using {}", fallback.name);
                }
                fallback
            }
        }
    }

    /// Whether `address` looks factory-assigned.
    ///
    /// [`UNKNOWN_ADDRESS`] counts as burned-in, an empty address does not.
    /// Addresses under a registered mask are never burned-in. Otherwise the
    /// first octet is rendered in binary without leading zeros and the digit
    /// at index 6 must be `0`; octets below `0x40` render too short and are
    /// not burned-in.
    pub fn is_burned_in(&self, address: &str) -> bool {
        if address == UNKNOWN_ADDRESS {
            return true;
        }

        let plain = normalize(address);
        if plain.is_empty() {
            return false;
        }

        if let Some(mask) = self.masks.iter().find(|mask| plain.starts_with(**mask)) {
            if crate::debug_enabled() {
                log::debug!("adapter {address:?} is under non-burned mask {mask}");
            }
            return false;
        }

        let Ok(octet) = u8::from_str_radix(&plain[..plain.len().min(2)], 16) else {
            return false;
        };

        // Index 6 of the binary digits, counted from the leading one
        let width = u8::BITS - octet.leading_zeros();
        width >= 7 && (octet >> (width - 7)) & 1 == 0
    }
}

/// [`AdapterTable::is_burned_in`] against the built-in table.
pub fn is_burned_in(address: &str) -> bool {
    AdapterTable::builtin().is_burned_in(address)
}

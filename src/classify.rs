/// Lookup of identifying strings against the reference tables.
///
/// Every lookup succeeds: anything unrecognized, including an empty string,
/// classifies as the table's `UNKNOWN` entry.
use crate::defaults::{
    AdapterSignature, DriverSignature, VendorSignature, PRINT_DRIVERS, USB_VENDORS,
};
use crate::mac::AdapterTable;

/// Classify a printer by its reported driver name.
///
/// The first table entry whose name equals the driver or appears anywhere in
/// it (both case-insensitive) wins.
pub fn find_driver(reported: &str) -> &'static DriverSignature {
    let reported_upper = reported.to_uppercase();

    let found = PRINT_DRIVERS[1..].iter().find(|driver| {
        let name_upper = driver.name.to_uppercase();
        name_upper == reported_upper || reported_upper.contains(&name_upper)
    });

    match found {
        Some(driver) => {
            if crate::debug_enabled() {
                log::debug!("driver {reported:?} matched signature {:?}", driver.name);
            }
            driver
        }
        None => {
            if crate::debug_enabled() {
                log::debug!("driver {reported:?} matched no signature");
            }
            &PRINT_DRIVERS[0]
        }
    }
}

/// Classify a USB device by vendor id and, when known, product id.
pub fn find_vendor(vendor: &str, product: Option<&str>) -> &'static VendorSignature {
    let found = USB_VENDORS[1..].iter().find(|sig| {
        same_id(sig.vendor, vendor) && product.map_or(true, |p| same_id(sig.product, p))
    });

    match found {
        Some(sig) => {
            if crate::debug_enabled() {
                log::debug!("usb {vendor}:{product:?} matched signature {:?}", sig.name);
            }
            sig
        }
        None => {
            if crate::debug_enabled() {
                log::debug!("usb {vendor}:{product:?} matched no signature");
            }
            &USB_VENDORS[0]
        }
    }
}

/// Classify a network adapter by MAC prefix against the built-in table.
pub fn find_adapter(address: &str) -> &'static AdapterSignature {
    AdapterTable::builtin().find(address)
}

/// Compare two USB id strings numerically, so `"0x0EB8"`, `"0eb8"` and
/// `"EB8"` are equal. Non-hex ids fall back to a case-insensitive compare.
pub(crate) fn same_id(a: &str, b: &str) -> bool {
    match (parse_id(a), parse_id(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}

fn parse_id(id: &str) -> Option<u32> {
    let id = id.trim();
    let hex = id
        .strip_prefix("0x")
        .or_else(|| id.strip_prefix("0X"))
        .unwrap_or(id);
    u32::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{DeviceType, Os};

    // ── find_driver ─────────────────────────────────────────────────

    #[test]
    fn exact_match_any_case() {
        let driver = find_driver("pdfwriter.ppd");
        assert_eq!(driver.name, "PDFwriter.PPD");
        assert!(driver.os.contains(Os::Mac));
        assert!(!driver.physical);
    }

    #[test]
    fn substring_match() {
        let driver = find_driver("ZDesigner GK420d (EPL)");
        assert_eq!(driver.name, "ZDesigner");
        assert_eq!(driver.device_type, DeviceType::Both);
    }

    #[test]
    fn table_order_is_precedence() {
        // Both TEXTONLY.PPD entries match; the Mac one is listed first.
        assert!(find_driver("/etc/cups/ppd/TEXTONLY.PPD").os.contains(Os::Mac));
    }

    #[test]
    fn unrecognized_driver_is_unknown() {
        assert_eq!(find_driver("totally-unrecognized-string-xyz").name, "UNKNOWN");
        assert_eq!(find_driver("").name, "UNKNOWN");
    }

    #[test]
    fn unknown_never_matches_by_name() {
        assert!(std::ptr::eq(find_driver("UNKNOWN"), &PRINT_DRIVERS[0]));
    }

    // ── find_vendor ─────────────────────────────────────────────────

    #[test]
    fn vendor_ids_compare_numerically() {
        assert_eq!(find_vendor("0x0922", None).name, "Dymo");
        assert_eq!(find_vendor("0922", Some("8009")).name, "Dymo");
        assert_eq!(find_vendor("0X0eb8", Some("0xf000")).name, "Mettler Toledo");
    }

    #[test]
    fn product_mismatch_is_unknown() {
        assert_eq!(find_vendor("0x0922", Some("0x0001")).name, "UNKNOWN");
        assert_eq!(find_vendor("", None).name, "UNKNOWN");
    }

    #[test]
    fn same_id_falls_back_to_text() {
        assert!(same_id("0x00", "0"));
        assert!(same_id("scale", "SCALE"));
        assert!(!same_id("0x81", "0x82"));
    }

    #[test]
    fn fallbacks_are_traced_without_changing_results() {
        crate::set_debug(true);
        assert_eq!(find_vendor("0x046D", Some("0xC52B")).name, "UNKNOWN");
        assert_eq!(find_adapter("4A:CC:E5:52:AB:ED").name, "UNKNOWN");
        assert_eq!(find_driver("no such driver").name, "UNKNOWN");
        crate::set_debug(false);
    }

    // ── find_adapter ────────────────────────────────────────────────

    #[test]
    fn adapter_lookup_uses_builtin_table() {
        assert_eq!(find_adapter("52:54:00:12:34:56").name, "QEMU");
        assert_eq!(find_adapter("nonsense").name, "UNKNOWN");
    }
}

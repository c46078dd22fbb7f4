/// Reference tables for hardware classification.
///
/// Print driver names are matched as case-insensitive substrings, so table
/// order is precedence: label-format specific entries sit above the generic
/// ones they would otherwise be shadowed by. Index 0 of every table is the
/// `UNKNOWN` fallback and is never matched directly.
use crate::flags::DeviceType::{self, Both, Pixel, Raw};
use crate::flags::{Os, OsSet};

/// A known print driver and what it tells us about the printer behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSignature {
    pub name: &'static str,
    pub os: OsSet,
    pub device_type: DeviceType,
    /// `false` for file/virtual printers (PDF writers and the like)
    pub physical: bool,
}

impl DriverSignature {
    const fn new(name: &'static str, os: OsSet, device_type: DeviceType, physical: bool) -> Self {
        Self {
            name,
            os,
            device_type,
            physical,
        }
    }
}

/// A known USB/HID device identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorSignature {
    pub name: &'static str,
    pub class: &'static str,
    pub vendor: &'static str,
    pub product: &'static str,
    pub device: &'static str,
    pub endpoint: &'static str,
}

/// A known network adapter MAC prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterSignature {
    pub name: &'static str,
    /// Normalized uppercase hex, no separators
    pub mac_prefix: &'static str,
    pub is_virtual_machine: bool,
    /// Addresses under this prefix are never burned-in, whatever their bits say
    pub is_non_burned_mask: bool,
}

const fn mac() -> OsSet {
    OsSet::of_os(Os::Mac)
}

const fn linux() -> OsSet {
    OsSet::of_os(Os::Linux)
}

const fn windows() -> OsSet {
    OsSet::of_os(Os::Windows)
}

/// Known print drivers.
pub static PRINT_DRIVERS: &[DriverSignature] = &[
    DriverSignature::new("UNKNOWN", OsSet::empty(), Pixel, true),
    // === Mac file printers ===
    DriverSignature::new("PDFwriter.PPD", mac(), Pixel, false),
    DriverSignature::new("vipriser.PPD", mac(), Pixel, false),
    DriverSignature::new("PSCOLOR.PPD", mac(), Pixel, false),
    // === Linux file printers ===
    DriverSignature::new("CUPS-PDF.PPD", linux(), Pixel, false),
    // === Linux label printers ===
    DriverSignature::new("Zebra-EPL1-Label.ppd", linux(), Both, true),
    DriverSignature::new("Zebra-EPL2-Label.ppd", linux(), Both, true),
    DriverSignature::new("Zebra-ZPL-Label.ppd", linux(), Both, true),
    // === Windows file printers ===
    DriverSignature::new("Microsoft XPS Document Writer", windows(), Pixel, false),
    DriverSignature::new("Microsoft Print To PDF", windows(), Pixel, false),
    DriverSignature::new("Send to Microsoft OneNote", windows(), Pixel, false),
    DriverSignature::new("PDFCreator", windows(), Pixel, false),
    DriverSignature::new("PrimoPDF", windows(), Pixel, false),
    DriverSignature::new("CutePDFWriter", windows(), Pixel, false),
    DriverSignature::new("Bullzip PDF", windows(), Pixel, false),
    DriverSignature::new("Adobe PDF", windows(), Pixel, false),
    DriverSignature::new("doPDF", windows(), Pixel, false),
    DriverSignature::new("novaPDF", windows(), Pixel, false),
    DriverSignature::new("OPTIsend", windows(), Pixel, false),
    DriverSignature::new("pdf995", windows(), Pixel, false),
    DriverSignature::new("docPrint PDF", windows(), Pixel, false),
    DriverSignature::new("EmfPrinter", windows(), Pixel, false),
    DriverSignature::new("ColorPlus", windows(), Pixel, false),
    DriverSignature::new("ImageRight", windows(), Pixel, false),
    // === Windows raw-only printers ===
    DriverSignature::new("Generic / Text Only", windows(), Raw, true),
    // === Windows dual-mode printers ===
    DriverSignature::new("ZDesigner", windows(), Both, true),
    DriverSignature::new("EPSON TM", windows(), Both, true),
    // === Mac raw-only printers ===
    DriverSignature::new("TEXTONLY.PPD", mac(), Raw, true),
    // === Mac dual-mode printers ===
    DriverSignature::new("TM-T88V.PPD", mac(), Both, true),
    // === Linux raw-only printers ===
    // Unreachable by name lookup: the Mac entry above wins.
    DriverSignature::new("TEXTONLY.PPD", linux(), Raw, true),
    // === Linux dual-mode printers ===
    DriverSignature::new("EPTMBATH.PPD", linux(), Both, true),
];

/// Known USB/HID devices.
pub static USB_VENDORS: &[VendorSignature] = &[
    VendorSignature {
        name: "UNKNOWN",
        class: "",
        vendor: "",
        product: "",
        device: "",
        endpoint: "",
    },
    // === USB/HID scales ===
    VendorSignature {
        name: "Mettler Toledo",
        class: "scale",
        vendor: "0x0EB8",
        product: "0xF000",
        device: "0x00",
        endpoint: "0x81",
    },
    VendorSignature {
        name: "Dymo",
        class: "scale",
        vendor: "0x0922",
        product: "0x8009",
        device: "0x00",
        endpoint: "0x82",
    },
    VendorSignature {
        name: "Stamps.com",
        class: "scale",
        vendor: "0x1446",
        product: "0x6A73",
        device: "0x00",
        endpoint: "0x81",
    },
];

/// Fallback for addresses no prefix matches: not virtual, not a mask.
pub const UNKNOWN_ADAPTER: AdapterSignature = AdapterSignature {
    name: "UNKNOWN",
    mac_prefix: "",
    is_virtual_machine: false,
    is_non_burned_mask: false,
};

/// Known network adapter prefixes.
pub static ADAPTER_SIGNATURES: &[AdapterSignature] = &[
    UNKNOWN_ADAPTER,
    // === VMware ===
    AdapterSignature {
        name: "VMware",
        mac_prefix: "005056",
        is_virtual_machine: true,
        is_non_burned_mask: true,
    },
    AdapterSignature {
        name: "VMware",
        mac_prefix: "000C29",
        is_virtual_machine: true,
        is_non_burned_mask: true,
    },
    AdapterSignature {
        name: "VMware",
        mac_prefix: "000569",
        is_virtual_machine: true,
        is_non_burned_mask: true,
    },
    AdapterSignature {
        name: "VMware",
        mac_prefix: "001C14",
        is_virtual_machine: true,
        is_non_burned_mask: true,
    },
    // === VirtualBox ===
    AdapterSignature {
        name: "VirtualBox",
        mac_prefix: "080027",
        is_virtual_machine: true,
        is_non_burned_mask: true,
    },
    AdapterSignature {
        name: "VirtualBox",
        mac_prefix: "0A0027",
        is_virtual_machine: true,
        is_non_burned_mask: true,
    },
    // === Microsoft Hyper-V ===
    AdapterSignature {
        name: "Hyper-V",
        mac_prefix: "00155D",
        is_virtual_machine: true,
        is_non_burned_mask: true,
    },
    // === Parallels ===
    AdapterSignature {
        name: "Parallels",
        mac_prefix: "001C42",
        is_virtual_machine: true,
        is_non_burned_mask: true,
    },
    // === Xen ===
    AdapterSignature {
        name: "Xen",
        mac_prefix: "00163E",
        is_virtual_machine: true,
        is_non_burned_mask: true,
    },
    // === QEMU/KVM ===
    AdapterSignature {
        name: "QEMU",
        mac_prefix: "525400",
        is_virtual_machine: true,
        is_non_burned_mask: true,
    },
    // === VPN and tunnel adapters (host-side, not a guest) ===
    AdapterSignature {
        name: "Cisco AnyConnect",
        mac_prefix: "00059A3C7A",
        is_virtual_machine: false,
        is_non_burned_mask: true,
    },
    AdapterSignature {
        name: "Microsoft Teredo",
        mac_prefix: "00000000000000E0",
        is_virtual_machine: false,
        is_non_burned_mask: true,
    },
];

/// Keep/toss filter engine for hardware listings.
///
/// `toss` removes every record a filter matches; `keep` inverts the filter and
/// tosses, so the two always split a list between them on any single
/// enumerable or boolean key. The list's kind is sampled from its first
/// record only, and the result borrows the caller's records in their
/// original order.
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::{find_driver, find_vendor};
use crate::criteria::{Criteria, Criterion, FilterSpec, UsbField};
use crate::defaults::{AdapterSignature, DriverSignature, VendorSignature};
use crate::error::{Result, SiftError};
use crate::flags::{Os, OsSet};
use crate::mac::AdapterTable;

/// Which reference table a list is classified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListShape {
    Printer,
    Usb,
    Address,
}

impl ListShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListShape::Printer => "printer",
            ListShape::Usb => "usb",
            ListShape::Address => "address",
        }
    }
}

impl fmt::Display for ListShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caller-owned hardware record. Only the classification fields are read.
pub trait HardwareRecord {
    /// Printer driver name
    fn driver(&self) -> Option<&str> {
        None
    }

    /// USB vendor id
    fn vendor(&self) -> Option<&str> {
        None
    }

    /// USB product id
    fn product(&self) -> Option<&str> {
        None
    }

    /// Network adapter hardware address
    fn mac(&self) -> Option<&str> {
        None
    }

    /// Whether this is the host's primary adapter
    fn primary(&self) -> Option<bool> {
        None
    }

    /// The record's kind, judged by which identifying field is present.
    fn shape(&self) -> Option<ListShape> {
        if self.driver().is_some() {
            Some(ListShape::Printer)
        } else if self.vendor().is_some() {
            Some(ListShape::Usb)
        } else if self.mac().is_some() {
            Some(ListShape::Address)
        } else {
            None
        }
    }
}

impl<T: HardwareRecord + ?Sized> HardwareRecord for &T {
    fn driver(&self) -> Option<&str> {
        (**self).driver()
    }

    fn vendor(&self) -> Option<&str> {
        (**self).vendor()
    }

    fn product(&self) -> Option<&str> {
        (**self).product()
    }

    fn mac(&self) -> Option<&str> {
        (**self).mac()
    }

    fn primary(&self) -> Option<bool> {
        (**self).primary()
    }
}

/// A general-purpose hardware record, as produced by listing collaborators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

impl Record {
    pub fn printer(driver: impl Into<String>) -> Self {
        Self {
            driver: Some(driver.into()),
            ..Self::default()
        }
    }

    pub fn usb(vendor: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            vendor: Some(vendor.into()),
            product: Some(product.into()),
            ..Self::default()
        }
    }

    pub fn adapter(mac: impl Into<String>) -> Self {
        Self {
            mac: Some(mac.into()),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }
}

impl HardwareRecord for Record {
    fn driver(&self) -> Option<&str> {
        self.driver.as_deref()
    }

    fn vendor(&self) -> Option<&str> {
        self.vendor.as_deref()
    }

    fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }

    fn mac(&self) -> Option<&str> {
        self.mac.as_deref()
    }

    fn primary(&self) -> Option<bool> {
        self.primary
    }
}

/// Runtime filter configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Platform descriptor for boolean `os` filters, e.g. a user-agent
    /// `appVersion`. Without one, boolean `os` filters are skipped.
    pub platform: Option<String>,
}

impl FilterConfig {
    pub const fn new() -> Self {
        Self { platform: None }
    }

    pub fn with_platform(descriptor: impl Into<String>) -> Self {
        Self {
            platform: Some(descriptor.into()),
        }
    }

    /// Configuration describing the platform this crate was compiled for.
    pub fn from_host() -> Self {
        let descriptor = if cfg!(target_os = "macos") {
            Some("Mac")
        } else if cfg!(target_os = "linux") {
            Some("Linux")
        } else if cfg!(target_os = "windows") {
            Some("Windows")
        } else {
            None
        };
        Self {
            platform: descriptor.map(str::to_string),
        }
    }

    fn detected_os(&self) -> Option<Os> {
        self.platform.as_deref().map(Os::detect)
    }
}

/// Remove every record `spec` matches, using the default configuration.
pub fn toss<'a, R: HardwareRecord>(list: &'a [R], spec: &FilterSpec) -> Result<Vec<&'a R>> {
    toss_with(list, spec, &FilterConfig::new())
}

/// Keep only the records `spec` matches, using the default configuration.
pub fn keep<'a, R: HardwareRecord>(list: &'a [R], spec: &FilterSpec) -> Result<Vec<&'a R>> {
    keep_with(list, spec, &FilterConfig::new())
}

/// Remove every record `spec` matches.
pub fn toss_with<'a, R: HardwareRecord>(
    list: &'a [R],
    spec: &FilterSpec,
    config: &FilterConfig,
) -> Result<Vec<&'a R>> {
    let Some(shape) = list_shape(list)? else {
        return Ok(Vec::new());
    };
    apply(list, shape, Criteria::parse(spec)?, config)
}

/// Keep only the records `spec` matches: toss with every criterion inverted.
pub fn keep_with<'a, R: HardwareRecord>(
    list: &'a [R],
    spec: &FilterSpec,
    config: &FilterConfig,
) -> Result<Vec<&'a R>> {
    let Some(shape) = list_shape(list)? else {
        return Ok(Vec::new());
    };
    apply(list, shape, Criteria::parse(spec)?.inverted(), config)
}

/// Shape of the first record; `None` for an empty list.
fn list_shape<R: HardwareRecord>(list: &[R]) -> Result<Option<ListShape>> {
    match list.first() {
        None => Ok(None),
        Some(first) => first.shape().map(Some).ok_or(SiftError::UnclassifiableList),
    }
}

/// A record's table lookup, done once per record.
enum Classified {
    Printer(&'static DriverSignature),
    Usb(&'static VendorSignature),
    Address {
        adapter: &'static AdapterSignature,
        burned_in: bool,
    },
}

impl Classified {
    fn of<R: HardwareRecord>(record: &R, shape: ListShape) -> Self {
        match shape {
            ListShape::Printer => Classified::Printer(find_driver(record.driver().unwrap_or(""))),
            ListShape::Usb => {
                Classified::Usb(find_vendor(record.vendor().unwrap_or(""), record.product()))
            }
            ListShape::Address => {
                let table = AdapterTable::builtin();
                let mac = record.mac().unwrap_or("");
                Classified::Address {
                    adapter: table.find(mac),
                    burned_in: table.is_burned_in(mac),
                }
            }
        }
    }
}

fn apply<'a, R: HardwareRecord>(
    list: &'a [R],
    shape: ListShape,
    criteria: Criteria,
    config: &FilterConfig,
) -> Result<Vec<&'a R>> {
    let mut active = Vec::new();
    for criterion in criteria.into_vec() {
        if !criterion.shapes().contains(&shape) {
            return Err(SiftError::UnsupportedFeature {
                key: criterion.key().to_string(),
                shape,
            });
        }

        match criterion {
            Criterion::CurrentOs(matching) => match config.detected_os() {
                Some(os) => {
                    let set = OsSet::of(os);
                    active.push(Criterion::Os(if matching { set } else { set.complement() }));
                }
                None => log::warn!("Cannot determine os; os filtering disabled"),
            },
            other => active.push(other),
        }
    }

    let mut kept: Vec<&'a R> = list.iter().collect();
    kept.retain(|record| {
        let classified = Classified::of(*record, shape);
        match active.iter().find(|c| matches(c, *record, &classified)) {
            Some(criterion) => {
                if crate::debug_enabled() {
                    log::debug!("tossing {shape} record by `{}`", criterion.key());
                }
                false
            }
            None => true,
        }
    });
    Ok(kept)
}

/// Whether `criterion` selects `record` for removal.
fn matches<R: HardwareRecord>(criterion: &Criterion, record: &R, classified: &Classified) -> bool {
    match (criterion, classified) {
        (Criterion::Type(set), Classified::Printer(driver)) => set.contains(driver.device_type),
        (Criterion::Physical(physical), Classified::Printer(driver)) => {
            driver.physical == *physical
        }
        (Criterion::Os(set), Classified::Printer(driver)) => set.intersects(driver.os),
        (Criterion::Name(pattern), Classified::Printer(_)) => {
            pattern.is_match(record.driver().unwrap_or(""))
        }
        (Criterion::Name(pattern), Classified::Usb(sig)) => pattern.is_match(sig.name),
        // Ids come from the record itself so devices missing from the table
        // still filter; the rest only exist on the signature
        (Criterion::Usb(field, m), Classified::Usb(sig)) => m.is_match(match field {
            UsbField::Vendor => record.vendor().unwrap_or(""),
            UsbField::Product => record.product().unwrap_or(""),
            UsbField::Class => sig.class,
            UsbField::Device => sig.device,
            UsbField::Endpoint => sig.endpoint,
        }),
        (Criterion::BurnedIn(b), Classified::Address { burned_in, .. }) => burned_in == b,
        (Criterion::VmGuest(b), Classified::Address { adapter, .. }) => {
            adapter.is_virtual_machine == *b
        }
        (Criterion::Primary(b), Classified::Address { .. }) => {
            record.primary().unwrap_or(false) == *b
        }
        // CurrentOs is resolved in `apply`; shape mismatches are rejected there.
        // Literal never matches.
        _ => false,
    }
}

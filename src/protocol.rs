/// NDJSON wire format for hardware listings and scale readings.
///
/// Listing collaborators stream one record per line. Lines are parsed into a
/// bounded `heapless` wire struct with `serde_json_core` so an oversized or
/// malformed line is rejected without allocating, then converted to a
/// [`Record`].
use heapless::String;
use serde::{Deserialize, Serialize};

use crate::filter::Record;
use crate::scale::ScaleReading;

/// Maximum length for device and adapter names
pub type NameString = String<64>;

/// Maximum length for printer driver strings, which may be PPD paths
pub type DriverString = String<128>;

/// Maximum length for USB id strings ("0x0EB8")
pub type IdString = String<16>;

/// Maximum length for MAC address strings, separators included
pub type MacString = String<32>;

/// Maximum size of a serialized message
pub const MAX_MSG_LEN: usize = 512;

/// Wire format for listing records. Every field is optional; which ones are
/// present decides the record's kind.
#[derive(Deserialize)]
pub(crate) struct RawRecord {
    #[serde(default)]
    pub name: Option<NameString>,
    #[serde(default)]
    pub driver: Option<DriverString>,
    #[serde(default)]
    pub vendor: Option<IdString>,
    #[serde(default)]
    pub product: Option<IdString>,
    #[serde(default)]
    pub mac: Option<MacString>,
    #[serde(default)]
    pub primary: Option<bool>,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Record {
            name: raw.name.map(|s| s.as_str().into()),
            driver: raw.driver.map(|s| s.as_str().into()),
            vendor: raw.vendor.map(|s| s.as_str().into()),
            product: raw.product.map(|s| s.as_str().into()),
            mac: raw.mac.map(|s| s.as_str().into()),
            primary: raw.primary,
        }
    }
}

/// Parse one listing line. Blank or malformed lines yield `None`.
pub fn parse_record(line: &[u8]) -> Option<Record> {
    let trimmed = trim_whitespace(line);
    if trimmed.is_empty() {
        return None;
    }
    match serde_json_core::from_slice::<RawRecord>(trimmed) {
        Ok((raw, _)) => Some(raw.into()),
        Err(e) => {
            if crate::debug_enabled() {
                log::debug!("dropping listing line: {e:?}");
            }
            None
        }
    }
}

/// Serialize a scale reading as one NDJSON line.
/// Returns the number of bytes written, or None if the buffer is too small.
pub fn serialize_reading(reading: &ScaleReading, buf: &mut [u8]) -> Option<usize> {
    write_line(reading, buf)
}

/// Serialize a record as one NDJSON line, e.g. to pass a filtered listing on.
pub fn serialize_record(record: &Record, buf: &mut [u8]) -> Option<usize> {
    write_line(record, buf)
}

fn write_line<T: Serialize>(value: &T, buf: &mut [u8]) -> Option<usize> {
    let len = serde_json_core::to_slice(value, buf).ok()?;
    // Room for the newline is required; a line without one is not NDJSON
    let newline = buf.get_mut(len)?;
    *newline = b'\n';
    Some(len + 1)
}

fn trim_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    let end = data
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &data[start..end]
}

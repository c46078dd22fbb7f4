//! Sift library: hardware listing classification and filtering.
//!
//! Callers hand in a listing of locally attached hardware (printers, USB/HID
//! devices or network adapters) obtained however their platform allows, and
//! get back the subset a declarative filter asks for. Records are classified
//! against the compiled-in reference tables in [`defaults`].
//!
//! The library is organized in layers, leaves first:
//! - `defaults`: reference tables for drivers, USB vendors and adapters
//! - `flags`: OS and device type attributes and the sets filters use
//! - `classify`: table lookup by driver name, USB id or MAC prefix
//! - `mac`: MAC normalization and the burned-in heuristic
//! - `criteria`, `filter`: filter specs, `toss` and `keep`
//! - `scale`: HID scale frame decoding, independent of the rest
//! - `protocol`: NDJSON wire format for records and readings
//!
//! Everything is synchronous and stateless per call. The only process-wide
//! state is the [`set_debug`] trace toggle.

use core::sync::atomic::{AtomicBool, Ordering};

pub mod classify;
pub mod criteria;
pub mod defaults;
pub mod error;
pub mod filter;
pub mod flags;
pub mod mac;
pub mod protocol;
pub mod scale;

pub use criteria::{keys, FilterSpec, FilterValue};
pub use error::{Result, SiftError};
pub use filter::{keep, keep_with, toss, toss_with, FilterConfig, HardwareRecord, ListShape, Record};
pub use flags::{DeviceType, Os, OsSet, TypeSet};
pub use mac::{is_burned_in, plain_mac, pretty_print_mac};
pub use scale::{decode_scale, decode_scale_bytes, ScaleReading};

static DEBUG: AtomicBool = AtomicBool::new(false);

/// Turn classification and filtering traces on or off.
///
/// Traces go to the `log` facade at debug level and never change results.
pub fn set_debug(active: bool) {
    DEBUG.store(active, Ordering::Relaxed);
}

/// Whether [`set_debug`] traces are enabled.
pub fn debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

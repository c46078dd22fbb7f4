/// Decoder for USB/HID digital scale reports.
///
/// Report layout, one byte per element:
///   [0]     report id (ignored)
///   [1]     status
///   [2]     units
///   [3]     precision, a signed power-of-ten exponent
///   [4..]   weight, little-endian
///
/// Short frames and the all-zero idle frame decode to an invalid reading
/// rather than an error; scales emit them routinely.
use core::fmt;

use serde::Serialize;

/// Scale status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ScaleStatus {
    #[default]
    Unknown,
    Fault,
    #[serde(rename = "Stable (Zero)")]
    StableZero,
    Busy,
    Stable,
    Underweight,
    Overweight,
    Calibrate,
    Tare,
}

impl ScaleStatus {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => ScaleStatus::Fault,
            2 => ScaleStatus::StableZero,
            3 => ScaleStatus::Busy,
            4 => ScaleStatus::Stable,
            5 => ScaleStatus::Underweight,
            6 => ScaleStatus::Overweight,
            7 => ScaleStatus::Calibrate,
            8 => ScaleStatus::Tare,
            _ => ScaleStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleStatus::Unknown => "Unknown",
            ScaleStatus::Fault => "Fault",
            ScaleStatus::StableZero => "Stable (Zero)",
            ScaleStatus::Busy => "Busy",
            ScaleStatus::Stable => "Stable",
            ScaleStatus::Underweight => "Underweight",
            ScaleStatus::Overweight => "Overweight",
            ScaleStatus::Calibrate => "Calibrate",
            ScaleStatus::Tare => "Tare",
        }
    }
}

impl fmt::Display for ScaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weight unit byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScaleUnit {
    #[serde(rename = "g")]
    Grams,
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "oz")]
    Ounces,
    #[serde(rename = "lbs")]
    Pounds,
}

impl ScaleUnit {
    /// Pounds for 12 and for anything unrecognized.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            2 => ScaleUnit::Grams,
            3 => ScaleUnit::Kilograms,
            11 => ScaleUnit::Ounces,
            _ => ScaleUnit::Pounds,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleUnit::Grams => "g",
            ScaleUnit::Kilograms => "kg",
            ScaleUnit::Ounces => "oz",
            ScaleUnit::Pounds => "lbs",
        }
    }
}

impl fmt::Display for ScaleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded value next to the raw value it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field<R, V> {
    pub raw: R,
    pub value: V,
}

/// One decoded scale frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleReading {
    pub status: Field<u8, ScaleStatus>,
    pub precision: Field<u8, i32>,
    /// `None` only on invalid frames
    pub units: Field<u8, Option<ScaleUnit>>,
    /// Weight as a fixed-point decimal string with `-precision` decimals
    pub weight: Field<u64, String>,
    pub valid: bool,
}

impl ScaleReading {
    /// The all-zero reading returned for idle or malformed frames.
    pub fn invalid() -> Self {
        Self {
            status: Field {
                raw: 0,
                value: ScaleStatus::Unknown,
            },
            precision: Field { raw: 0, value: 0 },
            units: Field {
                raw: 0,
                value: None,
            },
            weight: Field {
                raw: 0,
                value: "0".to_string(),
            },
            valid: false,
        }
    }
}

impl Default for ScaleReading {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Display for ScaleReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.weight.value)?;
        if let Some(units) = self.units.value {
            write!(f, "{units}")?;
        }
        write!(f, " - {}", self.status.value)
    }
}

/// Decode a frame given as hex byte strings, e.g. `["02", "04", "02", "FE", "64", "00"]`.
pub fn decode_scale<S: AsRef<str>>(data: &[S]) -> ScaleReading {
    if data.len() < 4 || is_idle_frame(data) {
        return ScaleReading::invalid();
    }

    match decode_frame(data) {
        Some(reading) => {
            if crate::debug_enabled() {
                log::debug!("scale frame decoded as {reading}");
            }
            reading
        }
        None => {
            if crate::debug_enabled() {
                log::debug!("scale frame has non-hex or oversized bytes");
            }
            ScaleReading::invalid()
        }
    }
}

/// Decode a frame given as raw report bytes.
pub fn decode_scale_bytes(data: &[u8]) -> ScaleReading {
    let hex: Vec<String> = data.iter().map(|b| format!("{b:02X}")).collect();
    decode_scale(&hex)
}

/// Bytes 2 through 7 all `"00"`.
fn is_idle_frame<S: AsRef<str>>(data: &[S]) -> bool {
    data.get(2..8)
        .is_some_and(|bytes| bytes.iter().all(|b| b.as_ref() == "00"))
}

fn decode_frame<S: AsRef<str>>(data: &[S]) -> Option<ScaleReading> {
    let byte = |i: usize| u8::from_str_radix(data[i].as_ref().trim(), 16).ok();

    let status = byte(1)?;
    let units = byte(2)?;
    let precision = byte(3)?;
    let exponent = signed_precision(precision);

    // Little-endian: the last byte is the most significant
    let tail: String = data[4..].iter().rev().map(|b| b.as_ref().trim()).collect();
    let weight = if tail.is_empty() {
        0
    } else {
        u64::from_str_radix(&tail, 16).ok()?
    };

    Some(ScaleReading {
        status: Field {
            raw: status,
            value: ScaleStatus::from_raw(status),
        },
        precision: Field {
            raw: precision,
            value: exponent,
        },
        units: Field {
            raw: units,
            value: Some(ScaleUnit::from_raw(units)),
        },
        weight: Field {
            raw: weight,
            value: fixed_point(weight, exponent),
        },
        valid: true,
    })
}

/// Reinterpret the precision byte as a negative exponent. Zero stays zero.
fn signed_precision(raw: u8) -> i32 {
    let value = i32::from(raw) ^ -256;
    if value == -256 {
        0
    } else {
        value
    }
}

/// `raw * 10^exponent` as a decimal string with `|exponent|` decimals.
fn fixed_point(raw: u64, exponent: i32) -> String {
    let digits = raw.to_string();
    if exponent >= 0 {
        if raw == 0 {
            return digits;
        }
        return digits + &"0".repeat(exponent as usize);
    }

    let decimals = exponent.unsigned_abs() as usize;
    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    format!("{whole}.{fraction}")
}

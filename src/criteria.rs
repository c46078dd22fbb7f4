/// Filter specifications and their parsed, invertible form.
///
/// A [`FilterSpec`] is what callers write: keys mapped to loosely typed values.
/// Before any filtering it is parsed into [`Criteria`]. Constant names resolve
/// to flag bits in either namespace; a value outside its key's domain becomes
/// a criterion that matches nothing. The caller's spec is never modified, so
/// one spec can be reused freely.
use regex::Regex;

use crate::classify::same_id;
use crate::error::{Result, SiftError};
use crate::filter::ListShape;
use crate::flags::{resolve_constant, Constant, DeviceType, Os, OsSet, TypeSet};

/// Recognized filter keys.
pub mod keys {
    // Printer lists
    pub const TYPE: &str = "type";
    pub const PHYSICAL: &str = "physical";
    pub const OS: &str = "os";
    /// Printer driver or USB device name, as a regular expression
    pub const NAME: &str = "name";

    // Address lists
    pub const BURNED_IN: &str = "burnedIn";
    pub const VM_GUEST: &str = "vmGuest";
    pub const PRIMARY: &str = "primary";

    // USB lists
    pub const CLASS: &str = "class";
    pub const VENDOR: &str = "vendor";
    pub const PRODUCT: &str = "product";
    pub const DEVICE: &str = "device";
    pub const ENDPOINT: &str = "endpoint";
}

/// A filter value as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Bool(bool),
    /// A constant name (`"RAW"`, `"mac"`) or a literal pattern
    Text(String),
    /// A raw flag integer; bits outside the attribute's variants are ignored
    Flags(i32),
    Os(OsSet),
    Type(TypeSet),
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Flags(value)
    }
}

impl From<Os> for FilterValue {
    fn from(value: Os) -> Self {
        FilterValue::Os(value.into())
    }
}

impl From<OsSet> for FilterValue {
    fn from(value: OsSet) -> Self {
        FilterValue::Os(value)
    }
}

impl From<DeviceType> for FilterValue {
    fn from(value: DeviceType) -> Self {
        FilterValue::Type(value.into())
    }
}

impl From<TypeSet> for FilterValue {
    fn from(value: TypeSet) -> Self {
        FilterValue::Type(value)
    }
}

/// Keys mapped to values, in insertion order. A key appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    entries: Vec<(String, FilterValue)>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSpec::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key`, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut spec = FilterSpec::new();
        for (key, value) in iter {
            spec.insert(key, value);
        }
        spec
    }
}

/// A compiled `name` pattern, possibly negated.
#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    regex: Regex,
    negated: bool,
}

impl Pattern {
    fn compile(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| SiftError::PatternCompilation {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            negated: false,
        })
    }

    pub(crate) fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text) != self.negated
    }
}

/// An exact USB id or class comparison, possibly negated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldMatch {
    value: String,
    negated: bool,
}

impl FieldMatch {
    pub(crate) fn is_match(&self, field: &str) -> bool {
        same_id(field, &self.value) != self.negated
    }
}

/// Vendor signature fields a USB filter can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UsbField {
    Class,
    Vendor,
    Product,
    Device,
    Endpoint,
}

impl UsbField {
    fn key(self) -> &'static str {
        match self {
            UsbField::Class => keys::CLASS,
            UsbField::Vendor => keys::VENDOR,
            UsbField::Product => keys::PRODUCT,
            UsbField::Device => keys::DEVICE,
            UsbField::Endpoint => keys::ENDPOINT,
        }
    }
}

/// One parsed filter entry. Matching a record means "toss it".
#[derive(Debug, Clone)]
pub(crate) enum Criterion {
    Type(TypeSet),
    Physical(bool),
    Os(OsSet),
    /// Match the running platform (`true`) or every other one (`false`).
    /// Replaced by [`Criterion::Os`] once the platform is known.
    CurrentOs(bool),
    Name(Pattern),
    BurnedIn(bool),
    VmGuest(bool),
    Primary(bool),
    Usb(UsbField, FieldMatch),
    /// A value outside its key's domain, such as `physical: "nope"`.
    /// Matches nothing, before or after inversion.
    Literal(&'static str),
}

impl Criterion {
    fn parse(key: &str, value: &FilterValue) -> Option<Result<Self>> {
        let criterion = match key {
            keys::TYPE => match flag_bits(value) {
                Some(bits) => Criterion::Type(TypeSet::from_bits(bits)),
                None => literal(keys::TYPE, value),
            },
            keys::OS => match value {
                FilterValue::Bool(current) => Criterion::CurrentOs(*current),
                _ => match flag_bits(value) {
                    Some(bits) => Criterion::Os(OsSet::from_bits(bits)),
                    None => literal(keys::OS, value),
                },
            },
            keys::PHYSICAL => boolean(keys::PHYSICAL, value, Criterion::Physical),
            keys::BURNED_IN => boolean(keys::BURNED_IN, value, Criterion::BurnedIn),
            keys::VM_GUEST => boolean(keys::VM_GUEST, value, Criterion::VmGuest),
            keys::PRIMARY => boolean(keys::PRIMARY, value, Criterion::Primary),
            keys::NAME => match value {
                FilterValue::Text(pattern) => {
                    return Some(Pattern::compile(pattern).map(Criterion::Name))
                }
                _ => literal(keys::NAME, value),
            },
            keys::CLASS => usb(UsbField::Class, value),
            keys::VENDOR => usb(UsbField::Vendor, value),
            keys::PRODUCT => usb(UsbField::Product, value),
            keys::DEVICE => usb(UsbField::Device, value),
            keys::ENDPOINT => usb(UsbField::Endpoint, value),
            _ => {
                if crate::debug_enabled() {
                    log::debug!("ignoring unknown filter key {key:?}");
                }
                return None;
            }
        };
        Some(Ok(criterion))
    }

    /// The criterion that tosses exactly what this one would keep.
    fn inverted(self) -> Self {
        match self {
            Criterion::Type(set) => Criterion::Type(set.complement()),
            Criterion::Physical(b) => Criterion::Physical(!b),
            Criterion::Os(set) => Criterion::Os(set.complement()),
            Criterion::CurrentOs(b) => Criterion::CurrentOs(!b),
            Criterion::Name(pattern) => Criterion::Name(Pattern {
                negated: !pattern.negated,
                ..pattern
            }),
            Criterion::BurnedIn(b) => Criterion::BurnedIn(!b),
            Criterion::VmGuest(b) => Criterion::VmGuest(!b),
            Criterion::Primary(b) => Criterion::Primary(!b),
            Criterion::Usb(field, m) => Criterion::Usb(
                field,
                FieldMatch {
                    negated: !m.negated,
                    ..m
                },
            ),
            Criterion::Literal(key) => Criterion::Literal(key),
        }
    }

    pub(crate) fn key(&self) -> &'static str {
        match self {
            Criterion::Type(_) => keys::TYPE,
            Criterion::Physical(_) => keys::PHYSICAL,
            Criterion::Os(_) | Criterion::CurrentOs(_) => keys::OS,
            Criterion::Name(_) => keys::NAME,
            Criterion::BurnedIn(_) => keys::BURNED_IN,
            Criterion::VmGuest(_) => keys::VM_GUEST,
            Criterion::Primary(_) => keys::PRIMARY,
            Criterion::Usb(field, _) => field.key(),
            Criterion::Literal(key) => *key,
        }
    }

    /// List shapes this criterion can be applied to.
    pub(crate) fn shapes(&self) -> &'static [ListShape] {
        match self.key() {
            keys::TYPE | keys::PHYSICAL | keys::OS => &[ListShape::Printer],
            keys::NAME => &[ListShape::Printer, ListShape::Usb],
            keys::BURNED_IN | keys::VM_GUEST | keys::PRIMARY => &[ListShape::Address],
            _ => &[ListShape::Usb],
        }
    }
}

/// Flag value of a filter entry, resolving constant names in either
/// namespace. `None` for literals and booleans.
fn flag_bits(value: &FilterValue) -> Option<i32> {
    match value {
        FilterValue::Flags(raw) => Some(*raw),
        FilterValue::Os(set) => Some(i32::from(set.bits())),
        FilterValue::Type(set) => Some(i32::from(set.bits())),
        FilterValue::Text(name) => resolve_constant(name).map(Constant::bits),
        FilterValue::Bool(_) => None,
    }
}

fn literal(key: &'static str, value: &FilterValue) -> Criterion {
    if crate::debug_enabled() {
        log::debug!("filter `{key}` value {value:?} matches nothing");
    }
    Criterion::Literal(key)
}

fn boolean(key: &'static str, value: &FilterValue, criterion: fn(bool) -> Criterion) -> Criterion {
    match value {
        FilterValue::Bool(b) => criterion(*b),
        _ => literal(key, value),
    }
}

fn usb(field: UsbField, value: &FilterValue) -> Criterion {
    let value = match value {
        FilterValue::Text(text) => text.clone(),
        FilterValue::Flags(id) => format!("{id:#x}"),
        _ => return literal(field.key(), value),
    };
    Criterion::Usb(
        field,
        FieldMatch {
            value,
            negated: false,
        },
    )
}

/// A parsed filter specification.
#[derive(Debug, Clone)]
pub(crate) struct Criteria {
    criteria: Vec<Criterion>,
}

impl Criteria {
    /// Parse every entry of `spec`. Unknown keys are skipped.
    pub(crate) fn parse(spec: &FilterSpec) -> Result<Self> {
        let mut criteria = Vec::with_capacity(spec.len());
        for (key, value) in spec.iter() {
            if let Some(criterion) = Criterion::parse(key, value) {
                criteria.push(criterion?);
            }
        }
        Ok(Self { criteria })
    }

    /// Invert every criterion, turning a keep filter into a toss filter.
    pub(crate) fn inverted(self) -> Self {
        Self {
            criteria: self.criteria.into_iter().map(Criterion::inverted).collect(),
        }
    }

    pub(crate) fn into_vec(self) -> Vec<Criterion> {
        self.criteria
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(key: &str, value: impl Into<FilterValue>) -> Result<Criterion> {
        let spec = FilterSpec::new().with(key, value);
        let mut criteria = Criteria::parse(&spec)?.into_vec();
        assert_eq!(criteria.len(), 1);
        Ok(criteria.remove(0))
    }

    // ── FilterSpec ──────────────────────────────────────────────────

    #[test]
    fn insert_replaces_existing_key() {
        let spec = FilterSpec::new().with("physical", true).with("physical", false);
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.get("physical"), Some(&FilterValue::Bool(false)));
    }

    #[test]
    fn collect_from_pairs() {
        let spec: FilterSpec = [("type", "raw"), ("os", "linux")].into_iter().collect();
        assert_eq!(spec.get("os"), Some(&FilterValue::Text("linux".into())));
        assert_eq!(spec.iter().next().map(|(k, _)| k), Some("type"));
    }

    #[test]
    fn parsing_leaves_spec_untouched() {
        let spec = FilterSpec::new().with("type", "raw").with("os", false);
        let before = spec.clone();
        let _ = Criteria::parse(&spec).unwrap().inverted();
        assert_eq!(spec, before);
    }

    // ── Constant resolution ─────────────────────────────────────────

    #[test]
    fn type_constants_resolve() {
        match parse_one("type", "Raw").unwrap() {
            Criterion::Type(set) => assert_eq!(set, TypeSet::of(DeviceType::Raw)),
            other => panic!("unexpected {other:?}"),
        }
        match parse_one("type", 4).unwrap() {
            Criterion::Type(set) => assert_eq!(set, TypeSet::of(DeviceType::Both)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn os_constants_resolve() {
        match parse_one("os", "windows").unwrap() {
            Criterion::Os(set) => assert_eq!(set, OsSet::of(Os::Windows)),
            other => panic!("unexpected {other:?}"),
        }
        match parse_one("os", Os::Mac).unwrap() {
            Criterion::Os(set) => assert_eq!(set, OsSet::of(Os::Mac)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn os_boolean_means_current_platform() {
        assert!(matches!(parse_one("os", true).unwrap(), Criterion::CurrentOs(true)));
    }

    #[test]
    fn constants_resolve_across_namespaces() {
        // LINUX is bit 2, which is RAW in the type namespace
        match parse_one("type", "linux").unwrap() {
            Criterion::Type(set) => assert_eq!(set, TypeSet::of(DeviceType::Raw)),
            other => panic!("unexpected {other:?}"),
        }
        match parse_one("os", DeviceType::Both).unwrap() {
            Criterion::Os(set) => assert_eq!(set, OsSet::of(Os::Windows)),
            other => panic!("unexpected {other:?}"),
        }
        match parse_one("type", "any").unwrap() {
            Criterion::Type(set) => assert_eq!(set, TypeSet::any()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn out_of_domain_values_match_nothing() {
        for (key, value) in [
            ("type", FilterValue::from("foo")),
            ("type", FilterValue::Bool(true)),
            ("os", FilterValue::from("beos")),
            ("physical", FilterValue::from("nope")),
            ("burnedIn", FilterValue::Flags(1)),
            ("name", FilterValue::Bool(false)),
            ("vendor", FilterValue::Bool(true)),
        ] {
            let criterion = parse_one(key, value).unwrap();
            assert!(matches!(criterion, Criterion::Literal(k) if k == key));
            assert_eq!(criterion.key(), key);
            assert!(matches!(criterion.inverted(), Criterion::Literal(k) if k == key));
        }
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let spec = FilterSpec::new().with("color", "blue").with("physical", true);
        assert_eq!(Criteria::parse(&spec).unwrap().into_vec().len(), 1);
    }

    // ── Patterns ────────────────────────────────────────────────────

    #[test]
    fn name_stays_literal_even_if_constant() {
        match parse_one("name", "RAW").unwrap() {
            Criterion::Name(p) => {
                assert!(p.is_match("RAW printer"));
                assert!(!p.is_match("raw printer"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_pattern_is_an_error() {
        assert!(matches!(
            parse_one("name", "PDF("),
            Err(SiftError::PatternCompilation { .. })
        ));
    }

    // ── Inversion ───────────────────────────────────────────────────

    #[test]
    fn inversion_complements_each_criterion() {
        let spec = FilterSpec::new()
            .with("type", "pixel")
            .with("physical", false)
            .with("os", true)
            .with("name", "PDF")
            .with("vendor", "0x0922");
        let inverted = Criteria::parse(&spec).unwrap().inverted().into_vec();

        match &inverted[0] {
            Criterion::Type(set) => {
                assert_eq!(*set, TypeSet::of(DeviceType::Raw) | DeviceType::Both)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(inverted[1], Criterion::Physical(true)));
        assert!(matches!(inverted[2], Criterion::CurrentOs(false)));
        match &inverted[3] {
            Criterion::Name(p) => {
                assert!(!p.is_match("Adobe PDF"));
                assert!(p.is_match("Generic / Text Only"));
            }
            other => panic!("unexpected {other:?}"),
        }
        match &inverted[4] {
            Criterion::Usb(UsbField::Vendor, m) => {
                assert!(!m.is_match("0922"));
                assert!(m.is_match("0x0EB8"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn double_inversion_is_identity() {
        let spec = FilterSpec::new().with("os", OsSet::of(Os::Linux) | Os::Mac);
        let twice = Criteria::parse(&spec).unwrap().inverted().inverted().into_vec();
        match &twice[0] {
            Criterion::Os(set) => assert_eq!(*set, OsSet::of(Os::Linux) | Os::Mac),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn keys_and_shapes() {
        let c = parse_one("vmGuest", true).unwrap();
        assert_eq!(c.key(), "vmGuest");
        assert_eq!(c.shapes(), &[ListShape::Address]);
        assert!(parse_one("name", "x").unwrap().shapes().contains(&ListShape::Usb));
    }
}

/// Classification attributes and the sets used to filter on them.
///
/// Each attribute is a closed enum whose variants own one bit. A filter value is
/// a [`FlagSet`] over those variants, so "toss anything in this set" and "keep
/// only this set" are the same test with the set complemented over the finite
/// variant list.
use core::fmt;
use core::marker::PhantomData;
use core::ops::{BitOr, Not};

/// Raw integer spelling of "any variant": the complement of `1 | 2 | 4`.
pub const ANY_BITS: i32 = !7;

/// A closed set of single-bit classification values.
pub trait Flag: Copy + Eq + fmt::Debug + 'static {
    /// Every variant, in bit order.
    const ALL: &'static [Self];

    /// The variant's bit. Bits are pairwise disjoint within one attribute.
    fn bit(self) -> u8;

    /// Constant name as accepted in filter specifications.
    fn name(self) -> &'static str;

    /// Case-insensitive constant lookup.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|flag| flag.name().eq_ignore_ascii_case(name))
    }
}

/// Operating system a print driver belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Mac = 1,
    Linux = 2,
    Windows = 4,
}

impl Flag for Os {
    const ALL: &'static [Self] = &[Os::Mac, Os::Linux, Os::Windows];

    fn bit(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Os::Mac => "MAC",
            Os::Linux => "LINUX",
            Os::Windows => "WINDOWS",
        }
    }
}

impl Os {
    /// Pick the OS named by a platform descriptor such as a user-agent
    /// `appVersion` string. Anything not recognizably Mac or Linux is Windows.
    pub fn detect(descriptor: &str) -> Os {
        if descriptor.contains("Mac") {
            Os::Mac
        } else if descriptor.contains("Linux") || descriptor.contains("X11") {
            Os::Linux
        } else {
            Os::Windows
        }
    }
}

/// What a printer accepts: rendered pages, raw command languages, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Pixel = 1,
    Raw = 2,
    Both = 4,
}

impl Flag for DeviceType {
    const ALL: &'static [Self] = &[DeviceType::Pixel, DeviceType::Raw, DeviceType::Both];

    fn bit(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            DeviceType::Pixel => "PIXEL",
            DeviceType::Raw => "RAW",
            DeviceType::Both => "BOTH",
        }
    }
}

/// "Any of" a set of flag variants.
pub struct FlagSet<F> {
    bits: u8,
    _flag: PhantomData<F>,
}

pub type OsSet = FlagSet<Os>;
pub type TypeSet = FlagSet<DeviceType>;

impl<F: Flag> FlagSet<F> {
    const fn from_raw(bits: u8) -> Self {
        Self {
            bits,
            _flag: PhantomData,
        }
    }

    fn all_bits() -> u8 {
        F::ALL.iter().fold(0, |bits, flag| bits | flag.bit())
    }

    /// The set with no members.
    pub const fn empty() -> Self {
        Self::from_raw(0)
    }

    /// The set holding every variant.
    pub fn any() -> Self {
        Self::from_raw(Self::all_bits())
    }

    /// A single-member set.
    pub fn of(flag: F) -> Self {
        Self::from_raw(flag.bit())
    }

    /// Build a set from a raw integer flag value.
    ///
    /// Bits outside the variant range are dropped, so a two's-complement
    /// value such as `!1` means "every variant except bit 1". The
    /// [`ANY_BITS`] sentinel is the full set.
    pub fn from_bits(raw: i32) -> Self {
        if raw == ANY_BITS {
            return Self::any();
        }
        Self::from_raw((raw & i32::from(Self::all_bits())) as u8)
    }

    pub fn bits(self) -> u8 {
        self.bits
    }

    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub fn contains(self, flag: F) -> bool {
        self.bits & flag.bit() != 0
    }

    pub fn intersects(self, other: Self) -> bool {
        self.bits & other.bits != 0
    }

    pub fn union(self, other: Self) -> Self {
        Self::from_raw(self.bits | other.bits)
    }

    /// Every variant not in this set.
    pub fn complement(self) -> Self {
        Self::from_raw(!self.bits & Self::all_bits())
    }

    pub fn iter(self) -> impl Iterator<Item = F> {
        F::ALL.iter().copied().filter(move |flag| self.contains(*flag))
    }
}

impl OsSet {
    /// [`FlagSet::of`] usable in `static` tables.
    pub const fn of_os(os: Os) -> Self {
        Self {
            bits: os as u8,
            _flag: PhantomData,
        }
    }
}

// Manual impls: derives would put the bounds on `F` instead of the bits.
impl<F> Clone for FlagSet<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for FlagSet<F> {}

impl<F> PartialEq for FlagSet<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F> Eq for FlagSet<F> {}

impl<F: Flag> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<F: Flag> Default for FlagSet<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F: Flag> From<F> for FlagSet<F> {
    fn from(flag: F) -> Self {
        Self::of(flag)
    }
}

impl<F: Flag> BitOr for FlagSet<F> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl<F: Flag> BitOr<F> for FlagSet<F> {
    type Output = Self;

    fn bitor(self, rhs: F) -> Self {
        self.union(Self::of(rhs))
    }
}

impl<F: Flag> Not for FlagSet<F> {
    type Output = Self;

    fn not(self) -> Self {
        self.complement()
    }
}

/// A named constant recognized in a filter specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constant {
    Type(TypeSet),
    Os(OsSet),
}

impl Constant {
    /// The constant as a raw flag integer, whichever namespace it came from.
    pub fn bits(self) -> i32 {
        match self {
            Constant::Type(set) => i32::from(set.bits()),
            Constant::Os(set) => i32::from(set.bits()),
        }
    }
}

/// Resolve a constant name against the Type namespace, then the OS namespace.
///
/// Matching is case-insensitive. `ANY` names the full OS set. `None` means the
/// string is not a constant and should be used literally.
pub fn resolve_constant(name: &str) -> Option<Constant> {
    if let Some(device_type) = DeviceType::from_name(name) {
        return Some(Constant::Type(device_type.into()));
    }
    if name.eq_ignore_ascii_case("ANY") {
        return Some(Constant::Os(OsSet::any()));
    }
    Os::from_name(name).map(|os| Constant::Os(os.into()))
}

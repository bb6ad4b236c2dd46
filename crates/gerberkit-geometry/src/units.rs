//! Fixed-point length and angle units.
//!
//! `Length` is an `i64` count of nanometers, `Angle` an `i64` count of
//! microdegrees. The decimal formatters render exact values (integer
//! division and remainder, no float round-trip) because the rendered text
//! ends up verbatim in aperture definitions.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Renders `value / scale` as an exact decimal string.
///
/// `scale` must be a power of ten. Trailing fraction zeros are trimmed and
/// whole values render without a decimal point ("2", "0.2", "-1.2345").
fn format_fixed(value: i64, scale: u64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let whole = abs / scale;
    let mut frac = abs % scale;
    if frac == 0 {
        return format!("{sign}{whole}");
    }
    let mut out = format!("{sign}{whole}.");
    let mut digit_value = scale / 10;
    while frac > 0 {
        out.push(char::from(b'0' + (frac / digit_value) as u8));
        frac %= digit_value;
        digit_value /= 10;
    }
    out
}

/// A length in integer nanometers.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct Length(i64);

impl Length {
    pub const ZERO: Length = Length(0);

    const NM_PER_MM: i64 = 1_000_000;

    /// Creates a length from nanometers.
    pub const fn from_nm(nm: i64) -> Self {
        Length(nm)
    }

    /// Creates a length from whole millimeters.
    pub const fn from_mm(mm: i64) -> Self {
        Length(mm * Self::NM_PER_MM)
    }

    /// The value in nanometers.
    pub const fn nm(self) -> i64 {
        self.0
    }

    pub const fn abs(self) -> Length {
        Length(self.0.abs())
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Exact millimeter rendering, e.g. `200_000` nm becomes `"0.2"`.
    pub fn to_mm_string(self) -> String {
        format_fixed(self.0, Self::NM_PER_MM as u64)
    }
}

impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}

impl AddAssign for Length {
    fn add_assign(&mut self, rhs: Length) {
        self.0 += rhs.0;
    }
}

impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

impl SubAssign for Length {
    fn sub_assign(&mut self, rhs: Length) {
        self.0 -= rhs.0;
    }
}

impl Mul<i64> for Length {
    type Output = Length;
    fn mul(self, rhs: i64) -> Length {
        Length(self.0 * rhs)
    }
}

impl Neg for Length {
    type Output = Length;
    fn neg(self) -> Length {
        Length(-self.0)
    }
}

/// An angle in integer microdegrees. Negative values rotate clockwise.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct Angle(i64);

impl Angle {
    pub const ZERO: Angle = Angle(0);
    pub const DEG_90: Angle = Angle(90 * Self::MICRO_PER_DEG);
    pub const DEG_180: Angle = Angle(180 * Self::MICRO_PER_DEG);

    const MICRO_PER_DEG: i64 = 1_000_000;

    /// Creates an angle from microdegrees.
    pub const fn from_micro_deg(micro_deg: i64) -> Self {
        Angle(micro_deg)
    }

    /// Creates an angle from whole degrees.
    pub const fn from_deg(deg: i64) -> Self {
        Angle(deg * Self::MICRO_PER_DEG)
    }

    /// The value in microdegrees.
    pub const fn micro_deg(self) -> i64 {
        self.0
    }

    pub const fn abs(self) -> Angle {
        Angle(self.0.abs())
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// True when this angle is an exact integer multiple of `other`.
    pub const fn is_multiple_of(self, other: Angle) -> bool {
        other.0 != 0 && self.0 % other.0 == 0
    }

    /// Exact degree rendering, e.g. `45_000_000` microdegrees becomes `"45"`.
    pub fn to_deg_string(self) -> String {
        format_fixed(self.0, Self::MICRO_PER_DEG as u64)
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

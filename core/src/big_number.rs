//! Arbitrary-magnitude decimal arithmetic on a double mantissa.
//!
//! RULES:
//!   - Every value is normalized: mantissa 0 (with exponent 0), or
//!     1 <= |mantissa| < 10.
//!   - Operations never panic. Results past the representable range
//!     saturate — to `BigNumber::INFINITY` above, to zero below.
//!   - Values are immutable; every operation returns a new instance.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Exponent ceiling. Matches the double range (~1.79e308); anything
/// past it saturates to the Infinity sentinel.
pub const MAX_EXPONENT: i64 = 308;

/// Exponent floor; results below it flush to zero.
const MIN_EXPONENT: i64 = -308;

/// Exponent gap past which the smaller addend is immaterial to a
/// double mantissa and is dropped entirely.
const ALIGNMENT_LIMIT: i64 = 17;

/// Below this exponent `Display` renders a plain decimal instead of
/// mantissa-e-exponent notation.
const PLAIN_DISPLAY_EXPONENT: i64 = 6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "RawParts")]
pub struct BigNumber {
    mantissa: f64,
    exponent: i64,
}

/// Wire shape. Re-normalized on the way in so imported saves cannot
/// smuggle denormalized values into arithmetic.
#[derive(Deserialize)]
struct RawParts {
    mantissa: f64,
    exponent: i64,
}

impl From<RawParts> for BigNumber {
    fn from(raw: RawParts) -> Self {
        BigNumber::from_parts(raw.mantissa, raw.exponent)
    }
}

impl BigNumber {
    pub const ZERO: BigNumber = BigNumber { mantissa: 0.0, exponent: 0 };
    pub const ONE: BigNumber = BigNumber { mantissa: 1.0, exponent: 0 };

    /// The terminal upper bound. Reaching it ends the run.
    pub const INFINITY: BigNumber = BigNumber {
        mantissa: 1.797_693_134_862_315_7,
        exponent: MAX_EXPONENT,
    };

    pub fn new(value: f64) -> Self {
        Self::from_parts(value, 0)
    }

    /// Build from raw mantissa and exponent, normalizing.
    pub fn from_parts(mantissa: f64, exponent: i64) -> Self {
        if mantissa == 0.0 {
            return Self::ZERO;
        }
        if !mantissa.is_finite() {
            // NaN flushes to zero; an infinite mantissa is already past
            // the representable range.
            return if mantissa.is_infinite() {
                Self::INFINITY
            } else {
                Self::ZERO
            };
        }

        let shift = mantissa.abs().log10().floor() as i64;
        let mut m = mantissa / pow10(shift);
        let mut e = exponent + shift;

        // log10 rounding can leave the mantissa one step outside [1, 10).
        if m.abs() >= 10.0 {
            m /= 10.0;
            e += 1;
        }
        if m.abs() < 1.0 {
            m *= 10.0;
            e -= 1;
        }

        if e > MAX_EXPONENT || (e == MAX_EXPONENT && m.abs() > Self::INFINITY.mantissa) {
            return BigNumber {
                mantissa: Self::INFINITY.mantissa.copysign(m),
                exponent: MAX_EXPONENT,
            };
        }
        if e < MIN_EXPONENT {
            return Self::ZERO;
        }

        BigNumber { mantissa: m, exponent: e }
    }

    pub fn mantissa(&self) -> f64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0.0
    }

    /// Whether this value has saturated to the terminal sentinel.
    pub fn is_infinite(&self) -> bool {
        self.exponent >= MAX_EXPONENT && self.mantissa.abs() >= Self::INFINITY.mantissa
    }

    /// Collapse back to a double. Saturates to `f64::INFINITY` for the
    /// sentinel; exact within the double range.
    pub fn to_f64(&self) -> f64 {
        if self.is_zero() {
            0.0
        } else {
            self.mantissa * pow10(self.exponent)
        }
    }

    /// Integer power. `x^0 == 1` and `0^n == 0` by definition.
    pub fn pow(self, exp: i32) -> Self {
        if exp == 0 {
            return Self::ONE;
        }
        if self.is_zero() {
            return Self::ZERO;
        }
        self.powf(f64::from(exp))
    }

    /// Real power, computed through log10 on the full magnitude.
    /// Negative bases are not meaningful for game quantities and
    /// flush to zero.
    pub fn powf(self, exp: f64) -> Self {
        if exp == 0.0 {
            return Self::ONE;
        }
        if self.is_zero() || self.mantissa < 0.0 {
            return Self::ZERO;
        }
        let log = self.exponent as f64 + self.mantissa.log10();
        let scaled = log * exp;
        if scaled > MAX_EXPONENT as f64 + 1.0 {
            return Self::INFINITY;
        }
        if scaled < MIN_EXPONENT as f64 - 1.0 {
            return Self::ZERO;
        }
        let e = scaled.floor();
        Self::from_parts(10f64.powf(scaled - e), e as i64)
    }

    fn negated(self) -> Self {
        if self.is_zero() {
            Self::ZERO
        } else {
            BigNumber { mantissa: -self.mantissa, exponent: self.exponent }
        }
    }

    fn sign_class(&self) -> i8 {
        if self.mantissa > 0.0 {
            1
        } else if self.mantissa < 0.0 {
            -1
        } else {
            0
        }
    }
}

fn pow10(exp: i64) -> f64 {
    10f64.powi(exp as i32)
}

impl Default for BigNumber {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for BigNumber {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<u32> for BigNumber {
    fn from(value: u32) -> Self {
        Self::new(f64::from(value))
    }
}

impl From<u64> for BigNumber {
    fn from(value: u64) -> Self {
        Self::new(value as f64)
    }
}

impl Add for BigNumber {
    type Output = BigNumber;

    fn add(self, rhs: BigNumber) -> BigNumber {
        if self.is_zero() {
            return rhs;
        }
        if rhs.is_zero() {
            return self;
        }
        let (hi, lo) = if self.exponent >= rhs.exponent {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let gap = hi.exponent - lo.exponent;
        if gap > ALIGNMENT_LIMIT {
            return hi;
        }
        BigNumber::from_parts(hi.mantissa + lo.mantissa / pow10(gap), hi.exponent)
    }
}

impl Sub for BigNumber {
    type Output = BigNumber;

    fn sub(self, rhs: BigNumber) -> BigNumber {
        self + rhs.negated()
    }
}

impl Mul for BigNumber {
    type Output = BigNumber;

    fn mul(self, rhs: BigNumber) -> BigNumber {
        if self.is_zero() || rhs.is_zero() {
            return BigNumber::ZERO;
        }
        if self.is_infinite() || rhs.is_infinite() {
            return BigNumber::INFINITY;
        }
        BigNumber::from_parts(self.mantissa * rhs.mantissa, self.exponent + rhs.exponent)
    }
}

impl Div for BigNumber {
    type Output = BigNumber;

    fn div(self, rhs: BigNumber) -> BigNumber {
        if rhs.is_zero() {
            // Saturating by policy: x/0 is past any representable value.
            return if self.is_zero() {
                BigNumber::ZERO
            } else {
                BigNumber::INFINITY
            };
        }
        if self.is_zero() {
            return BigNumber::ZERO;
        }
        BigNumber::from_parts(self.mantissa / rhs.mantissa, self.exponent - rhs.exponent)
    }
}

impl PartialEq for BigNumber {
    fn eq(&self, other: &Self) -> bool {
        self.mantissa == other.mantissa && self.exponent == other.exponent
    }
}

impl PartialOrd for BigNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (sa, sb) = (self.sign_class(), other.sign_class());
        if sa != sb {
            return Some(sa.cmp(&sb));
        }
        if sa == 0 {
            return Some(Ordering::Equal);
        }
        // Same sign: exponent is the primary key, mantissa secondary.
        let ord = match self.exponent.cmp(&other.exponent) {
            Ordering::Equal => self.mantissa.partial_cmp(&other.mantissa)?,
            ord => ord,
        };
        Some(if sa < 0 { ord.reverse() } else { ord })
    }
}

impl fmt::Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            return write!(f, "Infinity");
        }
        if self.is_zero() {
            return write!(f, "0");
        }
        if self.exponent < PLAIN_DISPLAY_EXPONENT {
            let value = self.to_f64();
            if value.fract() == 0.0 {
                write!(f, "{value:.0}")
            } else {
                write!(f, "{value:.2}")
            }
        } else {
            write!(f, "{:.2}e{}", self.mantissa, self.exponent)
        }
    }
}

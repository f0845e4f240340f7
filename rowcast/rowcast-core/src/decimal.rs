//! Arbitrary-precision decimal used by the numeric column variant.

use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

/// Largest number of digits [`Decimal::rescale`] lets a value grow to.
pub const MAX_RESCALE_DIGITS: u64 = 4096;

/// Signed decimal number `unscaled × 10^-scale` of unbounded precision.
///
/// Equality compares magnitude: `1.0 == 1.00`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(BigDecimal);

/// Error returned when text does not describe a decimal number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid decimal literal '{0}'")]
pub struct ParseDecimalError(pub String);

impl Decimal {
    pub fn new(unscaled: impl Into<BigInt>, scale: i64) -> Self {
        Self(BigDecimal::new(unscaled.into(), scale))
    }

    pub fn zero() -> Self {
        Self::new(0, 0)
    }

    pub fn unscaled(&self) -> BigInt {
        self.0.as_bigint_and_exponent().0
    }

    pub fn scale(&self) -> i64 {
        self.0.as_bigint_and_exponent().1
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Number of digits in the unscaled value (at least 1).
    pub fn precision(&self) -> u64 {
        digit_count(&self.unscaled())
    }

    pub fn as_big_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Shortest decimal that converts back to exactly `v`.
    ///
    /// Returns `None` for NaN and infinities.
    pub fn from_f64(v: f64) -> Option<Self> {
        if !v.is_finite() {
            return None;
        }
        format!("{v:e}").parse().ok()
    }

    /// Shortest decimal that converts back to exactly `v` as an `f32`.
    pub fn from_f32(v: f32) -> Option<Self> {
        if !v.is_finite() {
            return None;
        }
        format!("{v:e}").parse().ok()
    }

    /// Correctly rounded nearest `f64`; out-of-range magnitudes give
    /// infinity or zero.
    pub fn to_f64(&self) -> f64 {
        let (unscaled, scale) = self.0.as_bigint_and_exponent();
        format!("{unscaled}e{}", -i128::from(scale))
            .parse()
            .unwrap_or(f64::NAN)
    }

    /// Correctly rounded nearest `f32`, without going through `f64`.
    pub fn to_f32(&self) -> f32 {
        let (unscaled, scale) = self.0.as_bigint_and_exponent();
        format!("{unscaled}e{}", -i128::from(scale))
            .parse()
            .unwrap_or(f32::NAN)
    }

    /// Integral part, truncated toward zero, keeping its low-order 128 bits.
    ///
    /// Callers narrowing further with `as` keep the low-order bits of this
    /// result.
    pub fn trunc_wrapping(&self) -> i128 {
        let (unscaled, scale) = self.0.as_bigint_and_exponent();
        let integral = if scale <= 0 {
            match u32::try_from(scale.unsigned_abs()) {
                // 10^k is a multiple of 2^128 once k >= 128.
                Ok(k) if k < 128 => unscaled * BigInt::from(10).pow(k),
                _ => return 0,
            }
        } else {
            match u32::try_from(scale) {
                Ok(k) if u64::from(k) <= digit_count(&unscaled) => {
                    unscaled / BigInt::from(10).pow(k)
                }
                // |unscaled| < 10^scale
                _ => return 0,
            }
        };
        wrapping_i128(&integral)
    }

    /// Same magnitude expressed with `scale` fractional digits.
    ///
    /// Dropped digits are rounded half away from zero. Returns `None` when
    /// the result would need more than [`MAX_RESCALE_DIGITS`] digits.
    pub fn rescale(&self, scale: i64) -> Option<Self> {
        let (unscaled, current) = self.0.as_bigint_and_exponent();
        if scale == current {
            return Some(self.clone());
        }

        if scale > current {
            let shift = u64::try_from(scale.checked_sub(current)?).ok()?;
            if digit_count(&unscaled).checked_add(shift)? > MAX_RESCALE_DIGITS {
                return None;
            }
            let factor = BigInt::from(10).pow(u32::try_from(shift).ok()?);
            return Some(Self::new(unscaled * factor, scale));
        }

        let drop = u64::try_from(current.checked_sub(scale)?).ok()?;
        if drop > digit_count(&unscaled) {
            // |unscaled| < 10^(drop - 1), below half a unit.
            return Some(Self::new(0, scale));
        }
        let divisor = BigInt::from(10).pow(u32::try_from(drop).ok()?);
        let quotient = &unscaled / &divisor;
        let remainder = &unscaled % &divisor;
        let quotient = if remainder.abs() * 2 >= divisor {
            if unscaled.is_negative() {
                quotient - 1
            } else {
                quotient + 1
            }
        } else {
            quotient
        };
        Some(Self::new(quotient, scale))
    }

    /// Unscaled value at `scale`, if it fits in an `i128`.
    pub fn to_i128_at(&self, scale: i64) -> Option<i128> {
        self.rescale(scale)?.unscaled().to_i128()
    }
}

fn digit_count(v: &BigInt) -> u64 {
    v.magnitude().to_string().len() as u64
}

fn wrapping_i128(v: &BigInt) -> i128 {
    let bytes = v.to_signed_bytes_le();
    let fill = if v.is_negative() { 0xff } else { 0 };
    let mut buf = [fill; 16];
    let n = bytes.len().min(16);
    buf[..n].copy_from_slice(&bytes[..n]);
    i128::from_le_bytes(buf)
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigDecimal> for Decimal {
    fn from(v: BigDecimal) -> Self {
        Self(v)
    }
}

impl From<Decimal> for BigDecimal {
    fn from(v: Decimal) -> Self {
        v.0
    }
}

macro_rules! decimal_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Decimal {
                fn from(v: $t) -> Self {
                    Self::new(v, 0)
                }
            }
        )*
    };
}

decimal_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64);

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Accepts an optional sign, digits with an optional `.`, and an optional
/// `e`/`E` exponent. The resulting scale must fit an `i32`.
impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDecimalError(s.to_string());
        let text = s.trim();
        let lexical = text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
        if !lexical || !text.bytes().any(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let v = BigDecimal::from_str(text).map_err(|_| err())?;
        let (_, scale) = v.as_bigint_and_exponent();
        if i32::try_from(scale).is_err() {
            return Err(err());
        }
        Ok(Self(v))
    }
}

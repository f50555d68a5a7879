//! Currency amounts in whole cents
//!
//! Every stored amount and every total the engine produces is a `Money`.
//! Percentages and the FIRE multiplier are the only floating-point values,
//! and they are converted back to cents with `scale_percent` or
//! `from_f64_rounded`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use thiserror::Error;

/// Signed amount in cents; serialized as a bare integer
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is too large")]
    Overflow(String),
}

impl Money {
    /// # Examples
    /// ```
    /// use firetrack::models::Money;
    /// assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// # Examples
    /// ```
    /// use firetrack::models::Money;
    /// assert_eq!(Money::from_dollars_cents(10, 50).cents(), 1050);
    /// ```
    pub const fn from_dollars_cents(dollars: i64, cents: i64) -> Self {
        Self(dollars * 100 + cents)
    }

    /// Nearest cent to a decimal value, halves rounded away from zero
    pub fn from_f64_rounded(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    /// Like `from_f64_rounded`, but `None` for values that are not finite
    /// or do not fit in cents
    pub fn checked_from_f64(value: f64) -> Option<Self> {
        // 2^63, the first value past i64::MAX
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        let cents = (value * 100.0).round();
        (cents.is_finite() && cents.abs() < LIMIT).then(|| Self(cents as i64))
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole units, truncated toward zero
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Cents past the whole unit, always 0-99
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub const fn checked_add(self, rhs: Money) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    pub const fn checked_mul(self, factor: i64) -> Option<Self> {
        match self.0.checked_mul(factor) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Total of `amounts`; `None` if any partial sum overflows
    ///
    /// # Examples
    /// ```
    /// use firetrack::models::Money;
    /// let amounts = [Money::from_cents(150), Money::from_cents(250)];
    /// assert_eq!(Money::checked_sum(amounts), Some(Money::from_cents(400)));
    /// assert_eq!(Money::checked_sum([Money::from_cents(i64::MAX), Money::from_cents(1)]), None);
    /// ```
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), Money::checked_add)
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Share of `total` in percent; a zero total gives 0
    pub fn percent_of(&self, total: Money) -> f64 {
        match total.0 {
            0 => 0.0,
            t => self.0 as f64 * 100.0 / t as f64,
        }
    }

    /// `percent` percent of this amount, to the nearest cent
    pub fn scale_percent(&self, percent: f64) -> Self {
        Self((self.0 as f64 * percent / 100.0).round() as i64)
    }

    /// Parse user or CSV input.
    ///
    /// Accepts an optional leading `-`, an optional `$`, thousands commas,
    /// and any number of decimals (rounded half up to the cent). A bare
    /// integer is whole units: "10" is $10.00.
    pub fn parse(input: &str) -> Result<Self, MoneyParseError> {
        let trimmed = input.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let digits: String = unsigned
            .strip_prefix('$')
            .unwrap_or(unsigned)
            .chars()
            .filter(|c| *c != ',')
            .collect();

        if digits.is_empty() {
            return Err(MoneyParseError::Empty);
        }

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction)
        {
            return Err(MoneyParseError::NotANumber(input.trim().to_string()));
        }

        let overflow = || MoneyParseError::Overflow(input.trim().to_string());
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };

        // First three decimals: two kept, the third rounds
        let mut padded = fraction.chars().chain(std::iter::repeat('0')).take(3);
        let mut next_digit = || padded.next().and_then(|c| c.to_digit(10)).unwrap_or(0) as i64;
        let (tenths, hundredths, thousandths) = (next_digit(), next_digit(), next_digit());
        let fraction_cents = tenths * 10 + hundredths + i64::from(thousandths >= 5);

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(overflow)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Render with an arbitrary currency symbol ("€12.00", "-€3.50")
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            symbol,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol("$"))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

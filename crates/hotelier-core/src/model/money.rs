// ── Monetary amounts ──
//
// Prices travel as decimal strings with two places. They are held as an
// exact count of minor units so that `price × nights` never rounds.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid amount {input:?}: {reason}")]
pub struct MoneyParseError {
    input: String,
    reason: &'static str,
}

/// An exact amount in minor units (cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const ZERO: Self = Self { cents: 0 };

    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub const fn cents(self) -> i64 {
        self.cents
    }

    pub const fn is_zero(self) -> bool {
        self.cents == 0
    }

    /// Multiply by a count (nights, quantity). Saturates instead of wrapping.
    #[must_use]
    pub fn times(self, count: u32) -> Self {
        Self {
            cents: self.cents.saturating_mul(i64::from(count)),
        }
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason| MoneyParseError {
            input: s.to_owned(),
            reason,
        };

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(fail("expected digits before the decimal point"));
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(fail("expected digits after the decimal point"));
        }
        // Extra places are tolerated only when they carry no value.
        let (cents_part, excess) = frac.split_at(frac.len().min(2));
        if excess.bytes().any(|b| b != b'0') {
            return Err(fail("more than two decimal places"));
        }

        let units: i64 = whole.parse().map_err(|_| fail("amount too large"))?;
        let mut cents: i64 = match cents_part.len() {
            0 => 0,
            1 => cents_part.parse::<i64>().map_err(|_| fail("bad fraction"))? * 10,
            _ => cents_part.parse().map_err(|_| fail("bad fraction"))?,
        };
        cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(|| fail("amount too large"))?;

        Ok(Self {
            cents: if negative { -cents } else { cents },
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

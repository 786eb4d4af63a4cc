use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// fixed-point denominator for rates: 1000 = 100%
pub const SCALAR: u32 = 1_000;

/// seconds in the 365 day year used for accrual
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;

/// amount of a fungible loan asset in its smallest unit
pub type Amount = u128;

/// rate scaled by SCALAR (15 = 1.5%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Rate(u32);

impl Rate {
    pub const ZERO: Rate = Rate(0);
    pub const ONE: Rate = Rate(SCALAR);

    /// largest rate a loan record can carry
    pub const MAX_LOAN_RATE: Rate = Rate(u16::MAX as u32);

    /// create from the raw scaled value (per mille)
    pub const fn from_scaled(scaled: u32) -> Self {
        Rate(scaled)
    }

    /// create from whole percent (e.g., 5 for 5%), saturating at the scaled maximum
    pub const fn from_percentage(p: u32) -> Self {
        Rate(p.saturating_mul(SCALAR / 100))
    }

    /// create from decimal (e.g., 0.015 for 1.5%), truncating below one per mille
    pub fn from_decimal(d: Decimal) -> Option<Self> {
        if d.is_sign_negative() {
            return None;
        }
        let scaled = (d * Decimal::from(SCALAR)).trunc();
        u32::try_from(scaled.mantissa() / 10_i128.pow(scaled.scale()))
            .ok()
            .map(Rate)
    }

    /// raw scaled value
    pub const fn scaled(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// get as decimal
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(SCALAR)
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.as_decimal() * Decimal::from(100)
    }

    /// `amount × rate / SCALAR` without intermediate overflow, rounded down
    pub fn portion_wide(&self, amount: u128) -> U256 {
        U256::from(amount) * U256::from(self.0) / U256::from(SCALAR)
    }

    /// `amount × rate / SCALAR`, `None` if the result leaves the 128-bit range
    pub fn portion(&self, amount: u128) -> Option<u128> {
        to_u128(self.portion_wide(amount))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}

/// narrow a 256-bit intermediate back to storage width
pub fn to_u128(value: U256) -> Option<u128> {
    u128::try_from(value).ok()
}

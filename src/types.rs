use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::{Amount, Rate};

/// loan identifier, also the id of both claim tokens for the loan
pub type LoanId = u64;

/// identity of an account, contract or asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(Uuid);

impl Address {
    /// the null identity, never a valid recipient or asset
    pub const NIL: Address = Address(Uuid::nil());

    /// fresh random identity
    pub fn random() -> Self {
        Address(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Address(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for Address {
    fn default() -> Self {
        Address::NIL
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        write!(f, "0x{}", &simple[..12])
    }
}

/// assets are addressed by the identity of their registry
pub type AssetId = Address;

/// the two claim tokens issued per loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimKind {
    /// right to the collateral on repayment and to newly funded principal
    Borrower,
    /// right to repayment or to seize collateral on default
    Lender,
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimKind::Borrower => write!(f, "borrower"),
            ClaimKind::Lender => write!(f, "lender"),
        }
    }
}

/// a single negotiable loan term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    Rate,
    Duration,
    Principal,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Rate => write!(f, "rate"),
            Term::Duration => write!(f, "duration"),
            Term::Principal => write!(f, "principal"),
        }
    }
}

/// loan terms: the bounds while proposed, the accepted values once funded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terms {
    pub rate: Rate,
    pub duration_secs: u32,
    pub principal: Amount,
}

impl Terms {
    pub fn new(rate: Rate, duration_secs: u32, principal: Amount) -> Self {
        Self {
            rate,
            duration_secs,
            principal,
        }
    }
}

/// reference to a locked non-fungible collateral token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollateralRef {
    pub asset: AssetId,
    pub token_id: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_address() {
        assert!(Address::NIL.is_nil());
        assert!(!Address::random().is_nil());
        assert_eq!(Address::default(), Address::NIL);
    }

    #[test]
    fn test_address_display_is_short_hex() {
        let shown = Address::random().to_string();
        assert!(shown.starts_with("0x"));
        assert_eq!(shown.len(), 14);
    }
}

use thiserror::Error;

use crate::decimal::{Amount, Rate};
use crate::types::{Address, AssetId, ClaimKind, LoanId, Term};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid parameters: {message}")]
    InvalidParameters {
        message: String,
    },

    #[error("unauthorized: caller {caller} is not {required}")]
    Unauthorized {
        caller: Address,
        required: String,
    },

    #[error("invalid state for loan {loan_id}: current {current}, expected {expected}")]
    InvalidState {
        loan_id: LoanId,
        current: String,
        expected: String,
    },

    #[error("{term} regressed: current {current}, proposed {proposed}")]
    TermsRegressed {
        term: Term,
        current: u128,
        proposed: u128,
    },

    #[error("proposed terms are not a sufficient improvement")]
    TermsNotImproved,

    #[error("arithmetic fault: {message}")]
    ArithmeticFault {
        message: String,
    },

    #[error("transfer rejected: {0}")]
    TransferRejected(#[from] TransferError),

    #[error("unknown loan: {loan_id}")]
    UnknownLoan {
        loan_id: LoanId,
    },

    #[error("{kind} registry already registered")]
    RegistryAlreadySet {
        kind: ClaimKind,
    },

    #[error("claim registries not registered")]
    RegistriesNotSet,

    #[error("fee rate {rate} exceeds maximum {max}")]
    FeeRateOutOfBounds {
        rate: Rate,
        max: Rate,
    },

    #[error("invalid improvement rate: {rate}")]
    InvalidImprovementRate {
        rate: Rate,
    },

    #[error("insufficient fees for {asset}: available {available}, requested {requested}")]
    InsufficientFees {
        asset: AssetId,
        available: Amount,
        requested: Amount,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl LedgerError {
    pub(crate) fn overflow(what: &str) -> Self {
        LedgerError::ArithmeticFault {
            message: format!("{} overflow", what),
        }
    }

    pub(crate) fn underflow(what: &str) -> Self {
        LedgerError::ArithmeticFault {
            message: format!("{} underflow", what),
        }
    }
}

/// failures reported by the external asset and claim capabilities
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient balance of {asset} for {holder}: available {available}, requested {requested}")]
    InsufficientBalance {
        asset: AssetId,
        holder: Address,
        available: Amount,
        requested: Amount,
    },

    #[error("{holder} does not own token {token_id} of {asset}")]
    NotOwner {
        asset: AssetId,
        token_id: u128,
        holder: Address,
    },

    #[error("{kind} claim {loan_id} already minted")]
    AlreadyMinted {
        kind: ClaimKind,
        loan_id: LoanId,
    },

    #[error("{kind} claim {loan_id} does not exist")]
    NonexistentClaim {
        kind: ClaimKind,
        loan_id: LoanId,
    },

    #[error("{caller} does not hold {kind} claim {loan_id}")]
    NotClaimHolder {
        kind: ClaimKind,
        loan_id: LoanId,
        caller: Address,
    },

    #[error("{caller} is not authorized to operate the {kind} registry")]
    NotAuthorized {
        kind: ClaimKind,
        caller: Address,
    },

    #[error("transfer to the nil address")]
    NilRecipient,

    #[error("balance overflow for {asset}")]
    BalanceOverflow {
        asset: AssetId,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;

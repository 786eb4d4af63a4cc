//! Boundary capabilities the ledger consumes: the two claim-token registries
//! and the book of fungible and non-fungible assets.

pub mod assets;
pub mod claims;

use crate::decimal::Amount;
use crate::errors::TransferError;
use crate::settlement::TransferBatch;
use crate::types::{Address, AssetId, ClaimKind, LoanId};

pub use assets::InMemoryAssetBook;
pub use claims::InMemoryClaimRegistry;

/// registry of one kind of claim token, ids shared with loan ids
pub trait ClaimRegistry: Send + Sync {
    fn kind(&self) -> ClaimKind;

    /// identity of the registry itself
    fn identity(&self) -> Address;

    /// issue claim `loan_id` to `to`; only `authority` may mint
    fn mint(&self, authority: Address, to: Address, loan_id: LoanId) -> Result<(), TransferError>;

    /// revoke claim `loan_id`; only `authority` may burn
    fn burn(&self, authority: Address, loan_id: LoanId) -> Result<(), TransferError>;

    fn owner_of(&self, loan_id: LoanId) -> Option<Address>;

    /// holder-initiated transfer
    fn transfer(&self, caller: Address, to: Address, loan_id: LoanId) -> Result<(), TransferError>;

    /// reassignment authorized by `authority` instead of the holder
    fn force_transfer(
        &self,
        authority: Address,
        from: Address,
        to: Address,
        loan_id: LoanId,
    ) -> Result<(), TransferError>;
}

/// fungible balances and non-fungible ownership across all assets
pub trait AssetBook: Send + Sync {
    /// apply every movement of the batch, or none of them
    fn settle(&self, batch: &TransferBatch) -> Result<(), TransferError>;

    fn balance_of(&self, asset: AssetId, holder: Address) -> Amount;

    fn token_owner(&self, asset: AssetId, token_id: u128) -> Option<Address>;
}

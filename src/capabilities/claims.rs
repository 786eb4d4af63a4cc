use parking_lot::RwLock;
use std::collections::HashMap;

use crate::capabilities::ClaimRegistry;
use crate::errors::TransferError;
use crate::types::{Address, ClaimKind, LoanId};

/// claim registry kept in memory; `facilitator` is the only minter
pub struct InMemoryClaimRegistry {
    kind: ClaimKind,
    identity: Address,
    facilitator: Address,
    owners: RwLock<HashMap<LoanId, Address>>,
}

impl InMemoryClaimRegistry {
    pub fn new(kind: ClaimKind, facilitator: Address) -> Self {
        Self {
            kind,
            identity: Address::random(),
            facilitator,
            owners: RwLock::new(HashMap::new()),
        }
    }

    pub fn minted(&self) -> usize {
        self.owners.read().len()
    }

    fn check_authority(&self, caller: Address) -> Result<(), TransferError> {
        if caller != self.facilitator {
            return Err(TransferError::NotAuthorized {
                kind: self.kind,
                caller,
            });
        }
        Ok(())
    }

    fn reassign(&self, from: Address, to: Address, loan_id: LoanId) -> Result<(), TransferError> {
        if to.is_nil() {
            return Err(TransferError::NilRecipient);
        }
        let mut owners = self.owners.write();
        let owner = owners
            .get_mut(&loan_id)
            .ok_or(TransferError::NonexistentClaim {
                kind: self.kind,
                loan_id,
            })?;
        if *owner != from {
            return Err(TransferError::NotClaimHolder {
                kind: self.kind,
                loan_id,
                caller: from,
            });
        }
        *owner = to;
        Ok(())
    }
}

impl ClaimRegistry for InMemoryClaimRegistry {
    fn kind(&self) -> ClaimKind {
        self.kind
    }

    fn identity(&self) -> Address {
        self.identity
    }

    fn mint(&self, authority: Address, to: Address, loan_id: LoanId) -> Result<(), TransferError> {
        self.check_authority(authority)?;
        if to.is_nil() {
            return Err(TransferError::NilRecipient);
        }
        let mut owners = self.owners.write();
        if owners.contains_key(&loan_id) {
            return Err(TransferError::AlreadyMinted {
                kind: self.kind,
                loan_id,
            });
        }
        owners.insert(loan_id, to);
        Ok(())
    }

    fn burn(&self, authority: Address, loan_id: LoanId) -> Result<(), TransferError> {
        self.check_authority(authority)?;
        self.owners
            .write()
            .remove(&loan_id)
            .map(|_| ())
            .ok_or(TransferError::NonexistentClaim {
                kind: self.kind,
                loan_id,
            })
    }

    fn owner_of(&self, loan_id: LoanId) -> Option<Address> {
        self.owners.read().get(&loan_id).copied()
    }

    fn transfer(&self, caller: Address, to: Address, loan_id: LoanId) -> Result<(), TransferError> {
        self.reassign(caller, to, loan_id)
    }

    fn force_transfer(
        &self,
        authority: Address,
        from: Address,
        to: Address,
        loan_id: LoanId,
    ) -> Result<(), TransferError> {
        self.check_authority(authority)?;
        self.reassign(from, to, loan_id)
    }
}

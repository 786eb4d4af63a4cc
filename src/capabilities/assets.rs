use parking_lot::Mutex;
use std::collections::HashMap;

use crate::capabilities::AssetBook;
use crate::decimal::Amount;
use crate::errors::TransferError;
use crate::settlement::{Movement, TransferBatch};
use crate::types::{Address, AssetId};

#[derive(Debug, Default)]
struct Books {
    balances: HashMap<(AssetId, Address), Amount>,
    tokens: HashMap<(AssetId, u128), Address>,
}

/// pending writes of one batch, committed only once every movement checks out
#[derive(Default)]
struct Staged {
    balances: HashMap<(AssetId, Address), Amount>,
    tokens: HashMap<(AssetId, u128), Address>,
}

impl Staged {
    fn balance(&self, books: &Books, key: (AssetId, Address)) -> Amount {
        self.balances
            .get(&key)
            .or_else(|| books.balances.get(&key))
            .copied()
            .unwrap_or(0)
    }

    fn owner(&self, books: &Books, key: (AssetId, u128)) -> Option<Address> {
        self.tokens.get(&key).or_else(|| books.tokens.get(&key)).copied()
    }

    fn apply(&mut self, books: &Books, movement: &Movement) -> Result<(), TransferError> {
        match *movement {
            Movement::Fungible {
                asset,
                from,
                to,
                amount,
            } => {
                if to.is_nil() {
                    return Err(TransferError::NilRecipient);
                }
                let available = self.balance(books, (asset, from));
                let debited = available.checked_sub(amount).ok_or(
                    TransferError::InsufficientBalance {
                        asset,
                        holder: from,
                        available,
                        requested: amount,
                    },
                )?;
                self.balances.insert((asset, from), debited);

                let credited = self
                    .balance(books, (asset, to))
                    .checked_add(amount)
                    .ok_or(TransferError::BalanceOverflow { asset })?;
                self.balances.insert((asset, to), credited);
            }
            Movement::Collateral {
                collateral,
                from,
                to,
            } => {
                if to.is_nil() {
                    return Err(TransferError::NilRecipient);
                }
                let key = (collateral.asset, collateral.token_id);
                if self.owner(books, key) != Some(from) {
                    return Err(TransferError::NotOwner {
                        asset: collateral.asset,
                        token_id: collateral.token_id,
                        holder: from,
                    });
                }
                self.tokens.insert(key, to);
            }
        }
        Ok(())
    }
}

/// in-memory asset book with all-or-nothing batch settlement
#[derive(Debug, Default)]
pub struct InMemoryAssetBook {
    books: Mutex<Books>,
}

impl InMemoryAssetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// credit fungible units out of thin air
    pub fn mint_fungible(&self, asset: AssetId, to: Address, amount: Amount) -> Result<(), TransferError> {
        let mut books = self.books.lock();
        let balance = books.balances.entry((asset, to)).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(TransferError::BalanceOverflow { asset })?;
        Ok(())
    }

    /// assign a non-fungible token to `to`, replacing any prior owner
    pub fn mint_token(&self, asset: AssetId, token_id: u128, to: Address) {
        self.books.lock().tokens.insert((asset, token_id), to);
    }
}

impl AssetBook for InMemoryAssetBook {
    fn settle(&self, batch: &TransferBatch) -> Result<(), TransferError> {
        let mut books = self.books.lock();
        let mut staged = Staged::default();
        for movement in batch.movements() {
            staged.apply(&books, movement)?;
        }
        books.balances.extend(staged.balances);
        books.tokens.extend(staged.tokens);
        Ok(())
    }

    fn balance_of(&self, asset: AssetId, holder: Address) -> Amount {
        self.books
            .lock()
            .balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or(0)
    }

    fn token_owner(&self, asset: AssetId, token_id: u128) -> Option<Address> {
        self.books.lock().tokens.get(&(asset, token_id)).copied()
    }
}

pub mod engine;

use serde::{Deserialize, Serialize};

use crate::decimal::Amount;
use crate::types::{Address, AssetId, CollateralRef};

pub use engine::{Settlement, SettlementEngine};

/// a single asset movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Movement {
    Fungible {
        asset: AssetId,
        from: Address,
        to: Address,
        amount: Amount,
    },
    Collateral {
        collateral: CollateralRef,
        from: Address,
        to: Address,
    },
}

/// ordered movements that must be applied together or not at all
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferBatch {
    movements: Vec<Movement>,
}

impl TransferBatch {
    pub fn new() -> Self {
        Self {
            movements: Vec::new(),
        }
    }

    /// add a fungible movement; zero amounts are dropped
    pub fn fungible(mut self, asset: AssetId, from: Address, to: Address, amount: Amount) -> Self {
        if amount > 0 {
            self.movements.push(Movement::Fungible {
                asset,
                from,
                to,
                amount,
            });
        }
        self
    }

    pub fn collateral(mut self, collateral: CollateralRef, from: Address, to: Address) -> Self {
        self.movements.push(Movement::Collateral {
            collateral,
            from,
            to,
        });
        self
    }

    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    /// total of `asset` received by `holder` across the batch
    pub fn received_by(&self, asset: AssetId, holder: Address) -> Amount {
        self.movements
            .iter()
            .filter_map(|m| match m {
                Movement::Fungible { asset: a, to, amount, .. } if *a == asset && *to == holder => {
                    Some(*amount)
                }
                _ => None,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amounts_are_dropped() {
        let asset = Address::random();
        let (a, b) = (Address::random(), Address::random());
        let batch = TransferBatch::new()
            .fungible(asset, a, b, 0)
            .fungible(asset, a, b, 5)
            .fungible(asset, b, a, 2);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.received_by(asset, b), 5);
        assert_eq!(batch.received_by(asset, a), 2);
    }
}

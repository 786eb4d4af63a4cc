pub mod capabilities;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod ledger;
pub mod policy;
pub mod settlement;
pub mod state;
pub mod types;
pub mod view;

// re-export key types
pub use capabilities::{AssetBook, ClaimRegistry, InMemoryAssetBook, InMemoryClaimRegistry};
pub use config::LedgerConfig;
pub use decimal::{Amount, Rate, SCALAR, SECONDS_PER_YEAR};
pub use errors::{LedgerError, Result, TransferError};
pub use events::{Event, EventStore};
pub use interest::{AccrualEngine, InterestAccrual};
pub use ledger::{Funding, FundingOffer, LoanLedger, LoanRequest};
pub use policy::{Admission, Improvement, ImprovementPolicy};
pub use settlement::{Movement, Settlement, SettlementEngine, TransferBatch};
pub use state::{Loan, LoanPhase};
pub use types::{Address, AssetId, ClaimKind, CollateralRef, LoanId, Term, Terms};
pub use view::LoanView;

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use primitive_types::U256;
pub use uuid::Uuid;

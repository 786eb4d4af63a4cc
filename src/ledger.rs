use chrono::{DateTime, TimeZone, Utc};
use hourglass_rs::SafeTimeProvider;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{error, info, warn};

use crate::capabilities::{AssetBook, ClaimRegistry};
use crate::config::{validate_fee_rate, validate_improvement_rate, LedgerConfig};
use crate::decimal::{Amount, Rate};
use crate::errors::{LedgerError, Result, TransferError};
use crate::events::{Event, EventStore};
use crate::interest::AccrualEngine;
use crate::policy::ImprovementPolicy;
use crate::settlement::{Settlement, SettlementEngine, TransferBatch};
use crate::state::{Loan, LoanPhase};
use crate::types::{Address, AssetId, ClaimKind, CollateralRef, LoanId, Terms};
use crate::view::LoanView;

/// borrower's request to open a loan against a collateral token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanRequest {
    pub collateral: CollateralRef,
    /// highest rate the borrower accepts
    pub max_rate: Rate,
    /// lowest principal the borrower accepts
    pub min_principal: Amount,
    /// shortest duration the borrower accepts
    pub min_duration_secs: u32,
    pub loan_asset: AssetId,
    /// receives the borrower claim
    pub claim_recipient: Address,
}

/// lender's offer to fund or refinance a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingOffer {
    pub rate: Rate,
    pub principal: Amount,
    pub duration_secs: u32,
    /// receives the lender claim
    pub claim_recipient: Address,
}

impl FundingOffer {
    pub fn terms(&self) -> Terms {
        Terms::new(self.rate, self.duration_secs, self.principal)
    }
}

/// result of a successful `fund` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Funding {
    /// first lender on a proposed loan
    Underwritten(Settlement),
    /// an existing lender was bought out
    BoughtOut {
        previous_lender: Address,
        settlement: Settlement,
    },
}

impl Funding {
    pub fn settlement(&self) -> &Settlement {
        match self {
            Funding::Underwritten(settlement) => settlement,
            Funding::BoughtOut { settlement, .. } => settlement,
        }
    }
}

struct Registries {
    borrower: OnceLock<Arc<dyn ClaimRegistry>>,
    lender: OnceLock<Arc<dyn ClaimRegistry>>,
}

/// peer-to-peer collateralized loan ledger
///
/// Every operation on a loan runs under that loan's record lock, so two
/// buyouts of the same loan are strictly ordered and the later one is judged
/// against the terms the earlier one committed. A call's claim-token step runs
/// first, its asset movements follow as one all-or-nothing batch, and the claim
/// step is reverted if that batch is rejected. The record is mutated last.
pub struct LoanLedger {
    owner: Address,
    custody: Address,
    assets: Arc<dyn AssetBook>,
    registries: Registries,
    loans: RwLock<HashMap<LoanId, Arc<Mutex<Loan>>>>,
    /// last committed loan id; held across a create so ids stay gapless
    last_id: Mutex<LoanId>,
    config: RwLock<LedgerConfig>,
    fees: Mutex<HashMap<AssetId, Amount>>,
    events: Mutex<EventStore>,
    accrual: AccrualEngine,
}

impl LoanLedger {
    /// new ledger administered by `owner`, custody under a fresh identity
    pub fn new(owner: Address, config: LedgerConfig, assets: Arc<dyn AssetBook>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            owner,
            custody: Address::random(),
            assets,
            registries: Registries {
                borrower: OnceLock::new(),
                lender: OnceLock::new(),
            },
            loans: RwLock::new(HashMap::new()),
            last_id: Mutex::new(0),
            config: RwLock::new(config),
            fees: Mutex::new(HashMap::new()),
            events: Mutex::new(EventStore::new()),
            accrual: AccrualEngine::new(),
        })
    }

    /// privileged administrator
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// identity holding collateral and retained fees
    pub fn custody(&self) -> Address {
        self.custody
    }

    pub fn config(&self) -> LedgerConfig {
        *self.config.read()
    }

    // ---- lifecycle -------------------------------------------------------

    /// lock the collateral and open a proposed loan with `request` as its bounds
    pub fn create_loan(
        &self,
        caller: Address,
        request: LoanRequest,
        time: &SafeTimeProvider,
    ) -> Result<LoanId> {
        self.create_loan_inner(caller, request, time)
            .inspect_err(|e| warn!(operation = "create", %caller, error = %e, "rejected"))
    }

    fn create_loan_inner(
        &self,
        caller: Address,
        request: LoanRequest,
        time: &SafeTimeProvider,
    ) -> Result<LoanId> {
        let (borrower_claims, lender_claims) = self.registries()?;

        if request.min_duration_secs == 0 {
            return Err(invalid("minimum duration must be non-zero"));
        }
        if request.min_principal == 0 {
            return Err(invalid("minimum principal must be non-zero"));
        }
        if request.max_rate > Rate::MAX_LOAN_RATE {
            return Err(invalid("maximum rate exceeds 16 bits"));
        }
        if request.loan_asset.is_nil() {
            return Err(invalid("loan asset must be set"));
        }
        if request.claim_recipient.is_nil() {
            return Err(invalid("claim recipient must be set"));
        }
        let collateral_asset = request.collateral.asset;
        if collateral_asset == borrower_claims.identity() || collateral_asset == lender_claims.identity() {
            return Err(invalid("claim tokens cannot be collateral"));
        }

        let mut last_id = self.last_id.lock();
        let loan_id = *last_id + 1;
        borrower_claims.mint(self.custody, request.claim_recipient, loan_id)?;

        let custody = TransferBatch::new().collateral(request.collateral, caller, self.custody);
        if let Err(e) = self.assets.settle(&custody) {
            self.revoke(borrower_claims.as_ref(), loan_id);
            return Err(e.into());
        }

        let terms = Terms::new(request.max_rate, request.min_duration_secs, request.min_principal);
        let loan = Loan::propose(loan_id, terms, request.collateral, request.loan_asset);
        self.loans.write().insert(loan_id, Arc::new(Mutex::new(loan)));
        *last_id = loan_id;
        drop(last_id);

        info!(%loan_id, minter = %caller, max_rate = %request.max_rate, min_principal = request.min_principal, "loan created");
        self.events.lock().emit(Event::LoanCreated {
            loan_id,
            minter: caller,
            collateral: request.collateral,
            loan_asset: request.loan_asset,
            max_rate: request.max_rate,
            min_principal: request.min_principal,
            min_duration_secs: request.min_duration_secs,
            timestamp: time.now(),
        });

        Ok(loan_id)
    }

    /// withdraw an unfunded loan and release the collateral
    pub fn cancel_loan(
        &self,
        caller: Address,
        loan_id: LoanId,
        collateral_recipient: Address,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        self.cancel_loan_inner(caller, loan_id, collateral_recipient, time)
            .inspect_err(|e| warn!(operation = "cancel", %loan_id, %caller, error = %e, "rejected"))
    }

    fn cancel_loan_inner(
        &self,
        caller: Address,
        loan_id: LoanId,
        collateral_recipient: Address,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        let (borrower_claims, _) = self.registries()?;
        let record = self.record(loan_id)?;
        let mut loan = record.lock();

        let phase = loan.phase;
        if phase != LoanPhase::Proposed {
            return Err(wrong_phase(loan_id, phase, "proposed"));
        }
        require_holder(borrower_claims.as_ref(), loan_id, caller)?;

        let release = TransferBatch::new().collateral(loan.collateral, self.custody, collateral_recipient);
        self.assets.settle(&release)?;
        loan.close();

        info!(%loan_id, recipient = %collateral_recipient, "loan cancelled");
        self.events.lock().emit(Event::LoanClosed {
            loan_id,
            collateral_recipient,
            timestamp: time.now(),
        });
        Ok(())
    }

    /// underwrite a proposed loan, or buy out the current lender with better terms
    pub fn fund(
        &self,
        caller: Address,
        loan_id: LoanId,
        offer: FundingOffer,
        time: &SafeTimeProvider,
    ) -> Result<Funding> {
        self.fund_inner(caller, loan_id, offer, time)
            .inspect_err(|e| warn!(operation = "fund", %loan_id, %caller, error = %e, "rejected"))
    }

    fn fund_inner(
        &self,
        caller: Address,
        loan_id: LoanId,
        offer: FundingOffer,
        time: &SafeTimeProvider,
    ) -> Result<Funding> {
        if offer.claim_recipient.is_nil() {
            return Err(invalid("claim recipient must be set"));
        }
        if offer.rate > Rate::MAX_LOAN_RATE {
            return Err(invalid("rate exceeds 16 bits"));
        }
        let record = self.record(loan_id)?;
        let mut loan = record.lock();

        let phase = loan.phase;
        match phase {
            LoanPhase::Closed { .. } => Err(wrong_phase(loan_id, phase, "open")),
            LoanPhase::Proposed => self
                .underwrite(&mut loan, caller, offer, time)
                .map(Funding::Underwritten),
            LoanPhase::Funded { .. } => self.buyout(&mut loan, caller, offer, time),
        }
    }

    fn underwrite(
        &self,
        loan: &mut Loan,
        lender: Address,
        offer: FundingOffer,
        time: &SafeTimeProvider,
    ) -> Result<Settlement> {
        let (borrower_claims, lender_claims) = self.registries()?;
        let proposed = offer.terms();
        ImprovementPolicy::check_underwriting(&loan.terms, &proposed)?;

        let now = unix_seconds(time)?;
        let borrower = holder(borrower_claims.as_ref(), loan.id)?;
        let engine = self.settlement_engine();
        let settlement = engine.underwrite(loan.loan_asset, lender, borrower, proposed.principal)?;

        lender_claims.mint(self.custody, offer.claim_recipient, loan.id)?;
        if let Err(e) = self.assets.settle(&settlement.batch) {
            self.revoke(lender_claims.as_ref(), loan.id);
            return Err(e.into());
        }

        loan.fund(proposed, 0, now);
        self.retain_fee(loan.loan_asset, settlement.fee);

        info!(
            loan_id = %loan.id,
            %lender,
            rate = %proposed.rate,
            principal = proposed.principal,
            duration_secs = proposed.duration_secs,
            "loan underwritten"
        );
        self.events.lock().emit(Event::LoanUnderwritten {
            loan_id: loan.id,
            lender: offer.claim_recipient,
            terms: proposed,
            borrower_payout: settlement.borrower_payout,
            fee: settlement.fee,
            timestamp: time.now(),
        });
        Ok(settlement)
    }

    fn buyout(
        &self,
        loan: &mut Loan,
        new_lender: Address,
        offer: FundingOffer,
        time: &SafeTimeProvider,
    ) -> Result<Funding> {
        let (borrower_claims, lender_claims) = self.registries()?;
        let proposed = offer.terms();
        let config = self.config();

        let admission = ImprovementPolicy::new(config.improvement_rate).admit(&loan.terms, &proposed)?;

        let now = unix_seconds(time)?;
        let interest = self
            .accrual
            .accrue_loan(loan, now)
            .ok_or_else(|| wrong_phase(loan.id, loan.phase, "funded"))?
            .checked_total()?;

        let previous_lender = holder(lender_claims.as_ref(), loan.id)?;
        let borrower = holder(borrower_claims.as_ref(), loan.id)?;
        let settlement = self.settlement_engine().buyout(
            loan.loan_asset,
            new_lender,
            previous_lender,
            borrower,
            loan.principal(),
            admission.principal_increase,
            interest,
        )?;

        lender_claims.force_transfer(self.custody, previous_lender, offer.claim_recipient, loan.id)?;
        if let Err(e) = self.assets.settle(&settlement.batch) {
            if let Err(rollback) =
                lender_claims.force_transfer(self.custody, offer.claim_recipient, previous_lender, loan.id)
            {
                error!(loan_id = %loan.id, error = %rollback, "lender claim rollback failed");
            }
            return Err(e.into());
        }

        loan.fund(proposed, interest, now);
        self.retain_fee(loan.loan_asset, settlement.fee);

        info!(
            loan_id = %loan.id,
            %new_lender,
            %previous_lender,
            rate = %proposed.rate,
            principal = proposed.principal,
            duration_secs = proposed.duration_secs,
            interest,
            "lender bought out"
        );
        self.events.lock().emit(Event::LenderBoughtOut {
            loan_id: loan.id,
            new_lender: offer.claim_recipient,
            previous_lender,
            terms: proposed,
            interest_paid: interest,
            principal_repaid: settlement.lender_payout - interest,
            borrower_payout: settlement.borrower_payout,
            fee: settlement.fee,
            timestamp: time.now(),
        });

        Ok(Funding::BoughtOut {
            previous_lender,
            settlement,
        })
    }

    /// pay principal plus interest to the lender and release the collateral
    /// to the borrower; anyone may repay
    pub fn repay_and_close(
        &self,
        caller: Address,
        loan_id: LoanId,
        time: &SafeTimeProvider,
    ) -> Result<Settlement> {
        self.repay_inner(caller, loan_id, time)
            .inspect_err(|e| warn!(operation = "repay", %loan_id, %caller, error = %e, "rejected"))
    }

    fn repay_inner(&self, caller: Address, loan_id: LoanId, time: &SafeTimeProvider) -> Result<Settlement> {
        let (borrower_claims, lender_claims) = self.registries()?;
        let record = self.record(loan_id)?;
        let mut loan = record.lock();

        let interest = self
            .accrual
            .accrue_loan(&loan, unix_seconds(time)?)
            .ok_or_else(|| wrong_phase(loan_id, loan.phase, "funded"))?
            .checked_total()?;

        let lender = holder(lender_claims.as_ref(), loan_id)?;
        let borrower = holder(borrower_claims.as_ref(), loan_id)?;
        let mut settlement =
            self.settlement_engine()
                .repay(loan.loan_asset, caller, lender, loan.principal(), interest)?;
        settlement.batch = settlement.batch.collateral(loan.collateral, self.custody, borrower);

        self.assets.settle(&settlement.batch)?;
        loan.close();

        info!(%loan_id, repayer = %caller, %lender, interest, total = settlement.pulled, "loan repaid");
        self.events.lock().emit(Event::LoanRepaid {
            loan_id,
            repayer: caller,
            lender,
            interest,
            total: settlement.pulled,
            timestamp: time.now(),
        });
        Ok(settlement)
    }

    /// lender takes the collateral once the loan is past due
    pub fn seize_collateral(
        &self,
        caller: Address,
        loan_id: LoanId,
        collateral_recipient: Address,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        self.seize_inner(caller, loan_id, collateral_recipient, time)
            .inspect_err(|e| warn!(operation = "seize", %loan_id, %caller, error = %e, "rejected"))
    }

    fn seize_inner(
        &self,
        caller: Address,
        loan_id: LoanId,
        collateral_recipient: Address,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        let (_, lender_claims) = self.registries()?;
        let record = self.record(loan_id)?;
        let mut loan = record.lock();

        let end = match (loan.phase, loan.end_seconds()) {
            (LoanPhase::Funded { .. }, Some(end)) => end,
            (phase, _) => return Err(wrong_phase(loan_id, phase, "funded")),
        };
        require_holder(lender_claims.as_ref(), loan_id, caller)?;

        let now = unix_seconds(time)?;
        if now <= end {
            return Err(LedgerError::InvalidState {
                loan_id,
                current: format!("due at {}", end),
                expected: "past due".to_string(),
            });
        }

        let release = TransferBatch::new().collateral(loan.collateral, self.custody, collateral_recipient);
        self.assets.settle(&release)?;
        loan.close();

        info!(%loan_id, lender = %caller, recipient = %collateral_recipient, "collateral seized");
        self.events.lock().emit(Event::CollateralSeized {
            loan_id,
            lender: caller,
            collateral_recipient,
            timestamp: time.now(),
        });
        Ok(())
    }

    // ---- administration --------------------------------------------------

    /// wire a claim registry; each kind can be set exactly once
    pub fn register_registry(&self, caller: Address, registry: Arc<dyn ClaimRegistry>) -> Result<()> {
        self.require_owner(caller)?;
        if registry.identity().is_nil() {
            return Err(invalid("registry identity must be set"));
        }
        let kind = registry.kind();
        let slot = match kind {
            ClaimKind::Borrower => &self.registries.borrower,
            ClaimKind::Lender => &self.registries.lender,
        };
        slot.set(registry)
            .map_err(|_| LedgerError::RegistryAlreadySet { kind })?;

        info!(%kind, "claim registry registered");
        self.events.lock().emit(Event::RegistryRegistered { kind });
        Ok(())
    }

    pub fn set_fee_rate(&self, caller: Address, rate: Rate) -> Result<()> {
        self.require_owner(caller)?;
        validate_fee_rate(rate)?;
        let old_rate = std::mem::replace(&mut self.config.write().fee_rate, rate);

        info!(%old_rate, new_rate = %rate, "fee rate updated");
        self.events.lock().emit(Event::FeeRateUpdated {
            old_rate,
            new_rate: rate,
        });
        Ok(())
    }

    pub fn set_improvement_rate(&self, caller: Address, rate: Rate) -> Result<()> {
        self.require_owner(caller)?;
        validate_improvement_rate(rate)?;
        let old_rate = std::mem::replace(&mut self.config.write().improvement_rate, rate);

        info!(%old_rate, new_rate = %rate, "improvement rate updated");
        self.events.lock().emit(Event::ImprovementRateUpdated {
            old_rate,
            new_rate: rate,
        });
        Ok(())
    }

    /// send retained origination fees of `asset` to `recipient`
    pub fn withdraw_fees(
        &self,
        caller: Address,
        asset: AssetId,
        amount: Amount,
        recipient: Address,
    ) -> Result<()> {
        self.require_owner(caller)?;
        let mut fees = self.fees.lock();
        let available = fees.get(&asset).copied().unwrap_or(0);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFees {
                asset,
                available,
                requested: amount,
            })?;

        self.assets
            .settle(&TransferBatch::new().fungible(asset, self.custody, recipient, amount))?;
        fees.insert(asset, remaining);

        info!(%asset, amount, %recipient, "fees withdrawn");
        self.events.lock().emit(Event::FeesWithdrawn {
            asset,
            amount,
            recipient,
        });
        Ok(())
    }

    // ---- queries ---------------------------------------------------------

    /// snapshot of a loan record
    pub fn loan(&self, loan_id: LoanId) -> Result<Loan> {
        Ok(self.record(loan_id)?.lock().clone())
    }

    /// number of loan ids allocated so far
    pub fn loan_count(&self) -> u64 {
        *self.last_id.lock()
    }

    /// interest owed now; zero for closed or unfunded loans
    pub fn interest_owed(&self, loan_id: LoanId, time: &SafeTimeProvider) -> Result<Amount> {
        let loan = self.loan(loan_id)?;
        self.interest_owed_at(&loan, unix_seconds(time)?)
    }

    /// principal plus interest owed now; zero for closed or unfunded loans
    pub fn total_owed(&self, loan_id: LoanId, time: &SafeTimeProvider) -> Result<Amount> {
        let loan = self.loan(loan_id)?;
        self.total_owed_at(&loan, unix_seconds(time)?)
    }

    /// expiry in unix seconds, once funded
    pub fn loan_end_seconds(&self, loan_id: LoanId) -> Result<Option<u64>> {
        Ok(self.loan(loan_id)?.end_seconds())
    }

    pub fn loan_end(&self, loan_id: LoanId) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .loan_end_seconds(loan_id)?
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single()))
    }

    /// whether the lender could seize the collateral now
    pub fn is_seizable(&self, loan_id: LoanId, time: &SafeTimeProvider) -> Result<bool> {
        let loan = self.loan(loan_id)?;
        let now = unix_seconds(time)?;
        Ok(loan.is_funded() && loan.end_seconds().is_some_and(|end| now > end))
    }

    /// origination fees of `asset` available for withdrawal
    pub fn accrued_fees(&self, asset: AssetId) -> Amount {
        self.fees.lock().get(&asset).copied().unwrap_or(0)
    }

    pub fn borrower_of(&self, loan_id: LoanId) -> Result<Option<Address>> {
        let (borrower_claims, _) = self.registries()?;
        Ok(borrower_claims.owner_of(loan_id))
    }

    pub fn lender_of(&self, loan_id: LoanId) -> Result<Option<Address>> {
        let (_, lender_claims) = self.registries()?;
        Ok(lender_claims.owner_of(loan_id))
    }

    /// serializable view with live interest figures
    pub fn view(&self, loan_id: LoanId, time: &SafeTimeProvider) -> Result<LoanView> {
        let loan = self.loan(loan_id)?;
        let now = unix_seconds(time)?;
        let interest_owed = self.interest_owed_at(&loan, now)?;
        let total_owed = self.total_owed_at(&loan, now)?;
        Ok(LoanView::from_loan(&loan, interest_owed, total_owed))
    }

    pub fn take_events(&self) -> Vec<Event> {
        self.events.lock().take_events()
    }

    pub fn events_for(&self, loan_id: LoanId) -> Vec<Event> {
        self.events
            .lock()
            .for_loan(loan_id)
            .into_iter()
            .cloned()
            .collect()
    }

    // ---- internals -------------------------------------------------------

    fn interest_owed_at(&self, loan: &Loan, now: u64) -> Result<Amount> {
        match self.accrual.accrue_loan(loan, now) {
            Some(accrual) => accrual.checked_total(),
            None => Ok(0),
        }
    }

    fn total_owed_at(&self, loan: &Loan, now: u64) -> Result<Amount> {
        if !loan.is_funded() {
            return Ok(0);
        }
        self.interest_owed_at(loan, now)?
            .checked_add(loan.principal())
            .ok_or_else(|| LedgerError::overflow("total owed"))
    }

    fn record(&self, loan_id: LoanId) -> Result<Arc<Mutex<Loan>>> {
        self.loans
            .read()
            .get(&loan_id)
            .cloned()
            .ok_or(LedgerError::UnknownLoan { loan_id })
    }

    fn registries(&self) -> Result<(&Arc<dyn ClaimRegistry>, &Arc<dyn ClaimRegistry>)> {
        match (self.registries.borrower.get(), self.registries.lender.get()) {
            (Some(borrower), Some(lender)) => Ok((borrower, lender)),
            _ => Err(LedgerError::RegistriesNotSet),
        }
    }

    // undo a mint whose asset settlement was rejected
    fn revoke(&self, registry: &dyn ClaimRegistry, loan_id: LoanId) {
        if let Err(e) = registry.burn(self.custody, loan_id) {
            error!(%loan_id, kind = %registry.kind(), error = %e, "claim rollback failed");
        }
    }

    fn settlement_engine(&self) -> SettlementEngine {
        SettlementEngine::new(self.config().fee_rate, self.custody)
    }

    // retained fees never exceed the custody balance the asset book accepted
    fn retain_fee(&self, asset: AssetId, fee: Amount) {
        if fee > 0 {
            let mut fees = self.fees.lock();
            let balance = fees.entry(asset).or_insert(0);
            *balance = balance.saturating_add(fee);
        }
    }

    fn require_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(LedgerError::Unauthorized {
                caller,
                required: "the ledger owner".to_string(),
            });
        }
        Ok(())
    }
}

fn unix_seconds(time: &SafeTimeProvider) -> Result<u64> {
    let now = time.now();
    u64::try_from(now.timestamp()).map_err(|_| LedgerError::InvalidParameters {
        message: format!("clock reads {} which is before the unix epoch", now),
    })
}

fn invalid(message: &str) -> LedgerError {
    LedgerError::InvalidParameters {
        message: message.to_string(),
    }
}

fn wrong_phase(loan_id: LoanId, phase: LoanPhase, expected: &str) -> LedgerError {
    LedgerError::InvalidState {
        loan_id,
        current: phase.to_string(),
        expected: expected.to_string(),
    }
}

fn holder(registry: &dyn ClaimRegistry, loan_id: LoanId) -> Result<Address> {
    registry.owner_of(loan_id).ok_or_else(|| {
        TransferError::NonexistentClaim {
            kind: registry.kind(),
            loan_id,
        }
        .into()
    })
}

fn require_holder(registry: &dyn ClaimRegistry, loan_id: LoanId, caller: Address) -> Result<()> {
    if registry.owner_of(loan_id) != Some(caller) {
        return Err(LedgerError::Unauthorized {
            caller,
            required: format!("the {} claim holder of loan {}", registry.kind(), loan_id),
        });
    }
    Ok(())
}

//! # PreSale Engine
//!
//! In-memory sale orchestrating timing, caps, whitelist tiers, the fee
//! penalty, fund routing and settlement.
//!
//! ## Atomicity
//!
//! Operations that touch the books (sale state, stake ledger, vault,
//! whitelist) run against a draft copy that replaces the live books only
//! when the whole operation succeeded. Config setters build a candidate
//! config and swap it in after validation. A failed call leaves no trace.
//!
//! ## Funds
//!
//! The engine never moves value. Every outgoing transfer is returned as a
//! [`Payout`] for the host to execute as part of the same call.

use std::collections::VecDeque;

use log::{debug, info};

use crate::clock::Clock;
use crate::config::{CapsUpdate, SaleConfig};
use crate::constants::MAX_EVENTS;
use crate::contribution::{quote_contribution, ContributionRequest, Route, SaleTotals};
use crate::errors::{ConfigViolation, PresaleError, PresaleResult};
use crate::events::{ConfigChange, SaleEvent};
use crate::ledger::StakeLedger;
use crate::math::tokens_for_value;
use crate::phase::{check_claimable, check_refundable, has_ended, SalePhase, SoftCapLatch};
use crate::receipts::{ClaimReceipt, ContributionReceipt, FinalizeReceipt, Payout};
use crate::types::{Address, Amount, Asset, Timestamp};
use crate::vault::{EscrowVault, VaultState};
use crate::whitelist::Whitelist;

/// Mutable sale totals
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleState {
    pub total_raised: Amount,
    pub soft_cap: SoftCapLatch,
    pub finalized: bool,
}

impl SaleState {
    pub fn cap_reached_at(&self) -> Option<Timestamp> {
        self.soft_cap.reached_at()
    }

    pub fn totals(&self) -> SaleTotals {
        SaleTotals {
            total_raised: self.total_raised,
            cap_reached_at: self.cap_reached_at(),
        }
    }
}

/// Read-only summary of a sale
#[cfg_attr(feature = "client", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleSnapshot {
    pub now: Timestamp,
    pub phase: SalePhase,
    pub owner: Address,
    pub config_version: u32,
    pub total_raised: Amount,
    pub goal_reached: bool,
    pub cap_reached_at: Option<Timestamp>,
    pub has_ended: bool,
    pub finalized: bool,
    pub vault_state: VaultState,
    pub vault_balance: Amount,
    pub total_credited: Amount,
    pub stake_holders: usize,
    pub whitelist_entries: usize,
    pub whitelist_day_count: u32,
}

/// Everything a single operation may change
#[derive(Debug, Clone, Default)]
struct Books {
    state: SaleState,
    ledger: StakeLedger,
    vault: EscrowVault,
    whitelist: Whitelist,
}

type Outcome<T> = PresaleResult<(T, Vec<SaleEvent>)>;

pub struct PreSale<C: Clock> {
    clock: C,
    owner: Address,
    config: SaleConfig,
    config_version: u32,
    books: Books,
    events: VecDeque<SaleEvent>,
}

impl<C: Clock> PreSale<C> {
    /// Create a sale in the `Pending` phase
    pub fn new(owner: Address, config: SaleConfig, clock: C) -> PresaleResult<Self> {
        if owner.is_zero() {
            return Err(ConfigViolation::ZeroOwnerAddress.into());
        }
        config.validate(clock.unix_timestamp())?;
        info!(
            "Presale created: start={} end={} goal={} soft_cap={} cap={}",
            config.start_time, config.end_time, config.goal, config.soft_cap, config.cap
        );
        Ok(Self {
            clock,
            owner,
            config,
            config_version: 0,
            books: Books::default(),
            events: VecDeque::new(),
        })
    }

    // ========================================================================
    // Admin Operations
    // ========================================================================

    pub fn set_caps(&mut self, caller: &Address, caps: CapsUpdate) -> PresaleResult<()> {
        self.update_config(caller, ConfigChange::Caps, |config| config.with_caps(caps))
    }

    pub fn set_times(
        &mut self,
        caller: &Address,
        start_time: Timestamp,
        end_time: Timestamp,
    ) -> PresaleResult<()> {
        self.update_config(caller, ConfigChange::Times, |config| {
            config.with_times(start_time, end_time)
        })
    }

    pub fn set_rate(&mut self, caller: &Address, rate: u64) -> PresaleResult<()> {
        self.update_config(caller, ConfigChange::Rate, |config| config.with_rate(rate))
    }

    /// Add, then remove, then replace the day table. An empty `day_limits`
    /// keeps the current table.
    pub fn set_whitelist(
        &mut self,
        caller: &Address,
        add: &[Address],
        remove: &[Address],
        day_limits: Vec<Amount>,
    ) -> PresaleResult<()> {
        self.require_owner(caller)?;
        self.require_not_started()?;
        self.transact(|books, _, _| {
            books.whitelist.apply(add, remove, day_limits)?;
            let event = SaleEvent::WhitelistUpdated {
                added: add.len(),
                removed: remove.len(),
                day_count: books.whitelist.day_count(),
            };
            Ok(((), vec![event]))
        })?;
        info!(
            "Whitelist updated: {} entries, {} gated days",
            self.books.whitelist.enabled_count(),
            self.books.whitelist.day_count()
        );
        Ok(())
    }

    /// Close the sale. Goal met releases the vault to the wallet, otherwise
    /// the vault starts refunding.
    pub fn finalize(&mut self, caller: &Address) -> PresaleResult<FinalizeReceipt> {
        self.require_owner(caller)?;
        let phase = self.phase();
        if !phase.can_transition_to(SalePhase::Finalized) {
            return Err(match phase {
                SalePhase::Finalized => PresaleError::AlreadyFinalized,
                _ => PresaleError::NotEnded,
            });
        }

        let receipt = self.transact(|books, config, _| {
            let goal_reached = books.state.total_raised >= config.goal;
            let released = if goal_reached {
                books.vault.release_all()?
            } else {
                books.vault.close_for_refunds()?;
                0
            };
            books.state.finalized = true;

            let payout = (released > 0).then_some(Payout::Native {
                to: config.wallet,
                amount: released,
            });
            let event = SaleEvent::Finalized {
                goal_reached,
                total_raised: books.state.total_raised,
                released,
            };
            Ok((
                FinalizeReceipt {
                    goal_reached,
                    released,
                    payout,
                },
                vec![event],
            ))
        })?;

        info!(
            "Presale finalized: goal_reached={} total_raised={} released={}",
            receipt.goal_reached, self.books.state.total_raised, receipt.released
        );
        Ok(receipt)
    }

    /// Sweep native escrow or a foreign token balance once the goal is met
    pub fn extract_vault_funds(
        &mut self,
        caller: &Address,
        asset: Asset,
        to: Address,
    ) -> PresaleResult<Payout> {
        self.require_owner(caller)?;
        let payout = self.transact(|books, config, _| {
            if books.state.total_raised < config.goal {
                return Err(PresaleError::GoalNotMet);
            }
            let (payout, amount) = match asset {
                Asset::Native => {
                    let amount = books.vault.release_all()?;
                    (Payout::Native { to, amount }, Some(amount))
                }
                Asset::Token(mint) => (Payout::Foreign { asset: mint, to }, None),
            };
            Ok((payout, vec![SaleEvent::FundsExtracted { asset, to, amount }]))
        })?;
        info!("Vault funds extracted: {:?}", payout);
        Ok(payout)
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> PresaleResult<()> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(ConfigViolation::ZeroOwnerAddress.into());
        }
        let previous = std::mem::replace(&mut self.owner, new_owner);
        self.record(vec![SaleEvent::OwnershipTransferred {
            previous,
            new_owner,
        }]);
        info!("Ownership transferred from {} to {}", previous, new_owner);
        Ok(())
    }

    // ========================================================================
    // Contributions
    // ========================================================================

    /// Contribute `value` from `sender`, crediting stake to `beneficiary`
    pub fn contribute(
        &mut self,
        sender: Address,
        beneficiary: Address,
        value: Amount,
        fee_rate: u64,
    ) -> PresaleResult<ContributionReceipt> {
        let receipt = self.transact(|books, config, now| {
            let request = ContributionRequest {
                value,
                fee_rate,
                beneficiary_enabled: books.whitelist.is_enabled(&beneficiary),
                prior_credited: books.ledger.stake(&beneficiary),
            };
            let quote = quote_contribution(
                config,
                books.whitelist.limits(),
                books.state.totals(),
                request,
                now,
            )
            .inspect_err(|err| debug!("Contribution of {} from {} rejected: {}", value, sender, err))?;
            debug!("Contribution quote: {:?}", quote);

            let mut events = Vec::with_capacity(2);
            let mut payouts = Vec::with_capacity(2);

            if quote.refunded > 0 {
                payouts.push(Payout::Native {
                    to: sender,
                    amount: quote.refunded,
                });
            }

            books.ledger.credit(beneficiary, quote.credited)?;
            books.state.total_raised = quote.total_after;

            if books
                .state
                .soft_cap
                .latch(quote.total_after, config.soft_cap, now)
            {
                info!("Soft cap reached: total_raised={} at={}", quote.total_after, now);
                events.push(SaleEvent::SoftCapReached {
                    total_raised: quote.total_after,
                    at: now,
                });
            }

            match quote.route {
                Route::Wallet => payouts.push(Payout::Native {
                    to: config.wallet,
                    amount: quote.accepted,
                }),
                Route::Vault => books.vault.deposit(sender, quote.accepted)?,
            }

            let purchase = SaleEvent::TokenPurchase {
                purchaser: sender,
                beneficiary,
                value: quote.accepted,
                amount: quote.tokens,
            };
            events.insert(0, purchase.clone());

            Ok((
                ContributionReceipt {
                    accepted: quote.accepted,
                    refunded: quote.refunded,
                    credited: quote.credited,
                    route: quote.route,
                    event: purchase,
                    payouts,
                },
                events,
            ))
        })?;

        info!(
            "Token purchase: purchaser={} beneficiary={} accepted={} credited={} refunded={} route={:?}",
            sender, beneficiary, receipt.accepted, receipt.credited, receipt.refunded, receipt.route
        );
        Ok(receipt)
    }

    /// Contribute on one's own behalf
    pub fn buy(&mut self, sender: Address, value: Amount, fee_rate: u64) -> PresaleResult<ContributionReceipt> {
        self.contribute(sender, sender, value, fee_rate)
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Pay back everything `purchaser` deposited into escrow
    pub fn claim_refund(&mut self, purchaser: &Address) -> PresaleResult<ClaimReceipt> {
        self.require_refundable()?;
        let receipt = self.transact(|books, _, _| {
            let receipt = refund_one(&mut books.vault, purchaser)?;
            let event = SaleEvent::Refunded {
                purchaser: *purchaser,
                amount: receipt.amount,
            };
            Ok((receipt, vec![event]))
        })?;
        info!("Refunded {} to {}", receipt.amount, purchaser);
        Ok(receipt)
    }

    /// Refund several purchasers at once, skipping those owed nothing
    pub fn claim_refunds_for(&mut self, purchasers: &[Address]) -> PresaleResult<Vec<ClaimReceipt>> {
        self.require_refundable()?;
        let receipts = self.transact(|books, _, _| {
            let mut receipts = Vec::new();
            let mut events = Vec::new();
            for purchaser in purchasers {
                if books.vault.deposited(purchaser) == 0 {
                    continue;
                }
                let receipt = refund_one(&mut books.vault, purchaser)?;
                events.push(SaleEvent::Refunded {
                    purchaser: *purchaser,
                    amount: receipt.amount,
                });
                receipts.push(receipt);
            }
            if receipts.is_empty() {
                return Err(PresaleError::NothingToRefund);
            }
            Ok((receipts, events))
        })?;
        info!("Batch refund settled {} purchasers", receipts.len());
        Ok(receipts)
    }

    /// Redeem the credited stake of `beneficiary` for tokens
    pub fn claim_token(&mut self, beneficiary: &Address) -> PresaleResult<ClaimReceipt> {
        self.require_claimable()?;
        let receipt = self.transact(|books, config, _| {
            let (receipt, event) = claim_one(&mut books.ledger, config, beneficiary)?;
            Ok((receipt, vec![event]))
        })?;
        info!("Tokens claimed by {}: stake={}", beneficiary, receipt.amount);
        Ok(receipt)
    }

    /// Redeem several beneficiaries at once, skipping those without stake
    pub fn claim_tokens_for(&mut self, beneficiaries: &[Address]) -> PresaleResult<Vec<ClaimReceipt>> {
        self.require_claimable()?;
        let receipts = self.transact(|books, config, _| {
            let mut receipts = Vec::new();
            let mut events = Vec::new();
            for beneficiary in beneficiaries {
                if books.ledger.stake(beneficiary) == 0 {
                    continue;
                }
                let (receipt, event) = claim_one(&mut books.ledger, config, beneficiary)?;
                receipts.push(receipt);
                events.push(event);
            }
            if receipts.is_empty() {
                return Err(PresaleError::NothingToClaim);
            }
            Ok((receipts, events))
        })?;
        info!("Batch token claim settled {} beneficiaries", receipts.len());
        Ok(receipts)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn now(&self) -> Timestamp {
        self.clock.unix_timestamp()
    }

    pub fn has_ended(&self) -> bool {
        has_ended(&self.config, self.books.state.cap_reached_at(), self.now())
    }

    pub fn phase(&self) -> SalePhase {
        SalePhase::at(
            &self.config,
            self.books.state.cap_reached_at(),
            self.books.state.finalized,
            self.now(),
        )
    }

    /// Credited stake of `beneficiary`
    pub fn stakes(&self, beneficiary: &Address) -> Amount {
        self.books.ledger.stake(beneficiary)
    }

    /// Whether `address` is on the whitelist
    pub fn whitelist(&self, address: &Address) -> bool {
        self.books.whitelist.is_enabled(address)
    }

    pub fn whitelist_day_count(&self) -> u32 {
        self.books.whitelist.day_count()
    }

    pub fn whitelist_day_max_stake(&self, day: u32) -> Amount {
        self.books.whitelist.day_max_stake(day)
    }

    pub fn vault(&self) -> &EscrowVault {
        &self.books.vault
    }

    pub fn ledger(&self) -> &StakeLedger {
        &self.books.ledger
    }

    pub fn state(&self) -> &SaleState {
        &self.books.state
    }

    pub fn config(&self) -> &SaleConfig {
        &self.config
    }

    pub fn config_version(&self) -> u32 {
        self.config_version
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn total_raised(&self) -> Amount {
        self.books.state.total_raised
    }

    pub fn goal_reached(&self) -> bool {
        self.books.state.total_raised >= self.config.goal
    }

    /// Most recent events first, at most `limit`
    pub fn events(&self, limit: usize) -> Vec<SaleEvent> {
        self.events.iter().rev().take(limit).cloned().collect()
    }

    pub fn snapshot(&self) -> SaleSnapshot {
        SaleSnapshot {
            now: self.now(),
            phase: self.phase(),
            owner: self.owner,
            config_version: self.config_version,
            total_raised: self.books.state.total_raised,
            goal_reached: self.goal_reached(),
            cap_reached_at: self.books.state.cap_reached_at(),
            has_ended: self.has_ended(),
            finalized: self.books.state.finalized,
            vault_state: self.books.vault.state(),
            vault_balance: self.books.vault.balance(),
            total_credited: self.books.ledger.total_credited(),
            stake_holders: self.books.ledger.holders(),
            whitelist_entries: self.books.whitelist.enabled_count(),
            whitelist_day_count: self.books.whitelist.day_count(),
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn require_owner(&self, caller: &Address) -> PresaleResult<()> {
        if *caller != self.owner {
            return Err(PresaleError::Unauthorized);
        }
        Ok(())
    }

    fn require_not_started(&self) -> PresaleResult<()> {
        if !self.phase().allows_configuration() {
            return Err(PresaleError::SaleAlreadyStarted);
        }
        Ok(())
    }

    /// Ended, goal missed, finalized
    fn require_refundable(&self) -> PresaleResult<()> {
        check_refundable(self.has_ended(), self.goal_reached(), self.books.state.finalized)
    }

    /// Ended, goal met, finalized
    fn require_claimable(&self) -> PresaleResult<()> {
        check_claimable(self.has_ended(), self.goal_reached(), self.books.state.finalized)
    }

    fn update_config(
        &mut self,
        caller: &Address,
        change: ConfigChange,
        build: impl FnOnce(&SaleConfig) -> SaleConfig,
    ) -> PresaleResult<()> {
        self.require_owner(caller)?;
        self.require_not_started()?;
        let now = self.now();
        let candidate = build(&self.config);
        candidate.validate(now)?;

        self.config = candidate;
        self.config_version = self.config_version.saturating_add(1);
        self.record(vec![SaleEvent::ConfigUpdated {
            change,
            version: self.config_version,
        }]);
        info!("Config updated ({:?}), version {}", change, self.config_version);
        Ok(())
    }

    /// Run `op` on a draft of the books and commit it only on success
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut Books, &SaleConfig, Timestamp) -> Outcome<T>,
    ) -> PresaleResult<T> {
        let now = self.now();
        let mut draft = self.books.clone();
        let (output, events) = op(&mut draft, &self.config, now)?;
        self.books = draft;
        self.record(events);
        Ok(output)
    }

    fn record(&mut self, events: Vec<SaleEvent>) {
        for event in events {
            if self.events.len() >= MAX_EVENTS {
                self.events.pop_front();
            }
            debug!("Sale event: {}", event.kind());
            self.events.push_back(event);
        }
    }
}

fn refund_one(vault: &mut EscrowVault, purchaser: &Address) -> PresaleResult<ClaimReceipt> {
    let amount = vault.refund(purchaser)?;
    Ok(ClaimReceipt {
        account: *purchaser,
        amount,
        payout: Payout::Native {
            to: *purchaser,
            amount,
        },
    })
}

fn claim_one(
    ledger: &mut StakeLedger,
    config: &SaleConfig,
    beneficiary: &Address,
) -> PresaleResult<(ClaimReceipt, SaleEvent)> {
    let stake = ledger.take(beneficiary)?;
    let tokens = tokens_for_value(stake, config.rate)?;
    let receipt = ClaimReceipt {
        account: *beneficiary,
        amount: stake,
        payout: Payout::Token {
            to: *beneficiary,
            amount: tokens,
        },
    };
    let event = SaleEvent::TokensClaimed {
        beneficiary: *beneficiary,
        stake,
        tokens,
    };
    Ok((receipt, event))
}

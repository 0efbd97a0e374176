//! Sale account
//!
//! Config, running totals, the whitelist day table and the native vault
//! status of one presale. The native vault is a separate system-owned PDA
//! pre-funded with its rent-exempt minimum, so `vault_balance` tracks the
//! escrowed value apart from the lamports the account holds.

use anchor_lang::prelude::*;
use meme_presale_core::math::{safe_add_u64, safe_sub_u64};
use meme_presale_core::{
    has_ended, ContributionQuote, PresaleError, PresaleResult, Route, SaleConfig, SalePhase,
    SaleTotals, SoftCapLatch,
};

use super::ledger::DepositAccount;
use crate::constants::MAX_WHITELIST_DAYS;
use crate::utils::{to_address, to_pubkey};

/// Settlement status of the native vault
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
#[repr(u8)]
pub enum VaultStatus {
    /// Accepting deposits
    #[default]
    Open = 0,
    /// Goal missed; purchasers withdraw their deposits
    Refunding = 1,
    /// Goal met; balance swept to the wallet
    Released = 2,
}

#[account]
#[derive(InitSpace)]
pub struct Sale {
    pub owner: Pubkey,
    pub token_mint: Pubkey,
    pub wallet: Pubkey,

    // Window
    pub start_time: i64,
    pub end_time: i64,

    // Pricing and limits
    pub min_contribution: u64,
    pub rate: u64,
    pub goal: u64,
    pub soft_cap: u64,
    pub soft_cap_extension: i64,
    pub cap: u64,
    pub max_fee_rate: u64,
    pub max_fee_penalty_percent: u8,
    pub config_version: u32,

    // Running totals
    pub total_raised: u64,
    pub cap_reached_at: Option<i64>,
    pub finalized: bool,

    // Native escrow
    pub vault_status: VaultStatus,
    pub vault_balance: u64,

    /// Cumulative stake ceilings for whitelist days 1..=len
    #[max_len(MAX_WHITELIST_DAYS)]
    pub day_limits: Vec<u64>,

    pub bump: u8,
    pub vault_bump: u8,
}

impl Sale {
    pub fn config(&self) -> SaleConfig {
        SaleConfig {
            start_time: self.start_time,
            end_time: self.end_time,
            min_contribution: self.min_contribution,
            rate: self.rate,
            goal: self.goal,
            soft_cap: self.soft_cap,
            soft_cap_extension: self.soft_cap_extension,
            cap: self.cap,
            max_fee_rate: self.max_fee_rate,
            max_fee_penalty_percent: self.max_fee_penalty_percent,
            wallet: to_address(&self.wallet),
            token: to_address(&self.token_mint),
        }
    }

    /// Copy a validated config into the account
    pub fn write_config(&mut self, config: &SaleConfig) {
        self.start_time = config.start_time;
        self.end_time = config.end_time;
        self.min_contribution = config.min_contribution;
        self.rate = config.rate;
        self.goal = config.goal;
        self.soft_cap = config.soft_cap;
        self.soft_cap_extension = config.soft_cap_extension;
        self.cap = config.cap;
        self.max_fee_rate = config.max_fee_rate;
        self.max_fee_penalty_percent = config.max_fee_penalty_percent;
        self.wallet = to_pubkey(&config.wallet);
        self.token_mint = to_pubkey(&config.token);
    }

    /// Validate `candidate` against `now` and install it
    pub fn replace_config(&mut self, candidate: SaleConfig, now: i64) -> PresaleResult<u32> {
        candidate.validate(now)?;
        self.write_config(&candidate);
        self.config_version = self.config_version.saturating_add(1);
        Ok(self.config_version)
    }

    pub fn totals(&self) -> SaleTotals {
        SaleTotals {
            total_raised: self.total_raised,
            cap_reached_at: self.cap_reached_at,
        }
    }

    /// Whether the owner may still change config and whitelist
    pub fn allows_configuration(&self, now: i64) -> bool {
        self.phase(now).allows_configuration()
    }

    pub fn has_ended(&self, now: i64) -> bool {
        has_ended(&self.config(), self.cap_reached_at, now)
    }

    pub fn phase(&self, now: i64) -> SalePhase {
        SalePhase::at(&self.config(), self.cap_reached_at, self.finalized, now)
    }

    pub fn goal_reached(&self) -> bool {
        self.total_raised >= self.goal
    }

    /// Book an accepted contribution. Returns true when it latched the
    /// soft cap.
    pub fn record_contribution(&mut self, quote: &ContributionQuote, now: i64) -> bool {
        self.total_raised = quote.total_after;
        let mut latch = SoftCapLatch::from(self.cap_reached_at);
        let reached = latch.latch(self.total_raised, self.soft_cap, now);
        self.cap_reached_at = latch.reached_at();
        reached
    }

    /// Escrow the accepted value of a vault-routed quote for its purchaser.
    /// Wallet-routed quotes leave the books untouched.
    pub fn book_deposit(
        &mut self,
        deposit: &mut DepositAccount,
        quote: &ContributionQuote,
    ) -> PresaleResult<()> {
        if quote.route != Route::Vault {
            return Ok(());
        }
        if self.vault_status != VaultStatus::Open {
            return Err(PresaleError::VaultClosed);
        }
        deposit.deposited = safe_add_u64(deposit.deposited, quote.accepted)?;
        self.vault_balance = safe_add_u64(self.vault_balance, quote.accepted)?;
        Ok(())
    }

    /// Empty the vault towards the wallet. Returns the escrowed value.
    pub fn release_vault(&mut self) -> PresaleResult<u64> {
        if self.vault_status == VaultStatus::Refunding {
            return Err(PresaleError::VaultClosed);
        }
        let released = std::mem::take(&mut self.vault_balance);
        self.vault_status = VaultStatus::Released;
        Ok(released)
    }

    /// Settle the vault at finalization: release it when the goal was
    /// reached, otherwise open it for refunds. Returns the released value.
    pub fn close_vault(&mut self, goal_reached: bool) -> PresaleResult<u64> {
        if goal_reached {
            return self.release_vault();
        }
        if self.vault_status != VaultStatus::Open {
            return Err(PresaleError::VaultClosed);
        }
        self.vault_status = VaultStatus::Refunding;
        Ok(0)
    }

    /// Pay back a purchaser's whole deposit from a refunding vault
    pub fn settle_refund(&mut self, deposit: &mut DepositAccount) -> PresaleResult<u64> {
        if self.vault_status != VaultStatus::Refunding {
            return Err(PresaleError::VaultNotRefunding);
        }
        let amount = deposit.deposited;
        if amount == 0 {
            return Err(PresaleError::NothingToRefund);
        }
        self.vault_balance = safe_sub_u64(self.vault_balance, amount)?;
        deposit.deposited = 0;
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meme_presale_core::{quote_contribution, ContributionRequest, DayLimits, Route};

    const ETHER: u64 = 1_000_000_000;

    fn sale() -> Sale {
        Sale {
            owner: Pubkey::new_unique(),
            token_mint: Pubkey::new_unique(),
            wallet: Pubkey::new_unique(),
            start_time: 1_000,
            end_time: 2_000,
            min_contribution: ETHER / 10,
            rate: 1_000,
            goal: 5 * ETHER,
            soft_cap: 10 * ETHER,
            soft_cap_extension: 100,
            cap: 15 * ETHER,
            max_fee_rate: 100,
            max_fee_penalty_percent: 80,
            config_version: 0,
            total_raised: 0,
            cap_reached_at: None,
            finalized: false,
            vault_status: VaultStatus::Open,
            vault_balance: 0,
            day_limits: Vec::new(),
            bump: 255,
            vault_bump: 254,
        }
    }

    fn quote(sale: &Sale, value: u64, now: i64) -> ContributionQuote {
        let request = ContributionRequest {
            value,
            fee_rate: 0,
            beneficiary_enabled: false,
            prior_credited: 0,
        };
        let limits = DayLimits::new(sale.day_limits.clone()).unwrap();
        quote_contribution(&sale.config(), &limits, sale.totals(), request, now).unwrap()
    }

    fn buy(sale: &mut Sale, value: u64, now: i64) -> bool {
        let quote = quote(sale, value, now);
        sale.record_contribution(&quote, now)
    }

    fn deposit() -> DepositAccount {
        DepositAccount {
            sale: Pubkey::new_unique(),
            purchaser: Pubkey::new_unique(),
            deposited: 0,
            bump: 253,
        }
    }

    /// Books and records a purchase the way `buy_tokens` does
    fn buy_into(sale: &mut Sale, deposit: &mut DepositAccount, value: u64, now: i64) -> Route {
        let quote = quote(sale, value, now);
        sale.book_deposit(deposit, &quote).unwrap();
        sale.record_contribution(&quote, now);
        quote.route
    }

    #[test]
    fn test_config_round_trips_through_account() {
        let mut account = sale();
        let config = account.config();
        account.write_config(&config);
        assert_eq!(account.config(), config);
        assert_eq!(to_pubkey(&config.wallet), account.wallet);
    }

    #[test]
    fn test_replace_config_bumps_version_only_when_valid() {
        let mut account = sale();
        let candidate = account.config().with_rate(2_000);
        assert_eq!(account.replace_config(candidate, 500), Ok(1));
        assert_eq!(account.rate, 2_000);

        let invalid = account.config().with_rate(0);
        assert!(account.replace_config(invalid, 500).is_err());
        assert_eq!(account.rate, 2_000);
        assert_eq!(account.config_version, 1);
    }

    #[test]
    fn test_soft_cap_latches_once_and_shortens_sale() {
        let mut account = sale();
        assert!(!buy(&mut account, 9 * ETHER, 1_100));
        assert!(buy(&mut account, 2 * ETHER, 1_200));
        assert_eq!(account.cap_reached_at, Some(1_200));
        assert!(!buy(&mut account, ETHER, 1_250));
        assert_eq!(account.cap_reached_at, Some(1_200));

        assert!(!account.has_ended(1_300));
        assert!(account.has_ended(1_301));
        assert_eq!(account.phase(1_301), SalePhase::Ended);
        assert!(account.goal_reached());
    }

    #[test]
    fn test_route_follows_goal() {
        let account = sale();
        let request = ContributionRequest {
            value: 5 * ETHER,
            fee_rate: 0,
            beneficiary_enabled: false,
            prior_credited: 0,
        };
        let quote = quote_contribution(
            &account.config(),
            &DayLimits::default(),
            account.totals(),
            request,
            1_000,
        )
        .unwrap();
        assert_eq!(quote.route, Route::Wallet);
    }

    #[test]
    fn test_deposit_booked_only_on_vault_route() {
        let mut account = sale();
        let mut alice = deposit();
        let mut bob = deposit();

        assert_eq!(buy_into(&mut account, &mut alice, 3 * ETHER, 1_100), Route::Vault);
        assert_eq!(alice.deposited, 3 * ETHER);
        assert_eq!(account.vault_balance, 3 * ETHER);

        // Goal is reached by this purchase, so it goes to the wallet
        assert_eq!(buy_into(&mut account, &mut bob, 2 * ETHER, 1_200), Route::Wallet);
        assert_eq!(bob.deposited, 0);
        assert_eq!(account.vault_balance, 3 * ETHER);
        assert_eq!(account.total_raised, 5 * ETHER);
    }

    #[test]
    fn test_book_deposit_requires_open_vault() {
        let mut account = sale();
        let mut alice = deposit();
        let pending = quote(&account, ETHER, 1_100);
        account.vault_status = VaultStatus::Refunding;
        assert_eq!(
            account.book_deposit(&mut alice, &pending),
            Err(PresaleError::VaultClosed)
        );
        assert_eq!(alice.deposited, 0);
        assert_eq!(account.vault_balance, 0);
    }

    #[test]
    fn test_extract_releases_vault() {
        let mut account = sale();
        let mut alice = deposit();
        buy_into(&mut account, &mut alice, 2 * ETHER, 1_100);

        assert_eq!(account.release_vault(), Ok(2 * ETHER));
        assert_eq!(account.vault_status, VaultStatus::Released);
        assert_eq!(account.vault_balance, 0);
        // A released vault can be emptied again, with nothing left in it
        assert_eq!(account.release_vault(), Ok(0));

        let mut refunding = sale();
        refunding.vault_status = VaultStatus::Refunding;
        refunding.vault_balance = ETHER;
        assert_eq!(refunding.release_vault(), Err(PresaleError::VaultClosed));
        assert_eq!(refunding.vault_balance, ETHER);
        assert_eq!(refunding.vault_status, VaultStatus::Refunding);
    }

    #[test]
    fn test_close_vault_follows_goal() {
        let mut reached = sale();
        reached.vault_balance = 4 * ETHER;
        assert_eq!(reached.close_vault(true), Ok(4 * ETHER));
        assert_eq!(reached.vault_status, VaultStatus::Released);
        assert_eq!(reached.vault_balance, 0);

        let mut missed = sale();
        missed.vault_balance = 4 * ETHER;
        assert_eq!(missed.close_vault(false), Ok(0));
        assert_eq!(missed.vault_status, VaultStatus::Refunding);
        assert_eq!(missed.vault_balance, 4 * ETHER);
    }

    #[test]
    fn test_close_vault_refuses_to_leave_refunding() {
        let mut account = sale();
        account.vault_status = VaultStatus::Refunding;
        account.vault_balance = ETHER;
        assert_eq!(account.close_vault(true), Err(PresaleError::VaultClosed));
        assert_eq!(account.close_vault(false), Err(PresaleError::VaultClosed));
        assert_eq!(account.vault_status, VaultStatus::Refunding);
        assert_eq!(account.vault_balance, ETHER);

        let mut released = sale();
        released.vault_status = VaultStatus::Released;
        assert_eq!(released.close_vault(false), Err(PresaleError::VaultClosed));
        assert_eq!(released.vault_status, VaultStatus::Released);
    }

    #[test]
    fn test_settle_refund_pays_back_whole_deposit() {
        let mut account = sale();
        let mut alice = deposit();
        let mut bob = deposit();
        buy_into(&mut account, &mut alice, 2 * ETHER, 1_100);
        buy_into(&mut account, &mut bob, ETHER, 1_200);

        assert_eq!(
            account.settle_refund(&mut alice),
            Err(PresaleError::VaultNotRefunding)
        );
        assert_eq!(account.close_vault(account.goal_reached()), Ok(0));

        assert_eq!(account.settle_refund(&mut alice), Ok(2 * ETHER));
        assert_eq!(alice.deposited, 0);
        assert_eq!(account.vault_balance, ETHER);
        assert_eq!(
            account.settle_refund(&mut alice),
            Err(PresaleError::NothingToRefund)
        );

        assert_eq!(account.settle_refund(&mut bob), Ok(ETHER));
        assert_eq!(account.vault_balance, 0);
    }

    #[test]
    fn test_configuration_closes_at_start() {
        let account = sale();
        assert!(account.allows_configuration(999));
        assert!(!account.allows_configuration(1_000));
        assert!(!account.allows_configuration(2_500));
    }
}

//! Scenario replay against the in-memory sale
//!
//! A scenario is an ordered list of steps read from TOML. Steps that the
//! sale rejects are recorded with their error and the replay continues;
//! malformed steps (unknown amounts or names) abort the replay.

use std::collections::BTreeMap;
use std::fs;

use log::{debug, info, warn};
use meme_presale_core::{
    Address, Asset, CapsUpdate, ClaimReceipt, Clock, ContributionReceipt, FinalizeReceipt, ManualClock,
    Payout, PreSale, PresaleError, Timestamp, MAX_EVENTS,
};
use serde::{Deserialize, Serialize};

use crate::config::{resolve_participant, SaleSettings};
use crate::error::{SimError, SimResult};
use crate::report::{Report, StepError, StepOutcome, StepResult};

/// Reference point for `advance_to`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeAnchor {
    #[default]
    Genesis,
    Start,
    End,
}

/// One scenario step
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Set the clock to `anchor + offset`
    AdvanceTo {
        #[serde(default)]
        anchor: TimeAnchor,
        #[serde(default)]
        offset: i64,
    },
    AdvanceBy {
        seconds: i64,
    },
    /// Send `value` from `from`, crediting `beneficiary` (default `from`)
    Contribute {
        from: String,
        #[serde(default)]
        beneficiary: Option<String>,
        value: String,
        #[serde(default)]
        fee_rate: u64,
    },
    SetWhitelist {
        #[serde(default)]
        caller: Option<String>,
        #[serde(default)]
        add: Vec<String>,
        #[serde(default)]
        remove: Vec<String>,
        #[serde(default)]
        day_limits: Vec<String>,
    },
    SetCaps {
        #[serde(default)]
        caller: Option<String>,
        goal: String,
        soft_cap: String,
        soft_cap_extension: i64,
        cap: String,
    },
    /// New window, relative to genesis like the settings
    SetTimes {
        #[serde(default)]
        caller: Option<String>,
        start_delay: i64,
        duration: i64,
    },
    SetRate {
        #[serde(default)]
        caller: Option<String>,
        rate: u64,
    },
    Finalize {
        #[serde(default)]
        caller: Option<String>,
    },
    /// One account claims alone; several are settled as a batch
    ClaimRefund {
        accounts: Vec<String>,
    },
    ClaimToken {
        accounts: Vec<String>,
    },
    /// Sweep native escrow, or the foreign token `asset` when given
    ExtractVaultFunds {
        #[serde(default)]
        caller: Option<String>,
        #[serde(default)]
        asset: Option<String>,
        to: String,
    },
    TransferOwnership {
        #[serde(default)]
        caller: Option<String>,
        new_owner: String,
    },
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Step::AdvanceTo { .. } => "advance_to",
            Step::AdvanceBy { .. } => "advance_by",
            Step::Contribute { .. } => "contribute",
            Step::SetWhitelist { .. } => "set_whitelist",
            Step::SetCaps { .. } => "set_caps",
            Step::SetTimes { .. } => "set_times",
            Step::SetRate { .. } => "set_rate",
            Step::Finalize { .. } => "finalize",
            Step::ClaimRefund { .. } => "claim_refund",
            Step::ClaimToken { .. } => "claim_token",
            Step::ExtractVaultFunds { .. } => "extract_vault_funds",
            Step::TransferOwnership { .. } => "transfer_ownership",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn load(path: &str) -> SimResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SimError::Parse {
            path: path.to_string(),
            source,
        })
    }
}

/// A deployed sale driven by a manual clock
pub struct Simulation {
    settings: SaleSettings,
    clock: ManualClock,
    sale: PreSale<ManualClock>,
    participants: BTreeMap<String, Address>,
}

impl Simulation {
    /// Deploy the sale at `settings.genesis`
    pub fn new(settings: SaleSettings) -> SimResult<Self> {
        let clock = ManualClock::new(settings.genesis);
        let owner = settings.owner_address()?;
        let config = settings.to_config()?;
        let sale = PreSale::new(owner, config, clock.clone())?;

        let mut participants = BTreeMap::new();
        for name in [&settings.owner, &settings.wallet, &settings.token] {
            participants.insert(name.clone(), resolve_participant(name)?);
        }

        info!(
            "Deployed sale: window {}..={}, owner {}",
            settings.start_time(),
            settings.end_time(),
            owner
        );
        Ok(Self {
            settings,
            clock,
            sale,
            participants,
        })
    }

    pub fn sale(&self) -> &PreSale<ManualClock> {
        &self.sale
    }

    pub fn now(&self) -> Timestamp {
        self.clock.unix_timestamp()
    }

    /// Replay every step and build the report
    pub fn run(&mut self, scenario: &Scenario) -> SimResult<Report> {
        info!(
            "Running scenario '{}' with {} steps",
            scenario.name,
            scenario.steps.len()
        );
        let mut steps = Vec::with_capacity(scenario.steps.len());
        for (index, step) in scenario.steps.iter().enumerate() {
            let result = self.apply(step)?;
            match &result.error {
                Some(err) => warn!("Step {} ({}) rejected: {}", index, step.action(), err.message),
                None => debug!("Step {} ({}) ok", index, step.action()),
            }
            steps.push(StepResult { index, ..result });
        }

        let failed = steps.iter().filter(|s| !s.is_ok()).count();
        info!("Scenario finished: {} steps, {} rejected", steps.len(), failed);

        let mut events = self.sale.events(MAX_EVENTS);
        events.reverse();
        Ok(Report {
            scenario: scenario.name.clone(),
            participants: self.participants.clone(),
            steps,
            snapshot: self.sale.snapshot(),
            events,
        })
    }

    /// Apply one step. Sale rejections are part of the result.
    pub fn apply(&mut self, step: &Step) -> SimResult<StepResult> {
        let outcome = match step {
            Step::AdvanceTo { anchor, offset } => {
                let base = match anchor {
                    TimeAnchor::Genesis => self.settings.genesis,
                    TimeAnchor::Start => self.sale.config().start_time,
                    TimeAnchor::End => self.sale.config().end_time,
                };
                self.clock.set(base.saturating_add(*offset));
                Ok(StepOutcome::Clock { now: self.now() })
            }
            Step::AdvanceBy { seconds } => {
                let now = self.clock.advance(*seconds).map_err(|_| {
                    SimError::InvalidStep(format!("advance_by {} overflows the clock", seconds))
                })?;
                Ok(StepOutcome::Clock { now })
            }
            Step::Contribute {
                from,
                beneficiary,
                value,
                fee_rate,
            } => {
                let sender = self.participant(from)?;
                let beneficiary = match beneficiary {
                    Some(name) => self.participant(name)?,
                    None => sender,
                };
                let value = self.settings.amount(value)?;
                self.sale
                    .contribute(sender, beneficiary, value, *fee_rate)
                    .map(contribution_outcome)
            }
            Step::SetWhitelist {
                caller,
                add,
                remove,
                day_limits,
            } => {
                let caller = self.caller(caller)?;
                let add = self.participants_of(add)?;
                let remove = self.participants_of(remove)?;
                let day_limits = day_limits
                    .iter()
                    .map(|limit| self.settings.amount(limit))
                    .collect::<SimResult<Vec<_>>>()?;
                self.sale
                    .set_whitelist(&caller, &add, &remove, day_limits)
                    .map(|_| StepOutcome::Done)
            }
            Step::SetCaps {
                caller,
                goal,
                soft_cap,
                soft_cap_extension,
                cap,
            } => {
                let caller = self.caller(caller)?;
                let caps = CapsUpdate {
                    goal: self.settings.amount(goal)?,
                    soft_cap: self.settings.amount(soft_cap)?,
                    soft_cap_extension: *soft_cap_extension,
                    cap: self.settings.amount(cap)?,
                };
                self.sale.set_caps(&caller, caps).map(|_| StepOutcome::Done)
            }
            Step::SetTimes {
                caller,
                start_delay,
                duration,
            } => {
                let caller = self.caller(caller)?;
                let start = self.settings.genesis.saturating_add(*start_delay);
                let end = start.saturating_add(*duration);
                self.sale
                    .set_times(&caller, start, end)
                    .map(|_| StepOutcome::Done)
            }
            Step::SetRate { caller, rate } => {
                let caller = self.caller(caller)?;
                self.sale.set_rate(&caller, *rate).map(|_| StepOutcome::Done)
            }
            Step::Finalize { caller } => {
                let caller = self.caller(caller)?;
                self.sale.finalize(&caller).map(finalize_outcome)
            }
            Step::ClaimRefund { accounts } => {
                let accounts = self.participants_of(accounts)?;
                match accounts.as_slice() {
                    [single] => self.sale.claim_refund(single).map(|r| claims_outcome(vec![r])),
                    many => self.sale.claim_refunds_for(many).map(claims_outcome),
                }
            }
            Step::ClaimToken { accounts } => {
                let accounts = self.participants_of(accounts)?;
                match accounts.as_slice() {
                    [single] => self.sale.claim_token(single).map(|r| claims_outcome(vec![r])),
                    many => self.sale.claim_tokens_for(many).map(claims_outcome),
                }
            }
            Step::ExtractVaultFunds { caller, asset, to } => {
                let caller = self.caller(caller)?;
                let asset = match asset {
                    Some(name) => Asset::Token(self.participant(name)?),
                    None => Asset::Native,
                };
                let to = self.participant(to)?;
                self.sale
                    .extract_vault_funds(&caller, asset, to)
                    .map(|payout| StepOutcome::Payouts {
                        payouts: vec![payout],
                    })
            }
            Step::TransferOwnership { caller, new_owner } => {
                let caller = self.caller(caller)?;
                let new_owner = self.participant(new_owner)?;
                self.sale
                    .transfer_ownership(&caller, new_owner)
                    .map(|_| StepOutcome::Done)
            }
        };

        Ok(StepResult::new(step.action(), self.now(), outcome))
    }

    fn participant(&mut self, name: &str) -> SimResult<Address> {
        let address = resolve_participant(name)?;
        self.participants.insert(name.to_string(), address);
        Ok(address)
    }

    fn participants_of(&mut self, names: &[String]) -> SimResult<Vec<Address>> {
        names.iter().map(|name| self.participant(name)).collect()
    }

    /// Named caller, or the current owner
    fn caller(&mut self, name: &Option<String>) -> SimResult<Address> {
        match name {
            Some(name) => self.participant(name),
            None => Ok(self.sale.owner()),
        }
    }
}

fn contribution_outcome(receipt: ContributionReceipt) -> StepOutcome {
    StepOutcome::Contribution { receipt }
}

fn finalize_outcome(receipt: FinalizeReceipt) -> StepOutcome {
    StepOutcome::Finalized { receipt }
}

fn claims_outcome(receipts: Vec<ClaimReceipt>) -> StepOutcome {
    let payouts: Vec<Payout> = receipts.iter().map(|r| r.payout).collect();
    StepOutcome::Claims { receipts, payouts }
}

impl From<&PresaleError> for StepError {
    fn from(err: &PresaleError) -> Self {
        StepError {
            code: format!("{:?}", err),
            message: err.to_string(),
        }
    }
}

//! JSON report of a scenario run

use std::collections::BTreeMap;

use meme_presale_core::{
    Address, ClaimReceipt, ContributionReceipt, FinalizeReceipt, Payout, PresaleResult,
    SaleEvent, SaleSnapshot, Timestamp,
};
use serde::Serialize;

/// What a successful step produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Clock {
        now: Timestamp,
    },
    Contribution {
        receipt: ContributionReceipt,
    },
    Finalized {
        receipt: FinalizeReceipt,
    },
    Claims {
        receipts: Vec<ClaimReceipt>,
        payouts: Vec<Payout>,
    },
    Payouts {
        payouts: Vec<Payout>,
    },
    Done,
}

/// Why the sale rejected a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepError {
    /// Error variant, e.g. `CapExceeded`
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub index: usize,
    pub action: &'static str,
    /// Clock reading after the step
    pub at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<StepOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StepError>,
}

impl StepResult {
    pub fn new(action: &'static str, at: Timestamp, result: PresaleResult<StepOutcome>) -> Self {
        let (outcome, error) = match result {
            Ok(outcome) => (Some(outcome), None),
            Err(err) => (None, Some(StepError::from(&err))),
        };
        Self {
            index: 0,
            action,
            at,
            outcome,
            error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub scenario: String,
    /// Names used in the scenario and the addresses they stand for
    pub participants: BTreeMap<String, Address>,
    pub steps: Vec<StepResult>,
    pub snapshot: SaleSnapshot,
    /// Oldest first
    pub events: Vec<SaleEvent>,
}

impl Report {
    pub fn rejected(&self) -> usize {
        self.steps.iter().filter(|step| !step.is_ok()).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

//! # Meme PreSale Simulator
//!
//! Replays TOML scenarios against the in-memory sale engine on a manual
//! clock and reports every step, the final snapshot and the event log.

pub mod config;
pub mod error;
pub mod report;
pub mod scenario;

pub use config::{parse_amount, resolve_participant, SaleSettings};
pub use error::{SimError, SimResult};
pub use report::{Report, StepError, StepOutcome, StepResult};
pub use scenario::{Scenario, Simulation, Step, TimeAnchor};

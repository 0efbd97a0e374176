//! Presale instructions
//!
//! Owner setup runs before `start_time`, contributions inside the window,
//! and settlement after the sale has ended.

pub mod buy_tokens;
pub mod claim;
pub mod configure;
pub mod extract;
pub mod finalize;
pub mod initialize;
pub mod ownership;
pub mod whitelist;

pub use buy_tokens::*;
pub use claim::*;
pub use configure::*;
pub use extract::*;
pub use finalize::*;
pub use initialize::*;
pub use ownership::*;
pub use whitelist::*;

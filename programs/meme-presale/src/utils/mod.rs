//! Program helpers

pub mod convert;
pub mod fee_rate;
pub mod transfers;

pub use convert::*;
pub use fee_rate::*;
pub use transfers::*;

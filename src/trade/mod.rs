//! Trade structure: asset ledger, balance validation, per-team summaries.

mod balance;
mod ledger;
mod summary;

pub use balance::{BalanceValidator, TradeSides};
pub use ledger::TradeLedger;
pub use summary::{summarize, TeamTradeSummary};

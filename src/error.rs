//! Structural errors: the proposal's data is inconsistent.
//!
//! These are kept apart from rule violations, which come back as a failed
//! [`TradeVerdict`](crate::cba::TradeVerdict) rather than an error.

use thiserror::Error;

use crate::models::AssetRef;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("trade has no asset movements")]
    EmptyLedger,

    #[error("{asset} is sent from {team_id} to itself")]
    SelfTrade { asset: AssetRef, team_id: String },

    #[error("team {team_id} is listed more than once")]
    DuplicateTeam { team_id: String },

    #[error("no cap snapshot supplied for team {team_id}")]
    UnknownTeam { team_id: String },

    #[error("trade involves {count} teams; between {min} and {max} are allowed")]
    TeamCount { count: usize, min: usize, max: usize },

    #[error("{asset} not found on {team_name}")]
    AssetNotFound { asset: AssetRef, team_name: String },

    #[error("salary totals for team {team_id} exceed the representable range")]
    SalaryOverflow { team_id: String },

    #[error("unbalanced trade: {0}")]
    Balance(#[from] BalanceError),
}

/// Assets that do not pair up between exactly one sender and one receiver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("{asset} is received by {team_name} but no team sends it")]
    Orphaned { asset: AssetRef, team_name: String },

    #[error("{asset} is sent by {team_name} but no team receives it")]
    Undelivered { asset: AssetRef, team_name: String },

    #[error("{asset} is sent more than once ({team_names})")]
    DuplicateSend { asset: AssetRef, team_names: String },

    #[error("{asset} is received more than once ({team_names})")]
    DuplicateReceive { asset: AssetRef, team_names: String },

    #[error("{asset} is sent by {sender} to {expected} but received by {receiver}")]
    CounterpartyMismatch {
        asset: AssetRef,
        sender: String,
        expected: String,
        receiver: String,
    },
}

//! Data models for teams, cap snapshots, assets and trade movements.

mod asset;
mod movement;
mod team;

pub use asset::{Asset, AssetKind, AssetRef, Contract, DraftPick, Player};
pub use movement::{TradeMovement, TradeProposal};
pub use team::{Team, TeamCapSnapshot, TeamDirectory};

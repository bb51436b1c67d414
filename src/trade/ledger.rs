//! Asset ledger: the ordered list of proposed movements.

use tracing::debug;

use crate::error::StructuralError;
use crate::models::TradeMovement;

/// Proposed movements, in the order the caller supplied them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeLedger {
    movements: Vec<TradeMovement>,
}

impl TradeLedger {
    /// Build a ledger. Empty proposals and self-trades are rejected.
    pub fn new(movements: Vec<TradeMovement>) -> Result<Self, StructuralError> {
        if movements.is_empty() {
            return Err(StructuralError::EmptyLedger);
        }

        if let Some(m) = movements.iter().find(|m| m.is_self_trade()) {
            return Err(StructuralError::SelfTrade {
                asset: m.asset_ref(),
                team_id: m.from_team_id.clone(),
            });
        }

        debug!(movements = movements.len(), "Built trade ledger");
        Ok(Self { movements })
    }

    pub fn movements(&self) -> &[TradeMovement] {
        &self.movements
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    /// Movements where `team_id` is the sender.
    pub fn assets_sent_by(&self, team_id: &str) -> Vec<&TradeMovement> {
        self.movements
            .iter()
            .filter(|m| m.from_team_id == team_id)
            .collect()
    }

    /// Movements where `team_id` is the receiver.
    pub fn assets_received_by(&self, team_id: &str) -> Vec<&TradeMovement> {
        self.movements
            .iter()
            .filter(|m| m.to_team_id == team_id)
            .collect()
    }

    /// Involved teams in order of first appearance (sender before receiver).
    pub fn team_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for m in &self.movements {
            for id in [m.from_team_id.as_str(), m.to_team_id.as_str()] {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

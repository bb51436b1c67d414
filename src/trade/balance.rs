//! Trade-balance validation.
//!
//! A proposal is a valid multilateral exchange when every asset appears in
//! exactly one outgoing slot and one incoming slot, and the two slots agree on
//! who the counterparties are.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{BalanceError, StructuralError};
use crate::models::{AssetRef, TeamDirectory};

use super::TradeLedger;

/// One side of a transfer as seen from a single team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideEntry {
    pub asset: AssetRef,
    /// Destination for sent assets, origin for received ones
    pub counterparty: String,
}

impl SideEntry {
    pub fn new(asset: AssetRef, counterparty: impl Into<String>) -> Self {
        Self {
            asset,
            counterparty: counterparty.into(),
        }
    }
}

/// What one team says it sends and receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamTradeSide {
    pub team_id: String,
    pub sent: Vec<SideEntry>,
    pub received: Vec<SideEntry>,
}

impl TeamTradeSide {
    pub fn new(team_id: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            sent: Vec::new(),
            received: Vec::new(),
        }
    }

    pub fn send(mut self, asset: AssetRef, to_team: impl Into<String>) -> Self {
        self.sent.push(SideEntry::new(asset, to_team));
        self
    }

    pub fn receive(mut self, asset: AssetRef, from_team: impl Into<String>) -> Self {
        self.received.push(SideEntry::new(asset, from_team));
        self
    }
}

/// Per-team sides of a proposal, in ledger order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeSides {
    pub sides: Vec<TeamTradeSide>,
}

impl TradeSides {
    pub fn new(sides: Vec<TeamTradeSide>) -> Self {
        Self { sides }
    }

    /// Split a ledger into each involved team's outgoing and incoming lists.
    pub fn from_ledger(ledger: &TradeLedger) -> Self {
        let sides = ledger
            .team_ids()
            .into_iter()
            .map(|team_id| {
                let side = ledger
                    .assets_sent_by(team_id)
                    .into_iter()
                    .fold(TeamTradeSide::new(team_id), |side, m| {
                        side.send(m.asset_ref(), m.to_team_id.as_str())
                    });
                ledger
                    .assets_received_by(team_id)
                    .into_iter()
                    .fold(side, |side, m| side.receive(m.asset_ref(), m.from_team_id.as_str()))
            })
            .collect();

        Self::new(sides)
    }
}

/// (team, counterparty) pairs recorded for one asset.
type Slots<'a> = Vec<(&'a str, &'a str)>;

/// Checks that a proposal neither fabricates nor destroys assets.
pub struct BalanceValidator<'a> {
    directory: &'a TeamDirectory,
}

impl<'a> BalanceValidator<'a> {
    pub fn new(directory: &'a TeamDirectory) -> Self {
        Self { directory }
    }

    /// Validate that every asset pairs up with exactly one sender and receiver.
    pub fn validate(&self, sides: &TradeSides) -> Result<(), StructuralError> {
        // Assets in order of first mention so the reported error is stable.
        let mut order: Vec<&AssetRef> = Vec::new();
        let mut senders: HashMap<&AssetRef, Slots<'_>> = HashMap::new();
        let mut receivers: HashMap<&AssetRef, Slots<'_>> = HashMap::new();

        for side in &sides.sides {
            for entry in &side.sent {
                if !senders.contains_key(&entry.asset) && !receivers.contains_key(&entry.asset) {
                    order.push(&entry.asset);
                }
                senders
                    .entry(&entry.asset)
                    .or_default()
                    .push((side.team_id.as_str(), entry.counterparty.as_str()));
            }
            for entry in &side.received {
                if !senders.contains_key(&entry.asset) && !receivers.contains_key(&entry.asset) {
                    order.push(&entry.asset);
                }
                receivers
                    .entry(&entry.asset)
                    .or_default()
                    .push((side.team_id.as_str(), entry.counterparty.as_str()));
            }
        }

        for asset in order {
            let sent = senders.get(asset).map(Vec::as_slice).unwrap_or_default();
            let received = receivers.get(asset).map(Vec::as_slice).unwrap_or_default();

            if let Err(e) = self.check_asset(asset, sent, received) {
                warn!(asset = %asset, error = %e, "Trade balance check failed");
                return Err(e);
            }
        }

        debug!(teams = sides.sides.len(), "Trade is balanced");
        Ok(())
    }

    fn check_asset(
        &self,
        asset: &AssetRef,
        sent: &[(&str, &str)],
        received: &[(&str, &str)],
    ) -> Result<(), StructuralError> {
        if sent.len() > 1 {
            return Err(BalanceError::DuplicateSend {
                asset: asset.clone(),
                team_names: self.names(sent),
            }
            .into());
        }
        if received.len() > 1 {
            return Err(BalanceError::DuplicateReceive {
                asset: asset.clone(),
                team_names: self.names(received),
            }
            .into());
        }

        match (sent.first(), received.first()) {
            (None, Some(&(receiver, _))) => Err(BalanceError::Orphaned {
                asset: asset.clone(),
                team_name: self.directory.name_of(receiver),
            }
            .into()),
            (Some(&(sender, _)), None) => Err(BalanceError::Undelivered {
                asset: asset.clone(),
                team_name: self.directory.name_of(sender),
            }
            .into()),
            (Some(&(sender, destination)), Some(&(receiver, origin))) => {
                if sender == receiver {
                    return Err(StructuralError::SelfTrade {
                        asset: asset.clone(),
                        team_id: sender.to_string(),
                    });
                }
                if destination != receiver || origin != sender {
                    return Err(BalanceError::CounterpartyMismatch {
                        asset: asset.clone(),
                        sender: self.directory.name_of(sender),
                        expected: self.directory.name_of(destination),
                        receiver: self.directory.name_of(receiver),
                    }
                    .into());
                }
                Ok(())
            }
            (None, None) => Ok(()),
        }
    }

    fn names(&self, slots: &[(&str, &str)]) -> String {
        slots
            .iter()
            .map(|(team, _)| self.directory.name_of(team))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetKind, Team, TeamCapSnapshot, TradeMovement};

    fn directory() -> TeamDirectory {
        let team = |id: &str, name: &str| Team {
            id: id.to_string(),
            name: name.to_string(),
            cap: TeamCapSnapshot::default(),
            roster: vec![],
            picks: vec![],
        };
        TeamDirectory::new(vec![
            team("DEN", "Denver"),
            team("UTA", "Utah"),
            team("OKC", "Oklahoma City"),
        ])
        .unwrap()
    }

    fn player(id: &str) -> AssetRef {
        AssetRef::new(AssetKind::Player, id)
    }

    #[test]
    fn test_ledger_derived_sides_balance() {
        let dir = directory();
        let ledger = TradeLedger::new(vec![
            TradeMovement::new(AssetKind::Player, "p1", "DEN", "UTA"),
            TradeMovement::new(AssetKind::Player, "p2", "UTA", "OKC"),
            TradeMovement::new(AssetKind::Pick, "p2", "OKC", "DEN"),
        ])
        .unwrap();

        let sides = TradeSides::from_ledger(&ledger);
        assert_eq!(sides.sides.len(), 3);
        assert!(BalanceValidator::new(&dir).validate(&sides).is_ok());

        // Every asset shows up once outgoing and once incoming.
        let sent: usize = sides.sides.iter().map(|s| s.sent.len()).sum();
        let received: usize = sides.sides.iter().map(|s| s.received.len()).sum();
        assert_eq!(sent, ledger.len());
        assert_eq!(received, ledger.len());
    }

    #[test]
    fn test_duplicate_movement_is_duplicate_send() {
        let dir = directory();
        let ledger = TradeLedger::new(vec![
            TradeMovement::new(AssetKind::Player, "p1", "DEN", "UTA"),
            TradeMovement::new(AssetKind::Player, "p1", "DEN", "OKC"),
        ])
        .unwrap();

        let err = BalanceValidator::new(&dir)
            .validate(&TradeSides::from_ledger(&ledger))
            .unwrap_err();
        assert_eq!(
            err,
            StructuralError::Balance(BalanceError::DuplicateSend {
                asset: player("p1"),
                team_names: "Denver, Denver".to_string(),
            })
        );
    }

    #[test]
    fn test_received_without_sender_is_orphaned() {
        let dir = directory();
        let sides = TradeSides::new(vec![
            TeamTradeSide::new("DEN").send(player("p1"), "UTA"),
            TeamTradeSide::new("UTA")
                .receive(player("p1"), "DEN")
                .receive(player("ghost"), "OKC"),
        ]);

        let err = BalanceValidator::new(&dir).validate(&sides).unwrap_err();
        assert_eq!(
            err,
            StructuralError::Balance(BalanceError::Orphaned {
                asset: player("ghost"),
                team_name: "Utah".to_string(),
            })
        );
    }

    #[test]
    fn test_sent_without_receiver_is_undelivered() {
        let dir = directory();
        let sides = TradeSides::new(vec![
            TeamTradeSide::new("DEN").send(player("p1"), "UTA"),
            TeamTradeSide::new("UTA"),
        ]);

        let err = BalanceValidator::new(&dir).validate(&sides).unwrap_err();
        assert!(matches!(
            err,
            StructuralError::Balance(BalanceError::Undelivered { ref team_name, .. }) if team_name == "Denver"
        ));
    }

    #[test]
    fn test_counterparty_mismatch() {
        let dir = directory();
        let sides = TradeSides::new(vec![
            TeamTradeSide::new("DEN").send(player("p1"), "UTA"),
            TeamTradeSide::new("OKC").receive(player("p1"), "DEN"),
        ]);

        let err = BalanceValidator::new(&dir).validate(&sides).unwrap_err();
        assert_eq!(
            err,
            StructuralError::Balance(BalanceError::CounterpartyMismatch {
                asset: player("p1"),
                sender: "Denver".to_string(),
                expected: "Utah".to_string(),
                receiver: "Oklahoma City".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_receive() {
        let dir = directory();
        let sides = TradeSides::new(vec![
            TeamTradeSide::new("DEN").send(player("p1"), "UTA"),
            TeamTradeSide::new("UTA").receive(player("p1"), "DEN"),
            TeamTradeSide::new("OKC").receive(player("p1"), "DEN"),
        ]);

        let err = BalanceValidator::new(&dir).validate(&sides).unwrap_err();
        assert!(matches!(
            err,
            StructuralError::Balance(BalanceError::DuplicateReceive { .. })
        ));
    }
}

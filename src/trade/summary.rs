//! Per-team trade summaries: what each team sends, receives and pays.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StructuralError;
use crate::models::{Asset, DraftPick, Player, TeamDirectory, TradeMovement};

use super::TradeLedger;

/// Derived view of one team's side of a trade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamTradeSummary {
    pub team_id: String,
    pub team_name: String,
    pub players_sent: Vec<Player>,
    pub picks_sent: Vec<DraftPick>,
    pub players_received: Vec<Player>,
    pub picks_received: Vec<DraftPick>,
    /// Salary of players leaving the team
    pub outgoing_salary: i64,
    /// Salary of players joining the team
    pub incoming_salary: i64,
    /// `incoming_salary - outgoing_salary`
    pub cap_difference: i64,
}

impl TeamTradeSummary {
    fn new(team_id: &str, team_name: &str) -> Self {
        Self {
            team_id: team_id.to_string(),
            team_name: team_name.to_string(),
            ..Default::default()
        }
    }

    fn record_sent(&mut self, asset: Asset) -> Result<(), StructuralError> {
        self.outgoing_salary = self
            .outgoing_salary
            .checked_add(asset.salary())
            .ok_or_else(|| self.overflow())?;
        match asset {
            Asset::Player(p) => self.players_sent.push(p),
            Asset::Pick(p) => self.picks_sent.push(p),
        }
        self.update_difference()
    }

    fn record_received(&mut self, asset: Asset) -> Result<(), StructuralError> {
        self.incoming_salary = self
            .incoming_salary
            .checked_add(asset.salary())
            .ok_or_else(|| self.overflow())?;
        match asset {
            Asset::Player(p) => self.players_received.push(p),
            Asset::Pick(p) => self.picks_received.push(p),
        }
        self.update_difference()
    }

    fn update_difference(&mut self) -> Result<(), StructuralError> {
        self.cap_difference = self
            .incoming_salary
            .checked_sub(self.outgoing_salary)
            .ok_or_else(|| self.overflow())?;
        Ok(())
    }

    fn overflow(&self) -> StructuralError {
        StructuralError::SalaryOverflow {
            team_id: self.team_id.clone(),
        }
    }

    /// True when no salary changes hands for this team.
    pub fn is_salary_neutral(&self) -> bool {
        self.outgoing_salary == 0 && self.incoming_salary == 0
    }

}

/// How a single movement resolves against the current rosters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedMovement {
    /// The sender owns the asset; it changes hands.
    Transfer(Asset),
    /// The destination already owns the asset; nothing moves.
    Inert,
}

/// Resolve a movement's asset against the sending team's roster or picks.
pub fn resolve_movement(
    movement: &TradeMovement,
    directory: &TeamDirectory,
) -> Result<ResolvedMovement, StructuralError> {
    let asset_ref = movement.asset_ref();
    let from = directory.require(&movement.from_team_id)?;
    let to = directory.require(&movement.to_team_id)?;

    if let Some(asset) = from.find_asset(&asset_ref) {
        return Ok(ResolvedMovement::Transfer(asset));
    }

    if to.owns(&asset_ref) {
        warn!(
            asset = %asset_ref,
            team = %to.name,
            "Asset already belongs to its destination; excluding from salary totals"
        );
        return Ok(ResolvedMovement::Inert);
    }

    Err(StructuralError::AssetNotFound {
        asset: asset_ref,
        team_name: from.name.clone(),
    })
}

/// Build one summary per involved team, in ledger order.
pub fn summarize(
    ledger: &TradeLedger,
    directory: &TeamDirectory,
) -> Result<Vec<TeamTradeSummary>, StructuralError> {
    let mut summaries: Vec<TeamTradeSummary> = ledger
        .team_ids()
        .into_iter()
        .map(|id| directory.require(id).map(|t| TeamTradeSummary::new(&t.id, &t.name)))
        .collect::<Result<Vec<_>, StructuralError>>()?;

    for movement in ledger.movements() {
        let asset = match resolve_movement(movement, directory)? {
            ResolvedMovement::Transfer(asset) => asset,
            ResolvedMovement::Inert => continue,
        };

        if let Some(s) = summaries.iter_mut().find(|s| s.team_id == movement.from_team_id) {
            s.record_sent(asset.clone())?;
        }
        if let Some(s) = summaries.iter_mut().find(|s| s.team_id == movement.to_team_id) {
            s.record_received(asset)?;
        }
    }

    for s in &summaries {
        debug!(
            team = %s.team_id,
            outgoing = s.outgoing_salary,
            incoming = s.incoming_salary,
            difference = s.cap_difference,
            "Summarized team side"
        );
    }

    Ok(summaries)
}

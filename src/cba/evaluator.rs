//! Trade evaluator: structural checks, projection and rule verdicts in one pass.

use serde::Serialize;
use tracing::info;

use crate::error::StructuralError;
use crate::models::{TeamDirectory, TradeProposal};
use crate::trade::{summarize, BalanceValidator, TeamTradeSummary, TradeLedger, TradeSides};

use super::{CapProjection, CapTier, CbaConfig, RuleEngine, TeamVerdict, TradeVerdict};

/// Everything computed for one involved team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamEvaluation {
    #[serde(flatten)]
    pub summary: TeamTradeSummary,

    #[serde(flatten)]
    pub projection: CapProjection,

    pub tier_before: CapTier,

    pub tier_after: CapTier,

    pub verdict: TeamVerdict,
}

/// Result of evaluating a structurally sound proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEvaluation {
    #[serde(flatten)]
    pub verdict: TradeVerdict,

    /// Involved teams in ledger order
    pub teams: Vec<TeamEvaluation>,
}

impl TradeEvaluation {
    pub fn is_valid(&self) -> bool {
        self.verdict.is_valid
    }

    #[cfg(test)]
    pub fn team(&self, team_id: &str) -> Option<&TeamEvaluation> {
        self.teams.iter().find(|t| t.summary.team_id == team_id)
    }
}

/// Evaluates proposals against the CBA rules.
///
/// Evaluation is a pure function of the proposal: no state is kept between
/// calls, so one evaluator can be shared freely.
pub struct TradeEvaluator {
    engine: RuleEngine,
}

impl TradeEvaluator {
    pub fn new(config: CbaConfig) -> Self {
        Self {
            engine: RuleEngine::new(config),
        }
    }

    pub fn config(&self) -> &CbaConfig {
        self.engine.config()
    }

    /// Evaluate a proposal. Inconsistent data is an error, a rule breach is not.
    pub fn evaluate(&self, proposal: &TradeProposal) -> Result<TradeEvaluation, StructuralError> {
        let directory = TeamDirectory::new(proposal.teams.iter().cloned())?;
        let ledger = TradeLedger::new(proposal.movements.clone())?;
        self.evaluate_ledger(&ledger, &directory)
    }

    /// Evaluate an already-built ledger against a team directory.
    pub fn evaluate_ledger(
        &self,
        ledger: &TradeLedger,
        directory: &TeamDirectory,
    ) -> Result<TradeEvaluation, StructuralError> {
        let team_ids = ledger.team_ids();
        for id in &team_ids {
            directory.require(id)?;
        }

        let config = self.engine.config();
        if team_ids.len() < config.min_teams || team_ids.len() > config.max_teams {
            return Err(StructuralError::TeamCount {
                count: team_ids.len(),
                min: config.min_teams,
                max: config.max_teams,
            });
        }

        BalanceValidator::new(directory).validate(&TradeSides::from_ledger(ledger))?;

        let teams = summarize(ledger, directory)?
            .into_iter()
            .map(|summary| {
                let team = directory.require(&summary.team_id)?;
                let projection = team.cap.project(summary.cap_difference);
                let after = projection.as_snapshot(
                    team.cap.total_cap_allocation.saturating_add(summary.cap_difference),
                );
                let verdict = self.engine.evaluate_team(&team.cap, &summary);

                Ok(TeamEvaluation {
                    tier_before: CapTier::classify(&team.cap),
                    tier_after: CapTier::classify(&after),
                    summary,
                    projection,
                    verdict,
                })
            })
            .collect::<Result<Vec<_>, StructuralError>>()?;

        let team_verdicts: Vec<TeamVerdict> = teams.iter().map(|t| t.verdict.clone()).collect();
        let verdict = self.engine.verdict(&team_verdicts);

        info!(
            teams = teams.len(),
            movements = ledger.len(),
            valid = verdict.is_valid,
            "Evaluated trade"
        );

        Ok(TradeEvaluation { verdict, teams })
    }
}

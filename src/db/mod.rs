//! Database persistence for evaluated and accepted trades.
//!
//! Stores:
//! - The proposal as submitted (JSON)
//! - The verdict and per-team evaluation (JSON)
//! - Whether the trade was accepted, and any generated narrative

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::{debug, info};

use crate::cba::TradeEvaluation;
use crate::models::TradeProposal;

/// Database connection pool.
pub struct Database {
    pool: SqlitePool,
}

/// Stored evaluation record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredEvaluation {
    pub id: String,
    pub team_ids: String,
    pub is_valid: bool,
    pub message: String,
    pub accepted: bool,
    pub proposal_json: String,
    pub evaluation_json: String,
    pub narrative: Option<String>,
    pub created_at: String,
}

impl Database {
    /// Create a new database connection.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Every connection to an in-memory database sees its own copy.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run all database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trade_evaluations (
                id TEXT PRIMARY KEY,
                team_ids TEXT NOT NULL,
                is_valid INTEGER NOT NULL,
                message TEXT NOT NULL,
                accepted INTEGER NOT NULL DEFAULT 0,
                proposal_json TEXT NOT NULL,
                evaluation_json TEXT NOT NULL,
                narrative TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_trade_evaluations_created ON trade_evaluations(created_at)",
        )
        .execute(&self.pool)
        .await?;

        debug!("Database migrations complete");
        Ok(())
    }

    // ==================== Evaluations ====================

    /// Store an evaluation; returns its generated id.
    ///
    /// Only valid trades can be stored as accepted.
    pub async fn save_evaluation(
        &self,
        proposal: &TradeProposal,
        evaluation: &TradeEvaluation,
        accepted: bool,
    ) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let team_ids = evaluation
            .teams
            .iter()
            .map(|t| t.summary.team_id.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let proposal_json = serde_json::to_string(proposal).context("Failed to encode proposal")?;
        let evaluation_json =
            serde_json::to_string(evaluation).context("Failed to encode evaluation")?;

        sqlx::query(
            r#"
            INSERT INTO trade_evaluations
                (id, team_ids, is_valid, message, accepted, proposal_json, evaluation_json, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&team_ids)
        .bind(evaluation.is_valid())
        .bind(&evaluation.verdict.message)
        .bind(accepted && evaluation.is_valid())
        .bind(&proposal_json)
        .bind(&evaluation_json)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save evaluation")?;

        info!(id = %id, teams = %team_ids, valid = evaluation.is_valid(), "Saved trade evaluation");
        Ok(id)
    }

    /// Attach generated trade ideas to a stored evaluation.
    pub async fn save_narrative(&self, id: &str, narrative: &str) -> Result<()> {
        let result = sqlx::query("UPDATE trade_evaluations SET narrative = ? WHERE id = ?")
            .bind(narrative)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("No stored evaluation with id {}", id);
        }
        Ok(())
    }

    /// Get one stored evaluation.
    pub async fn get_evaluation(&self, id: &str) -> Result<Option<StoredEvaluation>> {
        sqlx::query_as::<_, StoredEvaluation>("SELECT * FROM trade_evaluations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch evaluation")
    }

    /// Most recent evaluations first.
    pub async fn recent_evaluations(&self, limit: i64) -> Result<Vec<StoredEvaluation>> {
        sqlx::query_as::<_, StoredEvaluation>(
            "SELECT * FROM trade_evaluations ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch evaluations")
    }

    /// Count of (total, valid, accepted) evaluations.
    pub async fn evaluation_stats(&self) -> Result<(i64, i64, i64)> {
        let row: (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(is_valid), 0),
                COALESCE(SUM(accepted), 0)
            FROM trade_evaluations
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cba::{CbaConfig, TradeEvaluator};
    use crate::models::{AssetKind, Contract, Player, Team, TeamCapSnapshot, TradeMovement};
    use tokio_test::assert_ok;

    fn proposal(incoming_salary: i64) -> TradeProposal {
        let player = |id: &str, salary: i64| Player {
            id: id.to_string(),
            name: id.to_uppercase(),
            position: None,
            contract: Some(Contract {
                salary,
                years_remaining: 1,
            }),
        };

        TradeProposal {
            teams: vec![
                Team {
                    id: "IND".to_string(),
                    name: "Indiana".to_string(),
                    cap: TeamCapSnapshot {
                        total_cap_allocation: 150_000_000,
                        cap_space: -9_000_000,
                        first_apron_space: 20_000_000,
                        second_apron_space: 30_000_000,
                    },
                    roster: vec![player("i1", 10_000_000)],
                    picks: vec![],
                },
                Team {
                    id: "ORL".to_string(),
                    name: "Orlando".to_string(),
                    cap: TeamCapSnapshot {
                        total_cap_allocation: 110_000_000,
                        cap_space: 30_000_000,
                        first_apron_space: 60_000_000,
                        second_apron_space: 70_000_000,
                    },
                    roster: vec![player("o1", incoming_salary)],
                    picks: vec![],
                },
            ],
            movements: vec![
                TradeMovement::new(AssetKind::Player, "i1", "IND", "ORL"),
                TradeMovement::new(AssetKind::Player, "o1", "ORL", "IND"),
            ],
        }
    }

    #[tokio::test]
    async fn test_save_and_fetch_evaluation() {
        let db = assert_ok!(Database::new("sqlite::memory:").await);
        let evaluator = TradeEvaluator::new(CbaConfig::default());

        let proposal = proposal(11_000_000);
        let evaluation = evaluator.evaluate(&proposal).unwrap();
        assert!(evaluation.is_valid());

        let id = assert_ok!(db.save_evaluation(&proposal, &evaluation, true).await);
        let stored = assert_ok!(db.get_evaluation(&id).await).unwrap();

        assert_eq!(stored.team_ids, "IND,ORL");
        assert!(stored.is_valid);
        assert!(stored.accepted);
        assert_eq!(stored.message, evaluation.verdict.message);
        assert!(stored.narrative.is_none());

        let decoded = TradeProposal::from_json(&stored.proposal_json).unwrap();
        assert_eq!(decoded.movements, proposal.movements);

        assert_ok!(db.save_narrative(&id, "Add a second-round pick.").await);
        let stored = assert_ok!(db.get_evaluation(&id).await).unwrap();
        assert_eq!(stored.narrative.as_deref(), Some("Add a second-round pick."));
    }

    #[tokio::test]
    async fn test_invalid_trade_is_never_accepted() {
        let db = assert_ok!(Database::new("sqlite::memory:").await);
        let evaluator = TradeEvaluator::new(CbaConfig::default());

        // 10M out, 20M in for an over-cap team: over the 125% ceiling.
        let proposal = proposal(20_000_000);
        let evaluation = evaluator.evaluate(&proposal).unwrap();
        assert!(!evaluation.is_valid());

        let id = assert_ok!(db.save_evaluation(&proposal, &evaluation, true).await);
        let stored = assert_ok!(db.get_evaluation(&id).await).unwrap();
        assert!(!stored.accepted);

        let (total, valid, accepted) = assert_ok!(db.evaluation_stats().await);
        assert_eq!((total, valid, accepted), (1, 0, 0));

        let recent = assert_ok!(db.recent_evaluations(10).await);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, id);
    }

    #[tokio::test]
    async fn test_narrative_for_unknown_id_fails() {
        let db = assert_ok!(Database::new("sqlite::memory:").await);
        assert!(db.save_narrative("missing", "text").await.is_err());
        assert!(assert_ok!(db.get_evaluation("missing").await).is_none());
    }
}

//! CBA rule engine: cap tiers and salary-matching verdicts.
//!
//! Rules are checked from most to least restrictive:
//! - Second apron: no net salary may be taken on
//! - First apron: incoming salary capped at 110% of outgoing + $100K
//! - Over the cap: incoming salary capped at 125% of outgoing + $100K
//!
//! Tier selection reads the pre-trade snapshot; the "would cross" checks
//! look at where a positive space figure lands after the net salary change.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::TeamCapSnapshot;
use crate::trade::TeamTradeSummary;

use super::CbaConfig;

/// Which spending band a team sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapTier {
    UnderCap,
    OverCap,
    FirstApron,
    SecondApron,
}

impl CapTier {
    /// Most restrictive line the team is over.
    pub fn classify(cap: &TeamCapSnapshot) -> Self {
        if cap.second_apron_space < 0 {
            CapTier::SecondApron
        } else if cap.first_apron_space < 0 {
            CapTier::FirstApron
        } else if cap.cap_space < 0 {
            CapTier::OverCap
        } else {
            CapTier::UnderCap
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapTier::UnderCap => "Under Cap",
            CapTier::OverCap => "Over Cap",
            CapTier::FirstApron => "First Apron",
            CapTier::SecondApron => "Second Apron",
        }
    }
}

impl fmt::Display for CapTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position relative to one apron line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApronStatus {
    /// Already over the line before the trade
    pub is_over: bool,
    /// Under the line now, over it once the net salary change lands
    pub would_cross: bool,
}

impl ApronStatus {
    pub fn assess(space: i64, cap_difference: i64) -> Self {
        Self {
            is_over: space < 0,
            would_cross: space >= 0 && i128::from(space) - i128::from(cap_difference) < 0,
        }
    }

    pub fn applies(&self) -> bool {
        self.is_over || self.would_cross
    }
}

/// Rule that decided a team's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedRule {
    /// No salary moved; the team is skipped.
    NoSalaryMovement,
    SecondApron,
    FirstApron,
    OverCap,
    /// No ceiling was breached.
    WithinLimits,
}

/// Pass/fail outcome for one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamVerdict {
    pub team_id: String,
    pub passed: bool,
    pub rule: AppliedRule,
    pub message: String,
}

/// Proposal-level outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeVerdict {
    pub is_valid: bool,
    pub message: String,
}

impl TradeVerdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: "Trade is valid under CBA salary-matching rules".to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Applies the tiered salary-matching rules.
pub struct RuleEngine {
    config: CbaConfig,
}

impl RuleEngine {
    pub fn new(config: CbaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CbaConfig {
        &self.config
    }

    /// Decide whether one team's side of the trade is allowed.
    pub fn evaluate_team(&self, cap: &TeamCapSnapshot, summary: &TeamTradeSummary) -> TeamVerdict {
        let name = &summary.team_name;
        let outgoing = summary.outgoing_salary;
        let incoming = summary.incoming_salary;
        let difference = summary.cap_difference;

        if summary.is_salary_neutral() {
            return self.pass(summary, AppliedRule::NoSalaryMovement, format!("{} moves no salary", name));
        }

        let second = ApronStatus::assess(cap.second_apron_space, difference);
        let first = ApronStatus::assess(cap.first_apron_space, difference);
        let incoming_dec = Decimal::from(incoming);

        debug!(
            team = %summary.team_id,
            outgoing,
            incoming,
            difference,
            over_second = second.is_over,
            crosses_second = second.would_cross,
            over_first = first.is_over,
            crosses_first = first.would_cross,
            "Evaluating team"
        );

        if second.applies() && difference > 0 {
            let position = if second.is_over { "is over" } else { "would cross" };
            return self.fail(
                summary,
                AppliedRule::SecondApron,
                format!(
                    "{} {} the second apron and cannot take on additional salary (net +{})",
                    name,
                    position,
                    dollars(difference)
                ),
            );
        }

        if first.applies() {
            let ceiling = self.config.first_apron_ceiling(outgoing);
            if incoming_dec > ceiling {
                return self.fail(
                    summary,
                    AppliedRule::FirstApron,
                    format!(
                        "{} exceeds the {} + {} salary-matching limit for first-apron teams: incoming {} > allowed {}",
                        name,
                        percent(self.config.first_apron_match_pct),
                        short_dollars(self.config.match_buffer),
                        dollars(incoming),
                        decimal_dollars(ceiling)
                    ),
                );
            }
        }

        if cap.cap_space < 0 && cap.first_apron_space >= 0 {
            let ceiling = self.config.over_cap_ceiling(outgoing);
            if incoming_dec > ceiling {
                return self.fail(
                    summary,
                    AppliedRule::OverCap,
                    format!(
                        "{} exceeds the {} + {} salary-matching limit for over-the-cap teams: incoming {} > allowed {}",
                        name,
                        percent(self.config.over_cap_match_pct),
                        short_dollars(self.config.match_buffer),
                        dollars(incoming),
                        decimal_dollars(ceiling)
                    ),
                );
            }
        }

        self.pass(
            summary,
            AppliedRule::WithinLimits,
            format!("{} is within salary-matching limits", name),
        )
    }

    /// Proposal verdict: the first failing team, in the order given, decides.
    pub fn verdict(&self, team_verdicts: &[TeamVerdict]) -> TradeVerdict {
        match team_verdicts.iter().find(|v| !v.passed) {
            Some(failed) => {
                info!(team = %failed.team_id, rule = ?failed.rule, "Trade rejected");
                TradeVerdict::invalid(failed.message.clone())
            }
            None => TradeVerdict::valid(),
        }
    }

    fn pass(&self, summary: &TeamTradeSummary, rule: AppliedRule, message: String) -> TeamVerdict {
        TeamVerdict {
            team_id: summary.team_id.clone(),
            passed: true,
            rule,
            message,
        }
    }

    fn fail(&self, summary: &TeamTradeSummary, rule: AppliedRule, message: String) -> TeamVerdict {
        TeamVerdict {
            team_id: summary.team_id.clone(),
            passed: false,
            rule,
            message,
        }
    }
}

/// Format whole dollars with thousands separators, e.g. `-$1,500,000`.
pub fn dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Compact dollar form for round amounts: `$100K`, `$2M`.
pub fn short_dollars(amount: i64) -> String {
    if amount != 0 && amount % 1_000_000 == 0 {
        format!("${}M", amount / 1_000_000)
    } else if amount != 0 && amount % 1_000 == 0 {
        format!("${}K", amount / 1_000)
    } else {
        dollars(amount)
    }
}

fn decimal_dollars(amount: Decimal) -> String {
    // Floor so the figure shown is the largest incoming salary that passes.
    dollars(amount.floor().to_i64().unwrap_or(i64::MAX))
}

fn percent(multiplier: Decimal) -> String {
    format!("{}%", (multiplier * dec!(100)).normalize())
}

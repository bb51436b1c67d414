//! Prompt construction from an evaluated trade.

use std::fmt::Write;

use crate::cba::{dollars, TeamEvaluation, TradeEvaluation};
use crate::models::{Contract, DraftPick, Player};

/// Describe the evaluated trade and ask for legal alternatives.
pub fn build_prompt(evaluation: &TradeEvaluation, max_ideas: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Proposed NBA trade between {} teams.", evaluation.teams.len());
    let _ = writeln!(
        out,
        "CBA check: {} - {}",
        if evaluation.is_valid() { "VALID" } else { "INVALID" },
        evaluation.verdict.message
    );

    for team in &evaluation.teams {
        out.push('\n');
        describe_team(&mut out, team);
    }

    out.push('\n');
    if evaluation.is_valid() {
        let _ = writeln!(
            out,
            "Assess whether each team benefits, then suggest up to {} alternative versions of this trade \
             that stay within the salary-matching rules.",
            max_ideas
        );
    } else {
        let _ = writeln!(
            out,
            "Suggest up to {} alternative versions of this trade that fix the rule violation \
             while keeping each team's goals intact.",
            max_ideas
        );
    }
    let _ = writeln!(
        out,
        "For each idea list the assets every team sends and receives, and explain the salary matching."
    );

    out
}

fn describe_team(out: &mut String, team: &TeamEvaluation) {
    let s = &team.summary;
    let _ = writeln!(out, "{} ({})", s.team_name, s.team_id);
    let _ = writeln!(out, "  Cap tier: {} -> {}", team.tier_before, team.tier_after);
    let _ = writeln!(out, "  Sends: {}", asset_list(&s.players_sent, &s.picks_sent));
    let _ = writeln!(out, "  Receives: {}", asset_list(&s.players_received, &s.picks_received));
    let _ = writeln!(
        out,
        "  Salary out {}, in {}, net {}",
        dollars(s.outgoing_salary),
        dollars(s.incoming_salary),
        signed(s.cap_difference)
    );
    let _ = writeln!(
        out,
        "  Projected space: cap {}, first apron {}, second apron {}",
        dollars(team.projection.updated_cap_space),
        dollars(team.projection.updated_first_apron_space),
        dollars(team.projection.updated_second_apron_space)
    );
    let _ = writeln!(out, "  Rule check: {}", team.verdict.message);
}

fn asset_list(players: &[Player], picks: &[DraftPick]) -> String {
    let items: Vec<String> = players
        .iter()
        .map(|p| match &p.contract {
            Some(Contract {
                salary,
                years_remaining,
            }) => format!("{} ({}, {} yrs)", p.name, dollars(*salary), years_remaining),
            None => format!("{} (no contract)", p.name),
        })
        .chain(picks.iter().map(DraftPick::label))
        .collect();

    if items.is_empty() {
        "nothing".to_string()
    } else {
        items.join("; ")
    }
}

fn signed(amount: i64) -> String {
    if amount > 0 {
        format!("+{}", dollars(amount))
    } else {
        dollars(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cba::{CbaConfig, TradeEvaluator};
    use crate::models::{
        AssetKind, Contract, Team, TeamCapSnapshot, TradeMovement, TradeProposal,
    };

    fn proposal(incoming_salary: i64) -> TradeProposal {
        TradeProposal {
            teams: vec![
                Team {
                    id: "LAL".to_string(),
                    name: "Los Angeles".to_string(),
                    cap: TeamCapSnapshot {
                        total_cap_allocation: 190_000_000,
                        cap_space: -50_000_000,
                        first_apron_space: -12_000_000,
                        second_apron_space: -3_000_000,
                    },
                    roster: vec![Player {
                        id: "l1".to_string(),
                        name: "Wing Scorer".to_string(),
                        position: Some("SF".to_string()),
                        contract: Some(Contract {
                            salary: 15_000_000,
                            years_remaining: 2,
                        }),
                    }],
                    picks: vec![],
                },
                Team {
                    id: "WAS".to_string(),
                    name: "Washington".to_string(),
                    cap: TeamCapSnapshot {
                        total_cap_allocation: 120_000_000,
                        cap_space: 20_000_000,
                        first_apron_space: 50_000_000,
                        second_apron_space: 60_000_000,
                    },
                    roster: vec![Player {
                        id: "w1".to_string(),
                        name: "Stretch Big".to_string(),
                        position: Some("C".to_string()),
                        contract: Some(Contract {
                            salary: incoming_salary,
                            years_remaining: 3,
                        }),
                    }],
                    picks: vec![DraftPick {
                        id: "was-2029-2".to_string(),
                        year: 2029,
                        round: 2,
                        is_protected: false,
                        is_swap: false,
                        description: None,
                    }],
                },
            ],
            movements: vec![
                TradeMovement::new(AssetKind::Player, "l1", "LAL", "WAS"),
                TradeMovement::new(AssetKind::Player, "w1", "WAS", "LAL"),
                TradeMovement::new(AssetKind::Pick, "was-2029-2", "WAS", "LAL"),
            ],
        }
    }

    #[test]
    fn test_prompt_describes_each_team() {
        let evaluation = TradeEvaluator::new(CbaConfig::default())
            .evaluate(&proposal(14_000_000))
            .unwrap();
        let prompt = build_prompt(&evaluation, 3);

        assert!(prompt.contains("CBA check: VALID"));
        assert!(prompt.contains("Los Angeles (LAL)"));
        assert!(prompt.contains("Cap tier: Second Apron -> Second Apron"));
        assert!(prompt.contains("Sends: Wing Scorer ($15,000,000, 2 yrs)"));
        assert!(prompt.contains("Receives: Stretch Big ($14,000,000, 3 yrs); 2029 2nd"));
        assert!(prompt.contains("net -$1,000,000"));
        assert!(prompt.contains("up to 3 alternative versions"));
    }

    #[test]
    fn test_prompt_for_invalid_trade_asks_for_fix() {
        let evaluation = TradeEvaluator::new(CbaConfig::default())
            .evaluate(&proposal(16_000_000))
            .unwrap();
        let prompt = build_prompt(&evaluation, 2);

        assert!(prompt.contains("CBA check: INVALID"));
        assert!(prompt.contains("second apron"));
        assert!(prompt.contains("net +$1,000,000"));
        assert!(prompt.contains("fix the rule violation"));
    }
}

//! CBA compliance: cap projection, tiered salary-matching rules, evaluation.

mod config;
mod evaluator;
mod projection;
mod rules;

pub use config::CbaConfig;
pub use evaluator::{TeamEvaluation, TradeEvaluation, TradeEvaluator};
pub use projection::{updated_value, CapProjection};
pub use rules::{dollars, CapTier, RuleEngine, TeamVerdict, TradeVerdict};

//! Proposal input: asset movements between teams.

use serde::{Deserialize, Serialize};

use super::{AssetKind, AssetRef, Team};

/// One asset changing hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeMovement {
    pub asset_id: String,

    pub asset_type: AssetKind,

    pub from_team_id: String,

    pub to_team_id: String,
}

impl TradeMovement {
    #[cfg(test)]
    pub fn new(
        asset_type: AssetKind,
        asset_id: impl Into<String>,
        from_team_id: impl Into<String>,
        to_team_id: impl Into<String>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            asset_type,
            from_team_id: from_team_id.into(),
            to_team_id: to_team_id.into(),
        }
    }

    pub fn asset_ref(&self) -> AssetRef {
        AssetRef::new(self.asset_type, self.asset_id.clone())
    }

    pub fn is_self_trade(&self) -> bool {
        self.from_team_id == self.to_team_id
    }
}

/// Everything a caller hands over for one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeProposal {
    pub teams: Vec<Team>,

    pub movements: Vec<TradeMovement>,
}

impl TradeProposal {
    /// Parse a proposal from its JSON form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_json_shape() {
        let json = r#"{"assetId":"p1","assetType":"player","fromTeamId":"BOS","toTeamId":"NYK"}"#;
        let movement: TradeMovement = serde_json::from_str(json).unwrap();
        assert_eq!(movement.asset_type, AssetKind::Player);
        assert_eq!(movement.asset_ref(), AssetRef::new(AssetKind::Player, "p1"));
        assert!(!movement.is_self_trade());
    }

    #[test]
    fn test_self_trade_detection() {
        let movement = TradeMovement::new(AssetKind::Pick, "pk", "BOS", "BOS");
        assert!(movement.is_self_trade());
    }
}

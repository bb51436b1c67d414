//! Team model: cap snapshot, roster and pick inventory.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StructuralError;

use super::{Asset, AssetKind, AssetRef, DraftPick, Player};

/// Team's cap figures at proposal time, in dollars.
///
/// Negative space means the team is over that line. Each field is read on its
/// own; the usual `second <= first <= cap` ordering is not relied upon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamCapSnapshot {
    /// Total committed salary
    pub total_cap_allocation: i64,

    /// Room under the salary cap
    pub cap_space: i64,

    /// Room under the first apron
    pub first_apron_space: i64,

    /// Room under the second apron
    pub second_apron_space: i64,
}

/// NBA team with everything needed to resolve a proposal's assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,

    pub name: String,

    #[serde(rename = "capSnapshot")]
    pub cap: TeamCapSnapshot,

    #[serde(default)]
    pub roster: Vec<Player>,

    #[serde(default)]
    pub picks: Vec<DraftPick>,
}

impl Team {
    pub fn find_player(&self, id: &str) -> Option<&Player> {
        self.roster.iter().find(|p| p.id == id)
    }

    pub fn find_pick(&self, id: &str) -> Option<&DraftPick> {
        self.picks.iter().find(|p| p.id == id)
    }

    /// Look up an asset this team currently owns.
    pub fn find_asset(&self, asset: &AssetRef) -> Option<Asset> {
        match asset.kind {
            AssetKind::Player => self.find_player(&asset.id).cloned().map(Asset::Player),
            AssetKind::Pick => self.find_pick(&asset.id).cloned().map(Asset::Pick),
        }
    }

    pub fn owns(&self, asset: &AssetRef) -> bool {
        match asset.kind {
            AssetKind::Player => self.find_player(&asset.id).is_some(),
            AssetKind::Pick => self.find_pick(&asset.id).is_some(),
        }
    }
}

/// Teams supplied with a proposal, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: HashMap<String, Team>,
}

impl TeamDirectory {
    /// Build the directory, rejecting duplicate team ids.
    pub fn new(teams: impl IntoIterator<Item = Team>) -> Result<Self, StructuralError> {
        let mut directory = Self::default();

        for team in teams {
            if directory.teams.contains_key(&team.id) {
                return Err(StructuralError::DuplicateTeam { team_id: team.id });
            }
            directory.teams.insert(team.id.clone(), team);
        }

        Ok(directory)
    }

    pub fn get(&self, team_id: &str) -> Option<&Team> {
        self.teams.get(team_id)
    }

    /// Like [`get`](Self::get) but a missing team is a structural error.
    pub fn require(&self, team_id: &str) -> Result<&Team, StructuralError> {
        self.get(team_id).ok_or_else(|| StructuralError::UnknownTeam {
                team_id: team_id.to_string(),
            })
    }

    /// Display name for a team, falling back to its id.
    pub fn name_of(&self, team_id: &str) -> String {
        self.get(team_id)
            .map_or_else(|| team_id.to_string(), |t| t.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contract;

    fn team(id: &str) -> Team {
        Team {
            id: id.to_string(),
            name: format!("Team {}", id),
            cap: TeamCapSnapshot::default(),
            roster: vec![Player {
                id: format!("{}-p1", id),
                name: "Starter".to_string(),
                position: Some("G".to_string()),
                contract: Some(Contract {
                    salary: 12_000_000,
                    years_remaining: 2,
                }),
            }],
            picks: vec![],
        }
    }

    #[test]
    fn test_directory_rejects_duplicate_ids() {
        let err = TeamDirectory::new(vec![team("BOS"), team("BOS")]).unwrap_err();
        assert!(matches!(err, StructuralError::DuplicateTeam { ref team_id } if team_id == "BOS"));
    }

    #[test]
    fn test_directory_lookup_by_id() {
        let dir = TeamDirectory::new(vec![team("NYK"), team("BOS"), team("ATL")]).unwrap();
        assert_eq!(dir.get("ATL").map(|t| t.name.as_str()), Some("Team ATL"));
        assert!(dir.get("LAL").is_none());
        assert_eq!(dir.name_of("BOS"), "Team BOS");
        assert_eq!(dir.name_of("XXX"), "XXX");
    }

    #[test]
    fn test_require_unknown_team() {
        let dir = TeamDirectory::new(vec![team("NYK")]).unwrap();
        assert!(matches!(
            dir.require("LAL"),
            Err(StructuralError::UnknownTeam { .. })
        ));
    }

    #[test]
    fn test_find_asset_by_kind() {
        let t = team("MIA");
        let player = AssetRef::new(AssetKind::Player, "MIA-p1");
        assert!(t.owns(&player));
        assert_eq!(t.find_asset(&player).map(|a| a.salary()), Some(12_000_000));

        // Same id, different namespace
        assert!(!t.owns(&AssetRef::new(AssetKind::Pick, "MIA-p1")));
    }
}

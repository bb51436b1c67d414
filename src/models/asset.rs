//! Tradeable assets: players under contract and draft picks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of asset a movement refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Player,
    Pick,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Player => "player",
            AssetKind::Pick => "pick",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an asset. Player ids and pick ids live in separate namespaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetRef {
    pub kind: AssetKind,
    pub id: String,
}

impl AssetRef {
    pub fn new(kind: AssetKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Contract terms attached to a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Current-season salary in dollars
    #[serde(default)]
    pub salary: i64,

    /// Seasons left on the deal, including the current one
    #[serde(default)]
    pub years_remaining: u32,
}

/// Player on a team's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub position: Option<String>,

    /// Absent for players without a recorded contract
    #[serde(default)]
    pub contract: Option<Contract>,
}

impl Player {
    /// Salary counted for matching purposes; zero when no contract is on file.
    pub fn salary(&self) -> i64 {
        self.contract.as_ref().map_or(0, |c| c.salary)
    }
}

/// Draft pick owned by a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPick {
    pub id: String,

    pub year: u16,

    pub round: u8,

    #[serde(default)]
    pub is_protected: bool,

    #[serde(default)]
    pub is_swap: bool,

    /// Free-text terms, e.g. "top-10 protected via BKN"
    #[serde(default)]
    pub description: Option<String>,
}

impl DraftPick {
    /// Short label such as "2027 1st (swap, protected)".
    pub fn label(&self) -> String {
        let round = match self.round {
            1 => "1st".to_string(),
            2 => "2nd".to_string(),
            n => format!("round {}", n),
        };

        let mut flags = Vec::new();
        if self.is_swap {
            flags.push("swap");
        }
        if self.is_protected {
            flags.push("protected");
        }

        let mut label = format!("{} {}", self.year, round);
        if !flags.is_empty() {
            label.push_str(&format!(" ({})", flags.join(", ")));
        }
        if let Some(desc) = self.description.as_deref().filter(|d| !d.is_empty()) {
            label.push_str(&format!(" - {}", desc));
        }
        label
    }
}

/// A resolved tradeable asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Asset {
    Player(Player),
    Pick(DraftPick),
}

impl Asset {
    /// Picks carry no salary.
    pub fn salary(&self) -> i64 {
        match self {
            Asset::Player(p) => p.salary(),
            Asset::Pick(_) => 0,
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The sponsored teams a donation can benefit, in resolution priority order.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    IronOwls,
    SteelSparrows,
}

impl Team {
    pub const ALL: [Self; 2] = [Self::IronOwls, Self::SteelSparrows];

    /// Canonical name, also the string searched for in donation descriptions.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::IronOwls => "Iron Owls",
            Self::SteelSparrows => "Steel Sparrows",
        }
    }

    #[must_use]
    pub const fn program_suffix(self) -> &'static str {
        match self {
            Self::IronOwls => "FRC Robotics Program",
            Self::SteelSparrows => "FTC Robotics Program",
        }
    }

    /// Picks the first team whose canonical name occurs in `description`.
    /// Matching is case-sensitive.
    #[must_use]
    pub fn resolve(description: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|team| description.contains(team.display_name()))
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.display_name()) }
}

#[cfg(test)]
mod tests {
    use super::Team;

    #[test]
    fn test_resolve_known_teams() {
        assert_eq!(Team::resolve("Iron Owls FRC Robotics Program"), Some(Team::IronOwls));
        assert_eq!(Team::resolve("Donation to Steel Sparrows"), Some(Team::SteelSparrows));
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        assert_eq!(Team::resolve("iron owls"), None);
        assert_eq!(Team::resolve("STEEL SPARROWS"), None);
    }

    #[test]
    fn test_resolve_unknown() {
        assert_eq!(Team::resolve(""), None);
        assert_eq!(Team::resolve("General fund"), None);
    }

    #[test]
    fn test_resolve_priority_order() {
        assert_eq!(Team::resolve("Steel Sparrows and Iron Owls"), Some(Team::IronOwls));
    }

    #[test]
    fn test_team_triple() {
        assert_eq!(Team::IronOwls.display_name(), "Iron Owls");
        assert_eq!(Team::IronOwls.program_suffix(), "FRC Robotics Program");
        assert_eq!(Team::SteelSparrows.to_string(), "Steel Sparrows");
        assert_eq!(Team::SteelSparrows.program_suffix(), "FTC Robotics Program");
    }
}

//! Roles, factions and the capabilities each role grants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A participant's fixed role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The neutral host. Never a player.
    Narrator,
    Werewolf,
    Seer,
    Witch,
    Villager,
}

/// Which side a player wins with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Village,
    Werewolves,
}

/// Night actions a role may take.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub can_kill: bool,
    pub can_investigate: bool,
    pub can_use_potion: bool,
}

impl Role {
    /// Every player role, in the order they are dealt.
    pub const PLAYER_ROLES: [Role; 4] = [Role::Werewolf, Role::Seer, Role::Witch, Role::Villager];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Narrator => "Narrator",
            Role::Werewolf => "Werewolf",
            Role::Seer => "Seer",
            Role::Witch => "Witch",
            Role::Villager => "Villager",
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Role::Werewolf => Capabilities {
                can_kill: true,
                ..Capabilities::default()
            },
            Role::Seer => Capabilities {
                can_investigate: true,
                ..Capabilities::default()
            },
            Role::Witch => Capabilities {
                can_use_potion: true,
                ..Capabilities::default()
            },
            Role::Narrator | Role::Villager => Capabilities::default(),
        }
    }

    /// The faction this role plays for; `None` for the Narrator.
    pub fn faction(&self) -> Option<Faction> {
        match self {
            Role::Narrator => None,
            Role::Werewolf => Some(Faction::Werewolves),
            Role::Seer | Role::Witch | Role::Villager => Some(Faction::Village),
        }
    }

    pub fn is_player(&self) -> bool {
        self.faction().is_some()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Faction {
    /// Announcement emitted when this faction wins.
    pub fn victory_message(&self) -> &'static str {
        match self {
            Faction::Village => "Villagers Win! All Werewolves are dead.",
            Faction::Werewolves => "Werewolves Win! They outnumber the Villagers.",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Faction::Village => f.write_str("Village"),
            Faction::Werewolves => f.write_str("Werewolves"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_match_roles() {
        assert!(Role::Werewolf.capabilities().can_kill);
        assert!(Role::Seer.capabilities().can_investigate);
        assert!(Role::Witch.capabilities().can_use_potion);
        assert_eq!(Role::Villager.capabilities(), Capabilities::default());
        assert_eq!(Role::Narrator.capabilities(), Capabilities::default());
    }

    #[test]
    fn test_factions() {
        assert_eq!(Role::Werewolf.faction(), Some(Faction::Werewolves));
        assert_eq!(Role::Witch.faction(), Some(Faction::Village));
        assert_eq!(Role::Narrator.faction(), None);
        assert!(!Role::Narrator.is_player());
    }

    #[test]
    fn test_role_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Seer).unwrap(), "\"seer\"");
        let role: Role = serde_json::from_str("\"werewolf\"").unwrap();
        assert_eq!(role, Role::Werewolf);
    }
}

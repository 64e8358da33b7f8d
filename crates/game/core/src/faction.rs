//! Faction relationships and combat targeting priority.
//!
//! The hostility matrix decides who may attack whom; the priority function
//! ranks hostile candidates so every AI picks targets the same way. Both
//! functions are pure and symmetric where the rules demand it, which the
//! test suite checks exhaustively.

use strum::{Display, EnumIter, EnumString};

/// Entity factions that determine combat relationships.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    /// The player character.
    Player,
    /// Most monsters. Only attack the player.
    Neutral,
    /// Slimes and the like. Attack everyone except other hostile-all.
    HostileAll,
    /// Orc warbands. Attack the player only, but rally together.
    Orc,
    /// Skeletons, zombies, necromancers, liches.
    Undead,
    /// Cult cells. Hostile to every non-cultist.
    Cultist,
    /// Lone wanderers. Hostile to every non-independent.
    Independent,
}

impl Faction {
    /// Undead-versus-living hostility keys off this.
    pub fn is_living(self) -> bool {
        self != Faction::Undead
    }
}

/// One-directional hostility rules. `are_hostile` ORs both directions so the
/// relation is symmetric by construction.
fn hostile_one_way(a: Faction, b: Faction) -> bool {
    use Faction::*;
    match a {
        HostileAll => b != HostileAll,
        Independent => b != Independent,
        Cultist => b != Cultist,
        Undead => b.is_living(),
        Player => b != Player,
        Neutral | Orc => b == Player,
    }
}

/// Check if two factions are hostile to each other.
pub fn are_hostile(a: Faction, b: Faction) -> bool {
    if a == b {
        return false;
    }
    hostile_one_way(a, b) || hostile_one_way(b, a)
}

/// Targeting priority for hostile faction pairs. Higher is picked first;
/// zero means "not a target".
pub fn target_priority(attacker: Faction, target: Faction) -> i32 {
    if !are_hostile(attacker, target) {
        return 0;
    }

    // Player always gets the highest priority.
    if target == Faction::Player {
        return 10;
    }

    // Undead prize living targets over everything but the player.
    if attacker == Faction::Undead && target.is_living() {
        return 6;
    }

    // Slime-like hostiles are lower-value targets.
    if target == Faction::HostileAll {
        return 4;
    }

    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn hostility_is_symmetric() {
        for a in Faction::iter() {
            for b in Faction::iter() {
                assert_eq!(
                    are_hostile(a, b),
                    are_hostile(b, a),
                    "asymmetric hostility for {a:?} vs {b:?}"
                );
            }
        }
    }

    #[test]
    fn same_faction_never_hostile() {
        for f in Faction::iter() {
            assert!(!are_hostile(f, f));
            assert_eq!(target_priority(f, f), 0);
        }
    }

    #[test]
    fn undead_hostile_to_living_but_not_undead() {
        assert!(are_hostile(Faction::Undead, Faction::Neutral));
        assert!(are_hostile(Faction::Undead, Faction::Orc));
        assert!(are_hostile(Faction::Undead, Faction::Player));
        assert!(!are_hostile(Faction::Undead, Faction::Undead));
    }

    #[test]
    fn hostile_all_spares_its_own() {
        assert!(!are_hostile(Faction::HostileAll, Faction::HostileAll));
        assert!(are_hostile(Faction::HostileAll, Faction::Neutral));
        assert!(are_hostile(Faction::HostileAll, Faction::Undead));
    }

    #[test]
    fn neutral_only_fights_player() {
        assert!(are_hostile(Faction::Neutral, Faction::Player));
        assert!(!are_hostile(Faction::Neutral, Faction::Orc));
    }

    #[test]
    fn player_priority_dominates() {
        for f in Faction::iter() {
            if f == Faction::Player {
                continue;
            }
            assert_eq!(target_priority(f, Faction::Player), 10);
        }
        assert!(target_priority(Faction::Undead, Faction::Neutral) < 10);
    }

    #[test]
    fn faction_string_round_trip() {
        for f in Faction::iter() {
            let s = f.to_string();
            assert_eq!(s.parse::<Faction>().unwrap(), f);
        }
    }
}

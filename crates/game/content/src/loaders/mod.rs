//! RON/TOML loaders for the content catalogs.

use std::fs;
use std::path::Path;

use barrow_core::{GameConfig, ItemDefinition, MonsterDefinition, SpellDefinition};

/// All loaders report through anyhow with file context attached.
pub type LoadResult<T> = anyhow::Result<T>;

fn read_file(path: &Path) -> LoadResult<String> {
    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))
}

/// Loader for the monster catalog.
///
/// RON format: `Vec<MonsterDefinition>`.
pub struct MonsterLoader;

impl MonsterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<MonsterDefinition>> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<MonsterDefinition>> {
        let defs: Vec<MonsterDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("failed to parse monster catalog RON: {}", e))?;
        tracing::debug!(target: "barrow_content", count = defs.len(), "parsed monster catalog");
        Ok(defs)
    }
}

/// Loader for the item catalog.
///
/// RON format: `Vec<ItemDefinition>`.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDefinition>> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemDefinition>> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("failed to parse item catalog RON: {}", e))
    }
}

/// Loader for the spell catalog.
///
/// RON format: `Vec<SpellDefinition>`.
pub struct SpellLoader;

impl SpellLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SpellDefinition>> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SpellDefinition>> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("failed to parse spell catalog RON: {}", e))
    }
}

/// Loader for engine configuration overrides.
///
/// TOML format mirroring `GameConfig`; missing tables fall back to the
/// engine defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("failed to parse config TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrow_core::{AiKind, DamageType, Faction};

    #[test]
    fn bundled_monster_catalog_parses() {
        let defs = MonsterLoader::parse(include_str!("../../data/monsters.ron")).unwrap();
        assert!(defs.len() >= 10);

        let orc = defs.iter().find(|d| d.id == "orc").unwrap();
        assert_eq!(orc.hp, 20);
        assert_eq!(orc.accuracy, 2);
        assert_eq!(orc.evasion, 1);
        assert_eq!(orc.armor_class, 12);
        assert!(orc.can_seek_items && orc.can_use_items);

        let skeleton = defs.iter().find(|d| d.id == "skeleton").unwrap();
        assert_eq!(skeleton.faction, Faction::Undead);
        assert_eq!(skeleton.ai, AiKind::Skeleton);
        assert_eq!(skeleton.shieldwall_ac_per_adjacent, 1);
        assert_eq!(skeleton.death_spawns.as_deref(), Some("bone_pile"));
        assert_eq!(skeleton.resistances.get(&DamageType::Poison), Some(&0.0));

        let lich = defs.iter().find(|d| d.id == "lich").unwrap();
        assert_eq!(lich.ai, AiKind::Lich);
        let profile = lich.necromancer.as_ref().unwrap();
        assert_eq!(profile.action_range, 6);
        assert_eq!(profile.summon_monster_id.as_deref(), Some("skeleton"));

        let exploder = defs.iter().find(|d| d.id == "exploder_necromancer").unwrap();
        let profile = exploder.necromancer.as_ref().unwrap();
        assert_eq!(profile.explosion_damage_min, 4);
        assert_eq!(profile.explosion_damage_max, 8);
        assert_eq!(profile.explosion_radius, 2);

        let boss = defs.iter().find(|d| d.id == "ogre_warlord").unwrap();
        assert!(boss.is_boss);
        let bp = boss.boss_profile.as_ref().unwrap();
        assert!(bp.enrage_threshold > 0.0);
        assert!(!bp.dialogue.on_death.is_empty());
        assert!(boss.status_immunities.contains("confusion"));
    }

    #[test]
    fn bundled_item_catalog_parses() {
        let defs = ItemLoader::parse(include_str!("../../data/items.ron")).unwrap();
        let potion = defs.iter().find(|d| d.id == "healing_potion").unwrap();
        assert_eq!(potion.use_spell.as_deref(), Some("minor_heal"));
        assert!(potion.beneficial && !potion.offensive);

        let sword = defs.iter().find(|d| d.id == "short_sword").unwrap();
        assert_eq!(sword.equip.as_ref().unwrap().power_bonus, 2);

        let key = defs.iter().find(|d| d.id == "brass_key").unwrap();
        assert_eq!(key.key_tag.as_deref(), Some("brass"));
    }

    #[test]
    fn bundled_spell_catalog_parses() {
        let defs = SpellLoader::parse(include_str!("../../data/spells.ron")).unwrap();
        let fireball = defs.iter().find(|d| d.id == "fireball").unwrap();
        assert_eq!(fireball.radius, 3);
        assert!(fireball.hazard.is_some());

        let confuse = defs.iter().find(|d| d.id == "confuse").unwrap();
        assert_eq!(confuse.effect.as_ref().unwrap().name, "confusion");
    }

    #[test]
    fn config_round_trips_and_tolerates_gaps() {
        let config = ConfigLoader::parse(include_str!("../../data/config.toml")).unwrap();
        assert_eq!(config.hit.base_hit, 0.75);
        assert_eq!(config.floors.despawn_radius, 20);

        // Partial files take engine defaults for the rest.
        let partial = ConfigLoader::parse("[hit]\nbase_hit = 0.6\n").unwrap();
        assert_eq!(partial.hit.base_hit, 0.6);
        assert_eq!(partial.hit.step, 0.05);
        assert_eq!(partial.connectivity.door_spacing, 8);
    }

    #[test]
    fn every_use_spell_resolves_in_the_spell_catalog() {
        let items = ItemLoader::parse(include_str!("../../data/items.ron")).unwrap();
        let spells = SpellLoader::parse(include_str!("../../data/spells.ron")).unwrap();
        for item in items {
            if let Some(spell_id) = item.use_spell {
                assert!(
                    spells.iter().any(|s| s.id == spell_id),
                    "item {} references missing spell {}",
                    item.id,
                    spell_id
                );
            }
        }
    }

    #[test]
    fn every_summon_and_death_spawn_resolves() {
        let monsters = MonsterLoader::parse(include_str!("../../data/monsters.ron")).unwrap();
        for def in &monsters {
            if let Some(profile) = &def.necromancer
                && let Some(summon) = &profile.summon_monster_id
            {
                assert!(
                    monsters.iter().any(|m| &m.id == summon),
                    "{} summons missing monster {}",
                    def.id,
                    summon
                );
            }
            if let Some(spawn) = &def.death_spawns
                && spawn != "bone_pile"
            {
                assert!(monsters.iter().any(|m| &m.id == spawn));
            }
        }
    }
}

//! Immutable content registry implementing the engine's oracle.

use std::collections::BTreeMap;

use barrow_core::{ContentOracle, ItemDefinition, MonsterDefinition, SpellDefinition};

/// Loaded-once, read-only registries of static definitions.
#[derive(Clone, Debug, Default)]
pub struct ContentRegistry {
    monsters: BTreeMap<String, MonsterDefinition>,
    items: BTreeMap<String, ItemDefinition>,
    spells: BTreeMap<String, SpellDefinition>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry parsed from the catalogs bundled with this crate.
    #[cfg(feature = "loaders")]
    pub fn bundled() -> anyhow::Result<Self> {
        let mut registry = Self::new();
        registry.add_monsters(crate::loaders::MonsterLoader::parse(include_str!(
            "../data/monsters.ron"
        ))?);
        registry.add_items(crate::loaders::ItemLoader::parse(include_str!(
            "../data/items.ron"
        ))?);
        registry.add_spells(crate::loaders::SpellLoader::parse(include_str!(
            "../data/spells.ron"
        ))?);
        Ok(registry)
    }

    pub fn add_monsters(&mut self, defs: impl IntoIterator<Item = MonsterDefinition>) {
        for def in defs {
            self.monsters.insert(def.id.clone(), def);
        }
    }

    pub fn add_items(&mut self, defs: impl IntoIterator<Item = ItemDefinition>) {
        for def in defs {
            self.items.insert(def.id.clone(), def);
        }
    }

    pub fn add_spells(&mut self, defs: impl IntoIterator<Item = SpellDefinition>) {
        for def in defs {
            self.spells.insert(def.id.clone(), def);
        }
    }

    pub fn monster_ids(&self) -> impl Iterator<Item = &str> {
        self.monsters.keys().map(String::as_str)
    }
}

impl ContentOracle for ContentRegistry {
    fn monster(&self, id: &str) -> Option<&MonsterDefinition> {
        self.monsters.get(id)
    }

    fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    fn spell(&self, id: &str) -> Option<&SpellDefinition> {
        self.spells.get(id)
    }
}

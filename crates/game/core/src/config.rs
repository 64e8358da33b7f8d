/// Game configuration constants and tunable parameters.
///
/// Everything that balance wants to tune without touching engine code lives
/// here. The content crate can override the runtime-tunable fields from a
/// TOML table; the compile-time constants are used as type parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub hit: HitModelConfig,
    pub combat: CombatConfig,
    pub floors: FloorConfig,
    pub connectivity: ConnectivityConfig,
    /// Radius of the player's field of view, in tiles.
    pub fov_radius: i32,
    /// Per-turn probability that an item-capable monster tries to use an item.
    pub monster_item_use_chance: f64,
    /// Probability that a monster item use misfires.
    pub monster_item_failure_rate: f64,
}

/// Accuracy-versus-evasion hit model parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HitModelConfig {
    pub base_hit: f64,
    pub step: f64,
    pub min_hit: f64,
    pub max_hit: f64,
    pub default_accuracy: i32,
    pub default_evasion: i32,
}

impl Default for HitModelConfig {
    fn default() -> Self {
        Self {
            base_hit: 0.75,
            step: 0.05,
            min_hit: 0.05,
            max_hit: 0.95,
            default_accuracy: 2,
            default_evasion: 1,
        }
    }
}

/// d20 attack-roll and damage parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Damage multiplier on a critical hit.
    pub crit_multiplier: i32,
    /// Minimum damage dealt by a connecting attack.
    pub minimum_damage: i32,
    /// Radius of the lich's Command the Dead / Death Siphon auras.
    pub lich_aura_radius: i32,
    /// To-hit bonus granted to allied undead inside a lich aura.
    pub lich_command_bonus: i32,
    /// HP restored to a lich when an allied undead dies inside the aura.
    pub death_siphon_heal: i32,
    /// Fraction of the target's max HP dealt by a resolved Soul Bolt.
    pub soul_bolt_pct: f64,
    /// Fraction of Soul Bolt damage prevented by an active soul ward.
    pub soul_ward_reduction: f64,
    /// Extra-attack probability for the skirmisher's fast pressure.
    pub fast_pressure_chance: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            crit_multiplier: 2,
            minimum_damage: 1,
            lich_aura_radius: 3,
            lich_command_bonus: 1,
            death_siphon_heal: 3,
            soul_bolt_pct: 0.35,
            soul_ward_reduction: 0.70,
            fast_pressure_chance: 0.20,
        }
    }
}

/// Floor persistence and anti-farming parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    /// Manhattan distance from the stairs entry beyond which non-special
    /// entities are dropped on floor re-entry.
    pub despawn_radius: i32,
    /// Fraction of the original per-type spawn count allowed on revisits.
    pub respawn_cap: f64,
    /// How many levels upward the player may travel; 0 disables the limit.
    pub restrict_return_levels: u32,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            despawn_radius: 20,
            respawn_cap: 0.5,
            restrict_return_levels: 0,
        }
    }
}

/// Corridor and door-placement parameters for the connectivity engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// Number of extra non-MST edges added for loops.
    pub loop_count: usize,
    /// Place a door every N corridor tiles; 0 disables door placement.
    pub door_spacing: usize,
    /// Probability that a placed door spawns locked.
    pub locked_door_chance: f64,
    /// Probability that a placed door spawns secret.
    pub secret_door_chance: f64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            loop_count: 2,
            door_spacing: 8,
            locked_door_chance: 0.10,
            secret_door_chance: 0.05,
        }
    }
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum simultaneous status effects per entity.
    pub const MAX_STATUS_EFFECTS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FOV_RADIUS: i32 = 10;

    pub fn new() -> Self {
        Self {
            hit: HitModelConfig::default(),
            combat: CombatConfig::default(),
            floors: FloorConfig::default(),
            connectivity: ConnectivityConfig::default(),
            fov_radius: Self::DEFAULT_FOV_RADIUS,
            monster_item_use_chance: 0.15,
            monster_item_failure_rate: 0.25,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! AI variants and per-turn action selection.
//!
//! All variants implement one contract: `take_turn(actor, target, ctx)`
//! returns the ordered result records for that actor's slot. Shared
//! behavior (taunt redirection, invisibility fallback, immobilization,
//! pathing) lives in [`helpers`]; each variant file owns only its
//! differentiators.

mod basic;
mod boss;
mod confused;
pub(crate) mod helpers;
pub(crate) mod items;
mod lich;
mod necromancer;
mod skeleton;
mod skirmisher;
mod slime;
mod zombie;

use std::collections::BTreeMap;

use strum::{Display, EnumIter, EnumString};

use crate::combat::DamageType;
use crate::engine::{ResultEvent, TurnCtx};
use crate::state::EntityId;

pub use necromancer::raise_corpse;

/// Forced flee behavior, used by the scheduler when fear preempts the AI
/// decision entirely.
pub fn flee_turn(
    ctx: &mut TurnCtx<'_>,
    actor: EntityId,
    threat: EntityId,
) -> Vec<ResultEvent> {
    basic::flee(actor, threat, ctx)
}

/// Content-facing tag naming an AI variant.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Display,
    EnumIter,
    EnumString,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AiKind {
    Basic,
    Boss,
    Zombie,
    Slime,
    Skeleton,
    PlagueNecromancer,
    BoneNecromancer,
    ExploderNecromancer,
    Lich,
    Skirmisher,
}

impl Default for AiKind {
    fn default() -> Self {
        Self::Basic
    }
}

/// Shared state every hostile AI carries.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BasicAi {
    /// Set once the player has seen this monster (or it has been attacked);
    /// never clears. Surprise attacks key off this bit.
    pub aware_of_player: bool,
    /// Latches true on first damage taken; never clears.
    pub in_combat: bool,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BossAi {
    pub base: BasicAi,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZombieAi {
    pub base: BasicAi,
    /// Sticky target held until it dies or leaves sight.
    pub locked_target: Option<EntityId>,
    pub sight_radius: i32,
}

impl Default for ZombieAi {
    fn default() -> Self {
        Self {
            base: BasicAi::default(),
            locked_target: None,
            sight_radius: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlimeAi {
    pub base: BasicAi,
    /// Distance-based vision, enabling off-screen action.
    pub vision_radius: i32,
}

impl Default for SlimeAi {
    fn default() -> Self {
        Self {
            base: BasicAi::default(),
            vision_radius: 10,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SkeletonAi {
    pub base: BasicAi,
}

/// Wraps a previous AI while the owner staggers at random.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConfusedAi {
    pub previous: Box<AiState>,
    pub turns_remaining: i32,
}

/// Config-driven action profile shared by the necromancer family.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NecroProfile {
    #[serde(default = "necro_defaults::action_range")]
    pub action_range: i32,
    #[serde(default = "necro_defaults::action_cooldown_turns")]
    pub action_cooldown_turns: u32,
    #[serde(default = "necro_defaults::danger_radius")]
    pub danger_radius: f64,
    #[serde(default = "necro_defaults::preferred_min")]
    pub preferred_distance_min: i32,
    #[serde(default = "necro_defaults::preferred_max")]
    pub preferred_distance_max: i32,
    /// Monster id raised/summoned by raise-type actions.
    #[serde(default)]
    pub summon_monster_id: Option<String>,
    #[serde(default = "necro_defaults::explosion_radius")]
    pub explosion_radius: i32,
    #[serde(default = "necro_defaults::explosion_damage_min")]
    pub explosion_damage_min: i32,
    #[serde(default = "necro_defaults::explosion_damage_max")]
    pub explosion_damage_max: i32,
    #[serde(default = "necro_defaults::explosion_damage_type")]
    pub explosion_damage_type: DamageType,
}

mod necro_defaults {
    use crate::combat::DamageType;

    pub fn action_range() -> i32 {
        5
    }
    pub fn action_cooldown_turns() -> u32 {
        4
    }
    pub fn danger_radius() -> f64 {
        2.0
    }
    pub fn preferred_min() -> i32 {
        4
    }
    pub fn preferred_max() -> i32 {
        7
    }
    pub fn explosion_radius() -> i32 {
        2
    }
    pub fn explosion_damage_min() -> i32 {
        4
    }
    pub fn explosion_damage_max() -> i32 {
        8
    }
    pub fn explosion_damage_type() -> DamageType {
        DamageType::Necrotic
    }
}

impl Default for NecroProfile {
    fn default() -> Self {
        Self {
            action_range: necro_defaults::action_range(),
            action_cooldown_turns: necro_defaults::action_cooldown_turns(),
            danger_radius: necro_defaults::danger_radius(),
            preferred_distance_min: necro_defaults::preferred_min(),
            preferred_distance_max: necro_defaults::preferred_max(),
            summon_monster_id: None,
            explosion_radius: necro_defaults::explosion_radius(),
            explosion_damage_min: necro_defaults::explosion_damage_min(),
            explosion_damage_max: necro_defaults::explosion_damage_max(),
            explosion_damage_type: necro_defaults::explosion_damage_type(),
        }
    }
}

/// Which corpse economy a necromancer runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NecroAction {
    /// Raise fresh corpses into plague-carrying minions.
    PlagueRaise,
    /// Consume bone piles into bone thralls.
    BoneRaise,
    /// Detonate spent corpses for AoE damage.
    Explode,
}

/// Scenario telemetry recorded on the spawner's AI.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NecroMetrics {
    pub raise_attempts: u32,
    pub raise_successes: u32,
    pub seek_moves: u32,
    pub unsafe_move_blocks: u32,
    pub explosions: u32,
    pub minion_types: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NecromancerAi {
    pub base: BasicAi,
    pub action: NecroAction,
    pub profile: NecroProfile,
    pub cooldown_remaining: u32,
    pub metrics: NecroMetrics,
}

impl NecromancerAi {
    pub fn new(action: NecroAction) -> Self {
        Self {
            base: BasicAi::default(),
            action,
            profile: NecroProfile::default(),
            cooldown_remaining: 0,
            metrics: NecroMetrics::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LichAi {
    pub necro: NecromancerAi,
    pub soul_bolt_cooldown_remaining: u32,
    pub soul_bolt_cooldown_turns: u32,
    pub soul_bolt_range: i32,
}

impl Default for LichAi {
    fn default() -> Self {
        Self {
            necro: NecromancerAi::new(NecroAction::PlagueRaise),
            soul_bolt_cooldown_remaining: 0,
            soul_bolt_cooldown_turns: 4,
            soul_bolt_range: 7,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SkirmisherAi {
    pub base: BasicAi,
    pub leap_cooldown_remaining: u32,
}

/// Tagged union over every AI variant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AiState {
    Basic(BasicAi),
    Boss(BossAi),
    Zombie(ZombieAi),
    Slime(SlimeAi),
    Skeleton(SkeletonAi),
    Confused(ConfusedAi),
    Necromancer(NecromancerAi),
    Lich(LichAi),
    Skirmisher(SkirmisherAi),
}

impl AiState {
    /// Fresh state for a content-defined kind.
    pub fn for_kind(kind: AiKind) -> Self {
        match kind {
            AiKind::Basic => Self::Basic(BasicAi::default()),
            AiKind::Boss => Self::Boss(BossAi::default()),
            AiKind::Zombie => Self::Zombie(ZombieAi::default()),
            AiKind::Slime => Self::Slime(SlimeAi::default()),
            AiKind::Skeleton => Self::Skeleton(SkeletonAi::default()),
            AiKind::PlagueNecromancer => Self::Necromancer(NecromancerAi::new(NecroAction::PlagueRaise)),
            AiKind::BoneNecromancer => Self::Necromancer(NecromancerAi::new(NecroAction::BoneRaise)),
            AiKind::ExploderNecromancer => Self::Necromancer(NecromancerAi::new(NecroAction::Explode)),
            AiKind::Lich => Self::Lich(LichAi::default()),
            AiKind::Skirmisher => Self::Skirmisher(SkirmisherAi::default()),
        }
    }

    /// Install a content-supplied necromancer profile where it applies.
    pub fn set_necro_profile(&mut self, profile: NecroProfile) {
        match self {
            Self::Necromancer(ai) => ai.profile = profile,
            Self::Lich(ai) => ai.necro.profile = profile,
            _ => {}
        }
    }

    /// Whether this actor may use deployed portals.
    ///
    /// Bosses refuse on principle; confused monsters are too chaotic.
    pub fn portal_usable(&self) -> bool {
        !matches!(self, Self::Boss(_) | Self::Confused(_))
    }

    pub fn is_aware(&self) -> bool {
        match self {
            Self::Basic(ai) => ai.aware_of_player,
            Self::Boss(ai) => ai.base.aware_of_player,
            Self::Zombie(ai) => ai.base.aware_of_player,
            Self::Slime(ai) => ai.base.aware_of_player,
            Self::Skeleton(ai) => ai.base.aware_of_player,
            Self::Confused(ai) => ai.previous.is_aware(),
            Self::Necromancer(ai) => ai.base.aware_of_player,
            Self::Lich(ai) => ai.necro.base.aware_of_player,
            Self::Skirmisher(ai) => ai.base.aware_of_player,
        }
    }

    pub fn set_aware(&mut self) {
        match self {
            Self::Basic(ai) => ai.aware_of_player = true,
            Self::Boss(ai) => ai.base.aware_of_player = true,
            Self::Zombie(ai) => ai.base.aware_of_player = true,
            Self::Slime(ai) => ai.base.aware_of_player = true,
            Self::Skeleton(ai) => ai.base.aware_of_player = true,
            Self::Confused(ai) => ai.previous.set_aware(),
            Self::Necromancer(ai) => ai.base.aware_of_player = true,
            Self::Lich(ai) => ai.necro.base.aware_of_player = true,
            Self::Skirmisher(ai) => ai.base.aware_of_player = true,
        }
    }

    pub fn in_combat(&self) -> bool {
        match self {
            Self::Basic(ai) => ai.in_combat,
            Self::Boss(ai) => ai.base.in_combat,
            Self::Zombie(ai) => ai.base.in_combat,
            Self::Slime(ai) => ai.base.in_combat,
            Self::Skeleton(ai) => ai.base.in_combat,
            Self::Confused(ai) => ai.previous.in_combat(),
            Self::Necromancer(ai) => ai.base.in_combat,
            Self::Lich(ai) => ai.necro.base.in_combat,
            Self::Skirmisher(ai) => ai.base.in_combat,
        }
    }

    pub fn set_in_combat(&mut self) {
        match self {
            Self::Basic(ai) => ai.in_combat = true,
            Self::Boss(ai) => ai.base.in_combat = true,
            Self::Zombie(ai) => ai.base.in_combat = true,
            Self::Slime(ai) => ai.base.in_combat = true,
            Self::Skeleton(ai) => ai.base.in_combat = true,
            Self::Confused(ai) => ai.previous.set_in_combat(),
            Self::Necromancer(ai) => ai.base.in_combat = true,
            Self::Lich(ai) => ai.necro.base.in_combat = true,
            Self::Skirmisher(ai) => ai.base.in_combat = true,
        }
    }

    pub fn is_lich(&self) -> bool {
        matches!(self, Self::Lich(_))
    }

    pub fn is_skeleton(&self) -> bool {
        matches!(self, Self::Skeleton(_))
    }

    /// One turn of behavior for the owning actor.
    ///
    /// The scheduler has already run status turn-start hooks; variants must
    /// not re-process them. `target` is the scheduler-computed default
    /// (normally the player); the shared prelude may override it.
    pub fn take_turn(
        &mut self,
        actor: EntityId,
        target: EntityId,
        ctx: &mut TurnCtx<'_>,
    ) -> Vec<ResultEvent> {
        match self {
            Self::Basic(ai) => basic::take_turn(ai, actor, target, ctx),
            Self::Boss(ai) => boss::take_turn(ai, actor, target, ctx),
            Self::Zombie(ai) => zombie::take_turn(ai, actor, ctx),
            Self::Slime(ai) => slime::take_turn(ai, actor, ctx),
            Self::Skeleton(ai) => skeleton::take_turn(ai, actor, target, ctx),
            Self::Necromancer(ai) => necromancer::take_turn(ai, actor, target, ctx),
            Self::Lich(ai) => lich::take_turn(ai, actor, target, ctx),
            Self::Skirmisher(ai) => skirmisher::take_turn(ai, actor, target, ctx),
            Self::Confused(_) => {
                // Handled out-of-line so recovery can replace `self`.
                let Self::Confused(ai) = self else { unreachable!() };
                match confused::take_turn(ai, actor, ctx) {
                    confused::Outcome::Acted(results) => results,
                    confused::Outcome::Recovered(results) => {
                        let previous = std::mem::replace(
                            &mut ai.previous,
                            Box::new(Self::Basic(BasicAi::default())),
                        );
                        *self = *previous;
                        results
                    }
                }
            }
        }
    }
}

//! Boss component: phases, enrage, and dialogue banks.

use std::collections::BTreeSet;

use crate::rng::GameRng;

/// Moments at which a boss can speak.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum DialogueMoment {
    Spawn,
    Hit,
    Enrage,
    LowHp,
    Death,
}

/// Lines available for each dialogue moment.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DialogueBank {
    pub on_spawn: Vec<String>,
    pub on_hit: Vec<String>,
    pub on_enrage: Vec<String>,
    pub on_low_hp: Vec<String>,
    pub on_death: Vec<String>,
}

impl DialogueBank {
    fn lines(&self, moment: DialogueMoment) -> &[String] {
        match moment {
            DialogueMoment::Spawn => &self.on_spawn,
            DialogueMoment::Hit => &self.on_hit,
            DialogueMoment::Enrage => &self.on_enrage,
            DialogueMoment::LowHp => &self.on_low_hp,
            DialogueMoment::Death => &self.on_death,
        }
    }
}

/// Boss fight state.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Boss {
    pub phase: u32,
    pub is_enraged: bool,
    /// Enrage fires once when `hp / max_hp` drops to this fraction.
    pub enrage_threshold: f32,
    /// Outgoing damage multiplier while enraged.
    pub damage_multiplier: f32,
    pub dialogue: DialogueBank,
    /// Lines already spoken; each line fires at most once per run.
    pub used_lines: BTreeSet<String>,
    /// The low-HP bark fires at most once.
    pub low_hp_line_fired: bool,
    pub defeated: bool,
}

impl Boss {
    pub fn new(enrage_threshold: f32, damage_multiplier: f32, dialogue: DialogueBank) -> Self {
        Self {
            phase: 1,
            is_enraged: false,
            enrage_threshold,
            damage_multiplier,
            dialogue,
            used_lines: BTreeSet::new(),
            low_hp_line_fired: false,
            defeated: false,
        }
    }

    /// Whether the boss should enrage at the given HP fraction.
    pub fn should_enrage(&self, hp: i32, max_hp: i32) -> bool {
        !self.is_enraged && max_hp > 0 && (hp as f32 / max_hp as f32) <= self.enrage_threshold
    }

    /// Damage multiplier currently in force.
    pub fn outgoing_multiplier(&self) -> f32 {
        if self.is_enraged { self.damage_multiplier } else { 1.0 }
    }

    /// Pick a random not-yet-used line for the moment and mark it used.
    ///
    /// Returns `None` when the bank for that moment is exhausted.
    pub fn take_line(&mut self, moment: DialogueMoment, rng: &mut GameRng) -> Option<String> {
        let unused: Vec<&String> = self
            .dialogue
            .lines(moment)
            .iter()
            .filter(|l| !self.used_lines.contains(*l))
            .collect();
        let idx = rng.pick_index(unused.len())?;
        let line = unused[idx].clone();
        self.used_lines.insert(line.clone());
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> DialogueBank {
        DialogueBank {
            on_death: vec!["This... changes... nothing...".into(), "Impossible!".into()],
            ..DialogueBank::default()
        }
    }

    #[test]
    fn lines_fire_once_each() {
        let mut boss = Boss::new(0.3, 1.5, bank());
        let mut rng = GameRng::seeded(5);
        let first = boss.take_line(DialogueMoment::Death, &mut rng).unwrap();
        let second = boss.take_line(DialogueMoment::Death, &mut rng).unwrap();
        assert_ne!(first, second);
        assert!(boss.take_line(DialogueMoment::Death, &mut rng).is_none());
    }

    #[test]
    fn enrage_triggers_once_at_threshold() {
        let mut boss = Boss::new(0.25, 2.0, DialogueBank::default());
        assert!(!boss.should_enrage(50, 100));
        assert!(boss.should_enrage(25, 100));
        boss.is_enraged = true;
        assert!(!boss.should_enrage(10, 100));
        assert_eq!(boss.outgoing_multiplier(), 2.0);
    }
}

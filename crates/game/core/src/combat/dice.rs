//! Dice expressions for damage rolls.

use std::fmt;
use std::str::FromStr;

use crate::rng::GameRng;

/// A classic `NdS` dice expression, e.g. `1d6` or `2d4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DiceExpr {
    pub rolls: u32,
    pub sides: u32,
}

impl DiceExpr {
    pub const fn new(rolls: u32, sides: u32) -> Self {
        Self { rolls, sides }
    }

    /// Smallest possible roll.
    pub fn min(self) -> i32 {
        self.rolls as i32
    }

    /// Largest possible roll.
    pub fn max(self) -> i32 {
        (self.rolls * self.sides) as i32
    }

    /// Roll the dice, drawing each die from the engine RNG.
    pub fn roll(self, rng: &mut GameRng) -> i32 {
        (0..self.rolls).map(|_| rng.roll_die(self.sides) as i32).sum()
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.rolls, self.sides)
    }
}

/// Parse error for a malformed dice expression.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid dice expression '{0}'")]
pub struct ParseDiceError(pub String);

impl FromStr for DiceExpr {
    type Err = ParseDiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rolls, sides) = s
            .split_once(['d', 'D'])
            .ok_or_else(|| ParseDiceError(s.to_string()))?;
        let rolls: u32 = rolls.trim().parse().map_err(|_| ParseDiceError(s.to_string()))?;
        let sides: u32 = sides.trim().parse().map_err(|_| ParseDiceError(s.to_string()))?;
        if rolls == 0 || sides == 0 {
            return Err(ParseDiceError(s.to_string()));
        }
        Ok(Self { rolls, sides })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let dice: DiceExpr = "2d6".parse().unwrap();
        assert_eq!(dice, DiceExpr::new(2, 6));
        assert_eq!(dice.to_string(), "2d6");
        assert!("d6".parse::<DiceExpr>().is_err());
        assert!("2d0".parse::<DiceExpr>().is_err());
        assert!("potato".parse::<DiceExpr>().is_err());
    }

    #[test]
    fn rolls_stay_in_range() {
        let dice = DiceExpr::new(3, 4);
        let mut rng = GameRng::seeded(11);
        for _ in 0..500 {
            let v = dice.roll(&mut rng);
            assert!(v >= dice.min() && v <= dice.max());
        }
    }
}

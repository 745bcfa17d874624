//! Support conditions

use serde::{Deserialize, Serialize};

use crate::topology::Direction;

/// Support condition at a structural node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Support {
    /// Both translations restrained, rotation free
    Hinged,
    /// One translation restrained
    Roll {
        #[serde(default = "default_roll_direction")]
        direction: Direction,
    },
    /// All three DOFs restrained
    Fixed,
}

fn default_roll_direction() -> Direction {
    Direction::Z
}

impl Support {
    /// Create a roller restraining translation along Z
    pub fn roll() -> Self {
        Support::Roll {
            direction: default_roll_direction(),
        }
    }

    /// Get list of restrained directions
    pub fn restrained_directions(&self) -> Vec<Direction> {
        match self {
            Support::Hinged => vec![Direction::X, Direction::Z],
            Support::Roll { direction } => vec![*direction],
            Support::Fixed => Direction::ALL.to_vec(),
        }
    }

    /// Count number of restrained DOFs
    pub fn num_restrained(&self) -> usize {
        self.restrained_directions().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_support() {
        assert_eq!(Support::Fixed.num_restrained(), 3);
    }

    #[test]
    fn test_hinged_support() {
        assert_eq!(Support::Hinged.restrained_directions(), vec![Direction::X, Direction::Z]);
    }

    #[test]
    fn test_roll_defaults_to_vertical() {
        assert_eq!(Support::roll().restrained_directions(), vec![Direction::Z]);

        let parsed: Support = serde_json::from_str(r#"{"kind": "roll"}"#).unwrap();
        assert_eq!(parsed, Support::roll());

        let parsed: Support = serde_json::from_str(r#"{"kind": "roll", "direction": "X"}"#).unwrap();
        assert_eq!(parsed.restrained_directions(), vec![Direction::X]);
    }
}

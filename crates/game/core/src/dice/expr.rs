//! Dice-valued characteristics (`D6`, `2D3+1`, `4`).

use core::fmt;
use core::str::FromStr;

use super::DiceSource;

/// Error produced when a dice notation string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("empty dice expression")]
    Empty,

    #[error("invalid dice expression `{0}`")]
    Invalid(String),

    #[error("dice expression `{0}` uses a die with no faces")]
    ZeroSides(String),
}

/// A characteristic that is either a fixed number or `NdS+K`.
///
/// Fixed values are stored with `count = 0`, so [`DiceExpr::roll`] consumes no
/// dice for them. Serialized as notation (`"D6+1"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct DiceExpr {
    count: u8,
    sides: u8,
    bonus: i16,
}

/// Individual dice and total of one [`DiceExpr`] roll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceRoll {
    pub faces: Vec<u8>,
    pub total: u32,
}

impl DiceExpr {
    /// A constant value, clamped to the largest representable bonus.
    pub const fn fixed(value: u16) -> Self {
        let bonus = if value > i16::MAX as u16 {
            i16::MAX
        } else {
            value as i16
        };
        Self {
            count: 0,
            sides: 0,
            bonus,
        }
    }

    pub const fn dice(count: u8, sides: u8, bonus: i16) -> Self {
        Self {
            count,
            sides,
            bonus,
        }
    }

    pub const fn d6() -> Self {
        Self::dice(1, 6, 0)
    }

    pub const fn d3() -> Self {
        Self::dice(1, 3, 0)
    }

    pub const fn is_fixed(&self) -> bool {
        self.count == 0 || self.sides == 0
    }

    /// The value when [`is_fixed`](Self::is_fixed), floored at zero.
    pub fn fixed_value(&self) -> Option<u32> {
        self.is_fixed().then(|| self.bonus.max(0) as u32)
    }

    pub const fn count(&self) -> u8 {
        self.count
    }

    pub const fn sides(&self) -> u8 {
        self.sides
    }

    pub const fn bonus(&self) -> i16 {
        self.bonus
    }

    /// Expected value, ignoring the zero floor.
    pub fn average(&self) -> f64 {
        if self.is_fixed() {
            return f64::from(self.bonus);
        }
        f64::from(self.count) * (f64::from(self.sides) + 1.0) / 2.0 + f64::from(self.bonus)
    }

    /// Roll the expression, returning every die face and the floored total.
    pub fn roll(&self, dice: &mut (impl DiceSource + ?Sized)) -> DiceRoll {
        if self.is_fixed() {
            return DiceRoll {
                faces: Vec::new(),
                total: self.bonus.max(0) as u32,
            };
        }

        let faces: Vec<u8> = (0..self.count).map(|_| dice.roll(self.sides)).collect();
        let sum: i32 = faces.iter().map(|f| i32::from(*f)).sum::<i32>() + i32::from(self.bonus);

        DiceRoll {
            faces,
            total: sum.max(0) as u32,
        }
    }
}

impl Default for DiceExpr {
    fn default() -> Self {
        Self::fixed(1)
    }
}

impl From<u16> for DiceExpr {
    fn from(value: u16) -> Self {
        Self::fixed(value)
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fixed() {
            return write!(f, "{}", self.bonus);
        }
        if self.count > 1 {
            write!(f, "{}", self.count)?;
        }
        write!(f, "D{}", self.sides)?;
        match self.bonus {
            0 => Ok(()),
            b if b > 0 => write!(f, "+{b}"),
            b => write!(f, "{b}"),
        }
    }
}

impl FromStr for DiceExpr {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(DiceError::Empty);
        }
        let invalid = || DiceError::Invalid(s.to_string());

        let Some(d_pos) = compact.find(['d', 'D']) else {
            let value: i16 = compact.parse().map_err(|_| invalid())?;
            if value < 0 {
                return Err(invalid());
            }
            return Ok(Self::fixed(value as u16));
        };

        let (count_part, rest) = compact.split_at(d_pos);
        let rest = &rest[1..];

        let count: u8 = if count_part.is_empty() {
            1
        } else {
            count_part.parse().map_err(|_| invalid())?
        };

        let bonus_pos = rest.find(['+', '-']);
        let (sides_part, bonus_part) = match bonus_pos {
            Some(pos) => rest.split_at(pos),
            None => (rest, ""),
        };

        let sides: u8 = sides_part.parse().map_err(|_| invalid())?;
        if sides == 0 {
            return Err(DiceError::ZeroSides(s.to_string()));
        }
        if count == 0 {
            return Err(invalid());
        }

        let bonus: i16 = if bonus_part.is_empty() {
            0
        } else {
            bonus_part
                .trim_start_matches('+')
                .parse()
                .map_err(|_| invalid())?
        };

        Ok(Self::dice(count, sides, bonus))
    }
}

impl TryFrom<String> for DiceExpr {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceExpr> for String {
    fn from(value: DiceExpr) -> Self {
        value.to_string()
    }
}

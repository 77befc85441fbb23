//! Turn identifiers.
//!
//! Each battle round contains one turn per player, so statuses and army facts
//! are keyed by the compound `(round, player)` rather than the round alone.

use core::fmt;

/// A player's seat in the battle, in turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub const fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// One player's turn within a battle round.
///
/// Ordered by round, then seat, which is exactly the order turns are played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnKey {
    pub round: u8,
    pub player: Seat,
}

impl TurnKey {
    /// Second player's turn of the last representable round.
    pub const LAST: Self = Self::new(u8::MAX, Seat::Second);

    pub const fn new(round: u8, player: Seat) -> Self {
        Self { round, player }
    }

    /// The turn played immediately after this one. [`TurnKey::LAST`] has no
    /// successor and returns itself.
    pub const fn next(self) -> Self {
        match self.player {
            Seat::First => Self::new(self.round, Seat::Second),
            Seat::Second => match self.round.checked_add(1) {
                Some(round) => Self::new(round, Seat::First),
                None => Self::LAST,
            },
        }
    }
}

impl fmt::Display for TurnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seat = match self.player {
            Seat::First => 1,
            Seat::Second => 2,
        };
        write!(f, "R{}P{}", self.round, seat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_order_by_round_then_seat() {
        let r1p1 = TurnKey::new(1, Seat::First);
        let r1p2 = TurnKey::new(1, Seat::Second);
        let r2p1 = TurnKey::new(2, Seat::First);
        assert!(r1p1 < r1p2);
        assert!(r1p2 < r2p1);
        assert_eq!(r1p1.next(), r1p2);
        assert_eq!(r1p2.next(), r2p1);
    }

    #[test]
    fn next_never_moves_backwards() {
        let penultimate = TurnKey::new(u8::MAX, Seat::First);
        assert_eq!(penultimate.next(), TurnKey::LAST);
        assert_eq!(TurnKey::LAST.next(), TurnKey::LAST);
        assert!(TurnKey::LAST.next() >= TurnKey::LAST);
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(TurnKey::new(3, Seat::Second).to_string(), "R3P2");
    }
}

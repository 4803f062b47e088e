use rand::Rng;

use crate::error::SpawnError;
use crate::snake::Position;

/// Points granted for an ordinary consumable.
pub const ORDINARY_FOOD_POINTS: u32 = 10;

/// Points granted for a bonus consumable.
pub const BONUS_FOOD_POINTS: u32 = 25;

/// Food type; decides the points it is worth.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FoodKind {
    Ordinary,
    Bonus,
}

impl FoodKind {
    /// Returns the score value granted when eaten.
    #[must_use]
    pub fn points(self) -> u32 {
        match self {
            Self::Ordinary => ORDINARY_FOOD_POINTS,
            Self::Bonus => BONUS_FOOD_POINTS,
        }
    }
}

/// Food currently active on the board.
///
/// A `Food` is an immutable value: respawning produces a new one that the
/// engine swaps in wholesale.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    position: Position,
    kind: FoodKind,
}

impl Food {
    /// Creates food of `kind` at `position`.
    #[must_use]
    pub fn new(position: Position, kind: FoodKind) -> Self {
        Self { position, kind }
    }

    /// Creates ordinary food at `position`.
    #[must_use]
    pub fn ordinary(position: Position) -> Self {
        Self::new(position, FoodKind::Ordinary)
    }

    /// Creates bonus food at `position`.
    #[must_use]
    pub fn bonus(position: Position) -> Self {
        Self::new(position, FoodKind::Bonus)
    }

    /// Picks a uniformly random cell from `free_cells` and, independently,
    /// a kind that is a bonus with `bonus_probability`.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        free_cells: &[Position],
        bonus_probability: f64,
    ) -> Result<Self, SpawnError> {
        if free_cells.is_empty() {
            return Err(SpawnError::BoardFull);
        }

        let position = free_cells[rng.gen_range(0..free_cells.len())];
        let kind = if rng.gen_bool(bonus_probability.clamp(0.0, 1.0)) {
            FoodKind::Bonus
        } else {
            FoodKind::Ordinary
        };

        Ok(Self::new(position, kind))
    }

    /// Returns true when the food sits on `position`.
    #[must_use]
    pub fn overlaps(self, position: Position) -> bool {
        self.position == position
    }

    /// Returns the score value granted when eaten.
    #[must_use]
    pub fn points(self) -> u32 {
        self.kind.points()
    }

    #[must_use]
    pub fn position(self) -> Position {
        self.position
    }

    #[must_use]
    pub fn kind(self) -> FoodKind {
        self.kind
    }
}

use crate::engine::EngineState;
use crate::events::GameOverReason;
use crate::food::Food;
use crate::input::Direction;
use crate::score::ScoreSummary;
use crate::snake::Position;

/// One snake cell as a renderer sees it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Segment {
    pub position: Position,
    pub is_head: bool,
}

/// Read-only, render-ready copy of the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid_size: u16,
    /// Head first, tail last. After a wall collision the head may lie
    /// outside the grid.
    pub segments: Vec<Segment>,
    pub direction: Direction,
    /// `None` once the board is full.
    pub food: Option<Food>,
    pub score: ScoreSummary,
    pub state: EngineState,
    pub game_over_reason: Option<GameOverReason>,
    pub speed_level: u32,
}

impl Snapshot {
    #[must_use]
    pub fn head(&self) -> Option<Position> {
        self.segments.first().map(|segment| segment.position)
    }
}

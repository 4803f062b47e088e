use std::collections::HashSet;

use crate::error::ConfigError;
use crate::snake::Position;

/// Square board of `size` x `size` cells addressed from the top-left corner.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Grid {
    size: u16,
}

impl Grid {
    /// Creates a grid, rejecting an empty board.
    pub fn new(size: u16) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyGrid);
        }

        Ok(Self { size })
    }

    /// Returns the side length in cells.
    #[must_use]
    pub fn size(self) -> u16 {
        self.size
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.size) * usize::from(self.size)
    }

    /// Returns true when the position lies inside the board.
    #[must_use]
    pub fn is_in_bounds(self, position: Position) -> bool {
        let size = i32::from(self.size);
        position.x >= 0 && position.y >= 0 && position.x < size && position.y < size
    }

    /// Returns the middle cell, rounding down on even sizes.
    #[must_use]
    pub fn center(self) -> Position {
        let middle = i32::from(self.size / 2);
        Position {
            x: middle,
            y: middle,
        }
    }

    /// Lists every cell not in `occupied`, in row-major order.
    #[must_use]
    pub fn free_cells(self, occupied: &HashSet<Position>) -> Vec<Position> {
        let size = i32::from(self.size);
        let mut cells = Vec::with_capacity(self.total_cells().saturating_sub(occupied.len()));

        for y in 0..size {
            for x in 0..size {
                let position = Position { x, y };
                if !occupied.contains(&position) {
                    cells.push(position);
                }
            }
        }

        cells
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::Grid;
    use crate::error::ConfigError;
    use crate::snake::Position;

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert!(matches!(Grid::new(0), Err(ConfigError::EmptyGrid)));
        assert_eq!(
            ConfigError::EmptyGrid.to_string(),
            "grid size must be positive"
        );
        assert!(Grid::new(1).is_ok());
    }

    #[test]
    fn bounds_cover_exactly_the_board() {
        let grid = Grid::new(4).expect("grid should build");

        assert!(grid.is_in_bounds(Position { x: 0, y: 0 }));
        assert!(grid.is_in_bounds(Position { x: 3, y: 3 }));
        assert!(!grid.is_in_bounds(Position { x: -1, y: 0 }));
        assert!(!grid.is_in_bounds(Position { x: 0, y: 4 }));
        assert!(!grid.is_in_bounds(Position { x: 4, y: 2 }));
    }

    #[test]
    fn center_rounds_down() {
        assert_eq!(
            Grid::new(10).expect("grid should build").center(),
            Position { x: 5, y: 5 }
        );
        assert_eq!(
            Grid::new(7).expect("grid should build").center(),
            Position { x: 3, y: 3 }
        );
    }

    #[test]
    fn free_cells_are_row_major_and_skip_occupied() {
        let grid = Grid::new(2).expect("grid should build");
        let occupied = HashSet::from([Position { x: 1, y: 0 }]);

        assert_eq!(
            grid.free_cells(&occupied),
            vec![
                Position { x: 0, y: 0 },
                Position { x: 0, y: 1 },
                Position { x: 1, y: 1 },
            ]
        );
    }

    #[test]
    fn fully_occupied_grid_has_no_free_cells() {
        let grid = Grid::new(2).expect("grid should build");
        let occupied: HashSet<Position> = (0..2)
            .flat_map(|y| (0..2).map(move |x| Position { x, y }))
            .collect();

        assert!(grid.free_cells(&occupied).is_empty());
    }
}

use std::collections::{HashSet, VecDeque};

use crate::grid::Grid;
use crate::input::{direction_change_is_valid, Direction};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns the neighbouring position one cell away in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Mutable snake state: ordered body segments plus the applied and pending
/// movement directions.
///
/// The snake never checks board bounds itself; the engine does that right
/// after each [`Snake::advance`].
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Direction,
    initial_body: VecDeque<Position>,
    initial_direction: Direction,
}

impl Snake {
    /// Lays out a horizontal snake of `length` cells with its head on the
    /// grid centre, trailing leftward and heading right.
    #[must_use]
    pub fn spawn(grid: Grid, length: usize) -> Self {
        let head = grid.center();
        let segments = (0..length.max(1))
            .map(|index| Position {
                x: head.x - index as i32,
                y: head.y,
            })
            .collect();

        Self::from_segments(segments, Direction::Right)
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics if `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        assert!(
            !segments.is_empty(),
            "snake body must always contain at least one segment"
        );

        let body = VecDeque::from(segments);
        Self {
            initial_body: body.clone(),
            initial_direction: direction,
            body,
            direction,
            pending_direction: direction,
        }
    }

    /// Records `direction` for the next advance unless it reverses the
    /// direction the snake is currently moving in.
    ///
    /// The check is made against the applied direction, not the pending one,
    /// so two quick inputs between advances can never add up to a reversal.
    pub fn request_direction(&mut self, direction: Direction) {
        if direction_change_is_valid(self.direction, direction) {
            self.pending_direction = direction;
        }
    }

    /// Applies the pending direction and moves one cell, keeping the length.
    pub fn advance(&mut self) {
        self.direction = self.pending_direction;
        let next_head = self.head().step(self.direction);

        self.body.push_front(next_head);
        let _ = self.body.pop_back();
    }

    /// Duplicates the tail so the next advance leaves the snake one longer.
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.body.push_back(tail);
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn has_self_collision(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Restores the layout and heading the snake was created with.
    pub fn reset(&mut self) {
        self.body = self.initial_body.clone();
        self.direction = self.initial_direction;
        self.pending_direction = self.initial_direction;
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the current tail position.
    #[must_use]
    pub fn tail(&self) -> Position {
        *self
            .body
            .back()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns the set of distinct cells covered by the body.
    #[must_use]
    pub fn occupied_cells(&self) -> HashSet<Position> {
        self.body.iter().copied().collect()
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a live snake has at least one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the direction applied on the last advance.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the direction the next advance will use.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::Grid;
    use crate::input::Direction;

    use super::{Position, Snake};

    const ALL_DIRECTIONS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn grid(size: u16) -> Grid {
        Grid::new(size).expect("grid should build")
    }

    #[test]
    fn spawn_lays_out_horizontally_with_head_on_center() {
        let snake = Snake::spawn(grid(10), 3);

        let segments: Vec<Position> = snake.segments().copied().collect();
        assert_eq!(
            segments,
            vec![
                Position { x: 5, y: 5 },
                Position { x: 4, y: 5 },
                Position { x: 3, y: 5 },
            ]
        );
        assert_eq!(snake.direction(), Direction::Right);
        assert!(!snake.has_self_collision());
    }

    #[test]
    fn snake_moves_one_cell_per_advance() {
        let mut snake = Snake::from_segments(vec![Position { x: 5, y: 5 }], Direction::Right);

        snake.advance();

        assert_eq!(snake.head(), Position { x: 6, y: 5 });
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn every_non_reversing_request_moves_by_its_offset() {
        for current in ALL_DIRECTIONS {
            for requested in ALL_DIRECTIONS {
                if requested == current.opposite() {
                    continue;
                }

                let mut snake = Snake::from_segments(
                    vec![Position { x: 5, y: 5 }, Position { x: 5, y: 5 }.step(current.opposite())],
                    current,
                );
                snake.request_direction(requested);
                snake.advance();

                let (dx, dy) = requested.offset();
                assert_eq!(snake.head(), Position { x: 5 + dx, y: 5 + dy });
            }
        }
    }

    #[test]
    fn reversal_request_is_dropped() {
        let mut snake = Snake::from_segments(vec![Position { x: 5, y: 5 }], Direction::Up);

        snake.request_direction(Direction::Down);
        assert_eq!(snake.pending_direction(), Direction::Up);

        snake.advance();
        assert_eq!(snake.head(), Position { x: 5, y: 4 });
    }

    #[test]
    fn reversal_is_judged_against_applied_direction() {
        let mut snake = Snake::spawn(grid(10), 3);

        // Up is accepted; Left still reverses the applied Right and is dropped.
        snake.request_direction(Direction::Up);
        snake.request_direction(Direction::Left);
        assert_eq!(snake.pending_direction(), Direction::Up);

        // Down does not reverse Right, so it replaces the pending Up.
        snake.request_direction(Direction::Down);
        snake.advance();
        assert_eq!(snake.head(), Position { x: 5, y: 6 });
    }

    #[test]
    fn growth_adds_exactly_one_segment_over_next_advance() {
        let mut snake = Snake::spawn(grid(10), 3);
        let before: Vec<Position> = snake.segments().copied().collect();

        snake.grow();
        snake.advance();

        let after: Vec<Position> = snake.segments().copied().collect();
        assert_eq!(after.len(), 4);
        assert_eq!(after[0], Position { x: 6, y: 5 });
        assert_eq!(&after[1..], &before[..]);
    }

    #[test]
    fn repeated_advances_keep_length() {
        let mut snake = Snake::spawn(grid(20), 4);

        for _ in 0..6 {
            snake.advance();
            assert_eq!(snake.len(), 4);
        }
    }

    #[test]
    fn single_segment_snake_never_self_collides() {
        let mut snake = Snake::from_segments(vec![Position { x: 3, y: 3 }], Direction::Right);
        let turns = [
            Direction::Down,
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Right,
            Direction::Up,
        ];

        assert!(!snake.has_self_collision());
        for turn in turns {
            snake.request_direction(turn);
            snake.advance();
            assert!(!snake.has_self_collision());
        }
    }

    #[test]
    fn looping_back_onto_body_is_a_self_collision() {
        let mut snake = Snake::from_segments(
            vec![
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
                Position { x: 1, y: 3 },
                Position { x: 2, y: 3 },
                Position { x: 3, y: 3 },
                Position { x: 3, y: 2 },
            ],
            Direction::Right,
        );

        snake.request_direction(Direction::Down);
        snake.advance();

        assert!(snake.has_self_collision());
    }

    #[test]
    fn occupies_checks_every_segment() {
        let snake = Snake::spawn(grid(10), 3);

        assert!(snake.occupies(Position { x: 3, y: 5 }));
        assert!(!snake.occupies(Position { x: 6, y: 5 }));
    }

    #[test]
    fn reset_restores_initial_layout() {
        let mut snake = Snake::spawn(grid(10), 3);
        let initial: Vec<Position> = snake.segments().copied().collect();

        snake.request_direction(Direction::Up);
        snake.grow();
        snake.advance();
        snake.reset();

        assert_eq!(snake.segments().copied().collect::<Vec<_>>(), initial);
        assert_eq!(snake.direction(), Direction::Right);
        assert_eq!(snake.pending_direction(), Direction::Right);
    }
}

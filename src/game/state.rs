use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use super::action::Direction;
use super::config::MIN_ARENA_SIDE;
use crate::error::ConfigError;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Manhattan distance to another position
    pub fn manhattan(&self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Bounded rectangular arena; the outermost ring of cells is wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arena {
    width: usize,
    height: usize,
}

impl Arena {
    /// Create an arena, rejecting anything without a 2x2 interior
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        if width < MIN_ARENA_SIDE || height < MIN_ARENA_SIDE {
            return Err(ConfigError::ArenaTooSmall { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True for cells on or beyond the wall frame
    pub fn is_wall(&self, pos: Position) -> bool {
        pos.x <= 0
            || pos.x >= self.width as i32 - 1
            || pos.y <= 0
            || pos.y >= self.height as i32 - 1
    }

    /// True for cells strictly inside the wall frame
    pub fn is_interior(&self, pos: Position) -> bool {
        !self.is_wall(pos)
    }

    /// Every interior cell, row by row
    pub fn interior_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (1..self.height as i32 - 1)
            .flat_map(move |y| (1..self.width as i32 - 1).map(move |x| Position::new(x, y)))
    }
}

/// Identifier of a snake within a round; also its update order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnakeId(pub usize);

impl SnakeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SnakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A snake in the round
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub id: SnakeId,
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
    /// Cleared once on death, never set again within a round
    pub alive: bool,
}

impl Snake {
    /// Create a single-segment snake at `start`
    pub fn new(id: SnakeId, start: Position, direction: Direction) -> Self {
        Self::from_body(id, vec![start], direction)
    }

    /// Create a snake with an explicit body, head first
    pub fn from_body(id: SnakeId, body: Vec<Position>, direction: Direction) -> Self {
        assert!(!body.is_empty(), "snake body must have at least one segment");
        Self {
            id,
            body,
            direction,
            alive: true,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position is any segment of this snake, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Request a new heading; reversals are ignored. Returns the heading in effect.
    pub fn steer(&mut self, requested: Direction) -> Direction {
        self.direction = self.direction.steer(requested);
        self.direction
    }

    /// Shift the whole body one cell in the current direction
    pub fn advance(&mut self) {
        if !self.alive {
            return;
        }
        let new_head = self.head().moved_in_direction(self.direction);
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        self.body[0] = new_head;
    }

    /// Duplicate the tail; the copy separates on the next advance
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.body.push(tail);
    }

    /// Mark dead if the head is on or outside the wall frame
    pub fn check_wall_collision(&mut self, arena: &Arena) -> bool {
        if arena.is_wall(self.head()) {
            self.alive = false;
            return true;
        }
        false
    }

    /// Mark dead if the head overlaps any other segment
    pub fn check_self_collision(&mut self) -> bool {
        let head = self.head();
        if self.body_segments().contains(&head) {
            self.alive = false;
            return true;
        }
        false
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a valid snake
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake's head ran into another snake
    Snake(SnakeId),
}

impl fmt::Display for CollisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionType::Wall => write!(f, "wall"),
            CollisionType::SelfCollision => write!(f, "itself"),
            CollisionType::Snake(other) => write!(f, "{other}"),
        }
    }
}

/// The single food item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    /// Place food on a random free interior cell
    pub fn spawn<R: Rng + ?Sized>(arena: &Arena, snakes: &[Snake], rng: &mut R) -> Self {
        let mut food = Self {
            position: Position::new(1, 1),
        };
        food.respawn(arena, snakes, rng);
        food
    }

    /// Move the food to a uniformly chosen interior cell.
    ///
    /// Cells covered by any snake are avoided; if none are free, cells covered
    /// only by dead snakes are allowed, and failing that any interior cell.
    pub fn respawn<R: Rng + ?Sized>(&mut self, arena: &Arena, snakes: &[Snake], rng: &mut R) {
        let all: HashSet<Position> = snakes.iter().flat_map(|s| s.body.iter().copied()).collect();
        let living: HashSet<Position> = snakes
            .iter()
            .filter(|s| s.alive)
            .flat_map(|s| s.body.iter().copied())
            .collect();

        let interior: Vec<Position> = arena.interior_cells().collect();
        let mut candidates: Vec<Position> =
            interior.iter().copied().filter(|p| !all.contains(p)).collect();
        if candidates.is_empty() {
            candidates = interior.iter().copied().filter(|p| !living.contains(p)).collect();
        }
        if candidates.is_empty() {
            candidates = interior;
        }

        if let Some(p) = candidates.choose(rng) {
            self.position = *p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn arena(w: usize, h: usize) -> Arena {
        Arena::new(w, h).unwrap()
    }

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_by(0, -1), Position::new(5, 4));
        assert_eq!(pos.manhattan(Position::new(2, 7)), 5);
    }

    #[test]
    fn test_arena_minimum() {
        assert!(Arena::new(4, 4).is_ok());
        assert!(Arena::new(3, 4).is_err());
        assert!(Arena::new(4, 3).is_err());
        assert_eq!(arena(4, 4).interior_cells().count(), 4);
    }

    #[test]
    fn test_wall_ring() {
        let a = arena(10, 8);
        for x in 0..10 {
            assert!(a.is_wall(Position::new(x, 0)));
            assert!(a.is_wall(Position::new(x, 7)));
        }
        for y in 0..8 {
            assert!(a.is_wall(Position::new(0, y)));
            assert!(a.is_wall(Position::new(9, y)));
        }
        assert!(a.is_wall(Position::new(-1, 3)));
        for p in a.interior_cells() {
            assert!(a.is_interior(p));
        }
        assert_eq!(a.interior_cells().count(), 8 * 6);
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(SnakeId(0), Position::new(5, 5), Direction::Right);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.tail(), Position::new(5, 5));
        assert!(snake.alive);
    }

    #[test]
    fn test_snake_advance_translates_body() {
        let body = vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)];
        let mut snake = Snake::from_body(SnakeId(0), body, Direction::Right);

        snake.advance();
        assert_eq!(
            snake.body,
            vec![Position::new(6, 5), Position::new(5, 5), Position::new(4, 5)]
        );

        snake.steer(Direction::Down);
        snake.advance();
        assert_eq!(
            snake.body,
            vec![Position::new(6, 6), Position::new(6, 5), Position::new(5, 5)]
        );
    }

    #[test]
    fn test_dead_snake_does_not_move() {
        let mut snake = Snake::new(SnakeId(0), Position::new(5, 5), Direction::Right);
        snake.alive = false;
        snake.advance();
        assert_eq!(snake.head(), Position::new(5, 5));
    }

    #[test]
    fn test_grow_then_advance_adds_one_contiguous_segment() {
        let body = vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)];
        let mut snake = Snake::from_body(SnakeId(0), body, Direction::Right);

        snake.grow();
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.body[3], snake.body[2]);

        snake.advance();
        assert_eq!(snake.len(), 4);
        for pair in snake.body.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
        assert_eq!(snake.tail(), Position::new(3, 5));
    }

    #[test]
    fn test_single_segment_growth() {
        let mut snake = Snake::new(SnakeId(0), Position::new(5, 5), Direction::Up);
        snake.grow();
        snake.advance();
        assert_eq!(snake.body, vec![Position::new(5, 4), Position::new(5, 5)]);
        assert!(!snake.check_self_collision());
    }

    #[test]
    fn test_reversal_rejected() {
        for dir in Direction::ALL {
            let mut snake = Snake::new(SnakeId(0), Position::new(5, 5), dir);
            assert_eq!(snake.steer(dir.opposite()), dir);
            assert_eq!(snake.direction, dir);
        }
    }

    #[test]
    fn test_wall_collision_boundary() {
        let a = arena(10, 10);
        let deadly = [
            Position::new(0, 4),
            Position::new(9, 4),
            Position::new(4, 0),
            Position::new(4, 9),
        ];
        for pos in deadly {
            let mut snake = Snake::new(SnakeId(0), pos, Direction::Up);
            assert!(snake.check_wall_collision(&a));
            assert!(!snake.alive);
        }

        for pos in a.interior_cells() {
            let mut snake = Snake::new(SnakeId(0), pos, Direction::Up);
            assert!(!snake.check_wall_collision(&a));
            assert!(snake.alive);
        }
    }

    #[test]
    fn test_self_collision() {
        // Head folded back onto its own body
        let body = vec![
            Position::new(5, 5),
            Position::new(5, 6),
            Position::new(4, 6),
            Position::new(4, 5),
            Position::new(5, 5),
        ];
        let mut snake = Snake::from_body(SnakeId(0), body, Direction::Up);
        assert!(snake.check_self_collision());
        assert!(!snake.alive);

        let mut straight = Snake::from_body(
            SnakeId(1),
            vec![Position::new(5, 5), Position::new(4, 5)],
            Direction::Right,
        );
        assert!(!straight.check_self_collision());
        assert!(straight.alive);
    }

    #[test]
    fn test_food_avoids_snakes() {
        let a = arena(5, 5);
        // Interior is 3x3; cover all but (3, 3)
        let body: Vec<Position> = a
            .interior_cells()
            .filter(|p| *p != Position::new(3, 3))
            .collect();
        let snake = Snake::from_body(SnakeId(0), body, Direction::Up);

        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..20 {
            let food = Food::spawn(&a, std::slice::from_ref(&snake), &mut rng);
            assert_eq!(food.position, Position::new(3, 3));
        }
    }

    #[test]
    fn test_food_falls_back_to_dead_bodies() {
        let a = arena(4, 4);
        let mut dead = Snake::from_body(
            SnakeId(0),
            vec![Position::new(1, 1), Position::new(2, 1)],
            Direction::Left,
        );
        dead.alive = false;
        let living = Snake::from_body(
            SnakeId(1),
            vec![Position::new(1, 2), Position::new(2, 2)],
            Direction::Left,
        );
        let snakes = vec![dead, living];

        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..20 {
            let food = Food::spawn(&a, &snakes, &mut rng);
            assert!(food.position.y == 1);
        }
    }

    #[test]
    fn test_food_stays_inside() {
        let a = arena(10, 6);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            let food = Food::spawn(&a, &[], &mut rng);
            assert!(a.is_interior(food.position));
        }
    }
}

use crossterm::event::KeyCode;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use super::{
    action::Direction,
    config::GameConfig,
    state::{Arena, CollisionType, Food, Position, Snake, SnakeId},
};
use crate::metrics::ScoreReport;
use crate::policy::{Feedback, Policy, WorldView};

/// Whether the round still accepts ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Running,
    /// Terminal: no snake is alive, or the tick cap was reached
    RoundOver,
}

/// What happened to one snake during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct SnakeEvent {
    pub id: SnakeId,
    /// Heading in effect after the no-reversal filter
    pub direction: Direction,
    /// Head position after the move
    pub head: Position,
    /// Reward delivered to the snake's policy
    pub reward: f32,
    pub ate_food: bool,
    /// Cause of death, if the snake died this tick
    pub collision: Option<CollisionType>,
}

/// Outcome of a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Number of the tick, starting at 1
    pub tick: u64,
    /// One entry per snake that was alive when the tick began
    pub events: Vec<SnakeEvent>,
    /// New food positions, in the order they were placed
    pub food_respawns: Vec<Position>,
    pub status: RoundStatus,
}

impl TickReport {
    pub fn event(&self, id: SnakeId) -> Option<&SnakeEvent> {
        self.events.iter().find(|e| e.id == id)
    }
}

/// Tick orchestrator for a multi-snake round.
///
/// Owns the arena, the food, every snake with its policy, and the single
/// seeded generator all randomness flows from. One call to [`tick`] advances
/// the world one step; the caller supplies the frame clock.
///
/// [`tick`]: GameEngine::tick
pub struct GameEngine {
    config: GameConfig,
    arena: Arena,
    food: Food,
    snakes: Vec<Snake>,
    /// Spawn cell and heading per snake, reused by `reset`
    starts: Vec<(Position, Direction)>,
    policies: Vec<Box<dyn Policy>>,
    rng: SmallRng,
    status: RoundStatus,
    ticks: u64,
    rounds: u64,
    report: Option<ScoreReport>,
}

impl GameEngine {
    /// Assemble a validated round; see [`super::RoundBuilder`]
    pub(crate) fn from_parts(
        config: GameConfig,
        arena: Arena,
        starts: Vec<(Position, Direction)>,
        policies: Vec<Box<dyn Policy>>,
        mut rng: SmallRng,
    ) -> Self {
        let snakes = Self::spawn_snakes(&starts);
        let food = Food::spawn(&arena, &snakes, &mut rng);
        let mut engine = Self {
            config,
            arena,
            food,
            snakes,
            starts,
            policies,
            rng,
            status: RoundStatus::Running,
            ticks: 0,
            rounds: 1,
            report: None,
        };
        engine.begin_round();
        engine
    }

    fn spawn_snakes(starts: &[(Position, Direction)]) -> Vec<Snake> {
        starts
            .iter()
            .enumerate()
            .map(|(i, &(start, direction))| Snake::new(SnakeId(i), start, direction))
            .collect()
    }

    fn begin_round(&mut self) {
        for policy in &mut self.policies {
            policy.on_round_start();
        }
        debug!(
            round = self.rounds,
            snakes = self.snakes.len(),
            food = ?self.food.position,
            "round started"
        );
    }

    fn end_round(&mut self) {
        for policy in &mut self.policies {
            policy.on_round_end();
        }
    }

    /// Start a fresh round with the same snakes and policies
    ///
    /// A round still running is closed first, so policies see its end.
    pub fn reset(&mut self) {
        if self.status == RoundStatus::Running {
            debug!(round = self.rounds, ticks = self.ticks, "round abandoned");
            self.end_round();
        }
        self.snakes = Self::spawn_snakes(&self.starts);
        self.food = Food::spawn(&self.arena, &self.snakes, &mut self.rng);
        self.status = RoundStatus::Running;
        self.ticks = 0;
        self.rounds += 1;
        self.report = None;
        self.begin_round();
    }

    /// Advance the world by one step.
    ///
    /// Living snakes act in id order: decide, steer, advance, wall/self checks,
    /// then food. A cross-snake pass over the post-move bodies follows. After
    /// `RoundOver` this is a no-op that returns an empty report.
    pub fn tick(&mut self, command: Option<KeyCode>) -> TickReport {
        if self.status == RoundStatus::RoundOver {
            return TickReport {
                tick: self.ticks,
                events: Vec::new(),
                food_respawns: Vec::new(),
                status: self.status,
            };
        }

        self.ticks += 1;
        let snapshot = self.snakes.clone();
        let mut events = Vec::new();
        let mut food_respawns = Vec::new();

        for i in 0..self.snakes.len() {
            if !self.snakes[i].alive {
                continue;
            }

            let view = WorldView {
                id: SnakeId(i),
                arena: &self.arena,
                food: self.food.position,
                snakes: &snapshot,
                command,
            };
            let requested = self.policies[i].decide(&view, &mut self.rng);

            let snake = &mut self.snakes[i];
            let direction = snake.steer(requested);
            snake.advance();

            let collision = if snake.check_wall_collision(&self.arena) {
                Some(CollisionType::Wall)
            } else if snake.check_self_collision() {
                Some(CollisionType::SelfCollision)
            } else {
                None
            };

            let ate_food = snake.alive && snake.head() == self.food.position;
            if ate_food {
                snake.grow();
                self.food.respawn(&self.arena, &self.snakes, &mut self.rng);
                food_respawns.push(self.food.position);
                debug!(snake = i, length = self.snakes[i].len(), food = ?self.food.position, "food eaten");
            }

            let reward = match (collision, ate_food) {
                (Some(_), _) => self.config.death_penalty,
                (None, true) => self.config.food_reward,
                (None, false) => self.config.step_reward,
            };
            let head = self.snakes[i].head();

            if let Some(cause) = collision {
                debug!(snake = i, ?head, %cause, "snake died");
            }

            self.policies[i].observe(&Feedback {
                reward,
                head,
                food: self.food.position,
                ate_food,
                collision,
            });

            events.push(SnakeEvent {
                id: SnakeId(i),
                direction,
                head,
                reward,
                ate_food,
                collision,
            });
        }

        for (victim, other) in self.cross_collisions() {
            self.snakes[victim.index()].alive = false;
            debug!(snake = victim.index(), %other, "snake ran into another snake");
            if let Some(event) = events.iter_mut().find(|e| e.id == victim) {
                event.collision = Some(CollisionType::Snake(other));
            }
        }

        self.update_status();

        TickReport {
            tick: self.ticks,
            events,
            food_respawns,
            status: self.status,
        }
    }

    /// Living snakes whose head sits on any segment of another snake, judged
    /// against one consistent post-move snapshot
    fn cross_collisions(&self) -> Vec<(SnakeId, SnakeId)> {
        let mut hits = Vec::new();
        for (i, snake) in self.snakes.iter().enumerate() {
            if !snake.alive {
                continue;
            }
            let head = snake.head();
            if let Some(other) = self
                .snakes
                .iter()
                .enumerate()
                .find(|(j, s)| *j != i && s.occupies(head))
            {
                hits.push((SnakeId(i), SnakeId(other.0)));
            }
        }
        hits
    }

    fn update_status(&mut self) {
        let all_dead = self.snakes.iter().all(|s| !s.alive);
        let capped = self.config.max_ticks.is_some_and(|cap| self.ticks >= cap);
        if !all_dead && !capped {
            return;
        }

        self.status = RoundStatus::RoundOver;
        let names: Vec<&str> = self.policies.iter().map(|p| p.name()).collect();
        let report = ScoreReport::from_snakes(&self.snakes, &names);
        let reason = if all_dead { "all snakes dead" } else { "tick limit" };
        info!(round = self.rounds, ticks = self.ticks, reason, "round over");
        for entry in &report.entries {
            info!("{} ({}): {}", entry.id, entry.policy, entry.length);
        }
        self.report = Some(report);
        self.end_round();
    }

    /// Tick until the round ends, asking `input` for the key of each tick.
    ///
    /// Without a tick cap this only returns once every snake is dead.
    pub fn run_with<F>(&mut self, mut input: F) -> Option<&ScoreReport>
    where
        F: FnMut(u64) -> Option<KeyCode>,
    {
        while self.status == RoundStatus::Running {
            let command = input(self.ticks);
            self.tick(command);
        }
        self.report.as_ref()
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == RoundStatus::RoundOver
    }

    /// Ticks processed in the current round
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// 1-based round counter
    pub fn round(&self) -> u64 {
        self.rounds
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn food(&self) -> Position {
        self.food.position
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn snake(&self, id: SnakeId) -> Option<&Snake> {
        self.snakes.get(id.index())
    }

    /// Direct access for scenario setup
    pub fn snake_mut(&mut self, id: SnakeId) -> Option<&mut Snake> {
        self.snakes.get_mut(id.index())
    }

    /// Place the food explicitly, for scenario setup
    pub fn set_food(&mut self, position: Position) {
        self.food.position = position;
    }

    pub fn policy(&self, id: SnakeId) -> Option<&dyn Policy> {
        self.policies.get(id.index()).map(|p| p.as_ref())
    }

    /// Score report, present once the round is over
    pub fn score_report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }
}

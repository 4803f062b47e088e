use std::rc::Rc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{speed_level_for_score, EngineConfig};
use crate::diagnostics::{Diagnostic, DiagnosticOrigin, DiagnosticSink, TracingSink};
use crate::error::{EngineError, SpawnError};
use crate::events::{EventBus, GameEvent, GameOverReason, ListenerResult, SubscriptionId};
use crate::food::{Food, FoodKind};
use crate::grid::Grid;
use crate::input::{Direction, GameInput};
use crate::score::{ScoreSummary, ScoreTracker};
use crate::snake::Snake;
use crate::snapshot::{Segment, Snapshot};
use crate::storage::{JsonFileStore, KeyValueStore};
use crate::timing::{Clock, IntervalScheduler, Scheduler, SystemClock, TimerId};

/// Current high-level engine state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EngineState {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// External services the engine depends on.
pub struct Collaborators {
    pub clock: Box<dyn Clock>,
    pub scheduler: Box<dyn Scheduler>,
    pub store: Box<dyn KeyValueStore>,
    pub diagnostics: Rc<dyn DiagnosticSink>,
}

impl Collaborators {
    /// Wall clock, interval scheduler, on-disk best score and `tracing`
    /// diagnostics.
    #[must_use]
    pub fn system() -> Self {
        Self {
            clock: Box::new(SystemClock::new()),
            scheduler: Box::new(IntervalScheduler::new()),
            store: Box::new(JsonFileStore::default_location()),
            diagnostics: Rc::new(TracingSink),
        }
    }
}

/// Game-state engine: owns the board, snake, food and score, and advances
/// them one cell per scheduler tick while playing.
pub struct Engine {
    config: EngineConfig,
    grid: Grid,
    snake: Snake,
    food: Option<Food>,
    food_spawned_at_tick: u64,
    tracker: ScoreTracker,
    state: EngineState,
    game_over_reason: Option<GameOverReason>,
    tick_count: u64,
    speed_level: u32,
    timer: Option<TimerId>,
    accounted_at: Duration,
    clock: Box<dyn Clock>,
    scheduler: Box<dyn Scheduler>,
    diagnostics: Rc<dyn DiagnosticSink>,
    events: EventBus<GameEvent>,
    frames: EventBus<Snapshot>,
    rng: StdRng,
}

impl Engine {
    /// Builds an engine in the `Menu` state with an entropy-seeded RNG.
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Result<Self, EngineError> {
        Self::build(config, collaborators, StdRng::from_entropy())
    }

    /// Builds an engine whose food placement is reproducible.
    pub fn with_seed(
        config: EngineConfig,
        collaborators: Collaborators,
        seed: u64,
    ) -> Result<Self, EngineError> {
        Self::build(config, collaborators, StdRng::seed_from_u64(seed))
    }

    fn build(
        config: EngineConfig,
        collaborators: Collaborators,
        mut rng: StdRng,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let grid = Grid::new(config.grid_size)?;
        let snake = Snake::spawn(grid, config.initial_length);
        let free_cells = grid.free_cells(&snake.occupied_cells());
        let food = Food::spawn(&mut rng, &free_cells, config.bonus_probability)?;

        let mut tracker = ScoreTracker::new(collaborators.store, collaborators.diagnostics.clone());
        tracker.set_length(snake.len());

        Ok(Self {
            config,
            grid,
            snake,
            food: Some(food),
            food_spawned_at_tick: 0,
            tracker,
            state: EngineState::Menu,
            game_over_reason: None,
            tick_count: 0,
            speed_level: 1,
            timer: None,
            accounted_at: Duration::ZERO,
            clock: collaborators.clock,
            scheduler: collaborators.scheduler,
            diagnostics: collaborators.diagnostics,
            events: EventBus::new(),
            frames: EventBus::new(),
            rng,
        })
    }

    /// Starts a fresh game from `Menu` or `GameOver`.
    pub fn start(&mut self) {
        if !matches!(self.state, EngineState::Menu | EngineState::GameOver) {
            return;
        }

        self.disarm_timer();
        if let Err(error) = self.reinitialize() {
            self.report(format!("cannot start a game: {error}"));
            return;
        }

        self.state = EngineState::Playing;
        self.accounted_at = self.clock.now();
        self.arm_timer();

        info!(grid_size = self.grid.size(), "game started");
        self.emit(GameEvent::GameStarted);
    }

    /// Suspends ticking. Only valid while playing.
    pub fn pause(&mut self) {
        if self.state != EngineState::Playing {
            return;
        }

        self.account_elapsed();
        self.disarm_timer();
        self.state = EngineState::Paused;

        info!("game paused");
        self.emit(GameEvent::GamePaused);
    }

    /// Resumes ticking. Only valid while paused.
    pub fn resume(&mut self) {
        if self.state != EngineState::Paused {
            return;
        }

        self.state = EngineState::Playing;
        self.accounted_at = self.clock.now();
        self.arm_timer();

        info!("game resumed");
        self.emit(GameEvent::GameResumed);
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            EngineState::Playing => self.pause(),
            EngineState::Paused => self.resume(),
            EngineState::Menu | EngineState::GameOver => {}
        }
    }

    /// Halts ticking and drops to `Menu` from any state, without resetting.
    pub fn stop(&mut self) {
        if self.state == EngineState::Playing {
            self.account_elapsed();
        }

        self.disarm_timer();
        self.state = EngineState::Menu;
        info!("engine stopped");
    }

    /// Returns to `Menu` with a fresh snake, food and session score.
    pub fn reset(&mut self) {
        self.disarm_timer();
        if let Err(error) = self.reinitialize() {
            self.report(format!("reset left no room for food: {error}"));
        }
        self.state = EngineState::Menu;

        info!("game reset");
        self.emit(GameEvent::GameReset);
    }

    /// Queues a turn for the next advance. Ignored unless playing.
    pub fn change_direction(&mut self, direction: Direction) {
        if self.state == EngineState::Playing {
            self.snake.request_direction(direction);
        }
    }

    /// Applies one front-end command. `Quit` is left to the caller.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => self.change_direction(direction),
            GameInput::Pause => self.toggle_pause(),
            GameInput::Confirm => self.start(),
            GameInput::Reset => self.reset(),
            GameInput::Quit => {}
        }
    }

    /// Fires every timer the scheduler reports as due at the current time.
    pub fn pump(&mut self) {
        let now = self.clock.now();
        for id in self.scheduler.due(now) {
            self.fire(id);
        }
    }

    /// Runs one tick for `id` if it is the engine's live timer. Timers armed
    /// before a pause, stop or restart are stale and do nothing.
    pub fn fire(&mut self, id: TimerId) {
        if self.timer != Some(id) || self.state != EngineState::Playing {
            return;
        }

        self.tick();
    }

    /// Advances the simulation by one cell and applies collision, food and
    /// scoring rules. Does nothing unless playing.
    pub fn tick(&mut self) {
        if self.state != EngineState::Playing {
            return;
        }

        self.tick_count += 1;
        self.snake.advance();

        let head = self.snake.head();
        if !self.grid.is_in_bounds(head) {
            self.finish(GameOverReason::WallCollision);
            return;
        }

        if self.snake.has_self_collision() {
            self.finish(GameOverReason::SelfCollision);
            return;
        }

        self.emit(GameEvent::SnakeAdvanced {
            head,
            length: self.snake.len(),
        });

        let food = self.food;
        match food {
            Some(food) if food.overlaps(head) => {
                if !self.consume(food) {
                    return;
                }
            }
            Some(food) => self.expire_bonus(food),
            None => {}
        }

        self.account_elapsed();
        self.publish_snapshot();
    }

    /// Returns a render-ready copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid_size: self.grid.size(),
            segments: self
                .snake
                .segments()
                .enumerate()
                .map(|(index, position)| Segment {
                    position: *position,
                    is_head: index == 0,
                })
                .collect(),
            direction: self.snake.direction(),
            food: self.food,
            score: self.tracker.summary(),
            state: self.state,
            game_over_reason: self.game_over_reason,
            speed_level: self.speed_level,
        }
    }

    /// Registers a listener for discrete game notifications.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> ListenerResult + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Registers a listener for the snapshot published after every
    /// successful advance and once more on game over. A collision tick is not
    /// a successful advance and yields only the game-over snapshot; a tick that
    /// fills the board yields both.
    pub fn subscribe_snapshots<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) -> ListenerResult + 'static,
    {
        self.frames.subscribe(listener)
    }

    pub fn unsubscribe_snapshots(&mut self, id: SubscriptionId) -> bool {
        self.frames.unsubscribe(id)
    }

    /// Replaces the snake, e.g. to script a scenario.
    pub fn set_snake(&mut self, snake: Snake) {
        self.tracker.set_length(snake.len());
        self.snake = snake;
    }

    /// Replaces the active food, e.g. to script a scenario.
    pub fn set_food(&mut self, food: Food) {
        self.food = Some(food);
        self.food_spawned_at_tick = self.tick_count;
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Option<Food> {
        self.food
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn score(&self) -> ScoreSummary {
        self.tracker.summary()
    }

    #[must_use]
    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    #[must_use]
    pub fn speed_level(&self) -> u32 {
        self.speed_level
    }

    /// Grows the snake, scores `food` and respawns. Returns false when the
    /// board filled up and the game ended.
    fn consume(&mut self, food: Food) -> bool {
        self.snake.grow();
        self.tracker.award(food.points());
        self.tracker.record_consumption();
        self.tracker.set_length(self.snake.len());

        debug!(
            x = food.position().x,
            y = food.position().y,
            points = food.points(),
            "food consumed"
        );
        self.emit(GameEvent::FoodConsumed {
            position: food.position(),
            kind: food.kind(),
            points: food.points(),
        });
        let summary = self.tracker.summary();
        self.emit(GameEvent::ScoreUpdated(summary));
        self.update_speed_level();

        match self.spawn_food() {
            Ok(next) => {
                self.place_spawned(next);
                true
            }
            Err(SpawnError::BoardFull) => {
                // The advance itself succeeded, so it gets its own frame.
                self.food = None;
                self.account_elapsed();
                self.publish_snapshot();
                self.finish(GameOverReason::BoardFull);
                false
            }
        }
    }

    fn expire_bonus(&mut self, food: Food) {
        let Some(lifetime) = self.config.bonus_lifetime_ticks else {
            return;
        };
        if food.kind() != FoodKind::Bonus
            || self.tick_count - self.food_spawned_at_tick < lifetime
        {
            return;
        }

        if let Ok(next) = self.spawn_food() {
            debug!("bonus food expired");
            self.place_spawned(next);
        }
    }

    fn finish(&mut self, reason: GameOverReason) {
        self.account_elapsed();
        self.disarm_timer();
        self.state = EngineState::GameOver;
        self.game_over_reason = Some(reason);
        self.tracker.commit_best_score();

        let summary = self.tracker.summary();
        info!(?reason, score = summary.score, best = summary.best_score, "game over");
        self.emit(GameEvent::GameOver { reason, summary });
        self.publish_snapshot();
    }

    fn reinitialize(&mut self) -> Result<(), SpawnError> {
        self.snake = Snake::spawn(self.grid, self.config.initial_length);
        self.tracker.reset();
        self.tracker.set_length(self.snake.len());
        self.tick_count = 0;
        self.speed_level = 1;
        self.game_over_reason = None;
        self.food = None;

        let food = self.spawn_food()?;
        self.place_spawned(food);
        Ok(())
    }

    fn spawn_food(&mut self) -> Result<Food, SpawnError> {
        let free_cells = self.grid.free_cells(&self.snake.occupied_cells());
        Food::spawn(&mut self.rng, &free_cells, self.config.bonus_probability)
    }

    fn place_spawned(&mut self, food: Food) {
        self.food = Some(food);
        self.food_spawned_at_tick = self.tick_count;
    }

    fn update_speed_level(&mut self) {
        let level = speed_level_for_score(self.tracker.score());
        if level == self.speed_level {
            return;
        }

        self.speed_level = level;
        if self.config.speed_up && self.state == EngineState::Playing {
            debug!(level, "speed level raised");
            self.arm_timer();
        }
    }

    fn arm_timer(&mut self) {
        self.disarm_timer();
        let interval = self.config.tick_interval(self.speed_level);
        self.timer = Some(self.scheduler.arm(self.clock.now(), interval));
    }

    fn disarm_timer(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn account_elapsed(&mut self) {
        let now = self.clock.now();
        self.tracker.tick(now.saturating_sub(self.accounted_at));
        self.accounted_at = now;
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.publish(&event, self.diagnostics.as_ref());
    }

    fn publish_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.frames.publish(&snapshot, self.diagnostics.as_ref());
    }

    fn report(&self, message: String) {
        self.diagnostics
            .report(Diagnostic::new(DiagnosticOrigin::Engine, message));
    }
}

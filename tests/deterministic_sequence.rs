use std::rc::Rc;
use std::time::Duration;

use snake_engine::config::EngineConfig;
use snake_engine::diagnostics::MemorySink;
use snake_engine::engine::{Collaborators, Engine, EngineState};
use snake_engine::food::Food;
use snake_engine::input::{Direction, GameInput};
use snake_engine::snake::Position;
use snake_engine::storage::MemoryStore;
use snake_engine::timing::{IntervalScheduler, ManualClock};

#[test]
fn stepwise_food_collection_and_wall_collision() {
    let clock = ManualClock::new();
    let mut engine = Engine::with_seed(
        EngineConfig {
            grid_size: 6,
            initial_length: 2,
            tick_interval_ms: 100,
            bonus_probability: 0.0,
            ..EngineConfig::default()
        },
        Collaborators {
            clock: Box::new(clock.clone()),
            scheduler: Box::new(IntervalScheduler::new()),
            store: Box::new(MemoryStore::new()),
            diagnostics: Rc::new(MemorySink::new()),
        },
        42,
    )
    .expect("engine should build");

    engine.apply_input(GameInput::Confirm);
    assert_eq!(engine.state(), EngineState::Playing);
    assert_eq!(engine.snake().head(), Position { x: 3, y: 3 });

    engine.set_food(Food::ordinary(Position { x: 4, y: 3 }));
    clock.advance(Duration::from_millis(100));
    engine.pump();
    assert_eq!(engine.state(), EngineState::Playing);
    assert_eq!(engine.score().score, 10);
    assert_eq!(engine.snake().head(), Position { x: 4, y: 3 });

    engine.set_food(Food::ordinary(Position { x: 0, y: 5 }));
    engine.apply_input(GameInput::Direction(Direction::Up));
    for expected_y in [2, 1, 0] {
        clock.advance(Duration::from_millis(100));
        engine.pump();
        assert_eq!(engine.state(), EngineState::Playing);
        assert_eq!(engine.snake().head(), Position { x: 4, y: expected_y });
    }
    assert_eq!(engine.snake().len(), 3);

    clock.advance(Duration::from_millis(100));
    engine.pump();
    assert_eq!(engine.state(), EngineState::GameOver);
    assert_eq!(engine.score().score, 10);
    assert_eq!(engine.score().elapsed, Duration::from_millis(500));
}

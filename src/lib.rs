//! Snake game-state engine.
//!
//! The engine owns the board, the snake, the food and the score, and advances
//! them on a scheduler-driven cadence. Renderers read [`snapshot::Snapshot`]s
//! and listen for [`events::GameEvent`]s; input handlers send commands to
//! [`engine::Engine`].

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod events;
pub mod food;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod snapshot;
pub mod storage;
pub mod terminal_runtime;
pub mod timing;
pub mod ui;

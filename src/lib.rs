//! Snake on a walled grid: levels raise speed and scatter obstacles,
//! weighted food drives the score.
//!
//! [`game::GameSession`] is the simulation core. It is driven by ticks and
//! [`input::Intent`]s and reports a single [`game::Outcome`] when it ends.
//! Persistence lives behind [`progress::ProgressStore`]; the terminal
//! frontend is in [`renderer`], [`ui`] and [`terminal_runtime`].

pub mod config;
pub mod driver;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod logging;
pub mod progress;
pub mod renderer;
pub mod rules;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
pub mod walls;

//! Game rules built on top of the core grid and shape types.
//!
//! - [`GameEngine`] - Session state machine (falling shape, gravity, locking, scoring)
//! - [`GameStats`] - Score and lock/row counters
//! - [`ShapeCatalog`] - Uniform random shape source
//! - [`ShapeSeed`] - Seed for deterministic shape sequences
//! - [`InputAction`] - Player actions and their key bindings
//!
//! # Game Flow
//!
//! 1. [`GameEngine::new`] spawns the first shape at the top-left corner
//! 2. The player moves and rotates it with [`GameEngine::handle_input`]
//! 3. A timer calls [`GameEngine::tick`] to apply gravity
//! 4. When the shape cannot fall any further it locks, full rows are cleared,
//!    and the next shape spawns
//! 5. The game ends when a new shape cannot be placed
//!
//! # Example
//!
//! ```
//! use stackfall_engine::{GameEngine, InputAction, TickOutcome};
//!
//! let mut engine = GameEngine::new();
//! engine.handle_input(InputAction::MoveRight);
//! engine.handle_input(InputAction::Rotate);
//!
//! while !engine.is_game_over() {
//!     if let TickOutcome::Locked { cleared_rows } = engine.tick() {
//!         assert_eq!(cleared_rows, 0);
//!         break;
//!     }
//! }
//! ```

pub use self::{game_engine::*, game_stats::*, input::*, shape_catalog::*};

mod game_engine;
mod game_stats;
mod input;
mod shape_catalog;

use rand::Rng;
use rand_pcg::Pcg32;
use tracing::{debug, trace};

use crate::{
    SpawnCollisionError,
    core::{
        collision::is_valid,
        grid::Grid,
        shape::{Position, Shape},
    },
};

use super::{
    game_stats::GameStats,
    input::InputAction,
    shape_catalog::{ShapeCatalog, ShapeSeed},
};

/// Lifecycle phase of the falling shape.
///
/// A session cycles through `Spawning → Falling → Locking → LineClearing →
/// Spawning`. `Falling` is the only phase that accepts input and gravity; the
/// others are passed through within a single [`GameEngine::tick`] call.
/// `GameOver` is terminal and is entered when a new shape cannot be placed at
/// the spawn point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum EnginePhase {
    Spawning,
    Falling,
    Locking,
    LineClearing,
    GameOver,
}

impl EnginePhase {
    const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Spawning, Self::Falling | Self::GameOver)
                | (Self::Falling, Self::Locking | Self::Spawning)
                | (Self::Locking, Self::LineClearing)
                | (Self::LineClearing, Self::Spawning)
        )
    }
}

/// The falling shape together with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveShape {
    shape: Shape,
    position: Position,
}

impl ActiveShape {
    /// Places `shape` at the spawn point.
    #[must_use]
    pub const fn spawned(shape: Shape) -> Self {
        Self {
            shape,
            position: Position::SPAWN,
        }
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            shape: self.shape,
            position: self.position.moved_by(dx, dy),
        }
    }

    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotated(),
            position: self.position,
        }
    }

    #[must_use]
    pub fn fits(&self, grid: &Grid) -> bool {
        is_valid(grid, &self.shape, self.position)
    }
}

/// Result of one gravity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The shape moved down one row.
    Fell,
    /// The shape locked and a new shape spawned.
    Locked { cleared_rows: usize },
    /// The shape locked but the next shape could not be placed.
    ToppedOut { cleared_rows: usize },
    /// The game is already over; nothing happened.
    Halted,
}

/// Game state machine for one session.
///
/// Owns the settled [`Grid`], the falling [`ActiveShape`], the [`GameStats`]
/// and the shape source. The staged grid (settled cells plus the falling
/// shape) is recomputed after every change and is what the presentation layer
/// draws.
///
/// Rejected moves and rotations are silent: the methods report `false` and
/// leave the state untouched.
///
/// # Example
///
/// ```
/// use stackfall_engine::{GameEngine, InputAction, TickOutcome};
///
/// let mut engine = GameEngine::new();
/// engine.handle_input(InputAction::MoveRight);
/// assert_eq!(engine.tick(), TickOutcome::Fell);
/// assert_eq!(engine.score(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct GameEngine<R = Pcg32> {
    grid: Grid,
    active: ActiveShape,
    stage: Grid,
    stats: GameStats,
    catalog: ShapeCatalog<R>,
    phase: EnginePhase,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    /// Starts a session with a randomly seeded shape source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(ShapeCatalog::new())
    }

    /// Starts a session whose shape sequence is determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: ShapeSeed) -> Self {
        Self::with_catalog(ShapeCatalog::with_seed(seed))
    }
}

impl<R> GameEngine<R>
where
    R: Rng,
{
    /// Starts a session on an empty grid.
    pub fn with_catalog(catalog: ShapeCatalog<R>) -> Self {
        Self::with_grid(Grid::new(), catalog)
    }

    /// Starts a session on a pre-filled grid.
    ///
    /// The first shape is spawned immediately. If it does not fit, the engine
    /// starts in [`EnginePhase::GameOver`].
    pub fn with_grid(grid: Grid, mut catalog: ShapeCatalog<R>) -> Self {
        let active = ActiveShape::spawned(catalog.random_shape());
        let mut engine = Self {
            stage: grid.clone(),
            grid,
            active,
            stats: GameStats::new(),
            catalog,
            phase: EnginePhase::Spawning,
        };
        let _ = engine.finish_spawn();
        engine
    }

    /// Returns the settled cells, without the falling shape.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the grid to display: settled cells plus the falling shape.
    #[must_use]
    pub fn stage(&self) -> &Grid {
        &self.stage
    }

    #[must_use]
    pub fn active_shape(&self) -> &ActiveShape {
        &self.active
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    fn transition(&mut self, next: EnginePhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid phase transition {} -> {next}",
            self.phase
        );
        trace!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }

    fn refresh_stage(&mut self) {
        self.stage = self
            .grid
            .overlay_shape(&self.active.shape, self.active.position);
    }

    /// Replaces the falling shape with a fresh one at the spawn point.
    ///
    /// Returns an error, and ends the game, if the new shape overlaps the
    /// settled cells.
    pub fn spawn(&mut self) -> Result<(), SpawnCollisionError> {
        if self.phase.is_game_over() {
            return Err(SpawnCollisionError);
        }
        self.transition(EnginePhase::Spawning);
        self.active = ActiveShape::spawned(self.catalog.random_shape());
        self.finish_spawn()
    }

    fn finish_spawn(&mut self) -> Result<(), SpawnCollisionError> {
        self.refresh_stage();
        let kind = self.active.shape.kind();
        if !self.active.fits(&self.grid) {
            debug!(?kind, score = self.stats.score(), "spawn blocked, game over");
            self.transition(EnginePhase::GameOver);
            return Err(SpawnCollisionError);
        }
        trace!(?kind, "spawned shape");
        self.transition(EnginePhase::Falling);
        Ok(())
    }

    /// Advances gravity by one step.
    ///
    /// Moves the falling shape down one row. If it cannot move, the shape is
    /// merged into the grid, complete rows are cleared and scored, and the
    /// next shape spawns.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.phase.is_falling() {
            return TickOutcome::Halted;
        }
        if self.move_by(0, 1) {
            return TickOutcome::Fell;
        }
        self.lock()
    }

    fn lock(&mut self) -> TickOutcome {
        self.transition(EnginePhase::Locking);
        self.grid = self
            .grid
            .overlay_shape(&self.active.shape, self.active.position);

        self.transition(EnginePhase::LineClearing);
        let completed = self.grid.completed_rows();
        let (grid, cleared_rows) = self.grid.clear_completed_rows();
        debug_assert_eq!(completed.len(), cleared_rows);
        self.grid = grid;
        self.stats.record_lock(cleared_rows);
        debug!(
            kind = ?self.active.shape.kind(),
            x = self.active.position.x(),
            y = self.active.position.y(),
            ?completed,
            score = self.stats.score(),
            "locked shape"
        );

        match self.spawn() {
            Ok(()) => TickOutcome::Locked { cleared_rows },
            Err(SpawnCollisionError) => TickOutcome::ToppedOut { cleared_rows },
        }
    }

    /// Moves the falling shape by `(dx, dy)` if the target placement is valid.
    ///
    /// Returns whether the shape moved. Validity is checked against the
    /// settled grid, so the shape never collides with itself.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> bool {
        if !self.phase.is_falling() {
            return false;
        }
        let moved = self.active.moved_by(dx, dy);
        if !moved.fits(&self.grid) {
            return false;
        }
        self.active = moved;
        self.refresh_stage();
        true
    }

    /// Rotates the falling shape by 90° in place if the result is valid.
    ///
    /// No wall kicks are attempted: a rotation that would leave the grid or
    /// overlap settled cells is dropped.
    pub fn rotate(&mut self) -> bool {
        if !self.phase.is_falling() {
            return false;
        }
        let rotated = self.active.rotated();
        if !rotated.fits(&self.grid) {
            return false;
        }
        self.active = rotated;
        self.refresh_stage();
        true
    }

    /// Applies a player action.
    pub fn handle_input(&mut self, action: InputAction) {
        match action.offset() {
            Some((dx, dy)) => _ = self.move_by(dx, dy),
            None => _ = self.rotate(),
        }
    }

    /// Applies the action bound to a key name.
    ///
    /// Returns `true` if the key is bound to an action, in which case the
    /// caller should suppress the key's default behaviour. Unbound keys are
    /// ignored.
    pub fn handle_key(&mut self, name: &str) -> bool {
        let Some(action) = InputAction::from_key_name(name) else {
            return false;
        };
        self.handle_input(action);
        true
    }
}

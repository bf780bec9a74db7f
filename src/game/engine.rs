use std::time::Duration;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, info};

use super::{
    action::{Command, Direction},
    config::{ConfigError, GameConfig},
    state::{CellKind, CollisionType, GameState, GameStatus},
};

/// Manual speed changes move the interval by this much
pub const SPEED_ADJUST_MS: u64 = 50;

/// What a call to [`GameEngine::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not running; nothing changed
    Idle,
    /// The snake moved one cell
    Moved,
    /// The snake moved onto the point
    Scored,
    /// The move was illegal; the board is left as it was
    GameOver(CollisionType),
    /// The snake scored and no free cell is left for the next point
    Won,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = GameState::new(config.grid_size, config.initial_interval_ms);

        Ok(Self { config, state, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for setting up positions; callers keep the snake invariants
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Current delay between ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.state.tick_interval_ms)
    }

    /// Every (index, kind) pair in index order
    pub fn cells(&self) -> impl Iterator<Item = (usize, CellKind)> {
        self.state.cells()
    }

    /// Dispatch an inbound command
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SetDirection(direction) => {
                self.set_direction(direction);
            }
            Command::TogglePlay => {
                self.toggle_play();
            }
            Command::Reset => self.reset(),
        }
    }

    /// Advance the game by one cell
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.status != GameStatus::Running {
            return TickOutcome::Idle;
        }

        let direction = self.state.direction;
        let grow = self.state.should_grow;

        let Some(new_head) = self.state.grid.step(self.state.snake.head, direction) else {
            return self.end_game(CollisionType::Wall);
        };

        // The tail end only counts as an obstacle when it stays put this tick
        if self.state.snake.collides_with_tail(new_head, !grow) {
            return self.end_game(CollisionType::SelfCollision);
        }

        let scored = self.state.point == Some(new_head);

        // Growth lags scoring by one tick: a pending growth keeps the tail
        // end, and a scoring tick queues the next one.
        self.state.snake.advance(new_head, grow);
        self.state.should_grow = scored;
        self.state.last_direction = direction;
        self.state.ticks += 1;

        if !scored {
            return TickOutcome::Moved;
        }

        self.state.score += 1;
        self.state.tick_interval_ms = self.config.clamp_interval(
            self.state
                .tick_interval_ms
                .saturating_sub(self.config.interval_step_ms),
        );
        self.state.point = None;
        debug!(
            score = self.state.score,
            interval_ms = self.state.tick_interval_ms,
            head = new_head,
            "Point scored"
        );

        match self.spawn_food() {
            Some(_) => TickOutcome::Scored,
            None => TickOutcome::Won,
        }
    }

    /// Queue a heading for the next tick. Reversing onto the segment behind
    /// the head, judged against the last applied heading, is refused.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.state.status.is_terminal() || requested.is_opposite(self.state.last_direction) {
            return false;
        }
        self.state.direction = requested;
        true
    }

    /// Place a point on a uniformly random free cell and return the point on
    /// the board afterwards. An existing point is left alone. With no free
    /// cell the board is full and the game is won.
    pub fn spawn_food(&mut self) -> Option<usize> {
        if self.state.point.is_some() {
            return self.state.point;
        }

        let candidates = self.state.empty_cells();
        match candidates.choose(&mut self.rng) {
            Some(&index) => {
                self.state.point = Some(index);
                debug!(index, free_cells = candidates.len(), "Point spawned");
                Some(index)
            }
            None => {
                self.state.status = GameStatus::Won;
                info!(score = self.state.score, "Board filled");
                None
            }
        }
    }

    /// Start, pause or resume. After the game ended this starts over.
    pub fn toggle_play(&mut self) -> GameStatus {
        match self.state.status {
            GameStatus::NotStarted | GameStatus::Paused => {
                self.spawn_food();
                if !self.state.status.is_terminal() {
                    self.state.status = GameStatus::Running;
                    info!(score = self.state.score, "Game running");
                }
            }
            GameStatus::Running => {
                self.state.status = GameStatus::Paused;
                info!(score = self.state.score, "Game paused");
            }
            GameStatus::GameOver | GameStatus::Won => self.reset(),
        }
        self.state.status
    }

    /// Restore the initial layout
    pub fn reset(&mut self) {
        self.state = GameState::new(self.config.grid_size, self.config.initial_interval_ms);
        info!(grid_size = self.config.grid_size, "Game reset");
    }

    /// Set the tick interval, clamped to the configured bounds
    pub fn set_tick_interval(&mut self, interval_ms: u64) -> u64 {
        self.state.tick_interval_ms = self.config.clamp_interval(interval_ms);
        self.state.tick_interval_ms
    }

    pub fn speed_up(&mut self) -> u64 {
        self.set_tick_interval(self.state.tick_interval_ms.saturating_sub(SPEED_ADJUST_MS))
    }

    pub fn slow_down(&mut self) -> u64 {
        self.set_tick_interval(self.state.tick_interval_ms.saturating_add(SPEED_ADJUST_MS))
    }

    fn end_game(&mut self, collision: CollisionType) -> TickOutcome {
        self.state.status = GameStatus::GameOver;
        info!(score = self.state.score, ?collision, "Game over");
        TickOutcome::GameOver(collision)
    }
}

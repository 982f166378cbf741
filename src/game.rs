use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Board;
use crate::food::{BoardFullError, Food, FoodKind};
use crate::grid::Cell;
use crate::input::{Direction, Intent};
use crate::progress::StartingProgress;
use crate::rules::{evaluate_level_up, initial_speed};
use crate::snake::Snake;
use crate::walls::{self, Walls};

/// Why a session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TerminationCause {
    WallCollision,
    SelfCollision,
    BoardFull,
    Quit,
}

/// Final result of a session, handed to persistence exactly once.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Outcome {
    pub score: u32,
    pub level: u32,
    pub cause: TerminationCause,
}

/// Current high-level session state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionState {
    Running,
    Paused,
    /// Leaderboard on screen; `paused` is the state to return to.
    ShowingLeaderboard { paused: bool },
    Terminated(Outcome),
}

impl SessionState {
    #[must_use]
    pub fn is_terminated(self) -> bool {
        matches!(self, Self::Terminated(_))
    }
}

/// What one call to [`GameSession::tick`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickEvent {
    /// The session is not running; nothing changed.
    Frozen,
    Moved,
    Ate { points: u32, leveled_up: bool },
    Terminated(Outcome),
}

/// Immutable view of the world after a tick, for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Head first.
    pub snake: Vec<Cell>,
    pub heading: Direction,
    /// Sorted row by row.
    pub walls: Vec<Cell>,
    pub food: Food,
    pub food_kind: FoodKind,
    pub score: u32,
    pub level: u32,
    pub speed: u32,
    pub state: SessionState,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameSession<R = StdRng> {
    board: Board,
    snake: Snake,
    walls: Walls,
    food: Food,
    score: u32,
    level: u32,
    speed: u32,
    state: SessionState,
    pending_outcome: Option<Outcome>,
    ticks: u64,
    rng: R,
}

impl GameSession<StdRng> {
    /// Creates a deterministic session for tests and reproducible runs.
    pub fn with_seed(
        board: Board,
        start: StartingProgress,
        seed: u64,
    ) -> Result<Self, BoardFullError> {
        Self::new(board, start, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    /// Starts a session at the saved level with a fresh score of zero.
    pub fn new(board: Board, start: StartingProgress, mut rng: R) -> Result<Self, BoardFullError> {
        let level = start.level.max(1);
        let snake = Snake::new(board.spawn_head, board.spawn_direction, board.spawn_length);
        let walls = walls::generate(
            &mut rng,
            level,
            board.geometry,
            board.safe_zone,
            &board.rules,
            &board.limits,
        );
        let food = Food::spawn(
            &mut rng,
            board.geometry,
            &snake,
            &walls,
            board.limits.food_attempts,
        )
        .inspect_err(|err| error!("cannot start session at level {level}: {err}"))?;

        info!(
            "session started at level {level} (saved score {} not carried over)",
            start.score
        );

        Ok(Self {
            board,
            snake,
            walls,
            food,
            score: 0,
            level,
            speed: initial_speed(level, &board.rules),
            state: SessionState::Running,
            pending_outcome: None,
            ticks: 0,
            rng,
        })
    }

    /// Advances the simulation by one step if the session is running.
    pub fn tick(&mut self) -> TickEvent {
        if self.state != SessionState::Running {
            return TickEvent::Frozen;
        }

        self.ticks += 1;
        let next_head = self.snake.peek_next_head(self.snake.direction());

        if self.snake.would_collide(next_head, &self.walls) {
            let cause = if self.walls.contains(next_head) {
                TerminationCause::WallCollision
            } else {
                TerminationCause::SelfCollision
            };
            return TickEvent::Terminated(self.terminate(cause));
        }

        let grew = next_head == self.food.position;
        self.snake.advance(next_head, grew);

        if !grew {
            return TickEvent::Moved;
        }

        let points = self.food.points();
        self.score += points;

        let leveled_up = evaluate_level_up(self.score, &self.board.rules);
        if leveled_up {
            self.level_up();
        }

        match Food::spawn(
            &mut self.rng,
            self.board.geometry,
            &self.snake,
            &self.walls,
            self.board.limits.food_attempts,
        ) {
            Ok(food) => self.food = food,
            Err(err) => {
                error!("ending session: {err}");
                return TickEvent::Terminated(self.terminate(TerminationCause::BoardFull));
            }
        }

        TickEvent::Ate { points, leveled_up }
    }

    /// Applies one external intent.
    pub fn apply_intent(&mut self, intent: Intent) {
        match (intent, self.state) {
            (_, SessionState::Terminated(_)) => {}
            (Intent::Quit, _) => {
                self.terminate(TerminationCause::Quit);
            }
            (Intent::Move(direction), SessionState::Running) => {
                self.snake.set_direction(direction);
            }
            (Intent::Move(_), _) => {}
            (Intent::TogglePause, SessionState::Running) => self.state = SessionState::Paused,
            (Intent::TogglePause, SessionState::Paused) => self.state = SessionState::Running,
            (Intent::TogglePause, SessionState::ShowingLeaderboard { .. }) => {}
            (Intent::ToggleLeaderboard, SessionState::Running) => {
                self.state = SessionState::ShowingLeaderboard { paused: false };
            }
            (Intent::ToggleLeaderboard, SessionState::Paused) => {
                self.state = SessionState::ShowingLeaderboard { paused: true };
            }
            (Intent::ToggleLeaderboard, SessionState::ShowingLeaderboard { paused }) => {
                self.state = if paused {
                    SessionState::Paused
                } else {
                    SessionState::Running
                };
            }
        }
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.speed += self.board.rules.speed_increment;
        self.walls = walls::generate(
            &mut self.rng,
            self.level,
            self.board.geometry,
            self.board.safe_zone,
            &self.board.rules,
            &self.board.limits,
        );

        info!(
            "level {} reached at score {}, speed {}, {} obstacles",
            self.level,
            self.score,
            self.speed,
            self.walls.obstacles()
        );
    }

    fn terminate(&mut self, cause: TerminationCause) -> Outcome {
        let outcome = Outcome {
            score: self.score,
            level: self.level,
            cause,
        };
        self.state = SessionState::Terminated(outcome);
        self.pending_outcome = Some(outcome);

        info!(
            "session over after {} ticks: {cause:?}, score {}, level {}",
            self.ticks, self.score, self.level
        );
        outcome
    }
}

impl<R> GameSession<R> {
    /// Hands out the terminal outcome. Returns `Some` exactly once.
    pub fn take_outcome(&mut self) -> Option<Outcome> {
        self.pending_outcome.take()
    }

    /// Captures the current world for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let mut walls: Vec<Cell> = self.walls.iter().copied().collect();
        walls.sort_unstable_by_key(|cell| (cell.y, cell.x));

        Snapshot {
            snake: self.snake.segments().copied().collect(),
            heading: self.snake.direction(),
            walls,
            food: self.food,
            food_kind: self.food.kind(),
            score: self.score,
            level: self.level,
            speed: self.speed,
            state: self.state,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn walls(&self) -> &Walls {
        &self.walls
    }

    #[must_use]
    pub fn food(&self) -> Food {
        self.food
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Ticks per second the driver should run at.
    #[must_use]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Replaces the snake. Used to stage positions in tests and demos.
    pub fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    /// Replaces the food on the board.
    pub fn set_food(&mut self, food: Food) {
        self.food = food;
    }

    /// Replaces the walls on the board.
    pub fn set_walls(&mut self, walls: Walls) {
        self.walls = walls;
    }
}

use std::collections::HashSet;

use walled_snake::config::{BoardConfig, GameConfig};
use walled_snake::driver::GameDriver;
use walled_snake::food::Food;
use walled_snake::game::{GameSession, SessionState, TerminationCause, TickEvent};
use walled_snake::grid::{Cell, PixelRect};
use walled_snake::input::{Direction, Intent};
use walled_snake::progress::{MemoryProgressStore, ProgressStore, StartingProgress};
use walled_snake::snake::Snake;
use walled_snake::walls::obstacle_budget;

#[test]
fn stepwise_food_collection_level_up_and_wall_collision() {
    let board = GameConfig::default().board().expect("default board");
    let mut session =
        GameSession::with_seed(board, StartingProgress { score: 0, level: 1 }, 42)
            .expect("open board");

    session.set_food(Food::new(Cell::new(11, 10), 2));
    assert_eq!(
        session.tick(),
        TickEvent::Ate {
            points: 2,
            leveled_up: false
        }
    );
    assert_eq!(session.score(), 2);
    assert_eq!(session.level(), 1);
    assert_eq!(session.snake().len(), 4);

    session.apply_intent(Intent::Move(Direction::Up));
    session.set_food(Food::new(Cell::new(11, 9), 1));
    assert_eq!(
        session.tick(),
        TickEvent::Ate {
            points: 1,
            leveled_up: true
        }
    );
    assert_eq!(session.score(), 3);
    assert_eq!(session.level(), 2);
    assert_eq!(session.speed(), 12);

    session.set_food(Food::new(Cell::new(40, 30), 1));
    for _ in 0..8 {
        assert_eq!(session.tick(), TickEvent::Moved);
    }
    assert_eq!(session.snake().head(), Cell::new(11, 1));

    let event = session.tick();
    let TickEvent::Terminated(outcome) = event else {
        panic!("expected wall collision, got {event:?}");
    };
    assert_eq!(outcome.cause, TerminationCause::WallCollision);
    assert_eq!(outcome.score, 3);
    assert_eq!(outcome.level, 2);
}

/// Picks a safe, non-reversing direction that closes in on the food.
fn steer_towards_food(session: &GameSession) -> Option<Direction> {
    let snake = session.snake();
    let food = session.food().position;

    [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ]
    .into_iter()
    .filter(|direction| !direction.is_opposite_of(snake.direction()))
    .map(|direction| (direction, snake.peek_next_head(direction)))
    .filter(|(_, next)| !snake.would_collide(*next, session.walls()))
    .min_by_key(|(_, next)| (next.x - food.x).abs() + (next.y - food.y).abs())
    .map(|(direction, _)| direction)
}

#[test]
fn long_seeded_run_keeps_invariants() {
    let board = GameConfig::default().board().expect("default board");
    let geometry = board.geometry;
    let safe_zone = board.safe_zone;
    let mut meals = 0;
    let mut level_ups = 0;

    for seed in [7, 8, 9] {
        let mut session =
            GameSession::with_seed(board, StartingProgress { score: 0, level: 4 }, seed)
                .expect("open board");
        let mut seed_meals = 0;

        for _ in 0..2_000 {
            if let Some(direction) = steer_towards_food(&session) {
                session.apply_intent(Intent::Move(direction));
            }

            let length_before = session.snake().len();
            let score_before = session.score();
            let event = session.tick();
            match event {
                TickEvent::Terminated(_) => break,
                TickEvent::Ate { points, leveled_up } => {
                    seed_meals += 1;
                    assert_eq!(session.snake().len(), length_before + 1);
                    assert_eq!(session.score(), score_before + points);
                    if leveled_up {
                        level_ups += 1;
                        let budget = obstacle_budget(session.level(), &board.rules);
                        assert_eq!(
                            session.walls().obstacles() + session.walls().shortfall(),
                            budget
                        );
                    }
                }
                _ => assert_eq!(session.snake().len(), length_before),
            }

            let body: HashSet<Cell> = session.snake().segments().copied().collect();
            assert_eq!(body.len(), session.snake().len());
            assert!(body.iter().all(|cell| !session.walls().contains(*cell)));

            let food = session.food().position;
            assert!(!session.walls().contains(food));
            assert!(!session.snake().occupies(food));

            assert!(geometry.border_cells().all(|cell| session.walls().contains(cell)));
            assert!(
                session
                    .walls()
                    .iter()
                    .filter(|cell| geometry.is_interior(**cell))
                    .all(|cell| !safe_zone.contains(*cell))
            );
        }

        assert!(seed_meals > 0, "seed {seed} never reached the food");
        meals += seed_meals;
    }

    assert!(meals >= 3);
    assert!(level_ups > 0, "no level-up in {meals} meals");
}

#[test]
fn filling_the_board_ends_the_session_and_saves_once() {
    let mut config = GameConfig::default();
    config.board = BoardConfig {
        width: 50,
        height: 50,
        cell_size: 10,
    };
    config.safe_zone = PixelRect {
        x: 10,
        y: 10,
        width: 30,
        height: 30,
    };
    config.spawn.x = 30;
    config.spawn.y = 10;
    let board = config.board().expect("5x5 board");

    let mut session =
        GameSession::with_seed(board, StartingProgress::default(), 21).expect("room for food");
    // Eight of the nine interior cells, head one step left of the last free one.
    session.set_snake(Snake::from_segments(
        vec![
            Cell::new(2, 3),
            Cell::new(1, 3),
            Cell::new(1, 2),
            Cell::new(2, 2),
            Cell::new(3, 2),
            Cell::new(3, 1),
            Cell::new(2, 1),
            Cell::new(1, 1),
        ],
        Direction::Right,
    ));
    session.set_food(Food::new(Cell::new(3, 3), 2));

    let mut driver = GameDriver::new(session, MemoryProgressStore::new(), "fay");
    let event = driver.tick();

    let TickEvent::Terminated(outcome) = event else {
        panic!("expected a full board, got {event:?}");
    };
    assert_eq!(outcome.cause, TerminationCause::BoardFull);
    assert_eq!(outcome.score, 2);
    assert_eq!(outcome.level, 1);
    assert_eq!(driver.session().snake().len(), 9);
    assert_eq!(driver.store().saves(), 1);

    assert_eq!(driver.tick(), TickEvent::Frozen);
    assert_eq!(driver.store().saves(), 1);

    let board = driver.store().fetch_leaderboard().expect("online");
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].username, "fay");
    assert_eq!(board[0].score, 2);
}

#[test]
fn saved_level_resumes_but_score_restarts() {
    let mut store = MemoryProgressStore::new();
    store.save_outcome("erin", 17, 6).expect("online");
    let progress = store.load_starting_progress("erin").expect("online");

    let board = GameConfig::default().board().expect("default board");
    let session = GameSession::with_seed(board, progress, 3).expect("open board");

    assert_eq!(session.level(), 6);
    assert_eq!(session.score(), 0);
    assert_eq!(session.speed(), 15);
    assert_eq!(session.walls().obstacles(), 3);

    let mut driver = GameDriver::new(session, store, "erin");
    driver.handle_intent(Intent::TogglePause);
    assert_eq!(driver.session().state(), SessionState::Paused);
    driver.handle_intent(Intent::Quit);

    let board = driver.store().fetch_leaderboard().expect("online");
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].score, 17);
    assert_eq!(board[1].score, 0);
    assert_eq!(board[1].level, 6);
}

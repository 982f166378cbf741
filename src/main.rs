use std::io;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use crossterm::event::KeyCode;
use log::{LevelFilter, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use walled_snake::config::GameConfig;
use walled_snake::driver::GameDriver;
use walled_snake::game::GameSession;
use walled_snake::input::{intent_from_key, poll_key};
use walled_snake::logging::{default_log_path, init_file_logger};
use walled_snake::progress::{JsonProgressStore, ProgressStore, default_progress_path};
use walled_snake::renderer::{self, FrameInfo};
use walled_snake::terminal_runtime::{AppTerminal, TerminalSession};
use walled_snake::ui::menu::render_username_prompt;

const MAX_USERNAME_LEN: usize = 24;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Play as this user instead of being prompted.
    #[arg(long)]
    username: Option<String>,

    /// JSON file overriding board size, safe zone and level rules.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Progress file holding users and past scores.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Log file path.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Seed for wall and food placement.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    if let Err(err) = init_file_logger(&log_path, LevelFilter::Info) {
        eprintln!("Warning: logging disabled ({}): {err}", log_path.display());
    }

    let board = GameConfig::load(cli.config.as_deref())
        .and_then(|config| config.board())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let mut store = JsonProgressStore::new(cli.store.clone().unwrap_or_else(default_progress_path));

    let mut terminal_session = TerminalSession::enter()?;
    let terminal = terminal_session.terminal_mut();

    let username = match cli.username.clone() {
        Some(name) => name,
        None => match prompt_username(terminal)? {
            Some(name) => name,
            None => return Ok(()),
        },
    };

    if let Err(err) = store.get_or_create_user(&username) {
        warn!("could not register user {username}: {err}");
    }
    let progress = store.load_starting_progress(&username).unwrap_or_else(|err| {
        warn!("could not load progress for {username}: {err}");
        Default::default()
    });

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let session = GameSession::new(board, progress, rng)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    info!("{username} starts at level {}", session.level());

    let mut driver = GameDriver::new(session, store, username);
    run(terminal, &mut driver)
}

fn run(
    terminal: &mut AppTerminal,
    driver: &mut GameDriver<JsonProgressStore, StdRng>,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let snapshot = driver.session().snapshot();
        terminal.draw(|frame| {
            renderer::render(
                frame,
                &snapshot,
                FrameInfo {
                    username: driver.username(),
                    leaderboard: driver.leaderboard(),
                    final_outcome: driver.final_outcome(),
                    last_error: driver.last_error(),
                },
            );
        })?;

        if driver.is_finished() {
            while poll_key(driver.tick_interval())?.is_none() {}
            return Ok(());
        }

        let timeout = driver.tick_interval().saturating_sub(last_tick.elapsed());
        if let Some(intent) = poll_key(timeout)?.and_then(intent_from_key) {
            driver.handle_intent(intent);
        }

        if last_tick.elapsed() >= driver.tick_interval() {
            driver.tick();
            last_tick = Instant::now();
        }
    }
}

/// Returns `None` when the player backs out with Esc.
fn prompt_username(terminal: &mut AppTerminal) -> io::Result<Option<String>> {
    let mut input = String::new();

    loop {
        terminal.draw(|frame| render_username_prompt(frame, &input))?;

        let Some(key) = poll_key(std::time::Duration::from_millis(250))? else {
            continue;
        };

        match key.code {
            KeyCode::Enter if !input.is_empty() => return Ok(Some(input)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(ch) if ch.is_alphanumeric() && input.len() < MAX_USERNAME_LEN => {
                input.push(ch);
            }
            _ => {}
        }
    }
}

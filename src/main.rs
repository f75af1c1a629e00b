//! GRIDFALL - a falling-block puzzle for the terminal

mod audio;
mod board;
mod game;
mod input;
mod kicks;
mod leaderboard;
mod piece;
mod score;
mod settings;
mod spawner;
mod tetromino;
mod ui;

use audio::{AudioManager, Sfx};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::{Action, Game, GameEvent, Phase};
use input::{Command, InputHandler};
use leaderboard::Leaderboard;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the gridfall temp directory, creating it if needed
fn gridfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("gridfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup tracing to a per-session log file
    let log_dir = gridfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gridfall=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "GRIDFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    // Load settings and the local leaderboard
    let settings = Settings::load();
    let mut leaderboard = Leaderboard::load();

    // Initialize audio (optional - game works without audio)
    let mut audio = AudioManager::new();
    if let Some(ref mut a) = audio {
        let bgm = if settings.audio.music_enabled {
            settings.audio.bgm_volume as f32 / 100.0
        } else {
            0.0
        };
        let sfx = if settings.audio.sound_enabled {
            settings.audio.sfx_volume as f32 / 100.0
        } else {
            0.0
        };
        a.set_bgm_volume(bgm);
        a.set_sfx_volume(sfx);
    }

    // Board dimensions come from settings; fall back to defaults if bad
    let (width, height) = (
        settings.gameplay.board_width,
        settings.gameplay.board_height,
    );
    let mut game = match Game::new(width, height) {
        Ok(game) => game,
        Err(e) => {
            tracing::warn!("{}, using default board", e);
            Game::new(board::DEFAULT_WIDTH, board::DEFAULT_HEIGHT)
                .map_err(|e| io::Error::other(e.to_string()))?
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(
        &mut terminal,
        &mut game,
        &settings,
        &mut leaderboard,
        &mut audio,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }
    if let Err(e) = leaderboard.save() {
        eprintln!("Warning: Could not save leaderboard: {}", e);
    }

    if result.is_ok() {
        println!("\nThanks for playing GRIDFALL!");
        println!("Final Score: {}", game.score.points);
        println!("Level: {} | Lines: {}", game.score.level, game.score.lines);
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    settings: &Settings,
    leaderboard: &mut Leaderboard,
    audio: &mut Option<AudioManager>,
) -> io::Result<()> {
    let mut input = InputHandler::from_settings(settings);
    let mut last_tick = Instant::now();
    // Some(buffer) while the game-over name prompt is on screen
    let mut name_entry: Option<String> = None;
    let mut score_submitted = false;

    loop {
        terminal.draw(|frame| {
            ui::render_game(frame, game, settings, leaderboard, name_entry.as_deref());
        })?;

        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        input.key_up(key);
                        continue;
                    }
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // The name prompt captures the keyboard until closed
                    if let Some(buffer) = &mut name_entry {
                        match key.code {
                            KeyCode::Char(c) => {
                                if buffer.len() < 12 {
                                    buffer.push(c);
                                }
                            }
                            KeyCode::Backspace => {
                                buffer.pop();
                            }
                            KeyCode::Enter => {
                                leaderboard.submit(
                                    buffer,
                                    game.score.points,
                                    game.score.lines,
                                    game.score.level,
                                );
                                if let Err(e) = leaderboard.save() {
                                    tracing::warn!("leaderboard save failed: {}", e);
                                }
                                name_entry = None;
                            }
                            KeyCode::Esc => {
                                name_entry = None;
                            }
                            _ => {}
                        }
                        continue;
                    }

                    for command in input.key_down(key) {
                        match command {
                            Command::Quit => return Ok(()),
                            Command::Game(action) => {
                                // Enter on the game-over screen restarts
                                if action == Action::Start && game.phase == Phase::Over {
                                    game.reset();
                                }
                                let was_running = game.phase == Phase::Running;
                                game.process_action(action);

                                if was_running && game.phase == Phase::Paused {
                                    input.clear();
                                    if let Some(a) = audio {
                                        a.pause_bgm();
                                    }
                                } else if !was_running && game.phase == Phase::Running {
                                    score_submitted = false;
                                    last_tick = Instant::now();
                                    if let Some(a) = audio {
                                        a.play_bgm();
                                        a.resume_bgm();
                                    }
                                }
                            }
                        }
                    }
                }
                Event::Resize(_, _) => {
                    terminal.autoresize()?;
                }
                _ => {}
            }
        }

        // Held-key repeats (DAS/ARR)
        if game.phase == Phase::Running {
            for action in input.update() {
                game.process_action(action);
            }
        }

        // Advance the drop scheduler by real elapsed time
        let now = Instant::now();
        game.tick(now.duration_since(last_tick));
        last_tick = now;

        // Drain engine events into sound effects
        for event in game.take_events() {
            let sfx = match event {
                GameEvent::Moved => Some(Sfx::Move),
                GameEvent::Rotated => Some(Sfx::Rotate),
                GameEvent::HardDropped => Some(Sfx::HardDrop),
                GameEvent::LinesCleared(n) => {
                    tracing::debug!("cleared {} lines, score={}", n, game.score.points);
                    Some(Sfx::LineClear)
                }
                GameEvent::GameOver => {
                    tracing::info!(
                        "game over: score={} lines={} level={}",
                        game.score.points,
                        game.score.lines,
                        game.score.level
                    );
                    if let Some(a) = audio {
                        a.stop_bgm();
                    }
                    if !score_submitted && leaderboard.qualifies(game.score.points) {
                        name_entry = Some(String::new());
                        score_submitted = true;
                    }
                    Some(Sfx::GameOver)
                }
            };
            if let (Some(a), Some(sfx)) = (audio.as_mut(), sfx) {
                a.play_sfx(sfx);
            }
        }
    }
}

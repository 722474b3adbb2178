#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use anyhow::Context;
use blockfall::Time;
use blockfall::app::App;
use blockfall::components::Input;
use blockfall::config::{Config, TimingConfig};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, error, info};
use ratatui::{Terminal, prelude::*};

fn main() -> anyhow::Result<()> {
    // Create log file and redirect stderr to it, the terminal belongs to the game
    let log_path = "blockfall.log";
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)
        .with_context(|| format!("failed to create log file {log_path}"))?;

    let stderr_fd = io::stderr().as_raw_fd();
    let log_file_fd = log_file.as_raw_fd();

    // Safety: both descriptors are open for the duration of the call
    unsafe {
        libc::dup2(log_file_fd, stderr_fd);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("Starting Blockfall");

    match Config::force_reload() {
        Ok(_) => info!("Configuration loaded successfully"),
        Err(e) => error!("Failed to load configuration, using defaults: {e}"),
    }
    let config = Config::current();

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(&config);
    let res = run_app(&mut terminal, app, &config.timing);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Game error: {err:?}");
        return Err(err);
    }

    info!("Exiting");
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    timing: &TimingConfig,
) -> anyhow::Result<()> {
    let frame_interval = Duration::from_millis(timing.frame_interval_ms);
    let game_tick = Duration::from_millis(timing.game_tick_ms);
    let input_poll = Duration::from_millis(timing.input_poll_ms);

    let mut last_render = Instant::now()
        .checked_sub(frame_interval)
        .unwrap_or_else(Instant::now);
    let mut last_game_tick = Instant::now();

    // Drop anything typed before the game started
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    loop {
        if last_render.elapsed() >= frame_interval {
            terminal.draw(|f| blockfall::ui::render(f, &mut app))?;
            last_render = Instant::now();
        }

        if last_game_tick.elapsed() >= game_tick {
            last_game_tick = Instant::now();
            let delta_seconds = {
                let mut time = app.world.resource_mut::<Time>();
                time.update();
                time.delta_seconds()
            };
            app.on_tick(delta_seconds);
        }

        if app.should_quit {
            return Ok(());
        }

        if event::poll(input_poll)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                debug!("Key event: {key:?}");
                handle_key(&mut app, key.code);
            }
        }
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    if matches!(code, KeyCode::Char('q' | 'Q') | KeyCode::Esc) {
        app.should_quit = true;
        return;
    }

    if app.game_state().game_over() {
        if code == KeyCode::Enter {
            app.reset();
        }
        return;
    }

    {
        let mut input = app.world.resource_mut::<Input>();
        match code {
            KeyCode::Left | KeyCode::Char('a') => input.left = true,
            KeyCode::Right | KeyCode::Char('d') => input.right = true,
            KeyCode::Down | KeyCode::Char('s') => input.down = true,
            KeyCode::Up | KeyCode::Char('w') => input.rotate = true,
            KeyCode::Char(' ') => input.hard_drop = true,
            KeyCode::Char('p' | 'P') => input.toggle_pause = true,
            _ => return,
        }
    }

    app.handle_input();
}

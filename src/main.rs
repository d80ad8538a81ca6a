use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, anyhow};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use scopeguard::defer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tile_delve::{
    Game, GameConfig, handle_error,
    input::{Command, parse_script},
    renderer::{GameRenderer, board_lines, hud_line},
};

#[derive(Parser, Debug)]
#[command(name = "tile_delve", about = "Seeded turn-based dungeon crawler")]
struct Cli {
    /// Seed for the first run
    #[arg(long, default_value_t = 12345, allow_hyphen_values = true)]
    seed: i64,

    /// JSON file overriding the default ruleset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Play a key script headlessly (w/a/s/d, n, r) and print the result
    #[arg(long)]
    script: Option<String>,

    /// Print the headless result as a JSON snapshot
    #[arg(long, requires = "script")]
    json: bool,

    /// Write diagnostics here while the terminal UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), cli.script.is_some())?;

    let config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path).map_err(|e| anyhow!(handle_error(&e)))?,
        None => GameConfig::default(),
    };
    let game = Game::with_config(cli.seed, config).map_err(|e| anyhow!(handle_error(&e)))?;

    match cli.script {
        Some(script) => run_script(game, &script, cli.json),
        None => run_terminal(game),
    }
}

fn init_tracing(log_file: Option<&Path>, headless: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tile_delve=info,dungeon=info,combat=info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        // stderr would tear the alternate screen, so the TUI stays silent
        None if headless => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
        None => {}
    }
    Ok(())
}

fn run_script(mut game: Game, script: &str, json: bool) -> anyhow::Result<()> {
    for command in parse_script(script) {
        match command {
            Command::Move(direction) => {
                game.attempt_move(direction);
            }
            Command::NextFloor => {
                game.next_floor()?;
            }
            Command::Restart => game.reset(game.seed())?,
            Command::Quit => break,
        }
    }

    if json {
        println!("{}", game.snapshot().to_json()?);
    } else {
        for line in board_lines(&game) {
            println!("{}", line);
        }
        println!("{}", hud_line(&game));
        for message in game.messages() {
            println!("- {}", message.text);
        }
    }
    Ok(())
}

fn run_terminal(mut game: Game) -> anyhow::Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    defer! {
        let _ = disable_raw_mode();
    }
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
    defer! {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }

    let mut terminal =
        Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to create terminal")?;
    let renderer = GameRenderer::new();

    loop {
        terminal.draw(|frame| renderer.render(frame, &game))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match Command::from_key(key.code) {
            Some(Command::Quit) => break,
            Some(Command::Move(direction)) => {
                game.attempt_move(direction);
            }
            Some(Command::NextFloor) => {
                game.next_floor().map_err(|e| anyhow!(handle_error(&e)))?;
            }
            Some(Command::Restart) => {
                let seed = i64::from(rand::random::<u32>());
                game.reset(seed).map_err(|e| anyhow!(handle_error(&e)))?;
            }
            None => {}
        }
    }

    Ok(())
}

mod app;
mod clipboard;
mod config;
mod engine;
mod form;
mod logging;
mod modes;
mod pools;
mod random;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{DefaultTerminal, Terminal};
use tracing::{debug, info, warn};

use crate::app::{App, SessionInfo};
use crate::config::Config;
use crate::random::RandomSource;
use crate::ui::draw_ui;

#[derive(Parser, Debug, Default)]
#[command(
    name = "unstuck",
    version,
    about = "Prompt generator for writers stuck at the start, middle, or restart of a story"
)]
struct Cli {
    #[arg(short, long, help = "Config file to read instead of the default location")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Seed for reproducible prompts")]
    seed: Option<u64>,

    #[arg(long, help = "Log level (trace, debug, info, warn, error)")]
    log_level: Option<String>,
}

/// Command-line flags beat environment and file settings.
fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(seed) = cli.seed {
        config.generation.seed = Some(seed);
    }
}

fn build_rng(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let start_time = Instant::now();

    // Initialize logging before anything else
    let (session_id, log_directory, logging_error, reload_handle, _guard) = match logging::init()
    {
        Ok(ctx) => (
            Some(ctx.session_id),
            Some(ctx.log_directory),
            None,
            Some(ctx.reload_handle),
            Some(ctx._guard),
        ),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            (None, None, Some(e.message), None, None)
        }
    };

    if let Some(dir) = &log_directory {
        logging::cleanup_old_logs(dir);
    }

    let mut loaded_config = config::load_config(cli.config.as_deref());
    apply_cli_overrides(&mut loaded_config.config, &cli);

    if let Some(handle) = &reload_handle
        && let Err(e) = logging::update_log_level(handle, &loaded_config.config.logging.level)
    {
        warn!(error = %e, "log_level_update_failed");
    }

    info!(
        config_path = %loaded_config.config_path.display(),
        status = ?loaded_config.status,
        seeded = loaded_config.config.generation.seed.is_some(),
        "config_loaded"
    );

    let config = &loaded_config.config;
    let app = App::new(
        SessionInfo {
            session_id: session_id.clone(),
            log_directory,
            logging_error,
            config_path: loaded_config.config_path.clone(),
            config_status: loaded_config.status.clone(),
        },
        build_rng(config.generation.seed),
        config.copy_status_duration(),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let terminal = Terminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

    let result = run_app(terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste)?;

    if let Some(sid) = session_id {
        let duration = start_time.elapsed();
        info!(
            session_id = %sid,
            duration_secs = duration.as_secs_f64(),
            "session_end"
        );
    }

    result
}

fn run_app(mut terminal: DefaultTerminal, mut app: App) -> Result<()> {
    loop {
        // Pick up finished copies and expire the copy label
        app.poll_copy(Instant::now());

        terminal.draw(|f| draw_ui(f, &mut app))?;

        if app.should_quit {
            return Ok(());
        }

        // Short timeout so the copy label can revert without input
        if crossterm::event::poll(Duration::from_millis(50))? {
            match crossterm::event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Paste(text) => app.handle_paste(&text),
                Event::Resize(width, height) => {
                    debug!(width, height, "terminal_resized");
                }
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::pick;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "unstuck",
            "--config",
            "/tmp/unstuck.toml",
            "--seed",
            "9",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/unstuck.toml")));
        assert_eq!(cli.seed, Some(9));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = Config::default();
        config.generation.seed = Some(1);
        let cli = Cli {
            seed: Some(2),
            log_level: Some("trace".to_string()),
            ..Cli::default()
        };
        apply_cli_overrides(&mut config, &cli);
        assert_eq!(config.generation.seed, Some(2));
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_absent_cli_flags_keep_config() {
        let mut config = Config::default();
        config.generation.seed = Some(5);
        apply_cli_overrides(&mut config, &Cli::default());
        assert_eq!(config.generation.seed, Some(5));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let pool = ["a", "b", "c", "d", "e", "f", "g"];
        let mut first = build_rng(Some(42));
        let mut second = build_rng(Some(42));
        let a: Vec<&str> = (0..20).map(|_| *pick(first.as_mut(), &pool)).collect();
        let b: Vec<&str> = (0..20).map(|_| *pick(second.as_mut(), &pool)).collect();
        assert_eq!(a, b);
    }
}

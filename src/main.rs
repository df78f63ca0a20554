mod actions;
mod app;
mod constants;
mod errlog;
mod events;
mod history;
mod llm;
mod state;
mod typewriter;
mod ui;

use std::io;
use std::sync::Arc;
use std::sync::mpsc;

use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use secrecy::SecretString;

use app::App;
use constants::API_KEY_VAR;
use llm::gemini::GeminiClient;
use llm::{ConfigError, StreamEvent};

/// Read the API key once at process start. Absence is fatal and reported to
/// the operator before the terminal enters raw mode.
fn require_api_key() -> Result<SecretString, ConfigError> {
    dotenvy::dotenv().ok();
    std::env::var(API_KEY_VAR)
        .map(SecretString::from)
        .map_err(|_| ConfigError(format!("{} not set (export it or add it to .env)", API_KEY_VAR)))
}

fn main() -> io::Result<()> {
    let api_key = match require_api_key() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    // Panic hook: restore terminal state and log the panic to disk.
    // Without this, a panic leaves the terminal in raw mode + alternate
    // screen and the error is lost.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
        errlog::log_panic(info);
        default_hook(info);
    }));

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let (tx, rx) = mpsc::channel::<StreamEvent>();
    let client = Arc::new(GeminiClient::new(api_key));

    let mut app = App::new(client);
    let result = app.run(&mut terminal, tx, rx);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}

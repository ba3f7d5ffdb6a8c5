use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tracing::{error, info, info_span};
use tracing_error::{ErrorLayer, SpanTrace};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod catalog;
mod console;
mod controller;
mod data;
mod details;
mod domain;
mod listing;
mod model;
mod selection;
mod table;
mod ui;

use console::LogConsole;
use controller::Controller;
use domain::{AppConfig, DruidError, Message};
use model::{Model, Status};
use ui::TableUI;

/// Browse the animals of a monster statistics CSV file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// CSV file to load, `~` and environment variables are expanded
    #[arg(default_value = "data.csv")]
    path: String,

    /// Log level for the in-app console, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<String>,

    /// Event poll timeout in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    /// Number of log lines kept for the console
    #[arg(long, default_value_t = 500)]
    log_capacity: usize,
}

impl Cli {
    fn into_config(self) -> Result<AppConfig, DruidError> {
        let mut cfg = AppConfig::default()
            .with_data_path(expand(&self.path)?)
            .with_log_level(self.log_level)
            .with_event_poll_time(self.poll_ms)
            .with_log_capacity(self.log_capacity);
        if let Some(log_file) = self.log_file {
            cfg = cfg.with_log_file(expand(&log_file)?);
        }
        Ok(cfg)
    }
}

fn expand(path: &str) -> Result<PathBuf, DruidError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| DruidError::InvalidPath(e.to_string()))
}

fn main() -> ExitCode {
    let cfg = match Cli::parse().into_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let console = LogConsole::new(cfg.log_capacity);
    if let Err(e) = init_tracing(&cfg, &console) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let model = {
        let _span = info_span!("startup", path = %cfg.data_path.display()).entered();
        match Model::load(&cfg, console) {
            Ok(model) => model,
            Err(e) => {
                error!("Loading failed: {e}");
                eprintln!("Error: {e}\n{}", SpanTrace::capture());
                return ExitCode::FAILURE;
            }
        }
    };

    let result = run(model, &cfg);
    ratatui::restore();
    if let Err(e) = disable_mouse_capture(&mut io::stdout()) {
        error!("Could not disable mouse capture: {e}");
    }
    match result {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn init_tracing(cfg: &AppConfig, console: &LogConsole) -> Result<(), DruidError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => log_filter(&cfg.log_level)?,
    };

    let file_layer = match &cfg.log_file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(File::create(path)?)),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(console.layer())
        .with(file_layer)
        .init();
    Ok(())
}

fn log_filter(level: &str) -> Result<EnvFilter, DruidError> {
    EnvFilter::try_new(level)
        .map_err(|e| DruidError::InvalidConfig(format!("log level \"{level}\": {e}")))
}

fn disable_mouse_capture(out: &mut impl Write) -> io::Result<()> {
    execute!(out, DisableMouseCapture)
}

// ratatui's panic hook restores the terminal but knows nothing of mouse capture.
fn install_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Err(e) = disable_mouse_capture(&mut io::stdout()) {
            error!("Could not disable mouse capture: {e}");
        }
        hook(info);
    }));
}

fn run(mut model: Model, cfg: &AppConfig) -> Result<(), DruidError> {
    info!("Starting druider!");
    let mut ui = TableUI::new();
    let controller = Controller::new(cfg);

    let mut terminal = ratatui::init();
    install_panic_hook();
    execute!(io::stdout(), EnableMouseCapture)?;

    let size = terminal.size()?;
    model.update(Some(Message::Resize(size.width, size.height)))?;
    model.update(Some(Message::Mount))?;

    while model.status != Status::Quitting {
        // Render the current view
        terminal.draw(|f| ui.draw(&mut model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event()?;
        model.update(message)?;
    }

    info!("Quitting druider.");
    Ok(())
}

// ggadam: Adam function parser harness and live viewer

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use ggadam::gui::Gui;
use ggadam::harness::run_function_parser_test;
use ggadam::ui::App;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ggadam")]
#[command(about = "Parse Adam function files and write them back")]
struct Args {
    /// File containing function definitions
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Open the interactive viewer instead of printing
    #[arg(long)]
    view: bool,

    /// Ticks (ms) between checks for changes to FILE in the viewer
    #[arg(long, value_name = "TICKS", default_value_t = 500)]
    reload_interval: i32,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    setup_tracing(args.verbose, args.view);

    if !args.file.exists() {
        eprintln!("Error: File '{}' not found", args.file.display());
        std::process::exit(1);
    }

    if args.view {
        return run_viewer(args.file, args.reload_interval);
    }

    let contents = fs::read_to_string(&args.file)?;
    let filename = args.file.display().to_string();
    info!(file = %filename, "parsing function file");

    let report = run_function_parser_test(&contents, &filename, &mut io::stdout().lock())?;

    if let Some(err) = &report.parse_error {
        eprintln!("{}", err);
    }
    if !report.passed() {
        std::process::exit(1);
    }

    Ok(())
}

fn run_viewer(file: PathBuf, reload_interval: i32) -> Result<(), Box<dyn std::error::Error>> {
    let gui = Gui::with_system_clock();
    let mut app = App::new(&gui, file, reload_interval)?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn setup_tracing(verbose: bool, view: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if view {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

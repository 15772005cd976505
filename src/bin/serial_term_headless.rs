//! Serial Term Headless Runner
//!
//! Replays a captured serial byte stream through the terminal core and
//! prints the resulting buffer, either as text or as a JSON snapshot,
//! followed by the reports the terminal would have sent to the device.

use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use serial_term::config::BoundsConfig;
use serial_term::core::LineCloseObserver;
use serial_term::transcript::TranscriptWriter;
use serial_term::{NewLineMode, Terminal, TerminalConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// CLI arguments for the headless runner
#[derive(Parser, Debug)]
#[command(name = "serial-term-headless")]
#[command(version)]
#[command(about = "Replay a serial capture through the terminal core", long_about = None)]
struct Args {
    /// Capture to replay (default: stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// CR/LF completion mode
    #[arg(long, value_enum, value_name = "MODE")]
    newline_mode: Option<NewLineMode>,

    /// Visible rows
    #[arg(short, long, value_name = "ROWS")]
    rows: Option<u16>,

    /// Visible columns
    #[arg(long, value_name = "COLS")]
    cols: Option<u16>,

    /// Feed the capture in chunks of this many bytes
    #[arg(long, value_name = "BYTES", default_value_t = 4096)]
    chunk_size: usize,

    /// Output the snapshot as JSON
    #[arg(short, long)]
    json: bool,

    /// Write finished lines to this file
    #[arg(short, long, value_name = "FILE")]
    transcript: Option<PathBuf>,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> serial_term::Result<TerminalConfig> {
    let mut config = match &args.config {
        Some(path) => TerminalConfig::load(path)?,
        None => TerminalConfig::default(),
    };

    // CLI overrides the file
    if let Some(mode) = args.newline_mode {
        config.newline_mode = mode;
    }
    if args.rows.is_some() || args.cols.is_some() {
        let current = config.bounds.unwrap_or(BoundsConfig { rows: 24, cols: 80 });
        config.bounds = Some(BoundsConfig {
            rows: args.rows.unwrap_or(current.rows),
            cols: args.cols.unwrap_or(current.cols),
        });
    }
    // replaying a capture should not beep
    config.bell.enabled = false;
    Ok(config)
}

fn read_input(args: &Args) -> io::Result<Vec<u8>> {
    match &args.input {
        Some(path) => std::fs::read(path),
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            Ok(data)
        }
    }
}

fn run(args: &Args) -> serial_term::Result<()> {
    let config = load_config(args)?;
    let data = read_input(args)?;

    let mut terminal = Terminal::from_config(&config);

    let transcript = match &args.transcript {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            let writer = Rc::new(TranscriptWriter::new(file, config.transcript));
            let observer: Rc<dyn LineCloseObserver> = writer.clone();
            terminal.register_observer(&observer);
            Some((writer, observer))
        }
        None => None,
    };

    let mut newlines = 0;
    for chunk in data.chunks(args.chunk_size.max(1)) {
        newlines += terminal.input(chunk);
    }
    terminal.finalize();
    tracing::info!(bytes = data.len(), newlines, "capture replayed");

    if let Some((writer, observer)) = transcript {
        terminal.deregister_observer(&observer);
        writer.flush()?;
    }

    let snapshot = terminal.snapshot();
    if args.json {
        println!("{}", snapshot.to_json()?);
    } else {
        let bounds = terminal.bounds();
        println!(
            "Terminal State ({}x{}, {:?}):",
            bounds.column + 1,
            bounds.line + 1,
            terminal.newline_mode()
        );
        println!("Cursor: {}", terminal.cursor());
        println!("---");
        print!("{}", snapshot.to_text());
        println!("---");
    }

    for report in terminal.drain_output() {
        println!("report: {}", report.escape_ascii());
    }

    Ok(())
}

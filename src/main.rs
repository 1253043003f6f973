//! Gestalert CLI
//!
//! Usage:
//!   gestalert --frame '{"hands": [...]}'    # Single frame evaluation
//!   gestalert --interactive                 # JSON-lines frames from stdin
//!   gestalert --serve                       # HTTP API server
//!   gestalert --frame '...' --json          # JSON output

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

use gestalert::config::Config;
use gestalert::core::{run_server, SessionEngine, GESTURE_TABLE};
use gestalert::types::{KeypointFrame, StatusKind, StatusOutput};
use gestalert::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "gestalert",
    version = VERSION,
    about = "Gestalert - turn hand and body keypoints into a stable emergency status",
    long_about = "Gestalert classifies hand gestures and body posture from keypoints\n\
                  produced by an external landmark detector, and stabilizes the\n\
                  result into a status suitable for display or IoT actuation.\n\n\
                  Input is one JSON object per frame:\n  \
                  {\"hands\": [[{\"x\":..,\"y\":..}, ... 21]], \"pose\": [... 33], \"size\": {\"width\":1280,\"height\":720}}\n\n\
                  Statuses:\n  \
                  MONITORING      - Nothing signalled\n  \
                  HELP_CRITICAL   - Four fingers up\n  \
                  SAFE            - Thumb + index\n  \
                  NEED_ASSISTANCE - Index + middle\n  \
                  STOP            - Open hand\n  \
                  FALLEN          - Body lying down"
)]
struct Args {
    /// Frame to evaluate (single mode), as JSON
    #[arg(short, long)]
    frame: Option<String>,

    /// Interactive mode - read JSON frames from stdin, one per line
    #[arg(short, long)]
    interactive: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Show classification details
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gestalert=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if args.serve {
        run_serve(&args, config).await
    } else if let Some(ref frame) = args.frame {
        run_single(frame, &args, config)
    } else {
        // Default to interactive if no mode specified
        run_interactive(&args, config)
    }
}

/// Run single frame evaluation
fn run_single(frame: &str, args: &Args, config: Config) -> Result<()> {
    let frame: KeypointFrame = serde_json::from_str(frame).context("parsing --frame")?;
    let mut engine = SessionEngine::with_config(config.engine);
    let output = engine.update(&frame)?;
    print_output(&output, args)
}

/// Run interactive mode: one JSON frame per line
fn run_interactive(args: &Args, config: Config) -> Result<()> {
    let mut engine = SessionEngine::with_config(config.engine);

    print_header(args.no_color);
    println!("Paste one JSON frame per line. Commands: 'reset', 'status', 'quit'.");
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut last_status = engine.status();

    loop {
        print!("{}", format_prompt(engine.status(), args.no_color));
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!("\nSession ended. Frames: {}", engine.frame_count());
            break;
        }
        if line.is_empty() {
            continue;
        }

        let output = if line.eq_ignore_ascii_case("reset") {
            engine.reset()
        } else if line.eq_ignore_ascii_case("status") {
            engine.current_output()
        } else {
            let frame: KeypointFrame = match serde_json::from_str(line) {
                Ok(frame) => frame,
                Err(e) => {
                    print_warning(&format!("Unreadable frame: {}", e), args.no_color);
                    continue;
                }
            };
            match engine.update(&frame) {
                Ok(output) => output,
                Err(e) => {
                    print_warning(&format!("Rejected frame: {}", e), args.no_color);
                    continue;
                }
            }
        };

        print_output(&output, args)?;

        // Ring bell when a critical status first appears
        if output.status != last_status && output.status.is_critical() && !args.json {
            print!("\x07");
        }
        last_status = output.status;
    }
    Ok(())
}

/// Print one output in the selected format
fn print_output(output: &StatusOutput, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string(output)?);
    } else if args.verbose {
        print_verbose(output, args.no_color);
    } else if args.no_color {
        println!("{}", output.to_parseable_string());
    } else {
        println!("{}", output.to_terminal_string());
    }
    Ok(())
}

/// Print header with the gesture cheat sheet
fn print_header(no_color: bool) {
    let title = format!("  Gestalert v{} - Emergency signal monitor", VERSION);
    if no_color {
        println!("========================================");
        println!("{}", title);
        println!("========================================");
    } else {
        println!("{}", "========================================".bold());
        println!("{}", title.bold());
        println!("{}", "========================================".bold());
    }
    for gesture in GESTURE_TABLE {
        println!("  {:<32} = {}", gesture.hint, gesture.status);
    }
    println!("  {:<32} = {}", "lying down", StatusKind::Fallen);
    println!();
}

/// Format prompt
fn format_prompt(status: StatusKind, no_color: bool) -> String {
    if no_color {
        format!("[{}] > ", status)
    } else {
        format!(
            "{}{} [{}]{} > ",
            status.color_code(),
            status.emoji(),
            status,
            StatusKind::color_reset()
        )
    }
}

fn print_warning(message: &str, no_color: bool) {
    if no_color {
        println!("! {}", message);
    } else {
        println!("{}", format!("⚠ {}", message).yellow());
    }
}

/// Print verbose output
fn print_verbose(output: &StatusOutput, no_color: bool) {
    let color = if no_color { "" } else { output.status.color_code() };
    let reset = if no_color { "" } else { StatusKind::color_reset() };

    println!("{}┌─────────────────────────────────────┐{}", color, reset);
    println!("{}│ Status: {} ({:.0}%){}", color, output.status, output.confidence * 100.0, reset);
    if let Some(display) = output.status.display() {
        println!("{}│ Message: {} rgb{:?}{}", color, display.message, display.color, reset);
    }
    println!("{}├─────────────────────────────────────┤{}", color, reset);
    println!("{}│ History: {} | Frame: {}{}", color, output.history_len, output.frame_count, reset);
    println!("{}│ Reason: {}{}", color, output.reason, reset);
    println!("{}└─────────────────────────────────────┘{}", color, reset);
}

/// Run HTTP API server
async fn run_serve(args: &Args, config: Config) -> Result<()> {
    println!();
    println!("{}", format!("Gestalert API Server v{}", VERSION).bold());
    println!();
    run_server(&args.addr, config.engine)
        .await
        .with_context(|| format!("serving on {}", args.addr))
}

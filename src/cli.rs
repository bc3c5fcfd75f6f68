//! CLI - Command Line Interface for marquee
//!
//! Every catalog query the TUI makes is scriptable. Output is JSON when
//! `--json` is passed or stdout is not a terminal.
//!
//! # Examples
//!
//! ```bash
//! # Browse the catalog
//! marquee rows --json
//! marquee search "thriller"
//!
//! # Look up and play a trailer
//! marquee info 7
//! marquee play 7 --player vlc
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::stream::PlayerType;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Catalog could not be loaded
    CatalogLoad = 3,
    /// No title with the requested id
    NotFound = 4,
    /// External player missing or failed
    PlayerFailed = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// marquee - browse a video catalog and watch trailers in the terminal
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "marquee",
    version,
    about = "Terminal video-catalog browser with trailer playback",
    long_about = "Browse a catalog of movies and series in rows, search it, \
                  and play trailers in mpv or VLC.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  marquee                               Launch interactive TUI\n\
                  marquee --catalog https://host/m.json Browse a remote catalog\n\
                  marquee search \"space\"                Search titles\n\
                  marquee play 7 --player mpv           Play a trailer"
)]
pub struct Cli {
    /// Catalog URL or file path
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// External player for trailers
    #[arg(long, short = 'p', global = true, value_enum)]
    pub player: Option<PlayerType>,

    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search titles across every row
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// List each category with its titles
    #[command(visible_alias = "r")]
    Rows(RowsCmd),

    /// Show one title
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Play a title's trailer in the external player
    #[command(visible_alias = "pl")]
    Play(PlayCmd),
}

/// Search titles by name or genre
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (case-insensitive substring)
    #[arg(required = true)]
    pub query: String,
}

/// List every category row and the hero
#[derive(Args, Debug)]
pub struct RowsCmd {}

/// Show a title by id
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// Catalog title id
    #[arg(required = true)]
    pub id: u64,
}

/// Play a title's trailer and wait for the player to exit
#[derive(Args, Debug)]
pub struct PlayCmd {
    /// Catalog title id
    #[arg(required = true)]
    pub id: u64,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero", default)]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print JSON-wrapped data, or the human rendering when not in JSON mode
    pub fn print<T: Serialize>(&self, data: T, human: impl FnOnce() -> String) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", human());
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

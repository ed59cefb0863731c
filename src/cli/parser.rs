use crate::export::ExportFormat;
use clap::{ArgAction, Parser, Subcommand};

/// Command-line interface definition for rGlucoLogger
/// CLI application to load glucose monitor exports into SQLite
#[derive(Parser)]
#[command(
    name = "rglucologger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Load glucose monitor CSV exports into SQLite and query them",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Increase diagnostic output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Load a device CSV export
    Load {
        /// CSV file exported by the glucose monitor app
        #[arg(value_name = "FILE")]
        file: String,

        #[arg(long = "user", help = "User id (default: file name without extension)")]
        user: Option<String>,

        #[arg(long = "chunk-size", help = "Readings written per batch")]
        chunk_size: Option<usize>,

        #[arg(
            long = "max-probe-lines",
            help = "Preamble lines searched for the header row"
        )]
        max_probe_lines: Option<usize>,

        #[arg(
            long = "delimiter",
            help = "Field delimiter: one character, 'tab' or 'semicolon'"
        )]
        delimiter: Option<String>,

        #[arg(long = "atomic", help = "Commit the whole file or nothing")]
        atomic: bool,

        #[arg(long = "replace", help = "Delete the user's readings before loading")]
        replace: bool,
    },

    /// List readings
    List {
        #[arg(long = "user", help = "Only readings of this user")]
        user: Option<String>,

        #[arg(
            long = "start",
            help = "Inclusive lower bound (YYYY-MM-DD, 'YYYY-MM-DD HH:MM' or RFC 3339)"
        )]
        start: Option<String>,

        #[arg(long = "stop", help = "Inclusive upper bound (same formats as --start)")]
        stop: Option<String>,

        #[arg(long = "limit", help = "Maximum number of rows")]
        limit: Option<usize>,
    },

    /// Show every field of one reading
    Show {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Minimum and maximum glucose level of a user
    Minmax {
        #[arg(long = "user")]
        user: String,

        #[arg(long = "start")]
        start: Option<String>,

        #[arg(long = "stop")]
        stop: Option<String>,
    },

    /// Export readings
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long = "user")]
        user: Option<String>,

        #[arg(long = "start")]
        start: Option<String>,

        #[arg(long = "stop")]
        stop: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

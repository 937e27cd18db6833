use crate::config::Backend;
use crate::export::ExportFormat;
use crate::models::direction::Direction;
use crate::models::input_mode::InputMode;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rattendance
#[derive(Parser)]
#[command(
    name = "rattendance",
    version = env!("CARGO_PKG_VERSION"),
    about = "Attendance kiosk: scan an RFID tag or type a student ID to clock IN / OUT",
    long_about = None
)]
pub struct Cli {
    /// Override local database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the configured backend
    #[arg(global = true, long = "backend", value_enum)]
    pub backend: Option<Backend>,

    /// Run in test mode (ignore and never write the user's config file)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Print debug diagnostics to stderr
    #[arg(global = true, long, short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and local database
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

    /// Run the interactive attendance kiosk
    Kiosk {
        /// Initial input mode (default from config)
        #[arg(long, value_enum)]
        mode: Option<InputMode>,

        /// Start with OUT selected instead of the configured direction
        #[arg(long)]
        out: bool,
    },

    /// Record one attendance event (manual attendance)
    Record {
        /// Student ID, or RFID tag with --rfid
        id: String,

        /// Treat ID as a scanned RFID tag
        #[arg(long)]
        rfid: bool,

        /// Record OUT instead of IN
        #[arg(long)]
        out: bool,

        /// Year level (1-4) to store if the student has none
        #[arg(long)]
        year: Option<String>,

        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Link an RFID tag to a student
    Link {
        /// Scanned tag value
        rfid: String,
        /// Existing student ID
        student_id: String,
    },

    /// Manage student records
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// List attendance events
    List {
        /// Only this student
        #[arg(long)]
        student: Option<String>,

        /// Only this day (YYYY-MM-DD or "today")
        #[arg(long)]
        date: Option<String>,

        /// Only IN or OUT events
        #[arg(long = "type", value_parser = Direction::parse)]
        kind: Option<Direction>,
    },

    /// Export attendance events
    Export {
        /// Export format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (absolute path required)
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Only this student
        #[arg(long)]
        student: Option<String>,

        /// Only this day (YYYY-MM-DD or "today")
        #[arg(long)]
        date: Option<String>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the internal audit log (local backend)
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum StudentAction {
    /// Register a student, or rename an existing one
    Add {
        id: String,
        name: String,
        /// Year level 1-4
        #[arg(long)]
        year: Option<String>,
    },
    /// Show a student record
    Show { id: String },
}

impl Commands {
    pub fn direction(out: bool) -> Direction {
        if out { Direction::Out } else { Direction::In }
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "regtracker")]
#[command(version, about = "Track regulations and the actions taken against them")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file (overrides config and environment)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file (defaults to ./regtracker.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the tracker database
    Init {
        /// Do not load the sample regulations
        #[arg(long)]
        no_seed: bool,
    },

    /// List regulations, optionally filtered
    List {
        /// Search title, summary and jurisdiction (case-insensitive)
        #[arg(long, short = 'q')]
        query: Option<String>,

        /// Exact source ("All" for any)
        #[arg(long)]
        source: Option<String>,

        /// Exact status ("All" for any)
        #[arg(long)]
        status: Option<String>,

        /// Exact category ("All" for any)
        #[arg(long)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a regulation with its links and actions
    Show {
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a regulation's status (Open, In Progress, Closed)
    Status {
        id: i64,

        status: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add, edit or delete actions
    Action(ActionCommand),

    /// List the values available to the list filters
    Choices {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct ActionCommand {
    #[command(subcommand)]
    pub action: ActionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ActionSubcommand {
    /// Add an action to a regulation
    Add {
        regulation_id: i64,

        title: String,

        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Action status (Planned, In Progress, Done, Blocked)
        #[arg(long)]
        status: Option<String>,

        #[arg(long, short = 'a')]
        assignee: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an action. Omitted fields keep their current value.
    Edit {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Action status (Planned, In Progress, Done, Blocked)
        #[arg(long)]
        status: Option<String>,

        #[arg(long, short = 'a', conflicts_with = "clear_assignee")]
        assignee: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the assignee
        #[arg(long)]
        clear_assignee: bool,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        /// Mark the action done regardless of --status
        #[arg(long)]
        done: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an action permanently
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

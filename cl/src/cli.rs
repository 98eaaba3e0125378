//! CLI argument parsing for choreledger

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cl")]
#[command(
    author,
    version,
    about = "Daily chore routines with a points ledger",
    long_about = None,
    after_help = "Logs are written to: ~/.local/share/choreledger/logs/cl.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List routine templates with today's progress
    Routines,

    /// Start (or reopen) today's instance of a routine
    Start {
        /// Routine template ID (e.g. morning)
        #[arg(required = true)]
        template_id: String,
    },

    /// Show a routine instance
    Show {
        /// Routine instance ID
        #[arg(required = true)]
        routine_id: String,
    },

    /// Mark a chore as done
    Done {
        /// Routine instance ID
        #[arg(required = true)]
        routine_id: String,

        /// Chore instance ID
        #[arg(required = true)]
        chore_id: String,
    },

    /// Mark a chore as not done
    Undo {
        /// Routine instance ID
        #[arg(required = true)]
        routine_id: String,

        /// Chore instance ID
        #[arg(required = true)]
        chore_id: String,
    },

    /// List ongoing routines and routines completed today
    Active,

    /// List every stored routine instance
    History,

    /// Show the current points balance
    Points,

    /// List shop items
    Shop,

    /// Buy a shop item with points
    Buy {
        /// Shop item ID
        #[arg(required = true)]
        item_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_done() {
        let cli = Cli::parse_from(["cl", "-v", "done", "morning-1", "get-dressed-1"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Done { routine_id, chore_id } => {
                assert_eq!(routine_id, "morning-1");
                assert_eq!(chore_id, "get-dressed-1");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskboard", about = "Kanban task board for the terminal")]
pub struct Cli {
    /// Path to the SQLite database [default: ~/.taskboard/board.db]
    #[arg(long, env = "TASKBOARD_DB", global = true)]
    pub db: Option<String>,

    /// Path to the config file [default: ~/.taskboard/config.toml]
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Path to the log file [default: ~/.taskboard/taskboard.log]
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Open the interactive board (default)
    Ui,

    /// List board names, marking the active one
    Boards,

    /// List tasks
    List {
        /// Board to list [default: the active board]
        #[arg(long)]
        board: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_ui() {
        let cli = Cli::try_parse_from(["taskboard"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn list_flags_parse() {
        let cli =
            Cli::try_parse_from(["taskboard", "--db", "/tmp/x.db", "list", "--board", "Roadmap", "--json"])
                .unwrap();
        assert_eq!(cli.db.as_deref(), Some("/tmp/x.db"));
        match cli.command {
            Some(Command::List { board, json }) => {
                assert_eq!(board.as_deref(), Some("Roadmap"));
                assert!(json);
            }
            _ => panic!("expected list"),
        }
    }
}

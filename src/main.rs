mod cli;

use std::fs::OpenOptions;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use rusqlite::Connection;

use cli::{Cli, Command};
use taskboard::board;
use taskboard::config::Config;
use taskboard::db;
use taskboard::model::Status;
use taskboard::storage;
use taskboard::tui;

fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn setup_logging(path: &str, level: log::LevelFilter) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {path}"))?;
    env_logger::Builder::new()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
    Ok(())
}

fn open_db(path: &str) -> Result<Connection> {
    ensure_parent_dir(path)?;
    let conn = db::open(path)?;
    db::init(&conn)?;
    Ok(conn)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    setup_logging(&config.log_path(cli.log_file.as_deref()), config.log_level())?;

    let db_path = config.db_path(cli.db.as_deref());
    info!("using database {db_path}");
    let conn = open_db(&db_path)?;

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => tui::run(&conn, config.poll_interval())?,
        Command::Boards => {
            storage::initialize_data(&conn)?;
            let tasks = storage::list_tasks(&conn)?;
            let boards = board::compute_boards(&tasks);
            let active = persisted_active(&conn, &boards)?;
            for name in &boards {
                let marker = if active.as_deref() == Some(name.as_str()) { "*" } else { " " };
                println!("{marker} {name}");
            }
        }
        Command::List { board, json } => {
            storage::initialize_data(&conn)?;
            let tasks = storage::list_tasks(&conn)?;
            let boards = board::compute_boards(&tasks);
            let board = match board {
                Some(name) => {
                    if !boards.contains(&name) {
                        bail!("board '{name}' has no tasks");
                    }
                    Some(name)
                }
                None => persisted_active(&conn, &boards)?,
            };
            let shown: Vec<_> = tasks
                .into_iter()
                .filter(|t| board.as_deref() == Some(t.board.as_str()))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                for status in Status::ALL {
                    println!("{}", status.label());
                    for task in shown.iter().filter(|t| t.status == status) {
                        println!("  #{} {}", task.id, task.title);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Active board as the UI would resolve it, without writing the choice back.
fn persisted_active(conn: &Connection, boards: &[String]) -> Result<Option<String>> {
    let persisted: Option<String> = db::get(conn, db::ACTIVE_BOARD_KEY)?;
    Ok(board::resolve_active_board(boards, persisted.as_deref()))
}

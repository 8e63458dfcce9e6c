//! Default locations of the files the board keeps under `$HOME/.taskboard`.

fn base_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    format!("{home}/.taskboard")
}

/// `TASKBOARD_DB` when set, otherwise `board.db` in the base directory.
pub fn db_path() -> String {
    std::env::var("TASKBOARD_DB").unwrap_or_else(|_| format!("{}/board.db", base_dir()))
}

pub fn config_path() -> String {
    format!("{}/config.toml", base_dir())
}

pub fn log_path() -> String {
    format!("{}/taskboard.log", base_dir())
}

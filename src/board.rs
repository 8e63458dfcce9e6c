//! Board index: boards are not stored, they are derived from the `board`
//! field of the tasks, and one of them is the persisted active board.

use std::collections::HashSet;

use anyhow::Result;
use log::{info, warn};
use rusqlite::Connection;

use crate::db;
use crate::model::Task;

/// Distinct non-empty board names in order of first appearance.
pub fn compute_boards(tasks: &[Task]) -> Vec<String> {
    let mut seen = HashSet::new();
    tasks
        .iter()
        .map(|t| t.board.as_str())
        .filter(|b| !b.is_empty())
        .filter(|b| seen.insert(*b))
        .map(str::to_string)
        .collect()
}

/// The persisted choice when it still names a board, else the first board.
/// `None` means there are no boards at all.
pub fn resolve_active_board(boards: &[String], persisted: Option<&str>) -> Option<String> {
    match persisted {
        Some(choice) if boards.iter().any(|b| b == choice) => Some(choice.to_string()),
        _ => boards.first().cloned(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardIndex {
    pub boards: Vec<String>,
    active: Option<String>,
}

impl BoardIndex {
    /// Recompute the boards from `tasks` and resolve the active one against
    /// the persisted choice. A stale or absent choice is replaced in storage
    /// so the next session starts from the same board.
    pub fn load(conn: &Connection, tasks: &[Task]) -> Result<Self> {
        let boards = compute_boards(tasks);
        let persisted: Option<String> = db::get(conn, db::ACTIVE_BOARD_KEY)?;
        let active = resolve_active_board(&boards, persisted.as_deref());
        if active != persisted {
            match &active {
                Some(board) => {
                    info!("active board resolved to '{board}'");
                    db::set(conn, db::ACTIVE_BOARD_KEY, board)?;
                }
                None => {
                    info!("no boards left, clearing active board");
                    db::remove(conn, db::ACTIVE_BOARD_KEY)?;
                }
            }
        }
        Ok(Self { boards, active })
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn contains(&self, board: &str) -> bool {
        self.boards.iter().any(|b| b == board)
    }

    /// Make `board` the active board and persist the choice. Returns false
    /// (and changes nothing) when `board` is not a known board.
    pub fn select(&mut self, conn: &Connection, board: &str) -> Result<bool> {
        if !self.contains(board) {
            warn!("ignoring selection of unknown board '{board}'");
            return Ok(false);
        }
        db::set(conn, db::ACTIVE_BOARD_KEY, board)?;
        self.active = Some(board.to_string());
        Ok(true)
    }

    fn position(&self) -> Option<usize> {
        let active = self.active.as_deref()?;
        self.boards.iter().position(|b| b == active)
    }

    /// Board after the active one, wrapping around.
    pub fn next(&self) -> Option<&str> {
        let len = self.boards.len();
        let i = self.position().map_or(0, |p| (p + 1) % len.max(1));
        self.boards.get(i).map(String::as_str)
    }

    /// Board before the active one, wrapping around.
    pub fn prev(&self) -> Option<&str> {
        let len = self.boards.len();
        let i = self.position().map_or(0, |p| (p + len - 1) % len.max(1));
        self.boards.get(i).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Status, TaskId};

    fn task(id: u64, board: &str) -> Task {
        Task {
            id: TaskId(id),
            title: format!("t{id}"),
            description: String::new(),
            status: Status::Todo,
            board: board.to_string(),
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn boards_in_first_seen_order_without_duplicates() {
        let tasks = vec![task(1, "B"), task(2, "A"), task(3, "B"), task(4, "C"), task(5, "A")];
        assert_eq!(compute_boards(&tasks), names(&["B", "A", "C"]));
    }

    #[test]
    fn empty_board_values_are_excluded() {
        let tasks = vec![task(1, ""), task(2, "A"), task(3, "")];
        assert_eq!(compute_boards(&tasks), names(&["A"]));
        assert!(compute_boards(&[]).is_empty());
    }

    #[test]
    fn persisted_choice_wins_when_present() {
        let boards = names(&["A", "B"]);
        assert_eq!(resolve_active_board(&boards, Some("B")).as_deref(), Some("B"));
    }

    #[test]
    fn stale_choice_falls_back_to_first() {
        let boards = names(&["A", "B"]);
        assert_eq!(resolve_active_board(&boards, Some("Gone")).as_deref(), Some("A"));
        assert_eq!(resolve_active_board(&boards, None).as_deref(), Some("A"));
    }

    #[test]
    fn no_boards_yields_sentinel() {
        assert_eq!(resolve_active_board(&[], Some("A")), None);
        assert_eq!(resolve_active_board(&[], None), None);
    }

    #[test]
    fn load_persists_resolved_choice() {
        let conn = db::open_memory().unwrap();
        db::set(&conn, db::ACTIVE_BOARD_KEY, "Gone").unwrap();
        let index = BoardIndex::load(&conn, &[task(1, "A"), task(2, "B")]).unwrap();
        assert_eq!(index.active(), Some("A"));
        assert_eq!(
            db::get::<String>(&conn, db::ACTIVE_BOARD_KEY).unwrap().as_deref(),
            Some("A")
        );
    }

    #[test]
    fn load_with_no_tasks_clears_choice() {
        let conn = db::open_memory().unwrap();
        db::set(&conn, db::ACTIVE_BOARD_KEY, "A").unwrap();
        let index = BoardIndex::load(&conn, &[]).unwrap();
        assert_eq!(index.active(), None);
        assert!(!db::contains(&conn, db::ACTIVE_BOARD_KEY).unwrap());
    }

    #[test]
    fn select_persists_and_survives_reload() {
        let conn = db::open_memory().unwrap();
        let tasks = vec![task(1, "A"), task(2, "B")];
        let mut index = BoardIndex::load(&conn, &tasks).unwrap();
        assert!(index.select(&conn, "B").unwrap());
        let reloaded = BoardIndex::load(&conn, &tasks).unwrap();
        assert_eq!(reloaded.active(), Some("B"));
    }

    #[test]
    fn select_unknown_board_is_ignored() {
        let conn = db::open_memory().unwrap();
        let mut index = BoardIndex::load(&conn, &[task(1, "A")]).unwrap();
        assert!(!index.select(&conn, "Z").unwrap());
        assert_eq!(index.active(), Some("A"));
    }

    #[test]
    fn next_and_prev_wrap() {
        let conn = db::open_memory().unwrap();
        let index = BoardIndex::load(&conn, &[task(1, "A"), task(2, "B"), task(3, "C")]).unwrap();
        assert_eq!(index.next(), Some("B"));
        assert_eq!(index.prev(), Some("C"));
        let empty = BoardIndex::default();
        assert_eq!(empty.next(), None);
        assert_eq!(empty.prev(), None);
    }
}

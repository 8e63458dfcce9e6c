//! View renderer: projects the active board's tasks onto a presentation
//! target. The renderer keeps no state of its own; everything it shows is
//! rebuilt from its inputs.

use anyhow::Result;
use log::{error, warn};

use crate::error::{board_error, BoardError};
use crate::model::{Status, Task, TaskId};

/// A rendered task card. Carries the task id so a selected card can be
/// mapped back to its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: TaskId,
    pub title: String,
}

impl Card {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
        }
    }
}

/// Operations the renderer needs from a concrete UI.
pub trait PresentationTarget {
    /// Drop all content of the `status` column and give it a fresh header.
    /// Fails with `RenderTargetMissing` if the column does not exist.
    fn reset_column(&mut self, status: Status, header: &str) -> Result<()>;
    /// Create an empty column for `status`.
    fn create_column(&mut self, status: Status);
    /// Fails with `RenderTargetMissing` if the column does not exist.
    fn append_card(&mut self, status: Status, card: Card) -> Result<()>;
    fn set_board_title(&mut self, title: &str);
    fn clear_tabs(&mut self);
    fn append_tab(&mut self, board: &str);
    /// Mark the tab named `board` active and every other tab inactive.
    fn mark_active_tab(&mut self, board: Option<&str>);
}

fn is_missing_column(err: &anyhow::Error) -> bool {
    matches!(board_error(err), Some(BoardError::RenderTargetMissing(_)))
}

fn reset_or_create(target: &mut dyn PresentationTarget, status: Status) -> Result<()> {
    let header = status.label();
    match target.reset_column(status, &header) {
        Err(e) if is_missing_column(&e) => {
            warn!("column for status '{status}' not found, creating one");
            target.create_column(status);
            target.reset_column(status, &header)
        }
        other => other,
    }
}

/// Rebuild every column from scratch: a header, then one card per task of
/// `active_board` whose status matches, in storage order.
pub fn render_columns(
    target: &mut dyn PresentationTarget,
    columns: &[Status],
    tasks: &[Task],
    active_board: Option<&str>,
) -> Result<()> {
    target.set_board_title(active_board.unwrap_or(""));
    for &status in columns {
        reset_or_create(target, status)?;
        let Some(board) = active_board else {
            continue;
        };
        for task in tasks
            .iter()
            .filter(|t| t.board == board && t.status == status)
        {
            target.append_card(status, Card::from_task(task))?;
        }
    }
    Ok(())
}

/// Rebuild the board selector and mark the active board's tab.
pub fn render_board_tabs(
    target: &mut dyn PresentationTarget,
    boards: &[String],
    active_board: Option<&str>,
) {
    target.clear_tabs();
    for board in boards {
        target.append_tab(board);
    }
    target.mark_active_tab(active_board);
}

/// Append a single card for a freshly created task. A task whose column
/// does not exist is reported and skipped.
pub fn append_task(target: &mut dyn PresentationTarget, task: &Task) -> Result<()> {
    match target.append_card(task.status, Card::from_task(task)) {
        Err(e) if is_missing_column(&e) => {
            error!("column not found for status: {}", task.status);
            Ok(())
        }
        other => other,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub status: Status,
    pub header: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub board: String,
    pub active: bool,
}

/// In-memory presentation target drawn by the terminal UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardView {
    pub title: String,
    pub columns: Vec<ColumnView>,
    pub tabs: Vec<Tab>,
}

impl BoardView {
    /// A view with one empty column per status in `columns`.
    pub fn with_columns(columns: &[Status]) -> Self {
        let mut view = Self::default();
        for &status in columns {
            view.create_column(status);
        }
        view
    }

    pub fn column(&self, status: Status) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.status == status)
    }

    fn column_mut(&mut self, status: Status) -> Result<&mut ColumnView> {
        self.columns
            .iter_mut()
            .find(|c| c.status == status)
            .ok_or_else(|| BoardError::RenderTargetMissing(status).into())
    }

    /// Id of the card at `row` of the column at position `column`.
    pub fn card_at(&self, column: usize, row: usize) -> Option<TaskId> {
        self.columns.get(column)?.cards.get(row).map(|c| c.id)
    }

    pub fn card_ids(&self, status: Status) -> Vec<TaskId> {
        self.column(status)
            .map(|c| c.cards.iter().map(|card| card.id).collect())
            .unwrap_or_default()
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.tabs.iter().find(|t| t.active).map(|t| t.board.as_str())
    }

    pub fn contains_card(&self, id: TaskId) -> bool {
        self.columns
            .iter()
            .any(|c| c.cards.iter().any(|card| card.id == id))
    }
}

impl PresentationTarget for BoardView {
    fn reset_column(&mut self, status: Status, header: &str) -> Result<()> {
        let column = self.column_mut(status)?;
        column.header = header.to_string();
        column.cards.clear();
        Ok(())
    }

    fn create_column(&mut self, status: Status) {
        if self.column(status).is_none() {
            self.columns.push(ColumnView {
                status,
                header: status.label(),
                cards: Vec::new(),
            });
            self.columns.sort_by_key(|c| c.status.index());
        }
    }

    fn append_card(&mut self, status: Status, card: Card) -> Result<()> {
        self.column_mut(status)?.cards.push(card);
        Ok(())
    }

    fn set_board_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn clear_tabs(&mut self) {
        self.tabs.clear();
    }

    fn append_tab(&mut self, board: &str) {
        self.tabs.push(Tab {
            board: board.to_string(),
            active: false,
        });
    }

    fn mark_active_tab(&mut self, board: Option<&str>) {
        for tab in &mut self.tabs {
            tab.active = Some(tab.board.as_str()) == board;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, status: Status, board: &str) -> Task {
        Task {
            id: TaskId(id),
            title: format!("task {id}"),
            description: String::new(),
            status,
            board: board.into(),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, Status::Todo, "A"),
            task(2, Status::Doing, "A"),
            task(3, Status::Todo, "B"),
        ]
    }

    #[test]
    fn renders_only_active_board_by_status() {
        let mut view = BoardView::with_columns(&Status::ALL);
        render_columns(&mut view, &Status::ALL, &sample(), Some("A")).unwrap();
        assert_eq!(view.card_ids(Status::Todo), vec![TaskId(1)]);
        assert_eq!(view.card_ids(Status::Doing), vec![TaskId(2)]);
        assert!(view.card_ids(Status::Done).is_empty());
        assert!(!view.contains_card(TaskId(3)));
        assert_eq!(view.title, "A");
    }

    #[test]
    fn rendering_twice_is_idempotent() {
        let mut view = BoardView::with_columns(&Status::ALL);
        render_columns(&mut view, &Status::ALL, &sample(), Some("A")).unwrap();
        let first = view.clone();
        render_columns(&mut view, &Status::ALL, &sample(), Some("A")).unwrap();
        assert_eq!(view, first);
    }

    #[test]
    fn cards_keep_storage_order() {
        let tasks = vec![
            task(5, Status::Todo, "A"),
            task(2, Status::Todo, "A"),
            task(9, Status::Todo, "A"),
        ];
        let mut view = BoardView::with_columns(&Status::ALL);
        render_columns(&mut view, &Status::ALL, &tasks, Some("A")).unwrap();
        assert_eq!(view.card_ids(Status::Todo), vec![TaskId(5), TaskId(2), TaskId(9)]);
    }

    #[test]
    fn headers_are_status_labels() {
        let mut view = BoardView::with_columns(&Status::ALL);
        render_columns(&mut view, &Status::ALL, &[], Some("A")).unwrap();
        let headers: Vec<&str> = view.columns.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, vec!["TODO", "DOING", "DONE"]);
    }

    #[test]
    fn sentinel_board_leaves_columns_empty() {
        let mut view = BoardView::with_columns(&Status::ALL);
        render_columns(&mut view, &Status::ALL, &sample(), Some("A")).unwrap();
        render_columns(&mut view, &Status::ALL, &sample(), None).unwrap();
        assert!(view.columns.iter().all(|c| c.cards.is_empty()));
        assert_eq!(view.title, "");
    }

    #[test]
    fn missing_column_is_created() {
        let mut view = BoardView::with_columns(&[Status::Todo]);
        render_columns(&mut view, &Status::ALL, &sample(), Some("A")).unwrap();
        assert_eq!(view.columns.len(), 3);
        assert_eq!(view.card_ids(Status::Doing), vec![TaskId(2)]);
    }

    #[test]
    fn append_to_missing_column_is_skipped() {
        let mut view = BoardView::with_columns(&[Status::Todo]);
        append_task(&mut view, &task(4, Status::Done, "A")).unwrap();
        assert!(!view.contains_card(TaskId(4)));
        append_task(&mut view, &task(5, Status::Todo, "A")).unwrap();
        assert_eq!(view.card_ids(Status::Todo), vec![TaskId(5)]);
    }

    #[test]
    fn card_at_maps_back_to_id() {
        let mut view = BoardView::with_columns(&Status::ALL);
        render_columns(&mut view, &Status::ALL, &sample(), Some("A")).unwrap();
        assert_eq!(view.card_at(1, 0), Some(TaskId(2)));
        assert_eq!(view.card_at(1, 1), None);
        assert_eq!(view.card_at(7, 0), None);
    }

    #[test]
    fn tabs_mark_exactly_the_active_board() {
        let mut view = BoardView::default();
        let boards = vec!["A".to_string(), "B".to_string()];
        render_board_tabs(&mut view, &boards, Some("B"));
        assert_eq!(view.tabs.len(), 2);
        assert_eq!(view.active_tab(), Some("B"));
        assert_eq!(view.tabs.iter().filter(|t| t.active).count(), 1);

        render_board_tabs(&mut view, &boards, Some("Z"));
        assert_eq!(view.tabs.len(), 2);
        assert!(view.tabs.iter().all(|t| !t.active));
    }
}

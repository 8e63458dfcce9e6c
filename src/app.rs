use anyhow::Result;
use log::{debug, info, warn};
use rusqlite::Connection;

use crate::board::BoardIndex;
use crate::db;
use crate::error::{board_error, BoardError};
use crate::model::{Status, TaskId, Theme};
use crate::render::{self, BoardView, PresentationTarget};
use crate::session::{EditCommand, EditSession};
use crate::storage;

/// Selected card position: column index into `Status::ALL`, row within it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub column: usize,
    pub row: usize,
}

/// All state of a running board. Storage stays the source of truth; the
/// view is rebuilt from it after every change.
pub struct App {
    pub index: BoardIndex,
    pub view: BoardView,
    pub session: EditSession,
    pub cursor: Cursor,
    pub sidebar_visible: bool,
    pub theme: Theme,
    pub message: Option<String>,
}

impl App {
    /// Seed storage if needed, restore the persisted flags and paint the
    /// active board.
    pub fn new(conn: &Connection) -> Result<Self> {
        storage::initialize_data(conn)?;
        let sidebar_visible = db::get(conn, db::SIDEBAR_KEY)?.unwrap_or(true);
        let theme = db::get(conn, db::THEME_KEY)?.unwrap_or_default();
        let mut app = App {
            index: BoardIndex::default(),
            view: BoardView::with_columns(&Status::ALL),
            session: EditSession::Closed,
            cursor: Cursor::default(),
            sidebar_visible,
            theme,
            message: None,
        };
        app.refresh(conn)?;
        Ok(app)
    }

    /// Recompute boards from storage and repaint tabs and columns.
    pub fn refresh(&mut self, conn: &Connection) -> Result<()> {
        let tasks = storage::list_tasks(conn)?;
        self.index = BoardIndex::load(conn, &tasks)?;
        render::render_board_tabs(&mut self.view, &self.index.boards, self.index.active());
        render::render_columns(&mut self.view, &Status::ALL, &tasks, self.index.active())?;
        self.clamp_cursor();
        Ok(())
    }

    fn refresh_columns(&mut self, conn: &Connection) -> Result<()> {
        let tasks = storage::list_tasks(conn)?;
        render::render_columns(&mut self.view, &Status::ALL, &tasks, self.index.active())?;
        self.clamp_cursor();
        Ok(())
    }

    pub fn active_board(&self) -> Option<&str> {
        self.index.active()
    }

    pub fn select_board(&mut self, conn: &Connection, board: &str) -> Result<()> {
        if self.index.select(conn, board)? {
            info!("switched to board '{board}'");
            self.view.mark_active_tab(Some(board));
            self.cursor.row = 0;
            self.refresh_columns(conn)?;
        }
        Ok(())
    }

    pub fn open_add(&mut self) {
        self.session.open_add(self.index.active().is_some());
    }

    /// Open the edit modal for `id`. A card whose task has vanished from
    /// storage is stale: the view is repainted and nothing opens.
    pub fn open_edit(&mut self, conn: &Connection, id: TaskId) -> Result<()> {
        match storage::get_task(conn, id) {
            Ok(task) => {
                self.session.open_edit(&task);
                Ok(())
            }
            Err(e) if matches!(board_error(&e), Some(BoardError::NotFound(_))) => {
                warn!("card for task {id} is stale: {e}");
                self.refresh(conn)
            }
            Err(e) => Err(e),
        }
    }

    pub fn submit_add(&mut self, conn: &Connection) -> Result<()> {
        let Some(form) = self.session.form().cloned() else {
            return Ok(());
        };
        let Some(new_task) = self.session.commit_add(self.index.active()) else {
            debug!("add form rejected by validation");
            return Ok(());
        };
        match storage::create_task(conn, new_task) {
            Ok(task) => {
                if self.index.active() == Some(task.board.as_str()) {
                    render::append_task(&mut self.view, &task)?;
                } else {
                    self.refresh(conn)?;
                }
                self.message = Some(format!("Added '{}'", task.title));
                Ok(())
            }
            Err(e) => {
                // The form goes back on screen whatever the failure was.
                self.session.reject_add(form, e.to_string());
                if matches!(board_error(&e), Some(BoardError::Validation(_))) {
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }

    pub fn save_edit(&mut self, conn: &Connection) -> Result<()> {
        match self.session.save(self.index.active()) {
            Some(command) => self.apply(conn, command),
            None => Ok(()),
        }
    }

    pub fn delete_edit(&mut self, conn: &Connection) -> Result<()> {
        match self.session.delete() {
            Some(command) => self.apply(conn, command),
            None => Ok(()),
        }
    }

    fn apply(&mut self, conn: &Connection, command: EditCommand) -> Result<()> {
        let result = match command {
            EditCommand::Update(id, fields) => storage::update_task(conn, id, fields).map(|t| {
                self.message = Some(format!("Saved '{}'", t.title));
            }),
            EditCommand::Delete(id) => storage::delete_task(conn, id).map(|()| {
                self.message = Some(format!("Deleted task {id}"));
            }),
        };
        match result {
            Ok(()) => {}
            Err(e) if matches!(board_error(&e), Some(BoardError::NotFound(_))) => {
                warn!("edit skipped: {e}");
                self.message = Some(e.to_string());
            }
            Err(e) => return Err(e),
        }
        self.refresh(conn)
    }

    pub fn cancel_add(&mut self) {
        self.session.cancel_add();
    }

    pub fn cancel_edit(&mut self) {
        self.session.cancel_edit();
    }

    /// Clicking outside a modal closes whichever one is open.
    pub fn click_overlay(&mut self) {
        self.session.close();
    }

    /// The overlay is up exactly while a modal is open.
    pub fn overlay_visible(&self) -> bool {
        self.session.is_open()
    }

    pub fn set_sidebar(&mut self, conn: &Connection, visible: bool) -> Result<()> {
        self.sidebar_visible = visible;
        db::set(conn, db::SIDEBAR_KEY, &visible)
    }

    pub fn toggle_theme(&mut self, conn: &Connection) -> Result<()> {
        self.theme = self.theme.toggle();
        db::set(conn, db::THEME_KEY, &self.theme)
    }

    pub fn logo(&self) -> &'static str {
        self.theme.logo()
    }

    // ── Card cursor ──

    fn column_len(&self, column: usize) -> usize {
        self.view.columns.get(column).map_or(0, |c| c.cards.len())
    }

    pub fn clamp_cursor(&mut self) {
        let columns = self.view.columns.len();
        if columns == 0 {
            self.cursor = Cursor::default();
            return;
        }
        self.cursor.column = self.cursor.column.min(columns - 1);
        let len = self.column_len(self.cursor.column);
        self.cursor.row = self.cursor.row.min(len.saturating_sub(1));
    }

    pub fn move_left(&mut self) {
        self.cursor.column = self.cursor.column.saturating_sub(1);
        self.clamp_cursor();
    }

    pub fn move_right(&mut self) {
        self.cursor.column += 1;
        self.clamp_cursor();
    }

    pub fn move_up(&mut self) {
        self.cursor.row = self.cursor.row.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.cursor.row += 1;
        self.clamp_cursor();
    }

    pub fn selected_card(&self) -> Option<TaskId> {
        self.view.card_at(self.cursor.column, self.cursor.row)
    }
}
